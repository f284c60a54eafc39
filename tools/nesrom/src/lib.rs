//! Packs the ELF that `rom` links into an iNES image emulators and flash
//! carts load: a 16-byte header, 32 KiB of PRG, then CHR if there is any.

pub mod ines;
pub mod prg;

use std::path::Path;

use anyhow::Context;
use nes::nametable::Mirroring;
use tracing::info;

use crate::ines::Header;
use crate::prg::Prg;

pub struct Image {
    pub header: Header,
    pub prg: Prg,
    pub chr: Vec<u8>,
}

impl Image {
    pub fn new(prg: Prg, chr: Vec<u8>, mirroring: Mirroring) -> anyhow::Result<Self> {
        let header = Header::nrom(prg.bytes.len(), chr.len(), mirroring)?;
        Ok(Self { header, prg, chr })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(ines::HEADER_LEN + self.prg.bytes.len() + self.chr.len());
        out.extend_from_slice(&self.header.to_bytes());
        out.extend_from_slice(&self.prg.bytes);
        out.extend_from_slice(&self.chr);
        out
    }
}

/// Read `elf_path` (and `chr_path`), pack them and write the image to
/// `output_path`.
pub fn pack_file(
    elf_path: &Path,
    chr_path: Option<&Path>,
    output_path: &Path,
    mirroring: Mirroring,
) -> anyhow::Result<Image> {
    let elf = std::fs::read(elf_path)
        .with_context(|| format!("could not read ELF file {}", elf_path.display()))?;
    let prg = Prg::from_elf(&elf).with_context(|| format!("packing {}", elf_path.display()))?;

    let chr = match chr_path {
        Some(path) => std::fs::read(path)
            .with_context(|| format!("could not read CHR file {}", path.display()))?,
        None => Vec::new(),
    };

    let image = Image::new(prg, chr, mirroring)?;
    std::fs::write(output_path, image.to_bytes())
        .with_context(|| format!("could not write {}", output_path.display()))?;
    info!("wrote {}", output_path.display());

    Ok(image)
}
