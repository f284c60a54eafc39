use std::fmt::{Display, Formatter};

use anyhow::{Context, bail, ensure};
use elf::{ElfBytes, endian::AnyEndian};
use rustc_demangle::demangle;
use tracing::{debug, warn};

/// First CPU address of cartridge PRG space.
pub const PRG_ORIGIN: usize = 0x8000;
/// NROM-256: one 32 KiB bank mapped at `$8000-$FFFF`.
pub const PRG_SIZE: usize = 0x8000;
/// Unused PRG bytes, as an erased EPROM reads.
pub const FILL: u8 = 0xff;

/// Sections copied to PRG at their own address.
const STATIC_SECTIONS: [&str; 3] = [".text", ".rodata", ".vector_table"];
/// Sections that live in RAM and are copied there at boot from a load
/// image in PRG. The symbol gives the load image's address.
const LOADED_SECTIONS: [(&str, &str); 2] = [(".data", "__data_load"), (".zp", "__zp_load")];

/// `EM_MOS` as llvm-mos writes it.
const EM_MOS: u16 = 6502;

#[derive(Debug, Clone)]
pub struct PrgSection {
    pub display_name: String,
    bytes: Vec<u8>,
    /// CPU address of the bytes in PRG.
    pub rom_addr: usize,
    /// CPU address the program uses them at.
    pub mem_addr: usize,
}

impl PrgSection {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    fn from_static(name: &str, elf: &ElfBytes<'_, AnyEndian>) -> anyhow::Result<Option<Self>> {
        let Some(header) = elf
            .section_header_by_name(name)
            .with_context(|| format!("reading section header {name}"))?
        else {
            return Ok(None);
        };
        let (bytes, _) = elf
            .section_data(&header)
            .with_context(|| format!("reading section {name}"))?;

        let addr = header.sh_addr as usize;
        Ok(Some(Self {
            display_name: demangle(name).to_string(),
            bytes: bytes.to_vec(),
            rom_addr: addr,
            mem_addr: addr,
        }))
    }

    fn from_loaded(
        name: &str,
        elf: &ElfBytes<'_, AnyEndian>,
        load_symbol: &str,
    ) -> anyhow::Result<Option<Self>> {
        let Some(header) = elf
            .section_header_by_name(name)
            .with_context(|| format!("reading section header {name}"))?
        else {
            return Ok(None);
        };
        let (bytes, _) = elf
            .section_data(&header)
            .with_context(|| format!("reading section {name}"))?;
        if bytes.is_empty() {
            return Ok(None);
        }

        let (symtab, strtab) = elf
            .symbol_table()
            .context("reading symbol table")?
            .with_context(|| format!("{name} needs {load_symbol}, but there is no symbol table"))?;
        let load_sym = symtab
            .iter()
            .find(|sym| strtab.get(sym.st_name as usize).is_ok_and(|n| n == load_symbol))
            .with_context(|| format!("{name} has contents but {load_symbol} is not defined"))?;

        Ok(Some(Self {
            display_name: demangle(name).to_string(),
            bytes: bytes.to_vec(),
            rom_addr: load_sym.st_value as usize,
            mem_addr: header.sh_addr as usize,
        }))
    }

    fn rom_end(&self) -> usize {
        self.rom_addr + self.len()
    }
}

impl Display for PrgSection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:<24}@{:04X}..{:04X} ${:04X}",
            self.display_name,
            self.rom_addr,
            self.rom_end(),
            self.mem_addr
        )
    }
}

/// 32 KiB of PRG built from an ELF, and where each section went.
pub struct Prg {
    pub bytes: Vec<u8>,
    pub sections: Vec<PrgSection>,
}

impl Prg {
    pub fn from_elf(data: &[u8]) -> anyhow::Result<Self> {
        let elf = ElfBytes::<AnyEndian>::minimal_parse(data).context("parsing ELF")?;
        if elf.ehdr.e_machine != EM_MOS {
            warn!("ELF machine is {}, not MOS; packing anyway", elf.ehdr.e_machine);
        }

        let mut sections = Vec::new();
        for name in STATIC_SECTIONS {
            sections.extend(PrgSection::from_static(name, &elf)?);
        }
        for (name, load_symbol) in LOADED_SECTIONS {
            sections.extend(PrgSection::from_loaded(name, &elf, load_symbol)?);
        }
        sections.retain(|s| !s.is_empty());

        ensure!(
            sections.iter().any(|s| s.display_name == ".vector_table"),
            "no .vector_table section, the console would not know where to start"
        );

        Self::lay_out(sections)
    }

    fn lay_out(mut sections: Vec<PrgSection>) -> anyhow::Result<Self> {
        sections.sort_by_key(|s| s.rom_addr);

        for s in &sections {
            if s.rom_addr < PRG_ORIGIN || s.rom_end() > PRG_ORIGIN + PRG_SIZE {
                bail!(
                    "{} at ${:04X}..${:04X} is outside PRG (${:04X}..${:04X})",
                    s.display_name,
                    s.rom_addr,
                    s.rom_end(),
                    PRG_ORIGIN,
                    PRG_ORIGIN + PRG_SIZE
                );
            }
        }
        for pair in sections.windows(2) {
            if pair[0].rom_end() > pair[1].rom_addr {
                bail!(
                    "{} overlaps {} at ${:04X}",
                    pair[0].display_name,
                    pair[1].display_name,
                    pair[1].rom_addr
                );
            }
        }

        let mut bytes = vec![FILL; PRG_SIZE];
        for s in &sections {
            let start = s.rom_addr - PRG_ORIGIN;
            bytes[start..start + s.len()].copy_from_slice(&s.bytes);
            debug!("placed {s}");
        }

        Ok(Self { bytes, sections })
    }

    /// Bytes of PRG no section claimed.
    pub fn free(&self) -> usize {
        PRG_SIZE - self.sections.iter().map(PrgSection::len).sum::<usize>()
    }

    /// The little-endian word at CPU address `addr`.
    pub fn word(&self, addr: usize) -> u16 {
        let at = addr - PRG_ORIGIN;
        u16::from_le_bytes([self.bytes[at], self.bytes[at + 1]])
    }

    pub fn reset_vector(&self) -> u16 {
        self.word(0xfffc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(name: &str, rom_addr: usize, bytes: &[u8]) -> PrgSection {
        PrgSection {
            display_name: name.to_string(),
            bytes: bytes.to_vec(),
            rom_addr,
            mem_addr: rom_addr,
        }
    }

    #[test]
    fn lays_sections_at_their_address() {
        let prg = Prg::lay_out(vec![
            section(".vector_table", 0xfffa, &[1, 0x80, 0, 0x80, 2, 0x80]),
            section(".text", 0x8000, &[0xea, 0x60]),
        ])
        .unwrap();

        assert_eq!(prg.bytes.len(), PRG_SIZE);
        assert_eq!(&prg.bytes[..3], &[0xea, 0x60, FILL]);
        assert_eq!(prg.reset_vector(), 0x8000);
        assert_eq!(prg.word(0xfffa), 0x8001);
        assert_eq!(prg.free(), PRG_SIZE - 8);
        assert_eq!(prg.sections[0].display_name, ".text");
    }

    #[test]
    fn refuses_overlap() {
        let err = Prg::lay_out(vec![
            section(".text", 0x8000, &[0; 16]),
            section(".rodata", 0x8008, &[0; 4]),
        ])
        .err()
        .unwrap();
        assert!(err.to_string().contains("overlaps"), "{err}");
    }

    #[test]
    fn refuses_sections_outside_prg() {
        assert!(Prg::lay_out(vec![section(".text", 0x7ff0, &[0; 4])]).is_err());
        assert!(Prg::lay_out(vec![section(".vector_table", 0xfffc, &[0; 6])]).is_err());
    }
}
