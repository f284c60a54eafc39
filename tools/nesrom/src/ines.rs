//! The 16-byte iNES header.
//!
//! ```text
//! 0..4   "NES" 1A
//! 4      PRG ROM size, 16 KiB units
//! 5      CHR ROM size, 8 KiB units (0 = CHR RAM)
//! 6      mapper low nibble | four-screen | trainer | battery | mirroring
//! 7      mapper high nibble | format (2 = NES 2.0)
//! 8..16  unused here, written as 0
//! ```

use anyhow::{bail, ensure};

use nes::nametable::Mirroring;

pub const MAGIC: [u8; 4] = *b"NES\x1a";
pub const HEADER_LEN: usize = 16;
pub const PRG_UNIT: usize = 16 * 1024;
pub const CHR_UNIT: usize = 8 * 1024;

const FLAG6_VERTICAL: u8 = 0x01;
const FLAG6_BATTERY: u8 = 0x02;
const FLAG6_TRAINER: u8 = 0x04;
const FLAG6_FOUR_SCREEN: u8 = 0x08;
const FLAG7_FORMAT: u8 = 0x0c;
const FORMAT_NES2: u8 = 0x08;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Header {
    pub prg_units: u8,
    pub chr_units: u8,
    pub mapper: u8,
    pub mirroring: Mirroring,
    pub battery: bool,
}

impl Header {
    /// Header for a mapper 0 (NROM) cart with `prg_len` bytes of PRG and
    /// `chr_len` bytes of CHR ROM.
    pub fn nrom(prg_len: usize, chr_len: usize, mirroring: Mirroring) -> anyhow::Result<Self> {
        ensure!(
            prg_len == PRG_UNIT || prg_len == 2 * PRG_UNIT,
            "NROM carries 16 or 32 KiB of PRG, got {prg_len} bytes"
        );
        ensure!(
            chr_len % CHR_UNIT == 0,
            "CHR must be a whole number of 8 KiB banks, got {chr_len} bytes"
        );
        ensure!(
            chr_len <= CHR_UNIT,
            "NROM carries at most 8 KiB of CHR, got {chr_len} bytes"
        );

        Ok(Self {
            prg_units: (prg_len / PRG_UNIT) as u8,
            chr_units: (chr_len / CHR_UNIT) as u8,
            mapper: 0,
            mirroring,
            battery: false,
        })
    }

    pub fn prg_len(&self) -> usize {
        self.prg_units as usize * PRG_UNIT
    }

    pub fn chr_len(&self) -> usize {
        self.chr_units as usize * CHR_UNIT
    }

    pub fn uses_chr_ram(&self) -> bool {
        self.chr_units == 0
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut flags6 = (self.mapper & 0x0f) << 4;
        if self.mirroring == Mirroring::Vertical {
            flags6 |= FLAG6_VERTICAL;
        }
        if self.battery {
            flags6 |= FLAG6_BATTERY;
        }
        let flags7 = self.mapper & 0xf0;

        let mut out = [0; HEADER_LEN];
        out[..4].copy_from_slice(&MAGIC);
        out[4] = self.prg_units;
        out[5] = self.chr_units;
        out[6] = flags6;
        out[7] = flags7;
        out
    }

    /// Parse the header at the start of `bytes`. Trainers, four-screen
    /// VRAM and NES 2.0 headers are refused.
    pub fn parse(bytes: &[u8]) -> anyhow::Result<Self> {
        ensure!(
            bytes.len() >= HEADER_LEN,
            "{} bytes is too short for an iNES header",
            bytes.len()
        );
        ensure!(bytes[..4] == MAGIC, "missing iNES magic, found {:02x?}", &bytes[..4]);

        let (flags6, flags7) = (bytes[6], bytes[7]);
        if flags6 & FLAG6_TRAINER != 0 {
            bail!("images with a trainer are not supported");
        }
        if flags6 & FLAG6_FOUR_SCREEN != 0 {
            bail!("four-screen VRAM is not supported");
        }
        if flags7 & FLAG7_FORMAT == FORMAT_NES2 {
            bail!("NES 2.0 headers are not supported");
        }

        Ok(Self {
            prg_units: bytes[4],
            chr_units: bytes[5],
            mapper: (flags7 & 0xf0) | (flags6 >> 4),
            mirroring: if flags6 & FLAG6_VERTICAL != 0 {
                Mirroring::Vertical
            } else {
                Mirroring::Horizontal
            },
            battery: flags6 & FLAG6_BATTERY != 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nrom_32k_vertical() {
        let header = Header::nrom(0x8000, 0x2000, Mirroring::Vertical).unwrap();
        assert_eq!(
            header.to_bytes(),
            [b'N', b'E', b'S', 0x1a, 2, 1, 0x01, 0, 0, 0, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn horizontal_with_chr_ram() {
        let header = Header::nrom(0x8000, 0, Mirroring::Horizontal).unwrap();
        let bytes = header.to_bytes();
        assert_eq!(bytes[5], 0);
        assert_eq!(bytes[6], 0x00);
        assert!(header.uses_chr_ram());
    }

    #[test]
    fn mapper_nibbles_split_across_flags() {
        let header = Header {
            prg_units: 8,
            chr_units: 0,
            mapper: 0x42,
            mirroring: Mirroring::Horizontal,
            battery: true,
        };
        let bytes = header.to_bytes();
        assert_eq!(bytes[6], 0x22);
        assert_eq!(bytes[7], 0x40);
        assert_eq!(Header::parse(&bytes).unwrap(), header);
    }

    #[test]
    fn rejects_bad_sizes() {
        assert!(Header::nrom(0x4000 + 1, 0, Mirroring::Vertical).is_err());
        assert!(Header::nrom(0x8000, 0x1000, Mirroring::Vertical).is_err());
        assert!(Header::nrom(0x8000, 0x4000, Mirroring::Vertical).is_err());
    }

    #[test]
    fn rejects_bad_magic() {
        let mut bytes = Header::nrom(0x4000, 0, Mirroring::Vertical).unwrap().to_bytes();
        bytes[3] = 0;
        assert!(Header::parse(&bytes).is_err());
        assert!(Header::parse(&bytes[..8]).is_err());
    }

    #[test]
    fn rejects_nes2() {
        let mut bytes = Header::nrom(0x8000, 0, Mirroring::Vertical).unwrap().to_bytes();
        bytes[7] |= 0x08;
        assert!(Header::parse(&bytes).is_err());
    }
}
