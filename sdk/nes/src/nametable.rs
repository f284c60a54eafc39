//! # Nametables
//!
//! A nametable is 1 KiB of VRAM: 32×30 tile indices followed by a 64-byte
//! attribute table. The PPU addresses four of them, backed by only two
//! physical pages; the cartridge's [`Mirroring`] decides which pairs share.
//!
//! ```text
//! $2000 ┌────────┬────────┐ $2400
//!       │   A    │   B    │
//! $2800 ├────────┼────────┤ $2C00
//!       │   C    │   D    │
//!       └────────┴────────┘
//! ```

/// Tiles per row.
pub const WIDTH: u8 = 32;
/// Tile rows.
pub const HEIGHT: u8 = 30;
/// Bytes in one nametable, tiles plus attributes.
pub const SIZE: usize = 0x400;
/// Offset of the attribute table inside a nametable.
pub const ATTRIBUTES: u16 = 0x3c0;

pub const NAMETABLE_A: u16 = 0x2000;
pub const NAMETABLE_B: u16 = 0x2400;
pub const NAMETABLE_C: u16 = 0x2800;
pub const NAMETABLE_D: u16 = 0x2c00;

/// Background palette in PPU address space.
pub const PALETTE_BG: u16 = 0x3f00;
/// Sprite palette in PPU address space.
pub const PALETTE_SPRITE: u16 = 0x3f10;

/// VRAM address of tile (`x`, `y`) in the nametable at `base`.
#[inline]
pub const fn ntadr(base: u16, x: u8, y: u8) -> u16 {
    base | ((y as u16) << 5) | x as u16
}

#[inline]
pub const fn ntadr_a(x: u8, y: u8) -> u16 {
    ntadr(NAMETABLE_A, x, y)
}

#[inline]
pub const fn ntadr_b(x: u8, y: u8) -> u16 {
    ntadr(NAMETABLE_B, x, y)
}

#[inline]
pub const fn ntadr_c(x: u8, y: u8) -> u16 {
    ntadr(NAMETABLE_C, x, y)
}

#[inline]
pub const fn ntadr_d(x: u8, y: u8) -> u16 {
    ntadr(NAMETABLE_D, x, y)
}

/// How the four logical nametables map onto the two physical pages.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Mirroring {
    /// A=C, B=D. For horizontal scrolling.
    #[default]
    Vertical,
    /// A=B, C=D. For vertical scrolling.
    Horizontal,
}

impl Mirroring {
    /// Offset into the 2 KiB of physical nametable RAM for `addr`
    /// (`$2000-$3EFF`).
    pub const fn fold(self, addr: u16) -> usize {
        let addr = addr & 0x0fff;
        let page = match self {
            Mirroring::Vertical => (addr >> 10) & 1,
            Mirroring::Horizontal => (addr >> 11) & 1,
        };
        (page as usize) * SIZE + (addr as usize & (SIZE - 1))
    }
}
