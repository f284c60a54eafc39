//! # Background Palettes
//!
//! The PPU draws the background with 16 palette entries, grouped as four
//! sub-palettes of four colors. Attribute bytes pick a sub-palette per 16×16
//! pixel area, and entry 0 of each sub-palette is the shared backdrop.
//!
//! ```text
//!  index:  0    1    2    3  |  4 ..  7  |  8 .. 11  | 12 .. 15
//!         bg  light lighter  |  sub 1    |  sub 2    |  sub 3
//! ```
//!
//! Colors are 6-bit indices into the NES master palette: the low nibble is
//! the hue, bits 4-5 the brightness. Some codes are poorly behaved, so this
//! module only accepts palettes whose backdrop slots hold [`BLACK`] and whose
//! final entry holds [`WHITE`]:
//!
//! ```ignore
//! const PALETTE: Palette = Palette::checked([
//!     BLACK, 0x13, 0x03, WHITE,
//!     BLACK, 0x04, 0x05, 0x06,
//!     BLACK, 0x08, 0x09, 0x0a,
//!     BLACK, 0x13, 0x23, WHITE,
//! ]);
//! ```

use core::fmt;

/// Canonical black. `0x0d` would be "blacker than black" and upsets some TVs.
pub const BLACK: u8 = 0x0f;
pub const DARK_GRAY: u8 = 0x00;
pub const LIGHT_GRAY: u8 = 0x10;
/// Canonical white. `0x20` and `0x30` look the same, `0x30` is the one to use.
pub const WHITE: u8 = 0x30;

/// Entries in a background palette.
pub const LEN: usize = 16;
/// Entries per sub-palette.
pub const SUB_LEN: usize = 4;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PaletteError {
    /// A backdrop slot (0, 4, 8, 12) is not [`BLACK`].
    NotBlack { index: usize, value: u8 },
    /// The last entry is not [`WHITE`].
    NotWhite { value: u8 },
    /// Not a master palette index.
    OutOfRange { index: usize, value: u8 },
}

impl fmt::Display for PaletteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaletteError::NotBlack { index, value } => {
                write!(f, "palette entry {index} is {value:#04x}, backdrop must be {BLACK:#04x}")
            }
            PaletteError::NotWhite { value } => {
                write!(f, "last palette entry is {value:#04x}, must be {WHITE:#04x}")
            }
            PaletteError::OutOfRange { index, value } => {
                write!(f, "palette entry {index} is {value:#04x}, colors stop at 0x3f")
            }
        }
    }
}

/// A validated 16-entry background palette.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Palette([u8; LEN]);

impl Palette {
    /// Validate `entries` as a background palette.
    pub const fn new(entries: [u8; LEN]) -> Result<Self, PaletteError> {
        let mut i = 0;
        while i < LEN {
            let value = entries[i];
            if value > 0x3f {
                return Err(PaletteError::OutOfRange { index: i, value });
            }
            if i % SUB_LEN == 0 && value != BLACK {
                return Err(PaletteError::NotBlack { index: i, value });
            }
            i += 1;
        }
        if entries[LEN - 1] != WHITE {
            return Err(PaletteError::NotWhite { value: entries[LEN - 1] });
        }
        Ok(Self(entries))
    }

    /// Like [`Palette::new`], for literal tables. Fails the build when used in
    /// a `const` and the table is invalid.
    pub const fn checked(entries: [u8; LEN]) -> Self {
        match Self::new(entries) {
            Ok(palette) => palette,
            Err(_) => panic!("invalid palette: backdrops must be 0x0f, last entry 0x30"),
        }
    }

    #[inline]
    pub const fn entries(&self) -> &[u8; LEN] {
        &self.0
    }

    #[inline]
    pub const fn get(&self, index: usize) -> u8 {
        self.0[index]
    }

    /// The four entries of sub-palette `n` (0-3).
    pub fn sub_palette(&self, n: usize) -> [u8; SUB_LEN] {
        let start = n * SUB_LEN;
        [self.0[start], self.0[start + 1], self.0[start + 2], self.0[start + 3]]
    }

    /// Whether `index` is one of the slots pinned to black or white.
    #[inline]
    pub const fn is_reserved(index: usize) -> bool {
        index % SUB_LEN == 0 || index == LEN - 1
    }

    /// Overwrite one color. Bits above the 6-bit color index are dropped.
    ///
    /// # Panics
    ///
    /// Panics if `index` is a [reserved](Palette::is_reserved) slot or out of bounds.
    #[inline]
    pub fn set(&mut self, index: usize, color: u8) {
        assert!(!Self::is_reserved(index), "palette slot is pinned to black/white");
        self.0[index] = color & 0x3f;
    }
}

impl TryFrom<[u8; LEN]> for Palette {
    type Error = PaletteError;

    fn try_from(entries: [u8; LEN]) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD: [u8; LEN] = [
        BLACK, 0x13, 0x03, WHITE, BLACK, 0x04, 0x05, 0x06, BLACK, 0x08, 0x09, 0x0a, BLACK, 0x13,
        0x23, WHITE,
    ];

    #[test]
    fn accepts_black_backdrops_and_white_tail() {
        let palette = Palette::new(GOOD).unwrap();
        assert_eq!(palette.entries(), &GOOD);
        assert_eq!(palette.sub_palette(3), [BLACK, 0x13, 0x23, WHITE]);
    }

    #[test]
    fn rejects_gray_backdrop() {
        let mut entries = GOOD;
        entries[8] = DARK_GRAY;
        assert_eq!(
            Palette::new(entries),
            Err(PaletteError::NotBlack { index: 8, value: DARK_GRAY })
        );
    }

    #[test]
    fn rejects_off_white_tail() {
        let mut entries = GOOD;
        entries[15] = 0x20;
        assert_eq!(Palette::new(entries), Err(PaletteError::NotWhite { value: 0x20 }));
    }

    #[test]
    fn rejects_codes_past_the_master_palette() {
        let mut entries = GOOD;
        entries[5] = 0x40;
        assert_eq!(
            Palette::new(entries),
            Err(PaletteError::OutOfRange { index: 5, value: 0x40 })
        );
    }

    #[test]
    fn set_masks_to_six_bits() {
        let mut palette = Palette::checked(GOOD);
        palette.set(2, 0xf5);
        assert_eq!(palette.get(2), 0x35);
    }

    #[test]
    #[should_panic]
    fn set_refuses_backdrop() {
        Palette::checked(GOOD).set(4, 0x11);
    }
}
