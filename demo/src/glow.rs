//! The glow effect recolors two sub-palettes at once. Sub-palette 0 colors
//! the label text and sub-palette 3 the cartridge, so both light up together.

use nes::palette::{BLACK, Palette, WHITE};
use nes::video::Video;

#[rustfmt::skip]
pub const INITIAL_PALETTE: Palette = Palette::checked([
    BLACK, 0x13, 0x03, WHITE,
    BLACK, 0x04, 0x05, 0x06,
    BLACK, 0x08, 0x09, 0x0a,
    BLACK, 0x13, 0x23, WHITE,
]);

/// "light" slot of sub-palette 0
const TEXT_LIGHT: usize = 0x1;
/// "lighter" slot of sub-palette 0
const TEXT_LIGHTER: usize = 0x2;
const CART_LIGHT: usize = 0xd;
const CART_LIGHTER: usize = 0xe;

/// The background palette plus the recoloring the choreography applies to it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GlowPalette {
    palette: Palette,
}

impl GlowPalette {
    pub const fn new(palette: Palette) -> Self {
        Self { palette }
    }

    #[inline]
    pub const fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Recolor the glow slots with hue `base`, one brightness step up when
    /// `glow` is set. Does not touch the hardware.
    pub fn apply(&mut self, base: u8, glow: bool) {
        let (light, lighter, cart_lighter) = if glow {
            (0x20, 0x10, 0x30)
        } else {
            (0x10, 0x00, 0x20)
        };
        self.palette.set(TEXT_LIGHT, light | base);
        self.palette.set(TEXT_LIGHTER, lighter | base);
        self.palette.set(CART_LIGHT, light | base);
        self.palette.set(CART_LIGHTER, cart_lighter | base);
    }

    /// [`apply`](Self::apply), then upload the palette at the next vblank.
    pub fn set_color<V: Video + ?Sized>(&mut self, video: &mut V, base: u8, glow: bool) {
        self.apply(base, glow);
        video.wait_vblank();
        video.set_palette(&self.palette);
    }
}

impl Default for GlowPalette {
    fn default() -> Self {
        Self::new(INITIAL_PALETTE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glow_slots(p: &GlowPalette) -> [u8; 4] {
        let e = p.palette().entries();
        [e[1], e[2], e[13], e[14]]
    }

    #[test]
    fn plain_color() {
        let mut p = GlowPalette::default();
        p.apply(0x5, false);
        assert_eq!(glow_slots(&p), [0x15, 0x05, 0x15, 0x25]);
    }

    #[test]
    fn glowing_color() {
        let mut p = GlowPalette::default();
        p.apply(0x5, true);
        assert_eq!(glow_slots(&p), [0x25, 0x15, 0x25, 0x35]);
    }

    #[test]
    fn leaves_other_slots_alone() {
        let mut p = GlowPalette::default();
        p.apply(0xc, true);
        let before = INITIAL_PALETTE.entries();
        let after = p.palette().entries();
        for i in [0, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 15] {
            assert_eq!(after[i], before[i], "slot {i}");
        }
    }
}
