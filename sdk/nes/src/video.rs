//! # Video
//!
//! [`Video`] is the whole surface a program needs from the PPU. Write your
//! program against it and it runs unchanged on [`Console`](crate::console::Console)
//! and on a host simulator:
//!
//! ```ignore
//! fn draw_title<V: Video>(video: &mut V) {
//!     video.set_rendering(RenderMask::empty());
//!     video.set_vram_addr(ntadr_a(9, 8));
//!     video.write_vram(b"HELLO");
//!     video.set_rendering(RenderMask::LAYERS);
//! }
//! ```
//!
//! ## Timing
//!
//! VRAM and palette writes are only safe while rendering is off or during
//! vertical blank. [`Video::wait_vblank`] is the single suspension point: it
//! returns right after the next NMI, leaving the rest of vblank for writes.

use crate::palette::Palette;
use crate::ppu::RenderMask;

pub trait Video {
    /// Block until the next vertical blank has started.
    fn wait_vblank(&mut self);

    /// Turn the background and sprite layers on or off.
    ///
    /// Only [`RenderMask::LAYERS`] bits of `layers` are applied; clipping and
    /// emphasis settings are left as they are.
    fn set_rendering(&mut self, layers: RenderMask);

    /// Upload all 16 entries of the background palette.
    fn set_palette(&mut self, palette: &Palette);

    /// Move the VRAM write cursor.
    fn set_vram_addr(&mut self, addr: u16);

    /// Write `bytes` at the cursor, advancing it by one per byte.
    fn write_vram(&mut self, bytes: &[u8]);

    /// Write `value` `len` times at the cursor.
    fn fill_vram(&mut self, value: u8, len: usize) {
        let chunk = [value; 32];
        let mut left = len;
        while left > 0 {
            let n = left.min(chunk.len());
            self.write_vram(&chunk[..n]);
            left -= n;
        }
    }

    /// Set the background scroll in pixels.
    fn set_scroll(&mut self, x: u8, y: u8);
}

impl<V: Video + ?Sized> Video for &mut V {
    #[inline]
    fn wait_vblank(&mut self) {
        (**self).wait_vblank()
    }

    #[inline]
    fn set_rendering(&mut self, layers: RenderMask) {
        (**self).set_rendering(layers)
    }

    #[inline]
    fn set_palette(&mut self, palette: &Palette) {
        (**self).set_palette(palette)
    }

    #[inline]
    fn set_vram_addr(&mut self, addr: u16) {
        (**self).set_vram_addr(addr)
    }

    #[inline]
    fn write_vram(&mut self, bytes: &[u8]) {
        (**self).write_vram(bytes)
    }

    #[inline]
    fn fill_vram(&mut self, value: u8, len: usize) {
        (**self).fill_vram(value, len)
    }

    #[inline]
    fn set_scroll(&mut self, x: u8, y: u8) {
        (**self).set_scroll(x, y)
    }
}
