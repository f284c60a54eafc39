//! # Console
//!
//! [`Console`] drives the real PPU registers. Your `main` receives one,
//! already initialized by the boot code:
//!
//! ```ignore
//! #[unsafe(no_mangle)]
//! fn main(console: &mut Console) -> ! {
//!     console.set_rendering(RenderMask::LAYERS);
//!     loop {
//!         console.wait_vblank();
//!     }
//! }
//! ```
//!
//! `PPUCTRL`, `PPUMASK` and `PPUSCROLL` are write-only, so the console keeps
//! shadow copies and writes them back whenever a VRAM access disturbs them:
//! after a palette upload, and when a layer is switched on after `PPUADDR`
//! was used.
//!
//! The registers are reached through a [`PpuPort`]. `Console` on its own
//! means the real ones at `$2000`; [`Console::with_port`] takes any other.

use core::ptr;

use crate::nametable::PALETTE_BG;
use crate::palette::Palette;
use crate::ppu::{PpuCtrl, PpuPort, PpuRegs, RenderMask};
use crate::video::Video;

/// Incremented by the NMI handler once per vertical blank.
#[cfg_attr(target_arch = "mos", unsafe(link_section = ".data.zp"))]
#[unsafe(no_mangle)]
pub static mut NMI_FRAMES: u8 = 0;

#[inline(always)]
fn nmi_frames() -> u8 {
    unsafe { ptr::read_volatile(&raw const NMI_FRAMES) }
}

impl PpuPort for PpuRegs {
    #[inline(always)]
    fn wait_nmi(&mut self) {
        let frame = nmi_frames();
        while nmi_frames() == frame {}
    }

    #[inline(always)]
    fn write_ctrl(&mut self, value: u8) {
        unsafe { self.ctrl.write(value) }
    }

    #[inline(always)]
    fn write_mask(&mut self, value: u8) {
        unsafe { self.mask.write(value) }
    }

    #[inline(always)]
    fn read_status(&mut self) -> u8 {
        self.status.read()
    }

    #[inline(always)]
    fn write_scroll(&mut self, value: u8) {
        unsafe { self.scroll.write(value) }
    }

    #[inline(always)]
    fn write_addr(&mut self, value: u8) {
        unsafe { self.addr.write(value) }
    }

    #[inline(always)]
    fn write_data(&mut self, value: u8) {
        unsafe { self.data.write(value) }
    }
}

pub struct Console<R: PpuPort = &'static mut PpuRegs> {
    /// Shadow copy of write-only `PPUCTRL`
    pub ctrl: PpuCtrl,
    /// Shadow copy of write-only `PPUMASK`
    pub mask: RenderMask,
    scroll_x: u8,
    scroll_y: u8,
    /// `PPUADDR` was written since the scroll last was.
    scroll_stale: bool,
    regs: R,
}

impl Console {
    /// Take over the PPU at `$2000`.
    pub fn init() -> Console {
        Console::with_port(unsafe { PpuRegs::new() })
    }
}

impl<R: PpuPort> Console<R> {
    /// NMI on, rendering off, left columns visible, nametable A at (0, 0).
    pub fn with_port(regs: R) -> Self {
        let mut console = Self {
            ctrl: PpuCtrl::NMI_ENABLE,
            mask: RenderMask::BG_LEFT | RenderMask::SPRITES_LEFT,
            scroll_x: 0,
            scroll_y: 0,
            scroll_stale: true,
            regs,
        };
        console.write_ctrl();
        console.write_mask();
        console
    }

    #[inline(always)]
    pub fn write_ctrl(&mut self) {
        self.regs.write_ctrl(self.ctrl.bits())
    }

    #[inline(always)]
    pub fn write_mask(&mut self) {
        self.regs.write_mask(self.mask.bits())
    }

    /// Write the scroll shadow back, after anything that used `PPUADDR`.
    fn write_scroll(&mut self) {
        // reading PPUSTATUS resets the shared write latch
        let _ = self.regs.read_status();
        self.regs.write_scroll(self.scroll_x);
        self.regs.write_scroll(self.scroll_y);
        // PPUADDR also overwrote the nametable select
        self.write_ctrl();
        self.scroll_stale = false;
    }

    /// The register port, for hosts that watch it.
    pub fn port(&self) -> &R {
        &self.regs
    }
}

impl<R: PpuPort> Video for Console<R> {
    fn wait_vblank(&mut self) {
        self.regs.wait_nmi();
    }

    fn set_rendering(&mut self, layers: RenderMask) {
        self.mask.remove(RenderMask::LAYERS);
        self.mask.insert(layers & RenderMask::LAYERS);
        // the first frame drawn must not scroll to the last VRAM address
        if self.mask.is_rendering() && self.scroll_stale {
            self.write_scroll();
        }
        self.write_mask();
    }

    fn set_palette(&mut self, palette: &Palette) {
        self.set_vram_addr(PALETTE_BG);
        self.write_vram(palette.entries());
        // park the address outside the palette, or the backdrop shows its color
        self.set_vram_addr(0);
        self.write_scroll();
    }

    fn set_vram_addr(&mut self, addr: u16) {
        let _ = self.regs.read_status();
        self.regs.write_addr((addr >> 8) as u8);
        self.regs.write_addr(addr as u8);
        self.scroll_stale = true;
    }

    fn write_vram(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.regs.write_data(byte)
        }
    }

    fn fill_vram(&mut self, value: u8, len: usize) {
        for _ in 0..len {
            self.regs.write_data(value)
        }
    }

    fn set_scroll(&mut self, x: u8, y: u8) {
        self.scroll_x = x;
        self.scroll_y = y;
        self.write_scroll();
    }
}
