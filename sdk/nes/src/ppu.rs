//! # PPU Registers
//!
//! The picture processing unit is controlled through eight registers mapped
//! at `$2000-$2007` (mirrored every 8 bytes up to `$3FFF`).
//!
//! | Address | Name      | Access | Description                               |
//! |---------|-----------|--------|-------------------------------------------|
//! | `$2000` | PPUCTRL   | W      | NMI enable, VRAM increment, base nametable |
//! | `$2001` | PPUMASK   | W      | Layer enables, left-column clipping, tint |
//! | `$2002` | PPUSTATUS | R      | Vblank flag; reading resets the latch     |
//! | `$2003` | OAMADDR   | W      | Sprite memory address                     |
//! | `$2004` | OAMDATA   | RW     | Sprite memory data                        |
//! | `$2005` | PPUSCROLL | W ×2   | Scroll X then Y                           |
//! | `$2006` | PPUADDR   | W ×2   | VRAM address, high byte then low byte     |
//! | `$2007` | PPUDATA   | RW     | VRAM data at the address, auto-increments |
//!
//! `PPUSCROLL` and `PPUADDR` share one write latch, which is why writing an
//! address clobbers the scroll position and it has to be written again
//! before the next frame is drawn.

use volatile_register::{RO, RW, WO};

/// PPU register block at `$2000-$2007`.
#[repr(C, packed)]
pub struct PpuRegs {
    pub ctrl: WO<u8>,
    pub mask: WO<u8>,
    pub status: RO<u8>,
    pub oam_addr: WO<u8>,
    pub oam_data: RW<u8>,
    pub scroll: WO<u8>,
    pub addr: WO<u8>,
    pub data: RW<u8>,
}

impl PpuRegs {
    /// Get a reference to the registers at `$2000`.
    #[inline(always)]
    pub(crate) unsafe fn new() -> &'static mut PpuRegs {
        unsafe { &mut *(0x2000 as *mut PpuRegs) }
    }
}

/// The register accesses [`Console`](crate::console::Console) makes, one
/// method per register it touches.
///
/// On the console this is [`PpuRegs`]. A host can implement it to watch the
/// exact write sequence, shared `PPUSCROLL`/`PPUADDR` latch included.
pub trait PpuPort {
    /// Block until the NMI handler has run for the next vertical blank.
    fn wait_nmi(&mut self);
    fn write_ctrl(&mut self, value: u8);
    fn write_mask(&mut self, value: u8);
    /// Read `PPUSTATUS`, resetting the write latch.
    fn read_status(&mut self) -> u8;
    fn write_scroll(&mut self, value: u8);
    fn write_addr(&mut self, value: u8);
    fn write_data(&mut self, value: u8);
}

impl<P: PpuPort + ?Sized> PpuPort for &mut P {
    #[inline(always)]
    fn wait_nmi(&mut self) {
        (**self).wait_nmi()
    }

    #[inline(always)]
    fn write_ctrl(&mut self, value: u8) {
        (**self).write_ctrl(value)
    }

    #[inline(always)]
    fn write_mask(&mut self, value: u8) {
        (**self).write_mask(value)
    }

    #[inline(always)]
    fn read_status(&mut self) -> u8 {
        (**self).read_status()
    }

    #[inline(always)]
    fn write_scroll(&mut self, value: u8) {
        (**self).write_scroll(value)
    }

    #[inline(always)]
    fn write_addr(&mut self, value: u8) {
        (**self).write_addr(value)
    }

    #[inline(always)]
    fn write_data(&mut self, value: u8) {
        (**self).write_data(value)
    }
}

bitflags::bitflags! {
    /// Control flags at `$2000`.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct PpuCtrl: u8 {
        /// Base nametable select, low bit (`$2400`).
        const NAMETABLE_X      = 0b0000_0001;
        /// Base nametable select, high bit (`$2800`).
        const NAMETABLE_Y      = 0b0000_0010;
        /// Add 32 per `PPUDATA` access instead of 1.
        const VRAM_DOWN        = 0b0000_0100;
        /// Sprite pattern table at `$1000`.
        const SPRITE_PATTERN   = 0b0000_1000;
        /// Background pattern table at `$1000`.
        const BG_PATTERN       = 0b0001_0000;
        /// 8×16 sprites.
        const TALL_SPRITES     = 0b0010_0000;
        const MASTER_SLAVE     = 0b0100_0000;
        /// Generate an NMI at the start of vertical blank.
        const NMI_ENABLE       = 0b1000_0000;

        const NAMETABLE = Self::NAMETABLE_X.bits() | Self::NAMETABLE_Y.bits();
    }

    /// Rendering flags at `$2001`.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct RenderMask: u8 {
        const GRAYSCALE        = 0b0000_0001;
        /// Show the background in the leftmost 8 pixels.
        const BG_LEFT          = 0b0000_0010;
        /// Show sprites in the leftmost 8 pixels.
        const SPRITES_LEFT     = 0b0000_0100;
        /// Background layer on.
        const BACKGROUND       = 0b0000_1000;
        /// Sprite layer on.
        const SPRITES          = 0b0001_0000;
        const EMPHASIZE_RED    = 0b0010_0000;
        const EMPHASIZE_GREEN  = 0b0100_0000;
        const EMPHASIZE_BLUE   = 0b1000_0000;

        /// Both layers, what neslib calls `ppu_on_all`.
        const LAYERS = Self::BACKGROUND.bits() | Self::SPRITES.bits();
    }

    /// Status flags at `$2002`.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct PpuStatus: u8 {
        const SPRITE_OVERFLOW  = 0b0010_0000;
        const SPRITE_ZERO_HIT  = 0b0100_0000;
        const VBLANK           = 0b1000_0000;
    }
}

impl RenderMask {
    /// Whether either layer is drawn.
    #[inline]
    pub fn is_rendering(&self) -> bool {
        self.intersects(Self::LAYERS)
    }
}
