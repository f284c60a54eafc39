//! Register-level PPU model, for watching what `nes::console::Console`
//! actually writes.
//!
//! `PPUSCROLL`, `PPUADDR` and the nametable bits of `PPUCTRL` all land in
//! one internal register, `t`. At the start of each frame the PPU copies `t`
//! into its drawing position, so whatever `t` holds when a vblank ends is
//! the scroll that frame is drawn with:
//!
//! ```text
//! t:  0 yyy NN YYYYY XXXXX
//!       │   │  │     └ coarse X
//!       │   │  └ coarse Y
//!       │   └ nametable
//!       └ fine Y                 (fine X is kept apart)
//! ```

use alloc::vec::Vec;

use log::{trace, warn};

use nes::nametable::{self, Mirroring};
use nes::ppu::{PpuCtrl, PpuPort, PpuStatus, RenderMask};

use crate::simulator::palette_index;

const ADDR_MASK: u16 = 0x3fff;

/// Scroll the PPU drew one frame with.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Shown {
    /// Vblanks before the frame.
    pub frame: u64,
    pub nametable: u8,
    pub x: u8,
    pub y: u8,
}

pub struct PpuBus {
    frame: u64,
    ctrl: PpuCtrl,
    mask: RenderMask,

    /// Address/scroll latch.
    t: u16,
    /// VRAM address `PPUDATA` goes to.
    v: u16,
    fine_x: u8,
    /// Second write of a `PPUSCROLL`/`PPUADDR` pair is next.
    second_write: bool,

    vram: [u8; 2 * nametable::SIZE],
    palette_ram: [u8; 0x20],
    mirroring: Mirroring,

    shown: Vec<Shown>,
}

impl Default for PpuBus {
    fn default() -> Self {
        Self::new(Mirroring::default())
    }
}

impl PpuBus {
    pub fn new(mirroring: Mirroring) -> Self {
        Self {
            frame: 0,
            ctrl: PpuCtrl::empty(),
            mask: RenderMask::empty(),
            t: 0,
            v: 0,
            fine_x: 0,
            second_write: false,
            vram: [0; 2 * nametable::SIZE],
            palette_ram: [0; 0x20],
            mirroring,
            shown: Vec::new(),
        }
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    #[inline]
    pub fn rendering(&self) -> RenderMask {
        self.mask
    }

    /// Every frame drawn with a layer on, oldest first.
    #[inline]
    pub fn shown(&self) -> &[Shown] {
        &self.shown
    }

    /// The scroll the next frame would be drawn with.
    pub fn pending_scroll(&self) -> Shown {
        let t = self.t;
        Shown {
            frame: self.frame,
            nametable: ((t >> 10) & 0b11) as u8,
            x: ((t & 0x1f) as u8) << 3 | self.fine_x,
            y: (((t >> 5) & 0x1f) as u8) << 3 | ((t >> 12) & 0b111) as u8,
        }
    }

    pub fn read_vram(&self, addr: u16) -> u8 {
        let addr = addr & ADDR_MASK;
        match addr {
            0x0000..=0x1fff => 0,
            0x2000..=0x3eff => self.vram[self.mirroring.fold(addr)],
            _ => self.palette_ram[palette_index(addr)],
        }
    }

    /// Tile index at (`x`, `y`) of nametable A.
    pub fn tile(&self, x: u8, y: u8) -> u8 {
        self.read_vram(nametable::ntadr_a(x, y))
    }

    /// The 16 background palette entries.
    pub fn palette(&self) -> [u8; 16] {
        let mut out = [0; 16];
        out.copy_from_slice(&self.palette_ram[..16]);
        out
    }
}

impl PpuPort for PpuBus {
    fn wait_nmi(&mut self) {
        if self.mask.is_rendering() {
            let shown = self.pending_scroll();
            trace!("frame {} drawn at {:?}", self.frame, shown);
            self.shown.push(shown);
        }
        self.frame += 1;
    }

    fn write_ctrl(&mut self, value: u8) {
        self.ctrl = PpuCtrl::from_bits_retain(value);
        let nametable = (self.ctrl & PpuCtrl::NAMETABLE).bits() as u16;
        self.t = (self.t & !0x0c00) | nametable << 10;
    }

    fn write_mask(&mut self, value: u8) {
        self.mask = RenderMask::from_bits_retain(value);
    }

    fn read_status(&mut self) -> u8 {
        self.second_write = false;
        PpuStatus::VBLANK.bits()
    }

    fn write_scroll(&mut self, value: u8) {
        let value = value as u16;
        if self.second_write {
            self.t = (self.t & !0x73e0) | (value & 0b111) << 12 | (value >> 3) << 5;
        } else {
            self.t = (self.t & !0x001f) | value >> 3;
            self.fine_x = (value & 0b111) as u8;
        }
        self.second_write = !self.second_write;
    }

    fn write_addr(&mut self, value: u8) {
        let value = value as u16;
        if self.second_write {
            self.t = (self.t & 0x7f00) | value;
            self.v = self.t;
        } else {
            // bit 14 is cleared by the high byte write
            self.t = (self.t & 0x00ff) | (value & 0x3f) << 8;
        }
        self.second_write = !self.second_write;
    }

    fn write_data(&mut self, value: u8) {
        let addr = self.v & ADDR_MASK;
        match addr {
            0x0000..=0x1fff => warn!("write to CHR-ROM at ${addr:04X} ignored"),
            0x2000..=0x3eff => self.vram[self.mirroring.fold(addr)] = value,
            _ => self.palette_ram[palette_index(addr)] = value & 0x3f,
        }
        let step = if self.ctrl.contains(PpuCtrl::VRAM_DOWN) { 32 } else { 1 };
        self.v = (self.v + step) & ADDR_MASK;
    }
}
