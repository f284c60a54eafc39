use alloc::string::String;
use alloc::vec::Vec;

use bit_field::BitField;
use log::{debug, trace, warn};

use nes::nametable::{self, Mirroring};
use nes::palette::Palette;
use nes::ppu::RenderMask;
use nes::video::Video;

use crate::events::{Stamped, VideoEvent};

/// PPU address space is 14 bits.
const ADDR_MASK: u16 = 0x3fff;

/// The PPU as a `Video` program sees it: nametable RAM, palette RAM, the
/// VRAM cursor, scroll and layer switches, and a frame counter advanced by
/// every vblank wait.
///
/// Pattern tables are CHR-ROM on the carts this models, so writes below
/// `$2000` are dropped with a warning.
pub struct Simulator {
    frame: u64,
    vram: [u8; 2 * nametable::SIZE],
    palette_ram: [u8; 0x20],
    cursor: u16,
    scroll: (u8, u8),
    mask: RenderMask,
    mirroring: Mirroring,

    recording: bool,
    events: Vec<Stamped>,
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new(Mirroring::default())
    }
}

impl Simulator {
    pub fn new(mirroring: Mirroring) -> Self {
        Self {
            frame: 0,
            vram: [0; 2 * nametable::SIZE],
            palette_ram: [0; 0x20],
            cursor: 0,
            scroll: (0, 0),
            mask: RenderMask::empty(),
            mirroring,
            recording: true,
            events: Vec::new(),
        }
    }

    /// Vblanks waited for so far.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// The 16 background palette entries as the PPU holds them.
    pub fn palette(&self) -> [u8; 16] {
        let mut out = [0; 16];
        out.copy_from_slice(&self.palette_ram[..16]);
        out
    }

    #[inline]
    pub fn scroll(&self) -> (u8, u8) {
        self.scroll
    }

    #[inline]
    pub fn rendering(&self) -> RenderMask {
        self.mask
    }

    #[inline]
    pub fn cursor(&self) -> u16 {
        self.cursor
    }

    #[inline]
    pub fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    /// Read a byte of nametable or palette memory. Pattern tables read as 0.
    pub fn read_vram(&self, addr: u16) -> u8 {
        let addr = addr & ADDR_MASK;
        match addr {
            0x0000..=0x1fff => 0,
            0x2000..=0x3eff => self.vram[self.mirroring.fold(addr)],
            _ => self.palette_ram[palette_index(addr)],
        }
    }

    /// The 1 KiB behind the nametable at `base`, tiles then attributes.
    pub fn nametable(&self, base: u16) -> &[u8] {
        let start = self.mirroring.fold(base & !(nametable::SIZE as u16 - 1));
        &self.vram[start..start + nametable::SIZE]
    }

    /// Tile index at (`x`, `y`) of nametable A.
    pub fn tile(&self, x: u8, y: u8) -> u8 {
        self.read_vram(nametable::ntadr_a(x, y))
    }

    /// Nametable A as text, one line per tile row. Tiles in the printable
    /// ASCII range show as themselves, 0 as a space, anything else as `#`.
    pub fn screen_text(&self) -> String {
        let tiles = &self.nametable(nametable::NAMETABLE_A)[..nametable::ATTRIBUTES as usize];
        let mut out = String::with_capacity(tiles.len() + nametable::HEIGHT as usize);
        for row in tiles.chunks(nametable::WIDTH as usize) {
            for &tile in row {
                out.push(match tile {
                    0 => ' ',
                    0x20..=0x7e => tile as char,
                    _ => '#',
                });
            }
            out.push('\n');
        }
        out
    }

    /// Stop or resume recording events. Frames are counted either way.
    pub fn set_recording(&mut self, recording: bool) {
        self.recording = recording;
    }

    #[inline]
    pub fn events(&self) -> &[Stamped] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<Stamped> {
        core::mem::take(&mut self.events)
    }

    fn record(&mut self, event: VideoEvent) {
        trace!("frame {}: {}", self.frame, event);
        if self.recording {
            self.events.push(Stamped { frame: self.frame, event });
        }
    }

    /// Write at the cursor and advance it. Returns false for dropped writes.
    fn poke(&mut self, value: u8) -> bool {
        let addr = self.cursor;
        self.cursor = (self.cursor + 1) & ADDR_MASK;
        match addr {
            0x0000..=0x1fff => false,
            0x2000..=0x3eff => {
                self.vram[self.mirroring.fold(addr)] = value;
                true
            }
            _ => {
                self.palette_ram[palette_index(addr)] = value & 0x3f;
                true
            }
        }
    }

    fn write_run(&mut self, bytes: impl Iterator<Item = u8>) {
        let start = self.cursor;
        let mut len = 0;
        let mut dropped = 0;
        for byte in bytes {
            len += 1;
            if !self.poke(byte) {
                dropped += 1;
            }
        }
        if dropped > 0 {
            warn!("{dropped} writes to CHR-ROM at ${start:04X} ignored");
        }
        self.record(VideoEvent::VramWrite { addr: start, len });
    }
}

/// Palette RAM index for `addr` in `$3F00-$3FFF`. The sprite backdrops at
/// `$3F10/$3F14/$3F18/$3F1C` are the background ones.
pub(crate) fn palette_index(addr: u16) -> usize {
    let mut index = addr.get_bits(0..5);
    if index.get_bits(0..2) == 0 {
        index.set_bit(4, false);
    }
    index as usize
}

impl Video for Simulator {
    fn wait_vblank(&mut self) {
        self.frame += 1;
    }

    fn set_rendering(&mut self, layers: RenderMask) {
        self.mask.remove(RenderMask::LAYERS);
        self.mask.insert(layers & RenderMask::LAYERS);
        debug!("rendering now {:?}", self.mask);
        self.record(VideoEvent::Rendering(self.mask));
    }

    fn set_palette(&mut self, palette: &Palette) {
        self.palette_ram[..16].copy_from_slice(palette.entries());
        self.record(VideoEvent::Palette(*palette.entries()));
    }

    fn set_vram_addr(&mut self, addr: u16) {
        self.cursor = addr & ADDR_MASK;
        self.record(VideoEvent::VramAddr(self.cursor));
    }

    fn write_vram(&mut self, bytes: &[u8]) {
        self.write_run(bytes.iter().copied());
    }

    fn fill_vram(&mut self, value: u8, len: usize) {
        self.write_run(core::iter::repeat(value).take(len));
    }

    fn set_scroll(&mut self, x: u8, y: u8) {
        self.scroll = (x, y);
        self.record(VideoEvent::Scroll { x, y });
    }
}
