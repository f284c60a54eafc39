use core::fmt::{Display, Formatter};

use nes::ppu::RenderMask;

/// A write the program made through `Video`. Vblank waits are not events,
/// they advance the frame counter instead.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VideoEvent {
    Rendering(RenderMask),
    Palette([u8; 16]),
    VramAddr(u16),
    /// `len` bytes written starting at `addr`.
    VramWrite { addr: u16, len: usize },
    Scroll { x: u8, y: u8 },
}

/// An event and the frame it happened in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Stamped {
    pub frame: u64,
    pub event: VideoEvent,
}

impl Display for VideoEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            VideoEvent::Rendering(mask) => write!(
                f,
                "rendering bg={} sprites={}",
                mask.contains(RenderMask::BACKGROUND),
                mask.contains(RenderMask::SPRITES)
            ),
            VideoEvent::Palette(entries) => {
                f.write_str("palette")?;
                for e in entries {
                    write!(f, " {e:02x}")?;
                }
                Ok(())
            }
            VideoEvent::VramAddr(addr) => write!(f, "vram_adr ${addr:04X}"),
            VideoEvent::VramWrite { addr, len } => write!(f, "vram_write ${addr:04X} +{len}"),
            VideoEvent::Scroll { x, y } => write!(f, "scroll {x},{y}"),
        }
    }
}

impl Display for Stamped {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "[{:>6}] {}", self.frame, self.event)
    }
}
