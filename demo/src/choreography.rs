//! # Choreography
//!
//! One pass through [`SEQUENCE`] takes [`ITERATION_FRAMES`] vblanks, about
//! nine seconds at 60 Hz. Durations are `delay_frames` arguments, so each
//! costs one frame more than it says.
//!
//! ```text
//! Hold 60 │ Ramp 3..=c │ Ramp 1..=3 │ Hold 60 │ Shake │ 4 Shake │ 30 Shake │ 4 Shake │ Hold 60 │ Flash ×5
//! ```

use nes::video::Video;

use crate::frames::{delay_cost, delay_frames};
use crate::glow::GlowPalette;
use crate::init::init;

/// Frames between color steps, in ramps and flashes.
const STEP_DELAY: u8 = 10;
/// Deepest scroll offset is one more than this, see [`shake`].
const SHAKE_DEPTH: u8 = 4;
/// Hue the flash blinks with.
const FLASH_HUE: u8 = 0x3;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// `delay_frames(n)`
    Hold(u8),
    /// Every hue from `from` to `to` inclusive, [`STEP_DELAY`] apart.
    Ramp { from: u8, to: u8 },
    /// An optional hold, then one [`shake`].
    Shake { lead_in: Option<u8> },
    /// Blink [`FLASH_HUE`] into glow and back, `times` times.
    Flash { times: u8 },
}

pub const SEQUENCE: [Phase; 10] = [
    Phase::Hold(60),
    Phase::Ramp { from: 0x3, to: 0xc },
    Phase::Ramp { from: 0x1, to: 0x3 },
    Phase::Hold(60),
    Phase::Shake { lead_in: None },
    Phase::Shake { lead_in: Some(4) },
    Phase::Shake { lead_in: Some(30) },
    Phase::Shake { lead_in: Some(4) },
    Phase::Hold(60),
    Phase::Flash { times: 5 },
];

/// Vblanks in one pass through [`SEQUENCE`].
pub const ITERATION_FRAMES: u32 = {
    let mut total = 0;
    let mut i = 0;
    while i < SEQUENCE.len() {
        total += SEQUENCE[i].frames();
        i += 1;
    }
    total
};

/// A color step: wait a frame to upload, then hold.
const COLOR_STEP_FRAMES: u32 = 1 + delay_cost(STEP_DELAY);
/// 0 through `SHAKE_DEPTH`, then `SHAKE_DEPTH + 1` down to 1, a frame per write.
const SHAKE_FRAMES: u32 = 2 * (SHAKE_DEPTH as u32 + 1);

impl Phase {
    /// Vblanks this phase waits for.
    pub const fn frames(&self) -> u32 {
        match *self {
            Phase::Hold(n) => delay_cost(n),
            Phase::Ramp { from, to } => {
                (to as u32 + 1).saturating_sub(from as u32) * COLOR_STEP_FRAMES
            }
            Phase::Shake { lead_in: None } => SHAKE_FRAMES,
            Phase::Shake { lead_in: Some(n) } => delay_cost(n) + SHAKE_FRAMES,
            // set, hold, set glow, hold, set
            Phase::Flash { times } => times as u32 * (2 * COLOR_STEP_FRAMES + 1),
        }
    }

    pub fn play<V: Video + ?Sized>(&self, video: &mut V, palette: &mut GlowPalette) {
        match *self {
            Phase::Hold(n) => delay_frames(video, n),
            Phase::Ramp { from, to } => {
                for hue in from..=to {
                    palette.set_color(video, hue, false);
                    delay_frames(video, STEP_DELAY);
                }
            }
            Phase::Shake { lead_in } => {
                if let Some(n) = lead_in {
                    delay_frames(video, n);
                }
                shake(video);
            }
            Phase::Flash { times } => {
                for _ in 0..times {
                    palette.set_color(video, FLASH_HUE, false);
                    delay_frames(video, STEP_DELAY);
                    palette.set_color(video, FLASH_HUE, true);
                    delay_frames(video, STEP_DELAY);
                    // the next phase's first wait is the trailing hold
                    palette.set_color(video, FLASH_HUE, false);
                }
            }
        }
    }
}

/// Nudge the background down and back up, one vblank per pixel.
///
/// The offset climbs 0 through 4, leaves the climb at 5 and is written on
/// the way down too, so the writes are `0 1 2 3 4 5 4 3 2 1`. The descent
/// stops at 1: the screen is left one pixel down. Returns the last offset
/// written.
pub fn shake<V: Video + ?Sized>(video: &mut V) -> u8 {
    let mut y = 0;
    while y <= SHAKE_DEPTH {
        video.wait_vblank();
        video.set_scroll(0, y);
        y += 1;
    }

    let mut last = y;
    while y >= 1 {
        video.wait_vblank();
        video.set_scroll(0, y);
        last = y;
        y -= 1;
    }
    last
}

/// Play [`SEQUENCE`] once.
pub fn run_iteration<V: Video + ?Sized>(video: &mut V, palette: &mut GlowPalette) {
    for phase in &SEQUENCE {
        phase.play(video, palette);
    }
}

/// Draw the screen and loop the choreography until power-off.
pub fn run<V: Video + ?Sized>(video: &mut V) -> ! {
    let mut palette = GlowPalette::default();
    init(video, &palette);
    loop {
        run_iteration(video, &mut palette);
    }
}
