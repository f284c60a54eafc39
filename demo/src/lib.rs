#![no_std]

//! The screen shown when the console boots without a cartridge.
//!
//! After [`init`] draws the logo and the "No cart loaded" label, [`run`]
//! plays the same 545-frame choreography forever:
//!
//! | Phase                 | Effect                                        |
//! |-----------------------|-----------------------------------------------|
//! | [`Phase::Hold`]       | nothing, just time passing                    |
//! | [`Phase::Ramp`]       | walk the glow slots through a run of hues     |
//! | [`Phase::Shake`]      | nudge the background down 5px and back to 1px |
//! | [`Phase::Flash`]      | blink hue 3 between normal and glowing        |
//!
//! Every function takes the hardware as `&mut impl Video`, so the whole
//! thing runs the same on the console and in `nes-sim`.

mod assets;
pub mod choreography;
pub mod frames;
pub mod glow;
pub mod init;

pub use choreography::{run, run_iteration, shake, Phase, ITERATION_FRAMES, SEQUENCE};
pub use frames::delay_frames;
pub use glow::{GlowPalette, INITIAL_PALETTE};
pub use init::{init, INIT_FRAMES, TEXT, TEXT_ADDR};
