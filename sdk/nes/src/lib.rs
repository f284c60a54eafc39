#![no_std]
#![allow(static_mut_refs)]

//! # NES hardware abstraction
//!
//! Everything a program needs to drive the NES picture processing unit:
//!
//! | Module        | Use For                                                   |
//! |---------------|-----------------------------------------------------------|
//! | [`video`]     | The [`Video`](video::Video) trait programs are written against |
//! | [`console`]   | [`Console`](console::Console), the real register backend  |
//! | [`ppu`]       | Register layout at `$2000-$2007` and its flag types       |
//! | [`palette`]   | Checked 16-entry background palettes                      |
//! | [`nametable`] | Tile addressing on the 32×30 grid                         |
//! | [`rle`]       | Compressed nametable streams (`vram_unrle` format)        |
//!
//! On `mos` targets [`boot`] also provides the reset code and vector table,
//! and calls your `main(console: &mut Console) -> !`.

#[cfg(target_arch = "mos")]
pub mod boot;
pub mod console;
pub mod nametable;
pub mod palette;
pub mod ppu;
pub mod rle;
pub mod video;
