use nes::nametable::ntadr_a;
use nes::ppu::RenderMask;
use nes::video::Video;

use crate::assets::LOGO;
use crate::glow::GlowPalette;

/// The label, terminator included: it is written as the full C string.
pub const TEXT: &[u8] = b"No cart loaded\0";
/// Where the label starts, column 9 of row 8.
pub const TEXT_ADDR: u16 = ntadr_a(9, 8);
/// Vblanks [`init`] waits for, one per rendering switch.
pub const INIT_FRAMES: u32 = 2;

/// Draw the screen with rendering off, then switch both layers on.
///
/// Uploads `palette` as it is, so pass the state the choreography will start
/// from (normally [`GlowPalette::default`]). Takes [`INIT_FRAMES`] vblanks:
/// rendering is only switched at the start of one, so no frame is cut short.
pub fn init<V: Video + ?Sized>(video: &mut V, palette: &GlowPalette) {
    // VRAM is only writable while the PPU is not drawing
    video.wait_vblank();
    video.set_rendering(RenderMask::empty());

    video.set_palette(palette.palette());

    video.set_vram_addr(ntadr_a(0, 0));
    LOGO.unpack(video);

    video.set_vram_addr(TEXT_ADDR);
    video.write_vram(TEXT);

    video.wait_vblank();
    video.set_rendering(RenderMask::LAYERS);
}
