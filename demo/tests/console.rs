//! The demo on `Console` itself, with its register writes going to a
//! register-level PPU model instead of `$2000`.

use nes::console::Console;
use nes::ppu::RenderMask;
use nes::video::Video;
use nes_sim_core::{PpuBus, Shown};
use nocart::{
    init, run_iteration, GlowPalette, INITIAL_PALETTE, INIT_FRAMES, ITERATION_FRAMES, TEXT_ADDR,
};

fn console() -> Console<PpuBus> {
    Console::with_port(PpuBus::default())
}

fn scroll(shown: &Shown) -> (u8, u8, u8) {
    (shown.x, shown.y, shown.nametable)
}

#[test]
fn first_frame_after_init_is_unscrolled() {
    let mut console = console();
    init(&mut console, &GlowPalette::default());
    console.wait_vblank();

    let shown = console.port().shown();
    assert_eq!(shown.len(), 1);
    assert_eq!(scroll(&shown[0]), (0, 0, 0));
}

#[test]
fn label_write_does_not_leak_into_the_scroll() {
    let mut console = console();
    init(&mut console, &GlowPalette::default());

    // PPUADDR was last pointed at the label
    assert_eq!(TEXT_ADDR, 0x2109);
    assert_eq!(scroll(&console.port().pending_scroll()), (0, 0, 0));
}

#[test]
fn opening_hold_is_unscrolled() {
    let mut console = console();
    let mut palette = GlowPalette::default();
    init(&mut console, &palette);
    run_iteration(&mut console, &mut palette);

    let shown = console.port().shown();
    assert_eq!(shown.len(), ITERATION_FRAMES as usize);
    // hold, both ramps, hold: everything before the first shake
    for frame in &shown[..61 + 120 + 36 + 61] {
        assert_eq!(scroll(frame), (0, 0, 0), "frame {}", frame.frame);
    }
}

#[test]
fn whole_iteration_stays_on_nametable_a_and_within_the_shake() {
    let mut console = console();
    let mut palette = GlowPalette::default();
    init(&mut console, &palette);
    run_iteration(&mut console, &mut palette);
    run_iteration(&mut console, &mut palette);

    let shown = console.port().shown();
    assert!(shown.iter().all(|s| s.x == 0 && s.nametable == 0));
    assert_eq!(shown.iter().map(|s| s.y).max(), Some(5));
    assert_eq!(shown.last().map(|s| s.y), Some(1));
}

#[test]
fn palette_upload_keeps_the_shaken_scroll() {
    let mut console = console();
    init(&mut console, &GlowPalette::default());
    console.set_scroll(0, 3);
    console.set_palette(&INITIAL_PALETTE);
    assert_eq!(scroll(&console.port().pending_scroll()), (0, 3, 0));
}

#[test]
fn init_draws_through_the_registers() {
    let mut console = console();
    init(&mut console, &GlowPalette::default());

    let bus = console.port();
    assert_eq!(&bus.palette(), INITIAL_PALETTE.entries());
    let row: Vec<u8> = (9..24).map(|x| bus.tile(x, 8)).collect();
    assert_eq!(row, b"No cart loaded\0");
    assert!(bus.rendering().contains(RenderMask::LAYERS));
    assert_eq!(bus.frame(), INIT_FRAMES as u64);
}
