use nes::video::Video;

/// Wait for `count + 1` vertical blanks.
///
/// The bound is inclusive, so `delay_frames(video, 0)` still waits one
/// frame. All of the choreography's timing is built on this.
pub fn delay_frames<V: Video + ?Sized>(video: &mut V, count: u8) {
    for _ in 0..=count {
        video.wait_vblank();
    }
}

/// Vblanks consumed by `delay_frames(_, count)`.
#[inline]
pub const fn delay_cost(count: u8) -> u32 {
    count as u32 + 1
}
