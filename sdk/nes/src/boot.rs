use core::panic::PanicInfo;
use core::ptr;

use crate::console::Console;
use crate::ppu::PpuStatus;

unsafe extern "Rust" {
    unsafe fn main(console: &mut Console) -> !;
}

#[panic_handler]
fn panic(_panic: &PanicInfo<'_>) -> ! {
    loop {}
}

unsafe extern "C" {
    /// `inc NMI_FRAMES; rti`, see `src/asm/vectors.s`.
    pub unsafe fn nmi();

    /// `rti`
    pub unsafe fn irq();

    pub unsafe static mut __rc0: u8;
    pub unsafe static mut __rc1: u8;

    unsafe static __data_load: u8;
    unsafe static mut __data_start: u8;
    unsafe static mut __data_end: u8;

    unsafe static __zp_load: u8;
    unsafe static mut __zp_start: u8;
    unsafe static mut __zp_end: u8;

    unsafe static mut __bss_start: u8;
    unsafe static mut __bss_end: u8;
}

const PPUCTRL: *mut u8 = 0x2000 as *mut u8;
const PPUMASK: *mut u8 = 0x2001 as *mut u8;
const PPUSTATUS: *const u8 = 0x2002 as *const u8;
/// APU frame counter; bit 6 inhibits its IRQ.
const APU_FRAME: *mut u8 = 0x4017 as *mut u8;
const DMC_FREQ: *mut u8 = 0x4010 as *mut u8;

#[inline(always)]
unsafe fn init_data_and_bss() {
    unsafe {
        // Copy .data from PRG-ROM to RAM
        let mut src = &__data_load as *const u8;
        let mut dst = &raw mut __data_start as *mut u8;
        let end = &raw mut __data_end as *mut u8;
        while dst < end {
            dst.write_volatile(src.read_volatile());
            src = src.add(1);
            dst = dst.add(1);
        }

        // Zero .bss
        let mut bss = &raw mut __bss_start as *mut u8;
        let bss_end = &raw mut __bss_end as *mut u8;
        while bss < bss_end {
            bss.write_volatile(0);
            bss = bss.add(1);
        }

        // Copy .zp load to zp
        let mut src = &__zp_load as *const u8;
        let mut dst = &raw mut __zp_start as *mut u8;
        let end = &raw mut __zp_end as *mut u8;
        while dst < end {
            dst.write_volatile(src.read_volatile());
            src = src.add(1);
            dst = dst.add(1);
        }
    }
}

#[unsafe(link_section = ".vector_table")]
#[unsafe(no_mangle)]
pub static _VECTOR_TABLE: [unsafe extern "C" fn(); 3] = [
    nmi,    // Non-Maskable Interrupt vector
    __boot, // Reset vector
    irq,    // IRQ/BRK vector
];

#[inline(never)]
fn call_main() -> ! {
    let console = &mut Console::init();
    unsafe { main(console) }
}

#[unsafe(no_mangle)]
unsafe extern "C" fn __boot() {
    unsafe {
        quiet_hardware();
        init_stack();
        wait_vblank_flag();
        init_data_and_bss();
        // the PPU ignores writes until the second vblank after power-on
        wait_vblank_flag();

        // Console::init touches the soft stack, which only exists now.
        // Keep it out of __boot by calling through a never-inlined function.
        call_main();
    }
}

/// No NMIs, no rendering, no APU interrupts until we are set up.
#[inline(always)]
unsafe fn quiet_hardware() {
    unsafe {
        ptr::write_volatile(PPUCTRL, 0);
        ptr::write_volatile(PPUMASK, 0);
        ptr::write_volatile(APU_FRAME, 0x40);
        ptr::write_volatile(DMC_FREQ, 0);
    }
}

/// Poll `PPUSTATUS` until vblank starts. Only for boot, before NMIs are on.
#[inline(always)]
unsafe fn wait_vblank_flag() {
    unsafe {
        while ptr::read_volatile(PPUSTATUS) & PpuStatus::VBLANK.bits() == 0 {}
    }
}

/// Soft stack grows down from the top of the 2 KiB of work RAM.
#[inline(always)]
unsafe fn init_stack() {
    unsafe { __rc0 = 0xFF };
    unsafe { __rc1 = 0x07 }
}
