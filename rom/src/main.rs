#![no_std]
#![no_main]

use nes::console::Console;

#[unsafe(no_mangle)]
fn main(console: &mut Console) -> ! {
    nocart::run(console)
}
