use std::{env, fs::File, io::Write, path::Path};

/// NROM-256: 32 KiB of PRG at $8000, the last 6 bytes for the vectors.
const PRG_ORIGIN: u32 = 0x8000;
const VECTORS: u32 = 0xfffa;
/// Zero page above the imaginary registers.
const ZP_ORIGIN: u32 = 0x40;
/// Work RAM past the hardware stack and the OAM page. The soft stack
/// grows down from $07FF into whatever .data and .bss leave.
const RAM_ORIGIN: u32 = 0x0300;
const RAM_END: u32 = 0x0800;
/// Imaginary registers the compiler expects in zero page.
const RC_COUNT: u32 = 64;

fn main() {
    // Only run for the correct target
    let target = env::var("TARGET").unwrap_or_default();
    if target != "mos-unknown-none" {
        println!(
            "cargo:warning=Not targeting mos-unknown-none; skipping linker script generation."
        );
        return;
    }

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is not set");
    let link_path = Path::new(&out_dir).join("linker.ld");
    let f = File::create(&link_path).expect("failed to create linker.ld");
    write_linker_script(f).expect("failed to write linker.ld");

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rustc-link-arg=-T{}", link_path.display());
}

fn write_linker_script(mut f: impl Write) -> std::io::Result<()> {
    writeln!(f, "MEMORY {{")?;
    writeln!(
        f,
        "  PRG (rx) : ORIGIN = 0x{PRG_ORIGIN:04X}, LENGTH = 0x{:04X}",
        VECTORS - PRG_ORIGIN
    )?;
    writeln!(f, "  VECTOR_TABLE (r) : ORIGIN = 0x{VECTORS:04X}, LENGTH = 6")?;
    writeln!(
        f,
        "  ZP (rw) : ORIGIN = 0x{ZP_ORIGIN:04X}, LENGTH = 0x{:04X}",
        0x100 - ZP_ORIGIN
    )?;
    writeln!(
        f,
        "  RAM (rw) : ORIGIN = 0x{RAM_ORIGIN:04X}, LENGTH = 0x{:04X}",
        RAM_END - RAM_ORIGIN
    )?;
    writeln!(f, "}}")?;

    writeln!(f, "SECTIONS {{")?;
    writeln!(f, "  .text : {{ *(.text*) }} > PRG = 0xFF")?;
    writeln!(f, "  .rodata : {{ *(.rodata*) }} > PRG")?;
    writeln!(f, "  .vector_table : {{ KEEP(*(.vector_table)) }} > VECTOR_TABLE")?;
    writeln!(f, "  .bss : {{ __bss_start = .; *(.bss*) __bss_end = .; }} > RAM")?;
    writeln!(
        f,
        "  .zp : {{ __zp_start = .; KEEP(*(.data.zp)) __zp_end = .; }} > ZP AT > PRG"
    )?;
    writeln!(
        f,
        "  .data : {{ __data_start = .; *(.data*) __data_end = .; }} > RAM AT > PRG"
    )?;

    writeln!(f, "  PROVIDE(__zp_load = LOADADDR(.zp));")?;
    writeln!(f, "  PROVIDE(__data_load = LOADADDR(.data));")?;
    writeln!(f, "}}")?;

    for rc in 0..RC_COUNT {
        writeln!(f, "__rc{rc} = 0x{rc:02X};")?;
    }
    Ok(())
}
