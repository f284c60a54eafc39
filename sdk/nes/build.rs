use std::{env, path::PathBuf, process::Command};

use anyhow::{self, Context};

const VECTORS_ASM: &str = "src/asm/vectors.s";

fn main() {
    println!("cargo:rerun-if-changed={VECTORS_ASM}");

    // Only the console needs the interrupt handlers
    let target = env::var("TARGET").unwrap_or_default();
    if target != "mos-unknown-none" {
        return;
    }

    assemble_vectors().expect("Failed to assemble interrupt vectors");
}

fn assemble_vectors() -> anyhow::Result<()> {
    let out_dir: PathBuf = env::var("OUT_DIR").context("OUT_DIR is not set")?.into();
    let object = out_dir.join("vectors.o");
    let archive = out_dir.join("libnesvectors.a");

    Command::new("llvm-mc")
        .args(["--filetype=obj", "-triple=mos", "-mcpu=mos6502"])
        .arg(VECTORS_ASM)
        .arg("-o")
        .arg(&object)
        .status()
        .context("Failed to run llvm-mc")
        .and_then(exit_ok)
        .context("Failed to assemble vectors.s")?;

    Command::new("llvm-ar")
        .arg("rcs")
        .arg(&archive)
        .arg(&object)
        .status()
        .context("Failed to run llvm-ar")
        .and_then(exit_ok)
        .context("Failed to archive vectors.o")?;

    println!("cargo:rustc-link-search=native={}", out_dir.display());
    println!("cargo:rustc-link-lib=static=nesvectors");
    Ok(())
}

fn exit_ok(status: std::process::ExitStatus) -> anyhow::Result<()> {
    if status.success() {
        Ok(())
    } else {
        Err(anyhow::format_err!("Exited with status {}", status.code().unwrap_or(-1)))
    }
}
