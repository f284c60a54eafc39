use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use nes::nametable::Mirroring;
use nesrom::ines::{self, Header};
use nesrom::prg::{PRG_SIZE, Prg};

#[derive(Parser)]
#[command(name = "nesrom")]
#[command(version, about = "NES cartridge image tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum MirroringArg {
    Vertical,
    Horizontal,
}

impl From<MirroringArg> for Mirroring {
    fn from(value: MirroringArg) -> Self {
        match value {
            MirroringArg::Vertical => Mirroring::Vertical,
            MirroringArg::Horizontal => Mirroring::Horizontal,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a linked ELF binary to a .nes image
    Pack {
        /// Path to the ELF binary
        elf_path: PathBuf,

        /// Pattern table data, a multiple of 8 KiB (CHR RAM when omitted)
        #[arg(long)]
        chr: Option<PathBuf>,

        /// Output .nes file path (defaults to the ELF path with .nes)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Nametable mirroring the cartridge is wired for
        #[arg(long, value_enum, default_value_t = MirroringArg::Vertical)]
        mirroring: MirroringArg,
    },

    /// Print the header of a .nes image
    Info {
        /// Path to the .nes image
        path: PathBuf,
    },
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .init();
}

fn print_prg(prg: &Prg) {
    for s in &prg.sections {
        println!("{s}");
    }
    println!("reset ${:04X}, {} of {} bytes free", prg.reset_vector(), prg.free(), PRG_SIZE);
}

fn print_header(header: &Header) {
    println!("mapper:    {}", header.mapper);
    println!("PRG ROM:   {} KiB", header.prg_len() / 1024);
    if header.uses_chr_ram() {
        println!("CHR:       RAM");
    } else {
        println!("CHR ROM:   {} KiB", header.chr_len() / 1024);
    }
    println!("mirroring: {:?}", header.mirroring);
    println!("battery:   {}", header.battery);
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging();

    match cli.command {
        Commands::Pack { elf_path, chr, output, mirroring } => {
            let output = output.unwrap_or_else(|| elf_path.with_extension("nes"));
            let image = nesrom::pack_file(&elf_path, chr.as_deref(), &output, mirroring.into())?;
            print_prg(&image.prg);
            println!("Created: {}", output.display());
        }
        Commands::Info { path } => {
            let bytes =
                std::fs::read(&path).with_context(|| format!("could not read {}", path.display()))?;
            let header = Header::parse(&bytes)
                .with_context(|| format!("{} is not an iNES image", path.display()))?;
            print_header(&header);

            let expected = ines::HEADER_LEN + header.prg_len() + header.chr_len();
            if bytes.len() != expected {
                println!("size:      {} bytes, header says {expected}", bytes.len());
            }
        }
    }

    Ok(())
}
