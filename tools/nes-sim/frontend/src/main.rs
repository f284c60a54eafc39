use anyhow::ensure;
use clap::{Parser, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use nes::nametable::Mirroring;
use nes_sim_core::Simulator;
use nocart::{init, run_iteration, GlowPalette, ITERATION_FRAMES};

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

#[derive(Parser)]
#[command(name = "nes-sim")]
#[command(version, about = "Run the \"No cart loaded\" screen on a simulated PPU", long_about = None)]
struct Cli {
    /// Passes through the choreography after drawing the screen
    #[arg(short, long, default_value_t = 1)]
    iterations: u32,

    /// Print every PPU write with the frame it happened in
    #[arg(short, long)]
    trace: bool,

    /// Dump nametable A as text when done
    #[arg(short, long)]
    screen: bool,

    /// Nametable mirroring of the simulated cartridge
    #[arg(long, value_enum, default_value_t = MirroringArg::Vertical)]
    mirroring: MirroringArg,
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging();

    let mut sim = Simulator::new(cli.mirroring.into());
    sim.set_recording(cli.trace);
    let mut palette = GlowPalette::default();

    init(&mut sim, &palette);
    info!("screen drawn at frame {}", sim.frame());
    let start = sim.frame();

    for i in 0..cli.iterations {
        run_iteration(&mut sim, &mut palette);
        debug!("iteration {} done at frame {}", i + 1, sim.frame());
        for event in sim.take_events() {
            println!("{event}");
        }
    }
    // init's writes when there were no iterations
    for event in sim.take_events() {
        println!("{event}");
    }

    let elapsed = sim.frame() - start;
    let expected = u64::from(ITERATION_FRAMES) * u64::from(cli.iterations);
    ensure!(
        elapsed == expected,
        "{} iterations took {elapsed} frames, expected {expected}",
        cli.iterations
    );

    let (x, y) = sim.scroll();
    println!("frames:  {elapsed} ({} per iteration)", ITERATION_FRAMES);
    print!("palette:");
    for entry in sim.palette() {
        print!(" {entry:02x}");
    }
    println!();
    println!("scroll:  {x},{y}");

    if cli.screen {
        print!("{}", sim.screen_text());
    }

    Ok(())
}
