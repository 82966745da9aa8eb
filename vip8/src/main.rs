use std::path::PathBuf;

use clap::Parser;

use vip8_core::constants::{DEFAULT_CYCLES_PER_TICK, DEFAULT_DEBOUNCE_WINDOW};

mod audio;
mod keymap;
mod run;

#[derive(Parser, Debug)]
#[command(version, about = "CHIP-8 virtual machine")]
struct Args {
    /// Path to the CHIP-8 program image
    rom: PathBuf,

    /// CPU cycles executed per 60Hz tick
    #[arg(long, default_value_t = DEFAULT_CYCLES_PER_TICK)]
    cycles_per_tick: u32,

    /// Seed for the Cxnn random byte source; unseeded runs use entropy
    #[arg(long)]
    seed: Option<u64>,

    /// Cycles that must elapse before a new key press is accepted
    #[arg(long, default_value_t = DEFAULT_DEBOUNCE_WINDOW)]
    debounce_window: u32,

    /// Screen pixels per framebuffer pixel
    #[arg(long, default_value_t = 10)]
    scale: u32,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    run::run(&args)
}
