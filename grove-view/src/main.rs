//! Command-line host: runs the growth competition and exports numbered PNG
//! stills and animated GIFs.

mod export;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use grove_core::config::{Config, SnapshotMode};
use grove_core::engine::ResourceScaling;
use grove_core::sim::Simulation;
use grove_core::types::EMPTY;
use image::RgbaImage;

use crate::render::RenderOptions;

#[derive(Parser)]
#[command(name = "grove", version, about = "Competing plant growth on a 2-D grid")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a simulation and export its frames
    Run(RunArgs),
    /// Re-encode a directory of numbered stills as a GIF
    Gif(GifArgs),
}

#[derive(clap::Args)]
struct RunArgs {
    /// Grid width in cells
    #[arg(long, default_value = "200")]
    width: u32,
    /// Grid height in cells
    #[arg(long, default_value = "30")]
    height: u32,
    /// Number of ticks to simulate
    #[arg(short, long, default_value = "15")]
    ticks: u32,
    /// Plants growing in uniformly random directions
    #[arg(long, default_value = "10")]
    random_plants: usize,
    /// Plants preferring branch growth
    #[arg(long, default_value = "10")]
    branchers: usize,
    /// Plants growing toward the left edge
    #[arg(long, default_value = "0")]
    left_plants: usize,
    /// Plants growing toward the right edge
    #[arg(long, default_value = "0")]
    right_plants: usize,
    /// Plants growing toward the sky
    #[arg(long, default_value = "0")]
    up_plants: usize,
    /// Let branches grow through existing leaves
    #[arg(long)]
    ignore_leaves: bool,
    /// Damp budgets as floor(sqrt(2 * light))
    #[arg(long)]
    sqrt_scaling: bool,
    /// Keep only the final frame
    #[arg(long)]
    final_only: bool,
    /// Jitter plant colours so same-strategy plants differ
    #[arg(long)]
    color_jitter: bool,
    /// RNG seed; omit for a random one
    #[arg(short, long)]
    seed: Option<u64>,
    /// Animated GIF output path
    #[arg(long, default_value = "grove.gif")]
    gif: PathBuf,
    /// Skip the GIF
    #[arg(long)]
    no_gif: bool,
    /// Directory for numbered PNG stills
    #[arg(long)]
    frames_dir: Option<PathBuf>,
    /// Square pixel size of one cell
    #[arg(long, default_value = "6")]
    cell_size: u32,
    /// GIF frames per second
    #[arg(long, default_value = "30")]
    fps: u32,
    /// Do not lighten cells grown in the current tick
    #[arg(long)]
    no_highlight: bool,
}

#[derive(clap::Args)]
struct GifArgs {
    /// Directory of numbered still images
    #[arg(short, long)]
    dir: PathBuf,
    /// Output GIF path
    #[arg(short, long, default_value = "grove.gif")]
    out: PathBuf,
    /// GIF frames per second
    #[arg(long, default_value = "30")]
    fps: u32,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => run(args),
        Command::Gif(args) => encode_dir(args),
    }
}

fn run(args: RunArgs) -> Result<()> {
    let cfg = Config {
        width: args.width,
        height: args.height,
        ticks: args.ticks,
        random_plants: args.random_plants,
        branchers: args.branchers,
        left_plants: args.left_plants,
        right_plants: args.right_plants,
        up_plants: args.up_plants,
        ignore_leaves: args.ignore_leaves,
        scaling: if args.sqrt_scaling {
            ResourceScaling::Sqrt
        } else {
            ResourceScaling::Linear
        },
        snapshots: if args.final_only {
            SnapshotMode::FinalOnly
        } else {
            SnapshotMode::EveryTick
        },
        color_jitter: args.color_jitter,
        seed: args.seed,
    };
    let ticks = cfg.ticks;

    let mut sim = Simulation::new(cfg)?;
    println!(
        "=== {}x{} grove, {} plants, seed {} ===",
        args.width,
        args.height,
        sim.state().plants.len(),
        sim.seed()
    );
    sim.run(ticks);

    let alive = sim.state().plants.iter().filter(|p| p.alive).count();
    let occupied = sim
        .state()
        .grid
        .cells()
        .iter()
        .filter(|&&c| c != EMPTY)
        .count();
    println!("Ticks run:    {}", sim.ticks_run());
    println!("Plants alive: {alive}/{}", sim.state().plants.len());
    println!("Cells grown:  {occupied}");

    let opts = RenderOptions {
        cell_size: args.cell_size,
        highlight_fresh: !args.no_highlight,
    };
    let images: Vec<RgbaImage> = sim
        .frames()
        .iter()
        .map(|frame| render::render(frame, &sim.state().plants, &opts))
        .collect();

    if let Some(dir) = &args.frames_dir {
        export::save_frames(dir, &images)?;
        println!("Stills:       {}", dir.display());
    }
    if !args.no_gif {
        export::write_gif(&args.gif, images, args.fps)?;
        println!("GIF:          {}", args.gif.display());
    }
    Ok(())
}

fn encode_dir(args: GifArgs) -> Result<()> {
    export::write_gif_from_dir(&args.dir, &args.out, args.fps)?;
    println!("GIF:          {}", args.out.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_defaults_match_the_classic_setup() {
        let cli = Cli::parse_from(["grove", "run"]);
        let Command::Run(args) = cli.command else {
            panic!("expected run subcommand");
        };
        assert_eq!((args.width, args.height, args.ticks), (200, 30, 15));
        assert_eq!((args.random_plants, args.branchers), (10, 10));
        assert!(!args.ignore_leaves && !args.sqrt_scaling && !args.final_only);
        assert_eq!(args.seed, None);
    }

    #[test]
    fn gif_subcommand_parses_paths() {
        let cli = Cli::parse_from([
            "grove", "gif", "--dir", "stills", "--out", "x.gif", "--fps", "12",
        ]);
        let Command::Gif(args) = cli.command else {
            panic!("expected gif subcommand");
        };
        assert_eq!(args.dir, PathBuf::from("stills"));
        assert_eq!(args.out, PathBuf::from("x.gif"));
        assert_eq!(args.fps, 12);
    }
}
