use std::path::PathBuf;

use clap::{Parser, Subcommand};
use hyperspeed_common::SeededRandom;
use hyperspeed_config::TunnelConfig;
use hyperspeed_geometry::TunnelGeometry;
use hyperspeed_kernel::ManualClock;
use hyperspeed_render::HeadlessBackend;
use hyperspeed_tunnel::{ManualHost, Tunnel};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hyperspeed-cli", about = "CLI tool for the light tunnel")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Tunnel configuration file (YAML, or JSON by extension)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Print the effective configuration as YAML
    Config,
    /// Generate tunnel geometry and summarize or dump it
    Generate {
        /// RNG seed
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Dump every instance buffer as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the frame loop against a headless backend
    Simulate {
        /// Number of frames to run
        #[arg(short, long, default_value = "300")]
        frames: u32,
        /// Simulated frame rate
        #[arg(long, default_value = "60")]
        fps: f32,
        /// Hold speed-up for the whole run
        #[arg(long)]
        speed_up: bool,
        /// RNG seed
        #[arg(short, long, default_value = "42")]
        seed: u64,
    },
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<TunnelConfig> {
    Ok(match path {
        Some(path) => TunnelConfig::load(path)?,
        None => TunnelConfig::default(),
    })
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Info => {
            println!("hyperspeed-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", hyperspeed_common::crate_info());
            println!("config: {}", hyperspeed_config::crate_info());
            println!("geometry: {}", hyperspeed_geometry::crate_info());
            println!("render: {}", hyperspeed_render::crate_info());
            println!("tunnel: {}", hyperspeed_tunnel::crate_info());
        }
        Commands::Config => {
            print!("{}", config.to_yaml()?);
        }
        Commands::Generate { seed, json } => {
            let geometry = TunnelGeometry::generate(&config, &mut SeededRandom::new(seed));
            if json {
                let dump = serde_json::json!({
                    "seed": seed,
                    "moving_away": &geometry.moving_away.instances,
                    "moving_closer": &geometry.moving_closer.instances,
                    "side_sticks": &geometry.side_sticks.instances,
                });
                println!("{}", serde_json::to_string_pretty(&dump)?);
            } else {
                println!("Generated tunnel: seed={seed}, length={}", config.length);
                println!(
                    "Car lights: {} moving away, {} moving closer",
                    geometry.moving_away.instances.len(),
                    geometry.moving_closer.instances.len()
                );
                println!("Side sticks: {}", geometry.side_sticks.instances.len());
                for surface in geometry.road.iter() {
                    println!(
                        "Surface {:?} (road={}): {} vertices, {} triangles",
                        surface.side,
                        surface.is_road,
                        surface.mesh.vertex_count(),
                        surface.mesh.triangle_count()
                    );
                }
            }
        }
        Commands::Simulate {
            frames,
            fps,
            speed_up,
            seed,
        } => {
            anyhow::ensure!(fps.is_finite() && fps > 0.0, "fps must be positive, got {fps}");
            let mut tunnel = Tunnel::new(
                config,
                HeadlessBackend::new(1280, 720),
                ManualHost::new(1280, 720),
                ManualClock::at_fps(fps),
            )?;
            tunnel.set_speed_up(speed_up);
            tunnel.init_with(&mut SeededRandom::new(seed))?;

            // init already ran the first frame
            for _ in 1..frames {
                if tunnel.host_mut().take_pending().is_none() {
                    break;
                }
                tunnel.tick();
            }

            let state = tunnel.state();
            println!("Simulated {frames} frames at {fps} fps (speed_up={speed_up})");
            println!(
                "speed={:.5} fov={:.3} time_offset={:.4}",
                state.speed(),
                state.fov(),
                state.time_offset()
            );
            println!("{}", tunnel.scene().backend().describe());
            tunnel.dispose();
        }
    }

    Ok(())
}
