//! pose_orb — interactive entry point.

use anyhow::{bail, Result};
use log::info;

use orb_core::OrbConfig;
use pose_orb::app::{self, AppConfig, SourceKind};

fn main() -> Result<()> {
    env_logger::init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║        Pose Orb — pulsating pose-reactive particle ring      ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let config = parse_args()?;

    match &config.source {
        SourceKind::Sim => {
            println!("  Mode: simulated figure  (use --source stdin|<file> for a real model)");
        }
        SourceKind::Stdin => println!("  Mode: external pose stream on stdin"),
        SourceKind::File(path) => println!("  Mode: external pose stream from {}", path),
    }
    println!();
    println!("  Opening visualizer window…");
    println!();

    app::run(config)
}

fn parse_args() -> Result<AppConfig> {
    let mut orb = OrbConfig::default();
    let mut source = SourceKind::Sim;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--source" => {
                let value = args.next().unwrap_or_default();
                source = match value.as_str() {
                    "" => bail!("--source needs a value: sim, stdin, or a file path"),
                    "sim" => SourceKind::Sim,
                    "stdin" => SourceKind::Stdin,
                    path => SourceKind::File(path.to_string()),
                };
            }
            "--config" => {
                let path = args.next().unwrap_or_default();
                if path.is_empty() {
                    bail!("--config needs a path");
                }
                orb = OrbConfig::load(&path)?;
                info!("loaded config from {}", path);
            }
            "--dump-config" => {
                let path = args.next().unwrap_or_else(|| "pose_orb.toml".to_string());
                OrbConfig::default().save(&path)?;
                println!("  Wrote default config to {}", path);
                std::process::exit(0);
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => bail!("unknown argument {:?} (try --help)", other),
        }
    }

    Ok(AppConfig { orb, source })
}

fn print_usage() {
    println!("  Usage: pose_orb [OPTIONS]");
    println!();
    println!("    --source sim|stdin|<file>   Pose input (default: sim)");
    println!("    --config <path>             Load tuning from a TOML file");
    println!("    --dump-config [path]        Write the default tuning and exit");
    println!();
    println!("  The stdin/file source expects one ml5-shaped JSON observation");
    println!("  per line: {{\"poses\":[{{\"pose\":{{\"keypoints\":[...]}}}}]}}");
}
