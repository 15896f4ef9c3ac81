use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use polyband::config::Config;
use polyband::draw::{Annotation, AnnotationTarget, SVG_SELECTOR, Selector};
use polyband::layer::AnnotationLayer;
use polyband::replay;
use polyband::util::{Env, ImageInfo};
use polyband::PolygonTool;

#[derive(Parser, Debug)]
#[command(name = "polyband")]
#[command(version, about = "Rubberband polygon drawing tool for image annotation")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a JSON event script and print the resulting annotations
    Replay {
        /// Path to the event script (JSON array of events)
        script: PathBuf,

        /// Natural image width in pixels
        #[arg(long, value_name = "PX")]
        width: f64,

        /// Natural image height in pixels
        #[arg(long, value_name = "PX")]
        height: f64,

        /// Image reference recorded as each annotation's source
        #[arg(long, value_name = "URL")]
        source: Option<String>,

        /// Simulate a touch device (larger handles)
        #[arg(long, action = ArgAction::SetTrue)]
        touch: bool,

        /// Config file to use instead of ~/.config/polyband/config.toml
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Check whether an SVG selector value is handled by the polygon tool
    Supports {
        /// Selector value, e.g. '<svg><polygon points="0,0 1,1 2,2"/></svg>'
        value: String,
    },

    /// Write a documented default config file
    InitConfig {
        /// Destination (defaults to ~/.config/polyband/config.toml)
        #[arg(long, value_name = "FILE")]
        path: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Command::Replay {
            script,
            width,
            height,
            source,
            touch,
            config,
        } => {
            if !(width > 0.0 && height > 0.0) {
                log::error!("Image dimensions must be positive (got {width}x{height})");
                return Err(anyhow::anyhow!("Invalid image dimensions"));
            }

            let config = match config {
                Some(path) => Config::load_from(&path)?,
                None => Config::load()?,
            };
            let events = replay::load_script(&script)?;
            log::info!("Replaying {} events from {}", events.len(), script.display());

            let env = Env::new(ImageInfo::new(source, width, height)).with_touch(touch);
            let mut layer = AnnotationLayer::new(config, env);
            let report = replay::replay(&mut layer, &events);

            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("Failed to serialize report")?
            );
        }
        Command::Supports { value } => {
            let annotation = Annotation::new(
                None,
                AnnotationTarget {
                    source: None,
                    selector: Selector {
                        kind: SVG_SELECTOR.to_string(),
                        value,
                    },
                },
            );
            if PolygonTool::supports(&annotation) {
                println!("yes");
            } else {
                println!("no");
                std::process::exit(1);
            }
        }
        Command::InitConfig { path } => {
            let path = match path {
                Some(path) => path,
                None => Config::get_config_path()?,
            };
            Config::create_default_file(&path)?;
            println!("Wrote default config to {}", path.display());
        }
    }

    Ok(())
}
