//! flexbind CLI
//!
//! Usage:
//!   flexbind [OPTIONS] [FILE]
//!
//! Options:
//!   -d, --data <FILE>    Scene file with layout bounds and data (TOML format)
//!   --width <PX>         Available layout width
//!   --height <PX>        Available layout height
//!   --svg                Emit an outline SVG instead of a draw listing
//!   -h, --help           Print help

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;

use flexbind::{Listing, OutlineConfig, OutlineSvg, Scene, Session, SessionConfig};

#[derive(Parser)]
#[command(name = "flexbind")]
#[command(about = "Lay out data-bound markup templates with flexbox")]
struct Cli {
    /// Input markup file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Scene file with layout bounds and initial data (TOML format)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Available layout width, overriding the scene file
    #[arg(long)]
    width: Option<f32>,

    /// Available layout height, overriding the scene file
    #[arg(long)]
    height: Option<f32>,

    /// Emit an outline SVG instead of the draw listing
    #[arg(long)]
    svg: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let scene = match &cli.data {
        Some(path) => match Scene::from_file(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error loading scene '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Scene::default(),
    };

    let source = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let mut config = scene.apply_to(SessionConfig::default());
    if let Some(width) = cli.width {
        config = config.with_max_width(width);
    }
    if let Some(height) = cli.height {
        config = config.with_max_height(height);
    }

    let mut session = match Session::load_with_config(&source, scene.data, config) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let color = io::stderr().is_terminal();
    for diagnostic in session.diagnostics() {
        eprintln!("{}", diagnostic.format_report(color));
    }

    if let Err(e) = session.compute_layout() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let output = if cli.svg {
        let mut svg = OutlineSvg::new(OutlineConfig::default());
        session.draw(&mut svg).map(|_| svg.finish())
    } else {
        let mut listing = Listing::new();
        session.draw(&mut listing).map(|_| listing.finish())
    };
    match output {
        Ok(text) => print!("{}", text),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
