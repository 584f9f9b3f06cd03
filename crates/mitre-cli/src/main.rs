//! mitre CLI - build mitred joints from a TOML description
//!
//! Each command builds a scene with a host path whose three vertices are
//! picked in order, plus a profile mesh, then runs one operation on it.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use mitre::export::{write_object, ExportFormat};
use mitre::joint;
use mitre::mesh::DEFAULT_MERGE_DISTANCE;

mod config;

use config::JointConfig;

#[derive(Parser)]
#[command(name = "mitre")]
#[command(about = "Mitred joints between extruded profiles", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the joint and write it to a mesh file
    Joint {
        /// Joint description (.toml)
        config: PathBuf,
        /// Output file (format determined by extension: .stl, .obj)
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Print the local frame of the picked corner
    Frame {
        /// Joint description (.toml)
        config: PathBuf,
    },
    /// Align a copy of the profile to the corner and print its world matrix
    Align {
        /// Joint description (.toml)
        config: PathBuf,
    },
    /// List the available operators
    Operators,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mitre=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Joint { config, output } => build_joint(&config, &output)?,
        Commands::Frame { config } => show_frame(&config)?,
        Commands::Align { config } => align_profile(&config)?,
        Commands::Operators => {
            for op in mitre::operators::registry() {
                println!("{:<24} {}", op.id(), op.label());
            }
        }
    }

    Ok(())
}

fn load(path: &Path) -> Result<JointConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    JointConfig::from_toml(&text)
}

fn build_joint(config_path: &Path, output: &Path) -> Result<()> {
    let format = ExportFormat::from_path(output).ok_or_else(|| {
        anyhow!(
            "Unknown output format: {} (expected .stl or .obj)",
            output.display()
        )
    })?;
    let config = load(config_path)?;
    let mut built = config.build_scene()?;

    let joint = joint::add_angle(&mut built.scene, built.profile)?;
    built.scene.object_mut(joint)?.name = config.name.clone();
    write_object(&built.scene, joint, output, format)?;

    let mesh = mitre::export::world_mesh(&built.scene, joint)?;
    println!("{}", mesh.report(DEFAULT_MERGE_DISTANCE));
    println!("Exported {} to {}", config.name, output.display());
    Ok(())
}

fn show_frame(config_path: &Path) -> Result<()> {
    let config = load(config_path)?;
    let mut built = config.build_scene()?;
    let frame = joint::set_orientation(&mut built.scene, config.corner.inverse)?;

    println!("origin: {:?}", frame.origin.coords.as_slice());
    println!("x:      {:?}", frame.x.as_slice());
    println!("y:      {:?}", frame.y.as_slice());
    println!("z:      {:?}", frame.z.as_slice());
    Ok(())
}

fn align_profile(config_path: &Path) -> Result<()> {
    let config = load(config_path)?;
    let mut built = config.build_scene()?;
    let object =
        joint::add_aligned_object(&mut built.scene, built.profile, true, config.corner.inverse)?;

    let world = built.scene.matrix_world(object)?;
    for row in world.matrix.row_iter() {
        println!(
            "{:>12.6} {:>12.6} {:>12.6} {:>12.6}",
            row[0], row[1], row[2], row[3]
        );
    }
    Ok(())
}
