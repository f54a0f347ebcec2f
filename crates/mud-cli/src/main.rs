//! MUD model exporter command-line entry point

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mud_core::{
    BoneSpace, ExportOptions, MUDM_EXTENSION, SelectionMode, UpAxis, export_to_file,
    export_to_writer, load_scene, model_name_from_path,
};

/// Export a scene (RON description or OBJ mesh) to a MUD model file
#[derive(Parser)]
#[command(name = "mudm")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Scene to export (.ron or .obj)
    input: PathBuf,

    /// Output file (defaults to the input path with a .mudm extension, "-" for stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Export only selected objects
    #[arg(long)]
    selected_only: bool,

    /// Up axis of the exported model: Z, Y or X
    #[arg(long, default_value = "Y")]
    up_axis: String,

    /// Rotate bone transforms by the up axis as well
    #[arg(long)]
    rotate_bones: bool,

    /// Model name (defaults to the output file name without extension)
    #[arg(long)]
    name: Option<String>,

    /// Enable verbose output (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = match cli.verbose {
        0 => "mud_core=info,mudm=info",
        1 => "mud_core=debug,mudm=debug",
        _ => "mud_core=trace,mudm=trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let scene = load_scene(&cli.input)
        .with_context(|| format!("Failed to load scene from {}", cli.input.display()))?;
    tracing::info!(
        "Loaded {} objects from {}",
        scene.objects.len(),
        cli.input.display()
    );

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| cli.input.with_extension(MUDM_EXTENSION));
    let options = build_options(&cli, &output);
    tracing::info!(
        "Exporting model '{}' with {} up",
        options.model_name,
        options.up_axis
    );

    if output == Path::new("-") {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        export_to_writer(&scene, &options, &mut lock).context("Failed to export model")?;
        lock.flush()?;
    } else {
        let stats = export_to_file(&scene, &output, &options)
            .with_context(|| format!("Failed to export model to {}", output.display()))?;
        if stats.skipped > 0 {
            tracing::info!("Skipped {} objects of unsupported kinds", stats.skipped);
        }
    }

    Ok(())
}

fn build_options(cli: &Cli, output: &Path) -> ExportOptions {
    // Writing to stdout: name the model after the input instead
    let name_source = if output == Path::new("-") {
        cli.input.as_path()
    } else {
        output
    };
    let model_name = cli
        .name
        .clone()
        .unwrap_or_else(|| model_name_from_path(name_source));

    ExportOptions {
        selection: if cli.selected_only {
            SelectionMode::Selected
        } else {
            SelectionMode::Scene
        },
        up_axis: UpAxis::from_selector(&cli.up_axis),
        bone_space: if cli.rotate_bones {
            BoneSpace::UpAxis
        } else {
            BoneSpace::Armature
        },
        model_name,
    }
}
