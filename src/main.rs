use anyhow::{Context, Result};
use clap::Parser;

use ringboard::export;
use ringboard::scene::Scene;

#[derive(Parser, Debug)]
#[command(author, version, about = "Export an impression diagram to PNG", long_about = None)]
struct Cli {
    /// Scene JSON file; a default scene is used when omitted
    #[arg(value_name = "SCENE_JSON")]
    scene_file: Option<String>,

    /// Output PNG path
    #[arg(short, long, default_value = export::EXPORT_FILENAME)]
    output: String,

    /// Print the scene SVG to stdout instead of writing a PNG
    #[arg(long)]
    svg: bool,

    /// Launch the interactive editor (requires the `egui` feature)
    #[arg(long)]
    edit: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let scene = match &cli.scene_file {
        Some(path) => {
            let json = std::fs::read_to_string(path).with_context(|| format!("Open {path}"))?;
            serde_json::from_str(&json).with_context(|| format!("Failed to parse {path}"))?
        }
        None => Scene::default(),
    };

    if cli.edit {
        #[cfg(feature = "egui")]
        {
            return ringboard::app::run(scene).map_err(|e| anyhow::anyhow!("{e}"));
        }
        #[cfg(not(feature = "egui"))]
        anyhow::bail!("this build has no editor; rebuild with --features egui");
    }

    if cli.svg {
        print!("{}", export::scene_svg(&scene)?);
        return Ok(());
    }

    export::export_png(&scene, std::path::Path::new(&cli.output))
        .with_context(|| format!("Failed to export {}", cli.output))?;
    eprintln!("[ringboard] wrote {}", cli.output);
    Ok(())
}
