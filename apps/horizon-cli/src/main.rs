use anyhow::Context;
use clap::{Parser, Subcommand};
use horizon_assets::{FACE_NAMES, cross_faces, decode};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "horizon-cli", about = "Offline tooling for horizon assets")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Split a horizontal-cross cubemap into six face PNGs
    UnwrapCubemap {
        /// Cross-layout source image
        image: PathBuf,
        /// Directory the faces are written to (created if missing)
        out_dir: PathBuf,
    },
}

/// Write `right.png`, `left.png`, `top.png`, `bottom.png`, `front.png` and
/// `back.png` into `out_dir`, in cube-face order.
fn unwrap_cubemap(image: &Path, out_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let cross = decode(image)?;
    let faces = cross_faces(&cross)?;
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let mut written = Vec::with_capacity(faces.len());
    for (face, name) in faces.iter().zip(FACE_NAMES) {
        let path = out_dir.join(format!("{name}.png"));
        face.save_png(&path)?;
        tracing::debug!(path = %path.display(), size = face.width, "face written");
        written.push(path);
    }
    Ok(written)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Info => {
            println!("horizon-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("input: {}", horizon_input::crate_info());
            println!("render: {}", horizon_render::crate_info());
            println!("render-gl: {}", horizon_render_gl::crate_info());
            println!("assets: {}", horizon_assets::crate_info());
            println!("tools: {}", horizon_tools::crate_info());
        }
        Commands::UnwrapCubemap { image, out_dir } => {
            let written = unwrap_cubemap(&image, &out_dir)?;
            println!(
                "Unwrapped {} into {} faces under {}",
                image.display(),
                written.len(),
                out_dir.display()
            );
        }
    }
    Ok(())
}
