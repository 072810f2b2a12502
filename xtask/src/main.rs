use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Shader stages the demos load, relative to the shader directory.
const SHADERS: [&str; 4] = [
    "vertex_shader.vert",
    "fragment_shader.frag",
    "simple.vert",
    "blackhole/black_hole.frag",
];

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for horizon")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: shaders, fmt, clippy, tests, doc
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates
    Clippy,
    /// Run all tests
    Test,
    /// Build rustdoc for the workspace
    Doc,
    /// Build the entire workspace
    Build,
    /// Verify that every shader the demos load exists and declares a version
    Shaders {
        #[arg(long, default_value = "shaders")]
        dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            run_shaders(Path::new("shaders"))?;
            run_fmt()?;
            run_clippy()?;
            run_tests()?;
            run_doc()?;
        }
        Commands::Fmt => run_fmt()?,
        Commands::Clippy => run_clippy()?,
        Commands::Test => run_tests()?,
        Commands::Doc => run_doc()?,
        Commands::Build => cargo(&["build", "--workspace"], "cargo build")?,
        Commands::Shaders { dir } => run_shaders(&dir)?,
    }

    Ok(())
}

fn cargo(args: &[&str], label: &str) -> Result<()> {
    println!("==> Running {label}");
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("{label} failed");
    }
    Ok(())
}

fn run_fmt() -> Result<()> {
    cargo(&["fmt", "--all", "--", "--check"], "cargo fmt --check")
}

fn run_clippy() -> Result<()> {
    cargo(
        &[
            "clippy",
            "--workspace",
            "--all-targets",
            "--",
            "-D",
            "warnings",
        ],
        "cargo clippy",
    )
}

fn run_tests() -> Result<()> {
    cargo(&["test", "--workspace"], "cargo test")
}

fn run_doc() -> Result<()> {
    cargo(&["doc", "--workspace", "--no-deps"], "cargo doc")
}

fn run_shaders(dir: &Path) -> Result<()> {
    println!("==> Checking shaders in {}", dir.display());
    let problems = shader_problems(dir);
    for problem in &problems {
        println!("    {problem}");
    }
    if !problems.is_empty() {
        anyhow::bail!("{} shader problem(s)", problems.len());
    }
    Ok(())
}

fn shader_problems(dir: &Path) -> Vec<String> {
    let mut problems = Vec::new();
    for name in SHADERS {
        let path = dir.join(name);
        match std::fs::read_to_string(&path) {
            Ok(source) => {
                if !source.trim_start().starts_with("#version") {
                    problems.push(format!("{}: missing #version line", path.display()));
                }
            }
            Err(e) => problems.push(format!("{}: {e}", path.display())),
        }
    }
    problems
}
