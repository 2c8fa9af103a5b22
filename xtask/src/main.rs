use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for gridview")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run fmt, clippy, tests, docs and the headless smoke run
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates with warnings denied
    Clippy,
    /// Run all tests
    Test,
    /// Build rustdoc for the workspace
    Doc,
    /// Simulate a hovered cube headlessly and check it rose
    Smoke,
}

/// One cargo invocation.
struct Step {
    name: &'static str,
    args: &'static [&'static str],
}

const FMT: Step = Step {
    name: "fmt",
    args: &["fmt", "--all", "--", "--check"],
};
const CLIPPY: Step = Step {
    name: "clippy",
    args: &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
};
const TEST: Step = Step {
    name: "test",
    args: &["test", "--workspace"],
};
const DOC: Step = Step {
    name: "doc",
    args: &["doc", "--workspace", "--no-deps"],
};

fn run(step: &Step) -> Result<()> {
    println!("==> cargo {}", step.args.join(" "));
    let status = Command::new("cargo").args(step.args).status()?;
    if !status.success() {
        bail!("cargo {} failed", step.name);
    }
    Ok(())
}

/// Lowest cube offset accepted after the hovered smoke run.
const SMOKE_MIN_OFFSET: f32 = 1.5;

/// Pull the value printed on the `Cube offset:` line.
fn cube_offset(stdout: &str) -> Option<f32> {
    stdout
        .lines()
        .find_map(|line| line.trim().strip_prefix("Cube offset:"))
        .and_then(|v| v.trim().parse().ok())
}

/// Thirty hovered frames at 60 Hz must leave the cube visibly raised.
fn smoke() -> Result<()> {
    println!("==> headless hover simulation");
    let output = Command::new("cargo")
        .args([
            "run", "-q", "-p", "gridview-cli", "--", "simulate", "--frames", "30",
            "--hover-frames", "30",
        ])
        .output()?;
    if !output.status.success() {
        bail!(
            "gridview-cli simulate failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    let Some(offset) = cube_offset(&stdout) else {
        bail!("no cube offset in output:\n{stdout}");
    };
    if !stdout.contains("hovered=1") || offset.is_nan() || offset < SMOKE_MIN_OFFSET {
        bail!("cube did not rise (offset {offset}, need {SMOKE_MIN_OFFSET}):\n{stdout}");
    }
    println!("{stdout}");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            for step in [&FMT, &CLIPPY, &TEST, &DOC] {
                run(step)?;
            }
            smoke()?;
        }
        Commands::Fmt => run(&FMT)?,
        Commands::Clippy => run(&CLIPPY)?,
        Commands::Test => run(&TEST)?,
        Commands::Doc => run(&DOC)?,
        Commands::Smoke => smoke()?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_cube_offset_line() {
        let out = "Simulated 30 frames at 16 ms\nCube offset: 1.823\nRender time: --\n";
        assert_eq!(cube_offset(out), Some(1.823));
    }

    #[test]
    fn missing_offset_line() {
        assert_eq!(cube_offset("Simulated 30 frames\n"), None);
        assert_eq!(cube_offset("Cube offset: NaN-ish\n"), None);
    }
}
