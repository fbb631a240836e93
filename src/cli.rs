//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Default preset when neither `--scenario` nor `--preset` is given.
pub const DEFAULT_PRESET: &str = "baseline";

#[derive(Debug, Parser)]
#[command(name = "truck-site-planner")]
#[command(version)]
#[command(about = "Size a heavy-truck charging site and estimate its payback")]
pub struct Cli {
    /// Load scenario from a TOML file
    #[arg(long, value_name = "PATH", conflicts_with = "preset")]
    pub scenario: Option<PathBuf>,

    /// Use a built-in preset (baseline, single_row, high_rent)
    #[arg(long, value_name = "NAME")]
    pub preset: Option<String>,

    /// Override the site length (m)
    #[arg(long, value_name = "M")]
    pub length: Option<f64>,

    /// Override the site width (m)
    #[arg(long, value_name = "M")]
    pub width: Option<f64>,

    /// Cap the pile count with an approved grid allocation (kVA)
    #[arg(long, value_name = "KVA")]
    pub grid_kva: Option<f64>,

    /// Run the 27-scenario sensitivity sweep and print its summary
    #[arg(long)]
    pub sensitivity: bool,

    /// Write the sensitivity grid to a CSV file (implies the sweep)
    #[arg(long, value_name = "PATH")]
    pub sensitivity_out: Option<PathBuf>,

    /// Print JSON instead of the text summary
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn preset_name(&self) -> &str {
        self.preset.as_deref().unwrap_or(DEFAULT_PRESET)
    }

    /// Whether any output needs the sensitivity sweep.
    pub fn wants_sweep(&self) -> bool {
        self.sensitivity || self.sensitivity_out.is_some()
    }
}
