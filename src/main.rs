//! Charging site planner entry point: CLI wiring and scenario loading.

mod cli;

use std::io;
use std::process;

use anyhow::{Context, bail};
use clap::Parser;

use truck_site_planner::config::ScenarioConfig;
use truck_site_planner::io::export::{export_sensitivity_csv, write_plan_json};
use truck_site_planner::logging;
use truck_site_planner::plan::calc_plan_with;
use truck_site_planner::report::PlanSummary;
use truck_site_planner::sensitivity::SensitivityGrid;

use cli::Cli;

fn load_scenario(cli: &Cli) -> anyhow::Result<ScenarioConfig> {
    // --scenario takes priority, then --preset, then the baseline default
    let mut scenario = match cli.scenario {
        Some(ref path) => ScenarioConfig::from_toml_file(path)?,
        None => ScenarioConfig::from_preset(cli.preset_name())?,
    };

    if let Some(length) = cli.length {
        scenario.input.site_length_m = length;
    }
    if let Some(width) = cli.width {
        scenario.input.site_width_m = width;
    }
    if cli.grid_kva.is_some() {
        scenario.rules.grid_allocation_kva = cli.grid_kva;
    }

    let errors = scenario.validate();
    if !errors.is_empty() {
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        bail!(messages.join("\n"));
    }

    Ok(scenario)
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let scenario = load_scenario(cli)?;
    let result = calc_plan_with(&scenario.input, &scenario.rules);

    let grid = cli
        .wants_sweep()
        .then(|| SensitivityGrid::sweep(&scenario.input, &scenario.rules));

    if cli.json {
        match (&grid, cli.sensitivity) {
            (Some(grid), true) => {
                let doc = serde_json::json!({
                    "plan": result,
                    "sensitivity": grid.summary(),
                });
                println!("{}", serde_json::to_string_pretty(&doc)?);
            }
            _ => write_plan_json(&result, io::stdout().lock())?,
        }
    } else {
        println!("{}", PlanSummary::new(&scenario.input, &result));
        if let (Some(grid), true) = (&grid, cli.sensitivity) {
            println!("\n{}", grid.summary());
        }
    }

    if let (Some(grid), Some(path)) = (&grid, &cli.sensitivity_out) {
        export_sensitivity_csv(grid, path)
            .with_context(|| format!("failed to write CSV to {}", path.display()))?;
        eprintln!("Sensitivity grid written to {}", path.display());
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    logging::init();

    if let Err(e) = run(&cli) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
