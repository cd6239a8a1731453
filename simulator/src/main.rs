use anyhow::Context;
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use workflow::config::{Precision, WorkflowConfig};
use workflow::runner::Runner;

mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Synthetic circular-correlation driver for the spectral core")]
struct Args {
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    #[arg(long, default_value_t = 32)]
    rows: usize,
    #[arg(long, default_value_t = 48)]
    cols: usize,
    #[arg(long, default_value_t = 3, allow_hyphen_values = true)]
    shift_rows: isize,
    #[arg(long, default_value_t = -5, allow_hyphen_values = true)]
    shift_cols: isize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    #[arg(long, value_enum, default_value_t = Precision::Double)]
    precision: Precision,
    /// Also write the JSON report to this file
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig {
            seed: args.seed,
            precision: args.precision,
            ..WorkflowConfig::from_args(args.rows, args.cols, args.shift_rows, args.shift_cols)
        }
    };
    log::info!(
        "running {}x{} workflow in {:?} precision",
        workflow_config.rows,
        workflow_config.cols,
        workflow_config.precision
    );

    let report = Runner::new(workflow_config)
        .execute()
        .context("executing correlation workflow")?;
    let rendered = serde_json::to_string_pretty(&report).context("rendering report")?;
    println!("{}", rendered);

    if let Some(path) = args.report {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, rendered.as_bytes())
            .with_context(|| format!("writing report {}", path.display()))?;
    }

    Ok(())
}
