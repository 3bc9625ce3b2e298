//! FILENAME: app/src/main.rs
// PURPOSE: Command-line entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::error;
use serde_json::json;

use app_lib::text::{render_defects, render_summary, render_view};
use app_lib::{init_logging, AppError, ChartSpec, SurveyConfig, SurveyExplorer};

#[derive(Parser, Debug)]
#[command(
    name = "gss-explorer",
    about = "Normalize a GSS extract and print one precomputed crosstab"
)]
struct Cli {
    /// GSS CSV extract to load
    data: PathBuf,

    /// JSON configuration file; the built-in GSS 2018 configuration otherwise
    #[arg(long)]
    config: Option<PathBuf>,

    /// Field shown on the x axis
    #[arg(long, default_value = "satjob")]
    x: String,

    /// Field the bars are grouped by
    #[arg(long, default_value = "sex")]
    group: String,

    /// Print the table, chart and summaries as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn run(cli: Cli) -> Result<(), AppError> {
    let config = match &cli.config {
        Some(path) => SurveyConfig::from_json_file(path)?,
        None => SurveyConfig::default(),
    };

    let explorer = SurveyExplorer::from_path(config, &cli.data)?;
    let view = explorer.resolve(&cli.x, &cli.group)?;
    let defects = explorer.report().summary();

    if cli.json {
        let output = json!({
            "records": explorer.dataset().len(),
            "defects": defects,
            "summaries": explorer.summaries(),
            "table": view.to_table(),
            "chart": ChartSpec::for_view(&view),
        });
        let text = serde_json::to_string_pretty(&output).map_err(AppError::Output)?;
        println!("{}", text);
    } else {
        print!("{}", render_defects(&defects));
        for summary in explorer.summaries() {
            println!();
            print!("{}", render_summary(summary));
        }
        println!();
        print!("{}", render_view(&view));
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
