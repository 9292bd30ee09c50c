// src/commands/cli.rs
use std::{error::Error, fs, io::Write, path::PathBuf};

use clap::{Parser, Subcommand};
use log::info;

use crate::core::reporting::ReportAssembler;
use super::common::{comparison_caption, weekly_caption};

#[derive(Parser, Debug)]
#[command(name = "zagotovka_cli", about = "Build grain procurement reports from the shared spreadsheet")]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Last week's purchases and the year-to-date chart
    Week {
        /// Where to write the chart
        #[arg(long, short, default_value = "weekly_report.png")]
        output: PathBuf,
    },
    /// Smoothed comparison of procurement across years
    Compare {
        /// Where to write the chart
        #[arg(long, short, default_value = "compare_year_report.png")]
        output: PathBuf,
    },
}

pub async fn execute_command<W: Write>(
    assembler: &ReportAssembler,
    command: CliCommand,
    out: &mut W,
) -> Result<(), Box<dyn Error>> {
    let (chart_png, caption, output) = match command {
        CliCommand::Week { output } => {
            let report = assembler.weekly_report().await?;
            (report.chart_png, weekly_caption(&report.metrics), output)
        }
        CliCommand::Compare { output } => {
            let report = assembler.comparison_report().await?;
            let caption = comparison_caption(&report);
            (report.chart_png, caption, output)
        }
    };

    fs::write(&output, &chart_png)?;
    info!("Wrote {} bytes to {}", chart_png.len(), output.display());
    writeln!(out, "{}", caption)?;
    writeln!(out, "Chart saved to {}", output.display())?;
    Ok(())
}
