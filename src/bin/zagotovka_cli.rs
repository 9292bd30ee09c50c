// src/bin/zagotovka_cli.rs

use clap::Parser;
use zagotovka::commands::cli::{execute_command, Cli};
use zagotovka::{initialize_environment, initialize_system};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    initialize_environment();

    let cli = Cli::parse();
    let (assembler, _config) = initialize_system()?;

    let mut stdout = std::io::stdout();
    execute_command(&assembler, cli.command, &mut stdout).await
}
