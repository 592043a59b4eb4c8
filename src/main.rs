use clap::Parser;
use miette::{IntoDiagnostic, Result};
use sagepay_adapter::application::replay::Replay;
use sagepay_adapter::config::ProcessorSettings;
use sagepay_adapter::interfaces::csv::command_reader::CommandReader;
use sagepay_adapter::interfaces::csv::ledger_writer::LedgerWriter;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input lifecycle commands CSV file
    input: PathBuf,

    /// Processor settings JSON file. Sandbox settings are used when omitted.
    #[arg(long)]
    settings: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();

    let settings = match cli.settings {
        Some(path) => ProcessorSettings::from_file(path).into_diagnostic()?,
        None => ProcessorSettings::sandbox(),
    };
    let mut replay = Replay::new(settings);

    let file = File::open(cli.input).into_diagnostic()?;
    let reader = CommandReader::new(file);
    for (row, command) in reader.commands().enumerate() {
        match command {
            Ok(command) => match replay.process_command(command).await {
                Ok(result) if !result.is_success() => {
                    tracing::info!(row = row + 1, "Processor declined command");
                }
                Ok(_) => {}
                Err(e) => tracing::error!(row = row + 1, error = %e, "Error processing command"),
            },
            Err(e) => tracing::error!(row = row + 1, error = %e, "Error reading command"),
        }
    }

    let stdout = io::stdout();
    let mut writer = LedgerWriter::new(stdout.lock());
    writer
        .write_rows(replay.ledger_rows().await)
        .into_diagnostic()?;

    Ok(())
}
