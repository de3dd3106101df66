use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use teller::application::SettlementEngine;
use teller::infrastructure::in_memory::InMemoryLedger;
use teller::interfaces::csv::{AccountWriter, OpReader};
use teller::interfaces::seed;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input operations CSV file
    input: PathBuf,

    /// Optional JSON seed file with initial accounts/products/services
    #[arg(long)]
    seed: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let engine = SettlementEngine::new(Box::new(InMemoryLedger::new()));

    if let Some(path) = &cli.seed {
        let data = seed::read_seed(path).into_diagnostic()?;
        seed::apply_seed(&engine, data).await.into_diagnostic()?;
    }

    let file = File::open(&cli.input).into_diagnostic()?;
    let reader = OpReader::new(file);
    for record in reader.records() {
        match record {
            Ok(op) => {
                if let Err(e) = op.apply(&engine).await {
                    eprintln!("Error applying operation: {e}");
                }
            }
            Err(e) => {
                eprintln!("Error reading operation: {e}");
            }
        }
    }

    let accounts = engine.accounts().await.into_diagnostic()?;
    let stdout = io::stdout();
    let mut writer = AccountWriter::new(stdout.lock());
    writer.write_accounts(&accounts).into_diagnostic()?;

    Ok(())
}
