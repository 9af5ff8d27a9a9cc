mod convert;

use clap::Parser;
use ovaljson_infrastructure::init_tracing;
use std::process::ExitCode;

#[derive(clap::Parser, Debug, Clone)]
#[command(
    name = "ovaljson",
    version,
    about = "Convert OVAL vulnerability definitions into JSON or YAML"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug, Clone)]
enum Command {
    /// Convert an OVAL definitions document
    Convert(convert::Convert),
}

impl Command {
    async fn run(self) -> anyhow::Result<ExitCode> {
        match self {
            Self::Convert(convert) => convert.run().await,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing("ovaljson");

    match cli.command.run().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
