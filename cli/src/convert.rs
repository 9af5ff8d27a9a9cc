use anyhow::Context;
use ovaljson_common::config::OvalConfig;
use ovaljson_module_ingestor::service::{Conversion, convert};
use ovaljson_module_storage::{config::OutputConfig, service::emit};
use std::{path::PathBuf, process::ExitCode, time::Instant};

#[derive(clap::Args, Debug, Clone)]
pub struct Convert {
    /// OVAL definitions document to convert
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    #[command(flatten)]
    pub output: OutputConfig,

    #[command(flatten)]
    pub oval: OvalConfig,
}

/// Attach the stage which failed to an error.
fn failed<E>(stage: &'static str, err: E) -> anyhow::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    anyhow::Error::new(err).context(format!("{stage} stage failed"))
}

impl Convert {
    /// Read, convert, and write a single document.
    ///
    /// Nothing is written if reading or converting the document fails. Unresolved references
    /// are reported as warnings, and don't fail the run.
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let start = Instant::now();

        let data = tokio::fs::read(&self.input)
            .await
            .with_context(|| format!("read stage failed: {}", self.input.display()))?;
        log::info!("Read {} bytes from {}", data.len(), self.input.display());

        let oval = self.oval;
        let Conversion {
            definitions,
            report,
        } = tokio::task::spawn_blocking(move || convert(&data, &oval))
            .await?
            .map_err(|err| failed(err.stage(), err))?;

        report.log();

        let output = self.output;
        let written = tokio::task::spawn_blocking(move || emit(&definitions, &output))
            .await?
            .map_err(|err| failed(err.stage(), err))?;

        log::info!(
            "Converted {} into {} file(s) in {:?}",
            self.input.display(),
            written.len(),
            start.elapsed()
        );

        Ok(ExitCode::SUCCESS)
    }
}
