//! Stats command implementation.
//!
//! Shows the CPU, memory and swap usage of every container of an
//! application, either once as a table or JSON document, or continuously
//! in the live dashboard.

use std::io::Write;
use std::sync::Arc;

use appctl_api::StatsSource;
use appctl_tui::MonitorConfig;
use tracing::debug;

use crate::error::CliError;
use crate::output::{OutputFormat, StatsTable};

/// Stats command executor.
pub struct StatsCommand<S> {
    source: Arc<S>,
}

impl<S: StatsSource + 'static> StatsCommand<S> {
    /// Create a new stats command reading from `source`.
    #[must_use]
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    /// Fetch the stats once and print them.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or output fails.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        app: &str,
    ) -> Result<(), CliError> {
        let stats = self.source.fetch_stats(app).await?;
        debug!(app, containers = stats.stats.len(), "Fetched stats");
        format.write(writer, &StatsTable::from(stats))
    }

    /// Run the live dashboard until the user quits.
    ///
    /// # Errors
    ///
    /// Returns an error if the first fetch fails or the terminal fails.
    pub async fn stream(&self, config: MonitorConfig) -> Result<(), CliError> {
        appctl_tui::run(Arc::clone(&self.source), config).await?;
        Ok(())
    }
}
