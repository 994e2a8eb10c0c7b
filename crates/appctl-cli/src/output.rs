//! Output formatting for CLI commands.
//!
//! Supports table (human-readable) and JSON output formats.

use std::io::Write;

use appctl_api::ContainerStat;
use appctl_api::units::{to_human, usage_percent};
use serde::Serialize;

use crate::cli::Format;
use crate::error::CliError;

/// Output formatter that handles both table and JSON output.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Write a serializable value to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + TableDisplay,
    {
        match self.format {
            Format::Json => {
                serde_json::to_writer_pretty(&mut *writer, value)
                    .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
                writeln!(writer)?;
            }
            Format::Table => {
                value.write_table(writer)?;
            }
        }
        Ok(())
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(Format::Table)
    }
}

/// Trait for types that can be displayed as a table.
pub trait TableDisplay {
    /// Write the value as a human-readable table.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError>;
}

const STATS_HEADER: [&str; 4] = ["NAME", "CPU", "MEMORY", "SWAP"];

/// Container stats of one application, serialized as a plain list.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct StatsTable {
    /// One entry per container, in API order.
    pub stats: Vec<ContainerStat>,
}

impl From<appctl_api::AppStats> for StatsTable {
    fn from(stats: appctl_api::AppStats) -> Self {
        Self { stats: stats.stats }
    }
}

impl StatsTable {
    /// Table rows below the header.
    ///
    /// Each container gets a usage row and a `Highest` row; containers are
    /// separated by an empty row.
    fn rows(&self) -> Vec<[String; 4]> {
        let mut rows = Vec::with_capacity(self.stats.len() * 3);
        for (i, stat) in self.stats.iter().enumerate() {
            if i > 0 {
                rows.push(Default::default());
            }
            rows.push([
                stat.id.clone(),
                format!("{}%", stat.cpu_usage),
                usage_cell(stat.memory_usage, stat.memory_limit),
                usage_cell(stat.swap_usage, stat.swap_limit),
            ]);
            rows.push([
                String::new(),
                String::new(),
                format!("Highest: {}", to_human(stat.highest_memory_usage)),
                format!("Highest: {}", to_human(stat.highest_swap_usage)),
            ]);
        }
        rows
    }
}

fn usage_cell(used: u64, limit: u64) -> String {
    format!(
        "{:2}% {}/{}",
        usage_percent(used, limit),
        to_human(used),
        to_human(limit)
    )
}

impl TableDisplay for StatsTable {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        if self.stats.is_empty() {
            writeln!(writer, "No containers running")?;
            return Ok(());
        }

        let rows = self.rows();
        let mut widths = STATS_HEADER.map(str::len);
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let header = STATS_HEADER.map(String::from);
        write_row(writer, &header, &widths)?;
        let total = widths.iter().sum::<usize>() + 2 * (widths.len() - 1);
        writeln!(writer, "{}", "─".repeat(total))?;
        for row in &rows {
            write_row(writer, row, &widths)?;
        }
        Ok(())
    }
}

fn write_row<W: Write>(writer: &mut W, row: &[String; 4], widths: &[usize; 4]) -> Result<(), CliError> {
    let line = row
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(writer, "{}", line.trim_end())?;
    Ok(())
}
