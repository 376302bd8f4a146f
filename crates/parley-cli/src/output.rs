//! Output formatting for CLI commands.
//!
//! Supports table (human-readable) and JSON output formats.

use std::io::Write;

use serde::Serialize;

use parley_agent::StrategyConfig;

use crate::cli::Format;
use crate::error::CliError;
use crate::selfplay::{AgentReport, PlayReport, PlayStatus};

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

    /// Get the current format.
    #[must_use]
    pub const fn format(&self) -> Format {
        self.format
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

    /// Write a serializable value to a string.
    pub fn to_string<T>(&self, value: &T) -> Result<String, CliError>
    where
        T: Serialize + TableDisplay,
    {
        let mut buf = Vec::new();
        self.write(&mut buf, value)?;
        String::from_utf8(buf).map_err(|e| CliError::Format(format!("UTF-8 error: {e}")))
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
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError>;
}

impl TableDisplay for PlayReport {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Negotiation Result")?;
        writeln!(writer, "══════════════════════════════════")?;
        let status = match &self.status {
            PlayStatus::Agreement => "agreement".to_string(),
            PlayStatus::Ended { by, reason } => format!("ended by {by} ({reason})"),
            PlayStatus::Timeout => "timeout".to_string(),
        };
        writeln!(writer, "Status:           {status}")?;
        writeln!(writer, "Steps:            {} / {}", self.steps_used, self.steps)?;
        writeln!(writer, "Outcomes:         {}", self.outcomes)?;
        match &self.agreement {
            Some(outcome) => writeln!(writer, "Agreement:        {outcome}")?,
            None => writeln!(writer, "Agreement:        -")?,
        }
        writeln!(writer)?;

        writeln!(
            writer,
            "{:<6}  {:>8}  {:>8}  {:<9}  {:>10}  {:>6}",
            "AGENT", "RESERVED", "UTILITY", "SEES", "EST. OPP.", "OFFERS"
        )?;
        writeln!(writer, "{}", "─".repeat(56))?;
        for agent in &self.agents {
            write_agent_row(writer, agent)?;
        }

        if !self.trace.is_empty() {
            writeln!(writer)?;
            writeln!(writer, "{:>5}  {:<6}  {}", "STEP", "AGENT", "OFFER")?;
            writeln!(writer, "{}", "─".repeat(40))?;
            for entry in &self.trace {
                writeln!(writer, "{:>5}  {:<6}  {}", entry.step, entry.agent, entry.offer)?;
            }
        }
        Ok(())
    }
}

fn write_agent_row<W: Write>(writer: &mut W, agent: &AgentReport) -> Result<(), CliError> {
    let utility = agent
        .utility
        .map_or_else(|| "-".to_string(), |u| format!("{u:.3}"));
    let (style, estimate, offers) = agent.summary.as_ref().map_or_else(
        || ("-".to_string(), "-".to_string(), 0),
        |s| {
            (
                s.style.to_string(),
                format!("{:.3}", s.reserved_value_estimate),
                s.offers_seen,
            )
        },
    );
    writeln!(
        writer,
        "{:<6}  {:>8.3}  {:>8}  {:<9}  {:>10}  {:>6}",
        agent.name, agent.reserved_value, utility, style, estimate, offers
    )?;
    Ok(())
}

/// Effective strategy configuration for display.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct ConfigView(pub StrategyConfig);

impl TableDisplay for ConfigView {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        let c = &self.0;
        writeln!(writer, "Strategy Configuration")?;
        writeln!(writer, "══════════════════════════════════")?;
        writeln!(writer, "Classification")?;
        writeln!(writer, "  History window:     {}", c.history_window)?;
        writeln!(writer, "  Min offers:         {}", c.min_offers)?;
        writeln!(writer, "  Recent window:      {}", c.recent_window)?;
        writeln!(writer, "  Slope threshold:    {}", c.boulware_slope_threshold)?;
        writeln!(writer, "  Cutoff:             {}", c.classification_cutoff)?;
        writeln!(writer)?;
        writeln!(writer, "Concession")?;
        writeln!(writer, "  Boulware exponent:  {}", c.boulware_exponent)?;
        writeln!(writer, "  Conceder exponent:  {}", c.conceder_exponent)?;
        writeln!(writer, "  Early phase end:    {}", c.early_phase_end)?;
        writeln!(writer, "  Boulware holdout:   {}", c.boulware_holdout_until)?;
        writeln!(writer)?;
        writeln!(writer, "Reservation estimate")?;
        writeln!(writer, "  Boulware factor:    {}", c.boulware_multiplier)?;
        writeln!(writer, "  Other factor:       {}", c.other_multiplier)?;
        writeln!(writer, "  Boulware tolerance: {}", c.boulware_tolerance)?;
        match c.initial_opponent_reserved {
            Some(v) => writeln!(writer, "  Initial estimate:   {v}")?,
            None => writeln!(writer, "  Initial estimate:   own reserved value")?,
        }
        writeln!(writer)?;
        writeln!(writer, "Max outcomes:         {}", c.max_outcomes)?;
        Ok(())
    }
}
