//! Output rendering and formatting

use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use console::{Style, Term};
use std::io;
use vaultiq_types::{ColorChoice, OutputFormat, VerificationResult, VerificationStatus};

use crate::error::CliError;

/// Output renderer for CLI results
#[derive(Clone)]
pub struct OutputRenderer {
    /// Selected output format
    format: OutputFormat,
    /// Color configuration
    color_choice: ColorChoice,
    /// Terminal instance
    term: Term,
}

impl OutputRenderer {
    /// Create new output renderer
    pub fn new(format: OutputFormat, color_choice: ColorChoice) -> Self {
        Self {
            format,
            color_choice,
            term: Term::stdout(),
        }
    }

    /// Render a verification verdict
    pub fn render_verification(&self, result: &VerificationResult) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => {
                let json = result.to_json().map_err(io::Error::other)?;
                println!("{json}");
                return Ok(());
            }
            OutputFormat::Plain => {
                print!("{}", plain_summary(result)?);
                return Ok(());
            }
            OutputFormat::Tty => {}
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        table.set_header(vec![
            Cell::new("Check").add_attribute(Attribute::Bold),
            Cell::new("Score").add_attribute(Attribute::Bold),
        ]);
        table.add_row(vec![
            Cell::new("Forgery"),
            Cell::new(format_score(result.details.fraud)),
        ]);
        table.add_row(vec![
            Cell::new("Market"),
            Cell::new(format_score(result.details.market)),
        ]);
        table.add_row(vec![
            Cell::new("Final").add_attribute(Attribute::Bold),
            self.status_cell(result.score, result.status),
        ]);

        println!("{table}");
        println!("Status: {}", self.style_status(result.status));

        let ocr = serde_json::to_string_pretty(result.details.ocr_data.as_value())
            .map_err(io::Error::other)?;
        println!();
        println!("Extracted data:");
        println!("{ocr}");

        Ok(())
    }

    /// Render a block of text verbatim (config dumps, paths)
    pub fn render_text(&self, text: &str) {
        if self.format == OutputFormat::Json {
            println!("{}", serde_json::Value::String(text.to_string()));
        } else {
            println!("{}", text.trim_end());
        }
    }

    /// Render a failure. JSON mode writes a structured object to stdout.
    pub fn render_error(&self, error: &CliError) {
        if self.format == OutputFormat::Json {
            let value = serde_json::json!({
                "error": {
                    "code": error.code(),
                    "message": error.message(),
                }
            });
            println!("{value}");
        } else {
            let prefix = if self.supports_color() {
                Style::new().red().bold().apply_to("Error:").to_string()
            } else {
                "Error:".to_string()
            };
            eprintln!("{prefix} {error}");
        }
    }

    fn status_cell(&self, score: f64, status: VerificationStatus) -> Cell {
        let cell = Cell::new(format!("{} ({status})", format_score(score)));
        if !self.supports_color() {
            return cell;
        }
        match status {
            VerificationStatus::Approved => cell.fg(Color::Green),
            VerificationStatus::Flagged => cell.fg(Color::Yellow),
        }
    }

    fn style_status(&self, status: VerificationStatus) -> String {
        if !self.supports_color() {
            return status.to_string();
        }
        let style = match status {
            VerificationStatus::Approved => Style::new().green().bold(),
            VerificationStatus::Flagged => Style::new().yellow().bold(),
        };
        style.apply_to(status.as_str()).to_string()
    }

    /// Check if terminal supports colors
    fn supports_color(&self) -> bool {
        if self.format == OutputFormat::Plain {
            return false;
        }
        match self.color_choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.term.features().colors_supported(),
        }
    }
}

fn format_score(score: f64) -> String {
    format!("{score:.4}")
}

/// One `key: value` line per field, for scripts that grep the output
fn plain_summary(result: &VerificationResult) -> io::Result<String> {
    let ocr = serde_json::to_string(result.details.ocr_data.as_value()).map_err(io::Error::other)?;
    Ok(format!(
        "status: {}\nscore: {}\nfraud: {}\nmarket: {}\nocr_data: {ocr}\n",
        result.status,
        format_score(result.score),
        format_score(result.details.fraud),
        format_score(result.details.market),
    ))
}
