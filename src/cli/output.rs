//! Output formatting for CLI commands
//!
//! Text mode prints human-readable, color-tinted lines; json mode
//! prints one machine-parseable object or array per command. Verbose
//! diagnostics always go to stderr so they never pollute json output.

use colored::Colorize;
use serde::Serialize;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Output helper for consistent formatting
pub struct Output {
    format: OutputFormat,
    verbose: bool,
}

impl Output {
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self { format, verbose }
    }

    /// Prints a confirmation for a completed mutation
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Text => println!("{}", message.green()),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "success": true,
                        "message": message
                    })
                );
            }
        }
    }

    /// Prints an informational outcome: the command succeeded but
    /// changed nothing (e.g. the flag was already set)
    pub fn info(&self, message: &str) {
        match self.format {
            OutputFormat::Text => println!("{}", message.yellow()),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "success": true,
                        "changed": false,
                        "message": message
                    })
                );
            }
        }
    }

    /// Prints structured data (pretty in text mode as a fallback)
    pub fn data<T: Serialize>(&self, data: &T) {
        let rendered = match self.format {
            OutputFormat::Text => serde_json::to_string_pretty(data),
            OutputFormat::Json => serde_json::to_string(data),
        };
        if let Ok(json) = rendered {
            println!("{}", json);
        }
    }

    /// Returns true if using JSON format
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Prints a verbose debug message (only when --verbose is set)
    pub fn verbose(&self, message: &str) {
        if self.verbose {
            eprintln!("[verbose] {}", message);
        }
    }
}
