//! Colored output helpers for CLI
//!
//! Provides consistent, colored terminal output for the deepsearch CLI.

use crate::research::ResearchReport;
use crate::types::Source;
use owo_colors::OwoColorize;

/// Output style configuration
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper with colors enabled
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Create a new output helper with colors disabled
    pub fn no_color() -> Self {
        Self { colored: false }
    }

    /// Print a success message with a checkmark
    pub fn success(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "✓".green().bold(), message.green());
        } else {
            println!("  [OK] {}", message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "•".blue(), message);
        } else {
            println!("  [INFO] {}", message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "⚠".yellow().bold(), message.yellow());
        } else {
            println!("  [WARN] {}", message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("  [ERROR] {}", message);
        }
    }

    /// Print a header for a section
    pub fn header(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bright_white().bold().underline());
        } else {
            println!("\n  === {} ===", title);
        }
    }

    /// Print a key-value pair
    pub fn kv(&self, key: &str, value: &str) {
        if self.colored {
            println!("    {}: {}", key.dimmed(), value.bright_white());
        } else {
            println!("    {}: {}", key, value);
        }
    }

    /// Print a numbered source line
    pub fn source(&self, index: usize, source: &Source) {
        if self.colored {
            println!(
                "    {} {} {}",
                format!("[{}]", index).dimmed(),
                source.label.bright_white(),
                source.url.bright_cyan().underline()
            );
        } else {
            println!("    [{}] {} {}", index, source.label, source.url);
        }
    }

    /// Print a hint/tip message
    pub fn hint(&self, message: &str) {
        if self.colored {
            println!("\n  {} {}", "💡".dimmed(), message.dimmed().italic());
        } else {
            println!("\n  [TIP] {}", message);
        }
    }

    /// Print a research report: the answer, its sources, then run stats
    pub fn report(&self, report: &ResearchReport) {
        println!("\n{}\n", report.answer.trim());

        if report.sources.is_empty() {
            self.warning("No sources were cited");
        } else {
            self.header("Sources");
            for (i, source) in report.sources.iter().enumerate() {
                self.source(i + 1, source);
            }
        }

        self.header("Run");
        self.kv("Rounds", &report.rounds.to_string());
        self.kv("Queries", &report.queries.len().to_string());
        self.kv("Stopped", &report.stop_reason.to_string());
    }

    /// Print newline
    pub fn newline(&self) {
        println!();
    }
}
