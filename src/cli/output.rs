//! Colored output helpers for CLI
//!
//! Consistent, colored terminal output for the deepr CLI.

use owo_colors::OwoColorize;

use crate::research::{ResearchResult, ValidationResult};

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

    /// Print the deepr banner
    pub fn banner(&self) {
        if self.colored {
            println!(
                r#"
   {}
   {}
   {}
   {}
"#,
                "     _                   ".bright_cyan().bold(),
                "  __| | ___  ___ _ __  _ __ ".bright_cyan().bold(),
                " / _` |/ _ \\/ _ \\ '_ \\| '__|".cyan().bold(),
                " \\__,_|\\___|\\___| .__/|_|   ".blue().bold(),
            );
            println!(
                "   {} {}\n",
                "Four-phase deep research".bright_white().bold(),
                format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
            );
        } else {
            println!(
                "\n   deepr - Four-phase deep research v{}\n",
                env!("CARGO_PKG_VERSION")
            );
        }
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

    /// Print a file creation message
    pub fn created(&self, file_type: &str, path: &str) {
        if self.colored {
            println!(
                "  {} {} {}",
                "✓".green().bold(),
                file_type.dimmed(),
                path.bright_white()
            );
        } else {
            println!("  [CREATED] {} {}", file_type, path);
        }
    }

    /// Print a file skipped message
    pub fn skipped(&self, path: &str, reason: &str) {
        if self.colored {
            println!(
                "  {} {} {}",
                "○".yellow(),
                path.dimmed(),
                format!("({})", reason).yellow()
            );
        } else {
            println!("  [SKIPPED] {} ({})", path, reason);
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

    /// Print a subheader
    pub fn subheader(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.cyan().bold());
        } else {
            println!("\n  --- {} ---", title);
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

    /// Print a list item
    pub fn list_item(&self, item: &str) {
        if self.colored {
            println!("    {} {}", "•".blue(), item);
        } else {
            println!("    - {}", item);
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

    /// Print a command suggestion
    pub fn command(&self, cmd: &str) {
        if self.colored {
            println!("     {}", format!("$ {}", cmd).bright_cyan());
        } else {
            println!("     $ {}", cmd);
        }
    }

    /// Print completion message with next steps
    pub fn complete(&self, message: &str) {
        if self.colored {
            println!("\n  {} {}", "🚀".green(), message.bright_green().bold());
        } else {
            println!("\n  [DONE] {}", message);
        }
    }

    /// Print newline
    pub fn newline(&self) {
        println!();
    }

    /// Print a research result as a readable summary
    pub fn research_result(&self, result: &ResearchResult) {
        self.header(&result.report.title);
        self.newline();
        println!("  {}", result.report.summary);

        self.subheader("Key findings");
        for finding in &result.report.key_findings {
            self.list_item(finding);
        }

        if !result.report.limitations.is_empty() {
            self.subheader("Limitations");
            println!("    {}", result.report.limitations);
        }

        self.subheader("Sources");
        for source in &result.report.sources {
            self.list_item(source);
        }

        self.subheader("Verification");
        self.validation(&result.validation);

        let t = &result.timings;
        self.subheader("Timings");
        self.kv("planning", &format!("{} ms", t.planning_ms));
        self.kv("gathering", &format!("{} ms", t.gathering_ms));
        self.kv("synthesis", &format!("{} ms", t.synthesis_ms));
        self.kv("verification", &format!("{} ms", t.verification_ms));
        self.kv("total", &format!("{} ms", t.total_ms));
    }

    fn validation(&self, validation: &ValidationResult) {
        let confidence = format!("confidence {:.2}", validation.confidence_score());
        if validation.is_valid() {
            self.success(&format!("Report verified ({confidence})"));
        } else {
            self.warning(&format!("Report flagged by verifier ({confidence})"));
        }
        for issue in validation.issues_found() {
            self.list_item(&format!("issue: {issue}"));
        }
        for recommendation in validation.recommendations() {
            self.list_item(&format!("recommendation: {recommendation}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::research::demo::demo_research_result;

    #[test]
    fn test_output_new() {
        let output = Output::new();
        assert!(output.colored);
    }

    #[test]
    fn test_output_no_color() {
        let output = Output::no_color();
        assert!(!output.colored);
    }

    #[test]
    fn test_output_methods_no_panic() {
        for output in [Output::new(), Output::no_color()] {
            output.banner();
            output.success("test success");
            output.info("test info");
            output.warning("test warning");
            output.error("test error");
            output.created("file", "path/to/file");
            output.skipped("path", "reason");
            output.header("Test Header");
            output.subheader("Test Subheader");
            output.kv("key", "value");
            output.list_item("item");
            output.hint("hint message");
            output.command("some command");
            output.complete("complete message");
            output.newline();
        }
    }

    #[test]
    fn test_research_result_rendering() {
        let mut result = demo_research_result("quantum").unwrap();
        Output::no_color().research_result(&result);

        result.validation =
            ValidationResult::new(false, 0.4, vec!["unsupported claim".to_string()], vec![])
                .unwrap();
        Output::new().research_result(&result);
    }
}
