//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output, including colored output,
//! progress tracking, and formatted tables. A quiet formatter swallows everything,
//! which is what `--json` runs and tests use.

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Manages all CLI output with consistent styling and formatting.
///
/// This struct provides methods for:
/// - Success messages (green with ✓)
/// - Error messages (red with ✗)
/// - Warning messages (yellow with ⚠)
/// - Info messages (cyan)
/// - Progress bars for operations
/// - Summary tables with statistics
#[derive(Debug, Clone, Copy)]
pub struct OutputFormatter {
    quiet: bool,
}

impl OutputFormatter {
    /// Creates a formatter that prints to the terminal.
    pub fn new() -> Self {
        Self { quiet: false }
    }

    /// Creates a formatter that prints nothing.
    pub fn quiet() -> Self {
        Self { quiet: true }
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use doctidy::output::OutputFormatter;
    /// OutputFormatter::new().success("Renamed main directory");
    /// ```
    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("  {}", Self::success_line(message));
        }
    }

    /// Prints an error message in red with an X mark.
    pub fn error(&self, message: &str) {
        if !self.quiet {
            eprintln!("  {}", Self::error_line(message));
        }
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(&self, message: &str) {
        if !self.quiet {
            println!("  {} {}", "⚠".yellow(), message);
        }
    }

    /// Prints an info message in cyan.
    pub fn info(&self, message: &str) {
        if !self.quiet {
            println!("  {}", message.cyan());
        }
    }

    /// Prints a regular message without styling.
    pub fn plain(&self, message: &str) {
        if !self.quiet {
            println!("{}", message);
        }
    }

    /// Prints a section header.
    pub fn header(&self, header: &str) {
        if !self.quiet {
            println!("\n{}", header.bold());
        }
    }

    /// Prints a boxed banner.
    pub fn banner(&self, title: &str) {
        if self.quiet {
            return;
        }
        let width = 60;
        println!("╔{}╗", "═".repeat(width));
        println!("║  {:<w$}║", title.bold(), w = width - 2);
        println!("╚{}╝", "═".repeat(width));
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(&self, message: &str) {
        if !self.quiet {
            println!("{}", format!("[DRY RUN] {}", message).yellow());
        }
    }

    /// `✓ message` in green.
    pub fn success_line(message: &str) -> String {
        format!("{} {}", "✓".green(), message)
    }

    /// `✗ message` in red.
    pub fn error_line(message: &str) -> String {
        format!("{} {}", "✗".red(), message)
    }

    /// Creates a progress bar for file operations. Hidden when quiet.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use doctidy::output::OutputFormatter;
    /// let pb = OutputFormatter::new().create_progress_bar(100);
    /// pb.inc(1);
    /// pb.finish_and_clear();
    /// ```
    pub fn create_progress_bar(&self, total: u64) -> ProgressBar {
        if self.quiet {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        pb.set_style(style);
        pb
    }

    /// Prints a line above the progress bar.
    pub fn progress_line(&self, pb: &ProgressBar, line: &str) {
        if !self.quiet {
            pb.println(format!("  {}", line));
        }
    }

    /// Prints a summary table with document counts by category.
    ///
    /// Rows are printed in the order given.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use doctidy::output::OutputFormatter;
    ///
    /// let counts = vec![("SECURITY".to_string(), 3), ("REFERENCE".to_string(), 8)];
    /// OutputFormatter::new().summary_table(&counts, 11);
    /// ```
    pub fn summary_table(&self, category_counts: &[(String, usize)], total_files: usize) {
        if self.quiet {
            return;
        }
        self.header("SUMMARY");

        let max_category_len = category_counts
            .iter()
            .map(|(name, _)| name.chars().count())
            .max()
            .unwrap_or(0)
            .max(8);

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = max_category_len
        );
        println!("{}", "-".repeat(max_category_len + 10));

        for (category, count) in category_counts {
            let file_word = if *count == 1 { "file" } else { "files" };
            println!(
                "{:<width$} | {} {}",
                category,
                count.to_string().green(),
                file_word,
                width = max_category_len
            );
        }

        println!("{}", "-".repeat(max_category_len + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            if total_files == 1 { "file" } else { "files" },
            width = max_category_len
        );
    }
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new()
    }
}
