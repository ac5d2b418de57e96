pub mod filter;
pub mod generate;
pub mod list;
pub mod merge;

use chrono::{Local, Timelike};
use crossterm::style::Stylize;
pub use filter::{FilterConfig, filter_document};
pub use generate::{GenerateConfig, generate_client};
pub use list::{list_definitions, list_generators, list_operations};
pub use merge::{MergeConfig, merge_documents};

use crate::ui::Colors;

fn format_timestamp() -> String {
  let now = Local::now();
  format!("[{:02}:{:02}:{:02}]", now.hour(), now.minute(), now.second())
}

/// Timestamped progress lines on stdout, warnings on stderr.
///
/// `--quiet` silences both. Writing the document to stdout only silences progress, since the
/// warnings go to stderr and cannot corrupt the output.
struct CommandLogger<'a> {
  colors: &'a Colors,
  verbose: bool,
  quiet: bool,
  to_stdout: bool,
}

impl<'a> CommandLogger<'a> {
  fn new(colors: &'a Colors, verbose: bool, quiet: bool) -> Self {
    Self {
      colors,
      verbose,
      quiet,
      to_stdout: false,
    }
  }

  fn writing_to_stdout(mut self, to_stdout: bool) -> Self {
    self.to_stdout = to_stdout;
    self
  }

  fn shows_progress(&self) -> bool {
    !self.quiet && !self.to_stdout
  }

  fn shows_warnings(&self) -> bool {
    !self.quiet
  }

  fn info(&self, message: &str) {
    if self.shows_progress() {
      println!(
        "{} {}",
        format_timestamp().with(self.colors.timestamp()),
        message.with(self.colors.primary())
      );
    }
  }

  fn stat(&self, label: &str, value: impl ToString) {
    if self.shows_progress() {
      println!(
        "            {:<25} {}",
        label.with(self.colors.label()),
        value.to_string().with(self.colors.value())
      );
    }
  }

  /// A `from -> to` line, shown only with `--verbose`.
  fn mapping(&self, from: &str, to: &str) {
    if self.verbose && self.shows_progress() {
      println!(
        "              {} -> {}",
        from.with(self.colors.info()),
        to.with(self.colors.accent())
      );
    }
  }

  fn warn(&self, message: &str) {
    if self.shows_warnings() {
      eprintln!(
        "{} {}",
        "Warning:".with(self.colors.accent()),
        message.with(self.colors.primary())
      );
    }
  }

  fn success(&self, message: &str) {
    if self.shows_progress() {
      println!();
      println!(
        "{} {}",
        format_timestamp().with(self.colors.timestamp()),
        message.with(self.colors.success())
      );
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ui::colors::Theme;

  #[test]
  fn test_stdout_output_keeps_warnings() {
    let colors = Colors::new(false, Theme::Dark);
    let logger = CommandLogger::new(&colors, true, false).writing_to_stdout(true);
    assert!(!logger.shows_progress());
    assert!(logger.shows_warnings());
  }

  #[test]
  fn test_quiet_silences_everything() {
    let colors = Colors::new(false, Theme::Dark);
    let logger = CommandLogger::new(&colors, true, true);
    assert!(!logger.shows_progress());
    assert!(!logger.shows_warnings());
  }
}
