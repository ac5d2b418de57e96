use std::path::PathBuf;

use super::CommandLogger;
use crate::{
  filter::filter,
  ui::{Colors, cli::FilterCommand},
  utils::spec::{STDOUT_PATH, load_document, write_document},
};

#[derive(Debug, Clone)]
pub struct FilterConfig {
  pub input: PathBuf,
  pub tags: Vec<String>,
  pub output: PathBuf,
  pub pretty: bool,
  pub quiet: bool,
  pub to_stdout: bool,
}

impl FilterConfig {
  pub fn from_command(command: FilterCommand) -> anyhow::Result<Self> {
    let tags: Vec<String> = command
      .tags
      .iter()
      .map(|tag| tag.trim().to_string())
      .filter(|tag| !tag.is_empty())
      .collect();
    anyhow::ensure!(!tags.is_empty(), "at least one non-empty tag is required");

    let to_stdout = command.output.as_os_str() == STDOUT_PATH;
    Ok(Self {
      input: command.input,
      tags,
      output: command.output,
      pretty: command.pretty,
      quiet: command.quiet,
      to_stdout,
    })
  }
}

pub async fn filter_document(config: FilterConfig, colors: &Colors) -> anyhow::Result<()> {
  let logger = CommandLogger::new(colors, false, config.quiet).writing_to_stdout(config.to_stdout);

  logger.info(&format!("Loading {}", config.input.display()));
  let document = load_document(&config.input).await?;
  let paths_before = document.paths.len();
  let definitions_before = document.definitions.len();

  logger.info(&format!("Keeping operations tagged: {}", config.tags.join(", ")));
  let filtered = filter(document, &config.tags)?;

  logger.stat("Paths kept:", format!("{} of {paths_before}", filtered.paths.len()));
  logger.stat(
    "Definitions kept:",
    format!("{} of {definitions_before}", filtered.definitions.len()),
  );
  logger.stat("Operations kept:", filtered.operations().count());
  if filtered.paths.is_empty() {
    logger.warn("no operation carries any of the requested tags");
  }

  logger.info(&format!("Writing to: {}", config.output.display()));
  write_document(&filtered, config.pretty, &config.output).await?;

  logger.success("Successfully filtered document");
  Ok(())
}
