use std::path::PathBuf;

use anyhow::Context;

use super::CommandLogger;
use crate::{
  codegen::GeneratorRegistry,
  ui::{Colors, cli::GenerateCommand},
  utils::spec::load_document,
};

#[derive(Debug, Clone)]
pub struct GenerateConfig {
  pub input: PathBuf,
  pub language: String,
  pub output: PathBuf,
  pub verbose: bool,
  pub quiet: bool,
}

impl GenerateConfig {
  pub fn from_command(command: GenerateCommand) -> anyhow::Result<Self> {
    let input = command
      .input
      .or(command.file)
      .context("an input document is required")?;

    Ok(Self {
      input,
      language: command.language.to_lowercase(),
      output: command.output,
      verbose: command.verbose,
      quiet: command.quiet,
    })
  }
}

pub async fn generate_client(config: GenerateConfig, colors: &Colors) -> anyhow::Result<()> {
  let logger = CommandLogger::new(colors, config.verbose, config.quiet);

  let registry = GeneratorRegistry::with_builtin();
  let generator = registry.create(&config.language)?;

  logger.info(&format!("Loading {}", config.input.display()));
  let document = load_document(&config.input).await?;

  logger.info(&format!("Generating {} client...", generator.name()));
  let files = generator.generate(&document)?;

  tokio::fs::create_dir_all(&config.output)
    .await
    .with_context(|| format!("failed to create {}", config.output.display()))?;
  for file in &files {
    let path = config.output.join(&file.path);
    if let Some(parent) = path.parent() {
      tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&path, &file.contents)
      .await
      .with_context(|| format!("failed to write {}", path.display()))?;
    logger.mapping(&file.path.display().to_string(), &path.display().to_string());
  }

  logger.stat("Operations:", document.operations().count());
  logger.stat("Definitions:", document.definitions.len());
  logger.stat("Files written:", files.len());
  logger.info(&format!("Output directory: {}", config.output.display()));

  logger.success("Successfully generated client");
  Ok(())
}
