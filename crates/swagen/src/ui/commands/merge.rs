use std::path::PathBuf;

use anyhow::Context;

use super::CommandLogger;
use crate::{
  merger::{MergeOptions, MergeStats, ScopedInput, merge},
  ui::{Colors, cli::MergeCommand},
  utils::spec::{STDOUT_PATH, load_document, write_document},
};

#[derive(Debug, Clone)]
pub struct MergeConfig {
  pub inputs: Vec<ScopedInput>,
  pub base: Option<PathBuf>,
  pub compress_level: i32,
  pub output: PathBuf,
  pub pretty: bool,
  pub verbose: bool,
  pub quiet: bool,
  /// The merged document goes to stdout, so progress output is suppressed.
  pub to_stdout: bool,
}

impl MergeConfig {
  pub fn from_command(command: MergeCommand) -> anyhow::Result<Self> {
    let MergeCommand {
      inputs,
      files,
      compress_level,
      base,
      output,
      pretty,
      verbose,
      quiet,
    } = command;

    let inputs = inputs
      .iter()
      .chain(&files)
      .map(|input| ScopedInput::parse(input))
      .collect::<Result<Vec<_>, _>>()?;
    anyhow::ensure!(!inputs.is_empty(), "no input documents given, use -i [SCOPE@]FILE");

    let to_stdout = output.as_os_str() == STDOUT_PATH;
    Ok(Self {
      inputs,
      base,
      compress_level,
      output,
      pretty,
      verbose,
      quiet,
      to_stdout,
    })
  }
}

fn print_statistics(logger: &CommandLogger<'_>, stats: &MergeStats) {
  logger.stat("Documents merged:", stats.documents_merged);
  logger.stat("Definitions received:", stats.definitions_received);
  logger.stat("Definitions kept:", stats.definitions_kept);
  logger.stat("Paths merged:", stats.paths_merged);

  if !stats.deduplicated.is_empty() {
    logger.stat("Deduplicated:", stats.deduplicated.len());
    for (name, kept) in &stats.deduplicated {
      logger.mapping(name, kept);
    }
  }
  if !stats.renamed.is_empty() {
    logger.stat("Renamed:", stats.renamed.len());
    for (name, renamed) in &stats.renamed {
      logger.mapping(name, renamed);
    }
  }
  if !stats.aliases.is_empty() {
    logger.stat("Compressed names:", stats.aliases.len());
    for (name, alias) in &stats.aliases {
      logger.mapping(name, alias);
    }
  }
  if !stats.warnings.is_empty() {
    logger.stat("Warnings:", stats.warnings.len());
  }
  for warning in &stats.warnings {
    logger.warn(&warning.to_string());
  }
}

pub async fn merge_documents(config: MergeConfig, colors: &Colors) -> anyhow::Result<()> {
  let logger = CommandLogger::new(colors, config.verbose, config.quiet).writing_to_stdout(config.to_stdout);

  let base = match &config.base {
    Some(path) => {
      logger.info(&format!("Loading base document from: {}", path.display()));
      Some(load_document(path).await?)
    }
    None => None,
  };

  let mut documents = Vec::with_capacity(config.inputs.len());
  let mut scopes = Vec::with_capacity(config.inputs.len());
  for input in &config.inputs {
    if input.scope.is_empty() {
      logger.info(&format!("Loading {}", input.path.display()));
    } else {
      logger.info(&format!("Loading {} as scope '{}'", input.path.display(), input.scope));
    }
    documents.push(load_document(&input.path).await?);
    scopes.push(input.scope.clone());
  }

  logger.info(&format!(
    "Merging {} documents (compress level {})...",
    documents.len(),
    config.compress_level
  ));
  let options = MergeOptions::builder()
    .compress_level(config.compress_level)
    .maybe_base(base)
    .build();
  let output = merge(documents, &scopes, options).context("merge failed")?;
  print_statistics(&logger, &output.stats);

  logger.info(&format!("Writing to: {}", config.output.display()));
  write_document(&output.document, config.pretty, &config.output).await?;

  logger.success("Successfully merged documents");
  Ok(())
}
