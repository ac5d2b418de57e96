#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
use clap::Parser;

use crate::ui::{Cli, Colors, Commands, ListCommands, colors};

mod codegen;
mod document;
mod filter;
mod merger;
mod ui;
mod utils;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();
  let colors = Colors::new(colors::colors_enabled(cli.color), colors::detect_theme(cli.theme));

  match cli.command {
    Commands::Merge(command) => {
      let config = ui::commands::MergeConfig::from_command(command)?;
      ui::commands::merge_documents(config, &colors).await?;
    }
    Commands::Filter(command) => {
      let config = ui::commands::FilterConfig::from_command(command)?;
      ui::commands::filter_document(config, &colors).await?;
    }
    Commands::Generate(command) => {
      let config = ui::commands::GenerateConfig::from_command(command)?;
      ui::commands::generate_client(config, &colors).await?;
    }
    Commands::List { list_command } => match list_command {
      ListCommands::Operations { input } => ui::commands::list_operations(&input, &colors).await?,
      ListCommands::Definitions { input } => ui::commands::list_definitions(&input, &colors).await?,
      ListCommands::Generators => {
        ui::commands::list_generators(&codegen::GeneratorRegistry::with_builtin(), &colors);
      }
    },
  }

  Ok(())
}
