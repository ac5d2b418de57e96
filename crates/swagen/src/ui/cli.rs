use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::colors::{ColorMode, Colors, ThemeMode};

pub const DEFAULT_DOCUMENT_OUTPUT: &str = "./build/swagger.json";
pub const DEFAULT_GENERATE_OUTPUT: &str = "./build/gen";
pub const DEFAULT_LANGUAGE: &str = "typescript";

#[derive(Parser, Debug)]
#[command(name = "swagen")]
#[command(author, version, about = "Merge, filter and generate clients from Swagger 2.0 documents")]
#[command(styles = Colors::clap_styles())]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  /// Control color output
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub color: ColorMode,

  /// Terminal theme (dark or light background)
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub theme: ThemeMode,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Merge several documents into one, deduplicating identical definitions
  Merge(MergeCommand),
  /// Keep only the operations carrying the given tags
  Filter(FilterCommand),
  /// Generate client code from a document
  Generate(GenerateCommand),
  /// List information from a document
  List {
    #[command(subcommand)]
    list_command: ListCommands,
  },
}

#[derive(Args, Debug, Clone)]
pub struct MergeCommand {
  /// Input document, optionally scoped as SCOPE@FILE; repeat for several inputs
  #[arg(short, long = "input", value_name = "[SCOPE@]FILE")]
  pub inputs: Vec<String>,

  /// Further inputs, in the same [SCOPE@]FILE form
  #[arg(value_name = "[SCOPE@]FILE")]
  pub files: Vec<String>,

  /// Number of name compression passes applied to the merged definitions
  #[arg(short, long = "compress", value_name = "LEVEL", default_value_t = 0, allow_negative_numbers = true)]
  pub compress_level: i32,

  /// Document to merge into instead of the built-in skeleton
  #[arg(short, long, value_name = "FILE")]
  pub base: Option<PathBuf>,

  /// Where to write the merged document; `-` writes to stdout
  #[arg(short, long, value_name = "FILE", default_value = DEFAULT_DOCUMENT_OUTPUT)]
  pub output: PathBuf,

  /// Pretty-print the JSON output
  #[arg(short, long, default_value_t = false)]
  pub pretty: bool,

  /// Enable verbose output with the deduplication and alias maps
  #[arg(short, long, default_value_t = false)]
  pub verbose: bool,

  /// Suppress non-essential output (errors only)
  #[arg(short, long, default_value_t = false)]
  pub quiet: bool,
}

#[derive(Args, Debug, Clone)]
pub struct FilterCommand {
  /// Path to the document to filter
  #[arg(short, long, value_name = "FILE")]
  pub input: PathBuf,

  /// Tags to keep (comma-separated or repeated)
  #[arg(short, long, value_name = "TAGS", value_delimiter = ',', required = true)]
  pub tags: Vec<String>,

  /// Where to write the filtered document; `-` writes to stdout
  #[arg(short, long, value_name = "FILE", default_value = DEFAULT_DOCUMENT_OUTPUT)]
  pub output: PathBuf,

  /// Pretty-print the JSON output
  #[arg(short, long, default_value_t = false)]
  pub pretty: bool,

  /// Suppress non-essential output (errors only)
  #[arg(short, long, default_value_t = false)]
  pub quiet: bool,
}

#[derive(Args, Debug, Clone)]
pub struct GenerateCommand {
  /// Path to the document to generate from
  #[arg(short, long, value_name = "FILE", required_unless_present = "file")]
  pub input: Option<PathBuf>,

  /// The input document, as a positional argument
  #[arg(value_name = "FILE", conflicts_with = "input")]
  pub file: Option<PathBuf>,

  /// Target language; see `swagen list generators`
  #[arg(short, long = "lang", value_name = "LANG", default_value = DEFAULT_LANGUAGE)]
  pub language: String,

  /// Directory the generated files are written to
  #[arg(short, long, value_name = "DIR", default_value = DEFAULT_GENERATE_OUTPUT)]
  pub output: PathBuf,

  /// List every generated file
  #[arg(short, long, default_value_t = false)]
  pub verbose: bool,

  /// Suppress non-essential output (errors only)
  #[arg(short, long, default_value_t = false)]
  pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum ListCommands {
  /// List all operations defined in a document
  Operations {
    /// Path to the document
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,
  },
  /// List all definitions with the number of references to each
  Definitions {
    /// Path to the document
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,
  },
  /// List the available code generators
  Generators,
}
