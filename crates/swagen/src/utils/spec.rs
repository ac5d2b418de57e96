use std::{ffi::OsStr, path::Path};

use anyhow::Context;
use fmmap::tokio::{AsyncMmapFile, AsyncMmapFileExt};
use tokio::io::AsyncWriteExt;

use crate::document::Document;

/// Output path that sends the document to stdout instead of a file.
pub const STDOUT_PATH: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpecFormat {
  #[default]
  Json,
  Yaml,
}

impl SpecFormat {
  #[must_use]
  pub fn from_extension(ext: &str) -> Self {
    match ext {
      "yaml" | "yml" => Self::Yaml,
      _ => Self::Json,
    }
  }
}

pub struct SpecLoader {
  file: AsyncMmapFile,
  format: SpecFormat,
}

impl SpecLoader {
  pub async fn open(path: &Path) -> anyhow::Result<Self> {
    anyhow::ensure!(!path.is_dir(), "expected {} to be a file not a directory", path.display());

    let format = path
      .extension()
      .and_then(OsStr::to_str)
      .map_or(SpecFormat::default(), SpecFormat::from_extension);

    let file = AsyncMmapFile::open(path)
      .await
      .with_context(|| format!("failed to open {}", path.display()))?;

    Ok(Self { file, format })
  }

  pub fn parse(&self) -> anyhow::Result<Document> {
    match self.format {
      SpecFormat::Json => parse_json(self.file.as_slice()),
      SpecFormat::Yaml => {
        let content = std::str::from_utf8(self.file.as_slice())?;
        Ok(serde_yaml::from_str(content)?)
      }
    }
  }
}

/// Loads and parses one document, choosing JSON or YAML from the file extension.
pub async fn load_document(path: &Path) -> anyhow::Result<Document> {
  SpecLoader::open(path)
    .await?
    .parse()
    .with_context(|| format!("failed to parse {}", path.display()))
}

/// Deserializes JSON, reporting the JSON path of the first field that fails to parse.
pub fn parse_json(bytes: &[u8]) -> anyhow::Result<Document> {
  let deserializer = &mut serde_json::Deserializer::from_slice(bytes);
  serde_path_to_error::deserialize(deserializer)
    .map_err(|err| anyhow::anyhow!("invalid document at `{}`: {}", err.path(), err.inner()))
}

/// Writes a document as JSON to `output`, creating parent directories, or to stdout for `-`.
pub async fn write_document(document: &Document, pretty: bool, output: &Path) -> anyhow::Result<()> {
  let mut json = document.to_json_string(pretty)?;
  json.push('\n');

  if output.as_os_str() == STDOUT_PATH {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(json.as_bytes()).await?;
    stdout.flush().await?;
    return Ok(());
  }

  if let Some(parent) = output.parent()
    && !parent.as_os_str().is_empty()
  {
    tokio::fs::create_dir_all(parent).await?;
  }
  tokio::fs::write(output, json)
    .await
    .with_context(|| format!("failed to write {}", output.display()))?;
  Ok(())
}
