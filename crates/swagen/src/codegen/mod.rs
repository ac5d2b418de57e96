//! Client code generation from a (merged or filtered) document.
//!
//! Generators are looked up by name in a [`GeneratorRegistry`] built once at startup. A generator
//! turns a document into a list of files relative to the output directory; writing them is up to
//! the caller.

mod helpers;
mod react_redux;
mod typescript;


use std::{collections::BTreeMap, path::PathBuf};

pub use react_redux::ReactReduxGenerator;
pub use typescript::TypeScriptGenerator;

use crate::document::Document;

#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
  #[error("generator not registered: {0}")]
  UnknownGenerator(String),
  #[error("generator '{0}' is already registered")]
  DuplicateGenerator(String),
  #[error("document has no paths to generate a client for")]
  NoPaths,
  #[error("unresolved reference '{0}'")]
  UnresolvedReference(String),
  #[error("failed to register template '{name}': {source}")]
  Template {
    name: &'static str,
    #[source]
    source: Box<handlebars::TemplateError>,
  },
  #[error("failed to render '{name}': {source}")]
  Render {
    name: String,
    #[source]
    source: handlebars::RenderError,
  },
}

pub type GeneratorResult<T> = Result<T, GeneratorError>;

/// A file produced by a generator, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
  pub path: PathBuf,
  pub contents: String,
}

pub trait Generator {
  fn name(&self) -> &'static str;

  fn generate(&self, document: &Document) -> GeneratorResult<Vec<GeneratedFile>>;
}

pub type GeneratorFactory = fn() -> GeneratorResult<Box<dyn Generator>>;

#[derive(Debug, Clone, Default)]
pub struct GeneratorRegistry {
  factories: BTreeMap<String, GeneratorFactory>,
}

impl GeneratorRegistry {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Registry holding every generator that ships with swagen.
  #[must_use]
  pub fn with_builtin() -> Self {
    let mut registry = Self::new();
    registry
      .factories
      .insert(typescript::GENERATOR_NAME.to_string(), TypeScriptGenerator::boxed);
    registry
      .factories
      .insert(react_redux::GENERATOR_NAME.to_string(), ReactReduxGenerator::boxed);
    registry
  }

  pub fn register(&mut self, name: &str, factory: GeneratorFactory) -> GeneratorResult<()> {
    if self.factories.contains_key(name) {
      return Err(GeneratorError::DuplicateGenerator(name.to_string()));
    }
    self.factories.insert(name.to_string(), factory);
    Ok(())
  }

  pub fn create(&self, name: &str) -> GeneratorResult<Box<dyn Generator>> {
    let factory = self
      .factories
      .get(name)
      .ok_or_else(|| GeneratorError::UnknownGenerator(name.to_string()))?;
    factory()
  }

  /// Registered generator names in alphabetical order.
  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.factories.keys().map(String::as_str)
  }
}
