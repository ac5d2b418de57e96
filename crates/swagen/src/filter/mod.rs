//! Narrows a document to the operations carrying a given set of tags.

#[cfg(test)]
mod tests;

use std::collections::HashSet;

use itertools::Itertools;
use strum::IntoEnumIterator;

use crate::{
  document::{Document, Extra, HttpMethod, Parameter, PathItem, Response, Schema, extra_refs},
  utils::{parse_definition_ref, parse_local_ref},
};

#[derive(Debug, thiserror::Error)]
pub enum FilterError {
  #[error("unresolved reference '{reference}' in {location}")]
  UnresolvedReference { reference: String, location: String },
}

pub type FilterResult<T> = Result<T, FilterError>;

/// Keeps only operations tagged with one of `tags`, and only the definitions they reach.
///
/// A kept operation's tag list is cut down to the tags that matched. Paths left without any
/// operation are dropped. Document-level parameters and responses survive only when a kept
/// operation or path references them; every other top-level field is left as is.
pub fn filter(mut document: Document, tags: &[String]) -> FilterResult<Document> {
  let mut paths = std::mem::take(&mut document.paths);
  paths.retain(|_, item| retain_tagged(item, tags));

  let reachable = {
    let mut reachable = Reachable::new(&document);
    for (path, item) in &paths {
      reachable.path_item(path, item)?;
    }
    reachable.into_names()
  };

  document.paths = paths;
  document.definitions.retain(|name, _| reachable.definitions.contains(name));
  document.definitions.sort_unstable_keys();
  document.parameters.retain(|name, _| reachable.parameters.contains(name));
  document.responses.retain(|name, _| reachable.responses.contains(name));
  Ok(document)
}

/// Clears every operation slot whose tags miss `tags`; returns whether any operation is left.
fn retain_tagged(item: &mut PathItem, tags: &[String]) -> bool {
  let mut kept = false;
  for method in HttpMethod::iter() {
    let slot = item.slot_mut(method);
    let Some(operation) = slot.as_mut() else {
      continue;
    };

    let shared: Vec<String> = operation
      .tags
      .iter()
      .filter(|tag| tags.contains(*tag))
      .unique()
      .cloned()
      .collect();
    if shared.is_empty() {
      *slot = None;
    } else {
      operation.tags = shared;
      kept = true;
    }
  }
  kept
}

#[derive(Debug, Default)]
struct ReachableNames {
  definitions: HashSet<String>,
  parameters: HashSet<String>,
  responses: HashSet<String>,
}

/// Transitive closure of everything the kept operations reference.
struct Reachable<'a> {
  document: &'a Document,
  names: ReachableNames,
  location: String,
}

impl<'a> Reachable<'a> {
  fn new(document: &'a Document) -> Self {
    Self {
      document,
      names: ReachableNames::default(),
      location: String::new(),
    }
  }

  fn into_names(self) -> ReachableNames {
    self.names
  }

  fn unresolved(&self, reference: &str) -> FilterError {
    FilterError::UnresolvedReference {
      reference: reference.to_string(),
      location: self.location.clone(),
    }
  }

  fn path_item(&mut self, path: &str, item: &PathItem) -> FilterResult<()> {
    self.location = format!("path '{path}'");
    for parameter in &item.parameters {
      self.parameter(parameter)?;
    }
    for (_, operation) in item.operations() {
      for parameter in &operation.parameters {
        self.parameter(parameter)?;
      }
      for response in operation.responses.values() {
        self.response(response)?;
      }
      self.extra(&operation.extra)?;
    }
    self.extra(&item.extra)
  }

  fn parameter(&mut self, parameter: &Parameter) -> FilterResult<()> {
    if let Some(reference) = parameter.ref_path.as_deref() {
      let document = self.document;
      let (name, shared) = parse_local_ref(reference, "parameters")
        .and_then(|name| document.parameters.get_key_value(&name))
        .ok_or_else(|| self.unresolved(reference))?;
      if self.names.parameters.insert(name.clone()) {
        self.parameter(shared)?;
      }
    }
    if let Some(schema) = &parameter.schema {
      self.schema(schema)?;
    }
    self.extra(&parameter.extra)
  }

  fn response(&mut self, response: &Response) -> FilterResult<()> {
    if let Some(reference) = response.ref_path.as_deref() {
      let document = self.document;
      let (name, shared) = parse_local_ref(reference, "responses")
        .and_then(|name| document.responses.get_key_value(&name))
        .ok_or_else(|| self.unresolved(reference))?;
      if self.names.responses.insert(name.clone()) {
        self.response(shared)?;
      }
    }
    if let Some(schema) = &response.schema {
      self.schema(schema)?;
    }
    self.extra(&response.extra)
  }

  fn schema(&mut self, schema: &Schema) -> FilterResult<()> {
    if let Some(reference) = schema.ref_path.as_deref() {
      self.definition(reference)?;
    }
    self.extra(&schema.extra)?;
    schema.children().try_for_each(|child| self.schema(child))
  }

  /// Follows `reference` when it points into `definitions`; other references are ignored.
  fn definition(&mut self, reference: &str) -> FilterResult<()> {
    let Some(name) = parse_definition_ref(reference) else {
      return Ok(());
    };
    let document = self.document;
    let target = document
      .definitions
      .get(&name)
      .ok_or_else(|| self.unresolved(reference))?;
    if self.names.definitions.insert(name) {
      self.schema(target)?;
    }
    Ok(())
  }

  /// Definition references nested in vendor extensions and other unmodelled fields.
  fn extra(&mut self, extra: &Extra) -> FilterResult<()> {
    extra_refs(extra).into_iter().try_for_each(|reference| self.definition(reference))
  }
}
