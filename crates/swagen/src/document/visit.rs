use serde_json::Value;

use super::{AdditionalProperties, Document, Extra, Operation, Parameter, PathItem, Response, Schema};

const REF_KEY: &str = "$ref";

/// `$ref` strings nested anywhere in one node's unmodelled fields.
#[must_use]
pub fn extra_refs(extra: &Extra) -> Vec<&str> {
  let mut refs = vec![];
  raw_refs(extra, &mut refs);
  refs
}

/// `$ref` strings nested anywhere in unmodelled fields, such as vendor extensions or the
/// `items` of a non-body parameter.
fn raw_refs<'a>(extra: &'a Extra, refs: &mut Vec<&'a str>) {
  for (key, value) in extra {
    value_refs(key, value, refs);
  }
}

fn value_refs<'a>(key: &str, value: &'a Value, refs: &mut Vec<&'a str>) {
  match value {
    Value::String(target) if key == REF_KEY => refs.push(target),
    Value::Object(map) => {
      for (key, value) in map {
        value_refs(key, value, refs);
      }
    }
    Value::Array(items) => {
      for item in items {
        value_refs("", item, refs);
      }
    }
    _ => {}
  }
}

fn raw_refs_mut(extra: &mut Extra, visit: &mut impl FnMut(&mut String)) {
  for (key, value) in extra.iter_mut() {
    value_refs_mut(key, value, visit);
  }
}

fn value_refs_mut(key: &str, value: &mut Value, visit: &mut impl FnMut(&mut String)) {
  match value {
    Value::String(target) if key == REF_KEY => visit(target),
    Value::Object(map) => {
      for (key, value) in map.iter_mut() {
        value_refs_mut(key, value, visit);
      }
    }
    Value::Array(items) => {
      for item in items {
        value_refs_mut("", item, visit);
      }
    }
    _ => {}
  }
}

impl Schema {
  /// Visits this node and every schema nested under it, parents before children.
  pub fn walk(&self, visit: &mut impl FnMut(&Schema)) {
    visit(self);
    for child in self.children() {
      child.walk(visit);
    }
  }

  /// Direct sub-schemas: properties, `items`, `allOf` members and `additionalProperties`.
  pub fn children(&self) -> impl Iterator<Item = &Schema> {
    let additional = match self.additional_properties.as_ref() {
      Some(AdditionalProperties::Schema(schema)) => Some(schema.as_ref()),
      _ => None,
    };
    self
      .properties
      .values()
      .chain(self.items.as_deref())
      .chain(self.all_of.iter())
      .chain(additional)
  }

  /// Every `$ref` in this schema tree, typed or nested in unmodelled keywords.
  #[must_use]
  pub fn schema_refs(&self) -> Vec<&str> {
    let mut refs = vec![];
    self.collect_refs(&mut refs);
    refs
  }

  fn collect_refs<'a>(&'a self, refs: &mut Vec<&'a str>) {
    refs.extend(self.ref_path.as_deref());
    raw_refs(&self.extra, refs);
    for child in self.children() {
      child.collect_refs(refs);
    }
  }

  fn walk_refs_mut(&mut self, visit: &mut impl FnMut(&mut String)) {
    if let Some(ref_path) = self.ref_path.as_mut() {
      visit(ref_path);
    }
    raw_refs_mut(&mut self.extra, visit);
    for property in self.properties.values_mut() {
      property.walk_refs_mut(visit);
    }
    if let Some(items) = self.items.as_deref_mut() {
      items.walk_refs_mut(visit);
    }
    for member in &mut self.all_of {
      member.walk_refs_mut(visit);
    }
    if let Some(AdditionalProperties::Schema(extra)) = self.additional_properties.as_mut() {
      extra.walk_refs_mut(visit);
    }
  }
}

impl Parameter {
  /// Schema references of this parameter; its own `$ref` into `#/parameters/` is not included.
  #[must_use]
  pub fn schema_refs(&self) -> Vec<&str> {
    let mut refs = vec![];
    self.collect_refs(&mut refs);
    refs
  }

  fn collect_refs<'a>(&'a self, refs: &mut Vec<&'a str>) {
    if let Some(schema) = &self.schema {
      schema.collect_refs(refs);
    }
    raw_refs(&self.extra, refs);
  }

  fn walk_refs_mut(&mut self, visit: &mut impl FnMut(&mut String)) {
    if let Some(ref_path) = self.ref_path.as_mut() {
      visit(ref_path);
    }
    if let Some(schema) = self.schema.as_mut() {
      schema.walk_refs_mut(visit);
    }
    raw_refs_mut(&mut self.extra, visit);
  }
}

impl Response {
  /// Schema references of this response; its own `$ref` into `#/responses/` is not included.
  #[must_use]
  pub fn schema_refs(&self) -> Vec<&str> {
    let mut refs = vec![];
    self.collect_refs(&mut refs);
    refs
  }

  fn collect_refs<'a>(&'a self, refs: &mut Vec<&'a str>) {
    if let Some(schema) = &self.schema {
      schema.collect_refs(refs);
    }
    raw_refs(&self.extra, refs);
  }

  fn walk_refs_mut(&mut self, visit: &mut impl FnMut(&mut String)) {
    if let Some(ref_path) = self.ref_path.as_mut() {
      visit(ref_path);
    }
    if let Some(schema) = self.schema.as_mut() {
      schema.walk_refs_mut(visit);
    }
    raw_refs_mut(&mut self.extra, visit);
  }
}

impl Operation {
  /// Schemas an operation mentions directly: body parameters and response payloads.
  pub fn schemas(&self) -> impl Iterator<Item = &Schema> {
    self
      .parameters
      .iter()
      .filter_map(|p| p.schema.as_ref())
      .chain(self.responses.values().filter_map(|r| r.schema.as_ref()))
  }

  fn collect_refs<'a>(&'a self, refs: &mut Vec<&'a str>) {
    for parameter in &self.parameters {
      parameter.collect_refs(refs);
    }
    for response in self.responses.values() {
      response.collect_refs(refs);
    }
    raw_refs(&self.extra, refs);
  }

  fn walk_refs_mut(&mut self, visit: &mut impl FnMut(&mut String)) {
    for parameter in &mut self.parameters {
      parameter.walk_refs_mut(visit);
    }
    for response in self.responses.values_mut() {
      response.walk_refs_mut(visit);
    }
    raw_refs_mut(&mut self.extra, visit);
  }
}

impl PathItem {
  /// Schema references under this path: path-level parameters and every operation.
  #[must_use]
  pub fn schema_refs(&self) -> Vec<&str> {
    let mut refs = vec![];
    for parameter in &self.parameters {
      parameter.collect_refs(&mut refs);
    }
    for (_, operation) in self.operations() {
      operation.collect_refs(&mut refs);
    }
    raw_refs(&self.extra, &mut refs);
    refs
  }

  fn walk_refs_mut(&mut self, visit: &mut impl FnMut(&mut String)) {
    for parameter in &mut self.parameters {
      parameter.walk_refs_mut(visit);
    }
    let slots = [
      &mut self.get,
      &mut self.put,
      &mut self.post,
      &mut self.delete,
      &mut self.options,
      &mut self.head,
      &mut self.patch,
    ];
    for operation in slots.into_iter().flatten() {
      operation.walk_refs_mut(visit);
    }
    raw_refs_mut(&mut self.extra, visit);
  }
}

impl Document {
  /// Visits every `$ref` string under paths, definitions and the shared parameter/response maps,
  /// including the references of parameters and responses themselves and any reference nested
  /// in unmodelled fields.
  pub fn walk_refs_mut(&mut self, visit: &mut impl FnMut(&mut String)) {
    for item in self.paths.values_mut() {
      item.walk_refs_mut(visit);
    }
    for schema in self.definitions.values_mut() {
      schema.walk_refs_mut(visit);
    }
    for parameter in self.parameters.values_mut() {
      parameter.walk_refs_mut(visit);
    }
    for response in self.responses.values_mut() {
      response.walk_refs_mut(visit);
    }
  }

  /// Every schema `$ref` in the document, typed or nested in unmodelled fields. References of
  /// parameters and responses into the shared `parameters`/`responses` maps are not included.
  #[must_use]
  pub fn schema_refs(&self) -> Vec<&str> {
    let mut refs = vec![];
    for item in self.paths.values() {
      refs.extend(item.schema_refs());
    }
    for schema in self.definitions.values() {
      schema.collect_refs(&mut refs);
    }
    for parameter in self.parameters.values() {
      parameter.collect_refs(&mut refs);
    }
    for response in self.responses.values() {
      response.collect_refs(&mut refs);
    }
    refs
  }
}
