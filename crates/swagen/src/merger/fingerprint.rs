use std::fmt;

use json_canon::to_string as to_canonical_json;
use serde_json::Value;

use super::error::{MergeError, MergeResult};
use crate::{
  document::{AdditionalProperties, Document, Schema, SchemaKind},
  utils::parse_definition_ref,
};

const ARRAY_TAG: &[u8] = b"array";
const OBJECT_TAG: &[u8] = b"object";
const LEAF_TAG: &[u8] = b"leaf";
const CYCLE_TAG: &[u8] = b"cycle";

/// Structural content digest of a schema.
///
/// Two schemas that only differ in the names of the definitions they reference, in property order,
/// or in the order of `required`/`type`/`enum` entries share a fingerprint.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
  #[must_use]
  pub fn to_hex(&self) -> String {
    blake3::Hash::from_bytes(self.0).to_hex().to_string()
  }
}

impl fmt::Debug for Fingerprint {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Fingerprint({})", &self.to_hex()[..12])
  }
}

impl From<blake3::Hasher> for Fingerprint {
  fn from(hasher: blake3::Hasher) -> Self {
    Self(*hasher.finalize().as_bytes())
  }
}

/// Fingerprints schemas, resolving `#/definitions/` references against one document.
pub struct Fingerprinter<'a> {
  document: &'a Document,
  /// Definitions currently being expanded, innermost last.
  stack: Vec<String>,
}

impl<'a> Fingerprinter<'a> {
  #[must_use]
  pub fn new(document: &'a Document) -> Self {
    Self { document, stack: vec![] }
  }

  /// Fingerprint of the definition called `name`.
  pub fn definition(&mut self, name: &str) -> MergeResult<Fingerprint> {
    let document = self.document;
    let schema = document
      .definitions
      .get(name)
      .ok_or_else(|| MergeError::UnresolvedReference {
        reference: crate::utils::definition_ref(name),
        location: "definitions".to_string(),
      })?;
    self.expand(name, schema)
  }

  pub fn schema(&mut self, schema: &Schema) -> MergeResult<Fingerprint> {
    match schema.kind() {
      SchemaKind::Reference(ref_path) => self.reference(ref_path),
      SchemaKind::Array => {
        let mut hasher = blake3::Hasher::new();
        hasher.update(ARRAY_TAG);
        let items = match schema.items.as_deref() {
          Some(items) => self.schema(items)?,
          None => self.schema(&Schema::default())?,
        };
        hasher.update(&items.0);
        Ok(hasher.into())
      }
      SchemaKind::Object => self.object(schema),
      SchemaKind::Leaf if has_structure(schema) => self.object(schema),
      SchemaKind::Leaf => leaf(schema),
    }
  }

  fn reference(&mut self, ref_path: &str) -> MergeResult<Fingerprint> {
    let unresolved = || MergeError::UnresolvedReference {
      reference: ref_path.to_string(),
      location: self
        .stack
        .last()
        .map_or_else(|| "schema".to_string(), |name| format!("definition '{name}'")),
    };

    let name = parse_definition_ref(ref_path).ok_or_else(unresolved)?;

    if let Some(depth) = self.stack.iter().rposition(|entry| *entry == name) {
      let mut hasher = blake3::Hasher::new();
      hasher.update(CYCLE_TAG);
      hasher.update(&((self.stack.len() - depth) as u64).to_le_bytes());
      return Ok(hasher.into());
    }

    let document = self.document;
    let target = document.definitions.get(&name).ok_or_else(unresolved)?;
    self.expand(&name, target)
  }

  fn expand(&mut self, name: &str, schema: &Schema) -> MergeResult<Fingerprint> {
    self.stack.push(name.to_string());
    let result = self.schema(schema);
    self.stack.pop();
    result
  }

  fn object(&mut self, schema: &Schema) -> MergeResult<Fingerprint> {
    let mut hasher = blake3::Hasher::new();
    hasher.update(OBJECT_TAG);

    let mut keys: Vec<&String> = schema.properties.keys().collect();
    keys.sort_unstable();
    hasher.update(&(keys.len() as u64).to_le_bytes());
    for key in keys {
      let property = self.schema(&schema.properties[key])?;
      hasher.update(&(key.len() as u64).to_le_bytes());
      hasher.update(key.as_bytes());
      hasher.update(&property.0);
    }

    match &schema.additional_properties {
      None => {
        hasher.update(&[0]);
      }
      Some(AdditionalProperties::Allowed(allowed)) => {
        hasher.update(&[1, u8::from(*allowed)]);
      }
      Some(AdditionalProperties::Schema(extra)) => {
        let extra = self.schema(extra)?;
        hasher.update(&[2]);
        hasher.update(&extra.0);
      }
    }

    hasher.update(&(schema.all_of.len() as u64).to_le_bytes());
    for member in &schema.all_of {
      let member = self.schema(member)?;
      hasher.update(&member.0);
    }

    Ok(hasher.into())
  }
}

/// Untyped schemas that still carry properties, `allOf` members or an `additionalProperties`
/// schema are objects in all but name, and must hash their references by content.
fn has_structure(schema: &Schema) -> bool {
  !schema.properties.is_empty()
    || !schema.all_of.is_empty()
    || matches!(schema.additional_properties, Some(AdditionalProperties::Schema(_)))
}

fn leaf(schema: &Schema) -> MergeResult<Fingerprint> {
  let canonical = CanonicalSchema::from_schema(schema)?;
  let mut hasher = blake3::Hasher::new();
  hasher.update(LEAF_TAG);
  hasher.update(canonical.0.as_bytes());
  Ok(hasher.into())
}

/// RFC 8785 canonical JSON of a schema with order-independent arrays sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CanonicalSchema(String);

impl CanonicalSchema {
  pub(crate) fn from_schema(schema: &Schema) -> MergeResult<Self> {
    let mut value = serde_json::to_value(schema).map_err(|err| MergeError::Serialization(err.to_string()))?;
    normalize_schema_semantics(&mut value);
    let canonical = to_canonical_json(&value).map_err(|err| MergeError::Serialization(err.to_string()))?;
    Ok(Self(canonical))
  }
}

fn normalize_schema_semantics(value: &mut Value) {
  match value {
    Value::Object(map) => {
      for key in ["required", "type", "enum"] {
        if let Some(Value::Array(arr)) = map.get_mut(key) {
          sort_string_array_in_place(arr);
        }
      }
      map.values_mut().for_each(normalize_schema_semantics);
    }
    Value::Array(arr) => arr.iter_mut().for_each(normalize_schema_semantics),
    _ => {}
  }
}

/// Arrays holding anything but strings keep their order.
fn sort_string_array_in_place(arr: &mut [Value]) {
  if arr.iter().all(Value::is_string) {
    arr.sort_unstable_by(|a, b| a.as_str().cmp(&b.as_str()));
  }
}
