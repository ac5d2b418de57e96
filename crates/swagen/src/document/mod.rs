//! In-memory model of a Swagger 2.0 document.
//!
//! Only the parts the merger, filter and generators reason about are typed. Every other field is
//! captured in an `extra` map and written back verbatim, so a load/save cycle never drops data.

mod visit;


use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumIter, IntoEnumIterator};

pub use visit::extra_refs;

use crate::utils::parse_definition_ref;

pub(crate) const DEFAULT_SWAGGER_VERSION: &str = "2.0";
pub(crate) const DEFAULT_TITLE: &str = "Merged API";
pub(crate) const DEFAULT_VERSION: &str = "1.0";
const JSON_MEDIA_TYPE: &str = "application/json";

fn default_swagger_version() -> String {
  DEFAULT_SWAGGER_VERSION.to_string()
}

/// Fields a node carries that are not modelled explicitly.
pub type Extra = IndexMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
  #[serde(default = "default_swagger_version")]
  pub swagger: String,
  #[serde(default)]
  pub info: Info,
  #[serde(default)]
  pub paths: IndexMap<String, PathItem>,
  #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
  pub definitions: IndexMap<String, Schema>,
  #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
  pub parameters: IndexMap<String, Parameter>,
  #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
  pub responses: IndexMap<String, Response>,
  #[serde(flatten)]
  pub extra: Extra,
}

impl Default for Document {
  fn default() -> Self {
    Self {
      swagger: default_swagger_version(),
      info: Info::default(),
      paths: IndexMap::new(),
      definitions: IndexMap::new(),
      parameters: IndexMap::new(),
      responses: IndexMap::new(),
      extra: Extra::new(),
    }
  }
}

impl Document {
  /// The well-formed empty document a merge starts from when the caller supplies no base.
  #[must_use]
  pub fn skeleton() -> Self {
    let mut extra = Extra::new();
    extra.insert("schemes".to_string(), Value::from(vec!["http", "https"]));
    extra.insert("consumes".to_string(), Value::from(vec![JSON_MEDIA_TYPE]));
    extra.insert("produces".to_string(), Value::from(vec![JSON_MEDIA_TYPE]));

    Self {
      info: Info {
        title: DEFAULT_TITLE.to_string(),
        version: DEFAULT_VERSION.to_string(),
        extra: Extra::new(),
      },
      extra,
      ..Self::default()
    }
  }

  /// Looks up the definition a `#/definitions/<name>` reference points at.
  ///
  /// Returns `None` both for non-local references and for names missing from `definitions`;
  /// callers that need to tell the two apart parse the reference first.
  #[must_use]
  pub fn resolve_definition(&self, ref_path: &str) -> Option<(String, &Schema)> {
    let name = parse_definition_ref(ref_path)?;
    let schema = self.definitions.get(&name)?;
    Some((name, schema))
  }

  /// Iterates every operation in path order, verbs in their fixed slot order.
  pub fn operations(&self) -> impl Iterator<Item = (&str, HttpMethod, &Operation)> {
    self
      .paths
      .iter()
      .flat_map(|(path, item)| item.operations().map(move |(method, op)| (path.as_str(), method, op)))
  }

  pub fn to_json_string(&self, pretty: bool) -> serde_json::Result<String> {
    if pretty {
      serde_json::to_string_pretty(self)
    } else {
      serde_json::to_string(self)
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Info {
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub version: String,
  #[serde(flatten)]
  pub extra: Extra,
}

/// HTTP verbs a [`PathItem`] has a slot for, in the order the slots are visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "UPPERCASE")]
pub enum HttpMethod {
  Get,
  Put,
  Post,
  Delete,
  Options,
  Head,
  Patch,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathItem {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub get: Option<Operation>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub put: Option<Operation>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub post: Option<Operation>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub delete: Option<Operation>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub options: Option<Operation>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub head: Option<Operation>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub patch: Option<Operation>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub parameters: Vec<Parameter>,
  #[serde(flatten)]
  pub extra: Extra,
}

impl PathItem {
  #[must_use]
  pub const fn operation(&self, method: HttpMethod) -> Option<&Operation> {
    match method {
      HttpMethod::Get => self.get.as_ref(),
      HttpMethod::Put => self.put.as_ref(),
      HttpMethod::Post => self.post.as_ref(),
      HttpMethod::Delete => self.delete.as_ref(),
      HttpMethod::Options => self.options.as_ref(),
      HttpMethod::Head => self.head.as_ref(),
      HttpMethod::Patch => self.patch.as_ref(),
    }
  }

  /// The slot holding the operation for `method`, so callers can fill or clear it.
  pub fn slot_mut(&mut self, method: HttpMethod) -> &mut Option<Operation> {
    match method {
      HttpMethod::Get => &mut self.get,
      HttpMethod::Put => &mut self.put,
      HttpMethod::Post => &mut self.post,
      HttpMethod::Delete => &mut self.delete,
      HttpMethod::Options => &mut self.options,
      HttpMethod::Head => &mut self.head,
      HttpMethod::Patch => &mut self.patch,
    }
  }

  pub fn operations(&self) -> impl Iterator<Item = (HttpMethod, &Operation)> {
    HttpMethod::iter().filter_map(|method| self.operation(method).map(|op| (method, op)))
  }

  #[must_use]
  pub fn has_operations(&self) -> bool {
    self.operations().next().is_some()
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub tags: Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub operation_id: Option<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub parameters: Vec<Parameter>,
  #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
  pub responses: IndexMap<String, Response>,
  #[serde(flatten)]
  pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
  /// Reference into the document-level `parameters` map.
  #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
  pub ref_path: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(rename = "in", default, skip_serializing_if = "Option::is_none")]
  pub location: Option<String>,
  #[serde(default, skip_serializing_if = "std::ops::Not::not")]
  pub required: bool,
  #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
  pub param_type: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub schema: Option<Schema>,
  #[serde(flatten)]
  pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
  /// Reference into the document-level `responses` map.
  #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
  pub ref_path: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub schema: Option<Schema>,
  #[serde(flatten)]
  pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
  #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
  pub ref_path: Option<String>,
  #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
  pub schema_type: Option<SchemaType>,
  #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
  pub properties: IndexMap<String, Schema>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub items: Option<Box<Schema>>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub all_of: Vec<Schema>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub additional_properties: Option<AdditionalProperties>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub required: Vec<String>,
  #[serde(flatten)]
  pub extra: Extra,
}

/// How the fingerprinting and generators see a schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind<'a> {
  /// A `#/definitions/<name>` reference, carrying the raw reference string.
  Reference(&'a str),
  Array,
  Object,
  Leaf,
}

impl Schema {
  #[must_use]
  pub fn reference(name: &str) -> Self {
    Self {
      ref_path: Some(crate::utils::definition_ref(name)),
      ..Self::default()
    }
  }

  #[must_use]
  pub fn primitive(type_name: &str) -> Self {
    Self {
      schema_type: Some(SchemaType::Single(type_name.to_string())),
      ..Self::default()
    }
  }

  #[must_use]
  pub fn array_of(items: Schema) -> Self {
    Self {
      schema_type: Some(SchemaType::Single("array".to_string())),
      items: Some(Box::new(items)),
      ..Self::default()
    }
  }

  #[must_use]
  pub fn object<I, K>(properties: I) -> Self
  where
    I: IntoIterator<Item = (K, Schema)>,
    K: Into<String>,
  {
    Self {
      schema_type: Some(SchemaType::Single("object".to_string())),
      properties: properties.into_iter().map(|(k, v)| (k.into(), v)).collect(),
      ..Self::default()
    }
  }

  /// Name of the definition this schema references, if it is a local definition reference.
  #[must_use]
  pub fn definition_name(&self) -> Option<String> {
    self.ref_path.as_deref().and_then(parse_definition_ref)
  }

  #[must_use]
  pub fn has_type(&self, type_name: &str) -> bool {
    self.schema_type.as_ref().is_some_and(|t| t.contains(type_name))
  }

  /// Classifies the node as reference, array, object or leaf, in that order of precedence.
  ///
  /// Only local definition references count as references; any other `$ref` is a leaf.
  #[must_use]
  pub fn kind(&self) -> SchemaKind<'_> {
    if let Some(ref_path) = self.ref_path.as_deref()
      && parse_definition_ref(ref_path).is_some()
    {
      return SchemaKind::Reference(ref_path);
    }
    if self.has_type("array") {
      SchemaKind::Array
    } else if self.has_type("object") {
      SchemaKind::Object
    } else {
      SchemaKind::Leaf
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
  Single(String),
  Multiple(Vec<String>),
}

impl SchemaType {
  #[must_use]
  pub fn contains(&self, type_name: &str) -> bool {
    match self {
      Self::Single(t) => t == type_name,
      Self::Multiple(types) => types.iter().any(|t| t == type_name),
    }
  }

  /// The first declared type, used when a single target-language type must be picked.
  #[must_use]
  pub fn primary(&self) -> Option<&str> {
    match self {
      Self::Single(t) => Some(t.as_str()),
      Self::Multiple(types) => types.first().map(String::as_str),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
  Allowed(bool),
  Schema(Box<Schema>),
}
