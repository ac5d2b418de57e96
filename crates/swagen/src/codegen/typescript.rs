use std::{
  collections::{BTreeMap, BTreeSet, HashSet},
  path::PathBuf,
};

use handlebars::Handlebars;
use serde::Serialize;
use serde_json::Value;

use super::{GeneratedFile, Generator, GeneratorError, GeneratorResult, helpers::register_helpers};
use crate::{
  document::{AdditionalProperties, Document, Extra, HttpMethod, Operation, Parameter, PathItem, Schema, SchemaKind},
  utils::{
    parse_local_ref,
    text::{camel_case, interface_name, interpolate_path, operation_function_name, property_key, unique_name},
  },
};

pub(super) const GENERATOR_NAME: &str = "typescript";

const SCHEMA_TEMPLATE: &str = "schema";
const REQUEST_TEMPLATE: &str = "request";
const SERVICE_TEMPLATE: &str = "service";
const DEFAULT_SERVICE: &str = "default";

const TEMPLATES: [(&str, &str); 3] = [
  (SCHEMA_TEMPLATE, include_str!("../../templates/typescript/schema.ts.hbs")),
  (REQUEST_TEMPLATE, include_str!("../../templates/typescript/request.ts.hbs")),
  (SERVICE_TEMPLATE, include_str!("../../templates/typescript/service.ts.hbs")),
];

/// Emits `schema.ts` (one interface per definition), `request.ts` (a fetch wrapper) and one
/// `<tag>.ts` service module per operation tag.
pub struct TypeScriptGenerator {
  handlebars: Handlebars<'static>,
}

impl TypeScriptGenerator {
  pub fn new() -> GeneratorResult<Self> {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);
    register_helpers(&mut handlebars);

    for (name, template) in TEMPLATES {
      handlebars
        .register_template_string(name, template)
        .map_err(|source| GeneratorError::Template {
          name,
          source: Box::new(source),
        })?;
    }

    Ok(Self { handlebars })
  }

  pub(super) fn boxed() -> GeneratorResult<Box<dyn Generator>> {
    Ok(Box::new(Self::new()?))
  }

  fn render<T: Serialize>(&self, template: &str, file: String, data: &T) -> GeneratorResult<GeneratedFile> {
    let contents = self
      .handlebars
      .render(template, data)
      .map_err(|source| GeneratorError::Render {
        name: file.clone(),
        source,
      })?;
    Ok(GeneratedFile {
      path: PathBuf::from(file),
      contents,
    })
  }
}

impl Generator for TypeScriptGenerator {
  fn name(&self) -> &'static str {
    GENERATOR_NAME
  }

  fn generate(&self, document: &Document) -> GeneratorResult<Vec<GeneratedFile>> {
    if document.paths.is_empty() {
      return Err(GeneratorError::NoPaths);
    }

    let types = TypeMapper::new(document);

    let schema = SchemaView {
      interfaces: document
        .definitions
        .iter()
        .map(|(name, schema)| types.interface(name, schema))
        .collect::<GeneratorResult<_>>()?,
    };
    let request = RequestView {
      base_path: document
        .extra
        .get("basePath")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim_end_matches('/')
        .to_string(),
    };

    let mut files = vec![
      self.render(SCHEMA_TEMPLATE, "schema.ts".to_string(), &schema)?,
      self.render(REQUEST_TEMPLATE, "request.ts".to_string(), &request)?,
    ];
    for service in services(document, &types)? {
      let file = format!("{}.ts", service.file_stem);
      files.push(self.render(SERVICE_TEMPLATE, file, &service)?);
    }

    Ok(files)
  }
}

#[derive(Debug, Serialize)]
struct SchemaView {
  interfaces: Vec<InterfaceView>,
}

#[derive(Debug, Serialize)]
struct InterfaceView {
  name: String,
  description: Option<String>,
  /// Set for definitions rendered as `export type`.
  alias: Option<String>,
  extends: Option<String>,
  fields: Vec<FieldView>,
}

#[derive(Debug, Serialize)]
struct FieldView {
  name: String,
  optional: bool,
  ts_type: String,
  description: Option<String>,
}

#[derive(Debug, Serialize)]
struct RequestView {
  base_path: String,
}

#[derive(Debug, Serialize)]
struct ServiceView {
  service: String,
  file_stem: String,
  imports: Vec<String>,
  operations: Vec<OperationView>,
}

#[derive(Debug, Clone, Serialize)]
struct OperationView {
  function: String,
  method: String,
  path: String,
  summary: Option<String>,
  response: String,
  params: Vec<ParamView>,
  query: Vec<ParamView>,
  headers: Vec<ParamView>,
  body: Option<ParamView>,
}

#[derive(Debug, Clone, Serialize)]
struct ParamView {
  name: String,
  optional: bool,
  ts_type: String,
}

/// Maps schemas to TypeScript type expressions against one document.
struct TypeMapper<'a> {
  document: &'a Document,
}

impl<'a> TypeMapper<'a> {
  fn new(document: &'a Document) -> Self {
    Self { document }
  }

  fn interface(&self, name: &str, schema: &Schema) -> GeneratorResult<InterfaceView> {
    let description = doc_comment(&schema.extra);
    let name = interface_name(name);

    if !is_object_like(schema) || is_map_type(schema) {
      return Ok(InterfaceView {
        name,
        description,
        alias: Some(self.ts_type(schema)?),
        extends: None,
        fields: vec![],
      });
    }

    let mut parents = vec![];
    let mut fields = self.fields(schema)?;
    for member in &schema.all_of {
      if let Some(parent) = member.definition_name() {
        self.resolve(member)?;
        parents.push(interface_name(&parent));
      } else {
        fields.extend(self.fields(member)?);
      }
    }

    Ok(InterfaceView {
      name,
      description,
      alias: None,
      extends: (!parents.is_empty()).then(|| parents.join(", ")),
      fields,
    })
  }

  fn fields(&self, schema: &Schema) -> GeneratorResult<Vec<FieldView>> {
    schema
      .properties
      .iter()
      .map(|(name, property)| {
        Ok(FieldView {
          name: property_key(name),
          optional: !schema.required.contains(name),
          ts_type: self.ts_type(property)?,
          description: doc_comment(&property.extra),
        })
      })
      .collect()
  }

  fn resolve(&self, schema: &Schema) -> GeneratorResult<String> {
    let reference = schema.ref_path.as_deref().unwrap_or_default();
    self
      .document
      .resolve_definition(reference)
      .map(|(name, _)| name)
      .ok_or_else(|| GeneratorError::UnresolvedReference(reference.to_string()))
  }

  fn ts_type(&self, schema: &Schema) -> GeneratorResult<String> {
    match schema.kind() {
      SchemaKind::Reference(_) => Ok(interface_name(&self.resolve(schema)?)),
      SchemaKind::Array => {
        let items = match schema.items.as_deref() {
          Some(items) => self.ts_type(items)?,
          None => "any".to_string(),
        };
        Ok(array_of(&items))
      }
      SchemaKind::Object => self.object_type(schema),
      SchemaKind::Leaf if schema.schema_type.is_none() && !schema.all_of.is_empty() => {
        let members = schema
          .all_of
          .iter()
          .map(|member| self.ts_type(member))
          .collect::<GeneratorResult<Vec<_>>>()?;
        Ok(members.join(" & "))
      }
      SchemaKind::Leaf if is_object_like(schema) => self.object_type(schema),
      SchemaKind::Leaf => {
        let primary = schema.schema_type.as_ref().and_then(|t| t.primary());
        Ok(string_enum(&schema.extra).unwrap_or_else(|| primitive(primary.unwrap_or_default()).to_string()))
      }
    }
  }

  fn object_type(&self, schema: &Schema) -> GeneratorResult<String> {
    if !schema.properties.is_empty() {
      let fields = self
        .fields(schema)?
        .into_iter()
        .map(|field| format!("{}{}: {}", field.name, if field.optional { "?" } else { "" }, field.ts_type))
        .collect::<Vec<_>>();
      return Ok(format!("{{ {} }}", fields.join("; ")));
    }
    let values = match &schema.additional_properties {
      Some(AdditionalProperties::Schema(values)) => self.ts_type(values)?,
      _ => "any".to_string(),
    };
    Ok(format!("{{ [key: string]: {values} }}"))
  }

  fn parameter<'p>(&'p self, parameter: &'p Parameter) -> GeneratorResult<&'p Parameter> {
    let Some(reference) = parameter.ref_path.as_deref() else {
      return Ok(parameter);
    };
    parse_local_ref(reference, "parameters")
      .and_then(|name| self.document.parameters.get(&name))
      .ok_or_else(|| GeneratorError::UnresolvedReference(reference.to_string()))
  }

  fn parameter_type(&self, parameter: &Parameter) -> GeneratorResult<String> {
    if let Some(schema) = &parameter.schema {
      return self.ts_type(schema);
    }
    match parameter.param_type.as_deref() {
      Some("array") => {
        let items = parameter
          .extra
          .get("items")
          .and_then(|items| serde_json::from_value::<Schema>(items.clone()).ok())
          .map_or_else(|| Ok("any".to_string()), |items| self.ts_type(&items))?;
        Ok(array_of(&items))
      }
      Some(other) => Ok(string_enum(&parameter.extra).unwrap_or_else(|| primitive(other).to_string())),
      None => Ok("any".to_string()),
    }
  }

  fn response_type(&self, operation: &Operation) -> GeneratorResult<String> {
    let success = operation
      .responses
      .iter()
      .filter(|(code, _)| code.starts_with('2'))
      .min_by(|(a, _), (b, _)| a.cmp(b))
      .map(|(_, response)| response);

    let response = match success {
      Some(response) => match response.ref_path.as_deref() {
        Some(reference) => parse_local_ref(reference, "responses")
          .and_then(|name| self.document.responses.get(&name))
          .ok_or_else(|| GeneratorError::UnresolvedReference(reference.to_string()))?,
        None => response,
      },
      None => return Ok("void".to_string()),
    };

    match &response.schema {
      Some(schema) => self.ts_type(schema),
      None => Ok("void".to_string()),
    }
  }

  fn operation(
    &self,
    path: &str,
    item: &PathItem,
    method: HttpMethod,
    operation: &Operation,
  ) -> GeneratorResult<OperationView> {
    let mut params = vec![];
    let mut query = vec![];
    let mut headers = vec![];
    let mut body = None;

    let declared = item.parameters.iter().chain(&operation.parameters);
    for parameter in declared {
      let parameter = self.parameter(parameter)?;
      let Some(name) = parameter.name.as_deref() else {
        continue;
      };
      let view = ParamView {
        name: name.to_string(),
        optional: !parameter.required,
        ts_type: self.parameter_type(parameter)?,
      };
      match parameter.location.as_deref() {
        Some("query") => query.push(view.clone()),
        Some("header") => headers.push(view.clone()),
        Some("body") => body = Some(view.clone()),
        Some("path") => {}
        _ => continue,
      }
      params.push(view);
    }
    params.sort_by_key(|param| param.optional);

    let function = operation_function_name(operation.operation_id.as_deref(), method.as_ref(), path);

    Ok(OperationView {
      function,
      method: method.to_string(),
      path: interpolate_path(path),
      summary: operation
        .extra
        .get("summary")
        .and_then(Value::as_str)
        .map(sanitize_comment),
      response: self.response_type(operation)?,
      params,
      query,
      headers,
      body,
    })
  }
}

/// Objects, including schemas that declare properties or `allOf` members without a `type`.
fn is_object_like(schema: &Schema) -> bool {
  match schema.kind() {
    SchemaKind::Object => true,
    SchemaKind::Leaf => schema.schema_type.is_none() && (!schema.properties.is_empty() || !schema.all_of.is_empty()),
    _ => false,
  }
}

/// An object with `additionalProperties` but no declared properties renders as an index signature.
fn is_map_type(schema: &Schema) -> bool {
  schema.properties.is_empty() && schema.all_of.is_empty() && schema.additional_properties.is_some()
}

/// Groups operations by tag, in path order; untagged operations land in the `default` service.
fn services(document: &Document, types: &TypeMapper<'_>) -> GeneratorResult<Vec<ServiceView>> {
  let mut grouped: BTreeMap<String, (Vec<OperationView>, BTreeSet<String>, HashSet<String>)> = BTreeMap::new();

  let mut paths: Vec<(&String, &PathItem)> = document.paths.iter().collect();
  paths.sort_by(|a, b| a.0.cmp(b.0));

  for (path, item) in paths {
    for (method, operation) in item.operations() {
      let view = types.operation(path, item, method, operation)?;
      let imports = referenced_interfaces(item, operation);

      let tags: Vec<&str> = if operation.tags.is_empty() {
        vec![DEFAULT_SERVICE]
      } else {
        operation.tags.iter().map(String::as_str).collect()
      };
      for tag in tags {
        let (operations, used_imports, functions) = grouped.entry(tag.to_string()).or_default();
        let mut view = view.clone();
        view.function = unique_name(&view.function, functions);
        functions.insert(view.function.clone());
        used_imports.extend(imports.iter().cloned());
        operations.push(view);
      }
    }
  }

  Ok(
    grouped
      .into_iter()
      .map(|(service, (operations, imports, _))| ServiceView {
        file_stem: service_file_stem(&service),
        service,
        imports: imports.into_iter().collect(),
        operations,
      })
      .collect(),
  )
}

/// Definition names an operation mentions anywhere in its parameter and response schemas.
fn referenced_interfaces(item: &PathItem, operation: &Operation) -> BTreeSet<String> {
  let mut names = BTreeSet::new();
  let schemas = item
    .parameters
    .iter()
    .filter_map(|p| p.schema.as_ref())
    .chain(operation.schemas());
  for schema in schemas {
    schema.walk(&mut |node: &Schema| {
      if let Some(name) = node.definition_name() {
        names.insert(name);
      }
    });
  }
  names
}

fn service_file_stem(service: &str) -> String {
  let stem = camel_case(service);
  if stem.is_empty() { DEFAULT_SERVICE.to_string() } else { stem }
}

fn primitive(type_name: &str) -> &'static str {
  match type_name {
    "integer" | "number" => "number",
    "string" => "string",
    "boolean" => "boolean",
    "file" => "Blob",
    "null" => "null",
    "object" => "{ [key: string]: any }",
    _ => "any",
  }
}

fn array_of(items: &str) -> String {
  if items.contains(' ') && !items.starts_with('{') {
    format!("({items})[]")
  } else {
    format!("{items}[]")
  }
}

/// `'a' | 'b'` for a string `enum`, if every value is a string.
fn string_enum(extra: &Extra) -> Option<String> {
  let values = extra.get("enum")?.as_array()?;
  let literals = values
    .iter()
    .map(|value| value.as_str().map(|s| format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))))
    .collect::<Option<Vec<_>>>()?;
  (!literals.is_empty()).then(|| literals.join(" | "))
}

fn doc_comment(extra: &Extra) -> Option<String> {
  extra
    .get("description")
    .or_else(|| extra.get("title"))
    .and_then(Value::as_str)
    .map(sanitize_comment)
    .filter(|text| !text.is_empty())
}

fn sanitize_comment(text: &str) -> String {
  text.split_whitespace().collect::<Vec<_>>().join(" ").replace("*/", "*\\/")
}
