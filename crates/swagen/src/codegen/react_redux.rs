use std::{
  collections::{BTreeMap, HashSet},
  path::PathBuf,
};

use handlebars::Handlebars;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use super::{GeneratedFile, Generator, GeneratorError, GeneratorResult, helpers::register_helpers};
use crate::{
  document::{Document, HttpMethod, Operation, Parameter, PathItem, Response, Schema, SchemaKind},
  utils::{
    parse_local_ref,
    text::{
      camel_case, interpolate_members, member_access, operation_function_name, property_key, unique_name,
      upper_snake_case,
    },
  },
};

pub(super) const GENERATOR_NAME: &str = "react-redux-ts";

const ACTION_TEMPLATE: &str = "action";
const API_TEMPLATE: &str = "api";
const CONSTANT_TEMPLATE: &str = "constant";
const SCHEMA_TEMPLATE: &str = "schema";
const DEFAULT_GROUP: &str = "default";
const PARAMS_OBJECT: &str = "params";
const SUCCESS_STATUS: &str = "200";
/// Definitions with this property become normalizr entities keyed by it.
const ENTITY_ID: &str = "uri";

const TEMPLATES: [(&str, &str); 4] = [
  (ACTION_TEMPLATE, include_str!("../../templates/react-redux-ts/action.ts.hbs")),
  (API_TEMPLATE, include_str!("../../templates/react-redux-ts/api.ts.hbs")),
  (CONSTANT_TEMPLATE, include_str!("../../templates/react-redux-ts/constant.ts.hbs")),
  (SCHEMA_TEMPLATE, include_str!("../../templates/react-redux-ts/schema.ts.hbs")),
];

/// Redux thunk actions over a fetch wrapper, with responses normalized by normalizr schemas.
///
/// Only `GET`, `PUT` and `POST` operations that declare a `200` response become actions. Each
/// action is grouped under the first tag of its operation.
pub struct ReactReduxGenerator {
  handlebars: Handlebars<'static>,
}

impl ReactReduxGenerator {
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

  fn render<T: Serialize>(&self, template: &str, data: &T) -> GeneratorResult<GeneratedFile> {
    let file = format!("{template}.ts");
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

impl Generator for ReactReduxGenerator {
  fn name(&self) -> &'static str {
    GENERATOR_NAME
  }

  fn generate(&self, document: &Document) -> GeneratorResult<Vec<GeneratedFile>> {
    if document.paths.is_empty() {
      return Err(GeneratorError::NoPaths);
    }

    let mut collector = SchemaCollector::new(document);
    let groups = action_groups(document, &mut collector)?;
    let schemas = collector.into_entries();

    let actions = ActionsView {
      has_schemas: !schemas.is_empty(),
      groups,
    };
    let api = ApiView {
      base_path: document
        .extra
        .get("basePath")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim_end_matches('/')
        .to_string(),
    };

    Ok(vec![
      self.render(ACTION_TEMPLATE, &actions)?,
      self.render(API_TEMPLATE, &api)?,
      self.render(CONSTANT_TEMPLATE, &actions)?,
      self.render(SCHEMA_TEMPLATE, &SchemasView { schemas })?,
    ])
  }
}

#[derive(Debug, Serialize)]
struct ActionsView {
  has_schemas: bool,
  groups: Vec<GroupView>,
}

#[derive(Debug, Serialize)]
struct GroupView {
  group: String,
  actions: Vec<ActionView>,
}

#[derive(Debug, Serialize)]
struct ActionView {
  name: String,
  /// Base of the `_REQUEST`/`_SUCCESS`/`_FAILURE` action type constants.
  type_name: String,
  method: String,
  endpoint: String,
  query: Vec<String>,
  headers: Vec<String>,
  body: Option<String>,
  /// normalizr schema expression for the response, if it is a definition or an array of one.
  schema: Option<String>,
}

#[derive(Debug, Serialize)]
struct ApiView {
  base_path: String,
}

#[derive(Debug, Serialize)]
struct SchemasView {
  schemas: Vec<SchemaEntry>,
}

#[derive(Debug, Serialize)]
struct SchemaEntry {
  name: String,
  definition: String,
  entity: bool,
  deps: Vec<DependencyView>,
}

#[derive(Debug, Serialize)]
struct DependencyView {
  key: String,
  target: String,
}

/// Groups actions by the first tag of their operation, in path order.
fn action_groups(document: &Document, collector: &mut SchemaCollector<'_>) -> GeneratorResult<Vec<GroupView>> {
  let mut grouped: BTreeMap<String, (Vec<ActionView>, HashSet<String>)> = BTreeMap::new();

  let mut paths: Vec<(&String, &PathItem)> = document.paths.iter().collect();
  paths.sort_by(|a, b| a.0.cmp(b.0));

  for (path, item) in paths {
    for (method, operation) in item.operations() {
      if !matches!(method, HttpMethod::Get | HttpMethod::Put | HttpMethod::Post) {
        continue;
      }
      let Some(response) = operation.responses.get(SUCCESS_STATUS) else {
        continue;
      };

      let group = operation
        .tags
        .first()
        .map(|tag| camel_case(tag))
        .filter(|group| !group.is_empty())
        .unwrap_or_else(|| DEFAULT_GROUP.to_string());
      let (actions, names) = grouped.entry(group.clone()).or_default();

      let name = unique_name(
        &operation_function_name(operation.operation_id.as_deref(), method.as_ref(), path),
        names,
      );
      names.insert(name.clone());

      let response = resolve_response(document, response)?;
      let schema = match &response.schema {
        Some(schema) => collector.response_schema(schema)?,
        None => None,
      };

      let mut action = ActionView {
        type_name: upper_snake_case(&format!("{group} {name}")),
        name,
        method: method.to_string(),
        endpoint: interpolate_members(path, PARAMS_OBJECT),
        query: vec![],
        headers: vec![],
        body: None,
        schema,
      };
      add_parameters(document, &mut action, item, operation)?;
      actions.push(action);
    }
  }

  Ok(
    grouped
      .into_iter()
      .map(|(group, (actions, _))| GroupView { group, actions })
      .collect(),
  )
}

fn add_parameters(
  document: &Document,
  action: &mut ActionView,
  item: &PathItem,
  operation: &Operation,
) -> GeneratorResult<()> {
  for parameter in item.parameters.iter().chain(&operation.parameters) {
    let parameter = resolve_parameter(document, parameter)?;
    let Some(name) = parameter.name.clone() else {
      continue;
    };
    match parameter.location.as_deref() {
      Some("query") => action.query.push(name),
      Some("header") => action.headers.push(name),
      Some("body") => action.body = Some(member_access(PARAMS_OBJECT, &name)),
      _ => {}
    }
  }
  Ok(())
}

fn resolve_parameter<'a>(document: &'a Document, parameter: &'a Parameter) -> GeneratorResult<&'a Parameter> {
  let Some(reference) = parameter.ref_path.as_deref() else {
    return Ok(parameter);
  };
  parse_local_ref(reference, "parameters")
    .and_then(|name| document.parameters.get(&name))
    .ok_or_else(|| GeneratorError::UnresolvedReference(reference.to_string()))
}

fn resolve_response<'a>(document: &'a Document, response: &'a Response) -> GeneratorResult<&'a Response> {
  let Some(reference) = response.ref_path.as_deref() else {
    return Ok(response);
  };
  parse_local_ref(reference, "responses")
    .and_then(|name| document.responses.get(&name))
    .ok_or_else(|| GeneratorError::UnresolvedReference(reference.to_string()))
}

fn schema_variable(definition: &str) -> String {
  camel_case(&format!("{definition}Schema"))
}

/// Collects the normalizr schemas reachable from action responses.
struct SchemaCollector<'a> {
  document: &'a Document,
  entries: IndexMap<String, SchemaEntry>,
}

impl<'a> SchemaCollector<'a> {
  fn new(document: &'a Document) -> Self {
    Self {
      document,
      entries: IndexMap::new(),
    }
  }

  /// `schemas.<name>` for a definition, `[schemas.<name>]` for an array of one, `None` otherwise.
  fn response_schema(&mut self, schema: &Schema) -> GeneratorResult<Option<String>> {
    Ok(
      self
        .dependency(schema)?
        .map(|(variable, array)| wrap(&format!("schemas.{variable}"), array)),
    )
  }

  /// The schema variable `schema` normalizes through, and whether it is an array of it.
  fn dependency(&mut self, schema: &Schema) -> GeneratorResult<Option<(String, bool)>> {
    let (target, array) = match schema.kind() {
      SchemaKind::Reference(_) => (schema, false),
      SchemaKind::Array => match schema.items.as_deref() {
        Some(items) if matches!(items.kind(), SchemaKind::Reference(_)) => (items, true),
        _ => return Ok(None),
      },
      _ => return Ok(None),
    };
    let reference = target.ref_path.as_deref().unwrap_or_default();
    let (definition, _) = self
      .document
      .resolve_definition(reference)
      .ok_or_else(|| GeneratorError::UnresolvedReference(reference.to_string()))?;
    self.definition(&definition)?;
    Ok(Some((schema_variable(&definition), array)))
  }

  fn definition(&mut self, definition: &str) -> GeneratorResult<()> {
    if self.entries.contains_key(definition) {
      return Ok(());
    }
    let document = self.document;
    let schema = document
      .definitions
      .get(definition)
      .ok_or_else(|| GeneratorError::UnresolvedReference(crate::utils::definition_ref(definition)))?;

    // Registered before the properties so cycles terminate.
    self.entries.insert(
      definition.to_string(),
      SchemaEntry {
        name: schema_variable(definition),
        definition: definition.to_string(),
        entity: schema.properties.contains_key(ENTITY_ID),
        deps: vec![],
      },
    );

    let mut deps = vec![];
    for (property, value) in &schema.properties {
      if let Some((variable, array)) = self.dependency(value)? {
        deps.push(DependencyView {
          key: property_key(property),
          target: wrap(&variable, array),
        });
      }
    }
    if let Some(entry) = self.entries.get_mut(definition) {
      entry.deps = deps;
    }
    Ok(())
  }

  fn into_entries(self) -> Vec<SchemaEntry> {
    let mut entries: Vec<SchemaEntry> = self.entries.into_values().collect();
    entries.sort_by(|a, b| a.definition.cmp(&b.definition));
    entries
  }
}

fn wrap(expression: &str, array: bool) -> String {
  if array { format!("[{expression}]") } else { expression.to_string() }
}
