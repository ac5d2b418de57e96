use std::{collections::HashMap, path::Path};

use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Row, Table};
use itertools::Itertools;

use crate::{
  codegen::GeneratorRegistry,
  document::{Document, Schema, SchemaKind},
  ui::{Colors, colors::IntoComfyColor, term_width},
  utils::{parse_definition_ref, spec::load_document, text::operation_function_name},
};

fn table(colors: &Colors, headers: &[&str]) -> Table {
  let mut table = Table::new();
  table
    .load_preset("  ── ──            ")
    .set_content_arrangement(ContentArrangement::Dynamic)
    .set_width(term_width());

  let mut row = Row::new();
  for header in headers {
    row.add_cell(Cell::new(header).fg(colors.label().into_comfy()));
  }
  table.set_header(row);
  table
}

/// `(function name, method, path, tags)` for every operation, sorted by function name.
fn operation_rows(document: &Document) -> Vec<(String, String, String, String)> {
  document
    .operations()
    .map(|(path, method, operation)| {
      let name = operation_function_name(operation.operation_id.as_deref(), method.as_ref(), path);
      (name, method.to_string(), path.to_string(), operation.tags.join(", "))
    })
    .sorted()
    .collect()
}

pub async fn list_operations(input: &Path, colors: &Colors) -> anyhow::Result<()> {
  let document = load_document(input).await?;

  let mut table = table(colors, &["OPERATION ID", "METHOD", "PATH", "TAGS"]);
  for (operation_id, method, path, tags) in operation_rows(&document) {
    let mut row = Row::new();
    row.add_cell(
      Cell::new(operation_id)
        .fg(colors.value().into_comfy())
        .add_attribute(Attribute::Bold),
    );
    row.add_cell(
      Cell::new(method)
        .fg(colors.accent().into_comfy())
        .set_alignment(CellAlignment::Right),
    );
    row.add_cell(Cell::new(path).fg(colors.primary().into_comfy()));
    row.add_cell(Cell::new(tags).fg(colors.info().into_comfy()));
    table.add_row(row);
  }

  println!("{table}");
  Ok(())
}

fn kind_label(schema: &Schema) -> String {
  match schema.kind() {
    SchemaKind::Reference(_) => "reference".to_string(),
    SchemaKind::Array => "array".to_string(),
    SchemaKind::Object => "object".to_string(),
    SchemaKind::Leaf if !schema.all_of.is_empty() => "allOf".to_string(),
    SchemaKind::Leaf => schema
      .schema_type
      .as_ref()
      .and_then(|t| t.primary())
      .unwrap_or("any")
      .to_string(),
  }
}

/// Number of `#/definitions/<name>` references pointing at each definition.
fn reference_counts(document: &Document) -> HashMap<String, usize> {
  document
    .schema_refs()
    .iter()
    .filter_map(|ref_path| parse_definition_ref(ref_path))
    .counts()
}

pub async fn list_definitions(input: &Path, colors: &Colors) -> anyhow::Result<()> {
  let document = load_document(input).await?;
  let counts = reference_counts(&document);

  let mut table = table(colors, &["NAME", "TYPE", "REFERENCES"]);
  for (name, schema) in document.definitions.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
    let mut row = Row::new();
    row.add_cell(
      Cell::new(name)
        .fg(colors.value().into_comfy())
        .add_attribute(Attribute::Bold),
    );
    row.add_cell(Cell::new(kind_label(schema)).fg(colors.accent().into_comfy()));
    row.add_cell(
      Cell::new(counts.get(name).copied().unwrap_or(0))
        .fg(colors.primary().into_comfy())
        .set_alignment(CellAlignment::Right),
    );
    table.add_row(row);
  }

  println!("{table}");
  Ok(())
}

pub fn list_generators(registry: &GeneratorRegistry, colors: &Colors) {
  let mut table = table(colors, &["GENERATOR"]);
  for name in registry.names() {
    let mut row = Row::new();
    row.add_cell(Cell::new(name).fg(colors.value().into_comfy()));
    table.add_row(row);
  }
  println!("{table}");
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn document() -> Document {
    serde_json::from_value(json!({
      "swagger": "2.0",
      "info": { "title": "t", "version": "1" },
      "paths": {
        "/pets": {
          "get": {
            "operationId": "listPets",
            "tags": ["pets", "store"],
            "responses": { "200": { "schema": { "type": "array", "items": { "$ref": "#/definitions/Pet" } } } }
          },
          "post": {
            "responses": { "201": { "schema": { "$ref": "#/definitions/Pet" } } }
          }
        }
      },
      "definitions": {
        "Pet": { "type": "object", "properties": { "owner": { "$ref": "#/definitions/Owner" } } },
        "Owner": { "type": "object" },
        "Status": { "type": "string" },
        "Alias": { "$ref": "#/definitions/Owner" }
      }
    }))
    .unwrap()
  }

  #[test]
  fn test_operation_rows_fall_back_to_method_and_path() {
    let rows = operation_rows(&document());
    assert_eq!(
      rows,
      [
        (
          "listPets".to_string(),
          "GET".to_string(),
          "/pets".to_string(),
          "pets, store".to_string()
        ),
        ("postPets".to_string(), "POST".to_string(), "/pets".to_string(), String::new()),
      ]
    );
  }

  #[test]
  fn test_reference_counts() {
    let counts = reference_counts(&document());
    assert_eq!(counts.get("Pet"), Some(&2));
    assert_eq!(counts.get("Owner"), Some(&2));
    assert_eq!(counts.get("Status"), None);
  }

  #[test]
  fn test_kind_labels() {
    let document = document();
    let labels: Vec<String> = ["Pet", "Status", "Alias"]
      .iter()
      .map(|name| kind_label(&document.definitions[*name]))
      .collect();
    assert_eq!(labels, ["object", "string", "reference"]);
  }
}
