use serde_json::{Value, json};

use crate::{document::Document, utils::definition_ref};

pub(super) fn document(value: Value) -> Document {
  serde_json::from_value(value).expect("fixture should deserialize")
}

/// A document with one `GET path` whose 200 response returns `#/definitions/<returns>`.
pub(super) fn endpoint_document(path: &str, returns: &str, definitions: Value) -> Document {
  document(json!({
    "swagger": "2.0",
    "info": { "title": "fixture", "version": "1.0" },
    "paths": {
      path: {
        "get": {
          "tags": ["fixture"],
          "operationId": "fetch",
          "responses": {
            "200": { "description": "ok", "schema": { "$ref": definition_ref(returns) } }
          }
        }
      }
    },
    "definitions": definitions,
  }))
}

/// The `$ref` of the 200 response of `GET path`.
pub(super) fn response_ref<'a>(document: &'a Document, path: &str) -> &'a str {
  document.paths[path]
    .get
    .as_ref()
    .and_then(|op| op.responses.get("200"))
    .and_then(|response| response.schema.as_ref())
    .and_then(|schema| schema.ref_path.as_deref())
    .expect("fixture path should return a reference")
}

pub(super) fn definition_names(document: &Document) -> Vec<&str> {
  document.definitions.keys().map(String::as_str).collect()
}

pub(super) fn pet_definition() -> Value {
  json!({
    "type": "object",
    "required": ["name"],
    "properties": {
      "name": { "type": "string" },
      "age": { "type": "integer" }
    }
  })
}
