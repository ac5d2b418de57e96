use serde_json::json;

use crate::{
  document::{Document, HttpMethod},
  filter::{FilterError, filter},
};

fn tags(values: &[&str]) -> Vec<String> {
  values.iter().map(ToString::to_string).collect()
}

fn store() -> Document {
  serde_json::from_value(json!({
    "swagger": "2.0",
    "info": { "title": "Store", "version": "1.0" },
    "host": "store.example.com",
    "parameters": {
      "PetBody": { "name": "body", "in": "body", "schema": { "$ref": "#/definitions/NewPet" } },
      "Limit": { "name": "limit", "in": "query", "type": "integer" }
    },
    "responses": {
      "Problem": { "description": "error", "schema": { "$ref": "#/definitions/Error" } },
      "Unused": { "description": "never referenced", "schema": { "$ref": "#/definitions/Audit" } }
    },
    "paths": {
      "/pets": {
        "get": {
          "tags": ["pets", "public"],
          "operationId": "listPets",
          "parameters": [{ "$ref": "#/parameters/Limit" }],
          "responses": {
            "200": { "description": "ok", "schema": { "type": "array", "items": { "$ref": "#/definitions/Pet" } } },
            "default": { "$ref": "#/responses/Problem" }
          }
        },
        "post": {
          "tags": ["admin"],
          "operationId": "createPet",
          "parameters": [{ "$ref": "#/parameters/PetBody" }],
          "responses": { "201": { "description": "created" } }
        }
      },
      "/orders": {
        "get": {
          "tags": ["orders"],
          "operationId": "listOrders",
          "responses": { "200": { "description": "ok", "schema": { "$ref": "#/definitions/Order" } } }
        }
      }
    },
    "definitions": {
      "Pet": {
        "type": "object",
        "properties": {
          "owner": { "$ref": "#/definitions/Owner" },
          "labels": { "type": "object", "additionalProperties": { "$ref": "#/definitions/Label" } }
        }
      },
      "Owner": { "allOf": [{ "$ref": "#/definitions/Person" }] },
      "Person": { "type": "object", "properties": { "name": { "type": "string" } } },
      "Label": { "type": "string" },
      "NewPet": { "type": "object", "properties": { "name": { "type": "string" } } },
      "Error": { "type": "object", "properties": { "message": { "type": "string" } } },
      "Order": { "type": "object", "properties": { "pet": { "$ref": "#/definitions/Pet" } } },
      "Audit": { "type": "object" }
    }
  }))
  .expect("store fixture should deserialize")
}

#[test]
fn keeps_only_tagged_operations() {
  let filtered = filter(store(), &tags(&["pets"])).expect("filter");

  let paths: Vec<&str> = filtered.paths.keys().map(String::as_str).collect();
  assert_eq!(paths, ["/pets"]);

  let item = &filtered.paths["/pets"];
  assert!(item.operation(HttpMethod::Post).is_none());
  let get = item.operation(HttpMethod::Get).expect("GET /pets survives");
  assert_eq!(get.tags, ["pets"]);
}

#[test]
fn pulls_in_transitively_referenced_definitions() {
  let filtered = filter(store(), &tags(&["pets"])).expect("filter");

  let definitions: Vec<&str> = filtered.definitions.keys().map(String::as_str).collect();
  assert_eq!(definitions, ["Error", "Label", "Owner", "Person", "Pet"]);

  let parameters: Vec<&str> = filtered.parameters.keys().map(String::as_str).collect();
  assert_eq!(parameters, ["Limit"]);
  let responses: Vec<&str> = filtered.responses.keys().map(String::as_str).collect();
  assert_eq!(responses, ["Problem"]);
}

#[test]
fn multiple_tags_keep_the_intersection() {
  let filtered = filter(store(), &tags(&["admin", "orders", "public"])).expect("filter");

  let pets = &filtered.paths["/pets"];
  assert_eq!(pets.operation(HttpMethod::Get).map(|op| op.tags.clone()), Some(tags(&["public"])));
  assert_eq!(pets.operation(HttpMethod::Post).map(|op| op.tags.clone()), Some(tags(&["admin"])));
  assert!(filtered.paths.contains_key("/orders"));
  assert!(filtered.definitions.contains_key("NewPet"));
  assert!(filtered.definitions.contains_key("Order"));
  assert!(!filtered.definitions.contains_key("Audit"));
}

#[test]
fn unknown_tag_leaves_an_empty_document() {
  let filtered = filter(store(), &tags(&["billing"])).expect("filter");

  assert!(filtered.paths.is_empty());
  assert!(filtered.definitions.is_empty());
  assert!(filtered.parameters.is_empty());
  assert_eq!(filtered.info.title, "Store");
  assert_eq!(filtered.extra["host"], "store.example.com");
}

#[test]
fn output_is_closed() {
  let filtered = filter(store(), &tags(&["pets", "orders"])).expect("filter");
  for reference in filtered.schema_refs() {
    assert!(filtered.resolve_definition(&reference).is_some(), "dangling {reference}");
  }
}

#[test]
fn dangling_reference_is_an_error() {
  let mut document = store();
  document.definitions.shift_remove("Person");

  let err = filter(document, &tags(&["pets"])).unwrap_err();
  let FilterError::UnresolvedReference { reference, location } = err;
  assert_eq!(reference, "#/definitions/Person");
  assert_eq!(location, "path '/pets'");
}

#[test]
fn dangling_parameter_reference_is_an_error() {
  let mut document = store();
  document.parameters.shift_remove("Limit");

  let err = filter(document, &tags(&["pets"])).unwrap_err();
  assert!(err.to_string().contains("#/parameters/Limit"), "{err}");
}

#[test]
fn vendor_extension_references_keep_their_definitions() {
  let document: Document = serde_json::from_value(json!({
    "paths": {
      "/holders": {
        "get": {
          "tags": ["pets"],
          "x-link": { "$ref": "#/definitions/Linked" },
          "responses": { "200": { "description": "ok", "schema": { "$ref": "#/definitions/Holder" } } }
        }
      }
    },
    "definitions": {
      "Holder": { "type": "object", "x-owner": [{ "$ref": "#/definitions/Owner" }] },
      "Owner": { "type": "object", "properties": { "name": { "type": "string" } } },
      "Linked": { "type": "string" },
      "Orphan": { "type": "string" }
    }
  }))
  .expect("fixture should deserialize");

  let filtered = filter(document, &tags(&["pets"])).expect("filter");

  let names: Vec<&str> = filtered.definitions.keys().map(String::as_str).collect();
  assert_eq!(names, ["Holder", "Linked", "Owner"]);
}
