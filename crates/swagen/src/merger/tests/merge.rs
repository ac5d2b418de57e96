use serde_json::json;

use super::support::{definition_names, document, endpoint_document, pet_definition, response_ref};
use crate::{
  document::Document,
  merger::{MergeError, MergeOptions, MergeWarning, merge},
};

fn scopes(values: &[&str]) -> Vec<String> {
  values.iter().map(ToString::to_string).collect()
}

fn item_with(id_type: &str) -> serde_json::Value {
  json!({ "Item": { "type": "object", "properties": { "id": { "type": id_type } } } })
}

fn assert_closed(document: &Document) {
  for reference in document.schema_refs() {
    assert!(
      document.resolve_definition(&reference).is_some(),
      "dangling reference {reference}"
    );
  }
}

#[test]
fn identical_definitions_collapse_into_one() -> anyhow::Result<()> {
  let a = endpoint_document("/a", "Pet", json!({ "Pet": pet_definition() }));
  let b = endpoint_document("/b", "Animal", json!({ "Animal": pet_definition() }));

  let output = merge(vec![a, b], &scopes(&["", ""]), MergeOptions::default())?;

  assert_eq!(definition_names(&output.document), ["Pet"]);
  assert_eq!(response_ref(&output.document, "/a"), "#/definitions/Pet");
  assert_eq!(response_ref(&output.document, "/b"), "#/definitions/Pet");
  assert_eq!(output.stats.deduplicated["Animal"], "Pet");
  assert_eq!(output.stats.documents_merged, 2);
  assert_eq!(output.stats.definitions_received, 2);
  assert_eq!(output.stats.definitions_kept, 1);
  assert_closed(&output.document);
  Ok(())
}

#[test]
fn scopes_keep_different_definitions_apart() -> anyhow::Result<()> {
  let x = endpoint_document("/a", "Item", item_with("string"));
  let y = endpoint_document("/b", "Item", item_with("integer"));

  let output = merge(vec![x, y], &scopes(&["X", "Y"]), MergeOptions::default())?;

  assert_eq!(definition_names(&output.document), ["XItem", "YItem"]);
  assert_eq!(response_ref(&output.document, "/a"), "#/definitions/XItem");
  assert_eq!(response_ref(&output.document, "/b"), "#/definitions/YItem");
  assert!(output.stats.warnings.is_empty());
  Ok(())
}

#[test]
fn merging_a_document_with_itself_is_idempotent() -> anyhow::Result<()> {
  let source = endpoint_document(
    "/pets",
    "PetList",
    json!({
      "Pet": pet_definition(),
      "PetList": { "type": "array", "items": { "$ref": "#/definitions/Pet" } },
      "Animal": pet_definition()
    }),
  );

  let once = merge(vec![source.clone()], &scopes(&[""]), MergeOptions::default())?;
  let twice = merge(vec![source.clone(), source], &scopes(&["", ""]), MergeOptions::default())?;

  assert_eq!(once.document.definitions, twice.document.definitions);
  assert_eq!(definition_names(&once.document), ["Animal", "PetList"]);
  assert!(twice.stats.warnings.is_empty(), "{:?}", twice.stats.warnings);
  Ok(())
}

#[test]
fn scope_count_must_match_document_count() {
  let a = endpoint_document("/a", "Pet", json!({ "Pet": pet_definition() }));
  let b = endpoint_document("/b", "Pet", json!({ "Pet": pet_definition() }));

  let err = merge(vec![a, b], &scopes(&[""]), MergeOptions::default()).unwrap_err();
  assert!(matches!(err, MergeError::ScopeCountMismatch { documents: 2, scopes: 1 }));
}

#[test]
fn negative_compress_level_is_rejected() {
  let options = MergeOptions::builder().compress_level(-1).build();
  let err = merge(vec![], &[], options).unwrap_err();
  assert!(matches!(err, MergeError::NegativeCompressLevel(-1)));
}

#[test]
fn dangling_reference_fails_the_whole_merge() {
  let good = endpoint_document("/a", "Pet", json!({ "Pet": pet_definition() }));
  let broken = endpoint_document("/b", "Missing", json!({ "Pet": pet_definition() }));

  let err = merge(vec![good, broken], &scopes(&["", ""]), MergeOptions::default()).unwrap_err();
  assert!(matches!(err, MergeError::UnresolvedReference { ref reference, .. } if reference == "#/definitions/Missing"));
}

#[test]
fn conflicting_names_are_renamed_not_replaced() -> anyhow::Result<()> {
  let first = endpoint_document("/a", "Item", item_with("string"));
  let second = endpoint_document("/b", "Item", item_with("integer"));

  let output = merge(vec![first, second], &scopes(&["", ""]), MergeOptions::default())?;

  assert_eq!(definition_names(&output.document), ["Item", "Item2"]);
  assert_eq!(response_ref(&output.document, "/a"), "#/definitions/Item");
  assert_eq!(response_ref(&output.document, "/b"), "#/definitions/Item2");
  assert_eq!(
    output.stats.warnings,
    [MergeWarning::DefinitionRenamed {
      name: "Item".to_string(),
      renamed: "Item2".to_string(),
    }]
  );
  assert_closed(&output.document);
  Ok(())
}

#[test]
fn compression_shortens_names_and_rewrites_references() -> anyhow::Result<()> {
  let store = endpoint_document("/store", "Pet", json!({ "Pet": pet_definition() }));
  let admin = endpoint_document(
    "/admin",
    "Pet",
    json!({ "Pet": { "type": "object", "properties": { "level": { "type": "integer" } } } }),
  );

  let options = MergeOptions::builder().compress_level(1).build();
  let output = merge(vec![store, admin], &scopes(&["Store", "Admin"]), options)?;

  assert_eq!(definition_names(&output.document), ["Pet", "StorePet"]);
  assert_eq!(response_ref(&output.document, "/admin"), "#/definitions/Pet");
  assert_eq!(response_ref(&output.document, "/store"), "#/definitions/StorePet");
  assert_eq!(output.stats.aliases["AdminPet"], "Pet");
  assert_closed(&output.document);
  Ok(())
}

#[test]
fn later_documents_overwrite_paths_with_a_warning() -> anyhow::Result<()> {
  let first = endpoint_document("/pets", "Pet", json!({ "Pet": pet_definition() }));
  let mut second = endpoint_document("/pets", "Pet", json!({ "Pet": pet_definition() }));
  if let Some(op) = second.paths["/pets"].get.as_mut() {
    op.operation_id = Some("listPets".to_string());
  }

  let output = merge(vec![first, second], &scopes(&["", ""]), MergeOptions::default())?;

  let op = output.document.paths["/pets"].get.as_ref().expect("GET /pets");
  assert_eq!(op.operation_id.as_deref(), Some("listPets"));
  assert_eq!(
    output.stats.warnings,
    [MergeWarning::PathOverwritten {
      path: "/pets".to_string()
    }]
  );
  Ok(())
}

#[test]
fn base_document_seeds_the_result() -> anyhow::Result<()> {
  let base = document(json!({
    "swagger": "2.0",
    "info": { "title": "Commerce API", "version": "2.1" },
    "host": "api.example.com",
    "paths": {},
    "definitions": { "Pet": pet_definition() }
  }));
  let incoming = endpoint_document("/pets", "Animal", json!({ "Animal": pet_definition() }));

  let options = MergeOptions::builder().base(base).build();
  let output = merge(vec![incoming], &scopes(&[""]), options)?;

  assert_eq!(output.document.info.title, "Commerce API");
  assert_eq!(output.document.extra["host"], "api.example.com");
  assert_eq!(definition_names(&output.document), ["Pet"]);
  assert_eq!(response_ref(&output.document, "/pets"), "#/definitions/Pet");
  Ok(())
}

#[test]
fn default_base_is_the_skeleton() -> anyhow::Result<()> {
  let output = merge(vec![], &[], MergeOptions::default())?;
  assert_eq!(output.document, Document::skeleton());
  Ok(())
}

#[test]
fn output_is_sorted_and_closed() -> anyhow::Result<()> {
  let a = endpoint_document(
    "/zoo",
    "Zebra",
    json!({
      "Zebra": { "type": "object", "properties": { "mane": { "$ref": "#/definitions/Mane" } } },
      "Mane": { "type": "string" }
    }),
  );
  let b = endpoint_document("/aviary", "Bird", json!({ "Bird": { "type": "boolean" } }));

  let output = merge(vec![a, b], &scopes(&["", ""]), MergeOptions::default())?;

  assert_eq!(definition_names(&output.document), ["Bird", "Mane", "Zebra"]);
  let paths: Vec<&str> = output.document.paths.keys().map(String::as_str).collect();
  assert_eq!(paths, ["/aviary", "/zoo"]);
  assert_closed(&output.document);
  Ok(())
}

#[test]
fn scoped_composites_collapse_into_the_first_scope() -> anyhow::Result<()> {
  let composite = || {
    endpoint_document(
      "/derived",
      "Derived",
      json!({
        "Base": { "type": "object", "properties": { "id": { "type": "string" } } },
        "Derived": {
          "allOf": [
            { "$ref": "#/definitions/Base" },
            { "properties": { "n": { "type": "integer" } } }
          ]
        }
      }),
    )
  };

  let output = merge(vec![composite(), composite()], &scopes(&["X", "Y"]), MergeOptions::default())?;

  assert_eq!(definition_names(&output.document), ["XBase", "XDerived"]);
  assert_eq!(output.stats.deduplicated["YDerived"], "XDerived");
  assert_closed(&output.document);
  Ok(())
}

#[test]
fn scoped_vendor_extension_references_stay_closed() -> anyhow::Result<()> {
  let source = endpoint_document(
    "/holder",
    "Holder",
    json!({
      "Pet": pet_definition(),
      "Holder": { "type": "object", "x-link": { "$ref": "#/definitions/Pet" } }
    }),
  );

  let output = merge(vec![source], &scopes(&["S"]), MergeOptions::default())?;

  assert_eq!(definition_names(&output.document), ["SHolder", "SPet"]);
  assert_eq!(
    output.document.definitions["SHolder"].extra["x-link"],
    json!({ "$ref": "#/definitions/SPet" })
  );
  assert_closed(&output.document);
  Ok(())
}

#[test]
fn conflicting_shared_parameters_are_renamed() -> anyhow::Result<()> {
  let with_limit = |path: &str, limit_type: &str| {
    document(json!({
      "paths": {
        path: {
          "get": {
            "parameters": [{ "$ref": "#/parameters/limit" }],
            "responses": { "200": { "description": "ok" } }
          }
        }
      },
      "parameters": { "limit": { "name": "limit", "in": "query", "type": limit_type } }
    }))
  };

  let output = merge(
    vec![with_limit("/a", "integer"), with_limit("/b", "string"), with_limit("/c", "integer")],
    &scopes(&["", "", ""]),
    MergeOptions::default(),
  )?;

  let parameters = &output.document.parameters;
  assert_eq!(parameters.len(), 2);
  assert_eq!(parameters["limit"].param_type.as_deref(), Some("integer"));
  assert_eq!(parameters["limit2"].param_type.as_deref(), Some("string"));
  let parameter_ref = |path: &str| {
    output.document.paths[path].get.as_ref().and_then(|op| op.parameters[0].ref_path.clone())
  };
  assert_eq!(parameter_ref("/a").as_deref(), Some("#/parameters/limit"));
  assert_eq!(parameter_ref("/b").as_deref(), Some("#/parameters/limit2"));
  assert_eq!(parameter_ref("/c").as_deref(), Some("#/parameters/limit"));
  assert_eq!(
    output.stats.warnings,
    [MergeWarning::ParameterRenamed {
      name: "limit".to_string(),
      renamed: "limit2".to_string(),
    }]
  );
  Ok(())
}
