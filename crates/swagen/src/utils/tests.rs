use crate::utils::{
  definition_ref, parse_definition_ref,
  spec::{SpecFormat, parse_json},
  text::{
    camel_case, interface_name, interpolate_members, interpolate_path, member_access, property_key, sanitize,
    split_words, upper_snake_case,
  },
};

#[test]
fn test_split_words() {
  let cases: [(&str, &[&str]); 11] = [
    ("Pet", &["Pet"]),
    ("PetList", &["Pet", "List"]),
    ("XMLParser", &["XML", "Parser"]),
    ("HTTPError", &["HTTP", "Error"]),
    ("ApiV2Item", &["Api", "V2", "Item"]),
    ("v2Item", &["v2", "Item"]),
    ("user_profile", &["user_", "profile"]),
    ("pet-store__Order", &["pet-", "store__", "Order"]),
    ("api.v1.Error", &["api.", "v1.", "Error"]),
    ("ID", &["ID"]),
    ("", &[]),
  ];
  for (input, expected) in cases {
    assert_eq!(split_words(input), expected, "failed for input {input:?}");
    assert_eq!(split_words(input).concat(), input, "tokenization of {input:?} is lossy");
  }
}

#[test]
fn suffix_tokenization_matches_tail_of_full_tokenization() {
  for name in ["AdminXMLHTTPError", "store_PetList", "ApiV2Item", "a.b-c_D"] {
    let words = split_words(name);
    for start in 0..words.len() {
      let suffix: String = words[start..].concat();
      assert_eq!(split_words(&suffix), &words[start..], "suffix {suffix:?} of {name:?}");
    }
  }
}

#[test]
fn test_definition_refs() {
  let cases = [
    ("#/definitions/Pet", Some("Pet")),
    ("#/definitions/pets~1Pet", Some("pets/Pet")),
    ("#/definitions/a~0b", Some("a~b")),
    ("#/definitions/Map%C2%ABstring%C2%BB", Some("Map«string»")),
    ("#/definitions/", None),
    ("#/definitions/Pet/properties/name", None),
    ("#/parameters/limit", None),
    ("other.json#/definitions/Pet", None),
  ];
  for (input, expected) in cases {
    assert_eq!(parse_definition_ref(input).as_deref(), expected, "failed for input {input:?}");
  }
}

#[test]
fn definition_ref_escapes_pointer_characters() {
  for name in ["Pet", "pets/Pet", "a~b", "100%", "Map«string»"] {
    let reference = definition_ref(name);
    assert_eq!(parse_definition_ref(&reference).as_deref(), Some(name), "via {reference}");
  }
  assert_eq!(definition_ref("pets/Pet"), "#/definitions/pets~1Pet");
}

#[test]
fn test_identifier_cases() {
  assert_eq!(camel_case("list_pets"), "listPets");
  assert_eq!(camel_case("GetPetById"), "getPetById");
  assert_eq!(upper_snake_case("petStore"), "PET_STORE");
  assert_eq!(sanitize("pet store!"), "pet_store");
  assert_eq!(sanitize(""), "");
}

#[test]
fn test_interface_names() {
  let cases = [
    ("Pet", "IPet"),
    ("pet_store", "IPetStore"),
    ("XMLDocument", "IXMLDocument"),
    ("api.v1.Error", "IApiV1Error"),
    ("", "IUnnamed"),
  ];
  for (input, expected) in cases {
    assert_eq!(interface_name(input), expected, "failed for input {input:?}");
  }
}

#[test]
fn test_interpolate_path() {
  assert_eq!(interpolate_path("/pets"), "/pets");
  assert_eq!(interpolate_path("/pets/{pet_id}"), "/pets/${petId}");
  assert_eq!(
    interpolate_path("/stores/{storeId}/pets/{pet-id}"),
    "/stores/${storeId}/pets/${petId}"
  );
}

#[test]
fn test_spec_format_from_extension() {
  assert_eq!(SpecFormat::from_extension("yaml"), SpecFormat::Yaml);
  assert_eq!(SpecFormat::from_extension("yml"), SpecFormat::Yaml);
  assert_eq!(SpecFormat::from_extension("json"), SpecFormat::Json);
  assert_eq!(SpecFormat::from_extension("txt"), SpecFormat::Json);
}

#[test]
fn parse_json_reports_invalid_documents() {
  let err = parse_json(br#"{ "swagger": "2.0", "paths": { "/pets": { "get": { "tags": "pets" } } } }"#).unwrap_err();
  let message = err.to_string();
  assert!(message.starts_with("invalid document at"), "{message}");

  let document = parse_json(br#"{ "swagger": "2.0", "info": { "title": "Pets", "version": "1" }, "paths": {} }"#)
    .expect("minimal document should parse");
  assert_eq!(document.info.title, "Pets");
}

#[test]
fn test_member_access_quotes_non_identifiers() {
  assert_eq!(member_access("params", "petId"), "params.petId");
  assert_eq!(member_access("params", "store-id"), "params['store-id']");
  assert_eq!(
    interpolate_members("/stores/{store-id}/pets/{id}", "params"),
    "/stores/${params['store-id']}/pets/${params.id}"
  );
  assert_eq!(property_key("owner-name"), "'owner-name'");
}
