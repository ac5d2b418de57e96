use std::collections::HashSet;

use crate::merger::compress::{NameTrie, compress_names};

#[test]
fn level_zero_is_identity() {
  let aliases = compress_names(["XItem", "YItem", "pet_store_Order"], 0);
  assert!(aliases.is_empty(), "unexpected aliases: {aliases:?}");
}

#[test]
fn first_sibling_takes_shared_suffix() {
  let aliases = compress_names(["XItem", "YItem"], 1);
  assert_eq!(aliases.len(), 1);
  assert_eq!(aliases["XItem"], "Item");
}

#[test]
fn each_pass_drops_one_word() {
  let names = ["AdminProfileResponse", "UserProfileResponse"];

  let once = compress_names(names, 1);
  assert_eq!(once.len(), 1);
  assert_eq!(once["AdminProfileResponse"], "ProfileResponse");

  let twice = compress_names(names, 2);
  assert_eq!(twice["AdminProfileResponse"], "Response");
  assert_eq!(twice["UserProfileResponse"], "ProfileResponse");
}

#[test]
fn name_that_is_a_suffix_of_another_is_never_shadowed() {
  let aliases = compress_names(["Item", "XItem"], 5);
  assert!(aliases.is_empty(), "unexpected aliases: {aliases:?}");
}

#[test]
fn separators_stay_with_their_word() {
  let aliases = compress_names(["admin_Order", "store_Order"], 1);
  assert_eq!(aliases["admin_Order"], "Order");
  assert!(!aliases.contains_key("store_Order"));
}

#[test]
fn aliases_are_pairwise_distinct_at_every_level() {
  let names = [
    "AdminPet",
    "AdminPetList",
    "HTTPError",
    "Item",
    "OrderItem",
    "StorePet",
    "StorePetList",
    "XItem",
    "XMLHTTPError",
    "YItem",
    "api_v2.Error",
    "api_v2.Item",
    "pet-store_Order",
  ];

  for level in 0..6 {
    let mut trie = NameTrie::from_names(names);
    for _ in 0..level {
      trie.compress();
    }
    let aliases = trie.aliases();

    assert_eq!(aliases.len(), names.len(), "level {level} lost a name");
    let distinct: HashSet<&String> = aliases.values().collect();
    assert_eq!(distinct.len(), names.len(), "level {level} produced duplicate aliases: {aliases:?}");
    for (name, alias) in &aliases {
      assert!(name.ends_with(alias.as_str()), "level {level}: {alias} is not a suffix of {name}");
    }
  }
}
