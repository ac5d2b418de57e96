use indexmap::IndexMap;
use strum::{AsRefStr, Display};

use super::error::{MergeError, MergeResult};
use crate::{
  document::Document,
  utils::{local_ref, parse_definition_ref, parse_local_ref},
};

/// Old definition name -> new definition name, both bare (unprefixed) names.
pub type RewriteMap = IndexMap<String, String>;

/// Document-level maps whose entries are addressed by `#/<section>/<name>` references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Section {
  Definitions,
  Parameters,
  Responses,
}

/// Renames definitions and every `$ref` pointing at them in one pass.
///
/// Each reference is looked up in `renames` exactly once, so `A -> B` and `B -> C` in the same map
/// move `A` to `B` and `B` to `C` without chaining, and a name that merely contains another name
/// is never touched. References nested in unmodelled fields (vendor extensions, non-body parameter
/// `items`) are rewritten too. Definition keys keep their position. References whose name is not
/// in the map, including non-local ones, are left byte-for-byte unchanged.
pub fn apply_renames(document: &mut Document, renames: &RewriteMap) {
  apply_section_renames(document, Section::Definitions, renames);
}

/// [`apply_renames`] for any section: re-keys the entries of `section` and rewrites every
/// `#/<section>/<old>` reference.
pub fn apply_section_renames(document: &mut Document, section: Section, renames: &RewriteMap) {
  if renames.is_empty() {
    return;
  }

  document.walk_refs_mut(&mut |ref_path: &mut String| {
    if let Some(name) = parse_local_ref(ref_path, section.as_ref())
      && let Some(target) = renames.get(&name)
    {
      *ref_path = local_ref(section.as_ref(), target);
    }
  });

  match section {
    Section::Definitions => rekey(&mut document.definitions, renames),
    Section::Parameters => rekey(&mut document.parameters, renames),
    Section::Responses => rekey(&mut document.responses, renames),
  }
}

fn rekey<T>(entries: &mut IndexMap<String, T>, renames: &RewriteMap) {
  *entries = std::mem::take(entries)
    .into_iter()
    .map(|(name, entry)| match renames.get(&name) {
      Some(target) => (target.clone(), entry),
      None => (name, entry),
    })
    .collect();
}

/// Fails on the first local definition reference that does not resolve inside `document`.
///
/// A merged document must be closed: every `#/definitions/<name>`, typed or nested in an
/// unmodelled field, has to name a key of its own `definitions` map. External references are not
/// checked.
pub fn ensure_closed(document: &Document) -> MergeResult<()> {
  let sections = document
    .definitions
    .iter()
    .map(|(name, schema)| (format!("definition '{name}'"), schema.schema_refs()))
    .chain(
      document
        .paths
        .iter()
        .map(|(path, item)| (format!("path '{path}'"), item.schema_refs())),
    )
    .chain(
      document
        .parameters
        .iter()
        .map(|(name, parameter)| (format!("parameter '{name}'"), parameter.schema_refs())),
    )
    .chain(
      document
        .responses
        .iter()
        .map(|(name, response)| (format!("response '{name}'"), response.schema_refs())),
    );

  for (location, refs) in sections {
    let dangling = refs.into_iter().find(|reference| {
      parse_definition_ref(reference).is_some_and(|name| !document.definitions.contains_key(&name))
    });
    if let Some(reference) = dangling {
      return Err(MergeError::UnresolvedReference {
        reference: reference.to_string(),
        location,
      });
    }
  }

  Ok(())
}
