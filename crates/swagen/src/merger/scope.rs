use std::path::PathBuf;

use super::{
  error::{MergeError, MergeResult},
  rewrite::{RewriteMap, apply_renames},
};
use crate::document::Document;

const SCOPE_SEPARATOR: char = '@';

/// Prefixes every definition name with `scope` and rewrites the references to match.
///
/// An empty scope leaves the document untouched.
pub fn scope_document(document: &mut Document, scope: &str) {
  if scope.is_empty() {
    return;
  }

  let renames: RewriteMap = document
    .definitions
    .keys()
    .map(|name| (name.clone(), format!("{scope}{name}")))
    .collect();
  apply_renames(document, &renames);
}

/// One `[scope@]path` input as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedInput {
  pub scope: String,
  pub path: PathBuf,
}

impl ScopedInput {
  /// Splits `scope@path`; a bare path has the empty scope.
  pub fn parse(input: &str) -> MergeResult<Self> {
    let mut parts = input.split(SCOPE_SEPARATOR);
    match (parts.next(), parts.next(), parts.next()) {
      (Some(path), None, _) => Ok(Self {
        scope: String::new(),
        path: PathBuf::from(path),
      }),
      (Some(scope), Some(path), None) => Ok(Self {
        scope: scope.to_string(),
        path: PathBuf::from(path),
      }),
      _ => Err(MergeError::MalformedScopedInput(input.to_string())),
    }
  }
}
