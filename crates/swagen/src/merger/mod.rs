//! Combines several Swagger documents into one closed document.
//!
//! Each input is scoped, absorbed through the [`Deduplicator`], and once every input is in, the
//! surviving definition names are shortened by the name compressor. All renames go through the
//! structural rewriter, so the output never holds a dangling `#/definitions/` reference.

mod compress;
mod dedup;
mod error;
mod fingerprint;
mod rewrite;
mod scope;
mod stats;

#[cfg(test)]
mod tests;

use bon::Builder;
pub use compress::{NameTrie, compress_names};
pub use dedup::Deduplicator;
pub use error::{MergeError, MergeResult};
pub use fingerprint::{Fingerprint, Fingerprinter};
use itertools::Itertools;
pub use rewrite::{RewriteMap, apply_renames, ensure_closed};
pub use scope::{ScopedInput, scope_document};
pub use stats::{MergeStats, MergeWarning};

use crate::document::Document;

#[derive(Debug, Clone, Default, Builder)]
pub struct MergeOptions {
  /// Number of compression passes over the definition names; 0 keeps full names.
  #[builder(default)]
  pub compress_level: i32,
  /// Document the merge starts from. Defaults to [`Document::skeleton`].
  pub base: Option<Document>,
}

#[derive(Debug, Clone)]
pub struct MergeOutput {
  pub document: Document,
  pub stats: MergeStats,
}

/// Incremental merge: feed documents with [`Merger::add`], then call [`Merger::finish`].
#[derive(Debug)]
pub struct Merger {
  document: Document,
  deduplicator: Deduplicator,
  stats: MergeStats,
  compress_level: usize,
}

impl Merger {
  pub fn new(options: MergeOptions) -> MergeResult<Self> {
    let compress_level =
      usize::try_from(options.compress_level).map_err(|_| MergeError::NegativeCompressLevel(options.compress_level))?;

    let mut merger = Self {
      document: Document::skeleton(),
      deduplicator: Deduplicator::new(),
      stats: MergeStats::default(),
      compress_level,
    };

    if let Some(mut base) = options.base {
      let definitions = std::mem::take(&mut base.definitions);
      let paths = std::mem::take(&mut base.paths);
      let parameters = std::mem::take(&mut base.parameters);
      let responses = std::mem::take(&mut base.responses);
      merger.document = base;

      let seed = Document {
        definitions,
        paths,
        parameters,
        responses,
        ..Document::default()
      };
      merger.deduplicator.absorb(&mut merger.document, seed, &mut merger.stats)?;
      merger.stats = MergeStats::default();
    }

    Ok(merger)
  }

  /// Scopes `document` and folds it into the accumulated result.
  pub fn add(&mut self, mut document: Document, scope: &str) -> MergeResult<()> {
    scope_document(&mut document, scope);
    self
      .deduplicator
      .absorb(&mut self.document, document, &mut self.stats)
  }

  /// Compresses definition names and returns the merged document.
  pub fn finish(mut self) -> MergeResult<MergeOutput> {
    let aliases = compress_names(
      self.document.definitions.keys().map(String::as_str).sorted(),
      self.compress_level,
    );
    let renames: RewriteMap = aliases.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
    apply_renames(&mut self.document, &renames);
    self.stats.record_aliases(aliases);

    self.document.definitions.sort_unstable_keys();
    self.document.paths.sort_unstable_keys();
    self.stats.definitions_kept = self.document.definitions.len();

    ensure_closed(&self.document)?;
    Ok(MergeOutput {
      document: self.document,
      stats: self.stats,
    })
  }
}

/// Merges `documents` in order, scoping the i-th document with the i-th scope.
///
/// Fails without producing output when the scope count does not match the document count, when
/// the compression level is negative, or when any input holds a dangling definition reference.
pub fn merge(documents: Vec<Document>, scopes: &[String], options: MergeOptions) -> MergeResult<MergeOutput> {
  if options.compress_level < 0 {
    return Err(MergeError::NegativeCompressLevel(options.compress_level));
  }
  if documents.len() != scopes.len() {
    return Err(MergeError::ScopeCountMismatch {
      documents: documents.len(),
      scopes: scopes.len(),
    });
  }

  let mut merger = Merger::new(options)?;
  for (document, scope) in documents.into_iter().zip(scopes) {
    merger.add(document, scope)?;
  }
  merger.finish()
}
