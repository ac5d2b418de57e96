use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use itertools::Itertools;

use super::{
  error::MergeResult,
  fingerprint::{Fingerprint, Fingerprinter},
  rewrite::{RewriteMap, Section, apply_renames, apply_section_renames, ensure_closed},
  stats::{MergeStats, MergeWarning},
};
use crate::document::Document;

/// Remembers which definition name holds each fingerprint across every absorbed document.
#[derive(Debug, Default)]
pub struct Deduplicator {
  fingerprints: HashMap<Fingerprint, String>,
}

impl Deduplicator {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Moves `incoming` into `target`, dropping definitions structurally identical to one already
  /// kept and pointing their references at the survivor.
  ///
  /// Definitions are visited in name order so the first name in sort order wins within a document,
  /// and earlier documents win over later ones. A kept definition whose name is already used by a
  /// different definition is renamed to the first free `<name><n>`.
  pub fn absorb(&mut self, target: &mut Document, mut incoming: Document, stats: &mut MergeStats) -> MergeResult<()> {
    ensure_closed(&incoming)?;
    stats.record_document(incoming.definitions.len());

    let fingerprints = {
      let mut fingerprinter = Fingerprinter::new(&incoming);
      incoming
        .definitions
        .keys()
        .sorted()
        .map(|name| Ok((name.clone(), fingerprinter.definition(name)?)))
        .collect::<MergeResult<Vec<_>>>()?
    };

    let mut used: HashSet<String> = target
      .definitions
      .keys()
      .chain(incoming.definitions.keys())
      .cloned()
      .collect();
    let mut renames = RewriteMap::new();
    let mut discarded = vec![];

    for (name, fingerprint) in fingerprints {
      if let Some(kept) = self.fingerprints.get(&fingerprint) {
        if *kept != name {
          renames.insert(name.clone(), kept.clone());
          stats.record_duplicate(&name, kept);
        }
        discarded.push(name);
        continue;
      }

      let final_name = if target.definitions.contains_key(&name) {
        let renamed = ensure_unique(&name, &used);
        used.insert(renamed.clone());
        stats.record_rename(&name, &renamed);
        stats.record_warning(MergeWarning::DefinitionRenamed {
          name: name.clone(),
          renamed: renamed.clone(),
        });
        renames.insert(name, renamed.clone());
        renamed
      } else {
        name
      };
      self.fingerprints.insert(fingerprint, final_name);
    }

    for name in &discarded {
      incoming.definitions.shift_remove(name);
    }
    apply_renames(&mut incoming, &renames);

    let parameter_renames = shared_renames(&target.parameters, &incoming.parameters);
    for (name, renamed) in &parameter_renames {
      stats.record_warning(MergeWarning::ParameterRenamed {
        name: name.clone(),
        renamed: renamed.clone(),
      });
    }
    apply_section_renames(&mut incoming, Section::Parameters, &parameter_renames);

    let response_renames = shared_renames(&target.responses, &incoming.responses);
    for (name, renamed) in &response_renames {
      stats.record_warning(MergeWarning::ResponseRenamed {
        name: name.clone(),
        renamed: renamed.clone(),
      });
    }
    apply_section_renames(&mut incoming, Section::Responses, &response_renames);

    target.definitions.extend(incoming.definitions);
    for (path, item) in incoming.paths {
      let replaced = target.paths.insert(path.clone(), item.clone());
      stats.record_path(&path, replaced.is_some_and(|previous| previous != item));
    }
    target.parameters.extend(incoming.parameters);
    target.responses.extend(incoming.responses);
    stats.definitions_kept = target.definitions.len();

    Ok(())
  }
}

/// Renames for incoming shared entries whose name is already taken by a different entry.
/// Identical entries keep their name and collapse into one.
fn shared_renames<T: PartialEq>(target: &IndexMap<String, T>, incoming: &IndexMap<String, T>) -> RewriteMap {
  let mut used: HashSet<String> = target.keys().chain(incoming.keys()).cloned().collect();
  let mut renames = RewriteMap::new();
  for (name, entry) in incoming {
    if target.get(name).is_some_and(|existing| existing != entry) {
      let renamed = ensure_unique(name, &used);
      used.insert(renamed.clone());
      renames.insert(name.clone(), renamed);
    }
  }
  renames
}

/// First `<base><n>` with `n >= 2` that is not in `used`.
fn ensure_unique(base: &str, used: &HashSet<String>) -> String {
  (2..)
    .map(|n| format!("{base}{n}"))
    .find(|candidate| !used.contains(candidate))
    .unwrap_or_else(|| base.to_string())
}
