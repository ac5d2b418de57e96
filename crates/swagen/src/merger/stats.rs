use indexmap::IndexMap;
use strum::Display;

/// What a merge did, for reporting. Maps are ordered by the time each entry was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MergeStats {
  pub documents_merged: usize,
  pub definitions_received: usize,
  pub definitions_kept: usize,
  pub paths_merged: usize,
  /// Discarded definition name -> the structurally identical name that was kept.
  pub deduplicated: IndexMap<String, String>,
  /// Kept definition name -> name it was given to avoid clobbering a different definition.
  pub renamed: IndexMap<String, String>,
  /// Full definition name -> compressed alias, only for names that changed.
  pub aliases: IndexMap<String, String>,
  pub warnings: Vec<MergeWarning>,
}

impl MergeStats {
  pub fn record_document(&mut self, definitions: usize) {
    self.documents_merged += 1;
    self.definitions_received += definitions;
  }

  pub fn record_duplicate(&mut self, name: &str, kept: &str) {
    self.deduplicated.insert(name.to_string(), kept.to_string());
  }

  pub fn record_rename(&mut self, name: &str, renamed: &str) {
    self.renamed.insert(name.to_string(), renamed.to_string());
  }

  pub fn record_path(&mut self, path: &str, overwritten: bool) {
    self.paths_merged += 1;
    if overwritten {
      self.record_warning(MergeWarning::PathOverwritten { path: path.to_string() });
    }
  }

  pub fn record_aliases(&mut self, aliases: impl IntoIterator<Item = (String, String)>) {
    self.aliases.extend(aliases);
  }

  pub fn record_warning(&mut self, warning: MergeWarning) {
    self.warnings.push(warning);
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum MergeWarning {
  #[strum(to_string = "Path '{path}' was defined by more than one document; the last definition wins")]
  PathOverwritten { path: String },
  #[strum(to_string = "Definition '{name}' conflicts with a different definition and was renamed to '{renamed}'")]
  DefinitionRenamed { name: String, renamed: String },
  #[strum(to_string = "Shared parameter '{name}' conflicts with a different parameter and was renamed to '{renamed}'")]
  ParameterRenamed { name: String, renamed: String },
  #[strum(to_string = "Shared response '{name}' conflicts with a different response and was renamed to '{renamed}'")]
  ResponseRenamed { name: String, renamed: String },
}
