use indexmap::IndexMap;

use crate::utils::text::split_words;

#[derive(Debug, Default)]
struct TrieNode {
  word: String,
  children: Vec<TrieNode>,
  origin: Option<String>,
}

impl TrieNode {
  fn new(word: &str) -> Self {
    Self {
      word: word.to_string(),
      ..Self::default()
    }
  }

  fn compress(&mut self) {
    let Self { word, children, origin } = self;
    for child in children.iter_mut() {
      if origin.is_none() && !word.is_empty() && child.origin.is_some() {
        *origin = child.origin.take();
      }
      child.compress();
    }
  }

  fn collect_aliases(&self, suffix: &str, aliases: &mut IndexMap<String, String>) {
    if let Some(origin) = &self.origin {
      aliases.insert(origin.clone(), suffix.to_string());
    }
    for child in &self.children {
      child.collect_aliases(&format!("{}{suffix}", child.word), aliases);
    }
  }
}

/// Trie over the reversed word tokenization of definition names.
///
/// A node's alias is the concatenation of the words from that node up to the root, so every
/// compression pass that moves an origin one level closer to the root drops one leading word from
/// that name. Each node holds at most one origin, which keeps aliases pairwise distinct.
#[derive(Debug, Default)]
pub struct NameTrie {
  root: TrieNode,
}

impl NameTrie {
  pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
    let mut trie = Self::default();
    for name in names {
      trie.insert(name);
    }
    trie
  }

  pub fn insert(&mut self, name: &str) {
    let mut node = &mut self.root;
    for word in split_words(name).into_iter().rev() {
      let index = match node.children.iter().position(|child| child.word == word) {
        Some(index) => index,
        None => {
          node.children.push(TrieNode::new(word));
          node.children.len() - 1
        }
      };
      node = &mut node.children[index];
    }
    node.origin = Some(name.to_string());
  }

  /// One compression pass over the whole trie.
  pub fn compress(&mut self) {
    self.root.compress();
  }

  /// Original name -> alias for every name in the trie, in trie order.
  #[must_use]
  pub fn aliases(&self) -> IndexMap<String, String> {
    let mut aliases = IndexMap::new();
    self.root.collect_aliases("", &mut aliases);
    aliases
  }
}

/// Shortest unambiguous alias for each name after `level` compression passes.
///
/// Only names whose alias differs from the name itself are returned.
pub fn compress_names<'a>(names: impl IntoIterator<Item = &'a str>, level: usize) -> IndexMap<String, String> {
  let mut trie = NameTrie::from_names(names);
  for _ in 0..level {
    trie.compress();
  }
  trie
    .aliases()
    .into_iter()
    .filter(|(name, alias)| name != alias)
    .collect()
}
