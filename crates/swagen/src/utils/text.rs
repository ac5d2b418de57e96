use std::{collections::HashSet, sync::LazyLock};

use any_ascii::any_ascii;
use inflections::Inflect;
use regex::Regex;

const WORD_SEPARATORS: [char; 3] = ['_', '-', '.'];

static INVALID_CHARS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_$]+").unwrap());
static MULTI_UNDERSCORE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_+").unwrap());
static PATH_PARAM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{([A-Za-z0-9_-]+)\}").unwrap());
static IDENTIFIER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap());

fn is_separator(ch: char) -> bool {
  WORD_SEPARATORS.contains(&ch)
}

/// Splits a definition name into words without losing any characters.
///
/// Boundaries fall on lower-to-upper and digit-to-upper transitions, before the last capital of an
/// acronym that runs into a lowercase letter (`"XMLParser"` -> `["XML", "Parser"]`), and after a run
/// of `_`, `-` or `.` separators, which stay attached to the word they follow
/// (`"user_profile"` -> `["user_", "profile"]`). Concatenating the words always gives back `name`.
pub(crate) fn split_words(name: &str) -> Vec<&str> {
  let chars: Vec<(usize, char)> = name.char_indices().collect();
  let mut words = vec![];
  let mut start = 0;

  for i in 1..chars.len() {
    let (offset, ch) = chars[i];
    let prev = chars[i - 1].1;
    let next = chars.get(i + 1).map(|&(_, c)| c);

    let after_separator = is_separator(prev) && !is_separator(ch);
    let camel_boundary = ch.is_uppercase()
      && (prev.is_lowercase()
        || prev.is_ascii_digit()
        || (prev.is_uppercase() && next.is_some_and(char::is_lowercase)));

    if after_separator || camel_boundary {
      words.push(&name[start..offset]);
      start = offset;
    }
  }

  if start < name.len() {
    words.push(&name[start..]);
  }

  words
}

/// Replaces anything that cannot appear in a TypeScript identifier and collapses repeated underscores.
pub(crate) fn sanitize(input: &str) -> String {
  if input.is_empty() {
    return String::new();
  }

  let ascii = any_ascii(input);
  let replaced = INVALID_CHARS_RE.replace_all(&ascii, "_");
  let collapsed = MULTI_UNDERSCORE_RE.replace_all(&replaced, "_");

  collapsed.trim_matches('_').to_string()
}

/// `lowerCamelCase` identifier for functions and parameters.
pub(crate) fn camel_case(input: &str) -> String {
  let ident = sanitize(input).to_camel_case();
  prefix_if_digit_start(ident, '_')
}

/// Interface name for a definition: `I` followed by the PascalCase definition name.
pub(crate) fn interface_name(input: &str) -> String {
  let words: String = split_words(&sanitize(input))
    .into_iter()
    .map(|word| capitalize(word.trim_matches(&WORD_SEPARATORS[..])))
    .collect();
  if words.is_empty() {
    return "IUnnamed".to_string();
  }
  format!("I{words}")
}

fn capitalize(word: &str) -> String {
  let mut chars = word.chars();
  chars
    .next()
    .map(|first| first.to_uppercase().chain(chars).collect())
    .unwrap_or_default()
}

/// Function name for an operation: its `operationId`, or `"<method> <path>"` when it has none.
pub(crate) fn operation_function_name(operation_id: Option<&str>, method: &str, path: &str) -> String {
  operation_id.map_or_else(|| camel_case(&format!("{} {path}", method.to_lowercase())), camel_case)
}

/// `UPPER_SNAKE_CASE` constant name.
pub(crate) fn upper_snake_case(input: &str) -> String {
  let ident = sanitize(input).to_constant_case();
  prefix_if_digit_start(ident, '_')
}

/// Turns `/users/{user_id}` into the template literal body `/users/${userId}`.
pub(crate) fn interpolate_path(path: &str) -> String {
  PATH_PARAM_RE
    .replace_all(path, |caps: &regex::Captures<'_>| format!("${{{}}}", camel_case(&caps[1])))
    .into_owned()
}

/// Like [`interpolate_path`], but reads each path parameter from `object` under its wire name:
/// `/stores/{store-id}` -> `/stores/${params['store-id']}`.
pub(crate) fn interpolate_members(path: &str, object: &str) -> String {
  PATH_PARAM_RE
    .replace_all(path, |caps: &regex::Captures<'_>| format!("${{{}}}", member_access(object, &caps[1])))
    .into_owned()
}

/// `object.name`, or `object['name']` when `name` is not a plain identifier.
pub(crate) fn member_access(object: &str, name: &str) -> String {
  if IDENTIFIER_RE.is_match(name) {
    format!("{object}.{name}")
  } else {
    format!("{object}[{}]", quoted(name))
  }
}

/// Object literal key, quoted when `name` is not a plain identifier.
pub(crate) fn property_key(name: &str) -> String {
  if IDENTIFIER_RE.is_match(name) { name.to_string() } else { quoted(name) }
}

fn quoted(name: &str) -> String {
  format!("'{}'", name.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// `base`, or the first `<base><n>` with `n >= 2` that is not in `used`.
pub(crate) fn unique_name(base: &str, used: &HashSet<String>) -> String {
  if !used.contains(base) {
    return base.to_string();
  }
  (2..)
    .map(|n| format!("{base}{n}"))
    .find(|candidate| !used.contains(candidate))
    .unwrap_or_else(|| base.to_string())
}

fn prefix_if_digit_start(mut ident: String, prefix: char) -> String {
  if ident.starts_with(|c: char| c.is_ascii_digit()) {
    ident.insert(0, prefix);
  }
  ident
}
