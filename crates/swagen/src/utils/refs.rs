use percent_encoding::percent_decode_str;

const DEFINITIONS_SECTION: &str = "definitions";

/// Parses a schema `$ref` path and extracts the referenced definition name.
///
/// Only fragment-only pointers into the same document's `definitions` map are recognised
/// (`#/definitions/<name>`). The name segment is JSON-pointer decoded (`~1` to `/`, `~0` to `~`)
/// and then percent-decoded, since references are URI fragments. Returns `None` for external
/// references, pointers into other sections, and pointers that descend below a definition.
pub fn parse_definition_ref(ref_path: &str) -> Option<String> {
  parse_local_ref(ref_path, DEFINITIONS_SECTION)
}

/// Name of the entry a `#/<section>/<name>` reference points at, decoded like [`parse_definition_ref`].
pub fn parse_local_ref(ref_path: &str, section: &str) -> Option<String> {
  let segment = ref_path
    .strip_prefix("#/")?
    .strip_prefix(section)?
    .strip_prefix('/')?;
  if segment.is_empty() || segment.contains('/') {
    return None;
  }
  Some(decode_pointer_segment(segment))
}

/// Builds the `#/definitions/<name>` reference for a definition name, escaping it as a JSON pointer segment.
pub fn definition_ref(name: &str) -> String {
  local_ref(DEFINITIONS_SECTION, name)
}

/// Builds the `#/<section>/<name>` reference, escaping `name` like [`definition_ref`].
pub fn local_ref(section: &str, name: &str) -> String {
  format!("#/{section}/{}", encode_pointer_segment(name))
}

fn decode_pointer_segment(segment: &str) -> String {
  let decoded = segment.replace("~1", "/").replace("~0", "~");
  percent_decode_str(&decoded).decode_utf8_lossy().into_owned()
}

fn encode_pointer_segment(name: &str) -> String {
  name.replace('%', "%25").replace('~', "~0").replace('/', "~1")
}
