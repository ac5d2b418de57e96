pub mod refs;
pub mod spec;
pub mod text;

#[cfg(test)]
mod tests;

pub(crate) use refs::{definition_ref, local_ref, parse_definition_ref, parse_local_ref};
