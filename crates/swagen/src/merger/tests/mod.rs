mod compress;
mod merge;
mod support;
