//! Query module - Strict parsing of cache-naming query strings
//!
//! Only `f`, `g`, `b` and `z` are accepted, each at most once, so that every
//! accepted query maps to exactly one cache file name.

pub mod parse;
