// src/extract/mod.rs
// =============================================================================
// Page content extraction.
//
// Submodules:
// - html: visible text and same-origin links from an HTML document
// =============================================================================

mod html;

pub use html::{is_same_origin, parse_page};
