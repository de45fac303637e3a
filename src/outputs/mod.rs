//! Rendered (non-JSON) responses.
//!
//! # Submodules
//!
//! - [`html`]: the index page listing the registry's sources

pub mod html;
