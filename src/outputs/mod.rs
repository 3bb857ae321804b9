//! Output generation.
//!
//! # Submodules
//!
//! - [`html`]: renders the selected stories into an HTML fragment with Tera
//!
//! The fragment goes to stdout; nothing is written to disk.

pub mod html;
