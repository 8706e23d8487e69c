//! XHTML parser for the Lumen viewer.
//!
//! # Scope
//!
//! - **Entity resolution**: named (`&amp;`) and numeric (`&#68;`, `&#x44;`)
//!   character references, `;`-terminated
//! - **Markup parsing**: a single-pass scanner that builds a
//!   [`lumen_dom::DomTree`] directly, handling comments, `<!DOCTYPE>` and
//!   `<?xml?>` prologs, self-closing and always-empty tags, raw-text bodies of
//!   `<script>`/`<style>`, and whitespace preservation inside `<pre>`
//! - **Diagnostics**: malformed input never aborts the parse; every anomaly
//!   is recorded with a [`Severity`] and source offset
//!
//! # Not Supported
//!
//! - Implied tags and the HTML5 insertion-mode state machine
//! - Legacy character references without a trailing `;`
//! - Incremental or streaming input

/// Parser diagnostics.
pub mod diagnostics;
/// Character reference resolution.
pub mod entity;
/// Markup parser and tree dumps.
pub mod parser;

pub use diagnostics::{Diagnostic, Severity};
pub use parser::{HtmlParser, ParseOutput, dump_tree, parse, print_tree};
