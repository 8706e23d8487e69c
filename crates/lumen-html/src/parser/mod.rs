//! Markup parser: scanner, tree builder and tree dumps.

mod builder;
mod dump;
mod scanner;

pub use builder::{HtmlParser, ParseOutput, parse};
pub use dump::{dump_tree, print_tree};
