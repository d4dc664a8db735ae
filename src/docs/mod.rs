//! API documentation generated from doc comments.
//!
//! `extract` turns the doc comments of checkable declarations into
//! [`DocEntry`] records; `markdown` renders them and maintains the
//! documentation section of a README.

mod extract;
mod markdown;

pub use extract::{extract_all, extract_entries, parse_doc_comment, DocEntry, ParamDoc, ReturnDoc};
pub use markdown::{readme_stub, render_section, replace_section, update_readme};
