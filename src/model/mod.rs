//! Document model types.
//!
//! These types sit between the PDF backend and the renderers: a [`Document`]
//! is a list of [`Page`]s carrying raw text and extracted [`Table`]s, and
//! [`Section`]s are derived from it by the index-driven splitter.

mod document;
mod page;
mod section;
mod table;

pub use document::{Document, Metadata};
pub use page::Page;
pub use section::{IndexEntry, Section};
pub use table::{column_count, Table, TableRow};
