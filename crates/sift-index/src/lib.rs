//! Index glue around [`sift_query`]: everything that turns raw documents
//! and serialized queries into cursor trees.
//!
//! - **Analysis** ([`normalize`], [`tokenize`], [`analyzer`]): chains that
//!   turn text into terms, with separate index-time and search-time
//!   tokenization per field.
//! - **Indexes**: [`memory::MemIndex`] keeps postings and documents in
//!   memory; [`directory::DirIndex`] persists one postings file per
//!   (field, term) and can search it lazily without loading whole lists.
//! - **DSL** ([`dsl`]): a JSON query description (TERM/AND/OR/DISMAX)
//!   compiled into a cursor tree.
//! - **Collection** ([`collector`]): bounded top-N over a drained query.
//!
//! # Quick Start
//!
//! ```rust
//! use sift_index::prelude::*;
//! use std::collections::HashMap;
//!
//! struct City {
//!     name: &'static str,
//!     country: &'static str,
//! }
//!
//! impl Document for City {
//!     fn indexable_fields(&self) -> HashMap<String, Vec<String>> {
//!         let mut out = HashMap::new();
//!         out.insert("name".to_string(), vec![self.name.to_string()]);
//!         out.insert("country".to_string(), vec![self.country.to_string()]);
//!         out
//!     }
//! }
//!
//! let mut index = MemIndex::new(HashMap::new());
//! index.index(vec![
//!     City { name: "Amsterdam", country: "NL" },
//!     City { name: "Amsterdam University", country: "NL" },
//!     City { name: "Sofia", country: "BG" },
//! ]);
//!
//! // (name:amsterdam OR name:university) AND country:nl
//! let mut query = And::new(vec![
//!     Box::new(Or::new(index.terms("name", "amsterdam university"))),
//!     Box::new(Or::new(index.terms("country", "NL"))),
//! ]);
//!
//! let top = index.top_n(10, &mut query, None)?;
//! assert_eq!(top.total, 2);
//! assert_eq!(top.hits[0].document.country, "NL");
//! # Ok::<(), sift_index::IndexError>(())
//! ```

/// Analyzer bundles (normalizers + tokenizers) per field.
pub mod analyzer;

/// Search results and bounded top-N collection.
pub mod collector;

/// Directory-backed index: one postings file per (field, term).
pub mod directory;

/// JSON query DSL and its compiler.
pub mod dsl;

/// Error types for indexing and query parsing.
pub mod error;

/// In-memory index with a forward document store.
pub mod memory;

/// Normalizer chain (lowercase, unaccent, cleanup, ...).
pub mod normalize;

/// Tokenizer chain (whitespace, edge n-grams, soundex, ...).
pub mod tokenize;

pub use error::{IndexError, IndexResult};

/// Re-export of the commonly used types, including the `sift_query`
/// prelude (queries are built and drained through it).
pub mod prelude {
    pub use crate::analyzer::{
        autocomplete_analyzer, default_analyzer, fuzzy_analyzer, id_analyzer, soundex_analyzer,
        Analyzer,
    };
    pub use crate::collector::{Hit, SearchResult};
    pub use crate::directory::{DirIndex, DocumentWithId, FdCache};
    pub use crate::dsl::{self, QueryKind, QuerySpec};
    pub use crate::memory::{Document, MemIndex};
    pub use crate::{IndexError, IndexResult};
    pub use sift_query::prelude::*;
}
