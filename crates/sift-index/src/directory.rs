//! Directory-backed index.
//!
//! Each (field, term) pair maps to one postings file at
//! `<root>/<field>/<hash>/<term>`, where `<hash>` is the last character of
//! the cleaned term, spreading files over subdirectories. Field and term
//! both go through an identifier cleanup first (non-alphanumeric
//! characters become `_`, length capped at 64 bytes), so arbitrary input
//! cannot escape the index root.
//!
//! Appends go through a bounded file-descriptor cache. Searches either
//! read a postings file whole (eager, the default) or binary-search it in
//! place through a [`FileTerm`] (lazy), which pays off for huge terms that
//! a cheap sibling will skip through.

use crate::analyzer::{default_analyzer, Analyzer};
use crate::dsl::{self, QuerySpec};
use crate::error::IndexResult;
use crate::memory::Document;
use sift_query::prelude::*;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const MAX_TERM_LEN: usize = 64;

/// A document that brings its own identifier, for indexes that do not
/// keep a forward store.
pub trait DocumentWithId: Document {
    fn document_id(&self) -> DocId;
}

/// Bounded cache of open postings files.
///
/// Keeps up to `max_open` descriptors; opening one more closes everything
/// cached, which is crude but keeps the worst case bounded without LRU
/// bookkeeping.
pub struct FdCache {
    max_open: usize,
    files: Mutex<HashMap<PathBuf, File>>,
}

impl FdCache {
    pub fn new(max_open: usize) -> Self {
        FdCache {
            max_open,
            files: Mutex::new(HashMap::new()),
        }
    }

    /// Run `cb` with the (cached or freshly opened) writable file at
    /// `path`, creating parent directories as needed.
    pub fn with_file<R>(
        &self,
        path: &Path,
        cb: impl FnOnce(&mut File) -> IndexResult<R>,
    ) -> IndexResult<R> {
        let mut files = self.files.lock().unwrap();
        if files.len() >= self.max_open && !files.contains_key(path) {
            files.clear();
        }
        let file = match files.entry(path.to_path_buf()) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                let file = OpenOptions::new().create(true).write(true).open(path)?;
                e.insert(file)
            }
        };
        cb(file)
    }

    /// Close every cached descriptor.
    pub fn close(&self) {
        self.files.lock().unwrap().clear();
    }
}

/// Inverted index persisted as one postings file per (field, term).
pub struct DirIndex {
    root: PathBuf,
    per_field: HashMap<String, Analyzer>,
    fallback: Analyzer,
    fd_cache: FdCache,
    total_docs: usize,
    lazy: bool,
}

impl DirIndex {
    /// Open (or start) an index rooted at `root`. Fields without an
    /// analyzer entry use the default analyzer.
    pub fn new(
        root: impl Into<PathBuf>,
        fd_cache: FdCache,
        per_field: HashMap<String, Analyzer>,
    ) -> Self {
        DirIndex {
            root: root.into(),
            per_field,
            fallback: default_analyzer(),
            fd_cache,
            total_docs: 1,
            lazy: false,
        }
    }

    /// Serve searches through [`FileTerm`] cursors instead of reading
    /// postings files whole.
    pub fn lazy(mut self, lazy: bool) -> Self {
        self.lazy = lazy;
        self
    }

    /// Set the total document count used for idf. The index does not
    /// track it (documents bring their own ids), so scoring-sensitive
    /// callers provide it.
    pub fn with_total_docs(mut self, total_docs: usize) -> Self {
        self.total_docs = total_docs.max(1);
        self
    }

    fn analyzer_for(&self, field: &str) -> &Analyzer {
        self.per_field.get(field).unwrap_or(&self.fallback)
    }

    fn path_for(&self, field: &str, term: &str) -> PathBuf {
        self.root.join(field).join(dir_hash(term)).join(term)
    }

    /// Append the documents' postings, grouped per (field, term) so each
    /// touched file is written once.
    pub fn index<D: DocumentWithId>(&self, docs: &[D]) -> IndexResult<()> {
        let mut todo: HashMap<PathBuf, Vec<DocId>> = HashMap::new();

        for doc in docs {
            let id = doc.document_id();
            for (field, values) in doc.indexable_fields() {
                let field = term_cleanup(&field);
                if field.is_empty() {
                    continue;
                }
                let analyzer = self.analyzer_for(&field);
                for value in values {
                    for token in analyzer.analyze_index(&value) {
                        let token = term_cleanup(&token);
                        if token.is_empty() {
                            continue;
                        }
                        let ids = todo.entry(self.path_for(&field, &token)).or_default();
                        // a token repeated within one document lands only once
                        if ids.last() != Some(&id) {
                            ids.push(id);
                        }
                    }
                }
            }
        }

        for (path, ids) in todo {
            self.fd_cache
                .with_file(&path, |file| Ok(append_postings(file, &ids)?))?;
        }
        Ok(())
    }

    /// Build one term cursor per token the search-time analyzer produces
    /// for `text` in `field`.
    pub fn terms(&self, field: &str, text: &str) -> IndexResult<Vec<Box<dyn Query + 'static>>> {
        self.analyzer_for(field)
            .analyze_search(text)
            .iter()
            .map(|token| self.term_query(field, token))
            .collect()
    }

    fn term_query(&self, field: &str, term: &str) -> IndexResult<Box<dyn Query + 'static>> {
        let field = term_cleanup(field);
        let term = term_cleanup(term);
        if field.is_empty() || term.is_empty() {
            let label = format!("broken({}:{})", field, term);
            return Ok(Box::new(Term::from_owned(self.total_docs, &label, vec![])));
        }
        let path = self.path_for(&field, &term);

        if self.lazy {
            return Ok(Box::new(FileTerm::open(self.total_docs, &path)?));
        }

        let postings = match std::fs::read(&path) {
            Ok(data) => data
                .chunks_exact(4)
                .map(|slot| u32::from_le_bytes([slot[0], slot[1], slot[2], slot[3]]) as DocId)
                .collect(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        let label = path.to_string_lossy().into_owned();
        Ok(Box::new(Term::from_owned(self.total_docs, &label, postings)))
    }

    /// Build a cursor tree from a DSL description, resolving terms against
    /// this index (a multi-token term becomes an `Or` over its tokens).
    pub fn parse(&self, spec: &QuerySpec) -> IndexResult<Box<dyn Query + 'static>> {
        dsl::parse(spec, &mut |field: &str, value: &str| {
            let mut queries = self.terms(field, value)?;
            Ok(if queries.len() == 1 {
                queries.remove(0)
            } else {
                Box::new(Or::new(queries))
            })
        })
    }

    /// Drain `query`, calling `cb` with each matching id and score.
    pub fn for_each<F>(&self, query: &mut dyn Query, mut cb: F) -> IndexResult<()>
    where
        F: FnMut(DocId, f32),
    {
        while query.next_doc()? != NO_MORE {
            cb(query.doc_id(), query.score());
        }
        Ok(())
    }

    /// Close the cached postings descriptors.
    pub fn close(&self) {
        self.fd_cache.close();
    }
}

/// Make a string safe to use as one path segment: every non-alphanumeric
/// character becomes `_`, and the result is capped at 64 bytes (without
/// splitting a character).
fn term_cleanup(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    if cleaned.len() <= MAX_TERM_LEN {
        return cleaned;
    }
    let mut end = 0;
    for (i, c) in cleaned.char_indices() {
        if i + c.len_utf8() > MAX_TERM_LEN {
            break;
        }
        end = i + c.len_utf8();
    }
    cleaned[..end].to_string()
}

/// Subdirectory for a cleaned term: its last character.
fn dir_hash(term: &str) -> String {
    term.chars().last().map(String::from).unwrap_or_default()
}
