//! Cursor over a posting list stored in a file.
//!
//! The file is a flat array of little-endian `u32` document ids: no
//! header, no footer, no checksum. `length / 4` is the posting count.
//! `advance` binary-searches the remaining range with one 4-byte read per
//! probe, so long lists never have to be loaded into memory.
//!
//! A missing file is not an error: the term simply has no postings, and
//! the cursor is born empty with no handle held. The handle is released
//! as soon as the cursor exhausts, and dropping the cursor early releases
//! it too.

use crate::{idf, DocId, Query, QueryResult, NOT_READY, NO_MORE};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// File-backed term cursor. Same contract and scoring as
/// [`Term`](crate::term::Term); postings are read on demand.
pub struct FileTerm {
    postings: Option<File>,
    path: PathBuf,
    n: usize,
    cursor: usize,
    doc: DocId,
    idf: f32,
    boost: f32,
}

impl FileTerm {
    /// Open a postings file read-only.
    ///
    /// A file that does not exist yields a cursor with no postings (idf 0,
    /// no handle). Any other I/O failure is an error.
    pub fn open(total_docs: usize, path: impl AsRef<Path>) -> QueryResult<Self> {
        let path = path.as_ref().to_path_buf();
        let (postings, n) = match File::open(&path) {
            Ok(file) => {
                let n = file.metadata()?.len() as usize / 4;
                (Some(file), n)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => (None, 0),
            Err(e) => return Err(e.into()),
        };
        Ok(FileTerm {
            postings,
            path,
            n,
            cursor: 0,
            doc: NOT_READY,
            idf: idf(total_docs, n),
            boost: 1.0,
        })
    }

    fn exhaust(&mut self) -> DocId {
        self.doc = NO_MORE;
        self.postings = None;
        NO_MORE
    }

    fn move_to(&mut self, to: usize) -> QueryResult<DocId> {
        self.cursor = to;
        if self.cursor >= self.n {
            return Ok(self.exhaust());
        }
        let mut file = match self.postings.take() {
            Some(f) => f,
            // handle already released; nothing left to read
            None => return Ok(self.exhaust()),
        };
        let doc = read_slot(&mut file, self.cursor)?;
        self.postings = Some(file);
        self.doc = doc;
        Ok(doc)
    }
}

fn read_slot(file: &mut File, idx: usize) -> QueryResult<DocId> {
    file.seek(SeekFrom::Start(idx as u64 * 4))?;
    Ok(file.read_u32::<LittleEndian>()? as DocId)
}

impl Query for FileTerm {
    fn doc_id(&self) -> DocId {
        self.doc
    }

    fn next_doc(&mut self) -> QueryResult<DocId> {
        if self.doc == NO_MORE {
            return Ok(NO_MORE);
        }
        if self.doc != NOT_READY {
            self.cursor += 1;
        }
        self.move_to(self.cursor)
    }

    fn advance(&mut self, target: DocId) -> QueryResult<DocId> {
        if self.doc == NO_MORE {
            return Ok(NO_MORE);
        }
        if target == NO_MORE {
            return Ok(self.exhaust());
        }
        if target <= self.doc {
            return Ok(self.doc);
        }

        let mut start = self.cursor;
        let mut end = self.n;
        if let Some(mut file) = self.postings.take() {
            while start < end {
                let mid = start + (end - start) / 2;
                // an error drops the handle with the take above
                let current = read_slot(&mut file, mid)?;
                if current == target {
                    self.postings = Some(file);
                    self.cursor = mid;
                    self.doc = target;
                    return Ok(target);
                }
                if current < target {
                    start = mid + 1;
                } else {
                    end = mid;
                }
            }
            self.postings = Some(file);
        }
        self.move_to(start)
    }

    fn score(&self) -> f32 {
        self.idf * self.boost
    }

    fn cost(&self) -> usize {
        self.n.saturating_sub(self.cursor)
    }

    fn set_boost(&mut self, boost: f32) {
        self.boost = boost;
    }
}

impl fmt::Display for FileTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Append document ids to an open postings file as little-endian `u32`
/// values.
///
/// The write lands at the current length rounded down to a multiple of 4,
/// so the file always stays a whole array of 4-byte slots even if a
/// previous writer left a torn tail.
pub fn append_postings(file: &mut File, docs: &[DocId]) -> QueryResult<()> {
    let len = file.metadata()?.len();

    let mut buf = Vec::with_capacity(docs.len() * 4);
    for &doc in docs {
        buf.write_u32::<LittleEndian>(doc as u32)?;
    }

    file.seek(SeekFrom::Start((len / 4) * 4))?;
    file.write_all(&buf)?;
    Ok(())
}

/// Append document ids to the postings file at `path`, creating it if
/// needed.
pub fn append_postings_path(path: impl AsRef<Path>, docs: &[DocId]) -> QueryResult<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .open(path.as_ref())?;
    append_postings(&mut file, docs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_file(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("sift_query_file_term_tests");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::remove_file(&path).ok();
        path
    }

    fn drain(q: &mut dyn Query) -> Vec<DocId> {
        let mut out = Vec::new();
        while q.next_doc().unwrap() != NO_MORE {
            out.push(q.doc_id());
        }
        out
    }

    #[test]
    fn test_missing_file_is_an_empty_cursor() {
        let path = scratch_file("missing");
        let mut t = FileTerm::open(10, &path).unwrap();
        assert_eq!(t.doc_id(), NOT_READY);
        assert_eq!(t.score(), 0.0);
        assert_eq!(t.cost(), 0);
        assert_eq!(t.next_doc().unwrap(), NO_MORE);
    }

    #[test]
    fn test_roundtrip_through_file() {
        let path = scratch_file("roundtrip");
        let docs = vec![1, 2, 3, 1000, 1_000_000];
        append_postings_path(&path, &docs).unwrap();

        let mut t = FileTerm::open(10, &path).unwrap();
        assert_eq!(t.cost(), 5);
        assert_eq!(drain(&mut t), docs);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_advance_binary_searches_the_file() {
        let path = scratch_file("advance");
        let docs: Vec<DocId> = (0..10_000).map(|i| i * 3).collect();
        append_postings_path(&path, &docs).unwrap();

        let mut t = FileTerm::open(10_000, &path).unwrap();
        assert_eq!(t.advance(2).unwrap(), 3);
        assert_eq!(t.advance(600).unwrap(), 600);
        assert_eq!(t.advance(601).unwrap(), 603);
        assert_eq!(t.advance(29_998).unwrap(), NO_MORE);
        assert_eq!(t.next_doc().unwrap(), NO_MORE);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_append_is_4_byte_aligned() {
        let path = scratch_file("aligned");
        append_postings_path(&path, &[1, 2]).unwrap();

        // simulate a torn write: a trailing fractional slot
        {
            let mut f = OpenOptions::new().append(true).open(&path).unwrap();
            f.write_all(&[0xAA, 0xBB]).unwrap();
        }

        // the tail is overwritten, not extended
        append_postings_path(&path, &[3]).unwrap();
        let mut t = FileTerm::open(10, &path).unwrap();
        assert_eq!(drain(&mut t), vec![1, 2, 3]);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_handle_released_on_exhaustion() {
        let path = scratch_file("release");
        append_postings_path(&path, &[5, 6]).unwrap();

        let mut t = FileTerm::open(10, &path).unwrap();
        t.next_doc().unwrap();
        assert!(t.postings.is_some());
        t.next_doc().unwrap();
        t.next_doc().unwrap();
        assert_eq!(t.doc_id(), NO_MORE);
        assert!(t.postings.is_none());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_advance_to_no_more_releases_handle() {
        let path = scratch_file("release_advance");
        append_postings_path(&path, &[5, 6]).unwrap();

        let mut t = FileTerm::open(10, &path).unwrap();
        t.next_doc().unwrap();
        assert_eq!(t.advance(NO_MORE).unwrap(), NO_MORE);
        assert!(t.postings.is_none());
        std::fs::remove_file(&path).ok();
    }
}
