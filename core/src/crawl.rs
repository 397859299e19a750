use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::doctable::DocTable;
use crate::error::{Result, SearchError};
use crate::index::{IndexBuilder, MemIndex};
use crate::tokenizer;

/// Crawl the file tree rooted at `root` and build a frozen in-memory index.
///
/// Every regular file reachable from the root is tokenized and handed to the
/// index builder exactly once. Directory entries are visited in sorted order
/// by full path, independent of the filesystem's native ordering, so two
/// crawls of the same corpus assign identical document ids and produce
/// identical index content.
///
/// Unreadable or untokenizable files and unopenable subdirectories are
/// skipped with a warning; only problems with the root itself are fatal.
/// Symbolic-link cycles are not detected: the input is assumed to be a tree.
pub fn crawl_file_tree(root: &Path) -> Result<(DocTable, MemIndex)> {
    let meta = fs::metadata(root).map_err(|e| match e.kind() {
        ErrorKind::PermissionDenied => SearchError::PermissionDenied(root.to_path_buf()),
        _ => SearchError::NotADirectory(root.to_path_buf()),
    })?;
    if !meta.is_dir() {
        return Err(SearchError::NotADirectory(root.to_path_buf()));
    }
    let entries = fs::read_dir(root).map_err(|e| match e.kind() {
        ErrorKind::PermissionDenied => SearchError::PermissionDenied(root.to_path_buf()),
        _ => SearchError::Io(e),
    })?;

    let mut builder = IndexBuilder::new();
    handle_dir(entries, &mut builder);
    tracing::info!(
        root = %root.display(),
        num_docs = builder.doc_count(),
        num_words = builder.word_count(),
        "crawl finished"
    );
    Ok(builder.freeze())
}

/// Process one directory: collect (path, is_dir) for every entry, sort by
/// full path, then handle files and recurse into subdirectories in that
/// order. Recursion depth is bounded by the corpus's directory depth.
fn handle_dir(dir: fs::ReadDir, builder: &mut IndexBuilder) {
    let mut entries: Vec<(PathBuf, bool)> = Vec::new();
    for entry in dir {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                tracing::warn!(%err, "skipping unreadable directory entry");
                continue;
            }
        };
        let path = entry.path();
        let meta = match fs::metadata(&path) {
            Ok(m) => m,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "skipping entry without metadata");
                continue;
            }
        };
        if meta.is_file() {
            entries.push((path, false));
        } else if meta.is_dir() {
            entries.push((path, true));
        }
        // Anything else (sockets, fifos, ...) is ignored.
    }

    entries.sort();

    for (path, is_dir) in entries {
        if is_dir {
            match fs::read_dir(&path) {
                Ok(subdir) => handle_dir(subdir, builder),
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "skipping unopenable subdirectory");
                }
            }
        } else {
            handle_file(&path, builder);
        }
    }
}

/// Tokenize one file and merge its word/position table into the index.
fn handle_file(path: &Path, builder: &mut IndexBuilder) {
    let table = match tokenizer::tokenize_file(path) {
        Ok(t) => t,
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "skipping untokenizable file");
            return;
        }
    };
    let path_str = path.to_string_lossy();
    let doc_id = match builder.add_document(&path_str) {
        Ok(id) => id,
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "skipping unregisterable file");
            return;
        }
    };
    // Consuming the table moves each word's positions into the shared index;
    // the per-file table is gone after this loop.
    let words = table.len();
    for (word, positions) in table {
        builder.add_postings(word, doc_id, positions);
    }
    tracing::debug!(path = %path_str, doc_id, words, "indexed file");
}
