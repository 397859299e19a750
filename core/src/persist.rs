use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use crate::doctable::{DocId, DocTable};
use crate::error::{Result, SearchError};
use crate::index::{MemIndex, PostingList};

pub const SHARD_VERSION: u32 = 1;

/// Human-readable sidecar describing one shard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShardMeta {
    pub version: u32,
    pub num_docs: usize,
    pub num_words: usize,
    pub created_at: String,
}

/// File layout of a shard directory.
pub struct ShardPaths {
    pub root: PathBuf,
}

impl ShardPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
    fn doctable(&self) -> PathBuf {
        self.root.join("doctable.bin")
    }
    fn postings(&self) -> PathBuf {
        self.root.join("postings.bin")
    }
    fn meta(&self) -> PathBuf {
        self.root.join("meta.json")
    }
}

/// Serialize a frozen doctable/index pair into a shard directory.
pub fn write_shard(
    dir: &Path,
    doc_table: &DocTable,
    index: &MemIndex,
    created_at: String,
) -> Result<()> {
    let paths = ShardPaths::new(dir);
    fs::create_dir_all(&paths.root)?;

    let f = BufWriter::new(File::create(paths.doctable())?);
    bincode::serialize_into(f, doc_table)?;

    let f = BufWriter::new(File::create(paths.postings())?);
    bincode::serialize_into(f, index)?;

    let meta = ShardMeta {
        version: SHARD_VERSION,
        num_docs: doc_table.len(),
        num_words: index.num_words(),
        created_at,
    };
    fs::write(paths.meta(), serde_json::to_string_pretty(&meta)?)?;
    Ok(())
}

fn corrupt(shard: &Path, reason: String) -> SearchError {
    SearchError::ShardCorrupt {
        shard: shard.to_path_buf(),
        reason,
    }
}

/// Read-only view of one persisted shard.
///
/// Opening is expensive (the whole shard is loaded); lookups afterwards are
/// cheap, never mutate, and are safe to issue from many queries against the
/// same reader.
#[derive(Debug)]
pub struct ShardReader {
    root: PathBuf,
    meta: ShardMeta,
    doc_table: DocTable,
    index: MemIndex,
}

impl ShardReader {
    pub fn open(dir: &Path) -> Result<Self> {
        let paths = ShardPaths::new(dir);

        let meta_text = fs::read_to_string(paths.meta())
            .map_err(|e| corrupt(&paths.root, format!("meta.json: {e}")))?;
        let meta: ShardMeta = serde_json::from_str(&meta_text)
            .map_err(|e| corrupt(&paths.root, format!("meta.json: {e}")))?;
        if meta.version != SHARD_VERSION {
            return Err(corrupt(
                &paths.root,
                format!("unsupported shard version {}", meta.version),
            ));
        }

        let f = File::open(paths.doctable())
            .map_err(|e| corrupt(&paths.root, format!("doctable.bin: {e}")))?;
        let doc_table: DocTable = bincode::deserialize_from(BufReader::new(f))
            .map_err(|e| corrupt(&paths.root, format!("doctable.bin: {e}")))?;

        let f = File::open(paths.postings())
            .map_err(|e| corrupt(&paths.root, format!("postings.bin: {e}")))?;
        let index: MemIndex = bincode::deserialize_from(BufReader::new(f))
            .map_err(|e| corrupt(&paths.root, format!("postings.bin: {e}")))?;

        tracing::debug!(
            shard = %paths.root.display(),
            num_docs = meta.num_docs,
            num_words = meta.num_words,
            "opened shard"
        );
        Ok(Self {
            root: paths.root,
            meta,
            doc_table,
            index,
        })
    }

    pub fn lookup_word(&self, word: &str) -> Option<&PostingList> {
        self.index.lookup(word)
    }

    pub fn resolve_doc_id(&self, id: DocId) -> Option<&str> {
        self.doc_table.resolve(id)
    }

    pub fn meta(&self) -> &ShardMeta {
        &self.meta
    }

    pub fn num_docs(&self) -> usize {
        self.doc_table.len()
    }

    pub fn num_words(&self) -> usize {
        self.index.num_words()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
