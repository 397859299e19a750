use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::doctable::{DocId, DocTable};
use crate::error::Result;

/// For a single word: document id -> ordered, duplicate-free token offsets.
pub type PostingList = BTreeMap<DocId, Vec<u32>>;

/// In-memory inverted index mapping words to their posting lists.
///
/// A word with no occurrences has no entry at all; posting lists are never
/// empty. Ordered maps keep the index content, and therefore the serialized
/// shard, identical across runs.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemIndex {
    postings: BTreeMap<String, PostingList>,
}

impl MemIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, word: &str) -> Option<&PostingList> {
        self.postings.get(word)
    }

    pub fn num_words(&self) -> usize {
        self.postings.len()
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.postings.keys().map(String::as_str)
    }

    fn insert(&mut self, word: String, doc_id: DocId, positions: Vec<u32>) {
        debug_assert!(
            positions.windows(2).all(|w| w[0] < w[1]),
            "positions must be strictly increasing"
        );
        let entry = self.postings.entry(word).or_default();
        debug_assert!(
            !entry.contains_key(&doc_id),
            "document {doc_id} added twice for one word"
        );
        entry.insert(doc_id, positions);
    }
}

/// The single write path into a `DocTable` and `MemIndex` pair.
///
/// One builder serves exactly one crawl; it is not meant to be shared
/// between concurrent crawls. `freeze` consumes the builder, so nothing can
/// mutate the index once it has been handed to a consumer.
#[derive(Debug, Default)]
pub struct IndexBuilder {
    doc_table: DocTable,
    index: MemIndex,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the next document id and record the path.
    pub fn add_document(&mut self, path: &str) -> Result<DocId> {
        self.doc_table.add(path)
    }

    /// Merge one word's occurrence positions for one document.
    ///
    /// Adding the same (word, document) pair twice within one crawl is a
    /// caller bug.
    pub fn add_postings(&mut self, word: String, doc_id: DocId, positions: Vec<u32>) {
        self.index.insert(word, doc_id, positions);
    }

    pub fn doc_count(&self) -> usize {
        self.doc_table.len()
    }

    pub fn word_count(&self) -> usize {
        self.index.num_words()
    }

    /// Finish the crawl and hand out the frozen table and index.
    pub fn freeze(self) -> (DocTable, MemIndex) {
        (self.doc_table, self.index)
    }
}
