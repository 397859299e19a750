use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Result, SearchError};
use crate::persist::ShardReader;

/// One matching document for a query. `rank` is the total occurrence count
/// of every query word in this document, summed across all shards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    pub document: String,
    pub rank: u64,
}

/// Resolves conjunctive queries against a fixed set of shard readers.
///
/// Shards are opened once at construction and reused across queries; the
/// engine itself keeps no per-query state and no cache, so the same query
/// against unchanged shards always returns the same results.
#[derive(Debug)]
pub struct QueryEngine {
    shards: Vec<ShardReader>,
}

impl QueryEngine {
    pub fn new(shards: Vec<ShardReader>) -> Result<Self> {
        if shards.is_empty() {
            return Err(SearchError::NoShards);
        }
        Ok(Self { shards })
    }

    /// Open every shard directory and build an engine over them.
    pub fn open<P: AsRef<Path>>(dirs: &[P]) -> Result<Self> {
        let shards = dirs
            .iter()
            .map(|d| ShardReader::open(d.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::new(shards)
    }

    pub fn shards(&self) -> &[ShardReader] {
        &self.shards
    }

    /// Resolve one conjunctive query.
    ///
    /// `words` must be non-empty and pre-normalized (see
    /// `tokenizer::query_terms`); the engine does not re-normalize. A
    /// document qualifies iff every word occurs in it in at least one shard;
    /// its rank is the sum of all per-word, per-shard occurrence counts.
    /// Results are ordered ascending by (rank, document path) so the output
    /// is fully deterministic; display layers wanting best-match-first
    /// reverse it.
    pub fn process_query(&self, words: &[String]) -> Result<Vec<QueryResult>> {
        if words.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        // Candidate set: document path -> accumulated rank. None until the
        // first word has been processed.
        let mut candidates: Option<BTreeMap<String, u64>> = None;
        for word in words {
            let hits = self.word_hits(word)?;
            if hits.is_empty() {
                // A word matched by no shard empties the AND; later words
                // cannot bring documents back.
                return Ok(Vec::new());
            }
            candidates = Some(match candidates {
                None => hits,
                Some(cands) => cands
                    .into_iter()
                    .filter_map(|(doc, rank)| hits.get(&doc).map(|count| (doc, rank + count)))
                    .collect(),
            });
            if candidates.as_ref().is_some_and(BTreeMap::is_empty) {
                return Ok(Vec::new());
            }
        }

        let mut results: Vec<QueryResult> = candidates
            .unwrap_or_default()
            .into_iter()
            .map(|(document, rank)| QueryResult { document, rank })
            .collect();
        results.sort_by(|a, b| a.rank.cmp(&b.rank).then_with(|| a.document.cmp(&b.document)));
        Ok(results)
    }

    /// Hit set for one word: resolved document path -> occurrence count,
    /// summed over every shard that knows the word.
    fn word_hits(&self, word: &str) -> Result<BTreeMap<String, u64>> {
        let mut hits: BTreeMap<String, u64> = BTreeMap::new();
        for shard in &self.shards {
            let Some(postings) = shard.lookup_word(word) else {
                continue;
            };
            for (&doc_id, positions) in postings {
                let path = shard.resolve_doc_id(doc_id).ok_or_else(|| {
                    SearchError::ShardCorrupt {
                        shard: shard.root().to_path_buf(),
                        reason: format!("posting references unknown document id {doc_id}"),
                    }
                })?;
                *hits.entry(path.to_string()).or_insert(0) += positions.len() as u64;
            }
        }
        Ok(hits)
    }
}
