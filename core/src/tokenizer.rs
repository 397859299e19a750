use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use unicode_normalization::UnicodeNormalization;

use crate::error::Result;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"(?u)\p{L}[\p{L}\p{N}_']*").expect("valid regex");
}

/// Tokenize text into (word, token offset) using NFKC normalization and
/// lowercasing. Offsets count tokens, not bytes.
pub fn tokenize(text: &str) -> Vec<(String, u32)> {
    let normalized = text.nfkc().collect::<String>().to_lowercase();
    WORD.find_iter(&normalized)
        .enumerate()
        .map(|(pos, m)| (m.as_str().to_string(), pos as u32))
        .collect()
}

/// Read and tokenize one file into word -> ordered positions.
///
/// Positions for each word are strictly increasing, since tokens are emitted
/// in document order. Fails if the file is unreadable or not valid UTF-8.
pub fn tokenize_file(path: &Path) -> Result<BTreeMap<String, Vec<u32>>> {
    let text = fs::read_to_string(path)?;
    let mut table: BTreeMap<String, Vec<u32>> = BTreeMap::new();
    for (word, pos) in tokenize(&text) {
        table.entry(word).or_default().push(pos);
    }
    Ok(table)
}

/// Normalize raw query text with the same pipeline used for documents.
///
/// The query engine expects pre-normalized words and never re-normalizes;
/// the shell and the HTTP server both go through here.
pub fn query_terms(input: &str) -> Vec<String> {
    tokenize(input).into_iter().map(|(w, _)| w).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_tokenize() {
        let toks = tokenize("The cat sat.");
        let words: Vec<&str> = toks.iter().map(|(w, _)| w.as_str()).collect();
        assert_eq!(words, vec!["the", "cat", "sat"]);
    }

    #[test]
    fn offsets_count_tokens() {
        let toks = tokenize("one two one");
        assert_eq!(toks[0], ("one".to_string(), 0));
        assert_eq!(toks[1], ("two".to_string(), 1));
        assert_eq!(toks[2], ("one".to_string(), 2));
    }

    #[test]
    fn unicode_is_folded() {
        let toks = tokenize("Café MENU");
        let words: Vec<&str> = toks.iter().map(|(w, _)| w.as_str()).collect();
        assert_eq!(words, vec!["café", "menu"]);
    }

    #[test]
    fn query_terms_match_document_tokens() {
        assert_eq!(query_terms("  The CAT, sat!  "), vec!["the", "cat", "sat"]);
        assert!(query_terms("  \t\n").is_empty());
        assert!(query_terms("123 456").is_empty());
    }
}
