use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use searchcore::tokenizer::tokenize;
use searchcore::{write_shard, IndexBuilder};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tempfile::tempdir;
use tower::ServiceExt;

fn build_tiny_shard(dir: &Path, docs: &[(&str, &str)]) {
    let mut builder = IndexBuilder::new();
    for (path, text) in docs {
        let doc_id = builder.add_document(path).unwrap();
        let mut table: BTreeMap<String, Vec<u32>> = BTreeMap::new();
        for (word, pos) in tokenize(text) {
            table.entry(word).or_default().push(pos);
        }
        for (word, positions) in table {
            builder.add_postings(word, doc_id, positions);
        }
    }
    let (doc_table, index) = builder.freeze();
    write_shard(dir, &doc_table, &index, "2026-01-01T00:00:00Z".into()).unwrap();
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let resp = app
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn health_is_ok() {
    let dir = tempdir().unwrap();
    build_tiny_shard(dir.path(), &[("a.txt", "rust")]);
    let app = server::build_app(&[dir.path().to_path_buf()]).unwrap();

    let resp = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn search_returns_ranked_results() {
    let dir = tempdir().unwrap();
    build_tiny_shard(
        dir.path(),
        &[
            ("docs/intro.txt", "rust is great and rust is fast"),
            ("docs/notes.txt", "learning rust"),
        ],
    );
    let app = server::build_app(&[dir.path().to_path_buf()]).unwrap();

    let (status, json) = get(app, "/search?q=rust").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_hits"], 2);
    let results = json["results"].as_array().unwrap();
    // Best match first: intro.txt has two occurrences.
    assert_eq!(results[0]["document"], "docs/intro.txt");
    assert_eq!(results[0]["rank"], 2);
    assert_eq!(results[1]["document"], "docs/notes.txt");
    assert_eq!(results[1]["rank"], 1);
}

#[tokio::test]
async fn search_is_conjunctive_over_multiple_shards() {
    let dir_a = tempdir().unwrap();
    let dir_b = tempdir().unwrap();
    build_tiny_shard(dir_a.path(), &[("corpus/a.txt", "fish fish")]);
    build_tiny_shard(
        dir_b.path(),
        &[("corpus/a.txt", "fish chips"), ("corpus/b.txt", "chips")],
    );
    let app = server::build_app(&[dir_a.path().to_path_buf(), dir_b.path().to_path_buf()])
        .unwrap();

    // Ranks for "fish" sum across both shards' views of corpus/a.txt.
    let (status, json) = get(app.clone(), "/search?q=fish").await;
    assert_eq!(status, StatusCode::OK);
    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["document"], "corpus/a.txt");
    assert_eq!(results[0]["rank"], 3);

    // Only corpus/a.txt contains both words.
    let (_, json) = get(app.clone(), "/search?q=fish+chips").await;
    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["document"], "corpus/a.txt");
    assert_eq!(results[0]["rank"], 4);

    // A query with an unmatched word is empty, not an error.
    let (status, json) = get(app, "/search?q=fish+zebra").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_hits"], 0);
}

#[tokio::test]
async fn blank_query_returns_empty_results() {
    let dir = tempdir().unwrap();
    build_tiny_shard(dir.path(), &[("a.txt", "rust")]);
    let app = server::build_app(&[dir.path().to_path_buf()]).unwrap();

    let (status, json) = get(app, "/search?q=%20%20").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_hits"], 0);
    assert!(json["results"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn stats_reports_shard_totals() {
    let dir_a = tempdir().unwrap();
    let dir_b = tempdir().unwrap();
    build_tiny_shard(dir_a.path(), &[("a.txt", "one two"), ("b.txt", "two")]);
    build_tiny_shard(dir_b.path(), &[("c.txt", "three")]);
    let app = server::build_app(&[dir_a.path().to_path_buf(), dir_b.path().to_path_buf()])
        .unwrap();

    let (status, json) = get(app, "/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["shards"], 2);
    assert_eq!(json["documents"], 3);
    assert_eq!(json["words"], 3);
}
