//! Ingest papers from a mock search API, index them and answer a question.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{fast_retry, no_rate_limit, paper_json, search_page, HashingEmbedder};
use mockito::{Matcher, Server};
use scholar_rag::domain::models::SemanticScholarConfig;
use scholar_rag::infrastructure::cache::PaperCache;
use scholar_rag::infrastructure::chunking::SentenceWindowChunker;
use scholar_rag::infrastructure::ollama::OllamaClient;
use scholar_rag::infrastructure::scholar::SemanticScholarClient;
use scholar_rag::services::{IndexOrigin, IngestionService, IngestionSettings};
use scholar_rag::{ResearchAgent, Retriever};
use serde_json::json;
use tempfile::TempDir;

const SEARCH_PATH: &str = "/graph/v1/paper/search";

fn corpus() -> Vec<serde_json::Value> {
    vec![
        paper_json(
            "graph",
            Some("Graph neural networks learn program structure. They detect bugs in source code."),
        ),
        paper_json("empty", None),
        paper_json(
            "fuzz",
            Some("Fuzzing generates random inputs. Coverage feedback guides the fuzzer."),
        ),
        paper_json(
            "review",
            Some("Code review comments are mined at scale. Reviewers prefer short patches."),
        ),
    ]
}

fn ingestion(server: &Server, temp_dir: &TempDir) -> IngestionService {
    let config = SemanticScholarConfig {
        api_url: format!("{}{SEARCH_PATH}", server.url()),
        page_size: 10,
        ..SemanticScholarConfig::default()
    };
    let source = SemanticScholarClient::new(&config, no_rate_limit(), fast_retry()).unwrap();

    IngestionService::new(
        Arc::new(source),
        Arc::new(PaperCache::new(temp_dir.path().join("papers.json"))),
        Arc::new(SentenceWindowChunker::new(8, 0)),
        Arc::new(HashingEmbedder),
        IngestionSettings {
            query: "program analysis".to_string(),
            limit: 10,
            embedding_batch_size: 2,
            index_path: Some(temp_dir.path().join("index.json")),
        },
    )
}

#[tokio::test]
async fn test_ingest_once_then_reuse_and_answer() {
    let temp_dir = TempDir::new().unwrap();
    let mut server = Server::new_async().await;

    let search = server
        .mock("GET", SEARCH_PATH)
        .match_query(Matcher::UrlEncoded("query".into(), "program analysis".into()))
        .with_status(200)
        .with_body(search_page(0, None, corpus()))
        .expect(1)
        .create_async()
        .await;

    let service = ingestion(&server, &temp_dir);
    let built = service.prepare_index(false).await.unwrap();
    assert_eq!(built.origin, IndexOrigin::Built);
    // one chunk per sentence with an 8 word window
    assert_eq!(built.index.len(), 6);
    assert!(temp_dir.path().join("papers.json").exists());

    let reused = service.prepare_index(false).await.unwrap();
    assert_eq!(reused.origin, IndexOrigin::Reused);
    assert_eq!(reused.index.chunks(), built.index.chunks());
    search.assert_async().await;

    let retriever = Arc::new(Retriever::new(
        Arc::new(reused.index),
        Arc::new(HashingEmbedder),
        1,
    ));
    let hits = retriever
        .retrieve_chunks("which networks detect bugs in source code", Some(2))
        .await
        .unwrap();
    assert_eq!(hits[0].text, "They detect bugs in source code.");
    assert!(hits[0].distance <= hits[1].distance);

    let generate = server
        .mock("POST", "/api/generate")
        .match_body(Matcher::PartialJson(json!({
            "prompt": "Use the following context to answer the query:\nThey detect bugs in source code.\n\nQuery: which networks detect bugs in source code\nAnswer:"
        })))
        .with_status(200)
        .with_body(json!({"response": "Graph neural networks.", "done": true}).to_string())
        .expect(1)
        .create_async()
        .await;

    let model = OllamaClient::new(&server.url(), "llama3.2:latest", Duration::from_secs(5), fast_retry())
        .unwrap();
    let agent = ResearchAgent::new(retriever, Arc::new(model), Duration::from_secs(5));

    let answer = agent
        .answer("which networks detect bugs in source code")
        .await
        .unwrap();
    assert_eq!(answer, "Graph neural networks.");
    generate.assert_async().await;
}
