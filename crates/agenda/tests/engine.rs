//! End-to-end engine scenarios over in-memory fakes: ingest a small
//! feed, then search it with structured criteria.

mod common;

use std::sync::Arc;

use serde_json::json;

use agenda::{
    CatalogIngestor, DateRange, EngineError, EventStore, FilterCriteria, SearchEngine,
};
use chrono::{TimeZone, Utc};
use common::{raw_record, BagOfWordsEmbedder, InMemoryEventStore, StaticFeed};

type Engine = SearchEngine<InMemoryEventStore, BagOfWordsEmbedder>;

/// Three events: a free jazz night in Centro, a paid jazz festival in
/// Salamanca, and a paid painting exhibit in Centro.
fn catalog() -> Vec<Vec<agenda::RawEventRecord>> {
    vec![vec![
        raw_record(json!({
            "id": "a",
            "title": "Jazz night",
            "description": "An evening of live jazz",
            "district": "Centro",
            "venue": "Café Central",
            "type": "music",
            "free": 1,
            "start_date": "2026-09-12 21:00:00.0",
            "updated": "2026-09-01",
        })),
        raw_record(json!({
            "id": "b",
            "title": "Jazz festival",
            "description": "Three days of jazz concerts",
            "district": "Salamanca",
            "venue": "Auditorio",
            "type": "music",
            "price": 15,
            "start_date": "2026-09-18 18:00:00.0",
            "end_date": "2026-09-20 23:00:00.0",
            "updated": "2026-09-01",
        })),
        raw_record(json!({
            "id": "c",
            "title": "Painting exhibit",
            "description": "Contemporary painting collection",
            "district": "Centro",
            "venue": "Sala de exposiciones",
            "type": "painting",
            "price": 20,
            "start_date": "2026-09-10 10:00:00.0",
            "end_date": "2026-10-10 20:00:00.0",
            "updated": "2026-09-01",
        })),
    ]]
}

async fn populated_engine() -> (Arc<InMemoryEventStore>, Engine) {
    let store = Arc::new(InMemoryEventStore::default());
    let embedder = Arc::new(BagOfWordsEmbedder::default());
    let ingestor = CatalogIngestor::new(
        store.clone(),
        embedder.clone(),
        Arc::new(StaticFeed { pages: catalog() }),
    );
    let report = ingestor.ingest().await.unwrap();
    assert_eq!(report.ingested, 3);
    (store.clone(), SearchEngine::new(store, embedder))
}

#[tokio::test]
async fn test_jazz_in_centro_returns_only_the_jazz_night() {
    let (_, engine) = populated_engine().await;
    let criteria = FilterCriteria {
        districts: vec!["Centro".to_string()],
        ..Default::default()
    };

    let results = engine.search("jazz", &criteria, 5).await.unwrap();

    // B is excluded by district, C by topical mismatch.
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].event.id, "a");
    assert_eq!(results[0].rank, 1);
    assert!(results[0].similarity > 0.0);
}

#[tokio::test]
async fn test_music_under_ten_euros_returns_only_the_free_event() {
    let (_, engine) = populated_engine().await;
    let criteria = FilterCriteria {
        price_max: Some(10.0),
        ..Default::default()
    };

    let results = engine.search("music", &criteria, 5).await.unwrap();

    // B exceeds the price bound, C is both off-topic and too expensive.
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].event.id, "a");
}

#[tokio::test]
async fn test_unfiltered_search_ranks_by_similarity() {
    let (_, engine) = populated_engine().await;

    let results = engine
        .search("jazz concerts", &FilterCriteria::default(), 5)
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    for pair in results.windows(2) {
        assert!(pair[0].similarity >= pair[1].similarity);
    }
    let ids: Vec<&str> = results.iter().map(|r| r.event.id.as_str()).collect();
    assert!(ids.contains(&"a"));
    assert!(ids.contains(&"b"));
}

#[tokio::test]
async fn test_search_is_deterministic() {
    let (_, engine) = populated_engine().await;

    let first = engine.search("jazz", &FilterCriteria::default(), 5).await.unwrap();
    let second = engine.search("jazz", &FilterCriteria::default(), 5).await.unwrap();

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.event.id, b.event.id);
        assert_eq!(a.similarity, b.similarity);
        assert_eq!(a.rank, b.rank);
    }
}

#[tokio::test]
async fn test_every_result_satisfies_the_filter() {
    let (_, engine) = populated_engine().await;

    let criteria_variants = vec![
        FilterCriteria::default(),
        FilterCriteria {
            districts: vec!["Centro".to_string()],
            ..Default::default()
        },
        FilterCriteria {
            event_types: vec!["music".to_string()],
            price_max: Some(15.0),
            ..Default::default()
        },
        FilterCriteria {
            venue_contains: Some("café".to_string()),
            ..Default::default()
        },
        FilterCriteria {
            date_range: Some(DateRange::new(
                Utc.with_ymd_and_hms(2026, 9, 15, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2026, 9, 30, 0, 0, 0).unwrap(),
            )),
            ..Default::default()
        },
    ];

    for criteria in criteria_variants {
        let filter = agenda::FilterCompiler::compile(&criteria).unwrap();
        for query in ["jazz", "music", "painting collection", "evening concerts"] {
            let results = engine.search(query, &criteria, 10).await.unwrap();
            for result in &results {
                assert!(
                    filter.matches(&result.event),
                    "result {} violates filter {criteria:?}",
                    result.event.id
                );
            }
        }
    }
}

#[tokio::test]
async fn test_date_range_excludes_non_intersecting_events() {
    let (_, engine) = populated_engine().await;
    // Only the festival (18th..20th) intersects this window.
    let criteria = FilterCriteria {
        date_range: Some(DateRange::new(
            Utc.with_ymd_and_hms(2026, 9, 19, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 9, 25, 0, 0, 0).unwrap(),
        )),
        ..Default::default()
    };

    let results = engine.search("jazz", &criteria, 5).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].event.id, "b");
}

#[tokio::test]
async fn test_boundary_arguments_are_rejected() {
    let (_, engine) = populated_engine().await;

    assert!(matches!(
        engine.search("", &FilterCriteria::default(), 5).await,
        Err(EngineError::InvalidArgument(_))
    ));
    assert!(matches!(
        engine.search("jazz concert", &FilterCriteria::default(), 0).await,
        Err(EngineError::InvalidArgument(_))
    ));
}

#[tokio::test]
async fn test_reingestion_mirrors_the_feed_exactly() {
    let store = Arc::new(InMemoryEventStore::default());
    let embedder = Arc::new(BagOfWordsEmbedder::default());

    let first = CatalogIngestor::new(
        store.clone(),
        embedder.clone(),
        Arc::new(StaticFeed { pages: catalog() }),
    );
    first.ingest().await.unwrap();
    assert_eq!(store.count().await.unwrap(), 3);

    // Unchanged feed: nothing re-embedded, nothing deleted.
    let again = first.ingest().await.unwrap();
    assert_eq!(again.ingested, 0);
    assert_eq!(again.unchanged, 3);
    assert_eq!(store.count().await.unwrap(), 3);

    // The festival drops out of the feed: the store must follow.
    let mut shrunk = catalog();
    shrunk[0].retain(|r| r.text("id").as_deref() != Some("b"));
    let second = CatalogIngestor::new(
        store.clone(),
        embedder.clone(),
        Arc::new(StaticFeed { pages: shrunk }),
    );
    let report = second.ingest().await.unwrap();
    assert_eq!(report.deleted, 1);

    let index = store.index().await.unwrap();
    assert_eq!(index.len(), 2);
    assert!(index.contains_key("a"));
    assert!(index.contains_key("c"));
}
