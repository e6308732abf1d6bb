//! History store persistence and capacity tests.

use studio_core::error::HistoryError;
use studio_core::history::{HISTORY_FILE_NAME, HistoryStore};

use models::{AssetKind, HistoryItem, HistoryItemBuilder};

use chrono::{TimeZone, Utc};
use tempfile::TempDir;

fn item(id: &str) -> HistoryItem {
    HistoryItemBuilder::default()
        .with_id(id)
        .with_kind(AssetKind::Logo)
        .with_artifact_ref(format!("/tmp/artifacts/{id}.png"))
        .with_prompt(format!("prompt {id}"))
        .with_created_at(Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap())
        .build()
        .unwrap()
}

fn ids(items: &[HistoryItem]) -> Vec<&str> {
    items.iter().map(HistoryItem::id).collect()
}

/// **VALUE**: The list never grows beyond its capacity and drops the oldest.
///
/// **BUG THIS CATCHES**: Would catch eviction from the wrong end, which
/// would throw away the newest generations.
#[tokio::test]
async fn given_full_store_when_item_appended_then_oldest_evicted() {
    // GIVEN
    let dir = TempDir::new().unwrap();
    let store = HistoryStore::open(dir.path(), 3).await.unwrap();
    for id in ["a", "b", "c"] {
        store.append(item(id)).await.unwrap();
    }

    // WHEN
    store.append(item("d")).await.unwrap();

    // THEN
    let items = store.list().await;
    assert_eq!(ids(&items), vec!["d", "c", "b"]);
    assert_eq!(store.len().await, 3);
}

/// **VALUE**: History survives a restart.
///
/// **WHY THIS MATTERS**: Users come back to download earlier assets.
///
/// **BUG THIS CATCHES**: Would catch the mirror being updated without the
/// file, or the order being reversed on reload.
#[tokio::test]
async fn given_appended_items_when_store_reopened_then_same_items_in_same_order() {
    // GIVEN
    let dir = TempDir::new().unwrap();
    {
        let store = HistoryStore::open(dir.path(), 10).await.unwrap();
        store.append(item("first")).await.unwrap();
        store.append(item("second")).await.unwrap();
    }

    // WHEN
    let reopened = HistoryStore::open(dir.path(), 10).await.unwrap();

    // THEN
    let items = reopened.list().await;
    assert_eq!(ids(&items), vec!["second", "first"]);
    assert_eq!(items[0], item("second"));
}

#[tokio::test]
async fn given_file_larger_than_capacity_when_opened_then_trimmed_to_newest() {
    // GIVEN
    let dir = TempDir::new().unwrap();
    {
        let store = HistoryStore::open(dir.path(), 10).await.unwrap();
        for id in ["a", "b", "c", "d"] {
            store.append(item(id)).await.unwrap();
        }
    }

    // WHEN
    let smaller = HistoryStore::open(dir.path(), 2).await.unwrap();

    // THEN
    assert_eq!(ids(&smaller.list().await), vec!["d", "c"]);
}

#[tokio::test]
async fn given_same_id_appended_twice_when_listed_then_single_entry_at_front() {
    // GIVEN
    let dir = TempDir::new().unwrap();
    let store = HistoryStore::open(dir.path(), 10).await.unwrap();
    store.append(item("a")).await.unwrap();
    store.append(item("b")).await.unwrap();

    // WHEN
    store.append(item("a")).await.unwrap();

    // THEN
    assert_eq!(ids(&store.list().await), vec!["a", "b"]);
}

/// **VALUE**: Concurrent appends are never lost.
///
/// **BUG THIS CATCHES**: Would catch a read-modify-write race where two
/// writers start from the same list and one overwrites the other.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn given_concurrent_appends_when_all_done_then_every_item_present_on_disk() {
    // GIVEN
    let dir = TempDir::new().unwrap();
    let store = HistoryStore::open(dir.path(), 100).await.unwrap();

    // WHEN
    let tasks: Vec<_> = (0..20)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move { store.append(item(&format!("job-{i}"))).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    // THEN
    assert_eq!(store.len().await, 20);
    let reopened = HistoryStore::open(dir.path(), 100).await.unwrap();
    assert_eq!(reopened.len().await, 20);
}

#[tokio::test]
async fn given_corrupt_file_when_opened_then_parse_error_and_file_untouched() {
    // GIVEN
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(HISTORY_FILE_NAME);
    std::fs::write(&path, "{ not json").unwrap();

    // WHEN
    let result = HistoryStore::open(dir.path(), 10).await;

    // THEN
    assert!(matches!(result, Err(HistoryError::Parse { .. })));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
}

#[tokio::test]
async fn given_hand_edited_item_with_blank_prompt_when_opened_then_parse_error() {
    // GIVEN
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(HISTORY_FILE_NAME),
        r#"{ "version": 1, "items": [{
            "id": "abc",
            "type": "Logo",
            "artifactRef": "/tmp/artifacts/abc.png",
            "prompt": "",
            "createdAt": "2026-03-01T12:00:00Z"
        }] }"#,
    )
    .unwrap();

    // WHEN
    let result = HistoryStore::open(dir.path(), 10).await;

    // THEN
    let Err(HistoryError::Parse { reason, .. }) = result else {
        panic!("expected parse error");
    };
    assert!(reason.contains("Prompt cannot be empty"), "reason was {reason}");
}

#[tokio::test]
async fn given_unknown_version_when_opened_then_parse_error() {
    // GIVEN
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(HISTORY_FILE_NAME),
        r#"{ "version": 99, "items": [] }"#,
    )
    .unwrap();

    // WHEN
    let result = HistoryStore::open(dir.path(), 10).await;

    // THEN
    assert!(matches!(result, Err(HistoryError::Parse { .. })));
}

#[tokio::test]
async fn given_missing_directory_when_first_item_appended_then_file_created() {
    // GIVEN
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("data").join("studio");
    let store = HistoryStore::open(&nested, 10).await.unwrap();
    assert!(store.is_empty().await);

    // WHEN
    store.append(item("a")).await.unwrap();

    // THEN
    let raw = std::fs::read_to_string(nested.join(HISTORY_FILE_NAME)).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["version"], 1);
    assert_eq!(json["items"][0]["id"], "a");
    assert_eq!(json["items"][0]["type"], "Logo");
    assert!(json["items"][0]["artifactRef"].is_string());
    assert!(json["items"][0]["createdAt"].is_string());
}

#[tokio::test]
async fn given_items_when_cleared_then_empty_now_and_after_reopen() {
    // GIVEN
    let dir = TempDir::new().unwrap();
    let store = HistoryStore::open(dir.path(), 10).await.unwrap();
    store.append(item("a")).await.unwrap();
    store.append(item("b")).await.unwrap();

    // WHEN
    store.clear().await.unwrap();

    // THEN
    assert!(store.list().await.is_empty());
    let reopened = HistoryStore::open(dir.path(), 10).await.unwrap();
    assert!(reopened.is_empty().await);
}

#[tokio::test]
async fn given_zero_capacity_when_opened_then_keeps_one_item() {
    // GIVEN
    let dir = TempDir::new().unwrap();
    let store = HistoryStore::open(dir.path(), 0).await.unwrap();

    // WHEN
    store.append(item("a")).await.unwrap();
    store.append(item("b")).await.unwrap();

    // THEN
    assert_eq!(store.capacity(), 1);
    assert_eq!(ids(&store.list().await), vec!["b"]);
}
