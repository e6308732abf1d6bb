use crate::{AssetKind, HistoryItem};

use serde_json::json;

/// **VALUE**: Persisted items load back through the builder.
///
/// **BUG THIS CATCHES**: Would catch the on-disk field names drifting from
/// the serialized ones.
#[test]
fn given_valid_record_when_deserialized_then_item_loaded() {
    let record = json!({
        "id": "abc",
        "type": "Banner",
        "artifactRef": "/data/artifacts/generated-banner-abc.png",
        "prompt": "retro arcade",
        "createdAt": "2026-10-17T12:00:00Z"
    });

    let item: HistoryItem = serde_json::from_value(record).unwrap();

    assert_eq!(item.id(), "abc");
    assert_eq!(item.kind(), AssetKind::Banner);
    assert_eq!(item.prompt(), "retro arcade");
}

/// **VALUE**: A hand-edited record with a blank field is rejected on load.
///
/// **WHY THIS MATTERS**: Items are only ever built through validation; a
/// file on disk must not be a way around it.
///
/// **BUG THIS CATCHES**: Would catch a plain derived `Deserialize` accepting
/// an empty id or prompt.
#[test]
fn given_blank_id_or_prompt_when_deserialized_then_error_names_field() {
    let blank_id = json!({
        "id": "",
        "type": "Logo",
        "artifactRef": "/data/a.png",
        "prompt": "fox",
        "createdAt": "2026-10-17T12:00:00Z"
    });
    let blank_prompt = json!({
        "id": "abc",
        "type": "Logo",
        "artifactRef": "/data/a.png",
        "prompt": "  ",
        "createdAt": "2026-10-17T12:00:00Z"
    });

    let id_error = serde_json::from_value::<HistoryItem>(blank_id).unwrap_err();
    let prompt_error = serde_json::from_value::<HistoryItem>(blank_prompt).unwrap_err();

    assert!(id_error.to_string().contains("History id cannot be empty"));
    assert!(prompt_error.to_string().contains("Prompt cannot be empty"));
}
