use crate::{AssetKind, HistoryItemBuilder, ModelError};

use chrono::{TimeZone, Utc};

fn complete_builder() -> HistoryItemBuilder {
    HistoryItemBuilder::default()
        .with_id("6f1c2a7e-0000-4000-8000-000000000001")
        .with_kind(AssetKind::Logo)
        .with_artifact_ref("/tmp/artifacts/generated-logo-1.png")
        .with_prompt("minimalist fox")
        .with_created_at(Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap())
}

/// **VALUE**: Verifies the builder produces an item when every field is present.
///
/// **WHY THIS MATTERS**: Every successful job goes through this builder before it reaches
/// history. A regression here silently drops every completed job from history.
///
/// **BUG THIS CATCHES**: Would catch field assignments being swapped or valid data rejected.
#[test]
fn given_all_valid_fields_when_building_then_returns_history_item() {
    // GIVEN: A fully populated builder
    let builder = complete_builder();

    // WHEN: Building
    let item = builder.build().unwrap();

    // THEN: All fields are carried over
    assert_eq!(item.id(), "6f1c2a7e-0000-4000-8000-000000000001");
    assert_eq!(item.kind(), AssetKind::Logo);
    assert_eq!(item.prompt(), "minimalist fox");
    assert_eq!(item.artifact_ref(), "/tmp/artifacts/generated-logo-1.png");
}

/// **VALUE**: Verifies that a missing id is rejected.
///
/// **BUG THIS CATCHES**: Items without ids would collide in the persisted list.
#[test]
fn given_missing_id_when_building_then_returns_validation_error() {
    let builder = HistoryItemBuilder::default()
        .with_kind(AssetKind::Logo)
        .with_artifact_ref("/tmp/a.png")
        .with_prompt("fox")
        .with_created_at(Utc::now());

    match builder.build().unwrap_err() {
        ModelError::Validation { message, .. } => assert_eq!(message, "History id is required"),
    }
}

#[test]
fn given_blank_prompt_when_building_then_returns_validation_error() {
    let result = complete_builder().with_prompt("   ").build();

    match result.unwrap_err() {
        ModelError::Validation { message, .. } => assert_eq!(message, "Prompt cannot be empty"),
    }
}

#[test]
fn given_missing_kind_when_building_then_returns_validation_error() {
    let builder = HistoryItemBuilder::default()
        .with_id("1")
        .with_artifact_ref("/tmp/a.png")
        .with_prompt("fox")
        .with_created_at(Utc::now());

    assert_eq!(
        builder.build().unwrap_err().message(),
        "Asset kind is required"
    );
}

#[test]
fn given_missing_created_at_when_building_then_returns_validation_error() {
    let builder = HistoryItemBuilder::default()
        .with_id("1")
        .with_kind(AssetKind::Banner)
        .with_artifact_ref("/tmp/a.png")
        .with_prompt("fox");

    assert_eq!(
        builder.build().unwrap_err().message(),
        "Creation time is required"
    );
}

/// **VALUE**: The persisted JSON uses the established field names (`type`, `artifactRef`,
/// `createdAt`).
///
/// **WHY THIS MATTERS**: History is read back from disk on every start. Renaming a field
/// without a migration makes every existing history file unreadable.
#[test]
fn given_history_item_when_serialized_then_uses_camel_case_and_type_field() {
    let item = complete_builder().build().unwrap();

    let json = serde_json::to_value(&item).unwrap();

    assert_eq!(json["type"], "Logo");
    assert_eq!(json["prompt"], "minimalist fox");
    assert!(json.get("artifactRef").is_some());
    assert!(json.get("createdAt").is_some());
}

#[test]
fn given_video_item_when_download_name_requested_then_uses_artifact_extension() {
    let item = complete_builder()
        .with_id("abc")
        .with_kind(AssetKind::Intro)
        .with_artifact_ref("/data/generated-intro-abc.mp4")
        .build()
        .unwrap();

    assert_eq!(item.download_file_name(), "generated-intro-abc.mp4");
}

#[test]
fn given_artifact_without_extension_when_download_name_requested_then_falls_back_to_kind() {
    let item = complete_builder()
        .with_id("abc")
        .with_kind(AssetKind::About)
        .with_artifact_ref("/data/about-output")
        .build()
        .unwrap();

    assert_eq!(item.download_file_name(), "generated-about-abc.txt");
}
