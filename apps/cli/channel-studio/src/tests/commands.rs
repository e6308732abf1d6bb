use crate::cli::{GenerateArgs, KindArg};
use crate::commands::generate::{build_request, image_mime_type};
use crate::commands::history::{format_item, is_confirmation};

use models::{
    AspectRatio, AssetKind, BANNER_SIZE, GenerationPayload, HistoryItemBuilder, ReferenceImage,
};

use std::path::Path;

use chrono::{TimeZone, Utc};

fn args(kind: KindArg, prompt: &str) -> GenerateArgs {
    GenerateArgs {
        kind,
        prompt: prompt.to_string(),
        label: None,
        image: None,
        width: None,
        height: None,
    }
}

fn png() -> ReferenceImage {
    ReferenceImage::new(vec![0x89, b'P', b'N', b'G'], "image/png")
}

#[test]
fn given_thumbnail_args_with_image_when_built_then_reference_attached_and_valid() {
    // GIVEN
    let args = args(KindArg::Thumbnail, "bold title");

    // WHEN
    let request = build_request(&args, Some(png()));

    // THEN
    assert_eq!(request.kind(), AssetKind::Thumbnail);
    assert_eq!(request.payload().reference(), Some(&png()));
    assert!(request.validate().is_ok());
}

#[test]
fn given_intro_args_without_image_when_built_then_request_fails_validation() {
    let request = build_request(&args(KindArg::Intro, "Fox Studio"), None);

    assert!(request.validate().is_err());
}

/// **VALUE**: Custom sizes reach banner requests.
///
/// **BUG THIS CATCHES**: Would catch `--width/--height` being parsed but
/// never applied.
#[test]
fn given_banner_with_custom_size_when_built_then_size_overrides_default() {
    // GIVEN
    let mut args = args(KindArg::Banner, "retro arcade");
    args.width = Some(2048);
    args.height = Some(1152);

    // WHEN
    let request = build_request(&args, None);

    // THEN
    let GenerationPayload::Banner { size, .. } = request.payload() else {
        panic!("expected banner");
    };
    assert_eq!((size.width, size.height), (2048, 1152));
    assert_eq!(size.aspect_ratio, AspectRatio::Widescreen);
    assert_ne!(*size, BANNER_SIZE);
}

#[test]
fn given_label_when_built_then_history_label_uses_it() {
    let mut args = args(KindArg::Description, "unboxing the new console");
    args.label = Some("Unboxing video".to_string());

    let request = build_request(&args, None);

    assert_eq!(request.history_label(), "Unboxing video");
}

#[test]
fn given_image_paths_when_mime_resolved_then_known_formats_accepted() {
    assert_eq!(image_mime_type(Path::new("a.png")).unwrap(), "image/png");
    assert_eq!(image_mime_type(Path::new("a.JPG")).unwrap(), "image/jpeg");
    assert_eq!(image_mime_type(Path::new("a.jpeg")).unwrap(), "image/jpeg");
    assert_eq!(image_mime_type(Path::new("a.webp")).unwrap(), "image/webp");
    assert!(image_mime_type(Path::new("a.gif")).is_err());
    assert!(image_mime_type(Path::new("noextension")).is_err());
}

#[test]
fn given_answers_when_checked_then_only_yes_confirms() {
    assert!(is_confirmation("y\n"));
    assert!(is_confirmation(" YES "));
    assert!(!is_confirmation("\n"));
    assert!(!is_confirmation("n"));
    assert!(!is_confirmation("yep"));
}

#[test]
fn given_history_item_when_formatted_then_one_line_with_kind_prompt_and_file() {
    // GIVEN
    let item = HistoryItemBuilder::default()
        .with_id("job-1")
        .with_kind(AssetKind::Logo)
        .with_artifact_ref("/data/artifacts/logo-job-1.png")
        .with_prompt("Fox logo")
        .with_created_at(Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).unwrap())
        .build()
        .unwrap();

    // WHEN
    let line = format_item(&item);

    // THEN
    assert!(line.starts_with("2026-03-01 12:30"));
    assert!(line.contains("Logo"));
    assert!(line.contains("Fox logo"));
    assert!(line.ends_with("/data/artifacts/logo-job-1.png"));
    assert!(!line.contains('\n'));
}
