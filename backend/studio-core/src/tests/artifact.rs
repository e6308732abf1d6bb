// Unit tests for artifact storage.

use crate::artifact::{ArtifactStore, extension_for};
use crate::remote::Artifact;

use models::{AssetKind, JobId};

use tempfile::TempDir;

#[test]
fn given_known_mime_types_when_mapped_then_matching_extension() {
    assert_eq!(extension_for("image/png", AssetKind::Logo), "png");
    assert_eq!(extension_for("image/jpeg", AssetKind::Banner), "jpg");
    assert_eq!(extension_for("IMAGE/WEBP", AssetKind::Thumbnail), "webp");
    assert_eq!(extension_for("video/mp4", AssetKind::Intro), "mp4");
    assert_eq!(
        extension_for("text/plain; charset=utf-8", AssetKind::About),
        "txt"
    );
}

#[test]
fn given_unknown_mime_type_when_mapped_then_kind_default() {
    assert_eq!(
        extension_for("application/octet-stream", AssetKind::Intro),
        "mp4"
    );
    assert_eq!(extension_for("", AssetKind::Logo), "png");
}

/// **VALUE**: Stored artifacts land at the documented file name.
///
/// **BUG THIS CATCHES**: Would catch a naming change that breaks the
/// `generated-<kind>-<id>.<ext>` convention history relies on.
#[tokio::test]
async fn given_image_artifact_when_stored_then_named_by_kind_and_job() {
    // GIVEN
    let dir = TempDir::new().unwrap();
    let store = ArtifactStore::new(dir.path().join("artifacts"));
    let job_id = JobId::new();
    let artifact = Artifact::Image {
        bytes: vec![0x89, b'P', b'N', b'G'],
        mime_type: "image/png".to_string(),
    };

    // WHEN
    let stored = store
        .store(job_id, AssetKind::Logo, &artifact)
        .await
        .unwrap();

    // THEN
    let expected = dir
        .path()
        .join("artifacts")
        .join(format!("generated-logo-{job_id}.png"));
    assert_eq!(stored.path(), expected);
    assert_eq!(std::fs::read(&expected).unwrap(), artifact.bytes());
    assert_eq!(stored.len(), 4);
    assert_eq!(stored.mime_type(), "image/png");
}

#[tokio::test]
async fn given_text_artifact_when_stored_then_written_as_utf8_txt() {
    let dir = TempDir::new().unwrap();
    let store = ArtifactStore::new(dir.path());

    let stored = store
        .store(
            JobId::new(),
            AssetKind::Description,
            &Artifact::Text("Hello channel".into()),
        )
        .await
        .unwrap();

    assert_eq!(stored.path().extension().unwrap(), "txt");
    assert_eq!(
        std::fs::read_to_string(stored.path()).unwrap(),
        "Hello channel"
    );
}

#[tokio::test]
async fn given_stored_artifact_when_released_twice_then_file_gone_and_no_error() {
    // GIVEN
    let dir = TempDir::new().unwrap();
    let store = ArtifactStore::new(dir.path());
    let stored = store
        .store(
            JobId::new(),
            AssetKind::Intro,
            &Artifact::Video {
                bytes: vec![1, 2, 3],
                mime_type: "video/mp4".into(),
            },
        )
        .await
        .unwrap();

    // WHEN
    store.release(&stored).await.unwrap();
    let second = store.release(&stored).await;

    // THEN
    assert!(!stored.path().exists());
    assert!(second.is_ok());
}

/// **VALUE**: History references are only released inside the store root.
///
/// **BUG THIS CATCHES**: Would catch a hand-edited `artifactRef` in
/// history.json making eviction delete an unrelated file.
#[tokio::test]
async fn given_references_inside_and_outside_root_when_released_then_only_inside_removed() {
    // GIVEN
    let dir = TempDir::new().unwrap();
    let store = ArtifactStore::new(dir.path().join("artifacts"));
    let stored = store
        .store(JobId::new(), AssetKind::About, &Artifact::Text("hi".into()))
        .await
        .unwrap();
    let outside = dir.path().join("notes.txt");
    std::fs::write(&outside, "keep me").unwrap();

    // WHEN
    let released = store.release_reference(&stored.reference()).await.unwrap();
    let skipped = store
        .release_reference(&outside.display().to_string())
        .await
        .unwrap();

    // THEN
    assert!(released);
    assert!(!stored.path().exists());
    assert!(!skipped);
    assert!(outside.exists());
}
