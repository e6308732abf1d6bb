use crate::cli::{GenerateArgs, KindArg};
use crate::error::CliError;
use crate::state::AppState;

use models::{AspectRatio, AssetSize, GenerationRequest, JobPhase, ReferenceImage};
use studio_core::orchestrator::JobOutcome;

use std::path::Path;

use log::{debug, info, warn};
use tokio::signal;

/// Submit one request, print progress labels until it settles, and report
/// the stored file (and the text, for text kinds).
///
/// Ctrl-C cancels the running job; the command then returns `Ok`.
pub async fn run(state: &AppState, args: &GenerateArgs) -> Result<(), CliError> {
    let reference = match &args.image {
        Some(path) => Some(read_reference(path).await?),
        None => None,
    };
    let request = build_request(args, reference);

    let handle = state
        .studio()
        .submit_request(request)
        .map_err(|e| CliError::generation(&e))?;
    info!("Submitted job {} ({})", handle.id(), handle.snapshot().kind);

    let mut updates = handle.subscribe();
    let mut shown: Option<JobPhase> = None;

    loop {
        let snapshot = updates.borrow_and_update().clone();
        if shown != Some(snapshot.phase) {
            eprintln!("{}...", snapshot.phase.label());
            shown = Some(snapshot.phase);
        }
        if snapshot.status.is_terminal() {
            break;
        }

        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = signal::ctrl_c() => {
                info!("Interrupted, cancelling job {}", handle.id());
                if let Err(e) = state.studio().cancel_request(&handle) {
                    debug!("Cancel ignored: {e}");
                }
            }
        }
    }

    match handle.wait().await {
        JobOutcome::Succeeded(asset) => {
            if let Some(text) = &asset.text {
                println!("{text}");
                println!();
            }
            println!("Saved {} to {}", asset.kind, asset.stored.path().display());
            Ok(())
        }
        JobOutcome::Failed(error) | JobOutcome::TimedOut(error) => {
            Err(CliError::generation(&error))
        }
        JobOutcome::Cancelled => {
            println!("Cancelled");
            Ok(())
        }
    }
}

/// Turn command-line arguments into a request. Validation happens on submit.
pub fn build_request(args: &GenerateArgs, reference: Option<ReferenceImage>) -> GenerationRequest {
    let mut request = match args.kind {
        KindArg::Logo => GenerationRequest::logo(&args.prompt),
        KindArg::Banner => GenerationRequest::banner(&args.prompt),
        KindArg::Thumbnail => GenerationRequest::thumbnail(&args.prompt, None),
        KindArg::Description => GenerationRequest::description(&args.prompt),
        KindArg::About => GenerationRequest::about(&args.prompt),
        KindArg::Intro => GenerationRequest::intro(&args.prompt, None),
    };

    if let Some(image) = reference {
        if matches!(args.kind, KindArg::Logo | KindArg::Description | KindArg::About) {
            warn!("--image is ignored for {} requests", request.kind());
        }
        request = request.with_reference(image);
    }

    if let (Some(width), Some(height)) = (args.width, args.height) {
        if args.kind != KindArg::Banner {
            warn!("--width/--height only apply to banners");
        }
        request = request.with_size(AssetSize::new(width, height, aspect_ratio(width, height)));
    }

    if let Some(label) = &args.label {
        request = request.with_label(label);
    }

    request
}

fn aspect_ratio(width: u32, height: u32) -> AspectRatio {
    if width == height {
        AspectRatio::Square
    } else {
        AspectRatio::Widescreen
    }
}

/// Mime type for a reference image, from its file extension.
pub fn image_mime_type(path: &Path) -> Result<&'static str, CliError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("png") => Ok("image/png"),
        Some("jpg" | "jpeg") => Ok("image/jpeg"),
        Some("webp") => Ok("image/webp"),
        _ => Err(CliError::input(format!(
            "Unsupported image format: {} (expected png, jpeg or webp)",
            path.display()
        ))),
    }
}

async fn read_reference(path: &Path) -> Result<ReferenceImage, CliError> {
    let mime_type = image_mime_type(path)?;
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| CliError::input(format!("Cannot read {}: {e}", path.display())))?;
    debug!("Loaded reference image {} ({} bytes)", path.display(), bytes.len());

    Ok(ReferenceImage::new(bytes, mime_type))
}
