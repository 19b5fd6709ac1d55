//! Pagination and batching helpers over the source traits.

use tracing::debug;

use super::error::{ErrorContext, SourceError, SourceResult};
use super::source::{UploadEntry, VideoDetailProvider, VideoListProvider, MAX_DETAIL_BATCH};
use crate::models::{VideoId, VideoMeta};

/// Collect up to `limit` uploads, following page tokens until the limit is
/// reached or the playlist is exhausted.
pub async fn collect_uploads<S: VideoListProvider + ?Sized>(
    source: &S,
    playlist_id: &str,
    limit: usize,
    page_size: usize,
) -> SourceResult<Vec<UploadEntry>> {
    if page_size == 0 {
        return Err(SourceError::configuration("page size must be positive"));
    }

    let mut entries: Vec<UploadEntry> = Vec::with_capacity(limit);
    let mut page_token: Option<String> = None;

    while entries.len() < limit {
        let remaining = limit - entries.len();
        let page = source
            .fetch_upload_page(playlist_id, page_token.as_deref(), remaining.min(page_size))
            .await?;
        debug!(
            playlist_id,
            received = page.entries.len(),
            has_next = page.next_page_token.is_some(),
            "Fetched uploads page"
        );

        entries.extend(page.entries.into_iter().take(remaining));

        match page.next_page_token {
            Some(token) if page_token.as_deref() == Some(token.as_str()) => {
                return Err(SourceError::malformed_with_context(
                    "page token did not advance",
                    ErrorContext::new("collect_uploads")
                        .with_entity("playlist")
                        .with_entity_id(playlist_id),
                ));
            }
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    Ok(entries)
}

/// Fetch details for `ids` in batches of [`MAX_DETAIL_BATCH`], preserving
/// the order of `ids` and skipping ids the source does not know.
pub async fn fetch_video_metas<S: VideoDetailProvider + ?Sized>(
    source: &S,
    ids: &[VideoId],
) -> SourceResult<Vec<VideoMeta>> {
    let mut metas = Vec::with_capacity(ids.len());
    for batch in ids.chunks(MAX_DETAIL_BATCH) {
        let mut details = source.fetch_video_details(batch).await?;
        // Reorder to match the request; the API makes no ordering promise.
        for id in batch {
            if let Some(pos) = details.iter().position(|d| &d.video_id == id) {
                metas.push(details.swap_remove(pos).into_meta());
            }
        }
    }
    Ok(metas)
}
