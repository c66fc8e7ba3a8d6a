//! Post normalizer library.
//!
//! Turns raw post payloads, both short posts and long-form articles, into a
//! single [`PostData`] model with Markdown text, resolved media URLs and a
//! depth-bounded chain of quoted posts.

// Allow raw string hashes for safety - they're harmless and prevent issues if content changes
#![allow(clippy::needless_raw_string_hashes)]

pub mod article;
pub mod client;
pub mod config;
pub mod constants;
pub mod entity;
pub mod error;
pub mod expand;
pub mod id;
pub mod media;
pub mod model;
pub mod normalize;
pub mod output;
pub mod quotes;
pub mod raw;
pub mod render;
pub mod source;

use tracing::debug;

pub use client::ApiClient;
pub use error::{Error, Result, UpstreamKind};
pub use model::{ArticleBlock, ArticleContent, PostData, PostKind};
pub use normalize::normalize;
pub use quotes::resolve_quotes_deep;
pub use source::PostSource;

/// Options for [`get_normalized_post`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Maximum length of the quote chain, counting the embedded quote.
    pub max_quote_depth: usize,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self { max_quote_depth: 5 }
    }
}

/// Fetch a post by ID or URL and normalize it, deepening its quote chain.
///
/// Returns `Ok(None)` when the source has no such post.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for an unusable ID or URL, before the
/// source is consulted. Upstream and payload errors for the requested post
/// itself are returned as is; failures while deepening quotes are not.
pub async fn get_normalized_post<S>(
    source: &S,
    id_or_url: &str,
    options: NormalizeOptions,
) -> Result<Option<PostData>>
where
    S: PostSource + ?Sized,
{
    let id = id::extract_post_id(id_or_url)?;

    let Some(raw) = source.fetch_raw_post(&id).await? else {
        debug!(post_id = %id, "No post found");
        return Ok(None);
    };

    let post = normalize(&raw)?;
    Ok(Some(
        resolve_quotes_deep(post, options.max_quote_depth, source).await,
    ))
}
