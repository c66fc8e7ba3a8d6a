use async_trait::async_trait;

use crate::error::Result;
use crate::raw::RawPost;

/// Something that can look up raw posts by ID.
#[async_trait]
pub trait PostSource: Send + Sync {
    /// Fetch the raw payload of a post.
    ///
    /// Returns `Ok(None)` when the upstream has no post with this ID.
    async fn fetch_raw_post(&self, id: &str) -> Result<Option<RawPost>>;
}
