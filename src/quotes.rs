use tracing::{debug, warn};

use crate::model::PostData;
use crate::normalize::normalize;
use crate::source::PostSource;

/// Deepen the quote chain of `post` by re-fetching each quoted post.
///
/// Embedded quotes only carry shallow data, so each level is fetched again
/// by its own ID and normalized, up to `max_depth - 1` fetches. The first
/// level that cannot be fetched or normalized stops the descent; everything
/// resolved above it is kept. A `max_depth` of 0 or 1 returns `post` as is.
pub async fn resolve_quotes_deep<S>(post: PostData, max_depth: usize, source: &S) -> PostData
where
    S: PostSource + ?Sized,
{
    if max_depth <= 1 {
        return post;
    }

    let mut current = post;
    let mut ancestors: Vec<PostData> = Vec::new();

    for level in 1..max_depth {
        let Some(shallow) = current.quoted_post.take() else {
            break;
        };

        match fetch_level(source, &shallow.id, level).await {
            Some(resolved) => {
                ancestors.push(current);
                current = resolved;
            }
            None => {
                current.quoted_post = Some(shallow);
                break;
            }
        }
    }

    while let Some(mut parent) = ancestors.pop() {
        parent.quoted_post = Some(Box::new(current));
        current = parent;
    }

    current
}

async fn fetch_level<S>(source: &S, id: &str, level: usize) -> Option<PostData>
where
    S: PostSource + ?Sized,
{
    let raw = match source.fetch_raw_post(id).await {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!(level, post_id = %id, "Quoted post not found, keeping embedded copy");
            return None;
        }
        Err(e) => {
            warn!(level, post_id = %id, error = %e, "Failed to fetch quoted post");
            return None;
        }
    };

    match normalize(&raw) {
        Ok(post) => Some(post),
        Err(e) => {
            warn!(level, post_id = %id, error = %e, "Failed to normalize quoted post");
            None
        }
    }
}
