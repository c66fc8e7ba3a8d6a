use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::article::parse_article;
use crate::error::{Error, Result};
use crate::expand::expand_urls;
use crate::media::{extract_media_urls, resolve_article_media};
use crate::model::{ArticleContent, Author, PostData, PostKind, Stats};
use crate::raw::{RawPost, RawTweet, TweetLegacy};
use crate::render::{article_to_markdown, status_url};

/// Format of `legacy.created_at`, e.g. `Tue Mar 21 20:50:14 +0000 2006`.
const CREATED_AT_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Normalize a raw post, including the quoted post embedded in it.
///
/// # Errors
///
/// Returns [`Error::MalformedPayload`] if the post is a tombstone or lacks
/// its ID, author or text. A quoted post that fails to normalize is dropped
/// with a warning instead.
pub fn normalize(raw: &RawPost) -> Result<PostData> {
    let tweet = match raw {
        RawPost::Tweet(tweet) => tweet,
        RawPost::Unavailable { typename, reason } => {
            return Err(Error::malformed(match reason {
                Some(reason) => format!("post is unavailable ({typename}): {reason}"),
                None => format!("post is unavailable ({typename})"),
            }));
        }
        RawPost::Undecodable { typename, error } => {
            return Err(Error::malformed(format!(
                "post could not be decoded ({typename}): {error}"
            )));
        }
    };

    let id = tweet
        .rest_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| Error::malformed("post has no rest_id"))?;
    let author = author(id, tweet)?;
    let legacy = tweet
        .legacy
        .as_ref()
        .ok_or_else(|| Error::malformed(format!("post {id} has no legacy data")))?;

    let (kind, text, article) = match tweet.article() {
        Some(raw_article) => {
            let content: ArticleContent =
                resolve_article_media(&parse_article(raw_article), &raw_article.media_entities);
            (
                PostKind::Article,
                article_to_markdown(&content),
                Some(content),
            )
        }
        None => (PostKind::Standard, standard_text(id, tweet, legacy)?, None),
    };

    let quoted_post = tweet.quoted().and_then(|quoted| match normalize(quoted) {
        Ok(post) => Some(Box::new(post)),
        Err(e) => {
            warn!(post_id = %id, error = %e, "Dropping embedded quoted post");
            None
        }
    });

    debug!(post_id = %id, kind = ?kind, quoted = quoted_post.is_some(), "Normalized post");

    Ok(PostData {
        id: id.to_string(),
        url: status_url(&author.screen_name, id),
        text,
        stats: stats(tweet, legacy),
        media: extract_media_urls(legacy.media()),
        kind,
        created_at: legacy.created_at.as_deref().and_then(parse_created_at),
        lang: legacy.lang.clone(),
        article,
        quoted_post,
        author,
    })
}

fn author(id: &str, tweet: &RawTweet) -> Result<Author> {
    let user = tweet
        .user()
        .ok_or_else(|| Error::malformed(format!("post {id} has no author")))?;
    let screen_name = user
        .screen_name()
        .ok_or_else(|| Error::malformed(format!("author of post {id} has no screen name")))?;

    Ok(Author {
        id: user.rest_id.clone().unwrap_or_default(),
        name: user.name().unwrap_or(screen_name).to_string(),
        screen_name: screen_name.to_string(),
    })
}

/// Text of a standard post. Long-form note text wins over the truncated legacy text.
fn standard_text(id: &str, tweet: &RawTweet, legacy: &TweetLegacy) -> Result<String> {
    if let Some(note) = tweet.note() {
        let text = note.text.as_deref().unwrap_or_default();
        return Ok(expand_urls(text, &note.entity_set.urls, legacy.media()));
    }

    let text = legacy
        .full_text
        .as_deref()
        .ok_or_else(|| Error::malformed(format!("post {id} has no text")))?;
    Ok(expand_urls(text, &legacy.entities.urls, legacy.media()))
}

fn stats(tweet: &RawTweet, legacy: &TweetLegacy) -> Stats {
    Stats {
        likes: legacy.favorite_count,
        reposts: legacy.retweet_count,
        replies: legacy.reply_count,
        quotes: legacy.quote_count,
        bookmarks: legacy.bookmark_count,
        views: tweet
            .views
            .as_ref()
            .and_then(|v| v.count.as_deref())
            .and_then(|c| c.parse().ok()),
    }
}

fn parse_created_at(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(value, CREATED_AT_FORMAT)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}
