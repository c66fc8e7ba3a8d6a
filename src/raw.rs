//! Raw post payloads as returned by the GraphQL `TweetResultByRestId` endpoint.
//!
//! Almost every field is optional: the API drops fields freely depending on
//! the post, the viewer and the feature flags sent with the request. Checks
//! for what a post *must* carry live in [`crate::normalize`].

use serde::Deserialize;

use crate::entity::{optional_id, EntityKey, EntityTable};

/// Top-level response body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TweetResultResponse {
    #[serde(default)]
    pub data: Option<ResponseData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseData {
    #[serde(default, rename = "tweetResult")]
    pub tweet_result: Option<ResultEnvelope>,
}

impl TweetResultResponse {
    /// The post, or `None` when the API answered with an empty result.
    #[must_use]
    pub fn into_post(self) -> Option<RawPost> {
        self.data
            .and_then(|d| d.tweet_result)
            .and_then(|r| r.result)
            .map(|post| *post)
    }
}

/// `{ "result": ... }` wrapper used for both the root post and quoted posts.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultEnvelope {
    #[serde(default)]
    pub result: Option<Box<RawPost>>,
}

/// A post result, discriminated by `__typename`.
///
/// Decoding never fails: a result that does not match the expected shape
/// becomes [`RawPost::Undecodable`] and is rejected later by
/// [`crate::normalize::normalize`].
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "serde_json::Value")]
pub enum RawPost {
    Tweet(Box<RawTweet>),
    /// `TweetTombstone`, `TweetUnavailable` and friends.
    Unavailable { typename: String, reason: Option<String> },
    /// A post result whose fields could not be decoded.
    Undecodable { typename: String, error: String },
}

impl From<serde_json::Value> for RawPost {
    fn from(mut value: serde_json::Value) -> Self {
        let typename = value
            .get("__typename")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("Tweet")
            .to_string();

        let tweet = match typename.as_str() {
            "Tweet" => value,
            "TweetWithVisibilityResults" => match value.get_mut("tweet") {
                Some(inner) => inner.take(),
                None => {
                    return Self::Undecodable {
                        typename,
                        error: "visibility wrapper has no tweet".to_string(),
                    };
                }
            },
            _ => {
                let reason = value
                    .pointer("/tombstone/text/text")
                    .or_else(|| value.get("reason"))
                    .and_then(serde_json::Value::as_str)
                    .map(String::from);
                return Self::Unavailable { typename, reason };
            }
        };

        match serde_json::from_value::<RawTweet>(tweet) {
            Ok(tweet) => Self::Tweet(Box::new(tweet)),
            Err(e) => Self::Undecodable {
                typename,
                error: e.to_string(),
            },
        }
    }
}

impl RawPost {
    #[must_use]
    pub fn tweet(&self) -> Option<&RawTweet> {
        match self {
            Self::Tweet(tweet) => Some(tweet),
            Self::Unavailable { .. } | Self::Undecodable { .. } => None,
        }
    }

    #[must_use]
    pub fn rest_id(&self) -> Option<&str> {
        self.tweet().and_then(|t| t.rest_id.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTweet {
    #[serde(default)]
    pub rest_id: Option<String>,
    #[serde(default)]
    pub core: Option<TweetCore>,
    #[serde(default)]
    pub legacy: Option<TweetLegacy>,
    #[serde(default)]
    pub views: Option<Views>,
    #[serde(default)]
    pub note_tweet: Option<NoteTweet>,
    #[serde(default)]
    pub article: Option<ArticleEnvelope>,
    #[serde(default)]
    pub quoted_status_result: Option<ResultEnvelope>,
}

impl RawTweet {
    /// The embedded article, if this post is article-backed.
    #[must_use]
    pub fn article(&self) -> Option<&RawArticle> {
        self.article
            .as_ref()
            .and_then(|a| a.article_results.as_ref())
            .and_then(|r| r.result.as_ref())
    }

    /// The embedded quoted post, if the payload carries one.
    #[must_use]
    pub fn quoted(&self) -> Option<&RawPost> {
        self.quoted_status_result
            .as_ref()
            .and_then(|q| q.result.as_deref())
    }

    /// Long-form text attached to a standard post, with its own URL entities.
    #[must_use]
    pub fn note(&self) -> Option<&NoteResult> {
        self.note_tweet
            .as_ref()
            .and_then(|n| n.note_tweet_results.as_ref())
            .and_then(|r| r.result.as_ref())
            .filter(|n| n.text.as_deref().is_some_and(|t| !t.is_empty()))
    }

    #[must_use]
    pub fn user(&self) -> Option<&RawUser> {
        self.core
            .as_ref()
            .and_then(|c| c.user_results.as_ref())
            .and_then(|u| u.result.as_ref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TweetCore {
    #[serde(default)]
    pub user_results: Option<UserResults>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserResults {
    #[serde(default)]
    pub result: Option<RawUser>,
}

/// The user object moved `name`/`screen_name` from `legacy` into `core` at
/// some point; both locations are read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawUser {
    #[serde(default)]
    pub rest_id: Option<String>,
    #[serde(default)]
    pub core: Option<UserNames>,
    #[serde(default)]
    pub legacy: Option<UserNames>,
}

impl RawUser {
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        Self::pick(self.core.as_ref(), self.legacy.as_ref(), |n| n.name.as_deref())
    }

    #[must_use]
    pub fn screen_name(&self) -> Option<&str> {
        Self::pick(self.core.as_ref(), self.legacy.as_ref(), |n| {
            n.screen_name.as_deref()
        })
    }

    fn pick<'a>(
        core: Option<&'a UserNames>,
        legacy: Option<&'a UserNames>,
        field: impl Fn(&'a UserNames) -> Option<&'a str>,
    ) -> Option<&'a str> {
        core.and_then(&field)
            .or_else(|| legacy.and_then(&field))
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserNames {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub screen_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TweetLegacy {
    #[serde(default)]
    pub full_text: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub favorite_count: Option<u64>,
    #[serde(default)]
    pub retweet_count: Option<u64>,
    #[serde(default)]
    pub reply_count: Option<u64>,
    #[serde(default)]
    pub quote_count: Option<u64>,
    #[serde(default)]
    pub bookmark_count: Option<u64>,
    #[serde(default)]
    pub entities: LegacyEntities,
    #[serde(default)]
    pub extended_entities: Option<ExtendedEntities>,
}

impl TweetLegacy {
    /// Media attachments, preferring `extended_entities` which lists every item.
    #[must_use]
    pub fn media(&self) -> &[MediaDescriptor] {
        match &self.extended_entities {
            Some(extended) if !extended.media.is_empty() => &extended.media,
            _ => &self.entities.media,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacyEntities {
    #[serde(default)]
    pub urls: Vec<UrlEntity>,
    #[serde(default)]
    pub media: Vec<MediaDescriptor>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtendedEntities {
    #[serde(default)]
    pub media: Vec<MediaDescriptor>,
}

/// A shortened link in post text and what it expands to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UrlEntity {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub expanded_url: Option<String>,
    #[serde(default)]
    pub display_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Photo,
    Video,
    AnimatedGif,
    #[default]
    #[serde(other)]
    Unknown,
}

/// A media attachment of a standard post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MediaDescriptor {
    #[serde(default, rename = "type")]
    pub kind: MediaKind,
    #[serde(default)]
    pub media_url_https: Option<String>,
    /// Shortened placeholder for this attachment inside the post text.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub video_info: Option<VideoInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct VideoInfo {
    #[serde(default)]
    pub variants: Vec<VideoVariant>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct VideoVariant {
    #[serde(default)]
    pub content_type: Option<String>,
    pub url: String,
    #[serde(default, alias = "bit_rate")]
    pub bitrate: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Views {
    #[serde(default, deserialize_with = "optional_id")]
    pub count: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoteTweet {
    #[serde(default)]
    pub note_tweet_results: Option<NoteResults>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoteResults {
    #[serde(default)]
    pub result: Option<NoteResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoteResult {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub entity_set: LegacyEntities,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleEnvelope {
    #[serde(default)]
    pub article_results: Option<ArticleResults>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleResults {
    #[serde(default)]
    pub result: Option<RawArticle>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawArticle {
    #[serde(default)]
    pub rest_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub cover_media: Option<ArticleMediaDescriptor>,
    #[serde(default)]
    pub content_state: Option<ContentState>,
    #[serde(default)]
    pub media_entities: Vec<ArticleMediaDescriptor>,
}

/// A media item referenced by id from an article document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ArticleMediaDescriptor {
    #[serde(default, deserialize_with = "optional_id")]
    pub media_id: Option<String>,
    #[serde(default)]
    pub media_info: Option<ArticleMediaInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ArticleMediaInfo {
    #[serde(default)]
    pub original_img_url: Option<String>,
    #[serde(default)]
    pub variants: Vec<VideoVariant>,
}

/// The rich-text document of an article.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentState {
    #[serde(default)]
    pub blocks: Vec<RawBlock>,
    #[serde(default, rename = "entityMap")]
    pub entity_map: EntityTable,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBlock {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, rename = "type")]
    pub block_type: String,
    #[serde(default)]
    pub inline_style_ranges: Vec<StyleRange>,
    #[serde(default)]
    pub entity_ranges: Vec<LinkRange>,
}

/// Half-open `[offset, offset + length)` style span, in UTF-16 code units.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StyleRange {
    pub offset: i64,
    pub length: i64,
    pub style: String,
}

/// Half-open span bound to an entity-table key, in UTF-16 code units.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LinkRange {
    pub offset: i64,
    pub length: i64,
    pub key: EntityKey,
}

impl StyleRange {
    #[must_use]
    pub fn new(offset: i64, length: i64, style: &str) -> Self {
        Self {
            offset,
            length,
            style: style.to_string(),
        }
    }
}

impl LinkRange {
    #[must_use]
    pub fn new(offset: i64, length: i64, key: impl Into<EntityKey>) -> Self {
        Self {
            offset,
            length,
            key: key.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_wrapper_is_unwrapped() {
        let post: RawPost = serde_json::from_value(serde_json::json!({
            "__typename": "TweetWithVisibilityResults",
            "tweet": {"rest_id": "77", "legacy": {"full_text": "hi"}}
        }))
        .unwrap();
        assert_eq!(post.rest_id(), Some("77"));
    }

    #[test]
    fn test_missing_typename_reads_as_tweet() {
        let post: RawPost = serde_json::from_value(serde_json::json!({"rest_id": "5"})).unwrap();
        assert_eq!(post.rest_id(), Some("5"));
    }

    #[test]
    fn test_tombstone() {
        let post: RawPost = serde_json::from_value(serde_json::json!({
            "__typename": "TweetTombstone",
            "tombstone": {"text": {"text": "This Post was deleted by the Post author."}}
        }))
        .unwrap();
        assert!(post.tweet().is_none());
        let RawPost::Unavailable { typename, reason } = post else {
            panic!("expected tombstone");
        };
        assert_eq!(typename, "TweetTombstone");
        assert_eq!(
            reason.as_deref(),
            Some("This Post was deleted by the Post author.")
        );
    }

    #[test]
    fn test_shape_mismatch_is_undecodable() {
        let bare_wrapper: RawPost = serde_json::from_value(serde_json::json!({
            "__typename": "TweetWithVisibilityResults"
        }))
        .unwrap();
        assert!(matches!(
            bare_wrapper,
            RawPost::Undecodable { ref typename, .. } if typename == "TweetWithVisibilityResults"
        ));

        let bad_variant: RawPost = serde_json::from_value(serde_json::json!({
            "rest_id": "9",
            "legacy": {"extended_entities": {"media": [
                {"type": "video", "video_info": {"variants": [{"content_type": "video/mp4"}]}}
            ]}}
        }))
        .unwrap();
        let RawPost::Undecodable { error, .. } = bad_variant else {
            panic!("expected undecodable post");
        };
        assert!(error.contains("url"));
    }

    #[test]
    fn test_broken_quote_leaves_parent_intact() {
        let post: RawPost = serde_json::from_value(serde_json::json!({
            "rest_id": "1",
            "legacy": {"full_text": "parent"},
            "quoted_status_result": {"result": {"__typename": "TweetWithVisibilityResults"}}
        }))
        .unwrap();
        assert_eq!(post.rest_id(), Some("1"));
        assert!(post.tweet().and_then(RawTweet::quoted).is_some_and(|q| q.tweet().is_none()));
    }

    #[test]
    fn test_empty_response_has_no_post() {
        let response: TweetResultResponse =
            serde_json::from_value(serde_json::json!({"data": {"tweetResult": {}}})).unwrap();
        assert!(response.into_post().is_none());
    }

    #[test]
    fn test_user_names_fall_back_to_legacy() {
        let user: RawUser = serde_json::from_value(serde_json::json!({
            "rest_id": "12",
            "core": {"name": "Jack"},
            "legacy": {"name": "ignored", "screen_name": "jack"}
        }))
        .unwrap();
        assert_eq!(user.name(), Some("Jack"));
        assert_eq!(user.screen_name(), Some("jack"));
    }

    #[test]
    fn test_extended_media_preferred() {
        let legacy: TweetLegacy = serde_json::from_value(serde_json::json!({
            "entities": {"media": [{"type": "photo", "media_url_https": "a"}]},
            "extended_entities": {"media": [
                {"type": "photo", "media_url_https": "a"},
                {"type": "photo", "media_url_https": "b"}
            ]}
        }))
        .unwrap();
        assert_eq!(legacy.media().len(), 2);
    }

    #[test]
    fn test_block_ranges_accept_numeric_keys() {
        let block: RawBlock = serde_json::from_value(serde_json::json!({
            "key": "abc",
            "text": "hello",
            "type": "unstyled",
            "depth": 0,
            "inlineStyleRanges": [{"offset": 0, "length": 5, "style": "BOLD"}],
            "entityRanges": [{"offset": 0, "length": 5, "key": 2}]
        }))
        .unwrap();
        assert_eq!(block.entity_ranges[0].key, EntityKey::from("2"));
        assert_eq!(block.inline_style_ranges[0], StyleRange::new(0, 5, "BOLD"));
    }
}
