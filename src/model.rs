//! The normalized, author-agnostic post model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entity::EntityTable;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PostKind {
    #[default]
    Standard,
    Article,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: String,
    pub name: String,
    pub screen_name: String,
}

/// Engagement counters. `None` means the API did not report the value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub likes: Option<u64>,
    pub reposts: Option<u64>,
    pub replies: Option<u64>,
    pub quotes: Option<u64>,
    pub bookmarks: Option<u64>,
    pub views: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MediaUrls {
    pub images: Vec<String>,
    pub videos: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostData {
    pub id: String,
    pub url: String,
    /// Markdown text with shortened links expanded.
    pub text: String,
    pub author: Author,
    pub stats: Stats,
    pub media: MediaUrls,
    pub kind: PostKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article: Option<ArticleContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quoted_post: Option<Box<PostData>>,
}

impl PostData {
    /// Number of quoted posts below this one.
    #[must_use]
    pub fn quote_depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.quoted_post.as_deref();
        while let Some(post) = current {
            depth += 1;
            current = post.quoted_post.as_deref();
        }
        depth
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleContent {
    pub title: String,
    pub blocks: Vec<ArticleBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    /// Kept for block resolution; not part of the serialized output.
    #[serde(skip)]
    pub entity_table: Option<EntityTable>,
}

/// Block-level formatting of a text block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockStyle {
    Heading(u8),
    Blockquote,
    UnorderedListItem,
    OrderedListItem,
    CodeBlock,
    Other(String),
}

impl BlockStyle {
    /// Map a document block type to a style. `unstyled` has none.
    #[must_use]
    pub fn from_block_type(block_type: &str) -> Option<Self> {
        let style = match block_type {
            "" | "unstyled" | "paragraph" => return None,
            "header-one" => Self::Heading(1),
            "header-two" => Self::Heading(2),
            "header-three" => Self::Heading(3),
            "header-four" => Self::Heading(4),
            "header-five" => Self::Heading(5),
            "header-six" => Self::Heading(6),
            "blockquote" => Self::Blockquote,
            "unordered-list-item" => Self::UnorderedListItem,
            "ordered-list-item" => Self::OrderedListItem,
            "code-block" => Self::CodeBlock,
            other => Self::Other(other.to_string()),
        };
        Some(style)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ArticleBlock {
    Text {
        key: String,
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        style: Option<BlockStyle>,
    },
    Image {
        key: String,
        url: String,
        #[serde(rename = "mediaId", skip_serializing_if = "Option::is_none")]
        media_id: Option<String>,
    },
    Video {
        key: String,
        url: String,
        #[serde(rename = "mediaId", skip_serializing_if = "Option::is_none")]
        media_id: Option<String>,
    },
    EmbeddedPost {
        key: String,
        #[serde(rename = "postId")]
        post_id: String,
    },
    Divider {
        key: String,
    },
    Unknown {
        key: String,
    },
}

impl ArticleBlock {
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Text { key, .. }
            | Self::Image { key, .. }
            | Self::Video { key, .. }
            | Self::EmbeddedPost { key, .. }
            | Self::Divider { key }
            | Self::Unknown { key } => key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_style_mapping() {
        assert_eq!(BlockStyle::from_block_type("unstyled"), None);
        assert_eq!(
            BlockStyle::from_block_type("header-two"),
            Some(BlockStyle::Heading(2))
        );
        assert_eq!(
            BlockStyle::from_block_type("fancy-callout"),
            Some(BlockStyle::Other("fancy-callout".to_string()))
        );
    }

    #[test]
    fn test_article_block_serializes_tagged() {
        let block = ArticleBlock::Image {
            key: "k1".to_string(),
            url: "https://img.test/a.jpg".to_string(),
            media_id: Some("9".to_string()),
        };
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["type"], "image");
        assert_eq!(json["mediaId"], "9");
        assert_eq!(block.key(), "k1");
    }
}
