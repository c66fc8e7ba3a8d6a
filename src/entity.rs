//! Rich-text entity tables.
//!
//! Article documents carry their entities either as an ordered list of
//! `{key, value}` pairs or as a keyed map. Both decode into [`EntityTable`],
//! and [`EntityTable::lookup`] is the only way the rest of the crate reads
//! from one.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// String-normalized entity key. `3` and `"3"` decode to the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EntityKey(String);

impl EntityKey {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EntityKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u64> for EntityKey {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Str(String),
    Num(serde_json::Number),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::Str(s) => s,
            StringOrNumber::Num(n) => n.to_string(),
        }
    }
}

impl<'de> Deserialize<'de> for EntityKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        StringOrNumber::deserialize(deserializer).map(|repr| Self(repr.into()))
    }
}

/// Deserialize an optional identifier that the API sends as either a string or a number.
pub(crate) fn optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<StringOrNumber>::deserialize(deserializer).map(|repr| repr.map(String::from))
}

/// One entity as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEntity {
    #[serde(rename = "type")]
    pub entity_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mutability: Option<String>,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Entry of the list-encoded entity table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityEntry {
    pub key: EntityKey,
    pub value: RawEntity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityTable {
    List(Vec<EntityEntry>),
    Map(HashMap<String, RawEntity>),
}

impl Default for EntityTable {
    fn default() -> Self {
        Self::Map(HashMap::new())
    }
}

impl EntityTable {
    #[must_use]
    pub fn from_entries(entries: Vec<EntityEntry>) -> Self {
        Self::List(entries)
    }

    /// Look up an entity by key, independent of the table encoding.
    #[must_use]
    pub fn lookup(&self, key: &EntityKey) -> Option<&RawEntity> {
        match self {
            Self::List(entries) => entries
                .iter()
                .find(|entry| entry.key == *key)
                .map(|entry| &entry.value),
            Self::Map(map) => map.get(key.as_str()),
        }
    }
}

/// Category of a media item referenced from a `MEDIA` entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaCategory {
    Image,
    Gif,
    Video,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    #[serde(default)]
    pub media_category: String,
    #[serde(default, deserialize_with = "optional_id")]
    pub media_id: Option<String>,
}

impl MediaItem {
    #[must_use]
    pub fn category(&self) -> MediaCategory {
        match self.media_category.as_str() {
            "DraftTweetImage" => MediaCategory::Image,
            "DraftTweetGif" => MediaCategory::Gif,
            "DraftTweetVideo" => MediaCategory::Video,
            _ => MediaCategory::Other,
        }
    }
}

/// Typed view of a [`RawEntity`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityKind {
    Link { url: String },
    Media { items: Vec<MediaItem> },
    Emoji { url: String },
    Divider,
    EmbeddedPost { post_id: Option<String> },
    Other(String),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MediaData {
    #[serde(default)]
    media_items: Vec<MediaItem>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmbeddedPostData {
    #[serde(default, deserialize_with = "optional_id")]
    tweet_id: Option<String>,
}

impl RawEntity {
    /// Project the entity onto its typed variant. Never fails: payloads that
    /// do not fit their declared type come back as [`EntityKind::Other`].
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self.entity_type.as_str() {
            "LINK" => match self.str_field("url") {
                Some(url) => EntityKind::Link { url },
                None => self.other(),
            },
            "MEDIA" => {
                let items = serde_json::from_value::<MediaData>(self.data.clone())
                    .map(|d| d.media_items)
                    .unwrap_or_default();
                EntityKind::Media { items }
            }
            "TWEMOJI" => match self.str_field("url") {
                Some(url) => EntityKind::Emoji { url },
                None => self.other(),
            },
            "DIVIDER" => EntityKind::Divider,
            "TWEET" => {
                let post_id = serde_json::from_value::<EmbeddedPostData>(self.data.clone())
                    .ok()
                    .and_then(|d| d.tweet_id);
                EntityKind::EmbeddedPost { post_id }
            }
            _ => self.other(),
        }
    }

    fn str_field(&self, name: &str) -> Option<String> {
        self.data
            .get(name)
            .and_then(serde_json::Value::as_str)
            .filter(|s| !s.is_empty())
            .map(String::from)
    }

    fn other(&self) -> EntityKind {
        EntityKind::Other(self.entity_type.clone())
    }
}
