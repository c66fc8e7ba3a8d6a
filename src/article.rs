//! Decomposition of article documents into content blocks.

use tracing::debug;

use crate::entity::{EntityKind, MediaCategory, RawEntity};
use crate::model::{ArticleBlock, ArticleContent, BlockStyle};
use crate::raw::{ContentState, RawArticle, RawBlock};
use crate::render::render_ranges;

const ATOMIC: &str = "atomic";

/// Turn a rich-text document into ordered article blocks.
///
/// Atomic blocks resolve through their first entity; atomic blocks without
/// one, or whose entity is missing from the table, are dropped. Every other
/// block becomes a Markdown text block. Media blocks are left with an empty
/// URL for [`crate::media::resolve_article_media`] to fill in.
#[must_use]
pub fn decompose(document: Option<&ContentState>) -> ArticleContent {
    let Some(document) = document else {
        return ArticleContent::default();
    };

    let blocks = document
        .blocks
        .iter()
        .filter_map(|block| {
            if block.block_type == ATOMIC {
                atomic_block(block, document)
            } else {
                Some(text_block(block, document))
            }
        })
        .collect();

    ArticleContent {
        blocks,
        entity_table: Some(document.entity_map.clone()),
        ..Default::default()
    }
}

/// Decompose a raw article, carrying over its title and cover image.
#[must_use]
pub fn parse_article(article: &RawArticle) -> ArticleContent {
    let cover_image = article
        .cover_media
        .as_ref()
        .and_then(|c| c.media_info.as_ref())
        .and_then(|info| info.original_img_url.clone())
        .filter(|url| !url.is_empty());

    ArticleContent {
        title: article.title.clone().unwrap_or_default(),
        cover_image,
        ..decompose(article.content_state.as_ref())
    }
}

fn text_block(block: &RawBlock, document: &ContentState) -> ArticleBlock {
    ArticleBlock::Text {
        key: block.key.clone(),
        text: render_ranges(
            &block.text,
            &block.inline_style_ranges,
            &block.entity_ranges,
            Some(&document.entity_map),
        ),
        style: BlockStyle::from_block_type(&block.block_type),
    }
}

fn atomic_block(block: &RawBlock, document: &ContentState) -> Option<ArticleBlock> {
    let Some(range) = block.entity_ranges.first() else {
        debug!(block = %block.key, "Dropping atomic block without an entity");
        return None;
    };
    let Some(entity) = document.entity_map.lookup(&range.key) else {
        debug!(block = %block.key, entity = %range.key, "Dropping atomic block with unknown entity");
        return None;
    };
    Some(atomic_entity_block(block.key.clone(), entity))
}

fn atomic_entity_block(key: String, entity: &RawEntity) -> ArticleBlock {
    match entity.kind() {
        EntityKind::Media { items } => match items.first() {
            Some(item) => match item.category() {
                MediaCategory::Image => ArticleBlock::Image {
                    key,
                    url: String::new(),
                    media_id: item.media_id.clone(),
                },
                MediaCategory::Gif | MediaCategory::Video => ArticleBlock::Video {
                    key,
                    url: String::new(),
                    media_id: item.media_id.clone(),
                },
                MediaCategory::Other => ArticleBlock::Unknown { key },
            },
            None => ArticleBlock::Unknown { key },
        },
        EntityKind::Emoji { url } => ArticleBlock::Image {
            key,
            url,
            media_id: None,
        },
        EntityKind::Divider => ArticleBlock::Divider { key },
        EntityKind::EmbeddedPost { post_id } => ArticleBlock::EmbeddedPost {
            key,
            post_id: post_id.unwrap_or_default(),
        },
        EntityKind::Link { .. } | EntityKind::Other(_) => ArticleBlock::Unknown { key },
    }
}
