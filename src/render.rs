//! Markdown rendering of rich-text ranges and whole articles.

use std::ops::Range;

use crate::entity::{EntityKey, EntityKind, EntityTable};
use crate::model::{ArticleBlock, ArticleContent, BlockStyle};
use crate::raw::{LinkRange, StyleRange};

const BOLD: &str = "BOLD";
const ITALIC: &str = "ITALIC";

/// Link target resolved from the entity table.
struct ResolvedLink<'a> {
    key: &'a EntityKey,
    url: String,
}

/// Clamp a half-open range to `[0, units.len())`, then widen it so neither
/// end splits a surrogate pair. Out-of-range parts are dropped.
fn span(offset: i64, length: i64, units: &[u16]) -> Range<usize> {
    let len = units.len() as i64;
    let mut start = offset.clamp(0, len) as usize;
    let mut end = offset.saturating_add(length.max(0)).clamp(start as i64, len) as usize;
    if start > 0 && splits_pair(units, start) {
        start -= 1;
    }
    if end > start && end < units.len() && splits_pair(units, end) {
        end += 1;
    }
    start..end
}

/// Whether `pos` falls between the two halves of a surrogate pair.
fn splits_pair(units: &[u16], pos: usize) -> bool {
    matches!(units[pos - 1], 0xD800..=0xDBFF) && matches!(units[pos], 0xDC00..=0xDFFF)
}

/// Render `text` to Markdown, applying style and link ranges.
///
/// Offsets are UTF-16 code units of `text`. Each position gets the set of
/// styles covering it and at most one link: the first link range covering it
/// whose entity is a `LINK`. Markers are emitted at transitions, link
/// changes before style changes, so a link opened at the same position as a
/// style wraps outside it, and a link closing at the same position as a
/// style closes first.
#[must_use]
pub fn render_ranges(
    text: &str,
    style_ranges: &[StyleRange],
    link_ranges: &[LinkRange],
    entities: Option<&EntityTable>,
) -> String {
    if text.is_empty() {
        return String::new();
    }

    let units: Vec<u16> = text.encode_utf16().collect();
    let len = units.len();

    let mut styles: Vec<Vec<&str>> = vec![Vec::new(); len];
    for range in style_ranges {
        for pos in span(range.offset, range.length, &units) {
            styles[pos].push(range.style.as_str());
        }
    }

    let mut resolved: Vec<ResolvedLink<'_>> = Vec::new();
    let mut links: Vec<Option<usize>> = vec![None; len];
    if let Some(table) = entities {
        for range in link_ranges {
            let Some(EntityKind::Link { url }) = table.lookup(&range.key).map(|e| e.kind())
            else {
                continue;
            };
            let idx = resolved.len();
            resolved.push(ResolvedLink {
                key: &range.key,
                url,
            });
            for slot in &mut links[span(range.offset, range.length, &units)] {
                slot.get_or_insert(idx);
            }
        }
    }

    let mut out: Vec<u16> = Vec::with_capacity(len + 16);
    let emit = |out: &mut Vec<u16>, marker: &str| out.extend(marker.encode_utf16());

    let mut current_link: Option<usize> = None;
    let mut was_bold = false;
    let mut was_italic = false;

    for (pos, &unit) in units.iter().enumerate() {
        let link = links[pos];
        let key_of = |idx: Option<usize>| idx.map(|i| resolved[i].key);
        if key_of(link) != key_of(current_link) {
            if let Some(open) = current_link {
                emit(&mut out, &format!("]({})", resolved[open].url));
            }
            if link.is_some() {
                emit(&mut out, "[");
            }
            current_link = link;
        }

        let is_bold = styles[pos].contains(&BOLD);
        let is_italic = styles[pos].contains(&ITALIC);

        if was_bold && !is_bold {
            emit(&mut out, "**");
        }
        if was_italic && !is_italic {
            emit(&mut out, "*");
        }
        if !was_italic && is_italic {
            emit(&mut out, "*");
        }
        if !was_bold && is_bold {
            emit(&mut out, "**");
        }
        was_bold = is_bold;
        was_italic = is_italic;

        out.push(unit);
    }

    if was_bold {
        emit(&mut out, "**");
    }
    if was_italic {
        emit(&mut out, "*");
    }
    if let Some(open) = current_link {
        emit(&mut out, &format!("]({})", resolved[open].url));
    }

    String::from_utf16_lossy(&out)
}

/// Apply block-level Markdown to already inline-rendered text.
///
/// `ordinal` numbers ordered list items and is ignored for other styles.
#[must_use]
pub fn apply_block_style(text: &str, style: Option<&BlockStyle>, ordinal: usize) -> String {
    match style {
        None | Some(BlockStyle::Other(_)) => text.to_string(),
        Some(BlockStyle::Heading(level)) => {
            format!("{} {text}", "#".repeat(usize::from((*level).clamp(1, 6))))
        }
        Some(BlockStyle::Blockquote) => format!("> {}", text.replace('\n', "\n> ")),
        Some(BlockStyle::UnorderedListItem) => format!("- {text}"),
        Some(BlockStyle::OrderedListItem) => format!("{ordinal}. {text}"),
        Some(BlockStyle::CodeBlock) => format!("```\n{text}\n```"),
    }
}

/// Status URL for a post id.
#[must_use]
pub fn status_url(screen_name: &str, post_id: &str) -> String {
    format!("https://x.com/{screen_name}/status/{post_id}")
}

/// Render a whole article as a Markdown document.
#[must_use]
pub fn article_to_markdown(article: &ArticleContent) -> String {
    let mut parts: Vec<String> = Vec::new();

    if !article.title.is_empty() {
        parts.push(format!("# {}", article.title));
    }
    if let Some(cover) = article.cover_image.as_deref().filter(|c| !c.is_empty()) {
        parts.push(format!("![]({cover})"));
    }

    let mut ordinal = 0;
    for block in &article.blocks {
        if matches!(
            block,
            ArticleBlock::Text {
                style: Some(BlockStyle::OrderedListItem),
                ..
            }
        ) {
            ordinal += 1;
        } else {
            ordinal = 0;
        }

        let rendered = match block {
            ArticleBlock::Text { text, style, .. } => {
                if text.trim().is_empty() {
                    None
                } else {
                    Some(apply_block_style(text, style.as_ref(), ordinal))
                }
            }
            ArticleBlock::Image { url, .. } => {
                (!url.is_empty()).then(|| format!("![]({url})"))
            }
            ArticleBlock::Video { url, .. } => Some(if url.is_empty() {
                "[Video]".to_string()
            } else {
                format!("[Video]({url})")
            }),
            ArticleBlock::EmbeddedPost { post_id, .. } => {
                (!post_id.is_empty()).then(|| status_url("i", post_id))
            }
            ArticleBlock::Divider { .. } => Some("---".to_string()),
            ArticleBlock::Unknown { .. } => None,
        };
        parts.extend(rendered);
    }

    parts.join("\n\n")
}
