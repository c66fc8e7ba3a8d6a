use std::collections::HashMap;

use tracing::debug;

use crate::model::{ArticleBlock, ArticleContent, MediaUrls};
use crate::raw::{ArticleMediaDescriptor, MediaDescriptor, MediaKind, VideoVariant};

/// Content types of segmented streaming playlists. These are never picked.
const PLAYLIST_CONTENT_TYPES: &[&str] = &["application/x-mpegurl", "application/vnd.apple.mpegurl"];

fn is_playlist(variant: &VideoVariant) -> bool {
    variant.content_type.as_deref().is_some_and(|ct| {
        PLAYLIST_CONTENT_TYPES
            .iter()
            .any(|p| ct.eq_ignore_ascii_case(p))
    })
}

/// Pick the best playable rendition of a video.
///
/// Playlists are excluded. Among the rest the highest declared bitrate wins
/// (the first one on ties); when no variant declares a bitrate, as with
/// animated GIFs, the first eligible variant is used.
#[must_use]
pub fn select_best_variant(variants: &[VideoVariant]) -> Option<&VideoVariant> {
    let mut eligible = variants.iter().filter(|v| !is_playlist(v)).peekable();
    let first = *eligible.peek()?;

    let mut best: Option<&VideoVariant> = None;
    let mut max_bitrate = 0;
    for variant in eligible {
        if let Some(bitrate) = variant.bitrate {
            if best.is_none() || bitrate > max_bitrate {
                best = Some(variant);
                max_bitrate = bitrate;
            }
        }
    }

    Some(best.unwrap_or(first))
}

/// Collect image and video URLs from a standard post's media attachments.
///
/// Videos without any playable variant are left out.
#[must_use]
pub fn extract_media_urls(media: &[MediaDescriptor]) -> MediaUrls {
    let mut urls = MediaUrls::default();

    for item in media {
        match item.kind {
            MediaKind::Photo => {
                if let Some(url) = item.media_url_https.as_deref().filter(|u| !u.is_empty()) {
                    urls.images.push(url.to_string());
                }
            }
            MediaKind::Video | MediaKind::AnimatedGif => {
                let variants = item
                    .video_info
                    .as_ref()
                    .map_or(&[][..], |info| info.variants.as_slice());
                match select_best_variant(variants) {
                    Some(best) => urls.videos.push(best.url.clone()),
                    None => debug!(kind = ?item.kind, "Dropping video without a playable variant"),
                }
            }
            MediaKind::Unknown => {}
        }
    }

    urls
}

impl ArticleMediaDescriptor {
    /// Concrete URL for this media item: the original image, or the best
    /// video rendition for video entries.
    #[must_use]
    pub fn resolved_url(&self) -> Option<&str> {
        let info = self.media_info.as_ref()?;
        info.original_img_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .or_else(|| select_best_variant(&info.variants).map(|v| v.url.as_str()))
    }
}

/// Fill in image URLs of an article from its media descriptors.
///
/// Returns a new article; image blocks whose media id is known get the
/// resolved URL, everything else is copied unchanged.
#[must_use]
pub fn resolve_article_media(
    article: &ArticleContent,
    media: &[ArticleMediaDescriptor],
) -> ArticleContent {
    let lookup: HashMap<&str, &str> = media
        .iter()
        .filter_map(|m| Some((m.media_id.as_deref()?, m.resolved_url()?)))
        .collect();

    let blocks = article
        .blocks
        .iter()
        .map(|block| match block {
            ArticleBlock::Image {
                key,
                media_id: Some(media_id),
                ..
            } => match lookup.get(media_id.as_str()) {
                Some(url) => ArticleBlock::Image {
                    key: key.clone(),
                    url: (*url).to_string(),
                    media_id: Some(media_id.clone()),
                },
                None => block.clone(),
            },
            _ => block.clone(),
        })
        .collect();

    ArticleContent {
        blocks,
        ..article.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::{ArticleMediaInfo, VideoInfo};

    fn variant(content_type: &str, url: &str, bitrate: Option<u64>) -> VideoVariant {
        VideoVariant {
            content_type: Some(content_type.to_string()),
            url: url.to_string(),
            bitrate,
        }
    }

    #[test]
    fn test_playlist_excluded_despite_bitrate() {
        let variants = vec![
            variant("application/x-mpegURL", "playlist", Some(999_999)),
            variant("video/mp4", "a", Some(500)),
            variant("video/mp4", "b", Some(1200)),
        ];
        assert_eq!(select_best_variant(&variants).unwrap().url, "b");
    }

    #[test]
    fn test_ties_keep_first() {
        let variants = vec![
            variant("video/mp4", "first", Some(800)),
            variant("video/mp4", "second", Some(800)),
        ];
        assert_eq!(select_best_variant(&variants).unwrap().url, "first");
    }

    #[test]
    fn test_falls_back_to_first_eligible_without_bitrates() {
        let variants = vec![
            variant("application/x-mpegURL", "playlist", None),
            variant("video/mp4", "gif", None),
            variant("video/mp4", "other", None),
        ];
        assert_eq!(select_best_variant(&variants).unwrap().url, "gif");
    }

    #[test]
    fn test_only_playlists_is_none() {
        let variants = vec![variant("application/x-mpegURL", "playlist", Some(10))];
        assert!(select_best_variant(&variants).is_none());
        assert!(select_best_variant(&[]).is_none());
    }

    #[test]
    fn test_extract_media_urls() {
        let media = vec![
            MediaDescriptor {
                kind: MediaKind::Photo,
                media_url_https: Some("https://pbs.test/1.jpg".to_string()),
                ..Default::default()
            },
            MediaDescriptor {
                kind: MediaKind::Video,
                video_info: Some(VideoInfo {
                    variants: vec![
                        variant("video/mp4", "https://video.test/low.mp4", Some(256)),
                        variant("video/mp4", "https://video.test/high.mp4", Some(2176)),
                    ],
                }),
                ..Default::default()
            },
            MediaDescriptor {
                kind: MediaKind::AnimatedGif,
                video_info: Some(VideoInfo {
                    variants: vec![variant("video/mp4", "https://video.test/gif.mp4", None)],
                }),
                ..Default::default()
            },
            MediaDescriptor {
                kind: MediaKind::Video,
                video_info: None,
                ..Default::default()
            },
        ];

        let urls = extract_media_urls(&media);
        assert_eq!(urls.images, vec!["https://pbs.test/1.jpg"]);
        assert_eq!(
            urls.videos,
            vec!["https://video.test/high.mp4", "https://video.test/gif.mp4"]
        );
    }

    fn image_block(key: &str, media_id: Option<&str>) -> ArticleBlock {
        ArticleBlock::Image {
            key: key.to_string(),
            url: String::new(),
            media_id: media_id.map(String::from),
        }
    }

    fn descriptor(media_id: Option<&str>, url: Option<&str>) -> ArticleMediaDescriptor {
        ArticleMediaDescriptor {
            media_id: media_id.map(String::from),
            media_info: Some(ArticleMediaInfo {
                original_img_url: url.map(String::from),
                variants: Vec::new(),
            }),
        }
    }

    #[test]
    fn test_resolve_article_media() {
        let article = ArticleContent {
            title: "t".to_string(),
            blocks: vec![
                image_block("a", Some("1")),
                image_block("b", Some("2")),
                image_block("c", None),
                ArticleBlock::Video {
                    key: "d".to_string(),
                    url: String::new(),
                    media_id: Some("1".to_string()),
                },
            ],
            ..Default::default()
        };
        let media = vec![
            descriptor(Some("1"), Some("https://pbs.test/1.jpg")),
            descriptor(None, Some("https://pbs.test/orphan.jpg")),
            descriptor(Some("2"), None),
        ];

        let resolved = resolve_article_media(&article, &media);

        assert_eq!(
            resolved.blocks[0],
            ArticleBlock::Image {
                key: "a".to_string(),
                url: "https://pbs.test/1.jpg".to_string(),
                media_id: Some("1".to_string()),
            }
        );
        assert_eq!(resolved.blocks[1], article.blocks[1]);
        assert_eq!(resolved.blocks[2], article.blocks[2]);
        assert_eq!(resolved.blocks[3], article.blocks[3]);
        assert_eq!(resolved.title, "t");

        // The input is left untouched.
        assert_eq!(article.blocks[0], image_block("a", Some("1")));
    }

    #[test]
    fn test_resolved_url_falls_back_to_variants() {
        let video = ArticleMediaDescriptor {
            media_id: Some("5".to_string()),
            media_info: Some(ArticleMediaInfo {
                original_img_url: None,
                variants: vec![variant("video/mp4", "https://video.test/v.mp4", Some(10))],
            }),
        };
        assert_eq!(video.resolved_url(), Some("https://video.test/v.mp4"));
        assert_eq!(ArticleMediaDescriptor::default().resolved_url(), None);
    }
}
