use regex::Regex;

use crate::raw::{MediaDescriptor, UrlEntity};

/// Replace shortened link placeholders with their targets and strip media
/// placeholders from post text.
///
/// Every occurrence of a link placeholder is replaced. Media placeholders are
/// removed together with surrounding whitespace, and the result is trimmed.
/// Text without any placeholders to process is returned verbatim.
#[must_use]
pub fn expand_urls(text: &str, urls: &[UrlEntity], media: &[MediaDescriptor]) -> String {
    let replacements: Vec<(&str, &str)> = urls
        .iter()
        .filter_map(|entity| match (entity.url.as_deref(), entity.expanded_url.as_deref()) {
            (Some(short), Some(expanded)) if !short.is_empty() && !expanded.is_empty() => {
                Some((short, expanded))
            }
            _ => None,
        })
        .collect();

    let mut media_placeholders: Vec<&str> = media
        .iter()
        .filter_map(|m| m.url.as_deref())
        .filter(|u| !u.is_empty())
        .collect();
    media_placeholders.dedup();

    if replacements.is_empty() && media_placeholders.is_empty() {
        return text.to_string();
    }

    let mut expanded = text.to_string();
    for (short, target) in replacements {
        expanded = expanded.replace(short, target);
    }

    for placeholder in media_placeholders {
        let pattern = format!(r"\s*{}\s*", regex::escape(placeholder));
        match Regex::new(&pattern) {
            Ok(re) => expanded = re.replace_all(&expanded, "").into_owned(),
            Err(e) => {
                tracing::debug!(placeholder, error = %e, "Skipping unusable media placeholder");
            }
        }
    }

    expanded.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(short: &str, expanded: &str) -> UrlEntity {
        UrlEntity {
            url: Some(short.to_string()),
            expanded_url: Some(expanded.to_string()),
            display_url: None,
        }
    }

    fn media(short: &str) -> MediaDescriptor {
        MediaDescriptor {
            url: Some(short.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_expands_link() {
        let out = expand_urls(
            "see https://t.co/a",
            &[link("https://t.co/a", "https://real.test/x")],
            &[],
        );
        assert_eq!(out, "see https://real.test/x");
    }

    #[test]
    fn test_expands_multiple_links() {
        let out = expand_urls(
            "Links: https://t.co/abc123 and https://t.co/xyz789",
            &[
                link("https://t.co/abc123", "https://example.com/first"),
                link("https://t.co/xyz789", "https://example.com/second"),
            ],
            &[],
        );
        assert_eq!(
            out,
            "Links: https://example.com/first and https://example.com/second"
        );
    }

    #[test]
    fn test_repeated_placeholder_replaced_everywhere() {
        let out = expand_urls(
            "https://t.co/a twice https://t.co/a",
            &[link("https://t.co/a", "https://real.test")],
            &[],
        );
        assert_eq!(out, "https://real.test twice https://real.test");
    }

    #[test]
    fn test_removes_media_placeholder() {
        let out = expand_urls("pic https://t.co/m", &[], &[media("https://t.co/m")]);
        assert_eq!(out, "pic");
    }

    #[test]
    fn test_links_and_media_together() {
        let out = expand_urls(
            "Article: https://t.co/abc123 and image: https://t.co/pic456",
            &[link("https://t.co/abc123", "https://example.com/article")],
            &[media("https://t.co/pic456")],
        );
        assert_eq!(out, "Article: https://example.com/article and image:");
    }

    #[test]
    fn test_media_placeholder_with_surrounding_spaces() {
        let out = expand_urls(
            "Check this out   https://t.co/pic123   ",
            &[],
            &[media("https://t.co/pic123")],
        );
        assert_eq!(out, "Check this out");
    }

    #[test]
    fn test_no_entities_returns_text_verbatim() {
        let text = "  Plain text without URLs ";
        assert_eq!(expand_urls(text, &[], &[]), text);
    }

    #[test]
    fn test_special_characters_in_target() {
        let out = expand_urls(
            "Read more: https://t.co/special123",
            &[link(
                "https://t.co/special123",
                "https://example.com/article?id=123&ref=twitter",
            )],
            &[],
        );
        assert_eq!(out, "Read more: https://example.com/article?id=123&ref=twitter");
    }

    #[test]
    fn test_non_ascii_text() {
        let out = expand_urls(
            "Lenny's Newsletter 的含金量还在上升 https://t.co/ZAnVDeLv4h",
            &[],
            &[media("https://t.co/ZAnVDeLv4h")],
        );
        assert_eq!(out, "Lenny's Newsletter 的含金量还在上升");
    }

    #[test]
    fn test_incomplete_link_entities_are_ignored() {
        let partial = UrlEntity {
            url: Some("https://t.co/a".to_string()),
            expanded_url: None,
            display_url: None,
        };
        let text = " keep https://t.co/a ";
        assert_eq!(expand_urls(text, &[partial], &[]), text);
    }
}
