use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::model::PostData;

/// Files written for one post.
#[derive(Debug, Clone)]
pub struct WrittenResults {
    pub dir: PathBuf,
    pub markdown: PathBuf,
    pub json: PathBuf,
}

/// Markdown body of a post, followed by its quoted post as a blockquote.
#[must_use]
pub fn post_markdown(post: &PostData) -> String {
    let mut content = post.text.clone();
    if let Some(quoted) = post.quoted_post.as_deref() {
        content.push_str(&format!(
            "\n\n> Quoted Post from @{}:\n> {}",
            quoted.author.screen_name,
            quoted.text.replace('\n', "\n> ")
        ));
    }
    content
}

/// Write `<dir>/<id>/<id>.md` and `<dir>/<id>/<id>.json` for a post.
///
/// # Errors
///
/// Returns an error if the directory or either file cannot be written.
pub async fn write_results(dir: &Path, post: &PostData) -> Result<WrittenResults> {
    let post_dir = dir.join(&post.id);
    tokio::fs::create_dir_all(&post_dir)
        .await
        .with_context(|| format!("Failed to create {}", post_dir.display()))?;

    let markdown = post_dir.join(format!("{}.md", post.id));
    tokio::fs::write(&markdown, post_markdown(post))
        .await
        .context("Failed to write markdown file")?;

    let json = post_dir.join(format!("{}.json", post.id));
    let body = serde_json::to_string_pretty(post).context("Failed to serialize post")?;
    tokio::fs::write(&json, body)
        .await
        .context("Failed to write JSON file")?;

    info!(post_id = %post.id, dir = %post_dir.display(), "Saved results");

    Ok(WrittenResults {
        dir: post_dir,
        markdown,
        json,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_markdown_quotes_every_line() {
        let mut quoted = PostData {
            text: "line one\nline two".to_string(),
            ..Default::default()
        };
        quoted.author.screen_name = "other".to_string();
        let post = PostData {
            text: "hello".to_string(),
            quoted_post: Some(Box::new(quoted)),
            ..Default::default()
        };

        insta::assert_snapshot!(
            post_markdown(&post),
            @r"
        hello

        > Quoted Post from @other:
        > line one
        > line two
        "
        );
    }

    #[test]
    fn test_post_markdown_without_quote() {
        let post = PostData {
            text: "just text".to_string(),
            ..Default::default()
        };
        assert_eq!(post_markdown(&post), "just text");
    }
}
