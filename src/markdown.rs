// ABOUTME: Markdown front end for the cardpost application
// ABOUTME: Renders markdown with comrak and parses the result into a document tree

use crate::dom::Document;
use crate::errors::{CardError, Result};
use comrak::{ComrakOptions, markdown_to_html};
use log::{debug, info};
use std::fs;
use std::path::Path;

/// Options for the markdown renderer
#[derive(Debug, Clone)]
pub struct MarkdownOptions {
    /// Pass raw HTML blocks through instead of omitting them
    pub allow_raw_html: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            allow_raw_html: true,
        }
    }
}

/// Load a markdown file and render it into a document tree
pub fn load_document(markdown_path: &Path, options: &MarkdownOptions) -> Result<Document> {
    info!("Rendering markdown: {:?}", markdown_path);

    // Validate input file exists
    if !markdown_path.exists() {
        return Err(CardError::PathNotFoundError(markdown_path.to_path_buf()));
    }

    let markdown_content = fs::read_to_string(markdown_path).map_err(CardError::FileReadError)?;
    parse_markdown(&markdown_content, options)
}

/// Render markdown source into a document tree
pub fn parse_markdown(source: &str, options: &MarkdownOptions) -> Result<Document> {
    let html = render_markdown(source, options);
    debug!("Rendered {} bytes of HTML", html.len());
    Document::from_html(&html)
        .map_err(|e| CardError::MarkdownError(format!("Rendered markdown is not parseable: {}", e)))
}

/// Render markdown source to an HTML fragment
pub fn render_markdown(source: &str, options: &MarkdownOptions) -> String {
    let processed = rewrite_wiki_embeds(source);

    let mut comrak_options = ComrakOptions::default();
    comrak_options.extension.strikethrough = true;
    comrak_options.extension.table = true;
    comrak_options.extension.tasklist = true;
    comrak_options.extension.footnotes = true;
    comrak_options.extension.autolink = true;
    comrak_options.extension.front_matter_delimiter = Some("---".to_string());
    comrak_options.render.unsafe_ = options.allow_raw_html;

    markdown_to_html(&processed, &comrak_options)
}

/// Convert wiki-style image embeds (`![[file.png|alt]]`) to standard markdown images
pub(crate) fn rewrite_wiki_embeds(content: &str) -> String {
    let mut result = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(start) = rest.find("![[") {
        let after_open = &rest[start + 3..];
        let Some(end) = after_open.find("]]") else {
            break;
        };
        let inner = &after_open[..end];
        if inner.contains('\n') {
            // Not an embed, keep scanning after the opener
            result.push_str(&rest[..start + 3]);
            rest = after_open;
            continue;
        }

        let (target, alt) = match inner.split_once('|') {
            Some((target, alt)) => (target.trim(), alt.trim()),
            None => (inner.trim(), inner.trim()),
        };
        result.push_str(&rest[..start]);
        result.push_str(&format!("![{}](<{}>)", alt, target));
        rest = &after_open[end + 2..];
    }

    result.push_str(rest);
    result
}

/// Utility function to write HTML content to a file
pub fn write_html_to_file(html_content: &str, output_path: &Path) -> Result<()> {
    info!("Writing HTML to file: {:?}", output_path);

    // Ensure parent directory exists
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(CardError::FileReadError)?;
        }
    }

    fs::write(output_path, html_content).map_err(CardError::FileReadError)?;

    Ok(())
}
