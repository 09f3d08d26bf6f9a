//! Text to markdown rendering.
//!
//! The first line of the trimmed text becomes an H1 title and the remaining
//! lines the body. This is the whole conversion: a real backend would slot
//! in behind [`MarkdownConverter`](crate::providers::MarkdownConverter)
//! without changing the cache contract.

/// Title used when the input has no usable first line.
pub const DEFAULT_TITLE: &str = "Converted Document";

/// Maximum title length, in characters.
pub const MAX_TITLE_CHARS: usize = 50;

/// Render `text` as a markdown document.
///
/// Pure and total. Single-line input has an empty body, so the trimmed
/// text is echoed beneath the title.
///
/// ```rust
/// assert_eq!(mdmint::to_markdown("hello world"), "# hello world\n\nhello world\n");
/// ```
pub fn to_markdown(text: &str) -> String {
    let trimmed = text.trim();
    let mut lines = trimmed.split('\n');

    let title = match lines.next().map(truncate_title) {
        Some(first) if !first.is_empty() => first,
        _ => DEFAULT_TITLE,
    };

    let rest: Vec<&str> = lines.collect();
    let body = rest.join("\n");
    let body = body.trim();
    let body = if body.is_empty() { trimmed } else { body };

    format!("# {title}\n\n{body}\n")
}

/// Cut `line` to at most [`MAX_TITLE_CHARS`] characters.
fn truncate_title(line: &str) -> &str {
    match line.char_indices().nth(MAX_TITLE_CHARS) {
        Some((idx, _)) => &line[..idx],
        None => line,
    }
}
