//! Text-transform engine: converts freeform note text into block-structured
//! markup with an ordered chain of substitution rules, no AST.
//!
//! The stage order is load-bearing: fenced code is extracted before any
//! other rule so its interior stays inert, bold runs before italic so a
//! single-marker pass cannot re-match double-marker output, and the image
//! pattern runs before the link pattern it is a superset of.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static FENCED_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```(.*?)```").unwrap());
static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^(#{1,3}) (.*)$").unwrap());
static BOLD_STARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*([^*]+)\*\*").unwrap());
static BOLD_UNDERSCORES: Lazy<Regex> = Lazy::new(|| Regex::new(r"__([^_]+)__").unwrap());
static INLINE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`\n]+)`").unwrap());
static ITALIC_STAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*([^*\n]+)\*").unwrap());
static ITALIC_UNDERSCORE: Lazy<Regex> = Lazy::new(|| Regex::new(r"_([^_\n]+)_").unwrap());
static IMAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").unwrap());
static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap());
static BLOCKQUOTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^> (.*)$").unwrap());
static HORIZONTAL_RULE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^---$").unwrap());
static UNORDERED_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[*-] (.*)$").unwrap());
static ORDERED_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\d+\. (.*)$").unwrap());
static LIST_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<li>[^\n]*</li>(?:\n<li>[^\n]*</li>)*").unwrap());

/// Tags whose paragraph wrapper is stripped in the final pass.
const BLOCK_TAGS: [&str; 6] = ["h1", "h2", "h3", "ul", "blockquote", "pre"];

/// Converts note text to structured markup.
///
/// Pure: the same input always yields byte-identical output. The `<` and
/// `>` characters are escaped inside code contexts so markup-like user
/// text cannot inject structure from within a code block; full
/// sanitization of hostile input is the rendering surface's concern.
pub fn render_markup(text: &str) -> String {
    let text = text.replace("\r\n", "\n");
    let (text, blocks) = extract_fenced_blocks(&text);
    let text = headings(&text);
    let text = bold(&text);
    let text = inline_code(&text);
    let text = italics(&text);
    let text = images_and_links(&text);
    let text = blockquotes(&text);
    let text = horizontal_rules(&text);
    let text = list_items(&text);
    let text = wrap_lists(&text);
    let text = paragraphs(&text);
    let text = restore_fenced_blocks(&text, &blocks);
    normalize_paragraphs(&text)
}

fn escape_angles(text: &str) -> String {
    text.replace('<', "&lt;").replace('>', "&gt;")
}

/// Pulls fenced code blocks out of the text, replacing each with an inert
/// placeholder restored after every other rule has run.
fn extract_fenced_blocks(text: &str) -> (String, Vec<String>) {
    let mut blocks = Vec::new();
    let replaced = FENCED_BLOCK.replace_all(text, |caps: &Captures| {
        let inner = caps.get(1).map_or("", |m| m.as_str());
        let inner = inner.strip_prefix('\n').unwrap_or(inner);
        let inner = inner.strip_suffix('\n').unwrap_or(inner);
        let index = blocks.len();
        blocks.push(format!("<pre><code>{}</code></pre>", escape_angles(inner)));
        format!("\u{0}{index}\u{0}")
    });
    (replaced.into_owned(), blocks)
}

fn restore_fenced_blocks(text: &str, blocks: &[String]) -> String {
    let mut out = text.to_string();
    for (index, block) in blocks.iter().enumerate() {
        out = out.replace(&format!("\u{0}{index}\u{0}"), block);
    }
    out
}

/// `# ` through `### ` heading lines.
fn headings(text: &str) -> String {
    HEADING
        .replace_all(text, |caps: &Captures| {
            let level = caps[1].len();
            format!("<h{level}>{}</h{level}>", &caps[2])
        })
        .into_owned()
}

fn bold(text: &str) -> String {
    let text = BOLD_STARS.replace_all(text, "<strong>${1}</strong>");
    BOLD_UNDERSCORES
        .replace_all(&text, "<strong>${1}</strong>")
        .into_owned()
}

fn inline_code(text: &str) -> String {
    INLINE_CODE
        .replace_all(text, |caps: &Captures| {
            format!("<code>{}</code>", escape_angles(&caps[1]))
        })
        .into_owned()
}

/// Single-marker emphasis. Runs after [`bold`], and the character classes
/// cannot cross a leftover double marker, so rule-3 output is never
/// re-emphasized.
fn italics(text: &str) -> String {
    let text = ITALIC_STAR.replace_all(text, "<em>${1}</em>");
    ITALIC_UNDERSCORE
        .replace_all(&text, "<em>${1}</em>")
        .into_owned()
}

/// Image syntax first: it is a superset of link syntax with a leading `!`.
fn images_and_links(text: &str) -> String {
    let text = IMAGE.replace_all(text, r#"<img src="${2}" alt="${1}">"#);
    LINK.replace_all(&text, r#"<a href="${2}">${1}</a>"#)
        .into_owned()
}

fn blockquotes(text: &str) -> String {
    BLOCKQUOTE
        .replace_all(text, "<blockquote>${1}</blockquote>")
        .into_owned()
}

/// A line of exactly three hyphens.
fn horizontal_rules(text: &str) -> String {
    HORIZONTAL_RULE.replace_all(text, "<hr>").into_owned()
}

fn list_items(text: &str) -> String {
    let text = UNORDERED_ITEM.replace_all(text, "<li>${1}</li>");
    ORDERED_ITEM
        .replace_all(&text, "<li>${1}</li>")
        .into_owned()
}

/// Wraps each contiguous run of list items in one `<ul>`. The run pattern
/// matches whole runs at once, so a run is never wrapped twice.
fn wrap_lists(text: &str) -> String {
    LIST_RUN
        .replace_all(text, |caps: &Captures| {
            format!("<ul>{}</ul>", caps[0].replace('\n', ""))
        })
        .into_owned()
}

/// Double newlines become paragraph breaks, single newlines line breaks,
/// and the whole result is wrapped in one paragraph.
fn paragraphs(text: &str) -> String {
    let text = text.replace("\n\n", "</p><p>");
    let text = text.replace('\n', "<br>");
    format!("<p>{text}</p>")
}

/// Strips paragraph wrappers that immediately surround a block element and
/// removes empty paragraphs.
fn normalize_paragraphs(text: &str) -> String {
    let mut out = text.to_string();
    for tag in BLOCK_TAGS {
        out = out.replace(&format!("<p><{tag}>"), &format!("<{tag}>"));
        out = out.replace(&format!("</{tag}></p>"), &format!("</{tag}>"));
    }
    out = out.replace("<p><hr>", "<hr>");
    out = out.replace("<hr></p>", "<hr>");
    out.replace("<p></p>", "")
}
