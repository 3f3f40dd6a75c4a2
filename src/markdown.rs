//! Lightweight Markdown-to-HTML rendering for analysis text.
//!
//! This is not a CommonMark implementation. The backend emits a small,
//! predictable Markdown subset and the renderer applies a fixed, ordered
//! set of transformation stages over it; each stage is its own function so
//! its precedence can be tested in isolation. Two deliberate quirks are
//! kept from the original behaviour: ordered and unordered items share one
//! generic `<ul>` wrapper, and the whole document ends up inside a single
//! outer `<p>` even when it contains block elements.
//!
//! `render` is total: any input maps to some output, empty in gives empty
//! out, and there is no error channel.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::trace;

static FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```(.*?)```").expect("valid pattern"));
static H3: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^### (.*)$").expect("valid pattern"));
static H2: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^## (.*)$").expect("valid pattern"));
static H1: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^# (.*)$").expect("valid pattern"));
static BOLD_ITALIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*\*(.+?)\*\*\*").expect("valid pattern"));
static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid pattern"));
static ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.+?)\*").expect("valid pattern"));
static INLINE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`(.+?)`").expect("valid pattern"));
static UNORDERED_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\* (.+)$").expect("valid pattern"));
static ORDERED_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\d+\. (.+)$").expect("valid pattern"));
static LIST_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:<li>[^\n]*</li>\n)*<li>[^\n]*</li>").expect("valid pattern"));
static LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid pattern"));

/// Delimits fence placeholders. Control character, never produced by the
/// backend's text output.
const FENCE_MARK: char = '\u{1}';

/// Render raw Markdown to an HTML string.
///
/// Stage order is fixed and matters: fenced code is lifted out before
/// anything else so no inline rule can touch it, headings run before
/// emphasis, lists before links, and paragraph normalization last.
pub fn render(markdown: &str) -> String {
    if markdown.is_empty() {
        return String::new();
    }

    let (lifted, fences) = lift_fences(markdown);
    let out = headings(&lifted);
    let out = emphasis(&out);
    let out = inline_code(&out);
    let out = lists(&out);
    let out = links(&out);
    let out = paragraphs(&out);
    let html = restore_fences(&out, &fences);
    trace!(input_len = markdown.len(), output_len = html.len(), "rendered analysis markdown");
    html
}

/// Replace every fenced block with an opaque placeholder and hand back the
/// captured contents. Contents are kept verbatim, language tag line and all.
fn lift_fences(input: &str) -> (String, Vec<String>) {
    let mut fences = Vec::new();
    let out = FENCE
        .replace_all(input, |caps: &Captures| {
            let token = format!("{FENCE_MARK}{}{FENCE_MARK}", fences.len());
            fences.push(caps[1].to_string());
            token
        })
        .into_owned();
    (out, fences)
}

fn restore_fences(input: &str, fences: &[String]) -> String {
    let mut out = input.to_string();
    for (index, content) in fences.iter().enumerate() {
        let token = format!("{FENCE_MARK}{index}{FENCE_MARK}");
        out = out.replace(&token, &format!("<pre><code>{content}</code></pre>"));
    }
    out
}

/// Lines starting with 1-3 `#` plus a space become headings of matching
/// level. Longest prefix first so `###` is never half-eaten by `#`.
/// Mid-line `#` is untouched, as are four or more.
fn headings(input: &str) -> String {
    let out = H3.replace_all(input, "<h3>${1}</h3>");
    let out = H2.replace_all(&out, "<h2>${1}</h2>");
    H1.replace_all(&out, "<h1>${1}</h1>").into_owned()
}

/// Minimal-span emphasis, longest delimiter first: `***` then `**` then `*`.
fn emphasis(input: &str) -> String {
    let out = BOLD_ITALIC.replace_all(input, "<strong><em>${1}</em></strong>");
    let out = BOLD.replace_all(&out, "<strong>${1}</strong>");
    ITALIC.replace_all(&out, "<em>${1}</em>").into_owned()
}

fn inline_code(input: &str) -> String {
    INLINE_CODE.replace_all(input, "<code>${1}</code>").into_owned()
}

/// `* ` and `N. ` prefixed lines become items; each contiguous run of item
/// lines gets exactly one generic `<ul>` wrapper. Marker type is not
/// tracked, so ordered items land in the same container.
fn lists(input: &str) -> String {
    let out = UNORDERED_ITEM.replace_all(input, "<li>${1}</li>");
    let out = ORDERED_ITEM.replace_all(&out, "<li>${1}</li>");
    LIST_RUN.replace_all(&out, "<ul>${0}</ul>").into_owned()
}

fn links(input: &str) -> String {
    LINK.replace_all(input, "<a href=\"${2}\">${1}</a>").into_owned()
}

/// Blank lines split paragraphs, lone newlines become `<br>`, and the whole
/// document is wrapped in one outer `<p>`.
fn paragraphs(input: &str) -> String {
    let out = input.replace("\n\n", "</p><p>");
    let out = out.replace('\n', "<br>");
    format!("<p>{out}</p>")
}
