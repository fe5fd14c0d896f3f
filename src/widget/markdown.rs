//! Markdown-lite rendering for agent replies.
//!
//! Text is escaped before any transform runs, so the only tags in the output
//! are the ones produced here: `<pre>`, `<code>`, `<a>`, `<p>` and `<br>`.

use once_cell::sync::Lazy;
use regex::{ Captures, Regex };

static FENCED_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```(.*?)```").expect("valid regex"));
static INLINE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]+)`").expect("valid regex"));
static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid regex"));
static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\n+").expect("valid regex"));
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

fn is_safe_href(href: &str) -> bool {
    let lower = href.trim_start().to_ascii_lowercase();
    ["http://", "https://", "mailto:", "/", "#"].iter().any(|prefix| lower.starts_with(prefix))
}

/// Applies the markdown-lite transforms to text that is already escaped.
pub fn md_to_html(escaped: &str) -> String {
    let out = FENCED_BLOCK.replace_all(escaped, |caps: &Captures| {
        let code = &caps[1];
        let code = code.strip_suffix('\n').unwrap_or(code);
        format!("<pre><code>{}</code></pre>", code)
    });

    let out = INLINE_CODE.replace_all(&out, "<code>$1</code>");

    let out = LINK.replace_all(&out, |caps: &Captures| {
        let (label, href) = (&caps[1], &caps[2]);
        if is_safe_href(href) {
            format!("<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>", href, label)
        } else {
            label.to_string()
        }
    });

    let out = PARAGRAPH_BREAK.replace_all(&out, "</p><p>");
    format!("<p>{}</p>", out.replace('\n', "<br>"))
}

/// Escapes and renders an agent reply.
pub fn render_agent_text(text: &str) -> String {
    md_to_html(&escape_html(text))
}

/// Turns rendered message markup back into plain text for text-only frontends.
pub fn to_plain_text(html: &str) -> String {
    let text = html.replace("</p><p>", "\n\n").replace("<br>", "\n");
    let text = TAG.replace_all(&text, "");
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&amp;", "&")
}
