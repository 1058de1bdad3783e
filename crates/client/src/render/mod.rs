//! Minimal Markdown to HTML conversion for summaries.
//!
//! Supports the subset model summaries use:
//!
//! - `#`, `##`, `###` headings, all rendered as `<h4>`
//! - `* item` / `- item` lines, grouped into one `<ul>` per run
//! - `**strong**` and `*emphasis*`
//! - other non-blank lines, grouped into paragraphs with `<br>` between lines
//!
//! Input is HTML-escaped first, so summaries cannot inject markup.

use regex::Regex;
use sumlify_core::Error;

#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    strong: Regex,
    emphasis: Regex,
}

#[derive(Default)]
struct Blocks {
    html: String,
    paragraph: Vec<String>,
    list: Vec<String>,
}

impl Blocks {
    fn flush_paragraph(&mut self) {
        if !self.paragraph.is_empty() {
            self.html.push_str("<p>");
            self.html.push_str(&self.paragraph.join("<br>"));
            self.html.push_str("</p>");
            self.paragraph.clear();
        }
    }

    fn flush_list(&mut self) {
        if !self.list.is_empty() {
            self.html.push_str("<ul>");
            for item in self.list.drain(..) {
                self.html.push_str("<li>");
                self.html.push_str(&item);
                self.html.push_str("</li>");
            }
            self.html.push_str("</ul>");
        }
    }

    fn flush(&mut self) {
        self.flush_paragraph();
        self.flush_list();
    }
}

impl MarkdownRenderer {
    pub fn new() -> Result<Self, Error> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| Error::InvalidInput(format!("bad markdown pattern {pattern}: {e}")))
        };
        Ok(Self { strong: compile(r"\*\*(.+?)\*\*")?, emphasis: compile(r"\*(.+?)\*")? })
    }

    /// Render `markdown` to an HTML fragment.
    pub fn render(&self, markdown: &str) -> String {
        let escaped = escape_html(markdown);
        let mut blocks = Blocks::default();

        for line in escaped.lines() {
            let line = line.trim_end();

            if line.trim().is_empty() {
                blocks.flush();
            } else if let Some(heading) = heading_text(line) {
                blocks.flush();
                blocks.html.push_str("<h4>");
                blocks.html.push_str(&self.inline(heading));
                blocks.html.push_str("</h4>");
            } else if let Some(item) = line.strip_prefix("* ").or_else(|| line.strip_prefix("- ")) {
                blocks.flush_paragraph();
                blocks.list.push(self.inline(item.trim()));
            } else {
                blocks.flush_list();
                blocks.paragraph.push(self.inline(line.trim()));
            }
        }

        blocks.flush();
        blocks.html
    }

    fn inline(&self, text: &str) -> String {
        let strong = self.strong.replace_all(text, "<strong>$1</strong>");
        self.emphasis.replace_all(&strong, "<em>$1</em>").into_owned()
    }
}

fn heading_text(line: &str) -> Option<&str> {
    ["### ", "## ", "# "]
        .iter()
        .find_map(|marker| line.strip_prefix(marker))
        .map(str::trim)
}

/// Escape the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
