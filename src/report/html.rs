//! Small HTML helpers for the e-mail body.
//!
//! Mail clients ignore most CSS; the table style below (zebra rows, green
//! header) is the part they do honor.

pub const STYLE: &str = r#"
    body { font-family: Arial, sans-serif; color: #333; }
    ul { line-height: 1.6; }
    .tabela-relatorio { border-collapse: collapse; width: 100%; margin-top: 10px; }
    .tabela-relatorio th { background-color: #4CAF50; color: white; padding: 8px; text-align: left; }
    .tabela-relatorio td { padding: 6px; border-bottom: 1px solid #ddd; }
    .tabela-relatorio tr:nth-child(even) { background-color: #f2f2f2; }
"#;

/// Report table colors as 0xRRGGBB, shared by the e-mail body and the
/// XLSX and PDF exports.
pub const HEADER_FILL: u32 = 0x4CAF50;
pub const HEADER_TEXT: u32 = 0xFFFFFF;
pub const STRIPE_FILL: u32 = 0xF2F2F2;
pub const PLAIN_FILL: u32 = 0xFFFFFF;
pub const RULE: u32 = 0xDDDDDD;
pub const BODY_TEXT: u32 = 0x333333;

pub fn css_color(rgb: u32) -> String {
    format!("#{rgb:06x}")
}

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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

/// Table cell content: escaped text or trusted markup (links).
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Html(String),
}

impl Cell {
    fn render(&self) -> String {
        match self {
            Cell::Text(s) => escape(s),
            Cell::Html(s) => s.clone(),
        }
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

/// Header row plus zebra rows. Row colors are also inlined so clients
/// that strip `<style>` keep them.
pub fn table(headers: &[&str], rows: &[Vec<Cell>]) -> String {
    let header_cell = format!(
        "background-color:{};color:{};padding:8px;text-align:left;",
        css_color(HEADER_FILL),
        css_color(HEADER_TEXT)
    );
    let stripe = format!("background-color:{};", css_color(STRIPE_FILL));
    let plain = format!("background-color:{};", css_color(PLAIN_FILL));

    let mut out = String::from("<table class=\"tabela-relatorio\" border=\"0\">\n<thead><tr>");
    for h in headers {
        out.push_str(&format!("<th style=\"{header_cell}\">{}</th>", escape(h)));
    }
    out.push_str("</tr></thead>\n<tbody>\n");

    for (i, row) in rows.iter().enumerate() {
        // nth-child(even) is 1-based: the second row is the first striped one
        let style = if i % 2 == 1 { &stripe } else { &plain };
        out.push_str(&format!("<tr style=\"{style}\">"));
        for c in row {
            out.push_str(&format!("<td>{}</td>", c.render()));
        }
        out.push_str("</tr>\n");
    }

    out.push_str("</tbody>\n</table>\n");
    out
}

/// Italic warning paragraph used wherever a section has nothing to show.
pub fn placeholder(text: &str) -> String {
    format!("<p><i>⚠️ {}</i></p>\n", escape(text))
}

pub fn link(href: &str, text: &str) -> String {
    format!(
        "<a href=\"{}\" target=\"_blank\">{}</a>",
        escape(href),
        escape(text)
    )
}

pub fn image(cid: &str, alt: &str, width: u32) -> String {
    format!(
        "<img src=\"cid:{}\" alt=\"{}\" width=\"{}\"/><br><br>\n",
        escape(cid),
        escape(alt),
        width
    )
}

/// Free text with line breaks preserved.
pub fn paragraph(text: &str) -> String {
    format!("<p>{}</p>\n", escape(text).replace("\r\n", "\n").replace('\n', "<br>"))
}
