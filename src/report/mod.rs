//! Report document model and builder.
//!
//! The builder only knows about named sections and inline images keyed by
//! content id; it never touches a mail library. The mail dispatcher turns
//! the finished `Report` into a wire message.

pub mod chart;
pub mod compose;
pub mod html;
pub mod slots;

pub use chart::{ChartRenderer, ChartStyle, ValueLabel, exploded_slices};
pub use compose::{ReportContext, ReportSettings, compose};
pub use slots::{ChartMetric, ChartSlot};

use sha2::{Digest, Sha256};

pub const PNG: &str = "image/png";

const IMG_SRC_CID: &str = "src=\"cid:";

#[derive(Debug, Clone, PartialEq)]
pub struct InlineImage {
    /// Bare id; referenced as `cid:<id>` and sent as `Content-ID: <id>`.
    pub content_id: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Composed, ready-to-send document.
#[derive(Debug, Clone)]
pub struct Report {
    pub subject: String,
    pub html: String,
    pub images: Vec<InlineImage>,
}

impl Report {
    pub fn image(&self, content_id: &str) -> Option<&InlineImage> {
        self.images.iter().find(|i| i.content_id == content_id)
    }

    /// Content ids used as image sources in the HTML body, in order.
    ///
    /// Only `src="cid:..."` attributes count. Free text is escaped before it
    /// lands in the body, so a literal `cid:` typed in the notes can never
    /// produce a quoted attribute.
    pub fn referenced_cids(&self) -> Vec<String> {
        self.html
            .split(IMG_SRC_CID)
            .skip(1)
            .filter_map(|rest| rest.split('"').next())
            .map(|s| s.to_string())
            .collect()
    }
}

pub struct ReportBuilder {
    title: String,
    header: Vec<String>,
    sections: Vec<(String, String)>,
    closing: Option<String>,
    images: Vec<InlineImage>,
}

impl ReportBuilder {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            header: Vec::new(),
            sections: Vec::new(),
            closing: None,
            images: Vec::new(),
        }
    }

    /// Paragraph under the title (already HTML).
    pub fn header_line(&mut self, html: String) -> &mut Self {
        self.header.push(html);
        self
    }

    pub fn section(&mut self, title: &str, body_html: String) -> &mut Self {
        self.sections.push((title.to_string(), body_html));
        self
    }

    /// Untitled block appended after every section (signature).
    pub fn closing(&mut self, html: String) -> &mut Self {
        self.closing = Some(html);
        self
    }

    /// Register an image and return its content id. The id is derived from
    /// the bytes, so identical images collapse into one part.
    pub fn attach(&mut self, prefix: &str, content_type: &str, bytes: Vec<u8>) -> String {
        let digest = hex::encode(Sha256::digest(&bytes));
        let content_id = format!("{}-{}", prefix, &digest[..16]);

        if self.images.iter().all(|i| i.content_id != content_id) {
            self.images.push(InlineImage {
                content_id: content_id.clone(),
                content_type: content_type.to_string(),
                bytes,
            });
        }
        content_id
    }

    pub fn build(self, subject: &str) -> Report {
        let mut body = String::new();
        body.push_str("<html>\n<head>\n<meta charset=\"utf-8\">\n<style>");
        body.push_str(html::STYLE);
        body.push_str("</style>\n</head>\n<body>\n");
        body.push_str(&format!("<h2>📅 {}</h2>\n", html::escape(&self.title)));

        for line in &self.header {
            body.push_str(line);
        }

        for (title, content) in &self.sections {
            body.push_str(&format!("<h3>{}</h3>\n", html::escape(title)));
            body.push_str(content);
        }

        if let Some(closing) = &self.closing {
            body.push_str(closing);
        }

        body.push_str("</body>\n</html>\n");

        Report {
            subject: subject.to_string(),
            html: body,
            images: self.images,
        }
    }
}
