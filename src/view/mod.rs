//! Server-rendered pages for the admin UI.
//!
//! Pages are deliberately plain: a layout, an optional error banner, and the
//! resource content. Every piece of user or backend text goes through [`escape`].

pub mod pages;

pub use pages::{detail, form, index, login};

use std::fmt::Write;

use crate::controller::decode::JSON_INPUT_FIELD;

/// Escape text for HTML element content and double-quoted attributes
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// A page under construction; `render` wraps it in the shared layout
#[derive(Debug, Default)]
pub struct Page {
    title: String,
    error: Option<String>,
    body: String,
}

impl Page {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn error(mut self, message: Option<String>) -> Self {
        self.error = message;
        self
    }

    pub fn heading(mut self, text: &str) -> Self {
        let _ = write!(self.body, "<h1>{}</h1>\n", escape(text));
        self
    }

    pub fn link(mut self, href: &str, text: &str) -> Self {
        let _ = write!(self.body, "<p><a href=\"{}\">{}</a></p>\n", escape(href), escape(text));
        self
    }

    pub fn json(mut self, value: &impl serde::Serialize) -> Self {
        let pretty = serde_json::to_string_pretty(value).unwrap_or_default();
        let _ = write!(self.body, "<pre>{}</pre>\n", escape(&pretty));
        self
    }

    /// Form posting the `json_input` field to `action`
    pub fn json_form(mut self, action: &str, json: &str, submit: &str) -> Self {
        let _ = write!(
            self.body,
            "<form method=\"post\" action=\"{action}\">\n\
             <textarea name=\"{field}\" rows=\"20\" cols=\"80\">{json}</textarea>\n\
             <button type=\"submit\">{submit}</button>\n\
             </form>\n",
            action = escape(action),
            field = JSON_INPUT_FIELD,
            json = escape(json),
            submit = escape(submit),
        );
        self
    }

    /// Append pre-rendered markup
    pub fn raw(mut self, html: &str) -> Self {
        self.body.push_str(html);
        self
    }

    pub fn render(&self) -> String {
        let banner = self
            .error
            .as_deref()
            .map(|message| format!("<div class=\"error\" role=\"alert\">{}</div>\n", escape(message)))
            .unwrap_or_default();
        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n<body>\n{banner}{body}</body>\n</html>\n",
            title = escape(&self.title),
            banner = banner,
            body = self.body,
        )
    }
}
