//! Rendering of Graph items as text or HTML.
//!
//! Facebook returns dates either as ISO 8601 strings or as unix timestamps
//! depending on the endpoint; [`date_str`] accepts both and renders a
//! human-friendly representation in the user's time zone (almost RFC 2822).

use chrono::{DateTime, Local, Utc};
use clap::ValueEnum;
use serde_json::Value;

use crate::types::Item;

pub const WWW_BASE: &str = "https://www.facebook.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Html,
}

/// What to do with a field that is present but empty.
///
/// Graph objects carry `message`/`description` fields that may be absent,
/// empty, or populated; whether empty renders as a blank line or is dropped
/// is a rendering decision, configured here and never in the pagination
/// engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyFields {
    #[default]
    Skip,
    Blank,
}

#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    pub format: OutputFormat,
    pub empty_fields: EmptyFields,
}

impl Renderer {
    pub fn new(format: OutputFormat) -> Self {
        Renderer {
            format,
            empty_fields: EmptyFields::default(),
        }
    }

    pub fn with_empty_fields(mut self, policy: EmptyFields) -> Self {
        self.empty_fields = policy;
        self
    }

    /// Renders one output line. HTML output is indented and gets a `<br>`
    /// so the page reads like the terminal output.
    pub fn render(&self, s: &str) -> String {
        match self.format {
            OutputFormat::Text => s.to_string(),
            OutputFormat::Html => format!("  {}<br>", s),
        }
    }

    pub fn write(&self, s: &str) {
        println!("{}", self.render(s));
    }

    pub fn link(&self, path: &str) -> String {
        let url = format!("{}/{}", WWW_BASE, path);
        match self.format {
            OutputFormat::Text => url,
            OutputFormat::Html => format!("<a href=\"{url}\">{url}</a>"),
        }
    }

    /// A string field of `item`, subject to the empty-field policy: absent
    /// fields are always skipped, empty ones only under [`EmptyFields::Skip`].
    pub fn visible_field<'a>(&self, item: &'a Item, key: &str) -> Option<&'a str> {
        let value = item.get(key)?.as_str()?;
        if value.is_empty() {
            match self.empty_fields {
                EmptyFields::Skip => None,
                EmptyFields::Blank => Some(value),
            }
        } else {
            Some(value)
        }
    }
}

/// Link path for a full post id of the form `{profile}_{post}`.
pub fn post_path(full_post_id: &str) -> String {
    match full_post_id.split_once('_') {
        Some((profile_id, post_id)) => format!("{}/posts/{}", profile_id, post_id),
        None => full_post_id.to_string(),
    }
}

/// Parses a Graph date, which is ISO 8601 (`2017-08-01T12:34:56+0000`) or a
/// unix timestamp depending on the endpoint.
pub fn parse_graph_time(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => {
            let secs = n.as_i64()?;
            DateTime::from_timestamp(secs, 0)
        }
        Value::String(s) => DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z")
            .or_else(|_| DateTime::parse_from_rfc3339(s))
            .ok()
            .map(|t| t.with_timezone(&Utc)),
        _ => None,
    }
}

/// Human-friendly local-time rendering of a Graph date. Falls back to the
/// raw value when it is not a date at all.
pub fn date_str(value: &Value) -> String {
    match parse_graph_time(value) {
        Some(t) => t
            .with_timezone(&Local)
            .format("%a, %-d %b %Y %H:%M:%S %Z")
            .to_string(),
        None => value.as_str().unwrap_or("unknown").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(json: Value) -> Item {
        json.as_object().unwrap().clone()
    }

    #[test]
    fn text_render_is_verbatim_and_html_wraps() {
        let text = Renderer::new(OutputFormat::Text);
        let html = Renderer::new(OutputFormat::Html);
        assert_eq!(text.render("hello"), "hello");
        assert_eq!(html.render("hello"), "  hello<br>");
        assert_eq!(html.render(""), "  <br>");
    }

    #[test]
    fn links_become_anchors_in_html() {
        let text = Renderer::new(OutputFormat::Text);
        let html = Renderer::new(OutputFormat::Html);
        assert_eq!(text.link("123"), "https://www.facebook.com/123");
        assert_eq!(
            html.link("123"),
            "<a href=\"https://www.facebook.com/123\">https://www.facebook.com/123</a>"
        );
    }

    #[test]
    fn empty_field_policy_is_per_renderer() {
        let data = item(json!({"message": "", "name": "x"}));

        let skip = Renderer::new(OutputFormat::Text);
        assert_eq!(skip.visible_field(&data, "message"), None);
        assert_eq!(skip.visible_field(&data, "name"), Some("x"));
        assert_eq!(skip.visible_field(&data, "absent"), None);

        let blank = Renderer::new(OutputFormat::Text).with_empty_fields(EmptyFields::Blank);
        assert_eq!(blank.visible_field(&data, "message"), Some(""));
        assert_eq!(blank.visible_field(&data, "absent"), None);
    }

    #[test]
    fn post_path_splits_on_first_underscore() {
        assert_eq!(post_path("10_20_30"), "10/posts/20_30");
        assert_eq!(post_path("oddball"), "oddball");
    }

    #[test]
    fn parses_both_wire_date_forms() {
        let iso = parse_graph_time(&json!("2017-08-01T12:34:56+0000")).unwrap();
        assert_eq!(iso.timestamp(), 1501590896);

        let unix = parse_graph_time(&json!(1501590896)).unwrap();
        assert_eq!(unix, iso);

        assert!(parse_graph_time(&json!(null)).is_none());
        assert!(parse_graph_time(&json!("not a date")).is_none());
    }

    #[test]
    fn date_str_falls_back_to_raw_value() {
        assert_eq!(date_str(&json!("not a date")), "not a date");
        let rendered = date_str(&json!(1501590896));
        assert!(rendered.contains("2017"));
    }
}
