//! HTML fragment rendering with Tera.
//!
//! The template receives two variables:
//!
//! - `static_path`: base URL for static assets
//! - `stories`: the selected stories, each carrying every API field plus a
//!   `datetime` string (`YYYY-MM-DD HH:MM:SS` in the caller's time zone)
//!
//! Templates whose name ends in `.html` are auto-escaped.

use crate::error::{DigestError, DigestResult};
use crate::models::{RenderedStory, Story};
use crate::utils::format_timestamp;
use chrono::TimeZone;
use std::fmt::Display;
use std::path::Path;
use tera::{Context, Tera};
use tracing::{info, instrument};

/// Template shipped with the crate, relative to the working directory.
pub const DEFAULT_TEMPLATE: &str = "templates/hacker_news.html";

/// Default base URL for static assets referenced by the template.
pub const DEFAULT_STATIC_PATH: &str = "http://static.liyuan.im/rust-lang-cn";

/// A parsed template ready to render story lists.
pub struct HtmlRenderer {
    tera: Tera,
    name: String,
}

impl HtmlRenderer {
    /// Load and parse the template at `path`.
    ///
    /// The template is registered under its file name, so auto-escaping
    /// follows the file extension.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn from_file(path: &Path) -> DigestResult<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|source| DigestError::TemplateNotFound {
                path: path.display().to_string(),
                source,
            })?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("hacker_news.html");
        let renderer = Self::from_raw(name, &content)?;
        info!(name, "Loaded template");
        Ok(renderer)
    }

    pub fn from_raw(name: &str, content: &str) -> DigestResult<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(name, content)?;
        Ok(Self {
            tera,
            name: name.to_string(),
        })
    }

    /// Render `stories` with timestamps shown in `tz`.
    ///
    /// Fails if a story has no `time` or the template fails to render.
    pub fn render<Tz>(&self, static_path: &str, stories: &[Story], tz: &Tz) -> DigestResult<String>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let rendered = stories
            .iter()
            .map(|story| -> DigestResult<RenderedStory<'_>> {
                let time = story.time.ok_or(DigestError::MissingField {
                    id: story.id,
                    field: "time",
                })?;
                let datetime = format_timestamp(time, tz)
                    .ok_or(DigestError::InvalidTimestamp { id: story.id, time })?;
                Ok(RenderedStory { story, datetime })
            })
            .collect::<DigestResult<Vec<_>>>()?;

        let mut context = Context::new();
        context.insert("static_path", static_path);
        context.insert("stories", &rendered);

        Ok(self.tera.render(&self.name, &context)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use scraper::{Html, Selector};
    use std::path::PathBuf;

    const LIST: &str = r#"<ul data-static="{{ static_path }}">{% for story in stories %}<li id="s{{ story.id }}">{{ story.title | default(value="") }} @ {{ story.datetime }}{% if story.by %} by {{ story.by }}{% endif %}</li>{% endfor %}</ul>"#;

    fn story(json: &str) -> Story {
        serde_json::from_str(json).unwrap()
    }

    fn bundled_template() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_TEMPLATE)
    }

    #[test]
    fn test_render_lists_stories_with_datetime() {
        let renderer = HtmlRenderer::from_raw("list.html", LIST).unwrap();
        let stories = vec![
            story(r#"{"id": 1, "title": "Rust 1.0 released", "time": 0, "by": "steveklabnik"}"#),
            story(r#"{"id": 2, "title": "Rust 2018", "time": 86400}"#),
        ];

        let html = renderer.render("http://static.test", &stories, &Utc).unwrap();

        let doc = Html::parse_fragment(&html);
        let li = Selector::parse("li").unwrap();
        let items: Vec<String> = doc
            .select(&li)
            .map(|e| e.text().collect::<String>())
            .collect();
        assert_eq!(
            items,
            vec![
                "Rust 1.0 released @ 1970-01-01 00:00:00 by steveklabnik",
                "Rust 2018 @ 1970-01-02 00:00:00",
            ]
        );
        let ul = Selector::parse("ul").unwrap();
        let root = doc.select(&ul).next().unwrap();
        assert_eq!(root.value().attr("data-static"), Some("http://static.test"));
    }

    #[test]
    fn test_render_escapes_html() {
        let renderer = HtmlRenderer::from_raw("list.html", LIST).unwrap();
        let stories = vec![story(
            r#"{"id": 3, "title": "<script>alert('Rust')</script>", "time": 0}"#,
        )];

        let html = renderer.render("", &stories, &Utc).unwrap();

        assert!(!html.contains("<script>"));
        let doc = Html::parse_fragment(&html);
        let script = Selector::parse("script").unwrap();
        assert_eq!(doc.select(&script).count(), 0);
        let li = Selector::parse("li").unwrap();
        let text: String = doc.select(&li).next().unwrap().text().collect();
        assert!(text.starts_with("<script>alert('Rust')</script>"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let renderer = HtmlRenderer::from_raw("list.html", LIST).unwrap();
        let stories = vec![
            story(r#"{"id": 1, "title": "Rust", "time": 1431702000}"#),
            story(r#"{"id": 2, "time": 1431702001}"#),
        ];

        let first = renderer.render("s", &stories, &Utc).unwrap();
        let second = renderer.render("s", &stories, &Utc).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_render_empty_list() {
        let renderer = HtmlRenderer::from_raw("list.html", LIST).unwrap();
        let html = renderer.render("s", &[], &Utc).unwrap();
        assert_eq!(html, r#"<ul data-static="s"></ul>"#);
    }

    #[test]
    fn test_render_missing_time_is_fatal() {
        let renderer = HtmlRenderer::from_raw("list.html", LIST).unwrap();
        let stories = vec![story(r#"{"id": 4, "title": "Rust"}"#)];
        assert!(matches!(
            renderer.render("s", &stories, &Utc),
            Err(DigestError::MissingField { id: 4, field: "time" })
        ));
    }

    #[test]
    fn test_missing_template_file() {
        let result = HtmlRenderer::from_file(Path::new("does/not/exist.html"));
        assert!(matches!(result, Err(DigestError::TemplateNotFound { .. })));
    }

    #[test]
    fn test_malformed_template() {
        assert!(matches!(
            HtmlRenderer::from_raw("broken.html", "{% for story in stories %}"),
            Err(DigestError::Template(_))
        ));
    }

    #[test]
    fn test_bundled_template_renders() {
        let renderer = HtmlRenderer::from_file(&bundled_template()).unwrap();
        let stories = vec![
            story(
                r#"{"id": 9551937, "title": "Rust 1.0 released", "time": 0, "by": "steveklabnik",
                    "score": 1024, "descendants": 42, "url": "https://blog.rust-lang.org/"}"#,
            ),
            story(r#"{"id": 1, "title": "Ask HN: Rust jobs?", "time": 60}"#),
        ];

        let html = renderer
            .render(DEFAULT_STATIC_PATH, &stories, &Utc)
            .unwrap();

        let doc = Html::parse_fragment(&html);
        let links = Selector::parse("li a.story-link").unwrap();
        let hrefs: Vec<&str> = doc
            .select(&links)
            .filter_map(|a| a.value().attr("href"))
            .collect();
        assert_eq!(
            hrefs,
            vec![
                "https://blog.rust-lang.org/",
                "https://news.ycombinator.com/item?id=1",
            ]
        );
        let time = Selector::parse("time").unwrap();
        let times: Vec<String> = doc.select(&time).map(|t| t.text().collect()).collect();
        assert_eq!(times, vec!["1970-01-01 00:00:00", "1970-01-01 00:01:00"]);
        assert!(html.contains("1024 points"));
    }
}
