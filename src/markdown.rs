//! Markdown Rendering for AI Replies
//!
//! Extends pulldown-cmark with:
//! - Raw HTML in the reply is shown as text, never injected
//! - Code blocks rendered as plain escaped `<pre>` (no highlighting)
//! - Links limited to http(s)/mailto and opened in a new tab
//! - Images shown inline with a max-width constraint

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use pulldown_cmark::{html::push_html, CowStr, Event, Options, Parser, Tag, TagEnd};

use trip_core::ai::escape_html;

const URL_ENCODE_SET: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'<').add(b'>').add(b'`');

/// Parse markdown with raw HTML neutralized
pub fn parse_markdown(text: &str) -> String {
    let parser = Parser::new_ext(text, get_options());
    let events = transform_events(parser);
    let mut html_output = String::new();
    push_html(&mut html_output, events.into_iter());
    html_output
}

fn get_options() -> Options {
    Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES | Options::ENABLE_TASKLISTS
}

// State for the event transformer
enum State {
    Normal,
    InCodeBlock { content: String },
    InImage { dropped_depth: usize },
}

fn transform_events<'a>(parser: Parser<'a>) -> Vec<Event<'a>> {
    let mut events = Vec::new();
    let mut state = State::Normal;

    for event in parser {
        match state {
            State::Normal => match event {
                // Raw HTML from the model is displayed, not interpreted
                Event::Html(html) | Event::InlineHtml(html) => events.push(Event::Text(html)),

                Event::Start(Tag::CodeBlock(_)) => {
                    state = State::InCodeBlock { content: String::new() };
                }

                Event::Start(Tag::Link { dest_url, title, .. }) => {
                    let href = safe_url(&dest_url);
                    events.push(Event::Html(CowStr::from(format!(
                        r#"<a href="{}" target="_blank" rel="noopener noreferrer" title="{}">"#,
                        href,
                        escape_html(&title)
                    ))));
                }
                Event::End(TagEnd::Link) => events.push(Event::Html(CowStr::from("</a>"))),

                Event::Start(Tag::Image { dest_url, .. }) => {
                    let html = format!(
                        r#"<img src="{}" style="max-width: 100%; max-height: 300px; display: block; border-radius: 8px;" />"#,
                        safe_url(&dest_url)
                    );
                    events.push(Event::Html(CowStr::from(html)));
                    // Drop the alt text events
                    state = State::InImage { dropped_depth: 0 };
                }

                other => events.push(other),
            },

            State::InCodeBlock { ref mut content } => match event {
                Event::Text(t) => content.push_str(&t),
                Event::End(TagEnd::CodeBlock) => {
                    let html = format!("<pre dir=\"ltr\"><code>{}</code></pre>", escape_html(content));
                    events.push(Event::Html(CowStr::from(html)));
                    state = State::Normal;
                }
                _ => {}
            },

            State::InImage { ref mut dropped_depth } => match event {
                Event::Start(_) => *dropped_depth += 1,
                Event::End(_) => {
                    if *dropped_depth == 0 {
                        state = State::Normal;
                    } else {
                        *dropped_depth -= 1;
                    }
                }
                _ => {}
            },
        }
    }

    events
}

fn safe_url(url: &str) -> String {
    let lower = url.trim().to_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("mailto:") {
        utf8_percent_encode(url.trim(), URL_ENCODE_SET).to_string()
    } else {
        "#".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_html_is_escaped() {
        let html = parse_markdown("שלום <script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_links_are_restricted() {
        let html = parse_markdown("[מפה](https://maps.google.com/?q=Jet+d'Eau) [x](javascript:alert(1))");
        assert!(html.contains(r#"href="https://maps.google.com/?q=Jet+d'Eau""#));
        assert!(html.contains(r##"href="#""##));
        assert!(!html.contains("javascript:"));
    }

    #[test]
    fn test_code_blocks_are_plain() {
        let html = parse_markdown("```\n<b>x</b>\n```");
        assert!(html.contains("<pre dir=\"ltr\"><code>&lt;b&gt;x&lt;/b&gt;"));
    }
}
