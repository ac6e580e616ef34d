//! An allowlist sanitizer for markup returned by the assistant.
//!
//! The assistant may answer with rich text containing hyperlinks, so its
//! output can't simply be escaped. Instead, the only element that survives
//! is an anchor that opens in a new tab; every other element is reduced to
//! its text.
//!
//! Sanitizing happens in two passes. A textual pre-pass strips `<script>`
//! blocks and quoted inline event handlers, then the remainder is parsed into
//! a detached tree and re-serialized from that tree, keeping only allowed
//! anchors. Text is always re-escaped on output, so the result is a fixed
//! point: sanitizing it again yields the same string.

use std::sync::OnceLock;

use regex::Regex;
use scraper::node::{Element, Node};
use scraper::{ElementRef, Html};

/// Elements whose content is dropped instead of unwrapped.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// URL schemes that execute code when a link is followed.
const EXECUTABLE_SCHEMES: &[&str] = &["javascript:", "vbscript:", "data:"];

fn script_block_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>")
            .expect("script block pattern is valid")
    })
}

fn event_handler_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Matches e.g. `onclick="..."` but not `person_id="..."`.
        Regex::new(r#"(?i)\bon\w+\s*=\s*"[^"]*""#)
            .expect("event handler pattern is valid")
    })
}

/// Sanitizes `input` so that it is safe to inject into a page.
///
/// The only markup left in the output is `<a href="..." target="_blank">`
/// anchors whose `href` does not use an executable scheme. Everything else
/// is reduced to escaped text. This function never fails: markup the parser
/// can't make sense of ends up as text.
pub fn sanitize(input: &str) -> String {
    let without_scripts = script_block_regex().replace_all(input, "");
    let without_handlers =
        event_handler_regex().replace_all(&without_scripts, "");

    let fragment = Html::parse_fragment(&without_handlers);
    let mut output = String::with_capacity(without_handlers.len());
    write_children(fragment.root_element(), false, &mut output);

    if output.len() != input.len() {
        trace!("sanitized {} bytes into {}", input.len(), output.len());
    }
    output
}

fn write_children(parent: ElementRef<'_>, in_link: bool, output: &mut String) {
    for child in parent.children() {
        match child.value() {
            Node::Text(text) => escape_into(text, output),
            Node::Element(_) => {
                if let Some(element) = ElementRef::wrap(child) {
                    write_element(element, in_link, output);
                }
            }
            // Comments, doctypes and processing instructions.
            _ => {}
        }
    }
}

fn write_element(element: ElementRef<'_>, in_link: bool, output: &mut String) {
    let name = element.value().name();
    if RAW_TEXT_ELEMENTS.contains(&name) {
        return;
    }

    if name == "a" && !in_link {
        if let Some(href) = allowed_href(element.value()) {
            output.push_str("<a href=\"");
            escape_into(href, output);
            output.push_str("\" target=\"_blank\">");
            write_children(element, true, output);
            output.push_str("</a>");
            return;
        }
        debug!("unwrapping a disallowed anchor");
    }

    write_children(element, in_link, output);
}

/// Returns the `href` of an anchor if the anchor is allowed to stay.
fn allowed_href(anchor: &Element) -> Option<&str> {
    let opens_new_tab = anchor
        .attr("target")
        .is_some_and(|target| target.eq_ignore_ascii_case("_blank"));
    if !opens_new_tab {
        return None;
    }

    let href = anchor.attr("href")?;
    if has_executable_scheme(href) {
        return None;
    }
    Some(href)
}

fn has_executable_scheme(href: &str) -> bool {
    // Browsers skip whitespace and control characters while reading the
    // scheme, so `java\tscript:` is still `javascript:`.
    let scheme: String = href
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_ascii_control())
        .take(16)
        .collect::<String>()
        .to_ascii_lowercase();
    EXECUTABLE_SCHEMES
        .iter()
        .any(|executable| scheme.starts_with(executable))
}

fn escape_into(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            _ => output.push(c),
        }
    }
}
