//! Safe rendering of the transcript.
//!
//! Hosts never receive raw assistant markup. Assistant text is passed
//! through the [sanitizer](crate::sanitizer) on its way out and handed over
//! as [`SanitizedHtml`], which can only be built by sanitizing. Hosts that
//! can't (or don't want to) inject markup at all can break it down into
//! [`Segment`]s and render those with their own templating.

use std::fmt::{self, Display, Formatter};

use scraper::node::Node;
use scraper::{ElementRef, Html};

use crate::conversation::{Message, Role, Transcript};
use crate::sanitizer::sanitize;

/// Markup that has passed through the sanitizer.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SanitizedHtml(String);

impl SanitizedHtml {
    /// Sanitizes `raw` markup.
    #[inline]
    pub fn new(raw: &str) -> Self {
        Self(sanitize(raw))
    }

    /// Returns the sanitized markup.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Breaks the markup down into plain text runs and links.
    ///
    /// Text in the returned segments is unescaped and must be treated as
    /// plain text by the host.
    pub fn segments(&self) -> Vec<Segment> {
        let fragment = Html::parse_fragment(&self.0);
        let mut segments = Vec::new();
        for child in fragment.root_element().children() {
            match child.value() {
                Node::Text(text) => push_text(&mut segments, text),
                Node::Element(element) if element.name() == "a" => {
                    let Some(anchor) = ElementRef::wrap(child) else {
                        continue;
                    };
                    segments.push(Segment::Link {
                        href: element.attr("href").unwrap_or_default().to_owned(),
                        text: anchor.text().collect(),
                    });
                }
                // Sanitized markup holds nothing else.
                _ => {}
            }
        }
        segments
    }
}

impl Display for SanitizedHtml {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn push_text(segments: &mut Vec<Segment>, text: &str) {
    if let Some(Segment::Text(last)) = segments.last_mut() {
        last.push_str(text);
    } else {
        segments.push(Segment::Text(text.to_owned()));
    }
}

/// A piece of displayable assistant content.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Plain text.
    Text(String),
    /// A link that opens in a new tab.
    Link {
        /// The link target.
        href: String,
        /// The link label.
        text: String,
    },
}

/// The displayable content of a message.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RenderedContent {
    /// Plain text typed by the visitor; never to be interpreted as markup.
    Text(String),
    /// Sanitized assistant markup.
    Markup(SanitizedHtml),
}

/// A message ready to be displayed.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RenderedMessage {
    /// Who authored the message.
    pub role: Role,
    /// What to display.
    pub content: RenderedContent,
}

impl RenderedMessage {
    /// Renders a single message.
    pub fn from_message(message: &Message) -> Self {
        let content = match message.role() {
            Role::User => RenderedContent::Text(message.text().to_owned()),
            Role::Assistant => {
                RenderedContent::Markup(SanitizedHtml::new(message.text()))
            }
        };
        Self {
            role: message.role(),
            content,
        }
    }
}

/// Renders every message of the transcript, in order.
pub fn render_transcript(transcript: &Transcript) -> Vec<RenderedMessage> {
    transcript
        .messages()
        .iter()
        .map(RenderedMessage::from_message)
        .collect()
}
