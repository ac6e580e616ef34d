//! Transcript-related types.

/// Who authored a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// The visitor.
    User,
    /// The museum assistant.
    Assistant,
}

/// A message in the transcript.
///
/// The text is stored exactly as it was typed or received. Assistant text
/// may contain markup and is only sanitized when it is rendered.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Message {
    role: Role,
    text: String,
}

impl Message {
    #[inline]
    pub(crate) fn user<S: Into<String>>(text: S) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    #[inline]
    pub(crate) fn assistant<S: Into<String>>(text: S) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }

    /// Returns the author of this message.
    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the raw text of this message.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// The chronological record of one open session of the widget.
///
/// Messages are only ever appended. They are never reordered, edited or
/// deduplicated.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Creates a transcript holding only the assistant's greeting.
    #[inline]
    pub(crate) fn seeded<S: Into<String>>(greeting: S) -> Self {
        Self {
            messages: vec![Message::assistant(greeting)],
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Returns all messages in insertion order.
    #[inline]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the number of messages.
    #[inline]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns `true` if the transcript holds no messages.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Returns the most recent message.
    #[inline]
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}
