//! The toggle that shows and hides the widget.

use crate::Widget;

/// What the launcher displays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LauncherGlyph {
    /// The widget is closed; clicking opens it.
    Chat,
    /// The widget is open; clicking closes it.
    Close,
}

impl LauncherGlyph {
    /// Returns a textual symbol for the glyph.
    #[inline]
    pub fn symbol(&self) -> &'static str {
        match self {
            LauncherGlyph::Chat => "💬",
            LauncherGlyph::Close => "✕",
        }
    }
}

/// A two-state toggle that owns the widget's `open` flag on behalf of the
/// host page.
///
/// Hosts should forward the widget's close callback to
/// [`set_open(false)`](Self::set_open), so that the launcher and the widget
/// never disagree.
#[derive(Clone)]
pub struct Launcher {
    widget: Widget,
    open: bool,
}

impl Launcher {
    /// Creates a closed launcher for `widget`.
    #[inline]
    pub fn new(widget: Widget) -> Self {
        Self {
            widget,
            open: false,
        }
    }

    /// Returns whether the widget is shown.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Returns what the launcher should display.
    #[inline]
    pub fn glyph(&self) -> LauncherGlyph {
        if self.open {
            LauncherGlyph::Close
        } else {
            LauncherGlyph::Chat
        }
    }

    /// Flips the flag.
    #[inline]
    pub fn toggle(&mut self) {
        self.set_open(!self.open);
    }

    /// Sets the flag and forwards it to the widget.
    pub fn set_open(&mut self, open: bool) {
        if self.open == open {
            return;
        }
        self.open = open;
        self.widget.set_open(open);
    }

    /// Returns the widget this launcher controls.
    #[inline]
    pub fn widget(&self) -> &Widget {
        &self.widget
    }
}
