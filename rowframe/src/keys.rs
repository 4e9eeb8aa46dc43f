//! Keyboard input understood by the engine.
//!
//! Hosts translate their own key events into [`NavKey`] and hand them to
//! [`TableEngine::handle_key`](crate::TableEngine::handle_key).

use crate::focus::FocusMove;
use crate::selection::SelectionDelta;

/// Navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavKey {
    /// Arrow up
    Up,
    /// Arrow down
    Down,
    /// Page up
    PageUp,
    /// Page down
    PageDown,
    /// Home
    Home,
    /// End
    End,
    /// Enter/Return: activate the focused row
    Enter,
    /// Space: toggle selection of the focused row
    Space,
    /// Escape: abort a column drag
    Escape,
    /// Ctrl+A
    SelectAll,
}

/// Result of expanding or collapsing a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Nothing focused, or the focused row isn't expandable.
    Ignored,
    /// The row's expansion flipped.
    Toggled { index: usize, expanded: bool },
}

/// What handling a key did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    Focus(FocusMove),
    Activated(Activation),
    Selection(SelectionDelta),
    ResizeCancelled,
    Ignored,
}
