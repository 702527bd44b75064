use streaming::Point;

use crate::engine::RefreshOutcome;
use crate::renderer::Cursor;

/// Whether map clicks create points.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum MarkMode {
    #[default]
    Inactive,
    Active,
}

impl MarkMode {
    pub fn toggled(self) -> Self {
        match self {
            MarkMode::Inactive => MarkMode::Active,
            MarkMode::Active => MarkMode::Inactive,
        }
    }

    pub fn is_active(self) -> bool {
        self == MarkMode::Active
    }

    pub fn cursor(self) -> Cursor {
        match self {
            MarkMode::Inactive => Cursor::Default,
            MarkMode::Active => Cursor::Crosshair,
        }
    }
}

/// Result of a map click.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// Mark mode was off; nothing was sent.
    Ignored,
    /// The renderer has not loaded yet; nothing was sent.
    NotLoaded,
    /// The point was stored. `refresh` is `None` when there was no viewport to
    /// reload or the reload failed (the point itself is still stored).
    Submitted {
        point: Point,
        refresh: Option<RefreshOutcome>,
    },
}
