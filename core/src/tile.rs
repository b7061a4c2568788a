use serde::{Deserialize, Serialize};

/// What a cell actually holds, fixed once the mines are laid out.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Truth {
    Mine,
    SafeCount(u8),
}

impl Truth {
    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }
}

impl Default for Truth {
    fn default() -> Self {
        Self::SafeCount(0)
    }
}

/// What the player has done to a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    Hidden,
    Flagged,
    Revealed,
}

impl Default for Visibility {
    fn default() -> Self {
        Self::Hidden
    }
}

/// Player-facing state of a cell, the adapter maps these to glyphs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    Flagged,
    Mine,
    Count(u8),
}

impl From<Truth> for CellView {
    fn from(truth: Truth) -> Self {
        match truth {
            Truth::Mine => CellView::Mine,
            Truth::SafeCount(count) => CellView::Count(count),
        }
    }
}
