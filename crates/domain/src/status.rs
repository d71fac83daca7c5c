//! Index build status as reported by the catalog.

use std::fmt;

/// Coarse index state from `SHOW INDEXES`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexState {
    Online,
    Populating,
    Failed,
    /// Any state this tool does not know how to wait on.
    Other,
}

impl IndexState {
    /// Case-insensitive mapping of the catalog `state` column.
    pub fn from_catalog(state: &str) -> Self {
        if state.eq_ignore_ascii_case("ONLINE") {
            IndexState::Online
        } else if state.eq_ignore_ascii_case("POPULATING") {
            IndexState::Populating
        } else if state.eq_ignore_ascii_case("FAILED") {
            IndexState::Failed
        } else {
            IndexState::Other
        }
    }

    /// The build is progressing or done.
    pub fn is_started(&self) -> bool {
        matches!(self, IndexState::Online | IndexState::Populating)
    }

    /// The build cannot complete without intervention.
    pub fn is_failed(&self) -> bool {
        matches!(self, IndexState::Failed | IndexState::Other)
    }
}

impl fmt::Display for IndexState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IndexState::Online => "ONLINE",
            IndexState::Populating => "POPULATING",
            IndexState::Failed => "FAILED",
            IndexState::Other => "OTHER",
        };
        write!(f, "{s}")
    }
}

/// One poll of an index's build progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexStatus {
    pub state: IndexState,
    /// Population percentage, 0.0 to 100.0.
    pub percent: f64,
}

impl IndexStatus {
    pub fn new(state: IndexState, percent: f64) -> Self {
        Self { state, percent }
    }

    /// Status reported for an index missing from the catalog.
    pub fn missing() -> Self {
        Self::new(IndexState::Failed, 0.0)
    }

    pub fn is_complete(&self) -> bool {
        self.state == IndexState::Online || self.percent >= 100.0
    }

    /// Percentage truncated to a whole number and clamped to 0..=100.
    pub fn whole_percent(&self) -> u8 {
        self.percent.clamp(0.0, 100.0) as u8
    }
}
