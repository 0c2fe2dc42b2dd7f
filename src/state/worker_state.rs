/// Worker state definitions for tracking crawl progress
///
/// A worker cycles `Idle → Fetching → Parsing → Resolving → (Scheduling | Idle)`
/// for every URL it takes from the frontier.
use std::fmt;

/// Represents the current phase of a crawl worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WorkerState {
    /// Waiting for, or about to take, a URL from the frontier
    #[default]
    Idle,

    /// Blocking on the page fetch
    Fetching,

    /// Building the document, extracting the next link and table aggregate
    Parsing,

    /// Turning the discovered link into an absolute URL
    Resolving,

    /// Offering the resolved URL to the frontier
    Scheduling,
}

impl WorkerState {
    /// Returns true while the worker holds a URL (anything but `Idle`)
    pub fn is_busy(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Returns true if moving from `self` to `next` follows the worker cycle
    ///
    /// Any state may fall back to `Idle` (fetch failure, terminal page,
    /// budget exhaustion).
    pub fn can_transition_to(&self, next: WorkerState) -> bool {
        matches!(
            (self, next),
            (_, Self::Idle)
                | (Self::Idle, Self::Fetching)
                | (Self::Fetching, Self::Parsing)
                | (Self::Parsing, Self::Resolving)
                | (Self::Resolving, Self::Scheduling)
        )
    }

    /// Stable lowercase name, used in log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::Parsing => "parsing",
            Self::Resolving => "resolving",
            Self::Scheduling => "scheduling",
        }
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
