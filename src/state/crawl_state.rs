//! Crawl state definitions for one domain
//!
//! A task moves `Start -> FetchHome -> FollowContactLinks -> Done`, may jump
//! from `FetchHome` straight to `Done` when early exit is enabled, and may
//! reach `Errored` from any non-terminal state.

use std::fmt;

/// Represents the current stage of a domain crawl task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    // ===== Active States =====
    /// Task created, nothing visited yet
    Start,

    /// Visiting the home page
    FetchHome,

    /// Visiting contact-like links found on the home page
    FollowContactLinks,

    // ===== Terminal States =====
    /// Crawl finished (including skipped empty slots)
    Done,

    /// Crawl aborted by an error
    Errored,
}

impl CrawlState {
    /// Returns true if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Errored)
    }

    /// Returns true if the state machine allows moving to `next`
    pub fn can_transition_to(&self, next: CrawlState) -> bool {
        match (self, next) {
            (Self::Start, Self::FetchHome) => true,
            (Self::Start, Self::Done) => true,
            (Self::FetchHome, Self::FollowContactLinks) => true,
            (Self::FetchHome, Self::Done) => true,
            (Self::FollowContactLinks, Self::Done) => true,
            (from, Self::Errored) => !from.is_terminal(),
            _ => false,
        }
    }

    /// Short lowercase name used in diagnostics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::FetchHome => "fetch_home",
            Self::FollowContactLinks => "follow_contact_links",
            Self::Done => "done",
            Self::Errored => "errored",
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
