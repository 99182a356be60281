//! TUI screen definitions.
//!
//! Each screen is one tab: the query form and the results of the latest run.

mod query;
mod results;

pub(crate) use query::QueryScreen;
pub(crate) use results::ResultsScreen;

use std::fmt;

/// Screen identifiers, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScreenId {
    Query,
    Results,
}

impl ScreenId {
    pub(crate) const ALL: [ScreenId; 2] = [ScreenId::Query, ScreenId::Results];
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query => write!(f, "Query"),
            Self::Results => write!(f, "Results"),
        }
    }
}

/// Something a screen asks the app to do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ScreenAction {
    /// Start a pipeline run.
    Submit { query: String, dry_run: bool },
}
