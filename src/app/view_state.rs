//! Decide which branch of the users panel to draw.
//!
//! The simulator override wins over real fetch state: any value other than
//! `Normal` masks loading, errors and empty data alike.
//!

/// Debug override selected from the simulator bar.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum SimulatedState {
    #[default]
    Normal,
    Loading,
    Error,
    Empty,
}

impl SimulatedState {
    pub fn label(self) -> &'static str {
        match self {
            SimulatedState::Normal => "Normal",
            SimulatedState::Loading => "Loading",
            SimulatedState::Error => "Error",
            SimulatedState::Empty => "Empty",
        }
    }
}

/// Everything the resolver looks at.
#[derive(Clone, Copy, Debug)]
pub struct ViewInputs<'a> {
    pub simulated: SimulatedState,
    pub is_loading: bool,
    pub has_error: bool,
    pub total_count: usize,
    pub search_term: &'a str,
    pub filtered_count: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewState {
    Loading,
    Error,
    Empty,
    NoResults,
    Content { summary: String },
}

pub const EMPTY_MESSAGE: &str = "No users available.";
pub const NO_RESULTS_MESSAGE: &str = "No users found matching your search criteria.";
pub const ERROR_MESSAGE: &str = "Failed to load users.";

/// First matching branch wins: loading, error, empty, no results, content.
pub fn resolve(inputs: &ViewInputs<'_>) -> ViewState {
    let normal = inputs.simulated == SimulatedState::Normal;
    if inputs.simulated == SimulatedState::Loading || (normal && inputs.is_loading) {
        return ViewState::Loading;
    }
    if inputs.simulated == SimulatedState::Error || (normal && inputs.has_error) {
        return ViewState::Error;
    }
    if inputs.simulated == SimulatedState::Empty || (normal && inputs.total_count == 0) {
        return ViewState::Empty;
    }
    if normal && inputs.filtered_count == 0 && !inputs.search_term.is_empty() {
        return ViewState::NoResults;
    }
    ViewState::Content {
        summary: summary_line(inputs.search_term, inputs.filtered_count, inputs.total_count),
    }
}

/// "Showing 2 of 3 users" while searching, "Total: 3 users" otherwise.
pub fn summary_line(search_term: &str, filtered: usize, total: usize) -> String {
    if search_term.is_empty() {
        format!("Total: {total} users")
    } else {
        format!("Showing {filtered} of {total} users")
    }
}
