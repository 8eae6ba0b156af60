use serde::{Deserialize, Serialize};

/// What the stakes panel of the dashboard shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewState {
    NotConnected,
    Loading,
    NoStakes,
    HasStakes,
}

/// Derive the panel state. Checks run in order: wallet connection, pending
/// fetch, empty list. A list that is absent but not pending (a failed fetch)
/// falls through to [`ViewState::HasStakes`] and renders as an empty grid.
pub fn derive<T>(is_connected: bool, is_pending: bool, stakes: Option<&[T]>) -> ViewState {
    if !is_connected {
        return ViewState::NotConnected;
    }
    if is_pending {
        return ViewState::Loading;
    }
    match stakes {
        Some([]) => ViewState::NoStakes,
        _ => ViewState::HasStakes,
    }
}
