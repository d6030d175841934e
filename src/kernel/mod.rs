//! Headless workspace core (state/action/effect).

pub mod action;
pub mod diagram;
pub mod dir_cache;
pub mod effect;
pub mod file_index;
pub mod focus;
pub mod palette;
pub mod reconcile;
pub mod search;
pub mod services;
pub mod state;
pub mod store;
pub mod tabs;

pub use action::Action;
pub use diagram::{find_diagram_blocks, DiagramBlock};
pub use dir_cache::DirectoryCache;
pub use effect::Effect;
pub use file_index::MarkdownIndex;
pub use focus::{FocusState, FocusZone};
pub use reconcile::{ChangeKind, FileChange};
pub use search::{find_matches, Match, SearchSession};
pub use state::{
    AppState, CommandPaletteState, Notification, Signal, UiState, WorkspaceSnapshot,
    WorkspaceState,
};
pub use store::{DispatchResult, Store, SubscriptionId};
pub use tabs::{DiskState, DocumentTab, TabId, TabRegistry};
