use serde_json::{Map, Value};
use std::io;

use super::settings::ViewMode;

pub type PreferenceMap = Map<String, Value>;

pub const SIDEBAR_WIDTH_KEY: &str = "sidebarWidth";
pub const VIEW_MODE_KEY: &str = "viewMode";

pub const DEFAULT_SIDEBAR_WIDTH: u32 = 260;
pub const MIN_SIDEBAR_WIDTH: u32 = 160;
pub const MAX_SIDEBAR_WIDTH: u32 = 600;

/// Durable key-value sidecar for cross-session UI settings.
///
/// `merge` folds a patch into whatever is already stored and returns the
/// resulting map; keys absent from the patch are left alone.
pub trait PreferenceStore: Send + Sync {
    fn load(&self) -> PreferenceMap;

    fn merge(&self, patch: &PreferenceMap) -> io::Result<PreferenceMap>;
}

/// In-memory view of the sidecar with typed accessors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Preferences {
    values: PreferenceMap,
}

impl Preferences {
    pub fn from_map(values: PreferenceMap) -> Self {
        Self { values }
    }

    pub fn as_map(&self) -> &PreferenceMap {
        &self.values
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Applies `patch` on top of the current values; returns `true` if any
    /// value changed.
    pub fn merge(&mut self, patch: &PreferenceMap) -> bool {
        let mut changed = false;
        for (key, value) in patch {
            if self.values.get(key) != Some(value) {
                self.values.insert(key.clone(), value.clone());
                changed = true;
            }
        }
        changed
    }

    pub fn sidebar_width(&self) -> u32 {
        self.values
            .get(SIDEBAR_WIDTH_KEY)
            .and_then(Value::as_u64)
            .map(|w| clamp_sidebar_width(w.min(u64::from(u32::MAX)) as u32))
            .unwrap_or(DEFAULT_SIDEBAR_WIDTH)
    }

    pub fn view_mode(&self) -> Option<ViewMode> {
        self.values
            .get(VIEW_MODE_KEY)
            .and_then(Value::as_str)
            .and_then(ViewMode::from_name)
    }
}

pub fn clamp_sidebar_width(width: u32) -> u32 {
    width.clamp(MIN_SIDEBAR_WIDTH, MAX_SIDEBAR_WIDTH)
}

pub fn single_patch(key: &str, value: Value) -> PreferenceMap {
    let mut patch = PreferenceMap::new();
    patch.insert(key.to_string(), value);
    patch
}
