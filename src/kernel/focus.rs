//! Keyboard focus zones.
//!
//! The core only tracks which zone owns input. Moving real input focus to a
//! widget inside the zone is the UI's job; every transition is published as
//! [`Signal::FocusMoved`](crate::kernel::Signal::FocusMoved) so it can.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FocusZone {
    Navigation,
    TabStrip,
    #[default]
    Document,
}

impl FocusZone {
    pub const ORDER: [FocusZone; 3] = [
        FocusZone::Navigation,
        FocusZone::TabStrip,
        FocusZone::Document,
    ];

    pub fn next(self) -> Self {
        match self {
            Self::Navigation => Self::TabStrip,
            Self::TabStrip => Self::Document,
            Self::Document => Self::Navigation,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Navigation => "navigation-panel",
            Self::TabStrip => "tab-strip",
            Self::Document => "document-surface",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FocusState {
    zone: FocusZone,
}

impl FocusState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn zone(&self) -> FocusZone {
        self.zone
    }

    /// Returns `true` if the zone actually changed.
    pub fn set_zone(&mut self, zone: FocusZone) -> bool {
        if self.zone == zone {
            return false;
        }
        self.zone = zone;
        true
    }

    pub fn cycle(&mut self) -> FocusZone {
        self.zone = self.zone.next();
        self.zone
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/focus.rs"]
mod tests;
