use crate::core::Command;

#[derive(Debug, Clone)]
pub struct PaletteItem {
    pub label: &'static str,
    pub label_lc: &'static str,
    pub command: Command,
}

pub static PALETTE_ITEMS: &[PaletteItem] = &[
    PaletteItem {
        label: "Workspace: Open Folder",
        label_lc: "workspace: open folder",
        command: Command::OpenFolder,
    },
    PaletteItem {
        label: "File: Open",
        label_lc: "file: open",
        command: Command::OpenFile,
    },
    PaletteItem {
        label: "File: Save",
        label_lc: "file: save",
        command: Command::Save,
    },
    PaletteItem {
        label: "File: Close Tab",
        label_lc: "file: close tab",
        command: Command::CloseTab,
    },
    PaletteItem {
        label: "File: Reload from Disk",
        label_lc: "file: reload from disk",
        command: Command::ReloadFromDisk,
    },
    PaletteItem {
        label: "File: Keep Local Version",
        label_lc: "file: keep local version",
        command: Command::KeepLocalVersion,
    },
    PaletteItem {
        label: "Tabs: Next Tab",
        label_lc: "tabs: next tab",
        command: Command::NextTab,
    },
    PaletteItem {
        label: "Tabs: Previous Tab",
        label_lc: "tabs: previous tab",
        command: Command::PrevTab,
    },
    PaletteItem {
        label: "Search: Find",
        label_lc: "search: find",
        command: Command::Find,
    },
    PaletteItem {
        label: "Search: Find Next",
        label_lc: "search: find next",
        command: Command::FindNext,
    },
    PaletteItem {
        label: "Search: Find Previous",
        label_lc: "search: find previous",
        command: Command::FindPrev,
    },
    PaletteItem {
        label: "Focus: Cycle Zones",
        label_lc: "focus: cycle zones",
        command: Command::CycleFocus,
    },
    PaletteItem {
        label: "Focus: Navigation Panel",
        label_lc: "focus: navigation panel",
        command: Command::FocusNavigation,
    },
    PaletteItem {
        label: "Focus: Tab Strip",
        label_lc: "focus: tab strip",
        command: Command::FocusTabStrip,
    },
    PaletteItem {
        label: "Focus: Document",
        label_lc: "focus: document",
        command: Command::FocusDocument,
    },
    PaletteItem {
        label: "View: Source",
        label_lc: "view: source",
        command: Command::ViewSource,
    },
    PaletteItem {
        label: "View: Preview",
        label_lc: "view: preview",
        command: Command::ViewPreview,
    },
    PaletteItem {
        label: "View: Split",
        label_lc: "view: split",
        command: Command::ViewSplit,
    },
    PaletteItem {
        label: "View: Direct Edit",
        label_lc: "view: direct edit",
        command: Command::ViewDirectEdit,
    },
    PaletteItem {
        label: "View: Toggle Editing",
        label_lc: "view: toggle editing",
        command: Command::ToggleEdit,
    },
    PaletteItem {
        label: "Explorer: Refresh",
        label_lc: "explorer: refresh",
        command: Command::RefreshExplorer,
    },
];

/// Indices into [`PALETTE_ITEMS`] whose label contains `query`, ignoring case.
/// A blank query matches everything.
pub fn match_indices(query: &str) -> Vec<usize> {
    let query = query.trim();
    if query.is_empty() {
        return (0..PALETTE_ITEMS.len()).collect();
    }

    let query_lc = query.to_lowercase();
    PALETTE_ITEMS
        .iter()
        .enumerate()
        .filter(|(_, item)| item.label_lc.contains(&query_lc))
        .map(|(i, _)| i)
        .collect()
}

/// The command the palette would run for `query` with `selected` highlighted.
/// The selection is clamped to the filtered list.
pub fn selected_command(query: &str, selected: usize) -> Option<Command> {
    let matches = match_indices(query);
    let last = matches.len().checked_sub(1)?;
    Some(PALETTE_ITEMS[matches[selected.min(last)]].command)
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/palette.rs"]
mod tests;
