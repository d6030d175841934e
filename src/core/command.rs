//! Semantic commands: what the user asked for, independent of the key or menu
//! entry that produced it.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    // ==================== Workspace ====================
    OpenFolder,
    OpenFile,
    RefreshExplorer,

    // ==================== Tabs ====================
    Save,
    CloseTab,
    NextTab,
    PrevTab,
    ReloadFromDisk,
    KeepLocalVersion,

    // ==================== Search ====================
    Find,
    FindNext,
    FindPrev,

    // ==================== Focus ====================
    CycleFocus,
    FocusNavigation,
    FocusTabStrip,
    FocusDocument,

    // ==================== View ====================
    ViewSource,
    ViewPreview,
    ViewSplit,
    ViewDirectEdit,
    ToggleEdit,
    CommandPalette,
}

impl Command {
    pub const ALL: [Command; 22] = [
        Command::OpenFolder,
        Command::OpenFile,
        Command::RefreshExplorer,
        Command::Save,
        Command::CloseTab,
        Command::NextTab,
        Command::PrevTab,
        Command::ReloadFromDisk,
        Command::KeepLocalVersion,
        Command::Find,
        Command::FindNext,
        Command::FindPrev,
        Command::CycleFocus,
        Command::FocusNavigation,
        Command::FocusTabStrip,
        Command::FocusDocument,
        Command::ViewSource,
        Command::ViewPreview,
        Command::ViewSplit,
        Command::ViewDirectEdit,
        Command::ToggleEdit,
        Command::CommandPalette,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Command::OpenFolder => "openFolder",
            Command::OpenFile => "openFile",
            Command::RefreshExplorer => "refreshExplorer",
            Command::Save => "save",
            Command::CloseTab => "closeTab",
            Command::NextTab => "nextTab",
            Command::PrevTab => "prevTab",
            Command::ReloadFromDisk => "reloadFromDisk",
            Command::KeepLocalVersion => "keepLocalVersion",
            Command::Find => "find",
            Command::FindNext => "findNext",
            Command::FindPrev => "findPrev",
            Command::CycleFocus => "cycleFocus",
            Command::FocusNavigation => "focusNavigation",
            Command::FocusTabStrip => "focusTabStrip",
            Command::FocusDocument => "focusDocument",
            Command::ViewSource => "viewSource",
            Command::ViewPreview => "viewPreview",
            Command::ViewSplit => "viewSplit",
            Command::ViewDirectEdit => "viewDirectEdit",
            Command::ToggleEdit => "toggleEdit",
            Command::CommandPalette => "commandPalette",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|cmd| cmd.name() == name)
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/core/command.rs"]
mod tests;
