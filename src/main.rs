//! Line-driven host for the workspace core. Reads commands from stdin and
//! prints what changed.

use mdspace::app::Workbench;
use mdspace::core::Command;
use mdspace::kernel::services::adapters::{
    ensure_settings_file, load_settings, JsonPreferenceStore, LocalFileSystem, PromptDialog,
};
use mdspace::kernel::services::ports::{PreferenceStore, Settings, WorkspaceConfig};
use mdspace::kernel::{Action, Notification, Signal, WorkspaceSnapshot};
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

mod logging;

const SETTLE_TIMEOUT: Duration = Duration::from_millis(100);

fn main() -> io::Result<()> {
    let _logging = logging::init();

    if let Err(e) = ensure_settings_file() {
        tracing::warn!(error = %e, "cannot create settings file");
    }
    let settings = load_settings().unwrap_or_else(Settings::default);
    let config = WorkspaceConfig::from(&settings);

    let fs = Arc::new(LocalFileSystem::new(config.clone()));
    let preferences = JsonPreferenceStore::at_default_location()
        .map(|store| Arc::new(store) as Arc<dyn PreferenceStore>);
    // One byte at a time so the dialog never buffers lines meant for the loop.
    let dialogs = PromptDialog::new(BufReader::with_capacity(1, io::stdin()), io::stdout());

    let mut workbench = Workbench::new(config, fs, preferences, Box::new(dialogs))?;
    workbench.subscribe(print_signals);

    // A folder or a markdown file, like a drop onto the window.
    if let Some(path) = std::env::args().nth(1) {
        workbench.dispatch(Action::OpenDropped(PathBuf::from(path)));
    }

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        settle(&mut workbench);
        print!("> ");
        io::stdout().flush()?;

        line.clear();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input, "quit" | "exit") {
            break;
        }
        if input == "status" {
            settle(&mut workbench);
            print_status(&workbench.state().snapshot());
            continue;
        }
        if let Some(query) = input
            .strip_prefix("files")
            .filter(|rest| rest.is_empty() || rest.starts_with(' '))
        {
            settle(&mut workbench);
            for entry in workbench.state().markdown_index.matching(query) {
                println!("{}", entry.path.display());
            }
            continue;
        }
        match parse_action(input, &workbench) {
            Some(action) => {
                workbench.dispatch(action);
            }
            None => println!("unknown command: {input}"),
        }
    }

    tracing::info!("exiting");
    Ok(())
}

fn settle(workbench: &mut Workbench) {
    while workbench.wait_message(SETTLE_TIMEOUT) {}
    workbench.poll_watcher();
}

fn parse_action(input: &str, workbench: &Workbench) -> Option<Action> {
    let (word, rest) = match input.split_once(' ') {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    };
    let state = workbench.state();
    let action = match word {
        "folder" if !rest.is_empty() => Action::SetWorkspace(Some(PathBuf::from(rest))),
        "close-folder" => Action::SetWorkspace(None),
        "open" if !rest.is_empty() => Action::OpenPath(PathBuf::from(rest)),
        "drop" if !rest.is_empty() => Action::OpenDropped(PathBuf::from(rest)),
        "edit" => Action::UpdateContent {
            tab_id: state.tabs.active_id()?,
            text: rest.replace("\\n", "\n"),
        },
        "search" => Action::SearchSetQuery(rest.to_string()),
        "palette" => Action::PaletteSetQuery(rest.to_string()),
        "run" => Action::PaletteConfirm,
        "toggle" if !rest.is_empty() => Action::ExplorerToggleDir(PathBuf::from(rest)),
        "width" => Action::SetSidebarWidth(rest.parse().ok()?),
        _ => Action::RunCommand(Command::from_name(word)?),
    };
    Some(action)
}

fn print_signals(notification: &Notification) {
    for signal in &notification.signals {
        match signal {
            Signal::FocusMoved(zone) => println!("focus: {zone:?}"),
            Signal::ConflictDetected { path, .. } => {
                println!(
                    "conflict: {} changed on disk (reloadFromDisk / keepLocalVersion)",
                    path.display()
                )
            }
            Signal::DiskFileMissing { path, .. } => {
                println!("missing: {} no longer exists on disk", path.display())
            }
            Signal::SaveFailed { error, .. } => println!("save failed: {error}"),
            Signal::OpenFailed { error, .. } => println!("open failed: {error}"),
        }
    }
}

fn print_status(snapshot: &WorkspaceSnapshot) {
    match &snapshot.workspace_root {
        Some(root) => println!("workspace: {}", root.display()),
        None => println!("workspace: (none)"),
    }
    println!(
        "view: {} edit: {} focus: {:?} sidebar: {}",
        snapshot.view_mode.as_str(),
        snapshot.edit_enabled,
        snapshot.focus,
        snapshot.sidebar_width
    );
    for tab in &snapshot.tabs {
        let marker = if Some(tab.id()) == snapshot.active_tab { '*' } else { ' ' };
        println!("{marker} [{}] {} ({:?})", tab.id(), tab.display_title(), tab.disk_state());
    }
    if snapshot.search.is_visible() {
        println!(
            "search: {:?} {}/{}",
            snapshot.search.query(),
            snapshot.search.current_index().map_or(0, |i| i + 1),
            snapshot.search.match_count()
        );
    }
    if snapshot.command_palette.visible {
        println!("palette: {:?}", snapshot.command_palette.query);
    }
    if let Some(error) = &snapshot.last_error {
        println!("error: {error}");
    }
}
