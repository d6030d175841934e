use super::*;

#[test]
fn test_command_names() {
    assert_eq!(Command::OpenFolder.name(), "openFolder");
    assert_eq!(Command::CycleFocus.name(), "cycleFocus");
    assert_eq!(Command::ViewDirectEdit.name(), "viewDirectEdit");
}

#[test]
fn test_from_name_round_trips_every_command() {
    for cmd in Command::ALL {
        assert_eq!(Command::from_name(cmd.name()), Some(cmd));
    }
}

#[test]
fn test_from_name_trims_and_rejects_unknown() {
    assert_eq!(Command::from_name("  save "), Some(Command::Save));
    assert_eq!(Command::from_name("quit"), None);
    assert_eq!(Command::from_name(""), None);
}

#[test]
fn test_command_names_are_unique() {
    let mut names: Vec<&str> = Command::ALL.iter().map(|c| c.name()).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), Command::ALL.len());
}
