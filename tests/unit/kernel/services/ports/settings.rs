use super::*;

#[test]
fn missing_fields_fall_back_to_defaults() {
    let settings: Settings = serde_json::from_str("{}").expect("deserialize empty settings");
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.watcher_poll_ms, 250);
    assert_eq!(settings.markdown_extensions, vec!["md", "markdown"]);
}

#[test]
fn view_mode_uses_kebab_case_names() {
    let settings: Settings =
        serde_json::from_str(r#"{"default_view_mode":"direct-edit"}"#).expect("deserialize");
    assert_eq!(settings.default_view_mode, ViewMode::DirectEdit);

    let json = serde_json::to_string(&ViewMode::Split).expect("serialize");
    assert_eq!(json, "\"split\"");
}

#[test]
fn view_mode_names_round_trip() {
    for mode in ViewMode::ALL {
        assert_eq!(ViewMode::from_name(mode.as_str()), Some(mode));
    }
    assert_eq!(ViewMode::from_name("wysiwyg"), None);
}

#[test]
fn edit_toggle_only_in_rendered_modes() {
    assert!(ViewMode::Preview.supports_edit_toggle());
    assert!(ViewMode::DirectEdit.supports_edit_toggle());
    assert!(!ViewMode::Source.supports_edit_toggle());
    assert!(!ViewMode::Split.supports_edit_toggle());
}
