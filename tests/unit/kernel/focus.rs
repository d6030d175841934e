use super::*;

#[test]
fn initial_zone_is_document_surface() {
    let state = FocusState::new();
    assert_eq!(state.zone(), FocusZone::Document);
}

#[test]
fn three_cycles_return_to_starting_zone() {
    let mut state = FocusState::new();
    assert!(state.set_zone(FocusZone::Navigation));

    assert_eq!(state.cycle(), FocusZone::TabStrip);
    assert_eq!(state.cycle(), FocusZone::Document);
    assert_eq!(state.cycle(), FocusZone::Navigation);
}

#[test]
fn setting_same_zone_reports_no_change() {
    let mut state = FocusState::new();
    assert!(!state.set_zone(FocusZone::Document));
    assert!(state.set_zone(FocusZone::TabStrip));
    assert!(!state.set_zone(FocusZone::TabStrip));
}

#[test]
fn order_matches_next() {
    for (i, zone) in FocusZone::ORDER.iter().enumerate() {
        let expected = FocusZone::ORDER[(i + 1) % FocusZone::ORDER.len()];
        assert_eq!(zone.next(), expected);
    }
}
