use super::*;

fn starts(matches: &[Match]) -> Vec<usize> {
    matches.iter().map(|m| m.start).collect()
}

#[test]
fn overlapping_occurrences_are_all_reported() {
    let matches = find_matches("aaaa", "aa");
    assert_eq!(starts(&matches), vec![0, 1, 2]);
    assert!(matches.iter().all(|m| m.len() == 2));
}

#[test]
fn matching_ignores_case() {
    let matches = find_matches("Hello hello HELLO", "hElLo");
    assert_eq!(starts(&matches), vec![0, 6, 12]);
}

#[test]
fn empty_query_yields_no_matches() {
    assert!(find_matches("anything", "").is_empty());
    assert!(find_matches("", "a").is_empty());
}

#[test]
fn offsets_point_into_original_text_for_non_ascii() {
    let text = "Straße STRASSE Ärger ärger";
    let matches = find_matches(text, "ärger");
    assert_eq!(matches.len(), 2);
    for m in &matches {
        assert_eq!(text[m.start..m.end].to_lowercase(), "ärger");
    }
}

#[test]
fn line_numbers_follow_newlines() {
    let matches = find_matches("foo\nbar foo\n\nfoo", "foo");
    let lines: Vec<usize> = matches.iter().map(|m| m.line).collect();
    assert_eq!(lines, vec![0, 1, 3]);
}

#[test]
fn session_navigation_is_cyclic() {
    let mut session = SearchSession::new();
    session.set_query("a", Some("a a a"));
    assert_eq!(session.current_index(), Some(0));

    assert!(session.go_to_next());
    assert!(session.go_to_next());
    assert_eq!(session.current_index(), Some(2));
    assert!(session.go_to_next());
    assert_eq!(session.current_index(), Some(0));
    assert!(session.go_to_prev());
    assert_eq!(session.current_index(), Some(2));
}

#[test]
fn navigation_without_matches_is_noop() {
    let mut session = SearchSession::new();
    session.set_query("zzz", Some("abc"));
    assert!(!session.go_to_next());
    assert!(!session.go_to_prev());
    assert_eq!(session.current_index(), None);
    assert!(session.current_match().is_none());
}

#[test]
fn query_or_text_change_resets_cursor() {
    let mut session = SearchSession::new();
    session.set_query("a", Some("a a a"));
    session.go_to_next();
    session.go_to_next();

    session.set_query("a ", Some("a a a"));
    assert_eq!(session.current_index(), Some(0));

    session.go_to_next();
    session.set_text(Some("a a a a"));
    assert_eq!(session.current_index(), Some(0));
    assert_eq!(session.match_count(), 3);
}

#[test]
fn hide_clears_query_and_matches() {
    let mut session = SearchSession::new();
    session.show();
    session.set_query("a", Some("aaa"));
    assert!(session.hide());
    assert!(!session.is_visible());
    assert_eq!(session.query(), "");
    assert_eq!(session.match_count(), 0);
    assert!(!session.hide());
}
