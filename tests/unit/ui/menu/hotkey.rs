use super::*;

#[test]
fn marker_is_removed_and_letter_uppercased() {
    let title = parse_title("_File", '_');
    assert_eq!(title.text(), "File");
    assert_eq!(title.hotkey(), Some('F'));
    assert_eq!(title.split(), ("", "F", "ile"));
    assert_eq!(title.width(), 4);
}

#[test]
fn marker_in_the_middle() {
    let title = parse_title("Save _as", '_');
    assert_eq!(title.text(), "Save as");
    assert_eq!(title.hotkey(), Some('A'));
    assert_eq!(title.split(), ("Save ", "a", "s"));
}

#[test]
fn only_the_first_marker_counts() {
    let title = parse_title("_One_Two", '_');
    assert_eq!(title.text(), "One_Two");
    assert_eq!(title.hotkey(), Some('O'));
}

#[test]
fn trailing_marker_is_literal() {
    let title = parse_title("Tail_", '_');
    assert_eq!(title.text(), "Tail_");
    assert_eq!(title.hotkey(), None);
    assert_eq!(title.split(), ("Tail_", "", ""));
}

#[test]
fn custom_specifier() {
    let title = parse_title("&Edit_me", '&');
    assert_eq!(title.text(), "Edit_me");
    assert_eq!(title.hotkey(), Some('E'));
}

#[test]
fn no_marker_no_hotkey() {
    let title = parse_title("Plain", '_');
    assert_eq!(title.text(), "Plain");
    assert_eq!(title.hotkey(), None);
}

#[test]
fn matching_ignores_case() {
    assert!(hotkey_matches(Some('F'), 'f'));
    assert!(hotkey_matches(Some('F'), 'F'));
    assert!(!hotkey_matches(Some('F'), 'g'));
    assert!(!hotkey_matches(None, 'f'));
}
