use super::*;
use std::error::Error as _;

#[test]
fn invariant_violations_are_classified() {
    let id = Id::raw(7);
    assert!(UiError::DuplicateContainer { existing: id }.is_invariant_violation());
    assert!(UiError::DuplicateIdentity(id).is_invariant_violation());
    assert!(UiError::UnbalancedEnd { view: id, top: None }.is_invariant_violation());
    assert!(!UiError::UnknownView(id).is_invariant_violation());
    assert!(!UiError::callback("boom").is_invariant_violation());
}

#[test]
fn display_names_the_views() {
    let err = UiError::UnbalancedEnd {
        view: Id::raw(1),
        top: Some(Id::raw(2)),
    };
    let text = err.to_string();
    assert!(text.contains(&Id::raw(1).to_string()));
    assert!(text.contains(&Id::raw(2).to_string()));

    let empty = UiError::UnbalancedEnd {
        view: Id::raw(1),
        top: None,
    };
    assert!(empty.to_string().contains("stack is empty"));
}

#[test]
fn io_errors_convert_and_keep_their_source() {
    let err: UiError = io::Error::new(io::ErrorKind::BrokenPipe, "gone").into();
    assert!(matches!(err, UiError::Driver(_)));
    assert!(err.source().is_some());
    assert!(err.to_string().contains("gone"));
}

#[test]
fn callback_errors_wrap_messages() {
    let err = UiError::callback("save failed");
    assert_eq!(err.to_string(), "callback failed: save failed");
    assert!(err.source().is_some());
}
