use crate::ui::core::id::Id;
use std::fmt;
use std::io;

pub type Result<T> = std::result::Result<T, UiError>;

#[derive(Debug)]
pub enum UiError {
    /// The id does not name a pushed top-level view.
    UnknownView(Id),
    DuplicateContainer {
        existing: Id,
    },
    DuplicateIdentity(Id),
    /// `end` was called for a view that is not the physical stack top.
    UnbalancedEnd {
        view: Id,
        top: Option<Id>,
    },
    Driver(io::Error),
    Callback(Box<dyn std::error::Error + Send + Sync>),
}

impl UiError {
    pub fn callback(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        UiError::Callback(err.into())
    }

    /// Errors raised because collaborating window code broke a stack invariant.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            UiError::DuplicateContainer { .. }
                | UiError::DuplicateIdentity(_)
                | UiError::UnbalancedEnd { .. }
        )
    }
}

impl fmt::Display for UiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UiError::UnknownView(id) => write!(f, "view {} is not on the stack", id),
            UiError::DuplicateContainer { existing } => {
                write!(f, "a container view is already running: {}", existing)
            }
            UiError::DuplicateIdentity(id) => {
                write!(f, "a view with identity {} is already on the stack", id)
            }
            UiError::UnbalancedEnd { view, top } => match top {
                Some(top) => write!(f, "unbalanced end for {}: stack top is {}", view, top),
                None => write!(f, "unbalanced end for {}: stack is empty", view),
            },
            UiError::Driver(err) => write!(f, "driver error: {}", err),
            UiError::Callback(err) => write!(f, "callback failed: {}", err),
        }
    }
}

impl std::error::Error for UiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UiError::Driver(err) => Some(err),
            UiError::Callback(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<io::Error> for UiError {
    fn from(err: io::Error) -> Self {
        UiError::Driver(err)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/core/error.rs"]
mod tests;
