//! Publish state of a document.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Whether a document currently exposes a published version.
///
/// ```text
/// Unpublished --publish--> Published --unpublish--> Unpublished
/// Published --publish/rollback--> Published
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishState {
    #[default]
    Unpublished,
    Published,
}

impl PublishState {
    pub fn from_flag(is_published: bool) -> Self {
        if is_published {
            PublishState::Published
        } else {
            PublishState::Unpublished
        }
    }

    pub fn is_published(&self) -> bool {
        matches!(self, PublishState::Published)
    }
}

impl StateMachine for PublishState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use PublishState::*;
        matches!(
            (self, target),
            (Unpublished, Published) | (Published, Unpublished) | (Published, Published)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use PublishState::*;
        match self {
            Unpublished => vec![Published],
            Published => vec![Published, Unpublished],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unpublished() {
        assert_eq!(PublishState::default(), PublishState::Unpublished);
        assert!(!PublishState::default().is_published());
    }

    #[test]
    fn unpublished_cannot_be_unpublished_again() {
        assert!(PublishState::Unpublished
            .transition_to(PublishState::Unpublished)
            .is_err());
    }

    #[test]
    fn published_can_republish_or_unpublish() {
        let state = PublishState::Published;
        assert_eq!(
            state.transition_to(PublishState::Published),
            Ok(PublishState::Published)
        );
        assert_eq!(
            state.transition_to(PublishState::Unpublished),
            Ok(PublishState::Unpublished)
        );
    }

    #[test]
    fn no_state_is_terminal() {
        assert!(!PublishState::Published.is_terminal());
        assert!(!PublishState::Unpublished.is_terminal());
    }

    #[test]
    fn from_flag_maps_both_ways() {
        assert_eq!(PublishState::from_flag(true), PublishState::Published);
        assert_eq!(PublishState::from_flag(false), PublishState::Unpublished);
    }
}
