//! Error types for the league manager
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the application. Operations return `LeagueError` values converted into
//! `anyhow::Error`, so callers can recover the category with `downcast_ref`.

use crate::types::{MatchId, PlayerId, TeamId};

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific league scenarios
#[derive(Debug, thiserror::Error)]
pub enum LeagueError {
    #[error("Validation failed: {reason}")]
    Validation { reason: String },

    #[error("No team found with ID {team_id}")]
    TeamNotFound { team_id: TeamId },

    #[error("No player found with ID {player_id}")]
    PlayerNotFound { player_id: PlayerId },

    #[error("No match found with ID {match_id}")]
    MatchNotFound { match_id: MatchId },

    #[error("Persistence error: {message}")]
    Persistence { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl LeagueError {
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }

    /// True for errors caused by bad input rather than by the store
    pub fn is_user_error(&self) -> bool {
        !matches!(self, Self::Persistence { .. } | Self::Configuration { .. })
    }
}

/// Find the `LeagueError` behind an `anyhow::Error`, if there is one
pub fn classify(error: &anyhow::Error) -> Option<&LeagueError> {
    error.downcast_ref::<LeagueError>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = LeagueError::TeamNotFound { team_id: 7 };
        assert_eq!(err.to_string(), "No team found with ID 7");

        let err = LeagueError::validation("A team cannot play against itself");
        assert_eq!(
            err.to_string(),
            "Validation failed: A team cannot play against itself"
        );
    }

    #[test]
    fn test_classify_through_anyhow() {
        let err: anyhow::Error = LeagueError::MatchNotFound { match_id: 3 }.into();
        assert!(matches!(
            classify(&err),
            Some(LeagueError::MatchNotFound { match_id: 3 })
        ));

        let other = anyhow::anyhow!("something else");
        assert!(classify(&other).is_none());
    }

    #[test]
    fn test_user_error_split() {
        assert!(LeagueError::validation("bad").is_user_error());
        assert!(LeagueError::PlayerNotFound { player_id: 1 }.is_user_error());
        assert!(!LeagueError::persistence("disk full").is_user_error());
    }
}
