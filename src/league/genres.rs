//! Game titles a team can compete in and the player roles each title allows

use crate::error::{LeagueError, Result};

/// A game title and its enumerated roles; an empty role list means unrestricted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenreProfile {
    pub name: &'static str,
    pub roles: &'static [&'static str],
}

const STANDARD_GENRES: &[GenreProfile] = &[
    GenreProfile {
        name: "Pes",
        roles: &[],
    },
    GenreProfile {
        name: "Fifa",
        roles: &[],
    },
    GenreProfile {
        name: "Valorant",
        roles: &["Duelist", "Initiator", "Sentinel", "Controller"],
    },
    GenreProfile {
        name: "CS2",
        roles: &["AWPer", "Rifler", "Support", "IGL"],
    },
    GenreProfile {
        name: "Dota 2",
        roles: &[],
    },
    GenreProfile {
        name: "League of Legends",
        roles: &[],
    },
    GenreProfile {
        name: "Overwatch",
        roles: &[],
    },
    GenreProfile {
        name: "Call of Duty",
        roles: &["Slayer", "Support", "Objective", "Anchor"],
    },
];

/// Roles accepted for players of a given genre
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleRule {
    Restricted(&'static [&'static str]),
    Unrestricted,
}

/// Lookup table from genre to valid roles
#[derive(Debug, Clone)]
pub struct GenreCatalog {
    profiles: &'static [GenreProfile],
    default_genre: &'static str,
}

impl Default for GenreCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl GenreCatalog {
    /// The built-in list of supported game titles
    pub fn standard() -> Self {
        Self {
            profiles: STANDARD_GENRES,
            default_genre: "Valorant",
        }
    }

    pub fn genres(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.profiles.iter().map(|profile| profile.name)
    }

    pub fn default_genre(&self) -> &'static str {
        self.default_genre
    }

    fn profile(&self, genre: &str) -> Option<&GenreProfile> {
        let genre = genre.trim();
        self.profiles
            .iter()
            .find(|profile| profile.name.eq_ignore_ascii_case(genre))
    }

    /// Canonical spelling of a supported genre, matched case-insensitively
    pub fn canonical_genre(&self, genre: &str) -> Result<&'static str> {
        self.profile(genre).map(|profile| profile.name).ok_or_else(|| {
            LeagueError::validation(format!(
                "Unknown genre '{}'. Choose one of: {}",
                genre.trim(),
                self.genres().collect::<Vec<_>>().join(", ")
            ))
            .into()
        })
    }

    /// Role rule for a genre; unrecognized genres are unrestricted
    pub fn roles_for(&self, genre: &str) -> RoleRule {
        match self.profile(genre) {
            Some(profile) if !profile.roles.is_empty() => RoleRule::Restricted(profile.roles),
            _ => RoleRule::Unrestricted,
        }
    }

    /// Validate a role for a team of the given genre, returning its stored spelling
    pub fn validate_role(&self, genre: &str, role: &str) -> Result<String> {
        let role = role.trim();
        if role.is_empty() {
            return Err(LeagueError::validation("Role cannot be empty").into());
        }

        match self.roles_for(genre) {
            RoleRule::Unrestricted => Ok(role.to_string()),
            RoleRule::Restricted(roles) => roles
                .iter()
                .find(|candidate| candidate.eq_ignore_ascii_case(role))
                .map(|candidate| candidate.to_string())
                .ok_or_else(|| {
                    LeagueError::validation(format!(
                        "'{}' is not a {} role. Choose one of: {}",
                        role,
                        genre,
                        roles.join(", ")
                    ))
                    .into()
                }),
        }
    }
}
