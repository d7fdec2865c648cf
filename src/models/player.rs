//! Player (tournament participant) and PlayerProfile (catalog entry).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in pairs, matches and lookups).
pub type PlayerId = Uuid;

/// Points for each player on the winning side.
pub const POINTS_PER_WIN: u32 = 2;
/// Points for each player in a drawn match.
pub const POINTS_PER_DRAW: u32 = 1;

/// Unique identifier for a catalog profile.
pub type ProfileId = Uuid;

/// Identity record in the player catalog. Never mutated by tournament logic.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub id: ProfileId,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    /// Government id number.
    #[serde(default)]
    pub id_number: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

/// A participant in one tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub points: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    /// Catalog profile this player was created from (lookup only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<ProfileId>,
}

impl Player {
    /// Create a new player with the given name. Stats start at zero.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            points: 0,
            wins: 0,
            draws: 0,
            losses: 0,
            profile_id: None,
        }
    }

    /// Create a player from a catalog profile, keeping a back-reference to it.
    pub fn from_profile(profile: &PlayerProfile) -> Self {
        Self {
            profile_id: Some(profile.id),
            ..Self::new(profile.name.clone())
        }
    }

    /// Zero out points, wins, draws and losses.
    pub fn reset_stats(&mut self) {
        self.points = 0;
        self.wins = 0;
        self.draws = 0;
        self.losses = 0;
    }

    pub fn add_win(&mut self) {
        self.points += POINTS_PER_WIN;
        self.wins += 1;
    }

    pub fn add_draw(&mut self) {
        self.points += POINTS_PER_DRAW;
        self.draws += 1;
    }

    pub fn add_loss(&mut self) {
        self.losses += 1;
    }

    pub fn matches_played(&self) -> u32 {
        self.wins + self.draws + self.losses
    }
}
