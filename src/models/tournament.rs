//! Tournament, TournamentMode and TournamentStatus.

use crate::models::game::{MatchId, Pair, PairId, Round};
use crate::models::player::{Player, PlayerId, ProfileId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur during tournament setup and play.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Tournament is not in a status that allows this action.
    InvalidState,
    /// The latest round still has matches without a result.
    RoundInProgress,
    /// No round has been started yet.
    NoActiveRound,
    /// Match id is not part of the current round.
    MatchNotFound(MatchId),
    /// Player not found in the roster.
    PlayerNotFound(PlayerId),
    /// Pair not found in the pair list.
    PairNotFound(PairId),
    /// Rotating mode needs a positive multiple of 4 players.
    InvalidRosterSize { size: usize },
    /// Fixed pairs must be an even number (at least 2) covering every player exactly once.
    InvalidPairs,
    /// A player can only be in one pair.
    PlayerAlreadyPaired(PlayerId),
    /// A catalog profile can only be added once.
    ProfileAlreadyAdded(ProfileId),
    /// A decisive result needs a detailed score.
    MissingScore,
    /// Games must add up to the games per match.
    InvalidScore { pair_1_games: u32, pair_2_games: u32 },
    /// The score's winner does not match the recorded result.
    ScoreMismatch,
    /// At least one court is required.
    InvalidCourts,
    /// Names cannot be empty.
    EmptyName,
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::InvalidState => write!(f, "Invalid state for this action"),
            TournamentError::RoundInProgress => write!(f, "The current round is not completed yet"),
            TournamentError::NoActiveRound => write!(f, "No round has been started"),
            TournamentError::MatchNotFound(_) => write!(f, "Match not found in the current round"),
            TournamentError::PlayerNotFound(_) => write!(f, "Player not found"),
            TournamentError::PairNotFound(_) => write!(f, "Pair not found"),
            TournamentError::InvalidRosterSize { size } => {
                write!(f, "Need a multiple of 4 players (at least 4), got {}", size)
            }
            TournamentError::InvalidPairs => {
                write!(f, "Pairs must be an even number and include every player exactly once")
            }
            TournamentError::PlayerAlreadyPaired(_) => write!(f, "Player is already in a pair"),
            TournamentError::ProfileAlreadyAdded(_) => write!(f, "This player is already registered"),
            TournamentError::MissingScore => write!(f, "A score is required for a win"),
            TournamentError::InvalidScore {
                pair_1_games,
                pair_2_games,
            } => write!(
                f,
                "Score {}-{} must add up to {} games",
                pair_1_games,
                pair_2_games,
                crate::models::GAMES_PER_MATCH
            ),
            TournamentError::ScoreMismatch => write!(f, "Score does not match the result"),
            TournamentError::InvalidCourts => write!(f, "Need at least one court"),
            TournamentError::EmptyName => write!(f, "Name cannot be empty"),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// How partnerships are formed. Fixed pairs carry their pair list.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TournamentMode {
    /// "6 loco": partners are re-drawn at random every round.
    #[serde(rename = "6-loco", alias = "rotating")]
    Rotating,
    /// Partners fixed at setup; only opponents rotate.
    FixedPairs { pairs: Vec<Pair> },
}

impl TournamentMode {
    pub fn kind(&self) -> ModeKind {
        match self {
            TournamentMode::Rotating => ModeKind::Rotating,
            TournamentMode::FixedPairs { .. } => ModeKind::FixedPairs,
        }
    }

    pub fn pairs(&self) -> Option<&[Pair]> {
        match self {
            TournamentMode::Rotating => None,
            TournamentMode::FixedPairs { pairs } => Some(pairs),
        }
    }
}

/// Mode selection before any pairs exist (setup).
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModeKind {
    #[default]
    #[serde(rename = "6-loco", alias = "rotating")]
    Rotating,
    FixedPairs,
}

impl ModeKind {
    /// Display label, also used for default tournament names.
    pub fn label(self) -> &'static str {
        match self {
            ModeKind::Rotating => "6 Loco",
            ModeKind::FixedPairs => "Fixed Pairs",
        }
    }
}

/// Lifecycle of a tournament.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    /// Roster and pairs being prepared.
    #[default]
    Setup,
    /// Rounds are being played.
    Active,
    /// Finished; standings are final.
    Completed,
}

/// Full tournament record: roster, pairs (fixed mode), rounds and status.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub category: String,
    pub mode: TournamentMode,
    pub players: Vec<Player>,
    /// Rounds in creation order.
    pub rounds: Vec<Round>,
    /// Index of the most recently created round (0 before the first round).
    pub current_round: usize,
    pub courts: u32,
    pub created_at: DateTime<Utc>,
    pub status: TournamentStatus,
}

impl Tournament {
    /// Create a tournament in Setup status with no rounds.
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        mode: TournamentMode,
        players: Vec<Player>,
        courts: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            category: category.into(),
            mode,
            players,
            rounds: Vec::new(),
            current_round: 0,
            courts,
            created_at: Utc::now(),
            status: TournamentStatus::Setup,
        }
    }

    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Fixed pairs, if this is a fixed-pairs tournament.
    pub fn pairs(&self) -> Option<&[Pair]> {
        self.mode.pairs()
    }

    /// The round at `current_round`, if any round exists.
    pub fn latest_round(&self) -> Option<&Round> {
        self.rounds.get(self.current_round)
    }

    pub fn rounds_completed(&self) -> usize {
        self.rounds.iter().filter(|r| r.completed).count()
    }
}
