//! Pair, Match (with result and score) and Round for 2v2 padel games.

use crate::models::player::PlayerId;
use crate::models::tournament::TournamentError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a pair.
pub type PairId = Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Unique identifier for a round.
pub type RoundId = Uuid;

/// Games played in every match; a detailed score always adds up to this.
pub const GAMES_PER_MATCH: u32 = 7;

/// Two players playing on the same side.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Pair {
    pub id: PairId,
    pub player_1: PlayerId,
    pub player_2: PlayerId,
    /// Aggregate points of both members (kept up to date for fixed pairs).
    #[serde(default)]
    pub points: u32,
}

impl Pair {
    pub fn new(player_1: PlayerId, player_2: PlayerId) -> Self {
        Self {
            id: Uuid::new_v4(),
            player_1,
            player_2,
            points: 0,
        }
    }

    pub fn contains(&self, player: PlayerId) -> bool {
        self.player_1 == player || self.player_2 == player
    }

    /// True if this pair is made of exactly these two players, in either order.
    pub fn is_made_of(&self, a: PlayerId, b: PlayerId) -> bool {
        (self.player_1 == a && self.player_2 == b) || (self.player_1 == b && self.player_2 == a)
    }
}

/// One side of a match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Pair1,
    Pair2,
}

/// Outcome of a match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchResult {
    Pair1,
    Pair2,
    Draw,
}

impl MatchResult {
    /// Winning side, or None for a draw.
    pub fn winner(self) -> Option<Side> {
        match self {
            MatchResult::Pair1 => Some(Side::Pair1),
            MatchResult::Pair2 => Some(Side::Pair2),
            MatchResult::Draw => None,
        }
    }
}

/// Games won by each side.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub pair_1_games: u32,
    pub pair_2_games: u32,
}

impl Score {
    /// A detailed score; both counts must add up to [`GAMES_PER_MATCH`].
    pub fn new(pair_1_games: u32, pair_2_games: u32) -> Result<Self, TournamentError> {
        let score = Self {
            pair_1_games,
            pair_2_games,
        };
        score.validate()?;
        Ok(score)
    }

    /// Score stored for a draw entered without games.
    pub fn draw_placeholder() -> Self {
        Self {
            pair_1_games: 3,
            pair_2_games: 4,
        }
    }

    pub fn validate(&self) -> Result<(), TournamentError> {
        if self.pair_1_games.checked_add(self.pair_2_games) != Some(GAMES_PER_MATCH) {
            return Err(TournamentError::InvalidScore {
                pair_1_games: self.pair_1_games,
                pair_2_games: self.pair_2_games,
            });
        }
        Ok(())
    }

    /// Result implied by the games (more games wins).
    pub fn result(&self) -> MatchResult {
        use std::cmp::Ordering::*;
        match self.pair_1_games.cmp(&self.pair_2_games) {
            Greater => MatchResult::Pair1,
            Less => MatchResult::Pair2,
            Equal => MatchResult::Draw,
        }
    }
}

/// A single 2v2 match on one court.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    /// 1-based court number, in generation order.
    pub court: u32,
    pub pair_1: Pair,
    pub pair_2: Pair,
    /// None if not yet played.
    #[serde(default)]
    pub result: Option<MatchResult>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub score: Option<Score>,
}

impl Match {
    pub fn new(court: u32, pair_1: Pair, pair_2: Pair) -> Self {
        Self {
            id: Uuid::new_v4(),
            court,
            pair_1,
            pair_2,
            result: None,
            completed: false,
            score: None,
        }
    }

    /// Side the player is on, or None if they are not in this match.
    pub fn side_of(&self, player: PlayerId) -> Option<Side> {
        if self.pair_1.contains(player) {
            Some(Side::Pair1)
        } else if self.pair_2.contains(player) {
            Some(Side::Pair2)
        } else {
            None
        }
    }

    /// True if these two pair identities face each other here, in either order.
    pub fn opposes(&self, a: PairId, b: PairId) -> bool {
        (self.pair_1.id == a && self.pair_2.id == b) || (self.pair_1.id == b && self.pair_2.id == a)
    }

    /// Result that counts towards the standings (completed matches only).
    pub fn counted_result(&self) -> Option<MatchResult> {
        if self.completed {
            self.result
        } else {
            None
        }
    }
}

/// One cycle of simultaneous matches across all courts.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub id: RoundId,
    /// 1-based, sequential.
    pub number: usize,
    pub matches: Vec<Match>,
    pub completed: bool,
}

impl Round {
    pub fn new(number: usize, matches: Vec<Match>) -> Self {
        let mut round = Self {
            id: Uuid::new_v4(),
            number,
            matches,
            completed: false,
        };
        round.refresh_completed();
        round
    }

    /// Recompute `completed`: true iff every match in the round is completed.
    pub fn refresh_completed(&mut self) {
        self.completed = self.matches.iter().all(|m| m.completed);
    }

    pub fn get_match_mut(&mut self, id: MatchId) -> Option<&mut Match> {
        self.matches.iter_mut().find(|m| m.id == id)
    }
}
