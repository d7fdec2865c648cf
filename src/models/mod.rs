//! Data structures for the padel tournament: players, pairs, matches, rounds, tournament.

mod game;
mod player;
mod tournament;

pub use game::{
    Match, MatchId, MatchResult, Pair, PairId, Round, RoundId, Score, Side, GAMES_PER_MATCH,
};
pub use player::{Player, PlayerId, PlayerProfile, ProfileId, POINTS_PER_DRAW, POINTS_PER_WIN};
pub use tournament::{
    ModeKind, Tournament, TournamentError, TournamentId, TournamentMode, TournamentStatus,
};
