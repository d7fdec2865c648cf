//! Tournament business logic: setup, pairing, scoring and round progression.

mod fixed_pairs;
mod history;
mod leaderboard;
mod pairing;
mod rotating;
mod rounds;
mod scoring;
mod setup;

pub use fixed_pairs::generate_fixed_pair_matches;
pub use history::{opposed_before, partnered_before};
pub use leaderboard::{pair_standings, player_standings, PairStanding, PlayerStanding};
pub use pairing::{FixedPairing, PairingGenerator, RotatingPairing};
pub use rotating::{
    generate_rotating_matches, random_pairs, validate_roster_size, MAX_PAIRING_ATTEMPTS,
};
pub use rounds::{
    can_start_new_round, complete_tournament, record_result, record_score, start_new_round,
    start_new_round_with_rng,
};
pub use scoring::{apply_scoring, recompute_player_stats, refresh_pair_points};
pub use setup::{categories, start_tournament, validate_fixed_pairs, TournamentSetup, DEFAULT_CATEGORY};
