//! Padel tournament web app: library with models, business logic, catalog and storage.

pub mod catalog;
pub mod logic;
pub mod models;
pub mod storage;

pub use catalog::{CatalogError, ProfileCatalog, ProfileInput};
pub use logic::{
    can_start_new_round, complete_tournament, pair_standings, player_standings, record_result,
    record_score, start_new_round, start_new_round_with_rng, start_tournament, PairStanding,
    PairingGenerator, PlayerStanding, TournamentSetup,
};
pub use models::{
    Match, MatchId, MatchResult, ModeKind, Pair, PairId, Player, PlayerId, PlayerProfile,
    ProfileId, Round, Score, Side, Tournament, TournamentError, TournamentId, TournamentMode,
    TournamentStatus, GAMES_PER_MATCH,
};
pub use storage::{JsonFileStore, MemoryStore, Repository, StoreError};
