//! Common match-generation capability, one implementation per tournament mode.

use crate::logic::fixed_pairs::generate_fixed_pair_matches;
use crate::logic::rotating::generate_rotating_matches;
use crate::models::{Match, Pair, Player, Round, TournamentError, TournamentMode};
use rand::RngCore;

/// Builds the matches of the next round from the roster and the round history.
pub trait PairingGenerator {
    fn generate_matches(
        &self,
        players: &[Player],
        rounds: &[Round],
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Match>, TournamentError>;
}

/// "6 loco": fresh random partners every round.
#[derive(Clone, Copy, Debug, Default)]
pub struct RotatingPairing;

impl PairingGenerator for RotatingPairing {
    fn generate_matches(
        &self,
        players: &[Player],
        rounds: &[Round],
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Match>, TournamentError> {
        generate_rotating_matches(players, rounds, rng)
    }
}

/// Fixed partners; opponents rotate.
#[derive(Clone, Copy, Debug)]
pub struct FixedPairing<'a> {
    pub pairs: &'a [Pair],
}

impl PairingGenerator for FixedPairing<'_> {
    fn generate_matches(
        &self,
        _players: &[Player],
        rounds: &[Round],
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Match>, TournamentError> {
        Ok(generate_fixed_pair_matches(self.pairs, rounds, rng))
    }
}

impl TournamentMode {
    /// Generator for this mode.
    pub fn generator(&self) -> Box<dyn PairingGenerator + '_> {
        match self {
            TournamentMode::Rotating => Box::new(RotatingPairing),
            TournamentMode::FixedPairs { pairs } => Box::new(FixedPairing { pairs }),
        }
    }
}
