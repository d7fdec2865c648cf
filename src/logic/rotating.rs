//! "6 loco" rounds: shuffle the whole roster into new pairs, avoiding repeat partners.

use crate::logic::history::partnered_before;
use crate::models::{Match, Pair, Player, PlayerId, Round, TournamentError};
use rand::seq::SliceRandom;
use rand::Rng;

/// Random partitions tried before repeats are accepted.
pub const MAX_PAIRING_ATTEMPTS: usize = 100;

/// Rotating mode needs whole matches: a positive multiple of 4 players.
pub fn validate_roster_size(size: usize) -> Result<(), TournamentError> {
    if size == 0 || size % 4 != 0 {
        return Err(TournamentError::InvalidRosterSize { size });
    }
    Ok(())
}

/// Shuffle the players and split them into consecutive pairs.
pub fn random_pairs<R: Rng + ?Sized>(players: &[PlayerId], rng: &mut R) -> Vec<Pair> {
    let mut shuffled = players.to_vec();
    shuffled.shuffle(rng);
    shuffled
        .chunks_exact(2)
        .map(|chunk| Pair::new(chunk[0], chunk[1]))
        .collect()
}

/// Generate the matches of a rotating round.
///
/// 1. Up to [`MAX_PAIRING_ATTEMPTS`] times: shuffle into pairs, keep the first
///    partition where nobody plays with a previous partner.
/// 2. If every attempt repeats a partnership, keep the last partition anyway.
/// 3. Consecutive pairs face each other; courts are numbered from 1.
pub fn generate_rotating_matches<R: Rng + ?Sized>(
    players: &[Player],
    rounds: &[Round],
    rng: &mut R,
) -> Result<Vec<Match>, TournamentError> {
    validate_roster_size(players.len())?;
    let ids: Vec<PlayerId> = players.iter().map(|p| p.id).collect();

    let mut accepted = None;
    let mut last = Vec::new();
    for attempt in 1..=MAX_PAIRING_ATTEMPTS {
        let candidate = random_pairs(&ids, rng);
        let repeat_free = candidate
            .iter()
            .all(|p| !partnered_before(p.player_1, p.player_2, rounds));
        if repeat_free {
            log::debug!("Repeat-free pairs found on attempt {}", attempt);
            accepted = Some(candidate);
            break;
        }
        last = candidate;
    }

    let pairs = match accepted {
        Some(pairs) => pairs,
        None => {
            log::info!(
                "No repeat-free pairs after {} attempts; accepting repeated partners",
                MAX_PAIRING_ATTEMPTS
            );
            last
        }
    };

    Ok(matches_from_pairs(pairs))
}

/// Pair up consecutive pairs into matches on courts 1, 2, ...
fn matches_from_pairs(pairs: Vec<Pair>) -> Vec<Match> {
    let mut matches = Vec::with_capacity(pairs.len() / 2);
    let mut iter = pairs.into_iter();
    while let (Some(pair_1), Some(pair_2)) = (iter.next(), iter.next()) {
        let court = matches.len() as u32 + 1;
        matches.push(Match::new(court, pair_1, pair_2));
    }
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn roster_size_must_be_positive_multiple_of_four() {
        assert!(validate_roster_size(4).is_ok());
        assert!(validate_roster_size(12).is_ok());
        assert_eq!(
            validate_roster_size(0),
            Err(TournamentError::InvalidRosterSize { size: 0 })
        );
        assert_eq!(
            validate_roster_size(6),
            Err(TournamentError::InvalidRosterSize { size: 6 })
        );
    }

    #[test]
    fn random_pairs_uses_every_player_once() {
        let mut rng = StdRng::seed_from_u64(3);
        let ids: Vec<PlayerId> = (0..8).map(|_| uuid::Uuid::new_v4()).collect();
        let pairs = random_pairs(&ids, &mut rng);
        assert_eq!(pairs.len(), 4);
        let mut seen: Vec<PlayerId> = pairs.iter().flat_map(|p| [p.player_1, p.player_2]).collect();
        seen.sort();
        let mut expected = ids.clone();
        expected.sort();
        assert_eq!(seen, expected);
    }

    #[test]
    fn courts_follow_generation_order() {
        let mut rng = StdRng::seed_from_u64(11);
        let players: Vec<Player> = (0..12).map(|i| Player::new(format!("P{i}"))).collect();
        let matches = generate_rotating_matches(&players, &[], &mut rng).unwrap();
        let courts: Vec<u32> = matches.iter().map(|m| m.court).collect();
        assert_eq!(courts, vec![1, 2, 3]);
        assert!(matches.iter().all(|m| !m.completed && m.result.is_none() && m.score.is_none()));
    }
}
