//! Fixed-pairs rounds: each pair meets an opponent it has not faced yet.

use crate::logic::history::opposed_before;
use crate::models::{Match, Pair, Round};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::VecDeque;

/// Generate the matches of a fixed-pairs round.
///
/// Pairs are taken from the front of a queue in stored order. Each one gets a
/// random opponent among the remaining pairs it has not faced; when all of them
/// are repeats, the next pair in the queue is used. A single leftover pair sits out.
///
/// If that leaves fewer than half as many matches as there are pairs and rounds
/// have already been played, the matchups of round
/// `completed rounds % rounds played` are replayed instead. That index is a
/// fixed rotation through the history, not a search for the freshest round.
pub fn generate_fixed_pair_matches<R: Rng + ?Sized>(
    pairs: &[Pair],
    rounds: &[Round],
    rng: &mut R,
) -> Vec<Match> {
    let mut queue: VecDeque<&Pair> = pairs.iter().collect();
    let mut matches = Vec::with_capacity(pairs.len() / 2);

    while queue.len() >= 2 {
        let Some(pair) = queue.pop_front() else { break };
        let fresh: Vec<usize> = queue
            .iter()
            .enumerate()
            .filter(|(_, other)| !opposed_before(pair.id, other.id, rounds))
            .map(|(i, _)| i)
            .collect();
        let index = match fresh.choose(rng) {
            Some(&i) => i,
            None => {
                log::info!("Pair {} has faced every remaining pair; repeating a matchup", pair.id);
                0
            }
        };
        let Some(opponent) = queue.remove(index) else { break };
        let court = matches.len() as u32 + 1;
        matches.push(Match::new(court, pair.clone(), opponent.clone()));
    }

    if matches.len() * 2 < pairs.len() && !rounds.is_empty() {
        let completed = rounds.iter().filter(|r| r.completed).count();
        let replay = &rounds[completed % rounds.len()];
        log::info!(
            "Only {} matches for {} pairs; replaying the matchups of round {}",
            matches.len(),
            pairs.len(),
            replay.number
        );
        return replay_round(replay);
    }

    matches
}

/// New unplayed matches with the same pair-vs-pair matchups as `round`.
fn replay_round(round: &Round) -> Vec<Match> {
    round
        .matches
        .iter()
        .enumerate()
        .map(|(i, m)| Match::new(i as u32 + 1, m.pair_1.clone(), m.pair_2.clone()))
        .collect()
}
