//! Integration tests for pairing: no repeated partners (6 loco), no repeated
//! opponents (fixed pairs), and the fallbacks when repeats cannot be avoided.

use padel_tournament_web::logic::{
    generate_fixed_pair_matches, generate_rotating_matches, opposed_before, partnered_before,
};
use padel_tournament_web::{
    record_result, start_new_round_with_rng, Match, MatchResult, ModeKind, Pair, PairId, Player,
    PlayerId, Round, Score, Tournament, TournamentSetup,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

fn rotating_tournament(n: usize) -> Tournament {
    let mut setup = TournamentSetup::new(ModeKind::Rotating);
    for i in 0..n {
        setup.add_manual_player(&format!("P{i}")).unwrap();
    }
    setup.start().unwrap()
}

/// Fixed-pairs tournament with `n` pairs made of consecutive players.
fn fixed_pairs_tournament(n: usize) -> Tournament {
    let mut setup = TournamentSetup::new(ModeKind::FixedPairs);
    let ids: Vec<PlayerId> = (0..n * 2)
        .map(|i| setup.add_manual_player(&format!("P{i}")).unwrap())
        .collect();
    for chunk in ids.chunks(2) {
        setup.create_pair(chunk[0], chunk[1]).unwrap();
    }
    setup.start().unwrap()
}

fn pairs_of(t: &Tournament) -> Vec<Pair> {
    t.pairs().unwrap().to_vec()
}

fn played(court: u32, pair_1: &Pair, pair_2: &Pair) -> Match {
    let mut m = Match::new(court, pair_1.clone(), pair_2.clone());
    m.result = Some(MatchResult::Pair1);
    m.score = Some(Score::new(4, 3).unwrap());
    m.completed = true;
    m
}

/// Give every open match of the current round a result.
fn finish_current_round(t: &mut Tournament) {
    let ids: Vec<_> = t.latest_round().unwrap().matches.iter().map(|m| m.id).collect();
    for id in ids {
        record_result(t, id, MatchResult::Draw, None).unwrap();
    }
}

fn matchup(m: &Match) -> HashSet<PairId> {
    [m.pair_1.id, m.pair_2.id].into_iter().collect()
}

fn assert_everyone_plays_once(players: &[Player], matches: &[Match]) {
    let mut seen = HashSet::new();
    for m in matches {
        for id in [m.pair_1.player_1, m.pair_1.player_2, m.pair_2.player_1, m.pair_2.player_2] {
            assert!(seen.insert(id), "player {id} appears twice");
        }
    }
    assert_eq!(seen.len(), players.len());
}

#[test]
fn eight_players_second_round_has_no_repeated_partners() {
    for seed in 0..25 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut t = rotating_tournament(8);
        start_new_round_with_rng(&mut t, &mut rng).unwrap();
        finish_current_round(&mut t);
        start_new_round_with_rng(&mut t, &mut rng).unwrap();

        let (first, second) = t.rounds.split_at(1);
        assert_eq!(second[0].matches.len(), 2);
        assert_everyone_plays_once(&t.players, &second[0].matches);
        for m in &second[0].matches {
            for pair in [&m.pair_1, &m.pair_2] {
                assert!(
                    !partnered_before(pair.player_1, pair.player_2, first),
                    "seed {seed}: partnership repeated"
                );
            }
        }
    }
}

#[test]
fn four_players_use_every_partition_before_repeating() {
    for seed in 0..10 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut t = rotating_tournament(4);
        for _ in 0..3 {
            start_new_round_with_rng(&mut t, &mut rng).unwrap();
            finish_current_round(&mut t);
        }
        let mut partnerships = HashSet::new();
        for m in t.rounds.iter().flat_map(|r| r.matches.iter()) {
            for pair in [&m.pair_1, &m.pair_2] {
                let mut key = [pair.player_1, pair.player_2];
                key.sort();
                assert!(partnerships.insert(key), "seed {seed}: partnership repeated");
            }
        }
        assert_eq!(partnerships.len(), 6);

        // Every partnership is used up: the fourth round is forced to repeat.
        start_new_round_with_rng(&mut t, &mut rng).unwrap();
        let last = t.latest_round().unwrap();
        assert_eq!(last.number, 4);
        assert_eq!(last.matches.len(), 1);
        assert_everyone_plays_once(&t.players, &last.matches);
        let m = &last.matches[0];
        assert!(partnered_before(m.pair_1.player_1, m.pair_1.player_2, &t.rounds[..3]));
    }
}

#[test]
fn rotating_generator_accepts_repeats_when_none_can_be_avoided() {
    let players: Vec<Player> = (0..4).map(|i| Player::new(format!("P{i}"))).collect();
    let ids: Vec<PlayerId> = players.iter().map(|p| p.id).collect();
    let pair = |a: usize, b: usize| Pair::new(ids[a], ids[b]);
    let history = vec![
        Round::new(1, vec![played(1, &pair(0, 1), &pair(2, 3))]),
        Round::new(2, vec![played(1, &pair(0, 2), &pair(1, 3))]),
        Round::new(3, vec![played(1, &pair(0, 3), &pair(1, 2))]),
    ];
    let mut rng = StdRng::seed_from_u64(9);
    let matches = generate_rotating_matches(&players, &history, &mut rng).unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].court, 1);
    assert_everyone_plays_once(&players, &matches);
}

#[test]
fn fixed_pairs_second_round_avoids_first_round_opponents() {
    for seed in 0..25 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut t = fixed_pairs_tournament(4);
        let p = pairs_of(&t);
        let (a, b, c, d) = (&p[0], &p[1], &p[2], &p[3]);
        t.rounds.push(Round::new(1, vec![played(1, a, b), played(2, c, d)]));
        t.current_round = 0;

        start_new_round_with_rng(&mut t, &mut rng).unwrap();

        let round = t.latest_round().unwrap();
        assert_eq!(round.number, 2);
        assert_eq!(round.matches.len(), 2);
        assert_eq!(
            round.matches.iter().map(|m| m.court).collect::<Vec<_>>(),
            vec![1, 2]
        );
        for m in &round.matches {
            assert!(!opposed_before(m.pair_1.id, m.pair_2.id, &t.rounds[..1]), "seed {seed}");
            assert!(!m.completed && m.result.is_none());
        }
        // Fixed pairs never change members.
        assert_eq!(pairs_of(&t).iter().map(|p| p.id).collect::<Vec<_>>(), vec![a.id, b.id, c.id, d.id]);
    }
}

#[test]
fn four_fixed_pairs_play_a_full_round_robin_then_repeat() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut t = fixed_pairs_tournament(4);
    let mut matchups = HashSet::new();
    for _ in 0..3 {
        start_new_round_with_rng(&mut t, &mut rng).unwrap();
        for m in &t.latest_round().unwrap().matches {
            let mut key = [m.pair_1.id, m.pair_2.id];
            key.sort();
            assert!(matchups.insert(key), "matchup repeated before round robin finished");
        }
        finish_current_round(&mut t);
    }
    assert_eq!(matchups.len(), 6);

    // Everyone has met everyone: opponents repeat in queue order, nobody sits out.
    start_new_round_with_rng(&mut t, &mut rng).unwrap();
    let round = t.latest_round().unwrap();
    assert_eq!(round.matches.len(), 2);
    let p = pairs_of(&t);
    assert_eq!(matchup(&round.matches[0]), [p[0].id, p[1].id].into_iter().collect());
    assert_eq!(matchup(&round.matches[1]), [p[2].id, p[3].id].into_iter().collect());
}

#[test]
fn two_fixed_pairs_repeat_the_only_matchup() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut t = fixed_pairs_tournament(2);
    start_new_round_with_rng(&mut t, &mut rng).unwrap();
    finish_current_round(&mut t);
    start_new_round_with_rng(&mut t, &mut rng).unwrap();
    let first = &t.rounds[0].matches[0];
    let second = &t.rounds[1].matches[0];
    assert_eq!(matchup(first), matchup(second));
    assert_ne!(first.id, second.id);
}

#[test]
fn odd_pair_count_without_history_leaves_one_pair_out() {
    let players: Vec<Player> = (0..6).map(|i| Player::new(format!("P{i}"))).collect();
    let pairs: Vec<Pair> = players.chunks(2).map(|c| Pair::new(c[0].id, c[1].id)).collect();
    let mut rng = StdRng::seed_from_u64(2);
    let matches = generate_fixed_pair_matches(&pairs, &[], &mut rng);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].pair_1.id, pairs[0].id);
}

// The replayed round is chosen as `completed rounds % rounds played`. This is a
// rotation through the history, not a guarantee of the freshest matchups.
#[test]
fn too_few_matches_replays_a_prior_round() {
    let players: Vec<Player> = (0..6).map(|i| Player::new(format!("P{i}"))).collect();
    let pairs: Vec<Pair> = players.chunks(2).map(|c| Pair::new(c[0].id, c[1].id)).collect();
    let (a, b) = (&pairs[0], &pairs[1]);
    let history = vec![Round::new(1, vec![played(1, a, b)])];

    for seed in 0..10 {
        let mut rng = StdRng::seed_from_u64(seed);
        // A-vs-C is still fresh, but with B left over only 1 match exists for 3 pairs.
        let matches = generate_fixed_pair_matches(&pairs, &history, &mut rng);
        assert_eq!(matches.len(), 1);
        assert_eq!(matchup(&matches[0]), matchup(&history[0].matches[0]));
        assert_ne!(matches[0].id, history[0].matches[0].id);
        assert_eq!(matches[0].court, 1);
        assert!(!matches[0].completed);
        assert!(matches[0].result.is_none() && matches[0].score.is_none());
    }
}

#[test]
fn replayed_round_index_is_completed_rounds_modulo_history() {
    let players: Vec<Player> = (0..6).map(|i| Player::new(format!("P{i}"))).collect();
    let pairs: Vec<Pair> = players.chunks(2).map(|c| Pair::new(c[0].id, c[1].id)).collect();
    let (a, b, c) = (&pairs[0], &pairs[1], &pairs[2]);
    let mut rng = StdRng::seed_from_u64(4);

    // Two completed rounds: 2 % 2 = 0, so round 1 is replayed.
    let both_done = vec![
        Round::new(1, vec![played(1, a, b)]),
        Round::new(2, vec![played(1, a, c)]),
    ];
    let matches = generate_fixed_pair_matches(&pairs, &both_done, &mut rng);
    assert_eq!(matches.len(), 1);
    assert_eq!(matchup(&matches[0]), matchup(&both_done[0].matches[0]));

    // Second round still open: 1 % 2 = 1, so round 2 is replayed.
    let mut open = both_done.clone();
    open[1].matches[0].completed = false;
    open[1].refresh_completed();
    let matches = generate_fixed_pair_matches(&pairs, &open, &mut rng);
    assert_eq!(matches.len(), 1);
    assert_eq!(matchup(&matches[0]), matchup(&open[1].matches[0]));
}
