//! Repeat checks over the round history: who has partnered or faced whom.

use crate::models::{PairId, PlayerId, Round};

/// True if `a` and `b` have formed a pair (on either side) in any match of any round.
pub fn partnered_before(a: PlayerId, b: PlayerId, rounds: &[Round]) -> bool {
    rounds
        .iter()
        .flat_map(|r| r.matches.iter())
        .any(|m| m.pair_1.is_made_of(a, b) || m.pair_2.is_made_of(a, b))
}

/// True if pairs `a` and `b` have been on opposite sides of any match, in either order.
pub fn opposed_before(a: PairId, b: PairId, rounds: &[Round]) -> bool {
    rounds
        .iter()
        .flat_map(|r| r.matches.iter())
        .any(|m| m.opposes(a, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Match, Pair};
    use uuid::Uuid;

    fn ids<const N: usize>() -> [Uuid; N] {
        std::array::from_fn(|_| Uuid::new_v4())
    }

    #[test]
    fn partnership_is_found_in_either_order_and_either_side() {
        let [a, b, c, d] = ids::<4>();
        let round = Round::new(1, vec![Match::new(1, Pair::new(a, b), Pair::new(c, d))]);
        let rounds = vec![round];
        assert!(partnered_before(a, b, &rounds));
        assert!(partnered_before(b, a, &rounds));
        assert!(partnered_before(d, c, &rounds));
        assert!(!partnered_before(a, c, &rounds));
        assert!(!partnered_before(b, d, &rounds));
    }

    #[test]
    fn opposition_is_by_pair_identity() {
        let [a, b, c, d] = ids::<4>();
        let p1 = Pair::new(a, b);
        let p2 = Pair::new(c, d);
        // Same players, different pair identity.
        let p3 = Pair::new(a, b);
        let rounds = vec![Round::new(1, vec![Match::new(1, p1.clone(), p2.clone())])];
        assert!(opposed_before(p1.id, p2.id, &rounds));
        assert!(opposed_before(p2.id, p1.id, &rounds));
        assert!(!opposed_before(p3.id, p2.id, &rounds));
    }

    #[test]
    fn empty_history_has_no_repeats() {
        let [a, b] = ids::<2>();
        assert!(!partnered_before(a, b, &[]));
        assert!(!opposed_before(a, b, &[]));
    }
}
