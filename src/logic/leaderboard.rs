//! Standings: points descending, then wins descending, then losses ascending.

use crate::models::{PairId, PlayerId, Tournament};
use serde::Serialize;
use std::cmp::Ordering;

/// One row of the player table.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PlayerStanding {
    pub player_id: PlayerId,
    pub name: String,
    pub points: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
}

/// One row of the pair table (fixed pairs), totals summed over both members.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PairStanding {
    pub pair_id: PairId,
    pub names: [String; 2],
    pub points: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
}

fn standing_order(a: (u32, u32, u32), b: (u32, u32, u32)) -> Ordering {
    let (a_points, a_wins, a_losses) = a;
    let (b_points, b_wins, b_losses) = b;
    b_points
        .cmp(&a_points)
        .then(b_wins.cmp(&a_wins))
        .then(a_losses.cmp(&b_losses))
}

pub fn player_standings(tournament: &Tournament) -> Vec<PlayerStanding> {
    let mut rows: Vec<PlayerStanding> = tournament
        .players
        .iter()
        .map(|p| PlayerStanding {
            player_id: p.id,
            name: p.name.clone(),
            points: p.points,
            wins: p.wins,
            draws: p.draws,
            losses: p.losses,
        })
        .collect();
    rows.sort_by(|a, b| standing_order((a.points, a.wins, a.losses), (b.points, b.wins, b.losses)));
    rows
}

/// Pair table for fixed-pairs tournaments; empty in rotating mode.
pub fn pair_standings(tournament: &Tournament) -> Vec<PairStanding> {
    let Some(pairs) = tournament.pairs() else {
        return Vec::new();
    };
    let mut rows: Vec<PairStanding> = pairs
        .iter()
        .map(|pair| {
            let mut row = PairStanding {
                pair_id: pair.id,
                names: [String::new(), String::new()],
                points: 0,
                wins: 0,
                draws: 0,
                losses: 0,
            };
            for (slot, id) in [pair.player_1, pair.player_2].into_iter().enumerate() {
                if let Some(p) = tournament.get_player(id) {
                    row.names[slot] = p.name.clone();
                    row.points += p.points;
                    row.wins += p.wins;
                    row.draws += p.draws;
                    row.losses += p.losses;
                }
            }
            row
        })
        .collect();
    rows.sort_by(|a, b| standing_order((a.points, a.wins, a.losses), (b.points, b.wins, b.losses)));
    rows
}
