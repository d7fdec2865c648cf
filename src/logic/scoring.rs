//! Standings recomputed from the full match history.
//!
//! Totals are always rebuilt from scratch so that editing a result replaces its
//! previous contribution instead of adding to it.

use crate::models::{Pair, Player, Round, Tournament, TournamentMode};

/// Rebuild points/wins/draws/losses of every player from the completed matches in `rounds`.
///
/// Win: +2 points, +1 win. Draw: +1 point, +1 draw. Loss: +1 loss.
pub fn recompute_player_stats(players: &mut [Player], rounds: &[Round]) {
    for player in players.iter_mut() {
        player.reset_stats();
        for m in rounds.iter().flat_map(|r| r.matches.iter()) {
            let (Some(result), Some(side)) = (m.counted_result(), m.side_of(player.id)) else {
                continue;
            };
            match result.winner() {
                None => player.add_draw(),
                Some(winner) if winner == side => player.add_win(),
                Some(_) => player.add_loss(),
            }
        }
    }
}

/// Set each pair's aggregate points to the sum of its members' points.
pub fn refresh_pair_points(pairs: &mut [Pair], players: &[Player]) {
    let points_of = |id| {
        players
            .iter()
            .find(|p| p.id == id)
            .map_or(0, |p| p.points)
    };
    for pair in pairs.iter_mut() {
        pair.points = points_of(pair.player_1) + points_of(pair.player_2);
    }
}

/// Refresh all player stats (and fixed pair totals) of a tournament from its rounds.
pub fn apply_scoring(tournament: &mut Tournament) {
    recompute_player_stats(&mut tournament.players, &tournament.rounds);
    if let TournamentMode::FixedPairs { pairs } = &mut tournament.mode {
        refresh_pair_points(pairs, &tournament.players);
    }
}
