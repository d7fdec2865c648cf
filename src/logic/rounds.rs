//! Round progression: starting rounds, recording (and editing) results, finishing.

use crate::logic::scoring::apply_scoring;
use crate::models::{
    MatchId, MatchResult, Round, Score, Tournament, TournamentError, TournamentStatus,
};
use rand::RngCore;

/// A new round may start when the tournament is active and there is no round
/// yet or the latest one is completed.
pub fn can_start_new_round(tournament: &Tournament) -> bool {
    tournament.status == TournamentStatus::Active
        && tournament.latest_round().map_or(true, |r| r.completed)
}

/// Start the next round with matches from the tournament mode's generator.
pub fn start_new_round(tournament: &mut Tournament) -> Result<(), TournamentError> {
    start_new_round_with_rng(tournament, &mut rand::thread_rng())
}

/// [`start_new_round`] with a caller-supplied random source.
pub fn start_new_round_with_rng(
    tournament: &mut Tournament,
    rng: &mut dyn RngCore,
) -> Result<(), TournamentError> {
    if tournament.status != TournamentStatus::Active {
        return Err(TournamentError::InvalidState);
    }
    if !can_start_new_round(tournament) {
        return Err(TournamentError::RoundInProgress);
    }

    let matches = tournament
        .mode
        .generator()
        .generate_matches(&tournament.players, &tournament.rounds, rng)?;

    let number = tournament.rounds.len() + 1;
    log::debug!(
        "Tournament {}: round {} with {} matches",
        tournament.id,
        number,
        matches.len()
    );
    tournament.rounds.push(Round::new(number, matches));
    tournament.current_round = tournament.rounds.len() - 1;
    Ok(())
}

/// Record (or overwrite) the result of a match in the current round, then
/// refresh the round's `completed` flag and every player's totals.
///
/// A win needs a detailed score whose games agree with the winner. A draw
/// counts as a draw whatever score is given and stores the placeholder score.
pub fn record_result(
    tournament: &mut Tournament,
    match_id: MatchId,
    result: MatchResult,
    score: Option<Score>,
) -> Result<(), TournamentError> {
    if tournament.status != TournamentStatus::Active {
        return Err(TournamentError::InvalidState);
    }
    let score = resolve_score(result, score)?;

    let number = tournament.current_round + 1;
    let round = tournament
        .rounds
        .iter_mut()
        .find(|r| r.number == number)
        .ok_or(TournamentError::NoActiveRound)?;
    let m = round
        .get_match_mut(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    m.result = Some(result);
    m.completed = true;
    m.score = Some(score);
    round.refresh_completed();

    apply_scoring(tournament);
    Ok(())
}

/// Record a detailed score; the side with more games wins.
pub fn record_score(
    tournament: &mut Tournament,
    match_id: MatchId,
    score: Score,
) -> Result<(), TournamentError> {
    score.validate()?;
    record_result(tournament, match_id, score.result(), Some(score))
}

/// Finish an active tournament. Rejected while a round is still being played.
pub fn complete_tournament(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.status != TournamentStatus::Active {
        return Err(TournamentError::InvalidState);
    }
    if tournament.latest_round().is_some_and(|r| !r.completed) {
        return Err(TournamentError::RoundInProgress);
    }
    tournament.status = TournamentStatus::Completed;
    Ok(())
}

fn resolve_score(result: MatchResult, score: Option<Score>) -> Result<Score, TournamentError> {
    match (result, score) {
        // 7 games cannot split evenly, so a draw always keeps the placeholder.
        (MatchResult::Draw, _) => Ok(Score::draw_placeholder()),
        (_, None) => Err(TournamentError::MissingScore),
        (result, Some(score)) => {
            score.validate()?;
            if score.result() != result {
                return Err(TournamentError::ScoreMismatch);
            }
            Ok(score)
        }
    }
}
