//! Setup phase: build the roster and pairs, then start the tournament (Setup -> Active).

use crate::logic::rotating::validate_roster_size;
use crate::models::{
    ModeKind, Pair, PairId, Player, PlayerId, PlayerProfile, Tournament, TournamentError,
    TournamentMode, TournamentStatus,
};
use std::collections::HashSet;

/// Category used when none is given.
pub const DEFAULT_CATEGORY: &str = "No category";

/// Fixed pairs must be at least 2, an even count, and cover every player exactly once.
pub fn validate_fixed_pairs(players: &[Player], pairs: &[Pair]) -> Result<(), TournamentError> {
    if pairs.len() < 2 || pairs.len() % 2 != 0 {
        return Err(TournamentError::InvalidPairs);
    }
    let roster: HashSet<PlayerId> = players.iter().map(|p| p.id).collect();
    let mut seen = HashSet::new();
    for pair in pairs {
        for id in [pair.player_1, pair.player_2] {
            if !roster.contains(&id) {
                return Err(TournamentError::PlayerNotFound(id));
            }
            if !seen.insert(id) {
                return Err(TournamentError::PlayerAlreadyPaired(id));
            }
        }
    }
    if seen.len() != roster.len() {
        return Err(TournamentError::InvalidPairs);
    }
    Ok(())
}

/// Start the tournament: validate the roster for its mode and move Setup -> Active.
pub fn start_tournament(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.status != TournamentStatus::Setup {
        return Err(TournamentError::InvalidState);
    }
    if tournament.courts == 0 {
        return Err(TournamentError::InvalidCourts);
    }
    match &tournament.mode {
        TournamentMode::Rotating => validate_roster_size(tournament.players.len())?,
        TournamentMode::FixedPairs { pairs } => validate_fixed_pairs(&tournament.players, pairs)?,
    }
    tournament.status = TournamentStatus::Active;
    log::info!(
        "Tournament '{}' started ({}, {} players)",
        tournament.name,
        tournament.mode.kind().label(),
        tournament.players.len()
    );
    Ok(())
}

/// Sorted, distinct, non-empty categories of the given profiles.
pub fn categories(profiles: &[PlayerProfile]) -> Vec<String> {
    let mut categories: Vec<String> = profiles
        .iter()
        .map(|p| p.category.trim())
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect();
    categories.sort();
    categories.dedup();
    categories
}

/// Tournament being prepared: name, category, courts, roster and (fixed mode) pairs.
#[derive(Clone, Debug)]
pub struct TournamentSetup {
    pub mode: ModeKind,
    pub name: String,
    pub category: String,
    pub courts: u32,
    pub players: Vec<Player>,
    pub pairs: Vec<Pair>,
}

impl TournamentSetup {
    pub fn new(mode: ModeKind) -> Self {
        Self {
            mode,
            name: String::new(),
            category: String::new(),
            courts: 1,
            players: Vec::new(),
            pairs: Vec::new(),
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into().trim().to_string();
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.category = category.into().trim().to_string();
    }

    pub fn set_courts(&mut self, courts: u32) -> Result<(), TournamentError> {
        if courts == 0 {
            return Err(TournamentError::InvalidCourts);
        }
        self.courts = courts;
        Ok(())
    }

    /// Add a player typed in by hand (no catalog profile).
    pub fn add_manual_player(&mut self, name: &str) -> Result<PlayerId, TournamentError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TournamentError::EmptyName);
        }
        let player = Player::new(name);
        let id = player.id;
        self.players.push(player);
        Ok(id)
    }

    /// Add a player from the catalog. Each profile can be added once.
    pub fn add_profile_player(&mut self, profile: &PlayerProfile) -> Result<PlayerId, TournamentError> {
        if self.players.iter().any(|p| p.profile_id == Some(profile.id)) {
            return Err(TournamentError::ProfileAlreadyAdded(profile.id));
        }
        let player = Player::from_profile(profile);
        let id = player.id;
        self.players.push(player);
        Ok(id)
    }

    /// Remove a player; any pair they were in is dissolved.
    pub fn remove_player(&mut self, id: PlayerId) -> Result<(), TournamentError> {
        let idx = self
            .players
            .iter()
            .position(|p| p.id == id)
            .ok_or(TournamentError::PlayerNotFound(id))?;
        self.players.remove(idx);
        self.pairs.retain(|pair| !pair.contains(id));
        Ok(())
    }

    /// Pair two distinct roster players, neither of whom is already paired.
    pub fn create_pair(&mut self, a: PlayerId, b: PlayerId) -> Result<PairId, TournamentError> {
        if self.mode != ModeKind::FixedPairs {
            return Err(TournamentError::InvalidState);
        }
        if a == b {
            return Err(TournamentError::InvalidPairs);
        }
        for id in [a, b] {
            if !self.players.iter().any(|p| p.id == id) {
                return Err(TournamentError::PlayerNotFound(id));
            }
            if self.pairs.iter().any(|pair| pair.contains(id)) {
                return Err(TournamentError::PlayerAlreadyPaired(id));
            }
        }
        let pair = Pair::new(a, b);
        let id = pair.id;
        self.pairs.push(pair);
        Ok(id)
    }

    pub fn remove_pair(&mut self, id: PairId) -> Result<(), TournamentError> {
        let idx = self
            .pairs
            .iter()
            .position(|p| p.id == id)
            .ok_or(TournamentError::PairNotFound(id))?;
        self.pairs.remove(idx);
        Ok(())
    }

    /// Players not yet in any pair.
    pub fn available_players(&self) -> Vec<&Player> {
        self.players
            .iter()
            .filter(|p| !self.pairs.iter().any(|pair| pair.contains(p.id)))
            .collect()
    }

    /// Players needed to fill every court (rotating mode; informational).
    pub fn required_players(&self) -> usize {
        self.courts as usize * 4
    }

    pub fn can_start(&self) -> bool {
        match self.mode {
            ModeKind::Rotating => validate_roster_size(self.players.len()).is_ok(),
            ModeKind::FixedPairs => validate_fixed_pairs(&self.players, &self.pairs).is_ok(),
        }
    }

    /// Build the tournament and start it.
    pub fn start(self) -> Result<Tournament, TournamentError> {
        let category = if self.category.is_empty() {
            DEFAULT_CATEGORY.to_string()
        } else {
            self.category
        };
        let name = if self.name.is_empty() {
            format!("{} - {}", self.mode.label(), category)
        } else {
            self.name
        };
        let mode = match self.mode {
            ModeKind::Rotating => TournamentMode::Rotating,
            ModeKind::FixedPairs => TournamentMode::FixedPairs { pairs: self.pairs },
        };
        let mut tournament = Tournament::new(name, category, mode, self.players, self.courts);
        start_tournament(&mut tournament)?;
        Ok(tournament)
    }
}
