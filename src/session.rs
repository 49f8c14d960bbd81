use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::aggregate::Selection;
use crate::projection::BarSort;

/// Everything one viewer has chosen. Owned by the host and passed by reference into the
/// pure analysis functions, so two sessions never share mutable state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub selection: Selection,
    pub display_team_name: bool,
    pub selected_team: Option<String>,
    pub split_home_away: bool,
    pub bar_sort: BarSort,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            selection: Selection::default(),
            display_team_name: false,
            selected_team: None,
            split_home_away: true,
            bar_sort: BarSort::TeamName,
        }
    }
}

impl Session {
    /// Keeps the team choice valid against the sorted team list, defaulting to the first.
    pub fn ensure_team(&mut self, teams: &[String]) {
        let valid = self
            .selected_team
            .as_ref()
            .is_some_and(|t| teams.iter().any(|name| name == t));
        if !valid {
            self.selected_team = teams.first().cloned();
        }
    }

    pub fn cycle_team(&mut self, teams: &[String], forward: bool) {
        if teams.is_empty() {
            self.selected_team = None;
            return;
        }
        let current = self
            .selected_team
            .as_ref()
            .and_then(|t| teams.iter().position(|name| name == t));
        let next = match (current, forward) {
            (None, _) => 0,
            (Some(idx), true) => (idx + 1) % teams.len(),
            (Some(0), false) => teams.len() - 1,
            (Some(idx), false) => idx - 1,
        };
        self.selected_team = teams.get(next).cloned();
    }
}

/// Shared-secret gate in front of the dashboard. Compares SHA-256 digests so the check
/// does not depend on where the first differing byte is.
#[derive(Clone)]
pub struct PasswordGate {
    digest: [u8; 32],
}

impl PasswordGate {
    pub fn new(secret: &str) -> Self {
        Self {
            digest: digest(secret),
        }
    }

    pub fn check(&self, attempt: &str) -> bool {
        let candidate = digest(attempt);
        candidate
            .iter()
            .zip(self.digest.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

impl std::fmt::Debug for PasswordGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordGate(..)")
    }
}

fn digest(raw: &str) -> [u8; 32] {
    let hashed = Sha256::digest(raw.as_bytes());
    let mut out = [0u8; 32];
    out.copy_from_slice(&hashed);
    out
}
