use crate::config::list_file;
use crate::error::WelcomerResult;
use camino::{Utf8Path, Utf8PathBuf};
use parking_lot::RwLock;
use std::collections::HashSet;

/// Players that are never greeted.
///
/// Lookups are case-sensitive. Every add or remove rewrites the whole file,
/// sorted case-insensitively.
#[derive(Debug)]
pub struct IgnoreRegistry {
    path: Utf8PathBuf,
    players: RwLock<HashSet<String>>,
}

impl IgnoreRegistry {
    /// Load the ignore list, creating an empty file if it doesn't exist.
    ///
    /// Read failures are logged and leave the registry empty.
    pub fn load(path: impl Into<Utf8PathBuf>) -> Self {
        let path = path.into();

        let players: HashSet<String> = match list_file::read_entries(&path) {
            Ok(Some(entries)) => entries.into_iter().collect(),
            Ok(None) => {
                if let Err(e) = list_file::write_entries(&path, &[], &[]) {
                    tracing::error!("Failed to create ignore list: {}", e);
                }
                HashSet::new()
            }
            Err(e) => {
                tracing::error!("Failed to load ignore list: {}", e);
                HashSet::new()
            }
        };

        tracing::info!("Loaded {} ignored players from {}", players.len(), path);

        Self {
            path,
            players: RwLock::new(players),
        }
    }

    pub fn contains(&self, player: &str) -> bool {
        self.players.read().contains(player)
    }

    /// Ignore a player and persist the list.
    ///
    /// Returns whether the player was newly added. Blank names are ignored.
    /// On a file error the in-memory set has still been updated.
    pub fn add(&self, player: &str) -> WelcomerResult<bool> {
        let player = player.trim();
        if player.is_empty() {
            return Ok(false);
        }

        let added = self.players.write().insert(player.to_string());
        self.persist()?;
        tracing::debug!("Player ignored: {}", player);
        Ok(added)
    }

    /// Stop ignoring a player and persist the list.
    ///
    /// Returns whether the player was present.
    pub fn remove(&self, player: &str) -> WelcomerResult<bool> {
        let player = player.trim();
        if player.is_empty() {
            return Ok(false);
        }

        let removed = self.players.write().remove(player);
        self.persist()?;
        tracing::debug!("Player unignored: {}", player);
        Ok(removed)
    }

    /// Ignored players sorted the way they are written to disk
    pub fn list(&self) -> Vec<String> {
        let mut players: Vec<String> = self.players.read().iter().cloned().collect();
        sort_case_insensitive(&mut players);
        players
    }

    pub fn len(&self) -> usize {
        self.players.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.read().is_empty()
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn persist(&self) -> WelcomerResult<()> {
        let players = self.list();
        list_file::write_entries(&self.path, &[], &players)?;
        tracing::debug!("Ignore list persisted with {} players", players.len());
        Ok(())
    }
}

/// Case-insensitive order; ties fall back to byte order so output is stable
fn sort_case_insensitive(players: &mut [String]) {
    players.sort_by(|a, b| {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    });
}
