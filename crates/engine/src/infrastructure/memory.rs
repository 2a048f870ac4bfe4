//! In-memory game state storage.
//!
//! Backs tests and the `memory` store backend. All tables live behind one
//! `RwLock`, so a [`ChangeSet`] commit is applied under a single write guard.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;
use zoohunt_domain::{
    AchievementRecord, AggregateStats, CreatureName, Player, PlayerId, ZooEntry,
};

use crate::infrastructure::ports::{ChangeSet, GameRepo, RepoError};

#[derive(Default)]
struct Tables {
    players: HashMap<PlayerId, Player>,
    zoo: BTreeMap<(PlayerId, String), ZooEntry>,
    achievements: BTreeMap<(PlayerId, String), AchievementRecord>,
}

impl Tables {
    fn put_zoo_entry(&mut self, entry: &ZooEntry) {
        self.zoo.insert(
            (entry.player_id(), entry.creature().as_str().to_string()),
            entry.clone(),
        );
    }

    fn put_achievement(&mut self, record: &AchievementRecord) {
        self.achievements.insert(
            (record.player_id(), record.name().to_string()),
            record.clone(),
        );
    }

    fn zoo_of(&self, player_id: PlayerId) -> impl Iterator<Item = &ZooEntry> {
        self.zoo
            .iter()
            .filter(move |((owner, _), _)| *owner == player_id)
            .map(|(_, entry)| entry)
    }
}

/// In-memory implementation of [`GameRepo`].
#[derive(Default)]
pub struct InMemoryGameRepo {
    tables: RwLock<Tables>,
}

impl InMemoryGameRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GameRepo for InMemoryGameRepo {
    async fn get_player(&self, id: PlayerId) -> Result<Option<Player>, RepoError> {
        Ok(self.tables.read().await.players.get(&id).cloned())
    }

    async fn upsert_player(&self, player: &Player) -> Result<(), RepoError> {
        self.tables
            .write()
            .await
            .players
            .insert(player.id(), player.clone());
        Ok(())
    }

    async fn list_autohunt_players(&self) -> Result<Vec<PlayerId>, RepoError> {
        let tables = self.tables.read().await;
        let mut ids: Vec<PlayerId> = tables
            .players
            .values()
            .filter(|p| p.autohunt_enabled())
            .map(|p| p.id())
            .collect();
        ids.sort();
        Ok(ids)
    }

    async fn get_zoo_entry(
        &self,
        player_id: PlayerId,
        creature: &CreatureName,
    ) -> Result<Option<ZooEntry>, RepoError> {
        Ok(self
            .tables
            .read()
            .await
            .zoo
            .get(&(player_id, creature.as_str().to_string()))
            .cloned())
    }

    async fn upsert_zoo_entry(&self, entry: &ZooEntry) -> Result<(), RepoError> {
        self.tables.write().await.put_zoo_entry(entry);
        Ok(())
    }

    async fn list_zoo_entries(&self, player_id: PlayerId) -> Result<Vec<ZooEntry>, RepoError> {
        Ok(self.tables.read().await.zoo_of(player_id).cloned().collect())
    }

    async fn aggregate_stats(&self, player_id: PlayerId) -> Result<AggregateStats, RepoError> {
        let tables = self.tables.read().await;
        Ok(AggregateStats::from_entries(tables.zoo_of(player_id)))
    }

    async fn get_achievement(
        &self,
        player_id: PlayerId,
        name: &str,
    ) -> Result<Option<AchievementRecord>, RepoError> {
        Ok(self
            .tables
            .read()
            .await
            .achievements
            .get(&(player_id, name.to_string()))
            .cloned())
    }

    async fn upsert_achievement(&self, record: &AchievementRecord) -> Result<(), RepoError> {
        self.tables.write().await.put_achievement(record);
        Ok(())
    }

    async fn list_achievements(
        &self,
        player_id: PlayerId,
    ) -> Result<Vec<AchievementRecord>, RepoError> {
        Ok(self
            .tables
            .read()
            .await
            .achievements
            .iter()
            .filter(|((owner, _), _)| *owner == player_id)
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn commit(&self, changes: &ChangeSet) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables
            .players
            .insert(changes.player.id(), changes.player.clone());
        for entry in &changes.zoo_entries {
            tables.put_zoo_entry(entry);
        }
        for record in &changes.achievements {
            tables.put_achievement(record);
        }
        Ok(())
    }
}
