//! SQLite-backed game state storage.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use sqlx::error::ErrorKind;
use sqlx::sqlite::{SqliteConnectOptions, SqliteRow};
use sqlx::{Row, Sqlite, SqlitePool};
use std::str::FromStr;
use uuid::Uuid;
use zoohunt_domain::{
    AchievementRecord, AggregateStats, CreatureName, Player, PlayerId, Rarity, ZooEntry,
};

use crate::infrastructure::ports::{ChangeSet, GameRepo, RepoError};

/// SQLite implementation of [`GameRepo`].
///
/// Timestamps are stored as Unix seconds. [`GameRepo::commit`] runs inside one
/// transaction.
pub struct SqliteGameRepo {
    pool: SqlitePool,
}

impl SqliteGameRepo {
    pub async fn new(db_path: &str) -> Result<Self, RepoError> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", db_path))
            .map_err(|e| RepoError::database("connect", e))?;
        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(|e| RepoError::database("connect", e))?;

        let repo = Self { pool };
        repo.ensure_schema().await?;
        Ok(repo)
    }

    async fn ensure_schema(&self) -> Result<(), RepoError> {
        for statement in [
            r#"
            CREATE TABLE IF NOT EXISTS players (
                id TEXT PRIMARY KEY,
                balance INTEGER NOT NULL DEFAULT 0 CHECK (balance >= 0),
                last_daily INTEGER NOT NULL DEFAULT 0,
                last_hunt INTEGER NOT NULL DEFAULT 0,
                xp_boost_active INTEGER NOT NULL DEFAULT 0,
                double_coins_active INTEGER NOT NULL DEFAULT 0,
                autohunt_active INTEGER NOT NULL DEFAULT 0
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS zoo (
                player_id TEXT NOT NULL,
                creature TEXT NOT NULL,
                rarity TEXT NOT NULL,
                count INTEGER NOT NULL DEFAULT 0 CHECK (count >= 0),
                xp INTEGER NOT NULL DEFAULT 0,
                level INTEGER NOT NULL DEFAULT 1 CHECK (level >= 1),
                evolution_stage INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (player_id, creature)
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS achievements (
                player_id TEXT NOT NULL,
                achievement TEXT NOT NULL,
                unlocked INTEGER NOT NULL DEFAULT 0,
                reward_coins INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (player_id, achievement)
            )
            "#,
        ] {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| RepoError::database("ensure_schema", e))?;
        }
        Ok(())
    }
}

// =============================================================================
// Row Writers (shared by single upserts and transactional commits)
// =============================================================================

/// Maps a failed write, separating schema constraint failures from other errors.
fn write_error(operation: &'static str, e: sqlx::Error) -> RepoError {
    match &e {
        sqlx::Error::Database(db)
            if matches!(
                db.kind(),
                ErrorKind::CheckViolation
                    | ErrorKind::UniqueViolation
                    | ErrorKind::NotNullViolation
                    | ErrorKind::ForeignKeyViolation
            ) =>
        {
            RepoError::constraint(operation, db.message())
        }
        _ => RepoError::database(operation, &e),
    }
}

async fn write_player<'e, E>(executor: E, player: &Player) -> Result<(), RepoError>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO players (id, balance, last_daily, last_hunt, xp_boost_active, double_coins_active, autohunt_active)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            balance = excluded.balance,
            last_daily = excluded.last_daily,
            last_hunt = excluded.last_hunt,
            xp_boost_active = excluded.xp_boost_active,
            double_coins_active = excluded.double_coins_active,
            autohunt_active = excluded.autohunt_active
        "#,
    )
    .bind(player.id().to_string())
    .bind(to_i64(player.balance())?)
    .bind(player.last_daily_claim().timestamp())
    .bind(player.last_hunt_at().timestamp())
    .bind(player.xp_boost_active())
    .bind(player.double_coins_active())
    .bind(player.autohunt_enabled())
    .execute(executor)
    .await
    .map_err(|e| write_error("upsert_player", e))?;
    Ok(())
}

async fn write_zoo_entry<'e, E>(executor: E, entry: &ZooEntry) -> Result<(), RepoError>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO zoo (player_id, creature, rarity, count, xp, level, evolution_stage)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(player_id, creature) DO UPDATE SET
            rarity = excluded.rarity,
            count = excluded.count,
            xp = excluded.xp,
            level = excluded.level,
            evolution_stage = excluded.evolution_stage
        "#,
    )
    .bind(entry.player_id().to_string())
    .bind(entry.creature().as_str())
    .bind(entry.rarity().as_str())
    .bind(i64::from(entry.count()))
    .bind(i64::from(entry.xp()))
    .bind(i64::from(entry.level()))
    .bind(i64::from(entry.evolution_stage()))
    .execute(executor)
    .await
    .map_err(|e| write_error("upsert_zoo_entry", e))?;
    Ok(())
}

async fn write_achievement<'e, E>(executor: E, record: &AchievementRecord) -> Result<(), RepoError>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO achievements (player_id, achievement, unlocked, reward_coins)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(player_id, achievement) DO UPDATE SET
            unlocked = excluded.unlocked,
            reward_coins = excluded.reward_coins
        "#,
    )
    .bind(record.player_id().to_string())
    .bind(record.name())
    .bind(record.unlocked())
    .bind(to_i64(record.reward_coins())?)
    .execute(executor)
    .await
    .map_err(|e| write_error("upsert_achievement", e))?;
    Ok(())
}

// =============================================================================
// Row Mapping
// =============================================================================

fn to_i64(value: u64) -> Result<i64, RepoError> {
    i64::try_from(value).map_err(RepoError::serialization)
}

fn column<'r, T>(row: &'r SqliteRow, name: &str) -> Result<T, RepoError>
where
    T: sqlx::Decode<'r, Sqlite> + sqlx::Type<Sqlite>,
{
    row.try_get(name)
        .map_err(|e| RepoError::serialization(format!("column {}: {}", name, e)))
}

fn unsigned<T: TryFrom<i64>>(row: &SqliteRow, name: &str) -> Result<T, RepoError> {
    let value: i64 = column(row, name)?;
    T::try_from(value)
        .map_err(|_| RepoError::serialization(format!("column {} out of range: {}", name, value)))
}

fn timestamp(row: &SqliteRow, name: &str) -> Result<DateTime<Utc>, RepoError> {
    let secs: i64 = column(row, name)?;
    Utc.timestamp_opt(secs, 0).single().ok_or_else(|| {
        RepoError::serialization(format!("column {} invalid timestamp: {}", name, secs))
    })
}

fn parse_player_id(row: &SqliteRow, name: &str) -> Result<PlayerId, RepoError> {
    let raw: String = column(row, name)?;
    Uuid::parse_str(&raw)
        .map(PlayerId::from_uuid)
        .map_err(|e| RepoError::serialization(format!("column {}: {}", name, e)))
}

fn row_to_player(row: &SqliteRow) -> Result<Player, RepoError> {
    Ok(Player::new(parse_player_id(row, "id")?)
        .with_balance(unsigned(row, "balance")?)
        .with_last_daily_claim(timestamp(row, "last_daily")?)
        .with_last_hunt_at(timestamp(row, "last_hunt")?)
        .with_xp_boost(column(row, "xp_boost_active")?)
        .with_double_coins(column(row, "double_coins_active")?)
        .with_autohunt(column(row, "autohunt_active")?))
}

fn row_to_zoo_entry(row: &SqliteRow) -> Result<ZooEntry, RepoError> {
    let creature: String = column(row, "creature")?;
    let rarity: String = column(row, "rarity")?;
    ZooEntry::restore(
        parse_player_id(row, "player_id")?,
        CreatureName::new(creature).map_err(RepoError::serialization)?,
        rarity.parse::<Rarity>().map_err(RepoError::serialization)?,
        unsigned(row, "count")?,
        unsigned(row, "xp")?,
        unsigned(row, "level")?,
        unsigned(row, "evolution_stage")?,
    )
    .map_err(RepoError::serialization)
}

fn row_to_achievement(row: &SqliteRow) -> Result<AchievementRecord, RepoError> {
    let name: String = column(row, "achievement")?;
    Ok(AchievementRecord::restore(
        parse_player_id(row, "player_id")?,
        name,
        column(row, "unlocked")?,
        unsigned(row, "reward_coins")?,
    ))
}

const ZOO_COLUMNS: &str = "player_id, creature, rarity, count, xp, level, evolution_stage";

#[async_trait]
impl GameRepo for SqliteGameRepo {
    async fn get_player(&self, id: PlayerId) -> Result<Option<Player>, RepoError> {
        let row = sqlx::query(
            "SELECT id, balance, last_daily, last_hunt, xp_boost_active, double_coins_active, autohunt_active FROM players WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("get_player", e))?;

        row.as_ref().map(row_to_player).transpose()
    }

    async fn upsert_player(&self, player: &Player) -> Result<(), RepoError> {
        write_player(&self.pool, player).await
    }

    async fn list_autohunt_players(&self) -> Result<Vec<PlayerId>, RepoError> {
        let rows = sqlx::query("SELECT id FROM players WHERE autohunt_active = 1 ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("list_autohunt_players", e))?;

        rows.iter().map(|row| parse_player_id(row, "id")).collect()
    }

    async fn get_zoo_entry(
        &self,
        player_id: PlayerId,
        creature: &CreatureName,
    ) -> Result<Option<ZooEntry>, RepoError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM zoo WHERE player_id = ? AND creature = ?",
            ZOO_COLUMNS
        ))
        .bind(player_id.to_string())
        .bind(creature.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("get_zoo_entry", e))?;

        row.as_ref().map(row_to_zoo_entry).transpose()
    }

    async fn upsert_zoo_entry(&self, entry: &ZooEntry) -> Result<(), RepoError> {
        write_zoo_entry(&self.pool, entry).await
    }

    async fn list_zoo_entries(&self, player_id: PlayerId) -> Result<Vec<ZooEntry>, RepoError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM zoo WHERE player_id = ? ORDER BY creature",
            ZOO_COLUMNS
        ))
        .bind(player_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("list_zoo_entries", e))?;

        rows.iter().map(row_to_zoo_entry).collect()
    }

    async fn aggregate_stats(&self, player_id: PlayerId) -> Result<AggregateStats, RepoError> {
        let rows = sqlx::query(
            r#"
            SELECT rarity, COUNT(*) AS species, COALESCE(SUM(count), 0) AS captured
            FROM zoo
            WHERE player_id = ?
            GROUP BY rarity
            "#,
        )
        .bind(player_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("aggregate_stats", e))?;

        // GROUP BY omits empty tiers; start from zeros so every tier is present
        let mut stats = AggregateStats::empty();
        for row in &rows {
            let rarity: String = column(row, "rarity")?;
            let rarity = rarity.parse::<Rarity>().map_err(RepoError::serialization)?;
            let species: u32 = unsigned(row, "species")?;
            let captured: u64 = unsigned(row, "captured")?;
            stats.species_by_rarity.insert(rarity, species);
            stats.captured_by_rarity.insert(rarity, captured);
            stats.distinct_species += species;
            stats.total_captured += captured;
        }
        Ok(stats)
    }

    async fn get_achievement(
        &self,
        player_id: PlayerId,
        name: &str,
    ) -> Result<Option<AchievementRecord>, RepoError> {
        let row = sqlx::query(
            "SELECT player_id, achievement, unlocked, reward_coins FROM achievements WHERE player_id = ? AND achievement = ?",
        )
        .bind(player_id.to_string())
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("get_achievement", e))?;

        row.as_ref().map(row_to_achievement).transpose()
    }

    async fn upsert_achievement(&self, record: &AchievementRecord) -> Result<(), RepoError> {
        write_achievement(&self.pool, record).await
    }

    async fn list_achievements(
        &self,
        player_id: PlayerId,
    ) -> Result<Vec<AchievementRecord>, RepoError> {
        let rows = sqlx::query(
            "SELECT player_id, achievement, unlocked, reward_coins FROM achievements WHERE player_id = ? ORDER BY achievement",
        )
        .bind(player_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("list_achievements", e))?;

        rows.iter().map(row_to_achievement).collect()
    }

    async fn commit(&self, changes: &ChangeSet) -> Result<(), RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("commit", e))?;

        // Dropping `tx` on an early return rolls everything back
        write_player(&mut *tx, &changes.player).await?;
        for entry in &changes.zoo_entries {
            write_zoo_entry(&mut *tx, entry).await?;
        }
        for record in &changes.achievements {
            write_achievement(&mut *tx, record).await?;
        }

        tx.commit()
            .await
            .map_err(|e| RepoError::database("commit", e))?;
        Ok(())
    }
}
