//! Document store over SQLite.
//!
//! Every collection is a table of JSON documents keyed by the entity's natural
//! key. The primary key enforces uniqueness; upsert is a single statement.

use std::str::FromStr;
use std::time::Duration;

use chrono::Utc;
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};

use crate::core::models::{
    Account, Document, GitHubUser, Organization, Project, Repository, Team,
};
use crate::errors::AppError;

const COLLECTIONS: [&str; 6] = [
    Organization::COLLECTION,
    GitHubUser::COLLECTION,
    Repository::COLLECTION,
    Team::COLLECTION,
    Account::COLLECTION,
    Project::COLLECTION,
];

#[derive(Debug, Clone)]
pub struct DocumentStore {
    pool: SqlitePool,
}

impl DocumentStore {
    /// Opens the pool and creates any missing collection tables.
    ///
    /// An in-memory URL gets a single long-lived connection, since each
    /// SQLite memory connection is its own database.
    ///
    /// # Errors
    ///
    /// Returns the underlying `sqlx` error when the URL is invalid or the
    /// database cannot be opened.
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool_options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(10)
        };

        let pool = pool_options
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        info!("Document store ready");
        Ok(store)
    }

    /// # Errors
    ///
    /// Returns the underlying `sqlx` error if a table cannot be created.
    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        for collection in COLLECTIONS {
            let ddl = format!(
                "CREATE TABLE IF NOT EXISTS {collection} (\
                 key TEXT PRIMARY KEY NOT NULL, \
                 doc TEXT NOT NULL, \
                 updated_at TEXT NOT NULL)"
            );
            sqlx::query(&ddl).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Inserts `doc`, or overwrites the stored document with the same key.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Internal` on serialization or database failure.
    pub async fn upsert<T: Document>(&self, doc: &T) -> Result<(), AppError> {
        let sql = format!(
            "INSERT INTO {} (key, doc, updated_at) VALUES (?, ?, ?) \
             ON CONFLICT(key) DO UPDATE SET doc = excluded.doc, updated_at = excluded.updated_at",
            T::COLLECTION
        );
        sqlx::query(&sql)
            .bind(doc.key())
            .bind(serde_json::to_string(doc)?)
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await?;

        debug!(collection = T::COLLECTION, key = doc.key(), "Upserted document");
        Ok(())
    }

    /// Inserts `doc` only if its key is unused.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if a document with the same key exists.
    pub async fn insert_new<T: Document>(&self, doc: &T) -> Result<(), AppError> {
        let sql = format!(
            "INSERT INTO {} (key, doc, updated_at) VALUES (?, ?, ?)",
            T::COLLECTION
        );
        let result = sqlx::query(&sql)
            .bind(doc.key())
            .bind(serde_json::to_string(doc)?)
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(
                AppError::Validation(format!("{} already exists", doc.key())),
            ),
            Err(e) => Err(e.into()),
        }
    }

    /// # Errors
    ///
    /// Returns `AppError::Internal` on database or decoding failure.
    pub async fn find<T: Document>(&self, key: &str) -> Result<Option<T>, AppError> {
        let sql = format!("SELECT doc FROM {} WHERE key = ?", T::COLLECTION);
        let row = sqlx::query(&sql)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let doc: String = row.try_get("doc")?;
                Ok(Some(serde_json::from_str(&doc)?))
            }
            None => Ok(None),
        }
    }

    /// All documents of a collection, ordered by key.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Internal` on database or decoding failure.
    pub async fn list<T: Document>(&self) -> Result<Vec<T>, AppError> {
        let sql = format!("SELECT doc FROM {} ORDER BY key", T::COLLECTION);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| -> Result<T, AppError> {
                let doc: String = row.try_get("doc")?;
                Ok(serde_json::from_str(&doc)?)
            })
            .collect()
    }

    /// Returns whether a document was removed.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Internal` on database failure.
    pub async fn delete<T: Document>(&self, key: &str) -> Result<bool, AppError> {
        let sql = format!("DELETE FROM {} WHERE key = ?", T::COLLECTION);
        let result = sqlx::query(&sql).bind(key).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// # Errors
    ///
    /// Returns `AppError::Internal` on database failure.
    pub async fn count<T: Document>(&self) -> Result<u64, AppError> {
        let sql = format!("SELECT COUNT(*) AS n FROM {}", T::COLLECTION);
        let row = sqlx::query(&sql).fetch_one(&self.pool).await?;
        let n: i64 = row.try_get("n")?;
        Ok(u64::try_from(n).unwrap_or_default())
    }

    // ------------------------------------------------------------------------
    // Typed helpers used by the synchronization job
    // ------------------------------------------------------------------------

    /// # Errors
    ///
    /// See [`DocumentStore::upsert`].
    pub async fn save_organization(&self, org: &Organization) -> Result<(), AppError> {
        self.upsert(org).await
    }

    /// # Errors
    ///
    /// See [`DocumentStore::upsert`].
    pub async fn save_user(&self, user: &GitHubUser) -> Result<(), AppError> {
        self.upsert(user).await
    }

    /// # Errors
    ///
    /// See [`DocumentStore::upsert`].
    pub async fn save_repository(&self, repo: &Repository) -> Result<(), AppError> {
        self.upsert(repo).await
    }

    /// # Errors
    ///
    /// See [`DocumentStore::upsert`].
    pub async fn save_team(&self, team: &Team) -> Result<(), AppError> {
        self.upsert(team).await
    }

    async fn team(&self, team_name: &str) -> Result<Team, AppError> {
        self.find::<Team>(team_name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Team {team_name} not found")))
    }

    /// Stored users referenced by a team, in the team's member order. Members
    /// without a stored user record are skipped.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the team is not stored.
    pub async fn users_in_team(&self, team_name: &str) -> Result<Vec<GitHubUser>, AppError> {
        let team = self.team(team_name).await?;
        let mut users = Vec::with_capacity(team.members.len());
        for username in &team.members {
            if let Some(user) = self.find::<GitHubUser>(username).await? {
                users.push(user);
            }
        }
        Ok(users)
    }

    /// Stored repositories referenced by a team, in the team's order.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the team is not stored.
    pub async fn repositories_in_team(&self, team_name: &str) -> Result<Vec<Repository>, AppError> {
        let team = self.team(team_name).await?;
        let mut repos = Vec::with_capacity(team.repositories.len());
        for name in &team.repositories {
            if let Some(repo) = self.find::<Repository>(name).await? {
                repos.push(repo);
            }
        }
        Ok(repos)
    }
}
