//! # User Repository
//!
//! Database operations for application users.
//!
//! Password hashing lives in the server layer; this repository only
//! ever sees and stores the finished hash. `get_by_username` is the
//! login lookup.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use almacen_core::{NewUser, UpdateUser, User};

const USER_COLUMNS: &str = "id, username, password_hash, role, fullname, created_at, updated_at";

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Lists all users, ordered by username.
    pub async fn list_all(&self) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY username"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Gets a user by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Gets a user by username (the login lookup).
    pub async fn get_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Inserts a new user with an already-computed password hash and
    /// returns its generated id.
    ///
    /// ## Errors
    /// * `DbError::UniqueViolation` - username already taken
    pub async fn insert(&self, user: &NewUser, password_hash: &str) -> DbResult<i64> {
        debug!(username = %user.username, "Inserting user");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, role, fullname, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            "#,
        )
        .bind(&user.username)
        .bind(password_hash)
        .bind(&user.role)
        .bind(&user.fullname)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Updates a user. `password_hash` of `None` keeps the stored hash.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - User doesn't exist
    /// * `DbError::UniqueViolation` - new username already taken
    pub async fn update(
        &self,
        id: i64,
        user: &UpdateUser,
        password_hash: Option<&str>,
    ) -> DbResult<()> {
        debug!(id = %id, "Updating user");

        let now = Utc::now();

        let result = match password_hash {
            Some(hash) => {
                sqlx::query(
                    r#"
                    UPDATE users SET
                        username = ?2, password_hash = ?3, role = ?4,
                        fullname = ?5, updated_at = ?6
                    WHERE id = ?1
                    "#,
                )
                .bind(id)
                .bind(&user.username)
                .bind(hash)
                .bind(&user.role)
                .bind(&user.fullname)
                .bind(now)
                .execute(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    r#"
                    UPDATE users SET
                        username = ?2, role = ?3, fullname = ?4, updated_at = ?5
                    WHERE id = ?1
                    "#,
                )
                .bind(id)
                .bind(&user.username)
                .bind(&user.role)
                .bind(&user.fullname)
                .bind(now)
                .execute(&self.pool)
                .await?
            }
        };

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Usuario", id));
        }

        Ok(())
    }

    /// Deletes a user. Sales they recorded keep their `created_by` and
    /// simply lose the join name.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - User doesn't exist
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Deleting user");

        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Usuario", id));
        }

        Ok(())
    }

    /// Counts users. Used by the startup admin seed check.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};
    use almacen_core::{NewUser, UpdateUser};

    fn user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            password: "irrelevant".to_string(),
            role: "Vendedor".to_string(),
            fullname: Some("Test User".to_string()),
        }
    }

    #[tokio::test]
    async fn test_insert_and_lookup_by_username() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.users();

        let id = repo.insert(&user("ana"), "hash-a").await.unwrap();

        let found = repo.get_by_username("ana").await.unwrap().unwrap();
        assert_eq!(found.id, id);
        assert_eq!(found.password_hash, "hash-a");

        assert!(repo.get_by_username("nadie").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.users();

        repo.insert(&user("ana"), "hash-a").await.unwrap();
        let err = repo.insert(&user("ana"), "hash-b").await.unwrap_err();
        assert!(matches!(err, crate::DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_update_without_password_keeps_hash() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.users();

        let id = repo.insert(&user("ana"), "hash-a").await.unwrap();

        repo.update(
            id,
            &UpdateUser {
                username: "ana".to_string(),
                password: None,
                role: "Administrador".to_string(),
                fullname: None,
            },
            None,
        )
        .await
        .unwrap();

        let found = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(found.role, "Administrador");
        assert_eq!(found.password_hash, "hash-a");
    }

    #[tokio::test]
    async fn test_update_with_password_replaces_hash() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.users();

        let id = repo.insert(&user("ana"), "hash-a").await.unwrap();

        repo.update(
            id,
            &UpdateUser {
                username: "ana".to_string(),
                password: Some("nueva".to_string()),
                role: "Vendedor".to_string(),
                fullname: None,
            },
            Some("hash-b"),
        )
        .await
        .unwrap();

        let found = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(found.password_hash, "hash-b");
    }

    #[tokio::test]
    async fn test_delete_and_count() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.users();

        let id = repo.insert(&user("ana"), "hash-a").await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);

        repo.delete(id).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 0);
        assert!(repo.delete(id).await.is_err());
    }
}
