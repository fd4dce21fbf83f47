//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use platform::password::HashedPassword;
use sqlx::PgPool;

use crate::domain::device_registry::MAX_DEVICES_PER_ACCOUNT;
use crate::domain::entity::{Account, DeviceBinding};
use crate::domain::repository::{AccountRepository, DeviceRepository};
use crate::domain::value_object::{DeviceAddress, Email};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Remove device bindings whose expiry window has lapsed.
    ///
    /// Called at startup and from the periodic sweep task; never invoked
    /// synchronously by a request path.
    pub async fn cleanup_expired(&self) -> AuthResult<u64> {
        let deleted = sqlx::query("DELETE FROM device_bindings WHERE expires_at < now()")
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(bindings_deleted = deleted, "Cleaned up expired device bindings");

        Ok(deleted)
    }
}

// ============================================================================
// Account Repository Implementation
// ============================================================================

impl AccountRepository for PgAuthRepository {
    async fn save_account(&self, email: &Email, password_hash: &HashedPassword) -> AuthResult<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO accounts (email, password_hash)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(email.as_str())
        .bind(password_hash.as_phc_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AuthError::AlreadyExists
            }
            _ => AuthError::Database(e),
        })?;

        Ok(id)
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT
                id,
                email,
                password_hash,
                registered_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_account()).transpose()
    }
}

// ============================================================================
// Device Repository Implementation
// ============================================================================

impl DeviceRepository for PgAuthRepository {
    /// Insert or refresh a binding with the quota check and the write in
    /// one transaction. Locking the account row serializes concurrent
    /// binds for the same email, so two simultaneous logins from new
    /// devices cannot both observe "4 of 5 used" and both succeed.
    async fn bind_device(&self, binding: &DeviceBinding) -> AuthResult<()> {
        let email = binding.email.as_str();
        let device = binding.device_address.as_str();

        let mut tx = self.pool.begin().await?;

        let account_id = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM accounts WHERE email = $1 FOR UPDATE",
        )
        .bind(email)
        .fetch_optional(&mut *tx)
        .await?;

        if account_id.is_none() {
            return Err(AuthError::AccountNotFound);
        }

        // Re-binding a live pair only refreshes its window. An expired
        // row that the sweep has not removed yet is not a binding any
        // more; it must re-pass the quota check like a new device.
        let refreshed = sqlx::query(
            r#"
            UPDATE device_bindings
            SET bound_at = $3, expires_at = $4
            WHERE email = $1 AND device_address = $2 AND expires_at > now()
            "#,
        )
        .bind(email)
        .bind(device)
        .bind(binding.bound_at)
        .bind(binding.expires_at)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if refreshed == 0 {
            let live = sqlx::query_scalar::<_, i64>(
                r#"
                SELECT COUNT(*)
                FROM device_bindings
                WHERE email = $1 AND expires_at > now()
                "#,
            )
            .bind(email)
            .fetch_one(&mut *tx)
            .await?;

            if live >= MAX_DEVICES_PER_ACCOUNT {
                // Dropping the transaction rolls back; existing bindings
                // stay untouched
                return Err(AuthError::QuotaExceeded);
            }

            // The pair may still occupy a lapsed row; the upsert takes
            // it over now that the quota check has passed
            sqlx::query(
                r#"
                INSERT INTO device_bindings (email, device_address, bound_at, expires_at)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (email, device_address)
                DO UPDATE SET bound_at = EXCLUDED.bound_at, expires_at = EXCLUDED.expires_at
                "#,
            )
            .bind(email)
            .bind(device)
            .bind(binding.bound_at)
            .bind(binding.expires_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    async fn device_exists(&self, email: &Email, device: &DeviceAddress) -> AuthResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM device_bindings
                WHERE email = $1 AND device_address = $2 AND expires_at > now()
            )
            "#,
        )
        .bind(email.as_str())
        .bind(device.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: i64,
    email: String,
    password_hash: String,
    registered_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self) -> AuthResult<Account> {
        let password_hash = HashedPassword::from_phc_string(self.password_hash)
            .map_err(|e| AuthError::Internal(format!("Stored hash is not valid PHC: {e}")))?;

        Ok(Account {
            id: self.id,
            email: Email::from_db(self.email),
            password_hash,
            registered_at: self.registered_at,
        })
    }
}
