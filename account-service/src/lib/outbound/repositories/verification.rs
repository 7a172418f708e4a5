use async_trait::async_trait;
use sqlx::FromRow;
use sqlx::PgPool;

use crate::domain::user::models::UserId;
use crate::domain::user::models::VerificationToken;
use crate::domain::user::ports::VerificationTokenRepository;
use crate::user::errors::UserError;

pub struct PostgresVerificationTokenRepository {
    pool: PgPool,
}

impl PostgresVerificationTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ConsumedRow {
    user_id: i64,
}

#[async_trait]
impl VerificationTokenRepository for PostgresVerificationTokenRepository {
    async fn store(&self, token: &VerificationToken) -> Result<(), UserError> {
        sqlx::query(
            r#"
            INSERT INTO email_verification_tokens (token, user_id, created_at, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&token.token)
        .bind(token.user_id.0)
        .bind(token.created_at)
        .bind(token.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn consume(&self, token: &str) -> Result<Option<UserId>, UserError> {
        // Single statement, so concurrent redemptions of the same token
        // cannot both succeed.
        let row = sqlx::query_as::<_, ConsumedRow>(
            r#"
            DELETE FROM email_verification_tokens
            WHERE token = $1 AND expires_at > now()
            RETURNING user_id
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        Ok(row.map(|r| UserId(r.user_id)))
    }
}
