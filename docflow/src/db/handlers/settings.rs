//! Singleton settings row: currently only the VAT rate.

use crate::db::errors::Result;
use rust_decimal::Decimal;
use sqlx::PgConnection;
use tracing::instrument;

pub struct Settings<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Settings<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// The configured VAT rate, or `default` when no settings row exists.
    #[instrument(skip(self), err)]
    pub async fn vat_rate(&mut self, default: Decimal) -> Result<Decimal> {
        let rate: Option<Decimal> = sqlx::query_scalar("SELECT vat_rate FROM settings")
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(rate.unwrap_or(default))
    }

    /// Seed the settings row if missing. Called once at startup; an existing
    /// row is left untouched so manual changes survive restarts.
    #[instrument(skip(self), err)]
    pub async fn ensure(&mut self, default: Decimal) -> Result<()> {
        sqlx::query("INSERT INTO settings (singleton, vat_rate) VALUES (TRUE, $1) ON CONFLICT (singleton) DO NOTHING")
            .bind(default)
            .execute(&mut *self.db)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_vat_rate_falls_back_to_default(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Settings::new(&mut conn);

        let default = Decimal::new(5, 2);
        assert_eq!(repo.vat_rate(default).await.unwrap(), default);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_ensure_does_not_overwrite_existing_rate(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Settings::new(&mut conn);

        repo.ensure(Decimal::new(5, 2)).await.unwrap();
        repo.ensure(Decimal::new(20, 2)).await.unwrap();

        assert_eq!(repo.vat_rate(Decimal::ZERO).await.unwrap(), Decimal::new(5, 2));
    }
}
