use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::warn;
use uuid::Uuid;

use crate::users::repo_types::{NewUser, User};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("email already registered")]
    DuplicateEmail,
    #[error("user not found")]
    NotFound,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Persistence port for user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    /// Insert a new user. Fails with [`StoreError::DuplicateEmail`] when the
    /// email is taken.
    async fn create(&self, user: NewUser) -> Result<User, StoreError>;
    /// Overwrite every mutable column of an existing user.
    async fn save(&self, user: &User) -> Result<User, StoreError>;
}

const USER_COLUMNS: &str = "id, name, email, password_hash, photo, phone, nickname, city, \
     linked_in, github, instagram, facebook, website, description, services, tags, \
     created_at, updated_at";

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .context("connect to database")?;

        if let Err(e) = sqlx::migrate!("./migrations").run(&db).await {
            warn!(error = %e, "migration failed; continuing");
        }

        Ok(Self { db })
    }
}

fn map_write_error(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return StoreError::DuplicateEmail;
        }
    }
    StoreError::Database(e)
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let NewUser {
            name,
            email,
            password_hash,
            profile: p,
        } = user;

        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, email, password_hash, photo, phone, nickname, city,
                               linked_in, github, instagram, facebook, website, description,
                               services, tags)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(p.photo)
        .bind(p.phone)
        .bind(p.nickname)
        .bind(p.city)
        .bind(p.linked_in)
        .bind(p.github)
        .bind(p.instagram)
        .bind(p.facebook)
        .bind(p.website)
        .bind(p.description)
        .bind(p.services)
        .bind(p.tags)
        .fetch_one(&self.db)
        .await
        .map_err(map_write_error)
    }

    async fn save(&self, user: &User) -> Result<User, StoreError> {
        let p = &user.profile;
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
               SET name = $2, email = $3, password_hash = $4, photo = $5, phone = $6,
                   nickname = $7, city = $8, linked_in = $9, github = $10, instagram = $11,
                   facebook = $12, website = $13, description = $14, services = $15,
                   tags = $16, updated_at = now()
             WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&p.photo)
        .bind(&p.phone)
        .bind(&p.nickname)
        .bind(&p.city)
        .bind(&p.linked_in)
        .bind(&p.github)
        .bind(&p.instagram)
        .bind(&p.facebook)
        .bind(&p.website)
        .bind(&p.description)
        .bind(&p.services)
        .bind(&p.tags)
        .fetch_optional(&self.db)
        .await
        .map_err(map_write_error)?
        .ok_or(StoreError::NotFound)
    }
}
