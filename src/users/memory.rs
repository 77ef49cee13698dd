use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::users::{
    repo::{StoreError, UserStore},
    repo_types::{NewUser, User},
};

/// Process-local user store. Email uniqueness is checked under the same write
/// lock as the insert.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateEmail);
        }

        let now = OffsetDateTime::now_utc();
        let record = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            profile: user.profile,
            created_at: now,
            updated_at: now,
        };
        users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn save(&self, user: &User) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(StoreError::NotFound);
        }
        if users
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(StoreError::DuplicateEmail);
        }

        let existing = users.get_mut(&user.id).ok_or(StoreError::NotFound)?;
        let created_at = existing.created_at;
        *existing = User {
            created_at,
            updated_at: OffsetDateTime::now_utc(),
            ..user.clone()
        };
        Ok(existing.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::repo_types::ProfileFields;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Ana".into(),
            email: email.into(),
            password_hash: "hash".into(),
            profile: ProfileFields::default(),
        }
    }

    #[tokio::test]
    async fn create_assigns_id_and_finds_by_email_and_id() {
        let store = MemoryUserStore::new();
        let user = store.create(new_user("ana@example.com")).await.unwrap();

        let by_email = store.find_by_email("ana@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, user.id);
        let by_id = store.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "ana@example.com");
        assert!(store.find_by_email("other@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn create_rejects_duplicate_email() {
        let store = MemoryUserStore::new();
        store.create(new_user("dup@example.com")).await.unwrap();
        let err = store.create(new_user("dup@example.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn concurrent_creates_with_same_email_store_one_record() {
        let store = std::sync::Arc::new(MemoryUserStore::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.create(new_user("race@example.com")).await })
            })
            .collect();

        let mut created = 0;
        for h in handles {
            if h.await.unwrap().is_ok() {
                created += 1;
            }
        }
        assert_eq!(created, 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn save_overwrites_and_keeps_created_at() {
        let store = MemoryUserStore::new();
        let mut user = store.create(new_user("ana@example.com")).await.unwrap();
        user.name = "Ana María".into();
        user.profile.city = Some("Monterrey".into());

        let saved = store.save(&user).await.unwrap();
        assert_eq!(saved.name, "Ana María");
        assert_eq!(saved.created_at, user.created_at);
        let stored = store.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(stored.profile.city.as_deref(), Some("Monterrey"));
    }

    #[tokio::test]
    async fn save_missing_user_is_not_found() {
        let store = MemoryUserStore::new();
        let mut user = store.create(new_user("ana@example.com")).await.unwrap();
        user.id = Uuid::new_v4();
        assert!(matches!(store.save(&user).await, Err(StoreError::NotFound)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn save_rejects_email_of_another_user() {
        let store = MemoryUserStore::new();
        store.create(new_user("a@example.com")).await.unwrap();
        let mut b = store.create(new_user("b@example.com")).await.unwrap();
        b.email = "a@example.com".into();
        assert!(matches!(store.save(&b).await, Err(StoreError::DuplicateEmail)));
    }
}
