use std::collections::HashMap;

use async_trait::async_trait;
use shared_types::{Device, StoreError, User, WallsBadge};
use tokio::sync::RwLock;

use crate::ports::UserRepository;

/// In-memory document store keyed by `user_reference`.
///
/// Queries scan every document, matching nested badge arrays and the device
/// sub-document the way the production store's filters do.
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    async fn find_by<F>(&self, what: String, predicate: F) -> Result<User, StoreError>
    where
        F: Fn(&User) -> bool + Send,
    {
        let users = self.users.read().await;
        users
            .values()
            .find(|user| predicate(user))
            .cloned()
            .ok_or(StoreError::NotFound(what))
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn same_device(stored: &Device, candidate: &Device) -> bool {
    stored.device_type == candidate.device_type
        && stored.imei == candidate.imei
        && stored.brand == candidate.brand
        && stored.model == candidate.model
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_user(&self, user: User) -> Result<String, StoreError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.user_reference) {
            return Err(StoreError::Duplicate(user.user_reference));
        }
        let reference = user.user_reference.clone();
        users.insert(reference.clone(), user);
        Ok(reference)
    }

    async fn update_user(&self, user_reference: &str, user: User) -> Result<String, StoreError> {
        let mut users = self.users.write().await;
        match users.get_mut(user_reference) {
            Some(slot) => {
                *slot = user;
                Ok(user_reference.to_string())
            }
            None => Err(StoreError::NotFound(format!("user {user_reference}"))),
        }
    }

    async fn get_user_by_reference(&self, user_reference: &str) -> Result<User, StoreError> {
        self.users
            .read()
            .await
            .get(user_reference)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("user {user_reference}")))
    }

    async fn get_user_by_phone(&self, phone: &str) -> Result<User, StoreError> {
        self.find_by(format!("user with phone {phone}"), |user| {
            user.user_profile.phone == phone
        })
        .await
    }

    async fn get_user_by_walls_tag(&self, walls_tag: &str) -> Result<User, StoreError> {
        self.find_by(format!("user with walls tag {walls_tag}"), |user| {
            user.all_badges().any(|badge| badge.walls_tag == walls_tag)
        })
        .await
    }

    async fn get_user_by_walls_badge_reference(
        &self,
        walls_badge_reference: &str,
    ) -> Result<User, StoreError> {
        self.find_by(format!("user with walls badge {walls_badge_reference}"), |user| {
            user.all_badges()
                .any(|badge| badge.walls_badge_reference == walls_badge_reference)
        })
        .await
    }

    async fn get_user_by_device(&self, device: &Device) -> Result<User, StoreError> {
        self.find_by(format!("user with device {}", device.imei), |user| {
            same_device(&user.device, device)
        })
        .await
    }

    async fn get_user_default_walls_badge(
        &self,
        user_reference: &str,
    ) -> Result<WallsBadge, StoreError> {
        let user = self.get_user_by_reference(user_reference).await?;
        user.default_badge()
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("default walls badge for {user_reference}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::CompanyProfile;

    fn user(reference: &str, phone: &str) -> User {
        User {
            user_reference: reference.into(),
            user_profile: shared_types::UserProfile {
                phone: phone.into(),
                ..Default::default()
            },
            device: Device {
                device_reference: format!("d-{reference}"),
                imei: format!("imei-{reference}"),
                device_type: "mobile".into(),
                brand: "Tecno".into(),
                model: "Spark".into(),
            },
            ..Default::default()
        }
    }

    fn badge(reference: &str, tag: &str, is_default: bool) -> WallsBadge {
        WallsBadge {
            walls_badge_reference: reference.into(),
            walls_tag: tag.into(),
            is_default,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_reference() {
        let store = InMemoryUserRepository::new();
        store.create_user(user("u-1", "+2348000000001")).await.unwrap();

        let result = store.create_user(user("u-1", "+2348000000002")).await;
        assert!(matches!(result, Err(StoreError::Duplicate(_))));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_update_replaces_whole_document() {
        let store = InMemoryUserRepository::new();
        let mut stored = user("u-1", "+2348000000001");
        stored.is_active = true;
        store.create_user(stored).await.unwrap();

        store
            .update_user("u-1", user("u-1", "+2348000000009"))
            .await
            .unwrap();

        let fetched = store.get_user_by_reference("u-1").await.unwrap();
        assert_eq!(fetched.user_profile.phone, "+2348000000009");
        assert!(!fetched.is_active);

        let missing = store.update_user("u-9", user("u-9", "")).await;
        assert!(matches!(missing, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_badge_queries_search_company_scopes() {
        let store = InMemoryUserRepository::new();
        let mut owner = user("u-1", "+2348000000001");
        owner.user_profile.walls_badge.push(badge("wb-1", "PERSONAL", true));
        owner.company_profile.push(CompanyProfile {
            company_profile_reference: "c-1".into(),
            walls_badge: vec![badge("wb-2", "BUSINESS", true)],
            ..Default::default()
        });
        store.create_user(owner).await.unwrap();

        let by_tag = store.get_user_by_walls_tag("BUSINESS").await.unwrap();
        assert_eq!(by_tag.user_reference, "u-1");
        let by_badge = store.get_user_by_walls_badge_reference("wb-2").await.unwrap();
        assert_eq!(by_badge.user_reference, "u-1");
        assert!(store.get_user_by_walls_tag("NOBODY").await.is_err());

        let default = store.get_user_default_walls_badge("u-1").await.unwrap();
        assert_eq!(default.walls_badge_reference, "wb-1");
    }

    #[tokio::test]
    async fn test_default_badge_missing_is_not_found() {
        let store = InMemoryUserRepository::new();
        store.create_user(user("u-1", "+2348000000001")).await.unwrap();

        let result = store.get_user_default_walls_badge("u-1").await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_device_match_ignores_device_reference() {
        let store = InMemoryUserRepository::new();
        store.create_user(user("u-1", "+2348000000001")).await.unwrap();

        let mut candidate = user("u-1", "").device;
        candidate.device_reference = "another".into();
        assert_eq!(
            store.get_user_by_device(&candidate).await.unwrap().user_reference,
            "u-1"
        );

        candidate.model = "Camon".into();
        assert!(store.get_user_by_device(&candidate).await.is_err());
    }
}
