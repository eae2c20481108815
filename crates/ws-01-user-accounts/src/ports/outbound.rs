//! # Outbound Port - Document Store
//!
//! The keyed document store holding one [`User`] per reference. Query shape
//! (matching inside nested badge arrays, device sub-documents) belongs to the
//! adapter.

use async_trait::async_trait;
use shared_types::{Device, StoreError, User, WallsBadge};

/// Persistence collaborator for the user aggregate.
///
/// Lookups that match nothing return [`StoreError::NotFound`].
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new document. Fails with `Duplicate` if the reference exists.
    async fn create_user(&self, user: User) -> Result<String, StoreError>;

    /// Replace the whole document stored under `user_reference`.
    async fn update_user(&self, user_reference: &str, user: User) -> Result<String, StoreError>;

    async fn get_user_by_reference(&self, user_reference: &str) -> Result<User, StoreError>;

    async fn get_user_by_phone(&self, phone: &str) -> Result<User, StoreError>;

    /// Match a tag on any badge, profile or company scope.
    async fn get_user_by_walls_tag(&self, walls_tag: &str) -> Result<User, StoreError>;

    async fn get_user_by_walls_badge_reference(
        &self,
        walls_badge_reference: &str,
    ) -> Result<User, StoreError>;

    /// Match on type, imei, brand and model.
    async fn get_user_by_device(&self, device: &Device) -> Result<User, StoreError>;

    /// The default badge on the user's own profile.
    async fn get_user_default_walls_badge(
        &self,
        user_reference: &str,
    ) -> Result<WallsBadge, StoreError>;
}
