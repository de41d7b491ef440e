//! Account, quota and asset collaborators
//!
//! The editor reads plan state and hands generated images off for storage
//! but owns neither. [`PlanGate`] and [`AssetStore`] are the seams; the
//! in-memory [`AccountLedger`] and [`MemoryAssetStore`] back the CLI and tests.

use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

use marque_core::GenerationParams;
use marque_image::ImagePayload;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{EditorError, Result};

/// Generations included with a free plan
pub const FREE_GENERATION_LIMIT: u32 = 10;

/// Subscription tier
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    #[default]
    Free,
    Pro,
    Business,
}

impl PlanTier {
    pub fn is_free(&self) -> bool {
        matches!(self, PlanTier::Free)
    }
}

/// The signed-in user as far as the editor cares
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub name: String,
    pub email: String,
    pub plan: PlanTier,
    pub generations_used: u32,
    /// Only enforced on the free plan
    pub generation_limit: u32,
}

impl UserAccount {
    pub fn free(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            plan: PlanTier::Free,
            generations_used: 0,
            generation_limit: FREE_GENERATION_LIMIT,
        }
    }

    pub fn with_plan(mut self, plan: PlanTier) -> Self {
        self.plan = plan;
        if !plan.is_free() {
            self.generation_limit = u32::MAX;
        }
        self
    }

    pub fn with_usage(mut self, generations_used: u32) -> Self {
        self.generations_used = generations_used;
        self
    }

    /// Whether another batch may be started
    pub fn has_generations_left(&self) -> bool {
        !self.plan.is_free() || self.generations_used < self.generation_limit
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Collaborator traits
// ─────────────────────────────────────────────────────────────────────────────

/// Quota decisions for logo generation
pub trait PlanGate: Send + Sync {
    fn can_generate(&self, user: &UserAccount) -> bool;

    /// Add `count` generations to the user's usage
    fn record_usage(&self, user: &UserAccount, count: u32);
}

/// Identifier handed back by an [`AssetStore`]
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Storage for generated logos
pub trait AssetStore: Send + Sync {
    fn persist(&self, image: &ImagePayload, metadata: &GenerationParams, created_at: SystemTime) -> Result<AssetId>;
}

// ─────────────────────────────────────────────────────────────────────────────
// In-memory implementations
// ─────────────────────────────────────────────────────────────────────────────

/// Usage ledger keyed by email
///
/// Users seen for the first time are tracked from the state they arrive with.
#[derive(Clone, Debug, Default)]
pub struct AccountLedger {
    accounts: Arc<Mutex<FxHashMap<String, UserAccount>>>,
}

impl AccountLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, user: UserAccount) {
        self.accounts.lock().insert(user.email.clone(), user);
    }

    /// Current state of a user, if the ledger knows them
    pub fn account(&self, email: &str) -> Option<UserAccount> {
        self.accounts.lock().get(email).cloned()
    }
}

impl PlanGate for AccountLedger {
    fn can_generate(&self, user: &UserAccount) -> bool {
        self.accounts
            .lock()
            .get(&user.email)
            .unwrap_or(user)
            .has_generations_left()
    }

    fn record_usage(&self, user: &UserAccount, count: u32) {
        let mut accounts = self.accounts.lock();
        let account = accounts
            .entry(user.email.clone())
            .or_insert_with(|| user.clone());
        account.generations_used = account.generations_used.saturating_add(count);
        tracing::debug!(
            "{} has used {} generation(s)",
            account.email,
            account.generations_used
        );
    }
}

/// A persisted logo
#[derive(Clone, Debug, PartialEq)]
pub struct StoredAsset {
    pub id: AssetId,
    pub image: ImagePayload,
    pub metadata: GenerationParams,
    pub created_at: SystemTime,
}

/// Keeps every persisted asset in memory
#[derive(Clone, Debug, Default)]
pub struct MemoryAssetStore {
    assets: Arc<Mutex<Vec<StoredAsset>>>,
    /// Refuse every write with this message
    failure: Option<String>,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes always fail
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn assets(&self) -> Vec<StoredAsset> {
        self.assets.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.assets.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.lock().is_empty()
    }
}

impl AssetStore for MemoryAssetStore {
    fn persist(&self, image: &ImagePayload, metadata: &GenerationParams, created_at: SystemTime) -> Result<AssetId> {
        if let Some(message) = &self.failure {
            return Err(EditorError::Persistence(message.clone()));
        }
        let mut assets = self.assets.lock();
        let id = AssetId::new(format!("asset-{}", assets.len() + 1));
        assets.push(StoredAsset {
            id: id.clone(),
            image: image.clone(),
            metadata: metadata.clone(),
            created_at,
        });
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_limit() {
        let user = UserAccount::free("Ada", "ada@example.com").with_usage(10);
        assert!(!user.has_generations_left());
        assert!(user.clone().with_plan(PlanTier::Pro).has_generations_left());
    }

    #[test]
    fn test_ledger_tracks_usage() {
        let ledger = AccountLedger::new();
        let user = UserAccount::free("Ada", "ada@example.com").with_usage(4);
        assert!(ledger.can_generate(&user));

        ledger.record_usage(&user, 4);
        ledger.record_usage(&user, 4);
        let account = ledger.account("ada@example.com").unwrap();
        assert_eq!(account.generations_used, 12);
        // The ledger's view wins over the stale caller copy
        assert!(!ledger.can_generate(&user));
    }

    #[test]
    fn test_plan_serde() {
        let user = UserAccount::free("Ada", "ada@example.com").with_plan(PlanTier::Business);
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["plan"], "business");
        assert_eq!(json["generationsUsed"], 0);
    }

    #[test]
    fn test_memory_store_ids() {
        let store = MemoryAssetStore::new();
        let image = ImagePayload::new(vec![1], "image/png").unwrap();
        let meta = GenerationParams::new("Aura");
        let first = store.persist(&image, &meta, SystemTime::now()).unwrap();
        let second = store.persist(&image, &meta, SystemTime::now()).unwrap();
        assert_eq!(first.as_str(), "asset-1");
        assert_eq!(second.as_str(), "asset-2");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_failing_store() {
        let store = MemoryAssetStore::failing("disk full");
        let image = ImagePayload::new(vec![1], "image/png").unwrap();
        let err = store
            .persist(&image, &GenerationParams::new("Aura"), SystemTime::now())
            .unwrap_err();
        assert_eq!(err, EditorError::Persistence("disk full".into()));
    }
}
