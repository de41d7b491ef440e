//! Four-concept logo batches
//!
//! Variations are requested one at a time, in a fixed order. Each result is
//! persisted and handed to the caller before the next request goes out, so a
//! UI can show concepts as they arrive. Usage is recorded only once the whole
//! batch has succeeded.

use std::time::SystemTime;

use marque_ai::{AiBridge, GenerativeBackend};
use marque_core::GenerationParams;
use marque_image::ImagePayload;
use marque_prompt::variations;

use crate::account::{AssetId, AssetStore, PlanGate, UserAccount};
use crate::error::{EditorError, Result};

/// One finished concept
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedLogo {
    /// Position in the batch, from 0
    pub index: usize,
    pub image: ImagePayload,
    pub asset: AssetId,
    /// Parameters including the variation's direction
    pub params: GenerationParams,
}

/// Runs logo batches against a bridge and the account collaborators
pub struct LogoGenerator<'a, B, G, S> {
    bridge: &'a AiBridge<B>,
    gate: &'a G,
    store: &'a S,
}

impl<'a, B, G, S> LogoGenerator<'a, B, G, S>
where
    B: GenerativeBackend,
    G: PlanGate,
    S: AssetStore,
{
    pub fn new(bridge: &'a AiBridge<B>, gate: &'a G, store: &'a S) -> Self {
        Self { bridge, gate, store }
    }

    /// Generate every variation for `params`
    pub async fn generate(&self, user: &UserAccount, params: &GenerationParams) -> Result<Vec<GeneratedLogo>> {
        self.generate_with(user, params, |_| {}).await
    }

    /// Generate every variation, calling `on_logo` as each one is stored
    ///
    /// On failure the concepts already reported stay persisted, and no usage
    /// is recorded.
    pub async fn generate_with<F>(
        &self,
        user: &UserAccount,
        params: &GenerationParams,
        mut on_logo: F,
    ) -> Result<Vec<GeneratedLogo>>
    where
        F: FnMut(&GeneratedLogo),
    {
        if !self.gate.can_generate(user) {
            tracing::info!("{} is out of generations", user.email);
            return Err(EditorError::GenerationLimitReached {
                limit: user.generation_limit,
            });
        }

        let batch = variations(params);
        let count = batch.len();
        let mut logos = Vec::with_capacity(count);

        for (index, variation) in batch.into_iter().enumerate() {
            tracing::debug!("Generating concept {}/{} for {}", index + 1, count, params.name);
            let image = self.bridge.generate_logo(&variation).await?;
            let asset = self.store.persist(&image, &variation, SystemTime::now())?;
            let logo = GeneratedLogo {
                index,
                image,
                asset,
                params: variation,
            };
            on_logo(&logo);
            logos.push(logo);
        }

        self.gate.record_usage(user, count as u32);
        tracing::info!("Generated {} concepts for {}", count, params.name);
        Ok(logos)
    }
}
