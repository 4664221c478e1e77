//! Stock `Confirmer` implementations.

use async_trait::async_trait;

use warden_contracts::action::Action;

use crate::traits::Confirmer;

/// Accepts every action. This is the default when the caller supplies no
/// confirmer; callers that need a safe default should pass `DenyAll`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoApprove;

#[async_trait]
impl Confirmer for AutoApprove {
    async fn confirm(&self, _index: usize, _action: &Action) -> bool {
        true
    }
}

/// Refuses every action.
#[derive(Debug, Default, Clone, Copy)]
pub struct DenyAll;

#[async_trait]
impl Confirmer for DenyAll {
    async fn confirm(&self, _index: usize, _action: &Action) -> bool {
        false
    }
}

/// Adapts a synchronous closure into a `Confirmer`.
///
/// ```rust,ignore
/// let only_swaps = FnConfirmer(|_, action: &Action| action.kind() == "swap");
/// ```
pub struct FnConfirmer<F>(pub F);

#[async_trait]
impl<F> Confirmer for FnConfirmer<F>
where
    F: Fn(usize, &Action) -> bool + Send + Sync,
{
    async fn confirm(&self, index: usize, action: &Action) -> bool {
        (self.0)(index, action)
    }
}
