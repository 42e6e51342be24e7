use thiserror::Error;

use super::path::PathError;
use super::AbilityId;
use crate::render::RenderError;

/// Why an ability failed to produce anything.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AbilityError {
    #[error("product path: {0}")]
    Path(#[from] PathError),
    #[error("product visual: {0}")]
    Render(#[from] RenderError),
    #[error("{id:?} is on cooldown for another {remaining_secs:.2}s")]
    OnCooldown { id: AbilityId, remaining_secs: f32 },
}
