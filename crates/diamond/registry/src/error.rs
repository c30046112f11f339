use diamond_cut::CutError;
use diamond_timelock::TimelockError;

use crate::config::ConfigError;

/// Errors surfaced by the registry facade. Inner kinds pass through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiamondError {
    #[error(transparent)]
    Timelock(#[from] TimelockError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("initializer supplied without any committed cut")]
    OrphanInitializer,
}

impl DiamondError {
    /// The cut engine error underneath, if this is one.
    pub fn as_cut_error(&self) -> Option<&CutError> {
        match self {
            Self::Timelock(TimelockError::Cut(e)) => Some(e),
            _ => None,
        }
    }
}

impl From<CutError> for DiamondError {
    fn from(e: CutError) -> Self {
        Self::Timelock(TimelockError::Cut(e))
    }
}
