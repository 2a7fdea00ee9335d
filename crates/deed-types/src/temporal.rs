use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical time at which a registry operation happened.
///
/// The registry owns the current height and stamps records with it; callers
/// move it forward explicitly.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BlockHeight(pub u64);

impl BlockHeight {
    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn value(self) -> u64 {
        self.0
    }

    /// The height `blocks` later, saturating at `u64::MAX`.
    pub fn advanced(self, blocks: u64) -> Self {
        Self(self.0.saturating_add(blocks))
    }
}

impl fmt::Display for BlockHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
