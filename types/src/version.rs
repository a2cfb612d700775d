//! Semantic version of a published DAO app.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An app version as stored by the app Repo: `(major, minor, patch)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AppVersion {
    pub major: u16,
    pub minor: u16,
    pub patch: u16,
}

impl AppVersion {
    pub fn new(major: u16, minor: u16, patch: u16) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// The `uint16[3]` representation used on the ABI surface.
    pub fn as_array(&self) -> [u16; 3] {
        [self.major, self.minor, self.patch]
    }

    pub fn from_array(v: [u16; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }

    /// Whether `next` is a valid single-slot bump of `self`.
    ///
    /// Exactly one of major/minor/patch increases by one and every slot
    /// below it resets to zero — the Repo contract's bump rule.
    pub fn is_valid_bump(&self, next: &AppVersion) -> bool {
        let (a, b) = (self.as_array(), next.as_array());
        for i in 0..3 {
            if u32::from(b[i]) == u32::from(a[i]) + 1 {
                return a[..i] == b[..i] && b[i + 1..].iter().all(|&x| x == 0);
            }
        }
        false
    }
}

impl fmt::Display for AppVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
