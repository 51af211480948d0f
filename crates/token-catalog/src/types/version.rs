use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic version of a token list.
///
/// Ordering compares major, then minor, then patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

/// How far a candidate list version moves past the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VersionUpgrade {
    None,
    Patch,
    Minor,
    Major,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Classify the upgrade from `self` to `next`. Downgrades and equal
    /// versions are `VersionUpgrade::None`.
    pub fn upgrade_to(&self, next: &Version) -> VersionUpgrade {
        if next.major > self.major {
            VersionUpgrade::Major
        } else if next.major < self.major {
            VersionUpgrade::None
        } else if next.minor > self.minor {
            VersionUpgrade::Minor
        } else if next.minor < self.minor {
            VersionUpgrade::None
        } else if next.patch > self.patch {
            VersionUpgrade::Patch
        } else {
            VersionUpgrade::None
        }
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
