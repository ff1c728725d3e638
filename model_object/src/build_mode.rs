//! Strictness of `Model::from_data`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Bit flags controlling how extra and missing keys are treated
///
/// The flags are independent: `IGNORE_MISSING | IGNORE_EXTRA` suppresses
/// both checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildMode(u8);

impl BuildMode {
    /// Extra and missing keys are both fatal
    pub const STRICT: BuildMode = BuildMode(0);
    /// Schema keys absent from the data are left at default or unset
    pub const IGNORE_MISSING: BuildMode = BuildMode(1);
    /// Data keys without a definition are dropped
    pub const IGNORE_EXTRA: BuildMode = BuildMode(2);

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Build from raw bits; unknown bits are discarded
    pub const fn from_bits_truncate(bits: u8) -> Self {
        BuildMode(bits & (Self::IGNORE_MISSING.0 | Self::IGNORE_EXTRA.0))
    }

    pub const fn contains(self, other: BuildMode) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn ignores_missing(self) -> bool {
        self.contains(Self::IGNORE_MISSING)
    }

    pub const fn ignores_extra(self) -> bool {
        self.contains(Self::IGNORE_EXTRA)
    }
}

impl Default for BuildMode {
    fn default() -> Self {
        BuildMode::IGNORE_EXTRA
    }
}

impl BitOr for BuildMode {
    type Output = BuildMode;

    fn bitor(self, rhs: BuildMode) -> BuildMode {
        BuildMode(self.0 | rhs.0)
    }
}

impl BitOrAssign for BuildMode {
    fn bitor_assign(&mut self, rhs: BuildMode) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.ignores_missing(), self.ignores_extra()) {
            (false, false) => f.write_str("STRICT"),
            (true, false) => f.write_str("IGNORE_MISSING"),
            (false, true) => f.write_str("IGNORE_EXTRA"),
            (true, true) => f.write_str("IGNORE_MISSING|IGNORE_EXTRA"),
        }
    }
}
