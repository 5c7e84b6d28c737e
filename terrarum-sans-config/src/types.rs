//! Enumerated configuration types.

use serde::{Deserialize, Serialize};

/// Alternative charset used to shape a run before any in-band override
/// codepoint is seen.
///
/// The Cyrillic variants select the Bulgarian or Serbian letterforms for
/// U+0400..U+045F; `Codestyle` swaps printable ASCII for the code-style
/// glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CharsetOverride {
    /// No remapping (default)
    #[default]
    Default,
    /// Bulgarian Cyrillic letterforms
    Bulgarian,
    /// Serbian Cyrillic letterforms
    Serbian,
    /// Code-style ASCII
    Codestyle,
}

impl CharsetOverride {
    /// All variants, in selector order.
    pub fn variants() -> &'static [CharsetOverride] {
        &[
            CharsetOverride::Default,
            CharsetOverride::Bulgarian,
            CharsetOverride::Serbian,
            CharsetOverride::Codestyle,
        ]
    }

    /// Position of this variant within the override selector block.
    pub fn selector_index(self) -> u32 {
        match self {
            CharsetOverride::Default => 0,
            CharsetOverride::Bulgarian => 1,
            CharsetOverride::Serbian => 2,
            CharsetOverride::Codestyle => 3,
        }
    }

    /// Inverse of [`selector_index`](Self::selector_index).
    pub fn from_selector_index(index: u32) -> Option<Self> {
        Self::variants().get(index as usize).copied()
    }
}
