// ── Cache configuration ───────────────────────────────────────────────────────
//
// Which libraries a `ResolutionCache` searches, in which order, and which
// suffix marks the wide-character variant of an entry point.
// No `unsafe`, pure safe Rust + serde_json.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Libraries searched by default, in order.  Order matters: the first
/// library exporting a name wins.
pub const DEFAULT_LIBRARIES: [&str; 3] = ["kernel32.dll", "user32.dll", "gdi32.dll"];

/// Suffix of the UTF-16 variants of Win32 entry points (`MessageBoxW`).
pub const DEFAULT_WIDE_SUFFIX: &str = "W";

/// Search order and suffix policy for a resolution cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Library identifiers handed to the backend's loader, in search order.
    #[serde(default = "default_libraries")]
    pub libraries: Vec<String>,
    /// Appended to a name when the exact name is not exported.
    /// An empty suffix disables the second probe.
    #[serde(default = "default_wide_suffix")]
    pub wide_suffix: String,
}

fn default_libraries() -> Vec<String> {
    DEFAULT_LIBRARIES.iter().map(|s| (*s).to_owned()).collect()
}

fn default_wide_suffix() -> String {
    DEFAULT_WIDE_SUFFIX.to_owned()
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            libraries: default_libraries(),
            wide_suffix: default_wide_suffix(),
        }
    }
}

impl CacheConfig {
    /// A configuration searching exactly `libraries`, with the default suffix.
    pub fn with_libraries<I, S>(libraries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            libraries: libraries.into_iter().map(Into::into).collect(),
            wide_suffix: default_wide_suffix(),
        }
    }

    /// Parse a JSON configuration.  Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// The names probed for `name`, in order: exact first, then suffixed.
    pub(crate) fn variants<'a>(&'a self, name: &'a str) -> impl Iterator<Item = String> + 'a {
        let suffixed = (!self.wide_suffix.is_empty()).then(|| format!("{name}{}", self.wide_suffix));
        std::iter::once(name.to_owned()).chain(suffixed)
    }
}
