// ── Win32 platform implementation ─────────────────────────────────────────────
//
// The only module in the crate where `unsafe` code is permitted.  Every
// `unsafe` block MUST carry a `// SAFETY:` comment that states:
//   • which invariant makes the operation sound, and
//   • what the caller is responsible for maintaining.
//
// Nothing in this module is `pub` beyond what callers genuinely need; keep the
// unsafe surface as small as possible.

#![allow(unsafe_code)]

use std::sync::OnceLock;

use crate::{cache::ResolutionCache, chain::Chain};

// ── Sub-modules ───────────────────────────────────────────────────────────────

pub mod backend; // LoadLibraryW / GetProcAddress / flat call
pub mod user; // typed wrappers for common window and message calls

pub use backend::{Module, Win32Backend};

// ── Process-wide cache ────────────────────────────────────────────────────────

impl ResolutionCache<Win32Backend> {
    /// The process-wide cache over kernel32, user32 and gdi32, built on first
    /// use and kept for the life of the process.
    ///
    /// # Panics
    ///
    /// If any of the three system libraries cannot be loaded.
    pub fn system() -> &'static Self {
        static SYSTEM: OnceLock<ResolutionCache<Win32Backend>> = OnceLock::new();
        SYSTEM.get_or_init(|| match ResolutionCache::new(Win32Backend) {
            Ok(cache) => cache,
            Err(e) => panic!("{e}"),
        })
    }
}

impl Chain<'static, Win32Backend> {
    /// A fresh chain over `ResolutionCache::system()`.
    pub fn system() -> Self {
        Chain::new(ResolutionCache::system())
    }
}
