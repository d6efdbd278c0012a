//! Quick WinAPI calls by name, with first-failure error chaining.
//!
//! ```no_run
//! # #[cfg(windows)] fn demo() -> wincall::Result<()> {
//! use wincall::{args, Chain};
//!
//! let text: Vec<u16> = "Hello, world\0".encode_utf16().collect();
//! let title: Vec<u16> = "Example\0".encode_utf16().collect();
//!
//! let mut c = Chain::system();
//! let r = c.call_nonzero("MessageBox", args![0usize, text.as_ptr(), title.as_ptr(), 0u32]);
//! c.into_result()?;
//! println!("got: {r}");
//! # Ok(()) }
//! ```
//!
//! Entry points are looked up by name in a fixed, ordered list of libraries
//! (kernel32, user32, gdi32 by default), trying `Name` then `NameW`, and
//! memoized in a [`ResolutionCache`].  A [`Chain`] stops calling anything
//! after its first failure and keeps that failure for you to inspect; see
//! the `chain` module for the idioms.

// ── Safety policy ────────────────────────────────────────────────────────────
// Unsafe code is forbidden everywhere except `platform::win32`, which talks
// to the loader and calls entry points.  Each unsafe block in that module
// MUST carry a `// SAFETY:` comment.
#![deny(unsafe_code)]

mod args;
mod backend;
mod cache;
mod chain;
mod config;
mod error;
mod platform;

#[cfg(test)]
mod testing;

pub use args::{Arg, IntoWords, MAX_ARGS};
pub use backend::{Backend, Callable};
pub use cache::ResolutionCache;
pub use chain::{succeeds, Chain, Deferred, InLibrary};
pub use config::{CacheConfig, DEFAULT_LIBRARIES, DEFAULT_WIDE_SUFFIX};
pub use error::{OsError, Result, WincallError};

#[cfg(windows)]
pub use platform::win32::{Module, Win32Backend};
