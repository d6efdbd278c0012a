// ── Central error type ────────────────────────────────────────────────────────
//
// Recoverable failures only.  Programmer errors (an entry point that no
// searched library exports, too many arguments) panic at the call site and
// never show up here; see `chain::Chain::call_raw`.

/// An OS "last error" code captured right after a native call returned.
///
/// Code `0` means the call did not report anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OsError(pub u32);

impl OsError {
    /// The "nothing reported" value.
    pub const NONE: OsError = OsError(0);

    /// Raw `GetLastError()`-style code.
    pub fn code(self) -> u32 {
        self.0
    }

    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for OsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            return f.write_str("no error reported");
        }
        write!(f, "{} (error {:#010x})", system_message(self.0), self.0)
    }
}

impl std::error::Error for OsError {}

// Win32 errors are surfaced through the windows crate so the text matches
// what `FormatMessageW` produces for the equivalent HRESULT.
#[cfg(windows)]
fn system_message(code: u32) -> String {
    use windows::Win32::Foundation::WIN32_ERROR;
    let e = windows::core::Error::from(WIN32_ERROR(code).to_hresult());
    let msg = e.message();
    let msg = msg.trim_end();
    if msg.is_empty() {
        "unknown error".to_owned()
    } else {
        msg.to_owned()
    }
}

#[cfg(not(windows))]
fn system_message(code: u32) -> String {
    // Reinterpret the bits; the host decides what, if anything, it means.
    std::io::Error::from_raw_os_error(code as i32).to_string()
}

/// Every error that wincall can report without panicking.
#[derive(Debug)]
pub enum WincallError {
    /// A native call's result failed the chosen success predicate.
    ///
    /// This is the value a `Chain` latches on its first failure.
    Call {
        /// The entry-point name (or whatever context the caller supplied).
        context: String,
        /// Last error captured immediately after the call returned.
        os: OsError,
    },

    /// A configured library could not be opened when building a cache.
    Load {
        library: String,
        os: OsError,
    },

    /// No searched library exports the name.  Only returned by the explicit
    /// resolution APIs (`resolve`, `warm_up`); chains panic instead.
    NotFound {
        name: String,
    },

    /// A library-scoped call named a library the cache was not built with.
    UnknownLibrary {
        library: String,
    },

    /// Malformed cache configuration.
    Config(serde_json::Error),

    /// Reading the configuration file failed.
    Io(std::io::Error),
}

impl std::fmt::Display for WincallError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call { context, os } => write!(f, "{context}: {os}"),
            Self::Load { library, os } => write!(f, "cannot load {library}: {os}"),
            Self::NotFound { name } => {
                write!(f, "entry point '{name}' not found in configured libraries")
            }
            Self::UnknownLibrary { library } => {
                write!(f, "library '{library}' is not part of this cache")
            }
            Self::Config(e) => write!(f, "invalid cache configuration: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for WincallError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Call { os, .. } | Self::Load { os, .. } => Some(os),
            Self::Config(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::NotFound { .. } | Self::UnknownLibrary { .. } => None,
        }
    }
}

impl From<std::io::Error> for WincallError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for WincallError {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e)
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, WincallError>;
