// ── Native backend seam ───────────────────────────────────────────────────────
//
// The three things wincall needs from the OS: open a library, find a symbol
// in it, call a symbol with N words.  `platform::win32::Win32Backend` is the
// real implementation; tests plug in a fake.

use crate::error::OsError;

/// Opaque address of a resolved native entry point.
///
/// Immutable once resolved; owned by the `ResolutionCache`, copied freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Callable(usize);

impl Callable {
    /// Wrap a raw entry-point address.  Backends are the only producers.
    pub fn from_addr(addr: usize) -> Self {
        Self(addr)
    }

    pub fn addr(self) -> usize {
        self.0
    }
}

/// Library loader, symbol resolver and invoker.
pub trait Backend {
    /// An opened library.  Dropping it may unload the library; the cache
    /// keeps every opened library alive for its own lifetime.
    type Library;

    /// Open `identifier`.  Called once per configured library.
    fn open(&self, identifier: &str) -> Result<Self::Library, OsError>;

    /// Look up `name` in `library`; `None` if it is not exported.
    fn symbol(&self, library: &Self::Library, name: &str) -> Option<Callable>;

    /// Call `callable` with `args` (at most `args::MAX_ARGS` words) and return
    /// the result word together with the OS last error, captured immediately
    /// after the call returned.
    fn invoke(&self, callable: Callable, args: &[usize]) -> (usize, OsError);
}
