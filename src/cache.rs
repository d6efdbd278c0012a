// ── Resolution cache ──────────────────────────────────────────────────────────
//
// Maps an entry-point name to its resolved `Callable`, scoped by which
// libraries were searched.  Entries are inserted at most once and never
// updated or removed: the first successful resolution wins.
//
// ── Concurrency ───────────────────────────────────────────────────────────────
//
// The map sits behind a `parking_lot::RwLock`.  Hits take the shared lock.
// Misses take the upgradable lock, so at most one thread scans libraries at
// a time, and re-check before scanning so a name is never scanned twice.
// A cache is therefore `Sync` whenever its backend and library handles are;
// chains on different threads may share one.  `warm_up` still exists so
// start-up code can fail early on misspelled names.

use std::collections::HashMap;

use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use tracing::{debug, trace};

use crate::{
    backend::{Backend, Callable},
    config::CacheConfig,
    error::{Result, WincallError},
};

/// Which libraries a name is searched in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Scope {
    /// Every configured library in order, exact name then suffixed.
    All,
    /// One configured library (by index), exact name only.
    Library(usize),
}

/// Process-lifetime memo of resolved entry points.
pub struct ResolutionCache<B: Backend> {
    backend: B,
    config: CacheConfig,
    /// Opened in `config.libraries` order; index = `Scope::Library` index.
    libraries: Vec<B::Library>,
    procs: RwLock<HashMap<Scope, HashMap<String, Callable>>>,
}

impl<B: Backend> ResolutionCache<B> {
    /// Open the default libraries (kernel32, user32, gdi32) through `backend`.
    pub fn new(backend: B) -> Result<Self> {
        Self::with_config(backend, CacheConfig::default())
    }

    /// Open every library in `config` through `backend`, in order.
    pub fn with_config(backend: B, config: CacheConfig) -> Result<Self> {
        let mut libraries = Vec::with_capacity(config.libraries.len());
        for id in &config.libraries {
            let lib = backend
                .open(id)
                .map_err(|os| WincallError::Load { library: id.clone(), os })?;
            debug!(library = %id, "wincall: opened library");
            libraries.push(lib);
        }
        Ok(Self {
            backend,
            config,
            libraries,
            procs: RwLock::new(HashMap::new()),
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Number of memoized entries, across all scopes.
    pub fn len(&self) -> usize {
        self.procs.read().values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve `name` across every configured library.
    ///
    /// For each library in order, `name` is tried first and then `name` plus
    /// the wide suffix; the first hit is memoized under `name` itself.
    pub fn resolve(&self, name: &str) -> Result<Callable> {
        self.resolve_scoped(Scope::All, name)
    }

    /// Resolve exactly `name` in the single library `library`.
    pub fn resolve_in(&self, library: &str, name: &str) -> Result<Callable> {
        let index = self.library_index(library)?;
        self.resolve_scoped(Scope::Library(index), name)
    }

    /// Resolve every name up front.  Stops at the first one no library exports.
    pub fn warm_up<I, S>(&self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.resolve(name.as_ref())?;
        }
        Ok(())
    }

    /// Position of `library` in the search order.  Library identifiers
    /// compare case-insensitively, as Windows module names do.
    pub(crate) fn library_index(&self, library: &str) -> Result<usize> {
        self.config
            .libraries
            .iter()
            .position(|id| id.eq_ignore_ascii_case(library))
            .ok_or_else(|| WincallError::UnknownLibrary { library: library.to_owned() })
    }

    /// Human-readable list of the libraries `scope` searches.
    pub(crate) fn describe(&self, scope: Scope) -> String {
        match scope {
            Scope::All => self.config.libraries.join(", "),
            Scope::Library(i) => self.config.libraries[i].clone(),
        }
    }

    pub(crate) fn resolve_scoped(&self, scope: Scope, name: &str) -> Result<Callable> {
        if let Some(c) = self.cached(scope, name) {
            trace!(name, "wincall: cache hit");
            return Ok(c);
        }

        let procs = self.procs.upgradable_read();
        // Another thread may have resolved it while we waited for the lock.
        if let Some(c) = procs.get(&scope).and_then(|m| m.get(name)).copied() {
            trace!(name, "wincall: cache hit");
            return Ok(c);
        }

        let found = self.scan(scope, name).ok_or_else(|| WincallError::NotFound {
            name: name.to_owned(),
        })?;

        let mut procs = RwLockUpgradableReadGuard::upgrade(procs);
        procs.entry(scope).or_default().insert(name.to_owned(), found);
        Ok(found)
    }

    fn cached(&self, scope: Scope, name: &str) -> Option<Callable> {
        self.procs.read().get(&scope).and_then(|m| m.get(name)).copied()
    }

    fn scan(&self, scope: Scope, name: &str) -> Option<Callable> {
        match scope {
            Scope::All => {
                for (id, lib) in self.config.libraries.iter().zip(&self.libraries) {
                    for variant in self.config.variants(name) {
                        if let Some(c) = self.backend.symbol(lib, &variant) {
                            trace!(name, library = %id, variant = %variant, "wincall: resolved");
                            return Some(c);
                        }
                    }
                }
                None
            }
            Scope::Library(i) => {
                let c = self.backend.symbol(&self.libraries[i], name)?;
                trace!(name, library = %self.config.libraries[i], "wincall: resolved");
                Some(c)
            }
        }
    }
}
