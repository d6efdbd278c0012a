// ── Call chain ────────────────────────────────────────────────────────────────
//
// A `Chain` runs named native calls one after another and latches the first
// one whose result fails its success predicate.  From then on every call on
// that chain does nothing and returns 0: no resolution, no coercion, no
// native call.  A caller that never looks at `error()` just sees zeros.
//
//     let mut c = Chain::new(&cache);
//     let a = c.call_nonzero("Foo", ());
//     let b = c.call_nonzero("Bar", args![a]);
//     c.call_nonzero("Baz", args![b]);
//     c.into_result()?;
//
// Cleanup that must run even if a later step fails goes through `detach()`
// (or `defer()`), taken right after the resource was acquired:
//
//     let dc = c.call_nonzero("BeginPaint", args![hwnd, &mut ps]);
//     let _end = c.defer(move |d| { d.call_nonzero("EndPaint", args![hwnd, &ps]); });
//     let mem = c.call_nonzero("CreateCompatibleDC", args![dc]); // may fail; EndPaint still runs
//
// Two failure tiers.  A name no searched library exports, or more than
// `MAX_ARGS` arguments, is a bug in the caller and panics.  Only the native
// result, judged by the predicate, becomes the latched `WincallError::Call`.

use crate::{
    args::{IntoWords, MAX_ARGS},
    backend::Backend,
    cache::{ResolutionCache, Scope},
    error::{OsError, Result, WincallError},
};

/// Common success predicates.  The `call_nonzero` / `call_zero` / `call_any`
/// shortcuts are `call_custom` with one of these.
pub mod succeeds {
    pub fn nonzero(r: usize) -> bool {
        r != 0
    }

    pub fn zero(r: usize) -> bool {
        r == 0
    }

    pub fn any(_: usize) -> bool {
        true
    }
}

enum State {
    Live,
    /// Terminal; the error never changes.
    Failed(WincallError),
    /// Detached from a failed chain: never calls anything, never fails.
    Inert,
}

/// A sequence of native calls sharing one first-failure slot.
///
/// One chain belongs to one logical sequence on one thread; the cache it
/// borrows may be shared.
pub struct Chain<'c, B: Backend> {
    cache: &'c ResolutionCache<B>,
    state: State,
}

impl<'c, B: Backend> Chain<'c, B> {
    /// A fresh, live chain resolving through `cache`.
    pub fn new(cache: &'c ResolutionCache<B>) -> Self {
        Self { cache, state: State::Live }
    }

    pub fn cache(&self) -> &'c ResolutionCache<B> {
        self.cache
    }

    /// The latched error, if a call has failed.
    pub fn error(&self) -> Option<&WincallError> {
        match &self.state {
            State::Failed(e) => Some(e),
            State::Live | State::Inert => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, State::Failed(_))
    }

    /// `true` for a chain detached after failure.
    pub fn is_inert(&self) -> bool {
        matches!(self.state, State::Inert)
    }

    /// Finish the chain: `Ok(())` unless a call failed.
    pub fn into_result(self) -> Result<()> {
        match self.state {
            State::Failed(e) => Err(e),
            State::Live | State::Inert => Ok(()),
        }
    }

    // ── Calls ─────────────────────────────────────────────────────────────────

    /// Call `name` and return its raw result and last error, without judging
    /// success.  Returns `(0, OsError::NONE)` without doing anything once the
    /// chain has failed.
    ///
    /// # Panics
    ///
    /// If no configured library exports `name` (or its wide variant), or if
    /// more than `MAX_ARGS` arguments are given.
    pub fn call_raw(&mut self, name: &str, args: impl IntoWords) -> (usize, OsError) {
        self.dispatch(None, name, args)
    }

    /// Call `name`; a zero result fails the chain.
    pub fn call_nonzero(&mut self, name: &str, args: impl IntoWords) -> usize {
        self.judged(None, succeeds::nonzero, name, args)
    }

    /// Call `name`; a nonzero result fails the chain.
    pub fn call_zero(&mut self, name: &str, args: impl IntoWords) -> usize {
        self.judged(None, succeeds::zero, name, args)
    }

    /// Call `name`; never fails the chain.
    pub fn call_any(&mut self, name: &str, args: impl IntoWords) -> usize {
        self.judged(None, succeeds::any, name, args)
    }

    /// Call `name`; the chain fails unless `is_ok(result)`.
    pub fn call_custom<P>(&mut self, is_ok: P, name: &str, args: impl IntoWords) -> usize
    where
        P: FnOnce(usize) -> bool,
    {
        self.judged(None, is_ok, name, args)
    }

    /// Calls resolved in `library` only, by exact name.
    ///
    /// # Panics
    ///
    /// Calls through the returned view panic if `library` is not one of the
    /// cache's configured libraries (unless the chain has already failed).
    pub fn lib<'a>(&'a mut self, library: &'a str) -> InLibrary<'a, 'c, B> {
        InLibrary { chain: self, library }
    }

    /// Latch a failure from outside a call, e.g. a wrapper whose error signal
    /// is a particular result value.  No-op unless the chain is live.
    pub fn fail(&mut self, os: OsError, context: impl Into<String>) {
        if let State::Live = self.state {
            self.state = State::Failed(WincallError::Call { context: context.into(), os });
        }
    }

    // ── Detach ────────────────────────────────────────────────────────────────

    /// Split off a chain for cleanup calls.
    ///
    /// Live chain: a brand-new live chain sharing nothing but the cache.
    /// Failed (or inert) chain: an inert chain whose calls all return 0
    /// without touching the cache or any entry point.
    pub fn detach(&self) -> Chain<'c, B> {
        let state = match self.state {
            State::Live => State::Live,
            State::Failed(_) | State::Inert => State::Inert,
        };
        Chain { cache: self.cache, state }
    }

    /// `detach()` now, run `f` on the detached chain when the guard drops.
    pub fn defer<F>(&self, f: F) -> Deferred<'c, B, F>
    where
        F: FnOnce(&mut Chain<'c, B>),
    {
        Deferred { chain: self.detach(), f: Some(f) }
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    fn is_live(&self) -> bool {
        matches!(self.state, State::Live)
    }

    fn judged<P>(&mut self, library: Option<&str>, is_ok: P, name: &str, args: impl IntoWords) -> usize
    where
        P: FnOnce(usize) -> bool,
    {
        if !self.is_live() {
            return 0;
        }
        let (r, os) = self.dispatch(library, name, args);
        if !is_ok(r) {
            self.fail(os, name);
        }
        r
    }

    fn dispatch(&mut self, library: Option<&str>, name: &str, args: impl IntoWords) -> (usize, OsError) {
        if !self.is_live() {
            return (0, OsError::NONE);
        }

        let scope = match library {
            None => Scope::All,
            Some(lib) => match self.cache.library_index(lib) {
                Ok(i) => Scope::Library(i),
                Err(e) => panic!("{e} (calling '{name}')"),
            },
        };
        let callable = match self.cache.resolve_scoped(scope, name) {
            Ok(c) => c,
            Err(_) => panic!(
                "entry point '{name}' not found in {}",
                self.cache.describe(scope)
            ),
        };

        let words = args.into_words();
        if words.len() > MAX_ARGS {
            panic!(
                "argument #{MAX_ARGS} to '{name}': at most {MAX_ARGS} arguments supported, got {}",
                words.len()
            );
        }

        self.cache.backend().invoke(callable, &words)
    }
}

// ── Library-scoped view ───────────────────────────────────────────────────────

/// `Chain` calls restricted to one library.  Returned by `Chain::lib`.
pub struct InLibrary<'a, 'c, B: Backend> {
    chain: &'a mut Chain<'c, B>,
    library: &'a str,
}

impl<B: Backend> InLibrary<'_, '_, B> {
    pub fn call_raw(&mut self, name: &str, args: impl IntoWords) -> (usize, OsError) {
        self.chain.dispatch(Some(self.library), name, args)
    }

    pub fn call_nonzero(&mut self, name: &str, args: impl IntoWords) -> usize {
        self.chain.judged(Some(self.library), succeeds::nonzero, name, args)
    }

    pub fn call_zero(&mut self, name: &str, args: impl IntoWords) -> usize {
        self.chain.judged(Some(self.library), succeeds::zero, name, args)
    }

    pub fn call_any(&mut self, name: &str, args: impl IntoWords) -> usize {
        self.chain.judged(Some(self.library), succeeds::any, name, args)
    }

    pub fn call_custom<P>(&mut self, is_ok: P, name: &str, args: impl IntoWords) -> usize
    where
        P: FnOnce(usize) -> bool,
    {
        self.chain.judged(Some(self.library), is_ok, name, args)
    }
}

// ── Deferred cleanup ──────────────────────────────────────────────────────────

/// Cleanup bound to a detached chain; runs when dropped.  See `Chain::defer`.
#[must_use = "dropping the guard runs the cleanup immediately"]
pub struct Deferred<'c, B: Backend, F: FnOnce(&mut Chain<'c, B>)> {
    chain: Chain<'c, B>,
    f: Option<F>,
}

impl<'c, B: Backend, F: FnOnce(&mut Chain<'c, B>)> Deferred<'c, B, F> {
    /// Run the cleanup now and return whatever error it latched.
    pub fn run(mut self) -> Result<()> {
        if let Some(f) = self.f.take() {
            f(&mut self.chain);
        }
        match std::mem::replace(&mut self.chain.state, State::Inert) {
            State::Failed(e) => Err(e),
            State::Live | State::Inert => Ok(()),
        }
    }

    /// Drop the cleanup without running it.
    pub fn cancel(mut self) {
        self.f = None;
    }
}

impl<'c, B: Backend, F: FnOnce(&mut Chain<'c, B>)> Drop for Deferred<'c, B, F> {
    fn drop(&mut self) {
        if let Some(f) = self.f.take() {
            f(&mut self.chain);
        }
    }
}
