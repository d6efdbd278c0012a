// ── In-memory backend for unit tests ──────────────────────────────────────────
//
// Libraries are named export tables; every export is a Rust closure standing
// in for the native entry point.  Lookups and invocations are recorded so
// tests can prove what did (and did not) reach the "OS".

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::{
    backend::{Backend, Callable},
    error::OsError,
};

/// `ERROR_MOD_NOT_FOUND`.
pub(crate) const MOD_NOT_FOUND: u32 = 126;

type FakeFn = Box<dyn Fn(&[usize]) -> (usize, u32) + Send + Sync>;

struct FakeLib {
    id: String,
    exports: HashMap<String, usize>,
}

pub(crate) struct FakeBackend {
    libs: Vec<FakeLib>,
    fns: HashMap<usize, (String, FakeFn)>,
    next_addr: usize,
    lookups: Mutex<Vec<String>>,
    calls: Mutex<Vec<(String, Vec<usize>)>>,
}

impl FakeBackend {
    pub(crate) fn new() -> Self {
        Self {
            libs: Vec::new(),
            fns: HashMap::new(),
            next_addr: 0x1000,
            lookups: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Register an empty library (no-op if already registered).
    pub(crate) fn library(mut self, id: &str) -> Self {
        if !self.libs.iter().any(|l| l.id == id) {
            self.libs.push(FakeLib { id: id.to_owned(), exports: HashMap::new() });
        }
        self
    }

    /// Export `name` from `lib` (registering `lib` if needed).
    pub(crate) fn export<F>(mut self, lib: &str, name: &str, f: F) -> Self
    where
        F: Fn(&[usize]) -> (usize, u32) + Send + Sync + 'static,
    {
        self = self.library(lib);
        let addr = self.next_addr;
        self.next_addr += 0x10;
        let entry = self.libs.iter_mut().find(|l| l.id == lib).map(|l| &mut l.exports);
        if let Some(exports) = entry {
            exports.insert(name.to_owned(), addr);
        }
        self.fns.insert(addr, (format!("{lib}!{name}"), Box::new(f)));
        self
    }

    /// Export `name` from `lib` as a function always returning `(r, err)`.
    pub(crate) fn returning(self, lib: &str, name: &str, r: usize, err: u32) -> Self {
        self.export(lib, name, move |_| (r, err))
    }

    pub(crate) fn addr_of(&self, lib: &str, name: &str) -> Callable {
        let lib = self.libs.iter().find(|l| l.id == lib).expect("no such fake library");
        Callable::from_addr(lib.exports[name])
    }

    /// Every `lib!name` probed so far, in order.
    pub(crate) fn lookups(&self) -> Vec<String> {
        self.lookups.lock().clone()
    }

    /// Every `lib!name` invoked so far, with its words.
    pub(crate) fn calls(&self) -> Vec<(String, Vec<usize>)> {
        self.calls.lock().clone()
    }

    pub(crate) fn called(&self, qualified: &str) -> bool {
        self.calls.lock().iter().any(|(n, _)| n == qualified)
    }
}

impl Backend for FakeBackend {
    type Library = usize;

    fn open(&self, identifier: &str) -> Result<usize, OsError> {
        self.libs
            .iter()
            .position(|l| l.id == identifier)
            .ok_or(OsError(MOD_NOT_FOUND))
    }

    fn symbol(&self, library: &usize, name: &str) -> Option<Callable> {
        let lib = &self.libs[*library];
        self.lookups.lock().push(format!("{}!{name}", lib.id));
        lib.exports.get(name).copied().map(Callable::from_addr)
    }

    fn invoke(&self, callable: Callable, args: &[usize]) -> (usize, OsError) {
        let (name, f) = &self.fns[&callable.addr()];
        self.calls.lock().push((name.clone(), args.to_vec()));
        let (r, err) = f(args);
        (r, OsError(err))
    }
}
