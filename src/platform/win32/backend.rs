// ── Win32 backend ─────────────────────────────────────────────────────────────
//
// LoadLibraryW / GetProcAddress / FreeLibrary, and a flat `extern "system"`
// call with up to `MAX_ARGS` machine words.  The thread's last error is
// cleared before the call and read straight after it, with no Win32 call in
// between.

#![allow(unsafe_code)]

use std::ffi::CString;

use windows::{
    core::{PCSTR, PCWSTR},
    Win32::{
        Foundation::{FreeLibrary, GetLastError, SetLastError, HMODULE, WIN32_ERROR},
        System::LibraryLoader::{GetProcAddress, LoadLibraryW},
    },
};

use crate::{
    args::MAX_ARGS,
    backend::{Backend, Callable},
    error::OsError,
};

macro_rules! word {
    ($i:tt) => { usize };
}

/// Transmute `$addr` to an `extern "system"` fn taking `$args.len()` words
/// and call it.  Each arm lists the argument indices for that arity.
macro_rules! call_by_arity {
    ($addr:expr, $args:expr, $($n:literal => ($($i:literal),*)),+ $(,)?) => {
        match $args.len() {
            $($n => {
                let f: unsafe extern "system" fn($(word!($i)),*) -> usize =
                    std::mem::transmute::<usize, _>($addr);
                f($($args[$i]),*)
            })+
            n => unreachable!("{n} arguments"),
        }
    };
}

// ── Module ────────────────────────────────────────────────────────────────────

/// RAII handle to a DLL opened by `Win32Backend::open`.
///
/// `FreeLibrary` runs on `Drop`.  The owning `ResolutionCache` outlives every
/// `Callable` it hands out, so no entry point is called after its module is
/// unloaded.
pub struct Module(HMODULE);

// SAFETY: an HMODULE is a process-wide base address, not thread-affine.
// LoadLibrary / GetProcAddress / FreeLibrary are thread-safe.
unsafe impl Send for Module {}
// SAFETY: see above; `Module` exposes no interior mutability.
unsafe impl Sync for Module {}

impl Module {
    pub fn handle(&self) -> HMODULE {
        self.0
    }
}

impl Drop for Module {
    fn drop(&mut self) {
        // SAFETY: self.0 was returned by a successful LoadLibraryW and has not
        // been freed since.  Each Module is freed exactly once.
        unsafe {
            let _ = FreeLibrary(self.0);
        }
    }
}

// ── Backend ───────────────────────────────────────────────────────────────────

/// The real thing: system DLLs, real entry points.
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32Backend;

/// Recover the Win32 code from a windows-crate error (`0x8007xxxx` HRESULTs).
fn win32_code(e: &windows::core::Error) -> u32 {
    let hr = e.code().0 as u32;
    if hr & 0xFFFF_0000 == 0x8007_0000 {
        hr & 0xFFFF
    } else {
        hr
    }
}

impl Backend for Win32Backend {
    type Library = Module;

    fn open(&self, identifier: &str) -> Result<Module, OsError> {
        let path: Vec<u16> = identifier.encode_utf16().chain(std::iter::once(0)).collect();
        // SAFETY: path is a valid null-terminated UTF-16 string that outlives
        // the call.
        match unsafe { LoadLibraryW(PCWSTR(path.as_ptr())) } {
            Ok(h) => Ok(Module(h)),
            Err(e) => Err(OsError(win32_code(&e))),
        }
    }

    fn symbol(&self, library: &Module, name: &str) -> Option<Callable> {
        let name = CString::new(name).ok()?;
        // SAFETY: library holds a loaded module; name is a null-terminated
        // ANSI string that outlives the call.
        let proc = unsafe { GetProcAddress(library.0, PCSTR(name.as_ptr().cast())) }?;
        Some(Callable::from_addr(proc as usize))
    }

    fn invoke(&self, callable: Callable, args: &[usize]) -> (usize, OsError) {
        assert!(args.len() <= MAX_ARGS, "{} arguments exceed the native call limit", args.len());
        let addr = callable.addr();

        // SAFETY: addr came from GetProcAddress on a module the cache keeps
        // loaded.  Every argument and the return value is one machine word,
        // which is what the flat `system` ABI passes for pointers, handles,
        // integers and BOOLs.  Matching the declared arity to the entry
        // point's real signature is the caller's contract.
        unsafe {
            SetLastError(WIN32_ERROR(0));
            let r = call_by_arity!(addr, args,
                0 => (),
                1 => (0),
                2 => (0, 1),
                3 => (0, 1, 2),
                4 => (0, 1, 2, 3),
                5 => (0, 1, 2, 3, 4),
                6 => (0, 1, 2, 3, 4, 5),
                7 => (0, 1, 2, 3, 4, 5, 6),
                8 => (0, 1, 2, 3, 4, 5, 6, 7),
                9 => (0, 1, 2, 3, 4, 5, 6, 7, 8),
                10 => (0, 1, 2, 3, 4, 5, 6, 7, 8, 9),
                11 => (0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10),
                12 => (0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11),
                13 => (0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12),
                14 => (0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13),
                15 => (0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14),
            );
            let err = GetLastError();
            (r, OsError(err.0))
        }
    }
}
