// ── Platform backends ─────────────────────────────────────────────────────────
//
// Native `Backend` implementations.  No `unsafe` lives here; all FFI is
// confined to the per-OS sub-modules and never leaks outward.

#[cfg(windows)]
pub mod win32;
