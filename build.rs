/// wincall build script.
///
/// The resolution cache, argument coercion and call chain build everywhere;
/// the Win32 backend and typed wrappers only exist on Windows targets.
fn main() {
    let target_os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    if target_os != "windows" {
        println!(
            "cargo:warning=wincall: no native backend for {target_os:?}; \
             only the backend-agnostic core is built"
        );
    }

    println!("cargo:rerun-if-changed=build.rs");
}
