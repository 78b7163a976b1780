//! Small host-glue helpers that don't belong to any one simulator module.

/// Forwards Rust panics to the browser console via `console.error` instead of
/// the opaque "unreachable executed" trap wasm otherwise gives you.
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}
