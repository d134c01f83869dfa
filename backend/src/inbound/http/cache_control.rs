//! Shared cache-control policies for HTTP handlers.

/// Live snapshots must never be stored by intermediaries.
pub const NO_STORE: &str = "no-store";

/// Build the cache-control header tuple for live snapshot responses.
pub const fn no_store_header() -> (&'static str, &'static str) {
    ("Cache-Control", NO_STORE)
}
