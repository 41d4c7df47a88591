// handlers/mod.rs - Routes served by the gateway itself
//
// Everything under /api/* except search is a catalog entry in `proxy`.
// These are the few endpoints that answer locally or compose several calls.

pub mod search;
pub mod status;

pub use search::search;
pub use status::{health, root};
