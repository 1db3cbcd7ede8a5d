//! # FORZIUM MODEL STATE LIBRARY
//!
//! **RUST-POWERED MODEL BINDING BOOKKEEPING FOR THE FORZIUM REQUEST PIPELINE**
//!
//! **ARCHITECTURE**: Case-insensitive ordered store of per-key binding results
//! plus a structural prefix matcher for hierarchical queries
//! **GUARANTEE**: Pure in-memory, no I/O, cheap copy-on-write branching
//! **COMPATIBILITY**: Exposed to Python through the `bindings` crate

pub mod api;
pub mod config;
pub mod errors;
pub mod model_state;
pub mod prefix;
pub mod response;
