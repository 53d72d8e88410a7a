//! Media processing actions.
//!
//! Currently a single action: transcoding to ProRes 422 HQ.

mod prores;

pub use prores::{prores_args, transcode_to_prores, ColorProfile, PRORES_EXTENSION};
