//! Problems built on the multi-objective engine.
//!
//! - [`playlist`]: choose and order tracks from a catalog, balancing play
//!   time, musical coherence and popularity (10 objectives)
//! - [`order`]: choose item counts from a fixed menu to get close to a
//!   target price quickly (3 objectives)

pub mod order;
pub mod playlist;
