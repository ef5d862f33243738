//! A 2-D galaxy simulation: Barnes-Hut gravity over a per-frame quadtree,
//! advanced with velocity Verlet and parallelized across a persistent worker
//! pool.
//!
//! The [`World`] owns all state. Each [`World::step`] clamps the wall-clock
//! delta, rebuilds the quadtree over the current star positions, walks it for
//! every star's acceleration, integrates, and publishes the display buffer
//! read by [`World::positions`].

pub mod config;
pub mod quadtree;
pub mod star;
pub mod utils;
pub mod world;

pub use config::{Config, ConfigError};
pub use quadtree::{Child, Quad, Quadtree};
pub use star::Star;
pub use world::{InitError, World};
