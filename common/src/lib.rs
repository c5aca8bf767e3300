//! Simulation core of the Slytherin snake game: board model, food spawning,
//! collision resolution, the session state machine and the score ledger.
//! Rendering and input devices live outside this crate; they read
//! [`games::snake::SessionSnapshot`] and send [`games::snake::InputEvent`]s.

pub mod config;
pub mod games;
pub mod logger;
pub mod storage;
