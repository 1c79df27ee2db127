//! Formation Clash - concurrent formation battle engine

pub mod battle;
pub mod combat;
pub mod core;
