pub mod bnet;
pub mod game;
pub mod libraries;
