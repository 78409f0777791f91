//! A marching band drill editor made with the Bevy game engine.

pub mod core;
pub mod data;
pub mod editing;
pub mod geometry;
pub mod logger;
pub mod rendering;
pub mod ui;

#[cfg(test)]
mod tests;

pub use crate::core::{create_app, CliArgs};
