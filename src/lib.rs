//! Qatra - household water monitoring engine

pub mod advisor;
pub mod alerts;
pub mod core;
pub mod household;
pub mod settings;
pub mod simulation;
