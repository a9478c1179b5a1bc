pub mod common;
pub mod controller;
pub mod listing;
pub mod monitor;
pub mod render;
