pub mod api;
pub mod backend;
pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod outcome;
pub mod runner;
