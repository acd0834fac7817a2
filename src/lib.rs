//! Rules engine and turn controller for two-player terminal Othello.

pub mod board;
pub mod command;
pub mod config;
pub mod error;
pub mod game;
pub mod types;
