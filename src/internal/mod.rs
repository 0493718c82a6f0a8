// Internal shared types for the Fulmen library

pub mod error;
