pub mod cli;
pub mod config;
pub mod error;
pub mod reader;
pub mod analyzer;
pub mod export;
pub mod session;
