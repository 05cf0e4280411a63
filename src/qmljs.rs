//! Main module for the QML/JavaScript indentation engine

pub mod cache;
pub mod classifier;
pub mod config;
pub mod document;
pub mod error;
pub mod formatter;
pub mod indenter;
pub mod policy;
pub mod scanner;
pub mod state;
pub mod testing;
pub mod token;
