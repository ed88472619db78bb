// Library interface for newsanalyzer modules
// This allows tests and other binaries to import modules

pub mod analysis;
pub mod app;
pub mod chat;
pub mod error;
pub mod extraction;
pub mod llm;
pub mod models;
pub mod server;
