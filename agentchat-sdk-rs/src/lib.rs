pub mod agent;
pub mod config;
pub mod error;
pub mod llm;
pub mod logger;
pub mod message;
pub mod prompts;
pub mod runner;
pub mod session;
pub mod ui;
