// src/core/mod.rs
//! Core services shared by the web layer and the CLI

pub mod config_manager;
pub mod database;
pub mod fs_ops;
pub mod in_flight;
pub mod llm_client;
mod template_catalog;
pub mod template_engine;

pub use config_manager::ConfigManager;
pub use database::Database;
pub use fs_ops::FsOps;
pub use in_flight::{InFlight, InFlightGuard, OperationGates};
pub use llm_client::{LlmClient, LlmError};
pub use template_engine::{TemplateEngine, TemplateInfo, TemplateStyle};
