// src/lib.rs
//! CV builder: form validation, AI-assisted writing, templated rendering and
//! export, served over a local HTTP API and a command line.

#[macro_use]
pub mod logging;

pub mod ai;
pub mod cli;
pub mod core;
pub mod export;
pub mod image_validator;
pub mod job_source;
pub mod render;
pub mod storage;
pub mod types;
pub mod utils;
pub mod validation;
pub mod web;
pub mod workspace;

pub use export::{ExportFormat, ExportJob, ExportedFile};
pub use types::{CvForm, CvRecord};
pub use web::start_web_server;
