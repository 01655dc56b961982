// src/ai/mod.rs
pub mod enhancer;
pub mod json_extract;
pub mod prompts;

pub use enhancer::{apply_tweaks, EnhanceError, Enhancer};
pub use json_extract::extract_json;
pub use prompts::RefineMode;
