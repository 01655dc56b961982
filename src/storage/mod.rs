// src/storage/mod.rs
//! Local storage: settings, saved CVs and usage counters on top of `core::Database`

pub mod saved_cvs;
pub mod settings;
pub mod usage;

pub use saved_cvs::{SavedCv, SavedCvRepository, SavedCvSummary};
pub use settings::{mask_api_key, SettingsRepository};
pub use usage::{CreditError, CreditStatus, UsageTracker};
