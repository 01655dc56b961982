// src/render/mod.rs
//! Rendering a `CvRecord` through a template: HTML preview, Typst, Markdown

pub mod customization;
pub mod html;
pub mod markdown;
pub mod typst;

pub use customization::{Customization, Tone, COLOR_PRESETS, FONT_PRESETS};
pub use html::{escape_html, render_html};
pub use markdown::render_markdown;
pub use typst::render_typst;
