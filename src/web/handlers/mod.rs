pub mod ai_handlers;
pub mod cv_handlers;
pub mod helpers;
pub mod storage_handlers;
pub mod system_handlers;

pub use ai_handlers::*;
pub use cv_handlers::*;
pub use storage_handlers::*;
pub use system_handlers::*;
