//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod compose;
pub mod entities;
pub mod error;
pub mod resolver;
pub mod session;

pub use compose::{project_label_filter, ComposeInvocation, PROJECT_LABEL};
pub use entities::*;
pub use error::DomainError;
pub use resolver::{fragment_name, resolve, BASE_FRAGMENT};
pub use session::Session;
