pub mod note;
pub mod user;

pub use note::Note;
pub use user::{PublicUser, User};

/// Field-level validation failure raised by model constructors, before
/// anything reaches the store
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ValidationError(pub String);
