pub mod archive;
pub mod error_helpers;
pub mod file;
pub mod hash;
pub mod input;
pub mod logging;
pub mod retry;
pub mod text;
pub mod validation;

pub use input::is_windows;
pub use validation::{Rejection, Validation};
