//! Security module - ownership checks and input validation

pub mod ownership;
pub mod validator;

pub use ownership::*;
pub use validator::*;
