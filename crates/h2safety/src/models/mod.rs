//! Data models for projects, threads and generated artifacts

mod insight;
mod message;
mod project;
mod report;
mod signup;
mod thread;
mod user;

pub use insight::*;
pub use message::*;
pub use project::*;
pub use report::*;
pub use signup::*;
pub use thread::*;
pub use user::*;

/// Generate a new opaque document id
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Serde helper treating an empty string as `None`.
///
/// Older documents store unset enum selections as `""`.
pub(crate) mod empty_as_none {
    use serde::{Deserialize, Deserializer};
    use std::str::FromStr;

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
        }
    }
}
