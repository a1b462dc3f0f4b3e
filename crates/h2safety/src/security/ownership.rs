//! Ownership checks for user-scoped documents

use crate::error::{H2Error, H2Result};

/// Fail with `Forbidden` unless `caller` owns the document
pub fn ensure_owner(owner_id: Option<&str>, caller: &str, kind: &str) -> H2Result<()> {
    match owner_id {
        Some(owner) if owner == caller => Ok(()),
        _ => Err(H2Error::Forbidden(permission_denied_message(kind))),
    }
}

pub fn permission_denied_message(kind: &str) -> String {
    format!("You don't have access to this {}", kind.to_lowercase())
}
