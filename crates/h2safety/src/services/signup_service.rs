//! Waitlist signups

use chrono::Utc;

use crate::error::H2Result;
use crate::models::{new_id, Signup, SignupRequest};
use crate::security::{require_non_empty, validate_and_normalize_email};
use crate::store::Store;

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub struct SignupService {
    store: Store,
}

impl SignupService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn submit(&self, req: SignupRequest) -> H2Result<Signup> {
        let name = require_non_empty(Some(req.name.as_str()), "Name and email are required")?;
        require_non_empty(Some(req.email.as_str()), "Name and email are required")?;
        let email = validate_and_normalize_email(&req.email)?;

        let signup = Signup {
            id: new_id(),
            name,
            email,
            company: optional(req.company),
            build: optional(req.build),
            betatest: optional(req.betatest),
            created_at: Utc::now(),
        };
        self.store.insert(&signup).await?;
        tracing::info!(signup_id = %signup.id, "Waitlist signup stored");
        Ok(signup)
    }
}
