use std::collections::HashMap;

use crate::types::{is_blood_group, BLOOD_GROUPS};

/// Field-level validation failures collected while checking a request body
#[derive(Debug, Default, Clone, PartialEq, thiserror::Error)]
#[error("one or more fields are invalid")]
pub struct ValidationErrors(pub HashMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_string(), message.into());
    }

    pub fn require(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, "This field is required");
        }
    }

    pub fn email(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, "This field is required");
        } else if !looks_like_email(value) {
            self.add(field, format!("Invalid email address: {}", value));
        }
    }

    pub fn blood_group(&mut self, field: &str, value: &str) {
        if !is_blood_group(value) {
            self.add(
                field,
                format!("Invalid blood group '{}', expected one of {}", value, BLOOD_GROUPS.join(", ")),
            );
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !value.contains(char::is_whitespace)
        }
        None => false,
    }
}
