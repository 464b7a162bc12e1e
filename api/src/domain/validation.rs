//! Tweet validation shared by every store implementation

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::constants::MAX_TWEET_LENGTH;

/// Per-field validation messages, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<&'static str, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    write!(f, ", ")?;
                }
                write!(f, "{} {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Validate a tweet body before it is written
pub fn validate_body(body: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if body.trim().is_empty() {
        errors.add("body", "can't be blank");
    }

    if body.chars().count() > MAX_TWEET_LENGTH {
        errors.add(
            "body",
            format!("is too long (maximum is {} characters)", MAX_TWEET_LENGTH),
        );
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
