use serde::Deserialize;
use validator::Validate;

use super::{trimmed, Schema, PERSON_NAME_RE};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignUp {
    #[validate(
        length(min = 1, max = 120, message = "Name must have between 1 and 120 characters"),
        regex(path = *PERSON_NAME_RE, message = "Name may only contain letters, spaces, dots, apostrophes and hyphens")
    )]
    pub name: String,
    #[serde(deserialize_with = "trimmed")]
    #[validate(
        email(message = "Invalid email address"),
        length(max = 254, message = "Email must have at most 254 characters")
    )]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "Password must have between 8 and 128 characters"))]
    pub password: String,
}

impl Schema for SignUp {
    type Output = Self;

    fn finish(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.to_lowercase(),
            ..self
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignIn {
    #[serde(deserialize_with = "trimmed")]
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, max = 128, message = "Password is required"))]
    pub password: String,
}

impl Schema for SignIn {
    type Output = Self;

    fn finish(self) -> Self {
        Self {
            email: self.email.to_lowercase(),
            ..self
        }
    }
}
