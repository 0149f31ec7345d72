use serde::Deserialize;
use validator::{Validate, ValidationErrors};

use super::{field_error, non_blank, parse_flag, Schema, PERSON_NAME_RE};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProfessional {
    #[validate(
        length(min = 1, max = 120, message = "Name must have between 1 and 120 characters"),
        regex(path = *PERSON_NAME_RE, message = "Name may only contain letters, spaces, dots, apostrophes and hyphens")
    )]
    pub name: String,
    #[validate(length(min = 1, max = 60, message = "Specialty must have between 1 and 60 characters"))]
    pub specialty: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Schema for CreateProfessional {
    type Output = Self;

    fn finish(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            specialty: self.specialty.trim().to_string(),
            ..self
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfessional {
    #[validate(
        length(min = 1, max = 120, message = "Name must have between 1 and 120 characters"),
        regex(path = *PERSON_NAME_RE, message = "Name may only contain letters, spaces, dots, apostrophes and hyphens")
    )]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 60, message = "Specialty must have between 1 and 60 characters"))]
    pub specialty: Option<String>,
    pub active: Option<bool>,
}

impl Schema for UpdateProfessional {
    type Output = Self;

    fn finish(self) -> Self {
        Self {
            name: self.name.map(|n| n.trim().to_string()),
            specialty: self.specialty.map(|s| s.trim().to_string()),
            ..self
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProfessionalQuery {
    #[validate(length(max = 120, message = "Name filter must have at most 120 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 60, message = "Specialty filter must have at most 60 characters"))]
    pub specialty: Option<String>,
    pub active: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfessionalFilters {
    pub name: Option<String>,
    pub specialty: Option<String>,
    pub active: Option<bool>,
}

impl Schema for ProfessionalQuery {
    type Output = ProfessionalFilters;

    fn extra_rules(&self, errors: &mut ValidationErrors) {
        if let Some(raw) = &self.active {
            if parse_flag(raw).is_none() {
                errors.add("active", field_error("boolean", "Expected true or false"));
            }
        }
    }

    fn finish(self) -> ProfessionalFilters {
        ProfessionalFilters {
            name: non_blank(self.name),
            specialty: non_blank(self.specialty),
            active: self.active.as_deref().and_then(parse_flag),
        }
    }
}
