use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use validator::{Validate, ValidationErrors};

use super::{check_variant, field_error, non_blank, Schema};
use crate::database::models::Species;

/// `POST /api/pets`. Owner, id and timestamps are never read from the body.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePet {
    #[validate(length(min = 1, max = 60, message = "Name must have between 1 and 60 characters"))]
    pub name: String,
    pub species: Species,
    #[validate(length(max = 60, message = "Breed must have at most 60 characters"))]
    pub breed: Option<String>,
    pub birth_date: Option<NaiveDate>,
    #[validate(
        url(message = "Photo URL must be a valid URL"),
        length(max = 200, message = "Photo URL must have at most 200 characters")
    )]
    pub photo_url: Option<String>,
}

impl Schema for CreatePet {
    type Output = Self;

    fn extra_rules(&self, errors: &mut ValidationErrors) {
        if self.name.trim().is_empty() {
            errors.add("name", field_error("blank", "Name is required"));
        }
        check_birth_date(errors, self.birth_date);
    }

    fn finish(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            breed: non_blank(self.breed),
            ..self
        }
    }
}

/// `PATCH /api/pets/:id`. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePet {
    #[validate(length(min = 1, max = 60, message = "Name must have between 1 and 60 characters"))]
    pub name: Option<String>,
    pub species: Option<Species>,
    #[validate(length(max = 60, message = "Breed must have at most 60 characters"))]
    pub breed: Option<String>,
    pub birth_date: Option<NaiveDate>,
    #[validate(
        url(message = "Photo URL must be a valid URL"),
        length(max = 200, message = "Photo URL must have at most 200 characters")
    )]
    pub photo_url: Option<String>,
}

impl Schema for UpdatePet {
    type Output = Self;

    fn extra_rules(&self, errors: &mut ValidationErrors) {
        if matches!(&self.name, Some(name) if name.trim().is_empty()) {
            errors.add("name", field_error("blank", "Name is required"));
        }
        check_birth_date(errors, self.birth_date);
    }

    fn finish(self) -> Self {
        Self {
            name: self.name.map(|n| n.trim().to_string()),
            breed: non_blank(self.breed),
            ..self
        }
    }
}

fn check_birth_date(errors: &mut ValidationErrors, birth_date: Option<NaiveDate>) {
    if let Some(date) = birth_date {
        if date > Utc::now().date_naive() {
            errors.add(
                "birthDate",
                field_error("future", "Birth date cannot be in the future"),
            );
        }
    }
}

/// Query string of `GET /api/pets` and `GET /api/pets/me`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PetQuery {
    #[validate(length(max = 60, message = "Name filter must have at most 60 characters"))]
    pub name: Option<String>,
    pub species: Option<String>,
    #[validate(length(max = 60, message = "Breed filter must have at most 60 characters"))]
    pub breed: Option<String>,
    #[validate(length(max = 50, message = "User id must have at most 50 characters"))]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PetFilters {
    pub name: Option<String>,
    pub species: Option<Species>,
    pub breed: Option<String>,
    pub user_id: Option<String>,
}

impl Schema for PetQuery {
    type Output = PetFilters;

    fn extra_rules(&self, errors: &mut ValidationErrors) {
        check_variant(errors, "species", self.species.as_deref(), Species::ALL);
    }

    fn finish(self) -> PetFilters {
        PetFilters {
            name: non_blank(self.name),
            species: self.species.and_then(|s| s.parse().ok()),
            breed: non_blank(self.breed),
            user_id: non_blank(self.user_id),
        }
    }
}
