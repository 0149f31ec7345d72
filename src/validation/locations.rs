use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use validator::Validate;

use super::{non_blank, Schema};

/// Brazilian CEP, with or without the separating hyphen. ASCII digits only.
static ZIP_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{5}-?[0-9]{3}$").expect("valid zip code regex"));

const ZIP_CODE_MESSAGE: &str = "Invalid CEP. Use format 00000-000 or 00000000.";

/// Canonical zip code: the eight digits without the hyphen.
pub fn normalize_zip_code(raw: &str) -> String {
    raw.replace('-', "")
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLocation {
    #[validate(length(min = 1, max = 120, message = "Name must have between 1 and 120 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 120, message = "City must have between 1 and 120 characters"))]
    pub city: String,
    #[validate(length(min = 1, max = 200, message = "Address must have between 1 and 200 characters"))]
    pub address: String,
    #[validate(regex(path = *ZIP_CODE_RE, message = "Invalid CEP. Use format 00000-000 or 00000000."))]
    pub zip_code: String,
}

impl Schema for CreateLocation {
    type Output = Self;

    fn finish(self) -> Self {
        Self {
            zip_code: normalize_zip_code(&self.zip_code),
            ..self
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLocation {
    #[validate(length(min = 1, max = 120, message = "Name must have between 1 and 120 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 120, message = "City must have between 1 and 120 characters"))]
    pub city: Option<String>,
    #[validate(length(min = 1, max = 200, message = "Address must have between 1 and 200 characters"))]
    pub address: Option<String>,
    #[validate(regex(path = *ZIP_CODE_RE, message = "Invalid CEP. Use format 00000-000 or 00000000."))]
    pub zip_code: Option<String>,
}

impl Schema for UpdateLocation {
    type Output = Self;

    fn finish(self) -> Self {
        Self {
            zip_code: self.zip_code.as_deref().map(normalize_zip_code),
            ..self
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LocationQuery {
    #[validate(length(max = 120, message = "Name filter must have at most 120 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 120, message = "City filter must have at most 120 characters"))]
    pub city: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationFilters {
    pub name: Option<String>,
    pub city: Option<String>,
}

impl Schema for LocationQuery {
    type Output = LocationFilters;

    fn finish(self) -> LocationFilters {
        LocationFilters {
            name: non_blank(self.name),
            city: non_blank(self.city),
        }
    }
}
