use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::{Validate, ValidationErrors};

use super::{check_variant, field_error, non_blank, parse_instant, Schema};
use crate::database::models::{AppointmentStatus, ServiceType};

/// `POST /api/appointments`. Status is not accepted; new bookings are pending.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointment {
    pub date: DateTime<Utc>,
    pub service_type: ServiceType,
    #[validate(length(max = 500, message = "Notes must have at most 500 characters"))]
    pub notes: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Pet id must have between 1 and 50 characters"))]
    pub pet_id: String,
    #[validate(length(min = 1, max = 50, message = "Professional id must have between 1 and 50 characters"))]
    pub professional_id: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Location id must have between 1 and 50 characters"))]
    pub location_id: Option<String>,
}

impl Schema for CreateAppointment {
    type Output = Self;

    fn extra_rules(&self, errors: &mut ValidationErrors) {
        if self.date <= Utc::now() {
            errors.add(
                "date",
                field_error("future", "Appointments cannot happen in the past"),
            );
        }
    }

    fn finish(self) -> Self {
        Self {
            notes: non_blank(self.notes),
            ..self
        }
    }
}

/// `PATCH /api/appointments/:id`, the only way to move an appointment
/// between statuses.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointment {
    pub date: Option<DateTime<Utc>>,
    pub service_type: Option<ServiceType>,
    pub status: Option<AppointmentStatus>,
    #[validate(length(max = 500, message = "Notes must have at most 500 characters"))]
    pub notes: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Professional id must have between 1 and 50 characters"))]
    pub professional_id: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Location id must have between 1 and 50 characters"))]
    pub location_id: Option<String>,
}

impl Schema for UpdateAppointment {
    type Output = Self;

    fn finish(self) -> Self {
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub status: Option<String>,
    #[validate(length(max = 50, message = "Professional id must have at most 50 characters"))]
    pub professional_id: Option<String>,
    #[validate(length(max = 50, message = "Pet id must have at most 50 characters"))]
    pub pet_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentFilters {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: Option<AppointmentStatus>,
    pub professional_id: Option<String>,
    pub pet_id: Option<String>,
}

impl Schema for AppointmentQuery {
    type Output = AppointmentFilters;

    fn extra_rules(&self, errors: &mut ValidationErrors) {
        check_variant(errors, "status", self.status.as_deref(), AppointmentStatus::ALL);

        let start = bound(errors, "startDate", self.start_date.as_deref());
        let end = bound(errors, "endDate", self.end_date.as_deref());
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                errors.add(
                    "endDate",
                    field_error("range", "End date must not be before start date"),
                );
            }
        }
    }

    fn finish(self) -> AppointmentFilters {
        AppointmentFilters {
            start_date: self.start_date.as_deref().and_then(parse_instant),
            end_date: self.end_date.as_deref().and_then(parse_instant),
            status: self.status.and_then(|s| s.parse().ok()),
            professional_id: non_blank(self.professional_id),
            pet_id: non_blank(self.pet_id),
        }
    }
}

fn bound(
    errors: &mut ValidationErrors,
    field: &'static str,
    raw: Option<&str>,
) -> Option<DateTime<Utc>> {
    let raw = raw?;
    let parsed = parse_instant(raw);
    if parsed.is_none() {
        errors.add(
            field,
            field_error("date", "Expected a date (YYYY-MM-DD) or an ISO 8601 timestamp"),
        );
    }
    parsed
}
