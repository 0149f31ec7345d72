use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::Entity;
use crate::filter::SqlParam;

string_enum! {
    ServiceType {
        Consultation => "CONSULTATION",
        Vaccination => "VACCINATION",
        Exam => "EXAM",
        Checkup => "CHECKUP",
        BathGrooming => "BATH_GROOMING",
    }
}

string_enum! {
    AppointmentStatus {
        Pending => "PENDING",
        Confirmed => "CONFIRMED",
        Completed => "COMPLETED",
        Cancelled => "CANCELLED",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub date: DateTime<Utc>,
    #[sqlx(try_from = "String")]
    pub service_type: ServiceType,
    #[sqlx(try_from = "String")]
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub pet_id: String,
    pub professional_id: Option<String>,
    pub location_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Entity for Appointment {
    const TABLE: &'static str = "appointments";
    const KIND: &'static str = "Appointment";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn columns(&self) -> Vec<(&'static str, SqlParam)> {
        vec![
            ("date", self.date.into()),
            ("service_type", self.service_type.into()),
            ("status", self.status.into()),
            ("notes", self.notes.clone().into()),
            ("pet_id", self.pet_id.clone().into()),
            ("professional_id", self.professional_id.clone().into()),
            ("location_id", self.location_id.clone().into()),
        ]
    }
}
