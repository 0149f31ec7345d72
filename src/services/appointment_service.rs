use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::auth::Actor;
use crate::database::models::{Appointment, AppointmentStatus, Pet};
use crate::database::{new_id, Repository};
use crate::error::ApiError;
use crate::filter::Filter;
use crate::policy::{authorize, Action, Resource};
use crate::validation::{AppointmentFilters, CreateAppointment, UpdateAppointment};

/// Appointments are owned through their pet, so this service reads pets too.
#[derive(Clone)]
pub struct AppointmentService {
    appointments: Arc<dyn Repository<Appointment>>,
    pets: Arc<dyn Repository<Pet>>,
}

impl AppointmentService {
    pub fn new(
        appointments: Arc<dyn Repository<Appointment>>,
        pets: Arc<dyn Repository<Pet>>,
    ) -> Self {
        Self { appointments, pets }
    }

    pub async fn list_all(
        &self,
        actor: &Actor,
        filters: AppointmentFilters,
    ) -> Result<Vec<Appointment>, ApiError> {
        authorize(actor, Action::Read, Resource::AllAppointments)?;
        let pet_id = filters.pet_id.clone();
        let filter = appointment_filter(filters).eq_opt("pet_id", pet_id);
        Ok(self.appointments.find_many(filter).await?)
    }

    /// Appointments of the caller's pets. `petId` is not honoured here.
    pub async fn list_for_actor(
        &self,
        actor: &Actor,
        filters: AppointmentFilters,
    ) -> Result<Vec<Appointment>, ApiError> {
        let owned = self
            .pets
            .find_many(Filter::new().eq("owner_id", actor.id.as_str()))
            .await?;
        let pet_ids: Vec<String> = owned.into_iter().map(|p| p.id).collect();

        let filter = appointment_filter(filters).any_of("pet_id", pet_ids);
        Ok(self.appointments.find_many(filter).await?)
    }

    pub async fn create(
        &self,
        actor: &Actor,
        input: CreateAppointment,
    ) -> Result<Appointment, ApiError> {
        let pet = self.pets.find_404(&input.pet_id).await?;
        authorize(
            actor,
            Action::Create,
            Resource::Appointment { pet_owner_id: &pet.owner_id },
        )?;

        let appointment = Appointment {
            id: new_id(),
            date: input.date,
            service_type: input.service_type,
            status: AppointmentStatus::Pending,
            notes: input.notes,
            pet_id: pet.id,
            professional_id: input.professional_id,
            location_id: input.location_id,
            created_at: Utc::now(),
        };
        let appointment = self.appointments.insert(appointment).await?;
        info!(appointment_id = %appointment.id, pet_id = %appointment.pet_id, "Appointment booked");
        Ok(appointment)
    }

    /// Administrators only, checked before the appointment is looked up.
    pub async fn update(
        &self,
        actor: &Actor,
        id: &str,
        patch: UpdateAppointment,
    ) -> Result<Appointment, ApiError> {
        authorize(actor, Action::Update, Resource::AllAppointments)?;
        let mut appointment = self.appointments.find_404(id).await?;

        if let Some(date) = patch.date {
            appointment.date = date;
        }
        if let Some(service_type) = patch.service_type {
            appointment.service_type = service_type;
        }
        if let Some(status) = patch.status {
            appointment.status = status;
        }
        if let Some(notes) = patch.notes {
            appointment.notes = Some(notes);
        }
        if let Some(professional_id) = patch.professional_id {
            appointment.professional_id = Some(professional_id);
        }
        if let Some(location_id) = patch.location_id {
            appointment.location_id = Some(location_id);
        }

        let appointment = self.appointments.update(appointment).await?;
        info!(appointment_id = %appointment.id, status = %appointment.status, "Appointment updated");
        Ok(appointment)
    }

    pub async fn delete(&self, actor: &Actor, id: &str) -> Result<(), ApiError> {
        let appointment = self.appointments.find_404(id).await?;
        let pet = self.pets.find_404(&appointment.pet_id).await?;
        authorize(
            actor,
            Action::Delete,
            Resource::Appointment { pet_owner_id: &pet.owner_id },
        )?;
        self.appointments.delete(&appointment.id).await?;
        info!(appointment_id = %appointment.id, actor = %actor.id, "Appointment deleted");
        Ok(())
    }
}

fn appointment_filter(filters: AppointmentFilters) -> Filter {
    Filter::new()
        .gte_opt("date", filters.start_date)
        .lte_opt("date", filters.end_date)
        .eq_opt("status", filters.status)
        .eq_opt("professional_id", filters.professional_id)
        .order("created_at desc")
}
