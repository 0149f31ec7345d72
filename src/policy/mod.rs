//! Who may do what. Pure functions over the actor and, for ownership-gated
//! resources, the owner id of an instance that is already known to exist.

use crate::auth::Actor;
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource<'a> {
    Location,
    Professional,
    /// A pet and its owner.
    Pet { owner_id: &'a str },
    /// An appointment, owned through its pet.
    Appointment { pet_owner_id: &'a str },
    /// Listings that span every owner.
    AllPets,
    AllAppointments,
}

pub fn permitted(actor: &Actor, action: Action, resource: Resource<'_>) -> bool {
    if actor.is_admin() {
        return true;
    }
    match (resource, action) {
        // role-gated
        (Resource::Location | Resource::Professional, Action::Read) => true,
        (Resource::Location | Resource::Professional, _) => false,
        (Resource::AllPets | Resource::AllAppointments, _) => false,
        // status changes are the clinic's call
        (Resource::Appointment { .. }, Action::Update) => false,
        // ownership-gated
        (Resource::Pet { owner_id }, _) => owner_id == actor.id,
        (Resource::Appointment { pet_owner_id }, _) => pet_owner_id == actor.id,
    }
}

/// `permitted`, or a 403 naming what was refused.
pub fn authorize(actor: &Actor, action: Action, resource: Resource<'_>) -> Result<(), ApiError> {
    if permitted(actor, action, resource) {
        return Ok(());
    }
    let message = match resource {
        Resource::Location | Resource::Professional | Resource::AllPets | Resource::AllAppointments => {
            "Only administrators can perform this action"
        }
        Resource::Appointment { .. } if action == Action::Update => {
            "Only administrators can update appointments"
        }
        Resource::Pet { .. } | Resource::Appointment { .. } => {
            "You do not have permission to access this resource"
        }
    };
    tracing::debug!(actor = %actor.id, ?action, ?resource, "authorization denied");
    Err(ApiError::forbidden(message))
}
