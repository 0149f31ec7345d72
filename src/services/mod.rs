pub mod appointment_service;
pub mod auth_service;
pub mod location_service;
pub mod pet_service;
pub mod professional_service;

pub use appointment_service::AppointmentService;
pub use auth_service::{AuthService, SessionInfo, SignedIn};
pub use location_service::LocationService;
pub use pet_service::PetService;
pub use professional_service::ProfessionalService;
