use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::models::{Appointment, Location, Pet, Professional, Session, User};
use crate::database::{DatabaseManager, PgRepository, Repository};
use crate::services::{
    AppointmentService, AuthService, LocationService, PetService, ProfessionalService,
};

/// One persistence handle per table.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn Repository<User>>,
    pub sessions: Arc<dyn Repository<Session>>,
    pub pets: Arc<dyn Repository<Pet>>,
    pub locations: Arc<dyn Repository<Location>>,
    pub professionals: Arc<dyn Repository<Professional>>,
    pub appointments: Arc<dyn Repository<Appointment>>,
}

impl Repositories {
    pub fn postgres(db: &DatabaseManager) -> Self {
        let pool = db.pool().clone();
        Self {
            users: Arc::new(PgRepository::<User>::new(pool.clone())),
            sessions: Arc::new(PgRepository::<Session>::new(pool.clone())),
            pets: Arc::new(PgRepository::<Pet>::new(pool.clone())),
            locations: Arc::new(PgRepository::<Location>::new(pool.clone())),
            professionals: Arc::new(PgRepository::<Professional>::new(pool.clone())),
            appointments: Arc::new(PgRepository::<Appointment>::new(pool)),
        }
    }
}

/// Everything a handler can reach. Built once at startup and cloned per
/// request by axum.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// Absent when running on in-memory repositories.
    pub db: Option<DatabaseManager>,
    pub auth: AuthService,
    pub pets: PetService,
    pub locations: LocationService,
    pub professionals: ProfessionalService,
    pub appointments: AppointmentService,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, repos: Repositories, db: Option<DatabaseManager>) -> Self {
        Self {
            auth: AuthService::new(repos.users, repos.sessions, config.clone()),
            pets: PetService::new(repos.pets.clone()),
            locations: LocationService::new(repos.locations),
            professionals: ProfessionalService::new(repos.professionals),
            appointments: AppointmentService::new(repos.appointments, repos.pets),
            config,
            db,
        }
    }

    pub fn postgres(config: Arc<AppConfig>, db: DatabaseManager) -> Self {
        let repos = Repositories::postgres(&db);
        Self::new(config, repos, Some(db))
    }
}
