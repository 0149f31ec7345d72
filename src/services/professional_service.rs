use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::auth::Actor;
use crate::database::models::Professional;
use crate::database::{new_id, Repository};
use crate::error::ApiError;
use crate::filter::Filter;
use crate::policy::{authorize, Action, Resource};
use crate::validation::{CreateProfessional, ProfessionalFilters, UpdateProfessional};

#[derive(Clone)]
pub struct ProfessionalService {
    professionals: Arc<dyn Repository<Professional>>,
}

impl ProfessionalService {
    pub fn new(professionals: Arc<dyn Repository<Professional>>) -> Self {
        Self { professionals }
    }

    pub async fn list(&self, filters: ProfessionalFilters) -> Result<Vec<Professional>, ApiError> {
        let filter = Filter::new()
            .contains_opt("name", filters.name.as_deref())
            .contains_opt("specialty", filters.specialty.as_deref())
            .eq_opt("active", filters.active)
            .order("created_at desc");
        Ok(self.professionals.find_many(filter).await?)
    }

    pub async fn create(
        &self,
        actor: &Actor,
        input: CreateProfessional,
    ) -> Result<Professional, ApiError> {
        authorize(actor, Action::Create, Resource::Professional)?;
        let professional = Professional {
            id: new_id(),
            name: input.name,
            specialty: input.specialty,
            active: input.active,
            created_at: Utc::now(),
        };
        let professional = self.professionals.insert(professional).await?;
        info!(professional_id = %professional.id, "Professional created");
        Ok(professional)
    }

    pub async fn update(
        &self,
        actor: &Actor,
        id: &str,
        patch: UpdateProfessional,
    ) -> Result<Professional, ApiError> {
        authorize(actor, Action::Update, Resource::Professional)?;
        let mut professional = self.professionals.find_404(id).await?;

        if let Some(name) = patch.name {
            professional.name = name;
        }
        if let Some(specialty) = patch.specialty {
            professional.specialty = specialty;
        }
        if let Some(active) = patch.active {
            professional.active = active;
        }

        let professional = self.professionals.update(professional).await?;
        info!(professional_id = %professional.id, active = professional.active, "Professional updated");
        Ok(professional)
    }

    pub async fn delete(&self, actor: &Actor, id: &str) -> Result<(), ApiError> {
        authorize(actor, Action::Delete, Resource::Professional)?;
        self.professionals.delete(id).await?;
        info!(professional_id = %id, "Professional deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::Role;
    use crate::testing::MemoryRepository;

    fn input(name: &str, specialty: &str, active: bool) -> CreateProfessional {
        CreateProfessional {
            name: name.to_string(),
            specialty: specialty.to_string(),
            active,
        }
    }

    #[tokio::test]
    async fn active_filter_is_exact() {
        let service = ProfessionalService::new(Arc::new(MemoryRepository::<Professional>::new()));
        let admin = Actor::new("root", Role::Admin);
        service.create(&admin, input("Ana", "Dermatology", true)).await.unwrap();
        service.create(&admin, input("Bruno", "Dermatology", false)).await.unwrap();
        service.create(&admin, input("Carla", "Surgery", true)).await.unwrap();

        let found = service
            .list(ProfessionalFilters {
                specialty: Some("derm".into()),
                active: Some(true),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Ana");
    }

    #[tokio::test]
    async fn deactivating_keeps_other_fields() {
        let service = ProfessionalService::new(Arc::new(MemoryRepository::<Professional>::new()));
        let admin = Actor::new("root", Role::Admin);
        let ana = service.create(&admin, input("Ana", "Dermatology", true)).await.unwrap();

        let patch = UpdateProfessional {
            active: Some(false),
            ..Default::default()
        };
        let updated = service.update(&admin, &ana.id, patch).await.unwrap();
        assert!(!updated.active);
        assert_eq!(updated.specialty, "Dermatology");

        let user = Actor::new("u1", Role::User);
        let err = service.delete(&user, &ana.id).await.unwrap_err();
        assert_eq!(err.error_code(), "FORBIDDEN");
    }
}
