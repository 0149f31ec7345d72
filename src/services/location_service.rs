use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::auth::Actor;
use crate::database::models::Location;
use crate::database::{new_id, Repository};
use crate::error::ApiError;
use crate::filter::Filter;
use crate::policy::{authorize, Action, Resource};
use crate::validation::{CreateLocation, LocationFilters, UpdateLocation};

#[derive(Clone)]
pub struct LocationService {
    locations: Arc<dyn Repository<Location>>,
}

impl LocationService {
    pub fn new(locations: Arc<dyn Repository<Location>>) -> Self {
        Self { locations }
    }

    pub async fn list(&self, filters: LocationFilters) -> Result<Vec<Location>, ApiError> {
        let filter = Filter::new()
            .contains_opt("name", filters.name.as_deref())
            .contains_opt("city", filters.city.as_deref())
            .order("created_at desc");
        Ok(self.locations.find_many(filter).await?)
    }

    pub async fn create(&self, actor: &Actor, input: CreateLocation) -> Result<Location, ApiError> {
        authorize(actor, Action::Create, Resource::Location)?;
        let location = Location {
            id: new_id(),
            name: input.name,
            city: input.city,
            address: input.address,
            zip_code: input.zip_code,
            created_at: Utc::now(),
        };
        let location = self.locations.insert(location).await?;
        info!(location_id = %location.id, "Location created");
        Ok(location)
    }

    pub async fn update(
        &self,
        actor: &Actor,
        id: &str,
        patch: UpdateLocation,
    ) -> Result<Location, ApiError> {
        authorize(actor, Action::Update, Resource::Location)?;
        let mut location = self.locations.find_404(id).await?;

        if let Some(name) = patch.name {
            location.name = name;
        }
        if let Some(city) = patch.city {
            location.city = city;
        }
        if let Some(address) = patch.address {
            location.address = address;
        }
        if let Some(zip_code) = patch.zip_code {
            location.zip_code = zip_code;
        }

        let location = self.locations.update(location).await?;
        info!(location_id = %location.id, "Location updated");
        Ok(location)
    }

    pub async fn delete(&self, actor: &Actor, id: &str) -> Result<(), ApiError> {
        authorize(actor, Action::Delete, Resource::Location)?;
        self.locations.delete(id).await?;
        info!(location_id = %id, "Location deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::Role;
    use crate::testing::MemoryRepository;

    fn input(name: &str, city: &str) -> CreateLocation {
        CreateLocation {
            name: name.to_string(),
            city: city.to_string(),
            address: "Rua das Flores, 10".to_string(),
            zip_code: "80010000".to_string(),
        }
    }

    fn service() -> LocationService {
        LocationService::new(Arc::new(MemoryRepository::<Location>::new()))
    }

    #[tokio::test]
    async fn non_admins_are_refused_before_lookup() {
        let service = service();
        let user = Actor::new("u1", Role::User);

        let err = service.create(&user, input("Centro", "Curitiba")).await.unwrap_err();
        assert_eq!(err.error_code(), "FORBIDDEN");
        let err = service
            .update(&user, "does-not-exist", UpdateLocation::default())
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "FORBIDDEN");
        let err = service.delete(&user, "does-not-exist").await.unwrap_err();
        assert_eq!(err.error_code(), "FORBIDDEN");
    }

    #[tokio::test]
    async fn admin_crud_and_city_filter() {
        let service = service();
        let admin = Actor::new("root", Role::Admin);
        let centro = service.create(&admin, input("Centro", "Curitiba")).await.unwrap();
        service.create(&admin, input("Praia", "Florianópolis")).await.unwrap();

        let found = service
            .list(LocationFilters {
                city: Some("curi".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, centro.id);

        let patch = UpdateLocation {
            zip_code: Some("80020000".into()),
            ..Default::default()
        };
        let updated = service.update(&admin, &centro.id, patch).await.unwrap();
        assert_eq!(updated.zip_code, "80020000");
        assert_eq!(updated.name, "Centro");

        service.delete(&admin, &centro.id).await.unwrap();
        let err = service.delete(&admin, &centro.id).await.unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");
    }
}
