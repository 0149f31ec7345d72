use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::auth::Actor;
use crate::database::models::Pet;
use crate::database::{new_id, Repository};
use crate::error::ApiError;
use crate::filter::Filter;
use crate::policy::{authorize, Action, Resource};
use crate::validation::{CreatePet, PetFilters, UpdatePet};

#[derive(Clone)]
pub struct PetService {
    pets: Arc<dyn Repository<Pet>>,
}

impl PetService {
    pub fn new(pets: Arc<dyn Repository<Pet>>) -> Self {
        Self { pets }
    }

    /// Every owner's pets; `userId` narrows to one owner.
    pub async fn list_all(&self, actor: &Actor, filters: PetFilters) -> Result<Vec<Pet>, ApiError> {
        authorize(actor, Action::Read, Resource::AllPets)?;
        let owner = filters.user_id.clone();
        Ok(self.pets.find_many(pet_filter(owner, filters)).await?)
    }

    /// The caller's own pets. A client-supplied `userId` is ignored.
    pub async fn list_for_actor(
        &self,
        actor: &Actor,
        filters: PetFilters,
    ) -> Result<Vec<Pet>, ApiError> {
        Ok(self
            .pets
            .find_many(pet_filter(Some(actor.id.clone()), filters))
            .await?)
    }

    pub async fn create(&self, actor: &Actor, input: CreatePet) -> Result<Pet, ApiError> {
        let pet = Pet {
            id: new_id(),
            owner_id: actor.id.clone(),
            name: input.name,
            species: input.species,
            breed: input.breed,
            birth_date: input.birth_date,
            photo_url: input.photo_url,
            created_at: Utc::now(),
        };
        let pet = self.pets.insert(pet).await?;
        info!(pet_id = %pet.id, owner_id = %pet.owner_id, "Pet created");
        Ok(pet)
    }

    pub async fn update(&self, actor: &Actor, id: &str, patch: UpdatePet) -> Result<Pet, ApiError> {
        let mut pet = self.pets.find_404(id).await?;
        authorize(actor, Action::Update, Resource::Pet { owner_id: &pet.owner_id })?;

        if let Some(name) = patch.name {
            pet.name = name;
        }
        if let Some(species) = patch.species {
            pet.species = species;
        }
        if let Some(breed) = patch.breed {
            pet.breed = Some(breed);
        }
        if let Some(birth_date) = patch.birth_date {
            pet.birth_date = Some(birth_date);
        }
        if let Some(photo_url) = patch.photo_url {
            pet.photo_url = Some(photo_url);
        }

        let pet = self.pets.update(pet).await?;
        info!(pet_id = %pet.id, actor = %actor.id, "Pet updated");
        Ok(pet)
    }

    pub async fn delete(&self, actor: &Actor, id: &str) -> Result<(), ApiError> {
        let pet = self.pets.find_404(id).await?;
        authorize(actor, Action::Delete, Resource::Pet { owner_id: &pet.owner_id })?;
        self.pets.delete(&pet.id).await?;
        info!(pet_id = %pet.id, actor = %actor.id, "Pet deleted");
        Ok(())
    }
}

fn pet_filter(owner_id: Option<String>, filters: PetFilters) -> Filter {
    Filter::new()
        .eq_opt("owner_id", owner_id)
        .eq_opt("species", filters.species)
        .contains_opt("name", filters.name.as_deref())
        .contains_opt("breed", filters.breed.as_deref())
        .order("created_at desc")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{Role, Species};
    use crate::testing::MemoryRepository;

    fn service() -> PetService {
        PetService::new(Arc::new(MemoryRepository::<Pet>::new()))
    }

    fn create_input(name: &str, species: Species) -> CreatePet {
        CreatePet {
            name: name.to_string(),
            species,
            breed: None,
            birth_date: None,
            photo_url: None,
        }
    }

    #[tokio::test]
    async fn owner_is_taken_from_the_actor() {
        let service = service();
        let alice = Actor::new("alice", Role::User);
        let pet = service.create(&alice, create_input("Rex", Species::Dog)).await.unwrap();
        assert_eq!(pet.owner_id, "alice");
        let mine = service
            .list_for_actor(&alice, PetFilters::default())
            .await
            .unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, pet.id);
    }

    #[tokio::test]
    async fn filters_by_species_and_name_newest_first() {
        let service = service();
        let alice = Actor::new("alice", Role::User);
        for (name, species) in [
            ("Rex", Species::Dog),
            ("Rexina", Species::Cat),
            ("T-Rex-y", Species::Dog),
            ("Bolt", Species::Dog),
        ] {
            service.create(&alice, create_input(name, species)).await.unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }

        let filters = PetFilters {
            name: Some("rex".into()),
            species: Some(Species::Dog),
            ..Default::default()
        };
        let names: Vec<_> = service
            .list_for_actor(&alice, filters)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["T-Rex-y", "Rex"]);
    }

    #[tokio::test]
    async fn me_listing_ignores_user_id() {
        let service = service();
        let alice = Actor::new("alice", Role::User);
        let bob = Actor::new("bob", Role::User);
        service.create(&bob, create_input("Bob's", Species::Cat)).await.unwrap();

        let filters = PetFilters {
            user_id: Some("bob".into()),
            ..Default::default()
        };
        assert!(service.list_for_actor(&alice, filters).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_all_is_admin_only() {
        let service = service();
        let alice = Actor::new("alice", Role::User);
        let admin = Actor::new("root", Role::Admin);
        service.create(&alice, create_input("Rex", Species::Dog)).await.unwrap();

        let err = service.list_all(&alice, PetFilters::default()).await.unwrap_err();
        assert_eq!(err.error_code(), "FORBIDDEN");

        let filters = PetFilters {
            user_id: Some("alice".into()),
            ..Default::default()
        };
        assert_eq!(service.list_all(&admin, filters).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_merges_only_provided_fields() {
        let service = service();
        let alice = Actor::new("alice", Role::User);
        let mut input = create_input("Rex", Species::Dog);
        input.breed = Some("Beagle".into());
        let pet = service.create(&alice, input).await.unwrap();

        let patch = UpdatePet {
            name: Some("Max".into()),
            ..Default::default()
        };
        let updated = service.update(&alice, &pet.id, patch).await.unwrap();
        assert_eq!(updated.name, "Max");
        assert_eq!(updated.breed.as_deref(), Some("Beagle"));
        assert_eq!(updated.species, Species::Dog);
        assert_eq!(updated.created_at, pet.created_at);
    }

    #[tokio::test]
    async fn missing_is_404_and_foreign_is_403() {
        let service = service();
        let alice = Actor::new("alice", Role::User);
        let mallory = Actor::new("mallory", Role::User);
        let pet = service.create(&alice, create_input("Rex", Species::Dog)).await.unwrap();

        let err = service.delete(&mallory, "no-such-pet").await.unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");
        let err = service.delete(&mallory, &pet.id).await.unwrap_err();
        assert_eq!(err.error_code(), "FORBIDDEN");
        let err = service
            .update(&mallory, &pet.id, UpdatePet::default())
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "FORBIDDEN");
    }

    #[tokio::test]
    async fn deleting_twice_reports_not_found() {
        let service = service();
        let admin = Actor::new("root", Role::Admin);
        let alice = Actor::new("alice", Role::User);
        let pet = service.create(&alice, create_input("Rex", Species::Dog)).await.unwrap();

        service.delete(&admin, &pet.id).await.unwrap();
        let err = service.delete(&admin, &pet.id).await.unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");
    }
}
