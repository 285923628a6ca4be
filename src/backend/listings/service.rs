/**
 * Listing Store
 *
 * Property listings owned by agents. Reads are public; creation, update and
 * deletion go through the policy with the listing's owning agent.
 *
 * Addresses are geocoded on create and whenever an update changes the
 * address. An address the geocoder cannot resolve is a validation error and
 * nothing is written.
 */

use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use crate::backend::db::{PropertyRepository, UserRepository};
use crate::backend::error::BackendError;
use crate::backend::listings::types::PropertyInput;
use crate::backend::policy::{authorize, Action, Principal, Resource};
use crate::backend::server::state::AppState;
use crate::backend::services::Geocoder;
use crate::shared::validation::Validator;
use crate::shared::{AgentSummary, Location, Property, PropertyType, PropertyView};

const INVALID_ADDRESS: &str = "Invalid address for geocoding";

fn check_numbers(v: &mut Validator, input: &PropertyInput) {
    v.non_negative("price", input.price, "Price");
    v.non_negative("size", input.size, "Size");
    v.non_negative_count("rooms", input.rooms, "Rooms");
    v.non_negative_count("bedrooms", input.bedrooms, "Bedrooms");
    v.non_negative_count("bathrooms", input.bathrooms, "Bathrooms");
}

fn parse_type(v: &mut Validator, value: Option<&str>) -> Option<PropertyType> {
    let value = value?;
    match value.parse::<PropertyType>() {
        Ok(kind) => Some(kind),
        Err(_) => {
            v.push("type", "Property type must be apartment, house or villa");
            None
        }
    }
}

fn clean_text(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

async fn locate(state: &AppState, address: &str) -> Result<Location, BackendError> {
    let found = state.geocoder.geocode(address).await?.ok_or_else(|| {
        tracing::warn!(address, "Address could not be geocoded");
        BackendError::validation("address", INVALID_ADDRESS)
    })?;
    Ok(Location::point(found.longitude, found.latitude, found.formatted_address))
}

async fn with_agent(state: &AppState, property: Property) -> Result<PropertyView, BackendError> {
    let agent = state
        .db
        .user_by_id(property.agent_id)
        .await?
        .map(|u| u.agent_summary());
    Ok(PropertyView { property, agent })
}

async fn load(state: &AppState, id: Uuid) -> Result<Property, BackendError> {
    state
        .db
        .property_by_id(id)
        .await?
        .ok_or_else(|| BackendError::not_found("Property not found"))
}

pub async fn create(state: &AppState, principal: &Principal, input: PropertyInput) -> Result<PropertyView, BackendError> {
    authorize(Some(principal), Action::Create, Resource::Listing { agent: principal.id })?;

    let mut v = Validator::new();
    let title = v.require("title", input.title.as_deref(), "Please add a title").map(str::to_string);
    v.check(input.price.is_some(), "price", "Please add a price");
    let address = v.require("address", input.address.as_deref(), "Please add an address").map(str::to_string);
    let property_type = match input.property_type.as_deref() {
        Some(t) => parse_type(&mut v, Some(t)),
        None => {
            v.push("type", "Please specify a property type");
            None
        }
    };
    v.check(input.size.is_some(), "size", "Please specify the size");
    check_numbers(&mut v, &input);
    v.finish()?;

    let (Some(title), Some(address), Some(property_type)) = (title, address, property_type) else {
        return Err(BackendError::validation("body", "Incomplete listing"));
    };

    let location = locate(state, &address).await?;

    let now = Utc::now();
    let property = Property {
        id: Uuid::new_v4(),
        agent_id: principal.id,
        title,
        description: clean_text(input.description),
        price: input.price.unwrap_or_default(),
        address,
        location,
        property_type,
        size: input.size.unwrap_or_default(),
        rooms: input.rooms.unwrap_or(0),
        bedrooms: input.bedrooms.unwrap_or(0),
        bathrooms: input.bathrooms.unwrap_or(0),
        images: input.images.unwrap_or_default(),
        created_at: now,
        updated_at: now,
    };

    let property = state.db.insert_property(property).await?;
    tracing::info!(property_id = %property.id, agent_id = %property.agent_id, "Property created");
    with_agent(state, property).await
}

pub async fn get(state: &AppState, id: Uuid) -> Result<PropertyView, BackendError> {
    let property = load(state, id).await?;
    authorize(None, Action::Read, Resource::Listing { agent: property.agent_id })?;
    with_agent(state, property).await
}

/// Newest first, optionally only one agent's listings
pub async fn list(state: &AppState, agent: Option<Uuid>) -> Result<Vec<PropertyView>, BackendError> {
    let properties = state.db.list_properties(agent).await?;

    let mut agents: HashMap<Uuid, Option<AgentSummary>> = HashMap::new();
    let mut views = Vec::with_capacity(properties.len());
    for property in properties {
        if !agents.contains_key(&property.agent_id) {
            let summary = state.db.user_by_id(property.agent_id).await?.map(|u| u.agent_summary());
            agents.insert(property.agent_id, summary);
        }
        let agent = agents.get(&property.agent_id).cloned().flatten();
        views.push(PropertyView { property, agent });
    }
    Ok(views)
}

pub async fn update(
    state: &AppState,
    principal: &Principal,
    id: Uuid,
    input: PropertyInput,
) -> Result<PropertyView, BackendError> {
    let mut property = load(state, id).await?;
    authorize(Some(principal), Action::Update, Resource::Listing { agent: property.agent_id })?;

    let mut v = Validator::new();
    let title = match input.title.as_deref() {
        Some(t) => v.require("title", Some(t), "Title cannot be empty").map(str::to_string),
        None => None,
    };
    let address = match input.address.as_deref() {
        Some(a) => v.require("address", Some(a), "Address cannot be empty").map(str::to_string),
        None => None,
    };
    let property_type = parse_type(&mut v, input.property_type.as_deref());
    check_numbers(&mut v, &input);
    v.finish()?;

    if let Some(address) = address {
        if address != property.address {
            property.location = locate(state, &address).await?;
            property.address = address;
        }
    }

    if let Some(title) = title {
        property.title = title;
    }
    if input.description.is_some() {
        property.description = clean_text(input.description);
    }
    if let Some(price) = input.price {
        property.price = price;
    }
    if let Some(kind) = property_type {
        property.property_type = kind;
    }
    if let Some(size) = input.size {
        property.size = size;
    }
    if let Some(rooms) = input.rooms {
        property.rooms = rooms;
    }
    if let Some(bedrooms) = input.bedrooms {
        property.bedrooms = bedrooms;
    }
    if let Some(bathrooms) = input.bathrooms {
        property.bathrooms = bathrooms;
    }
    if let Some(images) = input.images {
        property.images = images;
    }
    property.updated_at = Utc::now();

    let property = state.db.update_property(property).await?;
    tracing::info!(property_id = %property.id, by = %principal.id, "Property updated");
    with_agent(state, property).await
}

/// Delete a listing and the appointments booked on it
pub async fn delete(state: &AppState, principal: &Principal, id: Uuid) -> Result<(), BackendError> {
    let property = load(state, id).await?;
    authorize(Some(principal), Action::Delete, Resource::Listing { agent: property.agent_id })?;

    let removed = state
        .db
        .delete_property(property.id)
        .await?
        .ok_or_else(|| BackendError::not_found("Property not found"))?;

    tracing::info!(property_id = %property.id, by = %principal.id, appointments = removed, "Property deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::test_support::TestContext;
    use crate::shared::Role;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    fn input(address: &str) -> PropertyInput {
        PropertyInput {
            title: Some("Garden house".to_string()),
            description: Some("Quiet street".to_string()),
            price: Some(420_000.0),
            address: Some(address.to_string()),
            property_type: Some("house".to_string()),
            size: Some(120.0),
            rooms: Some(5),
            bedrooms: Some(3),
            bathrooms: Some(2),
            images: Some(vec!["front.jpg".to_string()]),
        }
    }

    #[tokio::test]
    async fn test_create_geocodes_and_attaches_agent() {
        let ctx = TestContext::new();
        let agent = ctx.seed_user("agent@example.com", Role::Agent).await;

        let view = create(&ctx.state, &agent, input("22 Baker Street")).await.unwrap();
        assert_eq!(view.property.agent_id, agent.id);
        assert_eq!(view.property.location.coordinates, [-0.158, 51.523]);
        assert_eq!(view.property.location.formatted_address, "22 Baker Street");
        assert_eq!(view.agent.unwrap().email, "agent@example.com");
    }

    #[tokio::test]
    async fn test_geocoding_miss_persists_nothing() {
        let ctx = TestContext::new();
        let agent = ctx.seed_user("agent@example.com", Role::Agent).await;

        let err = create(&ctx.state, &agent, input("Nowhere Lane")).await.unwrap_err();
        assert_eq!(err.field_errors()[0].field, "address");
        assert_eq!(ctx.state.db.count_properties().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_requires_fields() {
        let ctx = TestContext::new();
        let agent = ctx.seed_user("agent@example.com", Role::Agent).await;

        let err = create(&ctx.state, &agent, PropertyInput::default()).await.unwrap_err();
        let fields: Vec<_> = err.field_errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "price", "address", "type", "size"]);

        let mut negative = input("1 Main Street");
        negative.price = Some(-1.0);
        let err = create(&ctx.state, &agent, negative).await.unwrap_err();
        assert_eq!(err.field_errors()[0].message, "Price cannot be negative");
    }

    #[tokio::test]
    async fn test_users_cannot_create() {
        let ctx = TestContext::new();
        let user = ctx.seed_user("user@example.com", Role::User).await;
        assert_matches!(
            create(&ctx.state, &user, input("1 Main Street")).await,
            Err(BackendError::Forbidden { .. })
        );
    }

    #[tokio::test]
    async fn test_update_by_other_agent_forbidden_admin_allowed() {
        let ctx = TestContext::new();
        let owner = ctx.seed_user("a@example.com", Role::Agent).await;
        let other = ctx.seed_user("b@example.com", Role::Agent).await;
        let admin = ctx.seed_user("admin@example.com", Role::Admin).await;
        let listing = ctx.seed_property(&owner).await;

        let change = PropertyInput {
            price: Some(199_000.0),
            ..Default::default()
        };
        assert_matches!(
            update(&ctx.state, &other, listing.id, change.clone()).await,
            Err(BackendError::Forbidden { .. })
        );

        let updated = update(&ctx.state, &admin, listing.id, change).await.unwrap();
        assert_eq!(updated.property.price, 199_000.0);
        assert_eq!(updated.property.agent_id, owner.id);
    }

    #[tokio::test]
    async fn test_update_regeocodes_only_on_new_address() {
        let ctx = TestContext::new();
        let owner = ctx.seed_user("a@example.com", Role::Agent).await;
        let listing = ctx.seed_property(&owner).await;

        let same = PropertyInput {
            address: Some(listing.address.clone()),
            title: Some("Renamed".to_string()),
            ..Default::default()
        };
        let view = update(&ctx.state, &owner, listing.id, same).await.unwrap();
        assert_eq!(view.property.location, listing.location);

        let moved = PropertyInput {
            address: Some("10 Downing Street".to_string()),
            ..Default::default()
        };
        let view = update(&ctx.state, &owner, listing.id, moved).await.unwrap();
        assert_eq!(view.property.location.coordinates, [-0.1276, 51.5034]);

        let unknown = PropertyInput {
            address: Some("Atlantis".to_string()),
            ..Default::default()
        };
        assert!(update(&ctx.state, &owner, listing.id, unknown).await.is_err());
        let stored = ctx.state.db.property_by_id(listing.id).await.unwrap().unwrap();
        assert_eq!(stored.address, "10 Downing Street");
    }

    #[tokio::test]
    async fn test_missing_listing_is_not_found_before_policy() {
        let ctx = TestContext::new();
        let user = ctx.seed_user("user@example.com", Role::User).await;
        assert_matches!(
            delete(&ctx.state, &user, Uuid::new_v4()).await,
            Err(BackendError::NotFound { .. })
        );
    }

    #[tokio::test]
    async fn test_list_filters_by_agent() {
        let ctx = TestContext::new();
        let a = ctx.seed_user("a@example.com", Role::Agent).await;
        let b = ctx.seed_user("b@example.com", Role::Agent).await;
        ctx.seed_property(&a).await;
        ctx.seed_property(&a).await;
        ctx.seed_property(&b).await;

        assert_eq!(list(&ctx.state, None).await.unwrap().len(), 3);
        let mine = list(&ctx.state, Some(a.id)).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|v| v.agent.as_ref().map(|s| s.id) == Some(a.id)));
    }
}
