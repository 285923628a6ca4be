/**
 * Appointment Store
 *
 * Viewing appointments booked by users on listings. Who may see or cancel
 * an appointment depends on two ownership facts: the principal that booked
 * it and the agent that owns the listing. Both are resolved before the
 * policy is asked.
 */

use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use crate::backend::appointments::types::AppointmentRequest;
use crate::backend::db::{AppointmentRepository, PropertyRepository, UserRepository};
use crate::backend::error::BackendError;
use crate::backend::policy::{appointment_scope, authorize, Action, Principal, Resource};
use crate::backend::server::state::AppState;
use crate::shared::validation::{is_valid_time, parse_date, Validator};
use crate::shared::{Appointment, AppointmentView, Property, PropertySummary, UserSummary};

fn property_summary(property: &Property) -> PropertySummary {
    PropertySummary {
        id: property.id,
        title: property.title.clone(),
        address: property.address.clone(),
    }
}

async fn load(state: &AppState, id: Uuid) -> Result<Appointment, BackendError> {
    state
        .db
        .appointment_by_id(id)
        .await?
        .ok_or_else(|| BackendError::not_found("Appointment not found"))
}

/// Resolve the appointment's listing and check `action` against it
///
/// A listing that no longer exists leaves no owning agent, so only the
/// requester (or an admin) passes.
async fn authorize_on(
    state: &AppState,
    principal: &Principal,
    action: Action,
    appointment: &Appointment,
) -> Result<Option<Property>, BackendError> {
    let property = state.db.property_by_id(appointment.property_id).await?;
    let listing_agent = property.as_ref().map(|p| p.agent_id).unwrap_or_else(Uuid::nil);
    authorize(
        Some(principal),
        action,
        Resource::Appointment {
            requester: appointment.user_id,
            listing_agent,
        },
    )?;
    Ok(property)
}

pub async fn create(
    state: &AppState,
    principal: &Principal,
    request: AppointmentRequest,
) -> Result<AppointmentView, BackendError> {
    authorize(Some(principal), Action::Create, Resource::NewAppointment)?;

    let mut v = Validator::new();
    let property_id = v
        .require("propertyId", request.property_id.as_deref(), "Property ID is required")
        .and_then(|raw| match raw.parse::<Uuid>() {
            Ok(id) => Some(id),
            Err(_) => {
                v.push("propertyId", "Invalid Property ID");
                None
            }
        });
    let date = v
        .require("date", request.date.as_deref(), "Appointment date is required")
        .and_then(|raw| {
            let parsed = parse_date(raw);
            v.check(parsed.is_some(), "date", "Please provide a valid date");
            parsed
        });
    let time = v
        .require("time", request.time.as_deref(), "Appointment time is required")
        .filter(|raw| {
            let ok = is_valid_time(raw);
            v.check(ok, "time", "Time must be in HH:mm or HH:mm:ss 24-hour format");
            ok
        })
        .map(str::to_string);
    v.finish()?;

    let (Some(property_id), Some(date), Some(time)) = (property_id, date, time) else {
        return Err(BackendError::validation("body", "Incomplete appointment"));
    };

    let property = state
        .db
        .property_by_id(property_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Property not found"))?;

    let now = Utc::now();
    let appointment = Appointment {
        id: Uuid::new_v4(),
        property_id: property.id,
        user_id: principal.id,
        date,
        time,
        message: request.message.map(|m| m.trim().to_string()).filter(|m| !m.is_empty()),
        created_at: now,
        updated_at: now,
    };
    let appointment = state.db.insert_appointment(appointment).await?;

    tracing::info!(
        appointment_id = %appointment.id,
        property_id = %property.id,
        user_id = %principal.id,
        "Appointment booked"
    );

    Ok(AppointmentView {
        appointment,
        property: Some(property_summary(&property)),
        user: Some(UserSummary {
            id: principal.id,
            name: principal.name.clone(),
            email: principal.email.clone(),
        }),
    })
}

/// Appointments visible to `principal`, newest first
///
/// Admins see all, agents those on their listings, users their own.
pub async fn list(state: &AppState, principal: &Principal) -> Result<Vec<AppointmentView>, BackendError> {
    let appointments = state.db.list_appointments(appointment_scope(principal)).await?;

    let mut properties: HashMap<Uuid, Option<PropertySummary>> = HashMap::new();
    let mut users: HashMap<Uuid, Option<UserSummary>> = HashMap::new();
    let mut views = Vec::with_capacity(appointments.len());

    for appointment in appointments {
        if !properties.contains_key(&appointment.property_id) {
            let summary = state
                .db
                .property_by_id(appointment.property_id)
                .await?
                .map(|p| property_summary(&p));
            properties.insert(appointment.property_id, summary);
        }
        if !users.contains_key(&appointment.user_id) {
            let summary = state.db.user_by_id(appointment.user_id).await?.map(|u| u.summary());
            users.insert(appointment.user_id, summary);
        }

        views.push(AppointmentView {
            property: properties.get(&appointment.property_id).cloned().flatten(),
            user: users.get(&appointment.user_id).cloned().flatten(),
            appointment,
        });
    }
    Ok(views)
}

pub async fn get(state: &AppState, principal: &Principal, id: Uuid) -> Result<AppointmentView, BackendError> {
    let appointment = load(state, id).await?;
    let property = authorize_on(state, principal, Action::Read, &appointment).await?;
    let user = state.db.user_by_id(appointment.user_id).await?.map(|u| u.summary());

    Ok(AppointmentView {
        property: property.as_ref().map(property_summary),
        user,
        appointment,
    })
}

pub async fn delete(state: &AppState, principal: &Principal, id: Uuid) -> Result<(), BackendError> {
    let appointment = load(state, id).await?;
    authorize_on(state, principal, Action::Delete, &appointment).await?;

    state.db.delete_appointment(appointment.id).await?;
    tracing::info!(appointment_id = %appointment.id, by = %principal.id, "Appointment deleted");
    Ok(())
}
