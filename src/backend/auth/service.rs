/**
 * Identity Store
 *
 * Registration, login, profile maintenance and the password-reset flow.
 * Every operation validates its input before touching the store, and
 * every failure is a `BackendError` the handlers return unchanged.
 *
 * # Password Reset
 *
 * 1. `initiate_password_reset` stores the SHA-256 of a random token with a
 *    10 minute expiry and emails the raw token as a link
 * 2. `complete_password_reset` consumes the token in one conditional store
 *    write, so a token can succeed at most once
 */

use chrono::Utc;

use crate::backend::auth::handlers::types::{
    AuthResponse, ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, MessageResponse,
    ProfileUpdateRequest, RegisterRequest, ResetPasswordRequest,
};
use crate::backend::auth::password::{hash_password, verify_password};
use crate::backend::auth::reset::{hash_token, ResetToken, RESET_TOKEN_TTL_MINUTES};
use crate::backend::auth::users::User;
use crate::backend::db::UserRepository;
use crate::backend::error::BackendError;
use crate::backend::policy::{authorize, Action, Principal, Resource};
use crate::backend::server::state::AppState;
use crate::backend::services::{Mailer, OutgoingEmail};
use crate::shared::validation::{normalize_email, Validator};
use crate::shared::{PublicUser, Role};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Role granted at registration
///
/// Agent only when asked for and allowed; admin is never self-assigned.
pub fn registration_role(requested: Option<&str>, allow_agent_signup: bool) -> Role {
    match requested.and_then(|r| r.parse::<Role>().ok()) {
        Some(Role::Agent) if allow_agent_signup => Role::Agent,
        _ => Role::User,
    }
}

fn session(state: &AppState, user: &User) -> Result<AuthResponse, BackendError> {
    Ok(AuthResponse {
        token: state.sessions.sign(user.id)?,
        user: user.to_public(),
    })
}

async fn load_self(state: &AppState, principal: &Principal) -> Result<User, BackendError> {
    state
        .db
        .user_by_id(principal.id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))
}

pub async fn register(state: &AppState, request: RegisterRequest) -> Result<AuthResponse, BackendError> {
    authorize(None, Action::Create, Resource::Account)?;

    let mut v = Validator::new();
    let name = v.name("name", request.name.as_deref());
    let email = v.email("email", request.email.as_deref());
    let password = v.password("password", request.password.as_deref());
    v.finish()?;

    let (name, email, password) = (
        name.unwrap_or_default(),
        email.unwrap_or_default(),
        password.unwrap_or_default(),
    );

    if state.db.user_by_email(&email).await?.is_some() {
        tracing::warn!(email = %email, "Registration with existing email");
        return Err(BackendError::conflict("User already exists"));
    }

    let role = registration_role(request.role.as_deref(), state.config.allow_agent_signup);
    let password_hash = hash_password(password, state.config.bcrypt_cost).await?;
    let user = state.db.insert_user(User::new(name, email, password_hash, role)).await?;

    tracing::info!(user_id = %user.id, role = %user.role, "User registered");
    session(state, &user)
}

pub async fn authenticate(state: &AppState, request: LoginRequest) -> Result<AuthResponse, BackendError> {
    authorize(None, Action::Read, Resource::Account)?;

    let mut v = Validator::new();
    let email = v.require("email", request.email.as_deref(), "Email is required");
    let password = request.password.as_deref().filter(|p| !p.is_empty());
    v.check(password.is_some(), "password", "Password is required");
    v.finish()?;

    let email = normalize_email(email.unwrap_or_default());
    let password = password.unwrap_or_default();

    let user = state.db.user_by_email(&email).await?.ok_or_else(|| {
        tracing::warn!(email = %email, "Login for unknown email");
        BackendError::unauthenticated(INVALID_CREDENTIALS)
    })?;

    if !verify_password(password, &user.password_hash).await? {
        tracing::warn!(user_id = %user.id, "Login with wrong password");
        return Err(BackendError::unauthenticated(INVALID_CREDENTIALS));
    }

    tracing::info!(user_id = %user.id, "User logged in");
    session(state, &user)
}

pub async fn profile(state: &AppState, principal: &Principal) -> Result<PublicUser, BackendError> {
    let user = load_self(state, principal).await?;
    authorize(Some(principal), Action::Read, Resource::Profile { owner: user.id })?;
    Ok(user.to_public())
}

pub async fn update_profile(
    state: &AppState,
    principal: &Principal,
    request: ProfileUpdateRequest,
) -> Result<PublicUser, BackendError> {
    let mut user = load_self(state, principal).await?;
    authorize(Some(principal), Action::Update, Resource::Profile { owner: user.id })?;

    let mut v = Validator::new();
    let name = request.name.as_deref().and_then(|n| v.name("name", Some(n)));
    let email = request.email.as_deref().and_then(|e| v.email("email", Some(e)));
    v.phone("phone", request.phone.as_deref());
    v.finish()?;

    if let Some(email) = email {
        if email != user.email {
            if let Some(existing) = state.db.user_by_email(&email).await? {
                if existing.id != user.id {
                    return Err(BackendError::conflict("Email already in use"));
                }
            }
            user.email = email;
        }
    }
    if let Some(name) = name {
        user.name = name.to_string();
    }
    if let Some(phone) = request.phone {
        user.phone = Some(phone.trim().to_string()).filter(|p| !p.is_empty());
    }
    if let Some(bio) = request.bio {
        user.bio = Some(bio.trim().to_string()).filter(|b| !b.is_empty());
    }
    user.updated_at = Utc::now();

    let user = state.db.update_user(user).await?;
    tracing::info!(user_id = %user.id, "Profile updated");
    Ok(user.to_public())
}

pub async fn change_password(
    state: &AppState,
    principal: &Principal,
    request: ChangePasswordRequest,
) -> Result<AuthResponse, BackendError> {
    let mut user = load_self(state, principal).await?;
    authorize(Some(principal), Action::Update, Resource::Profile { owner: user.id })?;

    let mut v = Validator::new();
    let current = request.current_password.as_deref().filter(|p| !p.is_empty());
    v.check(current.is_some(), "currentPassword", "Current password is required");
    let new_password = v.password("newPassword", request.new_password.as_deref());
    v.finish()?;

    if !verify_password(current.unwrap_or_default(), &user.password_hash).await? {
        tracing::warn!(user_id = %user.id, "Password change with wrong current password");
        return Err(BackendError::unauthenticated("Current password is incorrect"));
    }

    user.password_hash = hash_password(new_password.unwrap_or_default(), state.config.bcrypt_cost).await?;
    user.updated_at = Utc::now();
    let user = state.db.update_user(user).await?;

    tracing::info!(user_id = %user.id, "Password changed");
    session(state, &user)
}

fn reset_email(state: &AppState, user: &User, raw_token: &str) -> OutgoingEmail {
    let link = format!("{}/reset-password/{}", state.config.frontend_base(), raw_token);
    let text = format!(
        "Hello {},\n\nYou requested a password reset. Open the link below to choose a new password. \
         It expires in {} minutes.\n\n{}\n\nIf you did not request this, you can ignore this email.",
        user.name, RESET_TOKEN_TTL_MINUTES, link
    );
    let html = format!(
        "<p>Hello {},</p><p>You requested a password reset. The link below expires in {} minutes.</p>\
         <p><a href=\"{}\">Reset your password</a></p>\
         <p>If you did not request this, you can ignore this email.</p>",
        user.name, RESET_TOKEN_TTL_MINUTES, link
    );
    OutgoingEmail::new(user.email.clone(), "Password reset", text).with_html(html)
}

pub async fn initiate_password_reset(
    state: &AppState,
    request: ForgotPasswordRequest,
) -> Result<MessageResponse, BackendError> {
    authorize(None, Action::Update, Resource::Account)?;

    let mut v = Validator::new();
    let email = v.email("email", request.email.as_deref());
    v.finish()?;
    let email = email.unwrap_or_default();

    let mut user = state
        .db
        .user_by_email(&email)
        .await?
        .ok_or_else(|| BackendError::not_found("There is no user with that email"))?;

    let token = ResetToken::generate(Utc::now());
    user.reset_token_hash = Some(token.hash.clone());
    user.reset_expires_at = Some(token.expires_at);
    let mut user = state.db.update_user(user).await?;

    if let Err(e) = state.mailer.send(reset_email(state, &user, &token.raw)).await {
        tracing::error!(user_id = %user.id, error = %e, "Reset email could not be sent");
        user.reset_token_hash = None;
        user.reset_expires_at = None;
        state.db.update_user(user).await?;
        return Err(BackendError::internal(format!("reset email failed: {}", e)));
    }

    tracing::info!(user_id = %user.id, "Password reset initiated");
    Ok(MessageResponse::new("Password reset email sent"))
}

pub async fn complete_password_reset(
    state: &AppState,
    raw_token: &str,
    request: ResetPasswordRequest,
) -> Result<AuthResponse, BackendError> {
    authorize(None, Action::Update, Resource::Account)?;

    let mut v = Validator::new();
    let password = v.password("password", request.password.as_deref());
    v.finish()?;

    let password_hash = hash_password(password.unwrap_or_default(), state.config.bcrypt_cost).await?;
    let user = state
        .db
        .consume_reset_token(&hash_token(raw_token.trim()), Utc::now(), &password_hash)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Invalid or expired reset token presented");
            BackendError::not_found("Invalid or expired reset token")
        })?;

    tracing::info!(user_id = %user.id, "Password reset completed");
    session(state, &user)
}
