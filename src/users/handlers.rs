use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    error::ApiError,
    extract::JsonBody,
    state::AppState,
    users::{
        dto::{non_empty, AccountRequest, LoginRequest, LoginResponse, MessageResponse, PublicUser},
        extractors::CurrentUser,
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo::StoreError,
        repo_types::{NewUser, User},
    },
};

const MISSING_REGISTER_FIELDS: &str = "Falta información, por favor verifica los campos";
const USER_EXISTS: &str = "Ese usuario ya existe";
const NOT_SAVED: &str = "No se pudo guardar el registro";
const MISSING_LOGIN_FIELDS: &str = "Faltan datos, favor de verificar";
const INVALID_CREDENTIALS: &str = "Datos de acceso incorrectos";
const USER_NOT_FOUND: &str = "Usuario no encontrado";
const USER_UPDATED: &str = "Usuario actualizado con éxito";
const UPDATE_FAILED: &str = "Error al actualizar el usuario";

pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(register))
        .route("/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me).put(edit_me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<AccountRequest>,
) -> Result<(StatusCode, Json<PublicUser>), ApiError> {
    let (Some(name), Some(email), Some(password)) = (
        non_empty(&payload.name).map(str::to_owned),
        non_empty(&payload.email).map(str::to_owned),
        non_empty(&payload.password),
    ) else {
        warn!("register with missing fields");
        return Err(ApiError::BadRequest(MISSING_REGISTER_FIELDS));
    };

    let password_hash = hash_password(password)?;

    // Uniqueness is decided by the store on insert; there is no separate lookup.
    let new_user = NewUser {
        name,
        email,
        password_hash,
        profile: payload.profile,
    };
    let user = match state.users.create(new_user).await {
        Ok(u) => u,
        Err(StoreError::DuplicateEmail) => {
            warn!("email already registered");
            return Err(ApiError::BadRequest(USER_EXISTS));
        }
        Err(e) => {
            error!(error = %e, "create user failed");
            return Err(ApiError::BadRequest(NOT_SAVED));
        }
    };

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((StatusCode::CREATED, Json(PublicUser::from(&user))))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (Some(email), Some(password)) = (non_empty(&payload.email), non_empty(&payload.password))
    else {
        warn!("login with missing fields");
        return Err(ApiError::BadRequest(MISSING_LOGIN_FIELDS));
    };

    let user = match state.users.find_by_email(email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!("login unknown email");
            return Err(ApiError::Unauthorized(INVALID_CREDENTIALS));
        }
        Err(e) => {
            error!(error = %e, "find_by_email failed");
            return Err(anyhow::Error::from(e).into());
        }
    };

    // An unreadable stored hash answers like a wrong password.
    let verified = verify_password(password, &user.password_hash).unwrap_or_else(|e| {
        error!(error = %e, user_id = %user.id, "stored password hash unreadable");
        false
    });
    if !verified {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS));
    }

    let token = JwtKeys::from_ref(&state).sign(user.id)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(LoginResponse {
        user: PublicUser::from(&user),
        token,
    }))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}

/// Full replace: fields missing from the body are cleared. The password hash
/// only changes when a new password is supplied.
#[instrument(skip_all, fields(user_id = %current.id))]
pub async fn edit_me(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    JsonBody(payload): JsonBody<AccountRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut user = match state.users.find_by_id(current.id).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!("edit for missing user");
            return Err(ApiError::NotFound(USER_NOT_FOUND));
        }
        Err(e) => return Err(update_failed(e)),
    };

    apply_edit(&mut user, payload).map_err(update_failed)?;

    match state.users.save(&user).await {
        Ok(_) => {
            info!("user updated");
            Ok(Json(MessageResponse {
                message: USER_UPDATED,
            }))
        }
        Err(StoreError::NotFound) => Err(ApiError::NotFound(USER_NOT_FOUND)),
        Err(e) => Err(update_failed(e)),
    }
}

fn apply_edit(user: &mut User, payload: AccountRequest) -> anyhow::Result<()> {
    let name = non_empty(&payload.name)
        .ok_or_else(|| anyhow::anyhow!("name is required"))?
        .to_owned();
    let email = non_empty(&payload.email)
        .ok_or_else(|| anyhow::anyhow!("email is required"))?
        .to_owned();

    if let Some(password) = non_empty(&payload.password) {
        user.password_hash = hash_password(password)?;
    }

    user.name = name;
    user.email = email;
    user.profile = payload.profile;
    Ok(())
}

fn update_failed(e: impl std::fmt::Display) -> ApiError {
    error!(error = %e, "update user failed");
    ApiError::Failed {
        message: UPDATE_FAILED,
        detail: e.to_string(),
    }
}
