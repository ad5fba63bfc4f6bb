//! Authentication and user management service

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{
        LoginResponse, NewUser, RegisterUser, Role, SessionClaims, UpdateUser, User, UserInfo,
    },
    repository::UserStore,
    services::password,
};

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    config: AuthConfig,
}

fn user_not_found() -> AppError {
    AppError::NotFound("Usuario no encontrado".to_string())
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, config: AuthConfig) -> Self {
        Self { users, config }
    }

    /// Register a new user with the default role
    pub async fn register(&self, mut request: RegisterUser) -> AppResult<User> {
        let password = request
            .password
            .clone()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AppError::Validation("Contraseña es requerida".to_string()))?;

        let name = request
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| AppError::Validation("El nombre es requerido".to_string()))?
            .to_string();

        let email = request
            .email
            .as_deref()
            .map(normalize_email)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| AppError::Validation("El email es requerido".to_string()))?;

        // Format checks apply to the stored form
        request.name = Some(name.clone());
        request.email = Some(email.clone());
        request.validate()?;

        let password_hash = password::hash_password(password).await?;

        let user = self
            .users
            .users_create(NewUser {
                name,
                email,
                password_hash,
                role: Role::default(),
            })
            .await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Check credentials and issue a session token
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginResponse> {
        let user = self
            .users
            .users_get_by_email(&normalize_email(email))
            .await?
            .ok_or_else(user_not_found)?;

        let valid =
            password::verify_password(password.to_string(), user.password_hash.clone()).await?;
        if !valid {
            tracing::warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(AppError::InvalidCredentials("Contraseña incorrecta".to_string()));
        }

        let token = self.create_token_for_user(&user)?;
        tracing::info!(user_id = %user.id, "User logged in");

        Ok(LoginResponse {
            token,
            user: UserInfo::from(&user),
        })
    }

    /// Create JWT token for a user
    fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = SessionClaims {
            sub: user.id,
            email: user.email.clone(),
            rol: user.role,
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Verify signature and expiry of a bearer token
    pub fn verify_token(&self, token: &str) -> AppResult<SessionClaims> {
        SessionClaims::from_token(token, &self.config.jwt_secret).map_err(|e| {
            let reason = match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => "Token expirado",
                _ => "Token no válido",
            };
            AppError::Unauthorized(reason.to_string())
        })
    }

    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.users.users_list().await
    }

    pub async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.users
            .users_get_by_id(id)
            .await?
            .ok_or_else(user_not_found)
    }

    /// Apply the provided fields; absent ones stay as they are
    pub async fn update_user(&self, id: Uuid, update: UpdateUser) -> AppResult<User> {
        let update = update.normalized();
        let mut user = self.get_user(id).await?;

        let role = match update.role.as_deref() {
            Some(raw) => Some(
                raw.parse::<Role>()
                    .map_err(|_| AppError::Validation("Rol no válido".to_string()))?,
            ),
            None => None,
        };
        update.validate()?;

        if let Some(name) = update.name {
            user.name = name.trim().to_string();
        }
        if let Some(email) = update.email {
            user.email = normalize_email(&email);
        }
        if let Some(new_password) = update.password {
            user.password_hash = password::hash_password(new_password).await?;
        }
        if let Some(role) = role {
            user.role = role;
        }

        let saved = self.users.users_save(user).await?.ok_or_else(user_not_found)?;
        tracing::info!(user_id = %saved.id, "User updated");
        Ok(saved)
    }

    pub async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        if !self.users.users_delete(id).await? {
            return Err(user_not_found());
        }
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }

    /// Create the configured admin account if it does not exist yet
    pub async fn ensure_admin(&self, email: &str, password: &str) -> AppResult<Option<User>> {
        let email = normalize_email(email);
        if self.users.users_get_by_email(&email).await?.is_some() {
            return Ok(None);
        }

        let password_hash = password::hash_password(password.to_string()).await?;
        let admin = self
            .users
            .users_create(NewUser {
                name: "Administrador".to_string(),
                email,
                password_hash,
                role: Role::Admin,
            })
            .await?;

        tracing::info!(user_id = %admin.id, "Bootstrap admin created");
        Ok(Some(admin))
    }
}
