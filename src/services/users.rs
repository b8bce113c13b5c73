// src/services/users.rs

use bcrypt::hash;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{AdminUpdateUserPayload, UpdateProfilePayload, User},
};

// Gestão de contas: o próprio perfil e a área administrativa
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
}

impl UserService {
    pub fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        payload: UpdateProfilePayload,
    ) -> Result<User, AppError> {
        payload.validate()?;

        let password_hash = match payload.password {
            Some(password) => Some(
                tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
                    .await
                    .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??,
            ),
            None => None,
        };

        self.user_repo
            .update_profile(
                user_id,
                payload.name.as_deref(),
                payload.email.as_deref(),
                password_hash.as_deref(),
            )
            .await?
            .ok_or(AppError::UserNotFound)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.user_repo.list_all().await
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    pub async fn update_user(
        &self,
        id: Uuid,
        payload: AdminUpdateUserPayload,
    ) -> Result<User, AppError> {
        payload.validate()?;

        let user = self.user_repo
            .update_by_admin(id, payload.name.as_deref(), payload.email.as_deref(), payload.is_admin)
            .await?
            .ok_or(AppError::UserNotFound)?;

        tracing::info!("👤 Usuário {} atualizado por um administrador", user.id);
        Ok(user)
    }

    // Contas de administrador não podem ser removidas por aqui
    pub async fn delete_user(&self, id: Uuid) -> Result<(), AppError> {
        let user = self.get_user(id).await?;
        if user.is_admin {
            return Err(AppError::CannotDeleteAdmin);
        }

        if !self.user_repo.delete(id).await? {
            return Err(AppError::UserNotFound);
        }
        tracing::info!("🗑️ Usuário removido: {}", id);
        Ok(())
    }
}
