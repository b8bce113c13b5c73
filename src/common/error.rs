// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso restrito a administradores")]
    NotAdmin,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Livro não encontrado")]
    BookNotFound,

    #[error("Livro já avaliado por este usuário")]
    BookAlreadyReviewed,

    #[error("Administradores não podem ser excluídos")]
    CannotDeleteAdmin,

    // Intervalo de datas impossível de representar no fuso local
    #[error("Data inválida: {0}")]
    InvalidDate(String),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::EmailAlreadyExists => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::NotAdmin => StatusCode::FORBIDDEN,
            AppError::UserNotFound | AppError::BookNotFound => StatusCode::NOT_FOUND,
            AppError::BookAlreadyReviewed | AppError::CannotDeleteAdmin => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors.iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (status, body).into_response();
            }
            AppError::EmailAlreadyExists => "Este e-mail já está em uso.",
            AppError::InvalidCredentials => "E-mail ou senha inválidos.",
            AppError::InvalidToken => "Token de autenticação inválido ou ausente.",
            AppError::NotAdmin => "Acesso restrito a administradores.",
            AppError::UserNotFound => "Usuário não encontrado.",
            AppError::BookNotFound => "Livro não encontrado.",
            AppError::BookAlreadyReviewed => "Você já avaliou este livro.",
            AppError::CannotDeleteAdmin => "Não é possível excluir um administrador.",

            // Todo o resto vira 500. O detalhe fica só no log.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                "Ocorreu um erro inesperado."
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn database_errors_are_hidden_behind_a_500() {
        let response = AppError::DatabaseError(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Ocorreu um erro inesperado.");
    }

    #[tokio::test]
    async fn auth_errors_map_to_401_and_403() {
        assert_eq!(AppError::InvalidToken.into_response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::InvalidCredentials.into_response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::NotAdmin.into_response().status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn catalog_errors_map_to_client_statuses() {
        assert_eq!(AppError::BookNotFound.into_response().status(), StatusCode::NOT_FOUND);

        let response = AppError::BookAlreadyReviewed.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Você já avaliou este livro.");

        assert_eq!(AppError::CannotDeleteAdmin.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn validation_errors_carry_field_details() {
        let mut errors = validator::ValidationErrors::new();
        let mut err = validator::ValidationError::new("length");
        err.message = Some("curta demais".into());
        errors.add("password", err);

        let response = AppError::ValidationError(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["details"]["password"][0], "curta demais");
    }
}
