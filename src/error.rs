use crate::db::dao::DaoLayerError;

pub const INTERNAL_ERROR: &str = "Internal server error";

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    /// A time-boxed credential outlived its window.
    Expired(String),
    Conflict(String),
    Internal(String),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn expired(message: impl Into<String>) -> Self {
        Self::Expired(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(message)
            | Self::Unauthorized(message)
            | Self::Forbidden(message)
            | Self::NotFound(message)
            | Self::Expired(message)
            | Self::Conflict(message)
            | Self::Internal(message) => message.as_str(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for AppError {}

impl From<DaoLayerError> for AppError {
    fn from(err: DaoLayerError) -> Self {
        match err {
            DaoLayerError::NotFound { entity, .. } => {
                AppError::not_found(format!("{entity} not found"))
            }
            DaoLayerError::InvalidPagination { .. } => AppError::bad_request(err.to_string()),
            DaoLayerError::Db(_) => {
                tracing::error!(error = %err, "database error");
                AppError::internal(INTERNAL_ERROR)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::DbErr;
    use uuid::Uuid;

    use crate::db::dao::DaoLayerError;

    use super::{AppError, INTERNAL_ERROR};

    #[test]
    fn dao_errors_map_to_matching_variants() {
        let not_found = AppError::from(DaoLayerError::NotFound {
            entity: "Test",
            id: Uuid::new_v4(),
        });
        assert!(matches!(not_found, AppError::NotFound(_)));
        assert_eq!(not_found.message(), "Test not found");

        let pagination = AppError::from(DaoLayerError::InvalidPagination {
            page: 0,
            page_size: 10,
        });
        assert!(matches!(pagination, AppError::BadRequest(_)));

        let db = AppError::from(DaoLayerError::Db(DbErr::Custom(
            "relation \"users\" does not exist".to_string(),
        )));
        assert!(matches!(db, AppError::Internal(_)));
        assert_eq!(db.message(), INTERNAL_ERROR);
    }
}
