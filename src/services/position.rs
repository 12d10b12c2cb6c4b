//! Position service
//!
//! CRUD, filtering and text search for job positions.

use crate::db::repositories::{PositionRepository, StoreError};
use crate::models::{CreatePositionInput, Position, PositionFilter, UpdatePositionInput};
use std::sync::Arc;

/// Error types for position service operations
#[derive(Debug, thiserror::Error)]
pub enum PositionServiceError {
    /// Position not found
    #[error("Position not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl From<StoreError> for PositionServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey(key) => {
                PositionServiceError::InternalError(anyhow::anyhow!("Duplicate position key: {}", key))
            }
            StoreError::Unavailable(e) => PositionServiceError::InternalError(e),
        }
    }
}

/// Position service for managing job openings
pub struct PositionService {
    repo: Arc<dyn PositionRepository>,
}

impl PositionService {
    /// Create a new position service
    pub fn new(repo: Arc<dyn PositionRepository>) -> Self {
        Self { repo }
    }

    /// Create a new position
    ///
    /// # Errors
    /// - `ValidationError` if a field is empty or there are no requirements
    pub async fn create(&self, input: CreatePositionInput) -> Result<Position, PositionServiceError> {
        validate_text("title", &input.title)?;
        validate_text("department", &input.department)?;
        validate_text("type", &input.job_type)?;
        validate_text("location", &input.location)?;
        validate_text("experience", &input.experience)?;
        validate_text("description", &input.description)?;
        validate_requirements(&input.requirements)?;

        let position = self.repo.insert(&input).await?;

        tracing::info!(id = %position.id, title = %position.title, "Position created");
        Ok(position)
    }

    /// List positions, optionally in one department (`"all"` means every department)
    pub async fn find_all(&self, department: Option<String>) -> Result<Vec<Position>, PositionServiceError> {
        Ok(self.repo.find_many(&PositionFilter::department(department)).await?)
    }

    /// List positions matching every set criterion
    pub async fn find_by_filters(&self, filter: &PositionFilter) -> Result<Vec<Position>, PositionServiceError> {
        Ok(self.repo.find_many(filter).await?)
    }

    /// Case-insensitive search over title and description
    ///
    /// # Errors
    /// - `ValidationError` if the query is blank
    pub async fn search(&self, text: &str) -> Result<Vec<Position>, PositionServiceError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(PositionServiceError::ValidationError(
                "Search query cannot be empty".to_string(),
            ));
        }
        Ok(self.repo.search(text).await?)
    }

    /// Get position by ID
    ///
    /// # Errors
    /// - `NotFound` if no position has the ID
    pub async fn find_one(&self, id: &str) -> Result<Position, PositionServiceError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| PositionServiceError::NotFound(id.to_string()))
    }

    /// Apply a partial update
    ///
    /// # Errors
    /// - `NotFound` if no position has the ID
    /// - `ValidationError` if a supplied field is empty
    pub async fn update(
        &self,
        id: &str,
        input: UpdatePositionInput,
    ) -> Result<Position, PositionServiceError> {
        let texts = [
            ("title", &input.title),
            ("department", &input.department),
            ("type", &input.job_type),
            ("location", &input.location),
            ("experience", &input.experience),
            ("description", &input.description),
        ];
        for (field, value) in texts {
            if let Some(value) = value {
                validate_text(field, value)?;
            }
        }
        if let Some(ref requirements) = input.requirements {
            validate_requirements(requirements)?;
        }

        let position = self
            .repo
            .update_by_id(id, &input)
            .await?
            .ok_or_else(|| PositionServiceError::NotFound(id.to_string()))?;

        tracing::info!(id = %id, "Position updated");
        Ok(position)
    }

    /// Delete a position, returning it
    ///
    /// # Errors
    /// - `NotFound` if no position has the ID
    pub async fn remove(&self, id: &str) -> Result<Position, PositionServiceError> {
        let position = self
            .repo
            .delete_by_id(id)
            .await?
            .ok_or_else(|| PositionServiceError::NotFound(id.to_string()))?;

        tracing::info!(id = %id, "Position removed");
        Ok(position)
    }
}

fn validate_text(field: &str, value: &str) -> Result<(), PositionServiceError> {
    if value.trim().is_empty() {
        return Err(PositionServiceError::ValidationError(format!(
            "Position {} cannot be empty",
            field
        )));
    }
    Ok(())
}

fn validate_requirements(requirements: &[String]) -> Result<(), PositionServiceError> {
    if requirements.is_empty() {
        return Err(PositionServiceError::ValidationError(
            "Position needs at least one requirement".to_string(),
        ));
    }
    if requirements.iter().any(|r| r.trim().is_empty()) {
        return Err(PositionServiceError::ValidationError(
            "Position requirements cannot be empty".to_string(),
        ));
    }
    Ok(())
}
