//! Services layer - Business logic
//!
//! This module contains the business logic services of the Devsite API.
//! Services are responsible for:
//! - Implementing business rules
//! - Coordinating between repositories and the analytics engine
//! - Handling validation and error cases

pub mod analytics;
pub mod article;
pub mod position;

pub use article::{ArticleService, ArticleServiceError, PendingView};
pub use position::{PositionService, PositionServiceError};
