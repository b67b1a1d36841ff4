//! External service abstractions.
//!
//! Each service is abstracted behind a trait to enable mocking in tests.
//!
//! ## Services
//!
//! - **revalidate** - Cache invalidation signal for rendered front-end paths
//!
//! ## Usage in Handlers
//!
//! Services are accessed via `AppState`:
//!
//! ```ignore
//! async fn handler(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
//!     state.revalidator.revalidate("/questions").await;
//! }
//! ```

mod revalidate;

pub use revalidate::{HttpRevalidator, LogRevalidator, PathRevalidator};

#[cfg(test)]
pub use revalidate::MockPathRevalidator;
