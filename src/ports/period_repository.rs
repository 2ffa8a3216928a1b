//! Period repository port.

use crate::domain::foundation::{DomainError, PeriodId};
use crate::domain::period::Period;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Repository port for reporting periods.
#[async_trait]
pub trait PeriodRepository: Send + Sync {
    /// Create a period appended after every existing one.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` for a blank name or inverted range
    /// - `DatabaseError` on persistence failure
    async fn create(
        &self,
        name: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Period, DomainError>;

    /// All periods ordered by sort order, then id.
    async fn list_all(&self) -> Result<Vec<Period>, DomainError>;

    /// Find a period by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: PeriodId) -> Result<Option<Period>, DomainError>;

    /// The period covering `date`.
    ///
    /// When several cover it, the one sorted last wins (ties: latest end date).
    async fn find_for_date(&self, date: NaiveDate) -> Result<Option<Period>, DomainError>;
}
