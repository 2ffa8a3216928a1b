//! Team reader port.
//!
//! Teams are maintained outside the engine; it only reads them.

use crate::domain::foundation::{DomainError, TeamId};
use crate::domain::team::Team;
use async_trait::async_trait;

/// Read access to the flat team list.
#[async_trait]
pub trait TeamReader: Send + Sync {
    /// All teams, in no particular order. The hierarchy is rebuilt by the
    /// caller.
    async fn list_all(&self) -> Result<Vec<Team>, DomainError>;

    /// Find a team by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: TeamId) -> Result<Option<Team>, DomainError>;
}
