//! GetHierarchyHandler - Query handler for the nested team tree.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, TeamId};
use crate::domain::team::{TeamHierarchy, TeamNode};
use crate::ports::TeamReader;

/// Query for the team tree, optionally rooted at one team.
#[derive(Debug, Clone, Default)]
pub struct GetHierarchyQuery {
    pub root: Option<TeamId>,
}

/// Handler for the team tree.
pub struct GetHierarchyHandler {
    teams: Arc<dyn TeamReader>,
}

impl GetHierarchyHandler {
    pub fn new(teams: Arc<dyn TeamReader>) -> Self {
        Self { teams }
    }

    pub async fn handle(&self, query: GetHierarchyQuery) -> Result<Vec<TeamNode>, DomainError> {
        let hierarchy = TeamHierarchy::build(self.teams.list_all().await?);
        hierarchy.tree(query.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::Fixture;
    use crate::domain::foundation::ErrorCode;

    #[tokio::test]
    async fn tree_nests_children_sorted_by_name() {
        let fx = Fixture::new().await;
        let handler = GetHierarchyHandler::new(fx.store.clone());

        let tree = handler.handle(GetHierarchyQuery::default()).await.unwrap();

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].team.id, fx.cluster.id);
        let children: Vec<&str> = tree[0].children.iter().map(|n| n.team.name.as_str()).collect();
        assert_eq!(children, vec!["Alpha", "Beta"]);
    }

    #[tokio::test]
    async fn cycle_is_reported() {
        let fx = Fixture::new().await;
        fx.store.set_team_parent(fx.cluster.id, Some(fx.alpha.id));
        let handler = GetHierarchyHandler::new(fx.store.clone());

        let err = handler.handle(GetHierarchyQuery::default()).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::HierarchyCycle);
    }
}
