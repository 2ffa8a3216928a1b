//! Team hierarchy built from the flat team list.
//!
//! The organization tree is never persisted as such. Each request loads every
//! team, indexes children by parent id and walks the result depth-first.
//! Siblings (and roots) are ordered by name, ties broken by id, so the output
//! is deterministic.
//!
//! # Cycle Guard
//!
//! Parent pointers are not validated on write, so a team can end up (directly
//! or transitively) parented to itself. A walk that revisits a team, or a full
//! walk that cannot reach every team from a root, fails with
//! `ErrorCode::HierarchyCycle`. No partial output is produced.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::Team;
use crate::domain::foundation::{DomainError, ErrorCode, TeamId};

// ════════════════════════════════════════════════════════════════════════════════
// Walk Output
// ════════════════════════════════════════════════════════════════════════════════

/// One team in pre-order, with its depth below the walk's starting point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyEntry<'a> {
    pub team: &'a Team,
    pub depth: usize,
}

/// A team and its subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamNode {
    pub team: Team,
    pub children: Vec<TeamNode>,
}

impl TeamNode {
    /// Number of teams in this subtree, including this one.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(TeamNode::size).sum::<usize>()
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Hierarchy
// ════════════════════════════════════════════════════════════════════════════════

/// Adjacency view over a flat list of teams.
#[derive(Debug, Clone)]
pub struct TeamHierarchy {
    teams: HashMap<TeamId, Team>,
    children: HashMap<TeamId, Vec<TeamId>>,
    roots: Vec<TeamId>,
}

impl TeamHierarchy {
    /// Indexes teams by parent.
    ///
    /// A team whose parent id does not match any listed team is treated as a
    /// root so it stays visible.
    pub fn build(teams: Vec<Team>) -> Self {
        let teams: HashMap<TeamId, Team> = teams.into_iter().map(|t| (t.id, t)).collect();

        let mut children: HashMap<TeamId, Vec<TeamId>> = HashMap::new();
        let mut roots = Vec::new();
        for team in teams.values() {
            match team.parent_id {
                Some(parent) if teams.contains_key(&parent) => {
                    children.entry(parent).or_default().push(team.id)
                }
                _ => roots.push(team.id),
            }
        }

        let by_name = |a: &TeamId, b: &TeamId| {
            let (ta, tb) = (&teams[a], &teams[b]);
            ta.name.cmp(&tb.name).then(ta.id.cmp(&tb.id))
        };
        roots.sort_by(by_name);
        for siblings in children.values_mut() {
            siblings.sort_by(by_name);
        }

        Self {
            teams,
            children,
            roots,
        }
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn get(&self, id: TeamId) -> Option<&Team> {
        self.teams.get(&id)
    }

    /// Root teams, name-ordered.
    pub fn roots(&self) -> impl Iterator<Item = &Team> {
        self.roots.iter().map(move |id| &self.teams[id])
    }

    /// Direct children of a team, name-ordered.
    pub fn children_of(&self, id: TeamId) -> impl Iterator<Item = &Team> {
        self.children
            .get(&id)
            .into_iter()
            .flatten()
            .map(move |child| &self.teams[child])
    }

    /// Depth-first pre-order walk.
    ///
    /// With `root` set, only that team's subtree is walked and depths start at
    /// zero on it. Without it, every root is walked in name order and every
    /// team must be reached.
    ///
    /// # Errors
    ///
    /// - `TeamNotFound` if `root` names an unknown team
    /// - `HierarchyCycle` if a team is reached twice or (full walk) never
    pub fn walk(&self, root: Option<TeamId>) -> Result<Vec<HierarchyEntry<'_>>, DomainError> {
        let starts = self.starting_points(root)?;

        let mut visited = HashSet::with_capacity(self.teams.len());
        let mut out = Vec::with_capacity(self.teams.len());
        // Explicit stack; children pushed in reverse so the lowest name pops first.
        let mut stack: Vec<(TeamId, usize)> = starts.iter().rev().map(|id| (*id, 0)).collect();

        while let Some((id, depth)) = stack.pop() {
            if !visited.insert(id) {
                return Err(cycle_error(id));
            }
            out.push(HierarchyEntry {
                team: &self.teams[&id],
                depth,
            });
            if let Some(kids) = self.children.get(&id) {
                stack.extend(kids.iter().rev().map(|kid| (*kid, depth + 1)));
            }
        }

        if root.is_none() && visited.len() != self.teams.len() {
            let stranded = self
                .teams
                .keys()
                .filter(|id| !visited.contains(*id))
                .min()
                .copied();
            if let Some(id) = stranded {
                return Err(cycle_error(id));
            }
        }

        Ok(out)
    }

    /// Nested tree view with the same ordering and guard as [`walk`](Self::walk).
    pub fn tree(&self, root: Option<TeamId>) -> Result<Vec<TeamNode>, DomainError> {
        let entries = self.walk(root)?;

        // Rebuild nesting from pre-order + depth.
        let mut finished: Vec<TeamNode> = Vec::new();
        let mut open: Vec<TeamNode> = Vec::new();
        for entry in entries {
            while open.len() > entry.depth {
                close_top(&mut open, &mut finished);
            }
            open.push(TeamNode {
                team: entry.team.clone(),
                children: Vec::new(),
            });
        }
        while !open.is_empty() {
            close_top(&mut open, &mut finished);
        }
        Ok(finished)
    }

    fn starting_points(&self, root: Option<TeamId>) -> Result<Vec<TeamId>, DomainError> {
        match root {
            Some(id) if self.teams.contains_key(&id) => Ok(vec![id]),
            Some(id) => Err(DomainError::new(
                ErrorCode::TeamNotFound,
                format!("Team {} not found", id),
            )
            .with_detail("team_id", id.to_string())),
            None => Ok(self.roots.clone()),
        }
    }
}

fn close_top(open: &mut Vec<TeamNode>, finished: &mut Vec<TeamNode>) {
    if let Some(node) = open.pop() {
        match open.last_mut() {
            Some(parent) => parent.children.push(node),
            None => finished.push(node),
        }
    }
}

fn cycle_error(id: TeamId) -> DomainError {
    DomainError::new(
        ErrorCode::HierarchyCycle,
        format!("Team {} is part of a parent cycle", id),
    )
    .with_detail("team_id", id.to_string())
}
