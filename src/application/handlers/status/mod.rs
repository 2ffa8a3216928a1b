//! Team period status handlers.

mod set_team_period_status;

pub use set_team_period_status::{
    SetTeamPeriodStatusCommand, SetTeamPeriodStatusHandler, SetTeamPeriodStatusResult,
};
