//! Reporting period.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{PeriodId, ValidationError};

/// A named reporting window (usually a quarter) with its own sibling order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub id: PeriodId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub sort_order: i32,
}

impl Period {
    /// Validates name and date range.
    pub fn new(
        id: PeriodId,
        name: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        sort_order: i32,
    ) -> Result<Self, ValidationError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        if end_date < start_date {
            return Err(ValidationError::invalid_format(
                "end_date",
                "end date must not precede start date",
            ));
        }
        Ok(Self {
            id,
            name,
            start_date,
            end_date,
            sort_order,
        })
    }

    /// True when `date` falls inside the period, both ends inclusive.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}
