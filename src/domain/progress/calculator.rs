//! Progress Calculator - Completion scoring for key results, goals and teams.
//!
//! All functions are pure. Stored progress values are never trusted; callers
//! recompute from measurements on every read.

use crate::domain::foundation::{Percentage, Weight};
use crate::domain::goal::{Checkpoint, KeyResult, Measurement, MetricRange, ProjectStage};

/// A control point on the percent interpolation curve.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ControlPoint {
    value: f64,
    percent: f64,
}

/// Calculator for key-result, goal and rollup progress.
pub struct ProgressCalculator;

impl ProgressCalculator {
    /// Sum of the weights of finished stages.
    ///
    /// # Edge Cases
    /// - No stages: 0%
    /// - Weights summing past 100: clamped to 100%
    pub fn project(stages: &[ProjectStage]) -> Percentage {
        let total: u32 = stages
            .iter()
            .filter(|s| s.done)
            .map(|s| u32::from(s.weight.value()))
            .sum();
        Percentage::new(total.min(100) as u8)
    }

    pub fn boolean(done: bool) -> Percentage {
        if done {
            Percentage::HUNDRED
        } else {
            Percentage::ZERO
        }
    }

    /// Position of `current` between start and target, as a percentage.
    ///
    /// Works for descending ranges too: (100 → 0, current 50) is 50%.
    pub fn linear(range: &MetricRange) -> Percentage {
        Percentage::from_f64_clamped(Self::linear_raw(range.start(), range.target(), range.current()))
    }

    /// Piecewise-linear progress through checkpoints.
    ///
    /// Control points are (start, 0%), each checkpoint, and (target, 100%),
    /// ordered by metric value.
    ///
    /// # Edge Cases
    /// - No checkpoints: same as [`linear`](Self::linear)
    /// - `current` at or below the lowest control point: 0%
    /// - `current` at or above the highest control point: 100%
    /// - Two control points sharing a metric value: the left one's percent
    pub fn percent(range: &MetricRange, checkpoints: &[Checkpoint]) -> Percentage {
        if checkpoints.is_empty() {
            return Self::linear(range);
        }

        let mut points = Vec::with_capacity(checkpoints.len() + 2);
        points.push(ControlPoint {
            value: range.start(),
            percent: 0.0,
        });
        points.extend(checkpoints.iter().map(|cp| ControlPoint {
            value: cp.metric_value,
            percent: f64::from(cp.percent.value()),
        }));
        points.push(ControlPoint {
            value: range.target(),
            percent: 100.0,
        });
        points.sort_by(|a, b| a.value.total_cmp(&b.value));

        let current = range.current();
        let (first, last) = match (points.first(), points.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Percentage::ZERO,
        };
        if current <= first.value {
            return Percentage::ZERO;
        }
        if current >= last.value {
            return Percentage::HUNDRED;
        }

        points
            .windows(2)
            .find(|pair| current >= pair[0].value && current <= pair[1].value)
            .map(|pair| Percentage::from_f64_clamped(Self::interpolate(pair[0], pair[1], current)))
            .unwrap_or(Percentage::ZERO)
    }

    /// Progress of one key result, dispatched on its measurement.
    pub fn measurement(measurement: &Measurement) -> Percentage {
        match measurement {
            Measurement::Project { stages } => Self::project(stages),
            Measurement::Percent { range, checkpoints } => Self::percent(range, checkpoints),
            Measurement::Linear { range } => Self::linear(range),
            Measurement::Boolean { done } => Self::boolean(*done),
        }
    }

    pub fn key_result(key_result: &KeyResult) -> Percentage {
        Self::measurement(&key_result.measurement)
    }

    /// Weighted average of freshly computed key-result progress.
    pub fn goal(key_results: &[KeyResult]) -> Percentage {
        Self::weighted_average(
            key_results
                .iter()
                .map(|kr| (Self::key_result(kr), kr.weight)),
        )
    }

    /// Weighted average of (progress, effective weight) pairs, as used for a
    /// team's period progress over its owned and shared-in goals.
    pub fn rollup(items: &[(Percentage, Weight)]) -> Percentage {
        Self::weighted_average(items.iter().copied())
    }

    /// `round(Σ(progress × weight) / Σweight)`, rounding half away from zero.
    ///
    /// # Edge Cases
    /// - Empty input: 0%
    /// - All weights zero: 0%
    pub fn weighted_average<I>(pairs: I) -> Percentage
    where
        I: IntoIterator<Item = (Percentage, Weight)>,
    {
        let (weighted, total) = pairs
            .into_iter()
            .fold((0u64, 0u64), |(weighted, total), (progress, weight)| {
                let w = u64::from(weight.value());
                (weighted + u64::from(progress.value()) * w, total + w)
            });
        if total == 0 {
            return Percentage::ZERO;
        }
        Percentage::from_f64_clamped(weighted as f64 / total as f64)
    }

    fn linear_raw(start: f64, target: f64, current: f64) -> f64 {
        if start == target {
            return 0.0;
        }
        (current - start) / (target - start) * 100.0
    }

    fn interpolate(left: ControlPoint, right: ControlPoint, current: f64) -> f64 {
        if right.value == left.value {
            return left.percent;
        }
        let position = (current - left.value) / (right.value - left.value);
        left.percent + position * (right.percent - left.percent)
    }
}
