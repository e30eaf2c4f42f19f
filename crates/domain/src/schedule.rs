use crate::errors::ClusterError;
use chrono::{DateTime, TimeZone, Timelike};
use cron::Schedule;
use std::fmt;
use std::str::FromStr;

/// A cron schedule evaluated at minute granularity.
///
/// Accepts the standard five-field form (minute hour day-of-month month
/// day-of-week) as well as the six/seven-field form with a leading seconds
/// field and an optional trailing year. Five-field expressions are pinned to
/// second zero, which is where the scheduler ticks.
#[derive(Clone)]
pub struct CronSchedule {
    expression: String,
    schedule: Schedule,
}

impl CronSchedule {
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Whether the schedule fires at the minute containing `at`. Seconds and
    /// nanoseconds are truncated before evaluation.
    pub fn matches<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> bool {
        let minute = at
            .clone()
            .with_second(0)
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or_else(|| at.clone());
        self.schedule.includes(minute)
    }
}

impl FromStr for CronSchedule {
    type Err = ClusterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let expression = s.trim().to_string();
        let fields = expression.split_whitespace().count();
        let full = if fields == 5 {
            format!("0 {expression}")
        } else {
            expression.clone()
        };
        let schedule = Schedule::from_str(&full).map_err(|e| ClusterError::InvalidCronExpression {
            expression: expression.clone(),
            reason: e.to_string(),
        })?;
        Ok(CronSchedule {
            expression,
            schedule,
        })
    }
}

impl fmt::Debug for CronSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CronSchedule").field(&self.expression).finish()
    }
}

impl fmt::Display for CronSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression)
    }
}

impl PartialEq for CronSchedule {
    fn eq(&self, other: &Self) -> bool {
        self.expression == other.expression
    }
}

impl Eq for CronSchedule {}
