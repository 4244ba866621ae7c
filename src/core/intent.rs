//! What the user asked for in a single round-up run.

use chrono::NaiveDate;
use thiserror::Error;

pub const MIN_GOAL_NAME_LENGTH: usize = 3;
pub const MAX_GOAL_NAME_LENGTH: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Savings goal name cannot be empty")]
    EmptyGoalName,

    #[error("Savings goal name must be at least {min} characters")]
    GoalNameTooShort { min: usize },

    #[error("Savings goal name cannot exceed {max} characters")]
    GoalNameTooLong { max: usize },

    #[error("Invalid date '{0}'. Please use yyyy-mm-dd format")]
    InvalidDate(String),

    #[error("Date {start} cannot be in the future (today is {today})")]
    FutureStartDate { start: NaiveDate, today: NaiveDate },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalDisposition {
    NewGoal(String),
    ExistingGoal(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIntent {
    start_date: NaiveDate,
    disposition: GoalDisposition,
}

impl UserIntent {
    pub fn new(
        start_date: NaiveDate,
        disposition: GoalDisposition,
        today: NaiveDate,
    ) -> Result<Self, ValidationError> {
        let start_date = validate_start_date(start_date, today)?;
        let disposition = match disposition {
            GoalDisposition::NewGoal(name) => GoalDisposition::NewGoal(validate_goal_name(&name)?),
            GoalDisposition::ExistingGoal(name) => {
                GoalDisposition::ExistingGoal(validate_goal_name(&name)?)
            }
        };

        Ok(Self {
            start_date,
            disposition,
        })
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn disposition(&self) -> &GoalDisposition {
        &self.disposition
    }
}

/// Trims a goal name and checks its length in characters.
pub fn validate_goal_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    let length = trimmed.chars().count();

    if length == 0 {
        return Err(ValidationError::EmptyGoalName);
    }
    if length < MIN_GOAL_NAME_LENGTH {
        return Err(ValidationError::GoalNameTooShort {
            min: MIN_GOAL_NAME_LENGTH,
        });
    }
    if length > MAX_GOAL_NAME_LENGTH {
        return Err(ValidationError::GoalNameTooLong {
            max: MAX_GOAL_NAME_LENGTH,
        });
    }
    Ok(trimmed.to_string())
}

pub fn validate_start_date(
    start: NaiveDate,
    today: NaiveDate,
) -> Result<NaiveDate, ValidationError> {
    if start > today {
        return Err(ValidationError::FutureStartDate { start, today });
    }
    Ok(start)
}

/// Parses a `yyyy-mm-dd` start date that is not after `today`.
pub fn parse_start_date(input: &str, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
    let input = input.trim();
    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(input.to_string()))?;
    validate_start_date(date, today)
}
