//! Request body validation. Every failing field is collected before the
//! request is rejected.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::dates::parse_timestamp;
use crate::errors::{AppError, FieldError};
use crate::models::{GoalType, NewUser, NewWalk, UserPatch, WalkPatch};

/// Upper bound for `steps` and `duration` on a single walk.
pub const MAX_COUNT: u64 = 10_000_000;

#[derive(Default)]
struct Checker {
    errors: Vec<FieldError>,
    bad_date: Option<(&'static str, String)>,
}

impl Checker {
    fn fail(&mut self, field: &str, message: &str) {
        self.errors.push(FieldError::new(field, message));
    }

    fn required<'a>(&mut self, body: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
        match body.get(field) {
            None | Some(Value::Null) => {
                self.fail(field, "is required");
                None
            }
            Some(value) => Some(value),
        }
    }

    fn name(&mut self, field: &str, value: &Value) -> Option<String> {
        match value.as_str().map(str::trim) {
            Some("") => {
                self.fail(field, "must not be empty");
                None
            }
            Some(name) => Some(name.to_string()),
            None => {
                self.fail(field, "must be a string");
                None
            }
        }
    }

    fn goal_type(&mut self, field: &str, value: &Value) -> Option<GoalType> {
        let parsed = value.as_str().and_then(GoalType::parse);
        if parsed.is_none() {
            self.fail(field, "must be 'steps' or 'distance'");
        }
        parsed
    }

    fn positive(&mut self, field: &str, value: &Value) -> Option<f64> {
        match value.as_f64() {
            Some(number) if number > 0.0 && number.is_finite() => Some(number),
            Some(_) => {
                self.fail(field, "must be greater than zero");
                None
            }
            None => {
                self.fail(field, "must be a number");
                None
            }
        }
    }

    fn non_negative(&mut self, field: &str, value: &Value) -> Option<f64> {
        match value.as_f64() {
            Some(number) if number >= 0.0 && number.is_finite() => Some(number),
            Some(_) => {
                self.fail(field, "must not be negative");
                None
            }
            None => {
                self.fail(field, "must be a number");
                None
            }
        }
    }

    fn count(&mut self, field: &str, value: &Value) -> Option<u64> {
        let parsed = match value.as_u64() {
            Some(count) => Some(count),
            None => match value.as_f64() {
                Some(number) if number < 0.0 => {
                    self.fail(field, "must not be negative");
                    None
                }
                Some(number) if number.fract() == 0.0 && number <= MAX_COUNT as f64 => {
                    Some(number as u64)
                }
                Some(number) if number.fract() == 0.0 => Some(u64::MAX),
                Some(_) => {
                    self.fail(field, "must be an integer");
                    None
                }
                None => {
                    self.fail(field, "must be a number");
                    None
                }
            },
        };
        match parsed {
            Some(count) if count > MAX_COUNT => {
                self.fail(field, &format!("must be at most {MAX_COUNT}"));
                None
            }
            other => other,
        }
    }

    fn user_id(&mut self, field: &str, value: &Value) -> Option<Uuid> {
        let parsed = value.as_str().and_then(|raw| Uuid::parse_str(raw.trim()).ok());
        if parsed.is_none() {
            self.fail(field, "must be a valid id");
        }
        parsed
    }

    fn date(&mut self, field: &'static str, value: &Value) -> Option<DateTime<Utc>> {
        let Some(raw) = value.as_str() else {
            self.fail(field, "must be a date string");
            return None;
        };
        let parsed = parse_timestamp(raw);
        if parsed.is_none() {
            self.bad_date = Some((field, raw.to_string()));
        }
        parsed
    }

    /// Field errors win over a lone bad date, which is then listed with them.
    fn finish(mut self) -> Result<(), AppError> {
        match self.bad_date.take() {
            Some((field, raw)) if self.errors.is_empty() => {
                Err(AppError::invalid_date(field, &raw))
            }
            Some((field, _)) => {
                self.fail(field, "is not a valid date");
                Err(AppError::validation(self.errors))
            }
            None if self.errors.is_empty() => Ok(()),
            None => Err(AppError::validation(self.errors)),
        }
    }
}

fn as_object(body: &Value) -> Result<&Map<String, Value>, AppError> {
    body.as_object()
        .ok_or_else(|| AppError::bad_request("request body must be a JSON object"))
}

/// Present, non-null value of an optional field.
fn optional<'a>(body: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    body.get(field).filter(|value| !value.is_null())
}

pub fn parse_new_user(body: &Value) -> Result<NewUser, AppError> {
    let body = as_object(body)?;
    let mut check = Checker::default();

    let name = check
        .required(body, "name")
        .and_then(|value| check.name("name", value));
    let goal_type = check
        .required(body, "goalType")
        .and_then(|value| check.goal_type("goalType", value));
    let goal_value = check
        .required(body, "goalValue")
        .and_then(|value| check.positive("goalValue", value));

    check.finish()?;
    match (name, goal_type, goal_value) {
        (Some(name), Some(goal_type), Some(goal_value)) => Ok(NewUser {
            name,
            goal_type,
            goal_value,
        }),
        _ => Err(AppError::bad_request("invalid user")),
    }
}

pub fn parse_user_patch(body: &Value) -> Result<UserPatch, AppError> {
    let body = as_object(body)?;
    let mut check = Checker::default();

    let patch = UserPatch {
        name: optional(body, "name").and_then(|value| check.name("name", value)),
        goal_type: optional(body, "goalType").and_then(|value| check.goal_type("goalType", value)),
        goal_value: optional(body, "goalValue")
            .and_then(|value| check.positive("goalValue", value)),
    };

    check.finish()?;
    Ok(patch)
}

/// `date` defaults to `now` when omitted.
pub fn parse_new_walk(body: &Value, now: DateTime<Utc>) -> Result<NewWalk, AppError> {
    let body = as_object(body)?;
    let mut check = Checker::default();

    let user_id = check
        .required(body, "userId")
        .and_then(|value| check.user_id("userId", value));
    let steps = check
        .required(body, "steps")
        .and_then(|value| check.count("steps", value));
    let distance = check
        .required(body, "distance")
        .and_then(|value| check.non_negative("distance", value));
    let duration = check
        .required(body, "duration")
        .and_then(|value| check.count("duration", value));
    let date = match optional(body, "date") {
        Some(value) => check.date("date", value),
        None => Some(now),
    };

    check.finish()?;
    match (user_id, steps, distance, duration, date) {
        (Some(user_id), Some(steps), Some(distance), Some(duration), Some(date)) => Ok(NewWalk {
            user_id,
            steps,
            distance,
            duration,
            date,
        }),
        _ => Err(AppError::bad_request("invalid walk")),
    }
}

/// `current_user_id` is the walk's owner; a body naming another owner is rejected.
pub fn parse_walk_patch(body: &Value, current_user_id: Uuid) -> Result<WalkPatch, AppError> {
    let body = as_object(body)?;
    let mut check = Checker::default();

    if let Some(value) = optional(body, "userId") {
        if check.user_id("userId", value).is_some_and(|id| id != current_user_id) {
            check.fail("userId", "cannot be changed");
        }
    }

    let patch = WalkPatch {
        steps: optional(body, "steps").and_then(|value| check.count("steps", value)),
        distance: optional(body, "distance")
            .and_then(|value| check.non_negative("distance", value)),
        duration: optional(body, "duration").and_then(|value| check.count("duration", value)),
        date: optional(body, "date").and_then(|value| check.date("date", value)),
    };

    check.finish()?;
    Ok(patch)
}
