//! Client-side form validation.
//!
//! Invalid input never reaches the API layer; a valid form yields the
//! typed request body.

use crate::domain::{NewHousehold, NewTask, RecurrenceUnit};

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

/// Raw input of the create-household form.
#[derive(Debug, Clone, Default)]
pub struct HouseholdForm {
    pub name: String,
}

impl HouseholdForm {
    /// Validates the form and produces the request body.
    ///
    /// # Errors
    /// Returns every failing field with its message.
    pub fn validate(&self) -> Result<NewHousehold, Vec<FieldError>> {
        if self.name.is_empty() {
            return Err(vec![FieldError::new("name", "Name is required")]);
        }
        Ok(NewHousehold {
            name: self.name.clone(),
        })
    }
}

/// Raw input of the create-task form. The interval arrives as free text.
#[derive(Debug, Clone)]
pub struct TaskForm {
    pub title: String,
    pub recurrence_unit: RecurrenceUnit,
    pub recurrence_interval: String,
}

impl TaskForm {
    /// Validates the form and produces the request body.
    ///
    /// # Errors
    /// Returns every failing field with its message.
    pub fn validate(&self) -> Result<NewTask, Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.title.is_empty() {
            errors.push(FieldError::new("title", "Name is required"));
        }

        let interval = match self.recurrence_interval.trim().parse::<u16>() {
            Ok(value) if value >= 1 => Some(value),
            Ok(_) => {
                errors.push(FieldError::new(
                    "recurrenceInterval",
                    "Invalid interval - Must be at least 1",
                ));
                None
            }
            Err(_) => {
                errors.push(FieldError::new(
                    "recurrenceInterval",
                    "Invalid interval - Must be numeric",
                ));
                None
            }
        };

        match interval {
            Some(recurrence_interval) if errors.is_empty() => Ok(NewTask {
                title: self.title.clone(),
                recurrence_unit: self.recurrence_unit,
                recurrence_interval,
            }),
            _ => Err(errors),
        }
    }
}
