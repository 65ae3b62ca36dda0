//! Edit form state and validation.

use chrono::{DateTime, NaiveDate, Utc};

use super::service::TaskService;
use crate::domain::{
    Priority, Task, TaskError, ValidationError, normalize_description, validate_title,
};

/// Date format of the due-date input.
pub const DUE_DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

/// Parse a `yyyy-mm-dd` due date as midnight UTC of that day.
pub fn parse_due_date(input: &str) -> Result<DateTime<Utc>, ValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ValidationError::MissingDueDate);
    }
    NaiveDate::parse_from_str(input, DUE_DATE_INPUT_FORMAT)
        .map(|d| d.and_time(chrono::NaiveTime::MIN).and_utc())
        .map_err(|_| ValidationError::InvalidDueDate(input.to_string()))
}

/// Raw values as typed into the edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditFields {
    pub title: String,
    /// Empty means no description.
    pub description: String,
    pub priority: Priority,
    /// `yyyy-mm-dd`.
    pub due_date: String,
}

/// Edit form values after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedEdit {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub due_date: DateTime<Utc>,
}

impl EditFields {
    /// Form pre-filled with the task's current values.
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            priority: task.priority,
            due_date: task.due_date.format(DUE_DATE_INPUT_FORMAT).to_string(),
        }
    }

    pub fn validate(&self) -> Result<ValidatedEdit, ValidationError> {
        validate_title(&self.title)?;
        let due_date = parse_due_date(&self.due_date)?;
        Ok(ValidatedEdit {
            title: self.title.clone(),
            description: normalize_description(Some(self.description.clone())),
            priority: self.priority,
            due_date,
        })
    }
}

/// One open edit form.
///
/// Submitting is disabled while a save is in flight. A failed save leaves the
/// form open with the entered values untouched so the user can retry.
#[derive(Debug)]
pub struct EditSession {
    task: Task,
    fields: EditFields,
    submitting: bool,
    open: bool,
}

impl EditSession {
    pub fn open(task: Task) -> Self {
        let fields = EditFields::from_task(&task);
        Self {
            task,
            fields,
            submitting: false,
            open: true,
        }
    }

    pub fn fields(&self) -> &EditFields {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut EditFields {
        &mut self.fields
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn can_submit(&self) -> bool {
        self.open && !self.submitting
    }

    /// Dismiss the form without saving.
    pub fn close(&mut self) {
        self.open = false;
    }

    /// The task's change history, oldest first, one line per entry.
    pub fn history_lines(&self) -> Vec<String> {
        self.task.history.iter().map(ToString::to_string).collect()
    }

    /// Save the form. Closes the session on success.
    ///
    /// # Cancel Safety
    /// The in-flight flag is cleared by a guard, so dropping the returned
    /// future mid-save leaves the session open and submittable.
    pub async fn submit(&mut self, service: &TaskService) -> Result<(), TaskError> {
        if !self.open {
            return Err(TaskError::EditClosed(self.task.id));
        }
        if self.submitting {
            return Err(TaskError::EditInProgress(self.task.id));
        }
        let result = {
            let _in_flight = InFlight::begin(&mut self.submitting);
            service.edit_task(&self.task, &self.fields).await
        };
        if result.is_ok() {
            self.open = false;
        }
        result
    }
}

/// Holds the session's `submitting` flag up until dropped.
struct InFlight<'a>(&'a mut bool);

impl<'a> InFlight<'a> {
    fn begin(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}
