//! Sort configuration and comparators.
//!
//! Two named comparators are composed by [`SortConfig::compare`]:
//! - [`by_priority`] always puts the most urgent first. `direction` does not apply.
//! - [`by_due_date`] is ascending. `direction` only flips it when dueDate is the
//!   primary key; as a secondary key it is always ascending.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::domain::Task;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseSortError {
    #[error("unknown sort key {0:?} (expected priority or dueDate)")]
    Key(String),

    #[error("unknown direction {0:?} (expected asc or desc)")]
    Direction(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Priority,
    DueDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    pub primary: SortKey,
    /// Tie-breaker. Callers keep it different from `primary`.
    #[serde(default)]
    pub secondary: Option<SortKey>,
    #[serde(default)]
    pub direction: SortDirection,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            primary: SortKey::DueDate,
            secondary: None,
            direction: SortDirection::Asc,
        }
    }
}

/// High before Medium before Low.
pub fn by_priority(a: &Task, b: &Task) -> Ordering {
    b.priority.cmp(&a.priority)
}

/// Earlier due date first.
pub fn by_due_date(a: &Task, b: &Task) -> Ordering {
    a.due_date.cmp(&b.due_date)
}

impl SortConfig {
    pub fn new(primary: SortKey) -> Self {
        Self {
            primary,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn then_by(mut self, secondary: SortKey) -> Self {
        self.secondary = Some(secondary);
        self
    }

    #[must_use]
    pub fn direction(mut self, direction: SortDirection) -> Self {
        self.direction = direction;
        self
    }

    fn primary_order(&self, a: &Task, b: &Task) -> Ordering {
        match self.primary {
            SortKey::Priority => by_priority(a, b),
            SortKey::DueDate => match self.direction {
                SortDirection::Asc => by_due_date(a, b),
                SortDirection::Desc => by_due_date(a, b).reverse(),
            },
        }
    }

    fn secondary_order(&self, a: &Task, b: &Task) -> Ordering {
        match self.secondary {
            Some(SortKey::Priority) => by_priority(a, b),
            Some(SortKey::DueDate) => by_due_date(a, b),
            None => Ordering::Equal,
        }
    }

    /// Primary comparison, falling back to the secondary key on ties.
    pub fn compare(&self, a: &Task, b: &Task) -> Ordering {
        self.primary_order(a, b)
            .then_with(|| self.secondary_order(a, b))
    }

    /// Stable in-place sort.
    pub fn sort(&self, tasks: &mut [Task]) {
        tasks.sort_by(|a, b| self.compare(a, b));
    }
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Priority => "priority",
            SortKey::DueDate => "dueDate",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = ParseSortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "priority" => Ok(SortKey::Priority),
            "dueDate" | "due-date" | "due_date" => Ok(SortKey::DueDate),
            other => Err(ParseSortError::Key(other.to_string())),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        })
    }
}

impl FromStr for SortDirection {
    type Err = ParseSortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(ParseSortError::Direction(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Priority;
    use crate::domain::task::fixtures::{date, task};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn titles(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.title.as_str()).collect()
    }

    fn sample() -> Vec<Task> {
        vec![
            task("low-early", Priority::Low, date(2024, 1, 1)),
            task("high-late", Priority::High, date(2024, 3, 1)),
            task("medium-mid", Priority::Medium, date(2024, 2, 1)),
            task("high-early", Priority::High, date(2024, 1, 15)),
        ]
    }

    #[rstest]
    #[case(SortDirection::Asc)]
    #[case(SortDirection::Desc)]
    fn priority_primary_ignores_direction(#[case] direction: SortDirection) {
        let mut tasks = sample();
        SortConfig::new(SortKey::Priority)
            .direction(direction)
            .sort(&mut tasks);

        let priorities: Vec<_> = tasks.iter().map(|t| t.priority).collect();
        assert_eq!(
            priorities,
            vec![Priority::High, Priority::High, Priority::Medium, Priority::Low]
        );
        // stable: input order kept between the two High tasks
        assert_eq!(titles(&tasks[..2]), vec!["high-late", "high-early"]);
    }

    #[test]
    fn due_date_desc_reverses_ascending_order() {
        let mut asc = sample();
        let mut desc = sample();
        SortConfig::new(SortKey::DueDate).sort(&mut asc);
        SortConfig::new(SortKey::DueDate)
            .direction(SortDirection::Desc)
            .sort(&mut desc);

        desc.reverse();
        assert_eq!(titles(&asc), titles(&desc));
        assert_eq!(titles(&asc), vec!["low-early", "high-early", "medium-mid", "high-late"]);
    }

    #[test]
    fn secondary_due_date_breaks_priority_ties_ascending_even_when_desc() {
        let mut tasks = sample();
        SortConfig::new(SortKey::Priority)
            .then_by(SortKey::DueDate)
            .direction(SortDirection::Desc)
            .sort(&mut tasks);

        assert_eq!(
            titles(&tasks),
            vec!["high-early", "high-late", "medium-mid", "low-early"]
        );
    }

    #[test]
    fn secondary_priority_breaks_due_date_ties() {
        let mut tasks = vec![
            task("a-low", Priority::Low, date(2024, 1, 1)),
            task("a-high", Priority::High, date(2024, 1, 1)),
            task("b-medium", Priority::Medium, date(2024, 1, 2)),
        ];
        SortConfig::new(SortKey::DueDate)
            .then_by(SortKey::Priority)
            .sort(&mut tasks);

        assert_eq!(titles(&tasks), vec!["a-high", "a-low", "b-medium"]);
    }

    #[test]
    fn full_ties_keep_input_order() {
        let mut tasks = vec![
            task("first", Priority::Medium, date(2024, 1, 1)),
            task("second", Priority::Medium, date(2024, 1, 1)),
            task("third", Priority::Medium, date(2024, 1, 1)),
        ];
        SortConfig::new(SortKey::Priority)
            .then_by(SortKey::DueDate)
            .sort(&mut tasks);

        assert_eq!(titles(&tasks), vec!["first", "second", "third"]);
    }

    #[rstest]
    #[case("priority", SortKey::Priority)]
    #[case("dueDate", SortKey::DueDate)]
    #[case("due-date", SortKey::DueDate)]
    fn sort_key_parses(#[case] input: &str, #[case] expected: SortKey) {
        assert_eq!(input.parse::<SortKey>().unwrap(), expected);
    }

    #[rstest]
    #[case("Priority")]
    #[case("due")]
    #[case("")]
    fn unknown_sort_key_is_rejected(#[case] input: &str) {
        assert_eq!(
            input.parse::<SortKey>().unwrap_err(),
            ParseSortError::Key(input.to_string())
        );
    }

    #[test]
    fn sort_direction_parses() {
        assert_eq!("asc".parse::<SortDirection>().unwrap(), SortDirection::Asc);
        assert_eq!("desc".parse::<SortDirection>().unwrap(), SortDirection::Desc);
        let err = "down".parse::<SortDirection>().unwrap_err();
        assert_eq!(err, ParseSortError::Direction("down".into()));
        assert_eq!(err.to_string(), "unknown direction \"down\" (expected asc or desc)");
    }
}
