use std::fmt::Write;

use chrono::{DateTime, Utc};
use taskdeck_core::domain::{Task, TaskStatus};
use taskdeck_core::domain::history::DATE_FORMAT;
use taskdeck_core::listing::DerivedPage;

fn marker(task: &Task, now: DateTime<Utc>) -> &'static str {
    match task.effective_status(now) {
        TaskStatus::Completed => "[x]",
        TaskStatus::Overdue => "[!]",
        TaskStatus::Pending => "[ ]",
    }
}

/// One line per task plus the pager footer.
pub fn page(page: &DerivedPage, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    for task in &page.tasks {
        let _ = writeln!(
            out,
            "{} {:<32} {:<6} {:<12} {}",
            marker(task, now),
            task.title,
            task.priority,
            task.due_date.format(DATE_FORMAT).to_string(),
            task.id
        );
        if let Some(description) = &task.description {
            let _ = writeln!(out, "    {description}");
        }
    }
    let (start, end) = page.range();
    let _ = write!(
        out,
        "Showing {start} to {end} of {} tasks · Page {} of {}",
        page.total_count, page.page, page.total_pages
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use taskdeck_core::listing::{SortConfig, derive};
    use taskdeck_core::ports::TaskDocument;
    use taskdeck_core::domain::{NewTask, Priority, TaskId};

    fn task(title: &str, completed: bool) -> Task {
        let due = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut doc = TaskDocument::create(&NewTask::new(title, Priority::High, due), due);
        doc.completed = completed;
        doc.decode("01ARZ3NDEKTSV4RRFFQ69G5FAV".parse::<TaskId>().unwrap()).unwrap()
    }

    #[test]
    fn marks_overdue_and_completed_tasks() {
        let now = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let tasks = vec![task("Pay rent", false), task("Buy milk", true)];
        let out = page(&derive(&tasks, "", &SortConfig::default(), 1, 10), now);

        let lines: Vec<_> = out.lines().collect();
        assert!(lines[0].starts_with("[!] Pay rent"));
        assert!(lines[1].starts_with("[x] Buy milk"));
        assert_eq!(lines[2], "Showing 1 to 2 of 2 tasks · Page 1 of 1");
    }

    #[test]
    fn empty_page_footer() {
        let out = page(&derive(&[], "", &SortConfig::default(), 1, 10), Utc::now());
        assert_eq!(out, "Showing 0 to 0 of 0 tasks · Page 1 of 1");
    }
}
