//! List derivation pipeline: filter → sort → paginate.
//!
//! Pure and deterministic. The input collection is never mutated; the output
//! page owns clones of the selected tasks.

mod filter;
mod page;
mod sort;

pub use filter::matches_search;
pub use page::{DEFAULT_PAGE_SIZE, DerivedPage, PAGE_SIZE_OPTIONS, clamp_page, total_pages};
pub use sort::{ParseSortError, SortConfig, SortDirection, SortKey, by_due_date, by_priority};

use crate::domain::Task;

/// Derive the page of tasks to render.
///
/// `page` is 1-based and clamped into range. A `page_size` of zero is treated
/// as one.
pub fn derive(
    tasks: &[Task],
    search: &str,
    sort: &SortConfig,
    page: usize,
    page_size: usize,
) -> DerivedPage {
    let page_size = page_size.max(1);

    let mut matching: Vec<Task> = tasks
        .iter()
        .filter(|t| matches_search(t, search))
        .cloned()
        .collect();
    sort.sort(&mut matching);

    let total_count = matching.len();
    let total_pages = total_pages(total_count, page_size);
    let page = clamp_page(page, total_pages);

    let start = ((page - 1) * page_size).min(total_count);
    let end = (page * page_size).min(total_count);
    let tasks = matching.drain(start..end).collect();

    DerivedPage {
        tasks,
        total_count,
        total_pages,
        page,
        page_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Priority;
    use crate::domain::task::fixtures::{date, task};
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    fn numbered(n: usize) -> Vec<Task> {
        (0..n)
            .map(|i| {
                task(
                    &format!("task {i:02}"),
                    Priority::Medium,
                    date(2024, 1, 1) + Duration::days(i as i64),
                )
            })
            .collect()
    }

    #[test]
    fn empty_input_is_one_empty_page() {
        let page = derive(&[], "", &SortConfig::default(), 1, 10);
        assert!(page.tasks.is_empty());
        assert_eq!(page.total_count, 0);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page, 1);
        assert_eq!(page.range(), (0, 0));
    }

    #[test]
    fn twenty_three_items_span_three_pages() {
        let tasks = numbered(23);
        let cfg = SortConfig::default();

        let third = derive(&tasks, "", &cfg, 3, 10);
        assert_eq!(third.total_count, 23);
        assert_eq!(third.total_pages, 3);
        assert_eq!(third.tasks.len(), 3);
        assert_eq!(third.range(), (21, 23));
        assert!(third.has_previous());
        assert!(!third.has_next());

        let fourth = derive(&tasks, "", &cfg, 4, 10);
        assert_eq!(fourth.page, 3);
        assert_eq!(fourth.tasks, third.tasks);
    }

    #[test]
    fn page_zero_clamps_to_first() {
        let tasks = numbered(12);
        let page = derive(&tasks, "", &SortConfig::default(), 0, 5);
        assert_eq!(page.page, 1);
        assert_eq!(page.tasks[0].title, "task 00");
        assert_eq!(page.range(), (1, 5));
    }

    #[test]
    fn filters_before_sorting_and_paging() {
        let mut tasks = numbered(6);
        tasks[4].title = "Buy milk".into();
        tasks[1].description = Some("milk run".into());

        let page = derive(&tasks, "MILK", &SortConfig::default(), 1, 10);

        let titles: Vec<_> = page.tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["task 01", "Buy milk"]);
        assert_eq!(page.total_count, 2);
    }

    #[test]
    fn input_is_left_untouched() {
        let tasks = numbered(5);
        let before = tasks.clone();
        let _ = derive(
            &tasks,
            "",
            &SortConfig::default().direction(SortDirection::Desc),
            1,
            2,
        );
        assert_eq!(tasks, before);
    }

    #[test]
    fn same_inputs_same_output() {
        let mut tasks = numbered(9);
        for (i, t) in tasks.iter_mut().enumerate() {
            t.priority = Priority::ALL[i % 3];
        }
        let cfg = SortConfig::new(SortKey::Priority).then_by(SortKey::DueDate);
        assert_eq!(derive(&tasks, "task", &cfg, 2, 4), derive(&tasks, "task", &cfg, 2, 4));
    }
}
