use serde::{Deserialize, Serialize};

use crate::models::{Webhook, WebhookEvent};

pub const WEBHOOKS_PER_PAGE: usize = 10;
pub const EVENTS_PER_PAGE: usize = 15;

/// Status filter value meaning "no status filter".
pub const ALL_STATUSES: &str = "All";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    #[serde(default)]
    pub search_term: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl FilterOptions {
    fn search(&self) -> Option<String> {
        self.search_term
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    fn status(&self) -> Option<&str> {
        self.status
            .as_deref()
            .filter(|s| !s.is_empty() && *s != ALL_STATUSES)
    }
}

/// A record the list views can filter.
pub trait Filterable {
    /// Fields the free-text search looks at.
    fn search_fields(&self) -> Vec<&str>;
    fn status_label(&self) -> &str;
}

impl Filterable for Webhook {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.url, &self.description]
    }

    fn status_label(&self) -> &str {
        self.status.as_str()
    }
}

impl Filterable for WebhookEvent {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.event_type]
    }

    fn status_label(&self) -> &str {
        self.status.as_str()
    }
}

/// Keep the items matching every active criterion, in their original order.
pub fn filter<'a, T: Filterable>(items: &'a [T], options: &FilterOptions) -> Vec<&'a T> {
    let search = options.search();
    let status = options.status();

    items
        .iter()
        .filter(|item| {
            let matches_search = search.as_ref().is_none_or(|term| {
                item.search_fields()
                    .iter()
                    .any(|field| field.to_lowercase().contains(term.as_str()))
            });
            let matches_status = status.is_none_or(|s| item.status_label() == s);
            matches_search && matches_status
        })
        .collect()
}

/// The 1-based `page` of `items`. Page 0 and pages past the end are empty.
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> &[T] {
    if page == 0 || per_page == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(per_page).min(items.len());
    let end = page.saturating_mul(per_page).min(items.len());
    &items[start..end]
}

pub fn total_pages(total_items: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    total_items.div_ceil(per_page)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

/// Filter then paginate, cloning the visible rows.
pub fn page_of<T: Filterable + Clone>(
    items: &[T],
    options: &FilterOptions,
    page: usize,
    per_page: usize,
) -> Page<T> {
    let filtered = filter(items, options);
    Page {
        items: paginate(&filtered, page, per_page)
            .iter()
            .map(|item| (*item).clone())
            .collect(),
        current_page: page,
        per_page,
        total_items: filtered.len(),
        total_pages: total_pages(filtered.len(), per_page),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockGenerator;
    use crate::models::{EventStatus, WebhookStatus};
    use chrono::Utc;

    fn options(search: Option<&str>, status: Option<&str>) -> FilterOptions {
        FilterOptions {
            search_term: search.map(String::from),
            status: status.map(String::from),
        }
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let (webhooks, events) = MockGenerator::seeded(9, Utc::now()).seed_population(15, 50);
        assert_eq!(filter(&webhooks, &FilterOptions::default()).len(), 15);
        assert_eq!(filter(&events, &options(Some(""), Some("All"))).len(), 50);
    }

    #[test]
    fn status_filter_is_exact() {
        let (webhooks, _) = MockGenerator::seeded(21, Utc::now()).seed_population(15, 50);
        let active = filter(&webhooks, &options(None, Some("Active")));
        let expected = webhooks
            .iter()
            .filter(|w| w.status == WebhookStatus::Active)
            .count();
        assert_eq!(active.len(), expected);
        assert!(active.iter().all(|w| w.status == WebhookStatus::Active));
        assert!(filter(&webhooks, &options(None, Some("active"))).is_empty());
    }

    #[test]
    fn search_matches_url_case_insensitively() {
        let (webhooks, _) = MockGenerator::seeded(4, Utc::now()).seed_population(15, 50);
        let found = filter(&webhooks, &options(Some("SERVICE-3"), None));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "wh-3");

        let described = filter(&webhooks, &options(Some("related to service 12."), None));
        assert_eq!(described.len(), 1);
        assert_eq!(described[0].id, "wh-12");
    }

    #[test]
    fn search_then_status_is_conjunction() {
        let (_, events) = MockGenerator::seeded(8, Utc::now()).seed_population(15, 50);
        let hits = filter(&events, &options(Some("."), Some("Failed")));
        let expected: Vec<_> = events
            .iter()
            .filter(|e| e.status == EventStatus::Failed)
            .collect();
        assert_eq!(hits, expected);
    }

    #[test]
    fn filter_preserves_order() {
        let (_, events) = MockGenerator::seeded(2, Utc::now()).seed_population(15, 50);
        let hits = filter(&events, &options(None, Some("Delivered")));
        let positions: Vec<usize> = hits
            .iter()
            .map(|hit| events.iter().position(|e| e.id == hit.id).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn pages_partition_the_collection() {
        let items: Vec<usize> = (0..47).collect();
        let pages = total_pages(items.len(), EVENTS_PER_PAGE);
        assert_eq!(pages, 4);

        let mut rebuilt = Vec::new();
        for p in 1..=pages {
            let slice = paginate(&items, p, EVENTS_PER_PAGE);
            let expected_len = EVENTS_PER_PAGE.min(items.len() - (p - 1) * EVENTS_PER_PAGE);
            assert_eq!(slice.len(), expected_len);
            rebuilt.extend_from_slice(slice);
        }
        assert_eq!(rebuilt, items);
    }

    #[test]
    fn out_of_range_pages_are_empty() {
        let items: Vec<usize> = (0..12).collect();
        assert!(paginate(&items, 0, WEBHOOKS_PER_PAGE).is_empty());
        assert!(paginate(&items, 3, WEBHOOKS_PER_PAGE).is_empty());
        assert!(paginate(&items, usize::MAX, WEBHOOKS_PER_PAGE).is_empty());
        assert_eq!(paginate(&items, 2, WEBHOOKS_PER_PAGE), &[10, 11]);
        assert_eq!(total_pages(0, WEBHOOKS_PER_PAGE), 0);
    }

    #[test]
    fn page_of_reports_totals() {
        let (webhooks, _) = MockGenerator::seeded(30, Utc::now()).seed_population(15, 0);
        let page = page_of(&webhooks, &FilterOptions::default(), 2, WEBHOOKS_PER_PAGE);
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.total_items, 15);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items[0].id, "wh-11");
    }
}
