//! View models shared by the console templates: pagination chrome, select
//! options and the dynamic key/value list editor.

use crate::listing::Page;
use crate::models::KeyValueEntry;

#[allow(dead_code)]
pub struct Pager {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub first_item: usize,
    pub last_item: usize,
    pub prev_page: Option<usize>,
    pub next_page: Option<usize>,
    /// Form target that accepts a `page` field.
    pub action: &'static str,
}

impl Pager {
    pub fn new<T>(page: &Page<T>, action: &'static str) -> Self {
        // Any stored page number is accepted, so the offsets must not overflow.
        let (first_item, last_item) = if page.items.is_empty() {
            (0, 0)
        } else {
            let skipped = page.current_page.saturating_sub(1).saturating_mul(page.per_page);
            (skipped + 1, skipped + page.items.len())
        };

        Self {
            current_page: page.current_page,
            total_pages: page.total_pages,
            total_items: page.total_items,
            first_item,
            last_item,
            prev_page: (page.current_page > 1)
                .then(|| (page.current_page - 1).min(page.total_pages.max(1))),
            next_page: (page.current_page < page.total_pages).then_some(page.current_page + 1),
            action,
        }
    }
}

#[allow(dead_code)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    pub fn list<'a>(values: impl IntoIterator<Item = &'a str>, current: &str) -> Vec<Self> {
        values
            .into_iter()
            .map(|v| SelectOption {
                value: v.to_string(),
                label: v.to_string(),
                selected: v == current,
            })
            .collect()
    }
}

/// A labelled list of key/value rows with add and remove buttons.
/// Field names are `{prefix}_id`, `{prefix}_key` and `{prefix}_value`.
#[allow(dead_code)]
pub struct KeyValueListView {
    pub label: &'static str,
    pub description: &'static str,
    pub prefix: &'static str,
    pub add_label: &'static str,
    pub key_placeholder: &'static str,
    pub value_placeholder: &'static str,
    pub items: Vec<KeyValueEntry>,
}

/// `1234567` → `1,234,567`.
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
