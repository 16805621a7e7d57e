//! Search term + sort state for one list view.
//!
//! [`FilterSort`] owns the source snapshot, the committed search term and
//! the sort configuration, and keeps the derived view up to date: after
//! every mutation `items()` is exactly `sort(filter(source, term), config)`.
//!
use crate::search::{SortConfig, SortKey, SortOrder};

pub type FilterFn<T> = fn(&T, &str) -> bool;
pub type SortFn<T, F> = fn(&[T], SortConfig<F>) -> Vec<T>;

pub struct FilterSort<T, F> {
    source: Vec<T>,
    search_term: String,
    config: SortConfig<F>,
    filter_fn: Option<FilterFn<T>>,
    sort_fn: Option<SortFn<T, F>>,
    filtered_count: usize,
    view: Vec<T>,
}

impl<T: Clone, F: SortKey> FilterSort<T, F> {
    /// Empty list sorted by `field` ascending, with no filter or sort hooks.
    pub fn new(field: F) -> Self {
        Self {
            source: Vec::new(),
            search_term: String::new(),
            config: SortConfig {
                field,
                order: SortOrder::Asc,
            },
            filter_fn: None,
            sort_fn: None,
            filtered_count: 0,
            view: Vec::new(),
        }
    }

    pub fn with_filter(mut self, f: FilterFn<T>) -> Self {
        self.filter_fn = Some(f);
        self.recompute();
        self
    }

    pub fn with_sort(mut self, f: SortFn<T, F>) -> Self {
        self.sort_fn = Some(f);
        self.recompute();
        self
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.config.order = order;
        self.recompute();
        self
    }

    /// Replace the source snapshot (e.g. after a refetch).
    pub fn set_items(&mut self, items: Vec<T>) {
        self.source = items;
        self.recompute();
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.recompute();
    }

    /// Picking the active field again flips the order; a new field starts ascending.
    pub fn change_sort_field(&mut self, field: F) {
        if field == self.config.field {
            self.config.order = self.config.order.toggled();
        } else {
            self.config.field = field;
            self.config.order = SortOrder::Asc;
        }
        tracing::debug!(field = ?self.config.field, order = self.config.order.as_str(), "sort changed");
        self.recompute();
    }

    pub fn toggle_sort_order(&mut self) {
        self.config.order = self.config.order.toggled();
        self.recompute();
    }

    /// Filtered and sorted items.
    pub fn items(&self) -> &[T] {
        &self.view
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered_count
    }

    pub fn total_count(&self) -> usize {
        self.source.len()
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn sort_config(&self) -> SortConfig<F> {
        self.config
    }

    fn recompute(&mut self) {
        let filtered = match self.filter_fn {
            Some(matches) if !self.search_term.trim().is_empty() => self
                .source
                .iter()
                .filter(|item| matches(item, &self.search_term))
                .cloned()
                .collect(),
            _ => self.source.clone(),
        };
        self.filtered_count = filtered.len();
        self.view = match self.sort_fn {
            Some(sort) => sort(&filtered, self.config),
            None => filtered,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{SortField, filter_users, sort_users, user_matches};

    fn words() -> FilterSort<&'static str, SortField> {
        fn contains(item: &&'static str, term: &str) -> bool {
            item.contains(term)
        }
        fn sort(items: &[&'static str], cfg: SortConfig<SortField>) -> Vec<&'static str> {
            let mut v = items.to_vec();
            v.sort();
            if cfg.order == SortOrder::Desc {
                v.reverse();
            }
            v
        }
        let mut fs = FilterSort::new(SortField::Name).with_filter(contains).with_sort(sort);
        fs.set_items(vec!["pear", "apple", "plum"]);
        fs
    }

    #[test]
    fn same_field_flips_order() {
        let mut fs = words();
        fs.change_sort_field(SortField::Name);
        assert_eq!(fs.sort_config(), SortConfig { field: SortField::Name, order: SortOrder::Desc });
        assert_eq!(fs.items(), ["plum", "pear", "apple"]);
    }

    #[test]
    fn new_field_resets_to_ascending() {
        let mut fs = words().with_order(SortOrder::Desc);
        fs.change_sort_field(SortField::Email);
        assert_eq!(fs.sort_config(), SortConfig { field: SortField::Email, order: SortOrder::Asc });
    }

    #[test]
    fn toggle_keeps_field() {
        let mut fs = words();
        fs.toggle_sort_order();
        fs.toggle_sort_order();
        fs.toggle_sort_order();
        assert_eq!(fs.sort_config().field, SortField::Name);
        assert_eq!(fs.sort_config().order, SortOrder::Desc);
    }

    #[test]
    fn counts_follow_search() {
        let mut fs = words();
        fs.set_search_term("p");
        assert_eq!(fs.items(), ["apple", "pear", "plum"]);
        fs.set_search_term("pl");
        assert_eq!(fs.filtered_count(), 2);
        assert_eq!(fs.total_count(), 3);
        fs.set_search_term("  ");
        assert_eq!(fs.filtered_count(), 3);
    }

    #[test]
    fn without_hooks_items_pass_through() {
        let mut fs: FilterSort<&str, SortField> = FilterSort::new(SortField::City);
        fs.set_items(vec!["b", "a"]);
        fs.set_search_term("zzz");
        assert_eq!(fs.items(), ["b", "a"]);
        assert_eq!(fs.filtered_count(), 2);
    }

    #[test]
    fn user_view_equals_sort_of_filter() {
        use crate::model::{Address, Company, Geo, User};
        let mk = |id: u64, name: &str, city: &str| User {
            id,
            name: name.into(),
            username: name.to_lowercase(),
            email: format!("{}@mail.test", name.to_lowercase()),
            phone: String::new(),
            website: String::new(),
            company: Company { name: "Co".into(), catch_phrase: String::new(), bs: String::new() },
            address: Address {
                street: String::new(),
                suite: String::new(),
                city: city.into(),
                zipcode: String::new(),
                geo: Geo { lat: "0".into(), lng: "0".into() },
            },
        };
        let users = vec![mk(1, "Bob", "NY"), mk(2, "Amy", "NY"), mk(3, "Cy", "LA")];
        let mut fs = FilterSort::new(SortField::City)
            .with_filter(user_matches)
            .with_sort(sort_users);
        fs.set_items(users.clone());
        fs.set_search_term("ny");
        let expected = sort_users(&filter_users(&users, "ny"), fs.sort_config());
        assert_eq!(fs.items(), expected.as_slice());
        assert_eq!(fs.filtered_count(), 2);
    }
}
