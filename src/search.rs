//! In-memory search and ordering over the fetched directory.
//!
//! Everything here is pure: functions take a borrowed slice and return a
//! fresh `Vec`, the source list is never reordered in place.
//!
use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::model::User;

/// Direction of a sort.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    /// Apply this direction to an ascending comparison result.
    pub fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(SortOrder::Asc),
            "desc" | "descending" => Some(SortOrder::Desc),
            _ => None,
        }
    }

    /// Arrow shown next to the active column.
    pub fn arrow(self) -> &'static str {
        match self {
            SortOrder::Asc => "↑",
            SortOrder::Desc => "↓",
        }
    }
}

/// A closed set of sortable columns with display labels.
///
/// Search and sort controls are generic over this trait, so a list view
/// names its columns with an enum instead of free-form strings.
pub trait SortKey: Copy + Eq + std::fmt::Debug {
    /// Every key, in menu order.
    fn all() -> &'static [Self];
    /// Human readable label ("Name", "City", ...).
    fn label(self) -> &'static str;
}

/// Current ordering of a list view.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SortConfig<F> {
    pub field: F,
    pub order: SortOrder,
}

/// Sortable columns of the users list.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum SortField {
    #[default]
    Name,
    Email,
    Username,
    Company,
    City,
}

impl SortField {
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Email => "email",
            SortField::Username => "username",
            SortField::Company => "company",
            SortField::City => "city",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Some(SortField::Name),
            "email" => Some(SortField::Email),
            "username" => Some(SortField::Username),
            "company" => Some(SortField::Company),
            "city" => Some(SortField::City),
            _ => None,
        }
    }
}

impl SortKey for SortField {
    fn all() -> &'static [Self] {
        &[
            SortField::Name,
            SortField::Email,
            SortField::Username,
            SortField::Company,
            SortField::City,
        ]
    }

    fn label(self) -> &'static str {
        match self {
            SortField::Name => "Name",
            SortField::Email => "Email",
            SortField::Username => "Username",
            SortField::Company => "Company",
            SortField::City => "City",
        }
    }
}

/// Base letters of `s`: canonical decomposition with accents dropped, then lower-cased.
fn fold_base(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

/// Compare on base letters only, ignoring case and accents ("Émile" == "emile").
pub fn compare_text(a: &str, b: &str) -> Ordering {
    fold_base(a).cmp(fold_base(b))
}

/// Does `user` match `term` in any searchable column?
///
/// A blank term matches everything. The term itself is only lower-cased,
/// not trimmed, so `" ny"` requires the leading space.
pub fn user_matches(user: &User, term: &str) -> bool {
    if term.trim().is_empty() {
        return true;
    }
    let q = term.to_lowercase();
    user.name.to_lowercase().contains(&q)
        || user.email.to_lowercase().contains(&q)
        || user.username.to_lowercase().contains(&q)
        || user.company.name.to_lowercase().contains(&q)
        || user.address.city.to_lowercase().contains(&q)
}

pub fn filter_users(users: &[User], term: &str) -> Vec<User> {
    if term.trim().is_empty() {
        return users.to_vec();
    }
    users
        .iter()
        .filter(|u| user_matches(u, term))
        .cloned()
        .collect()
}

/// Stable sort by a column extractor.
///
/// `key_for` returns `None` for a column it does not know; the items then
/// come back in their input order.
pub fn sort_with<T: Clone, F: Copy>(
    items: &[T],
    config: SortConfig<F>,
    key_for: fn(F) -> Option<fn(&T) -> &str>,
) -> Vec<T> {
    let mut sorted = items.to_vec();
    let Some(key) = key_for(config.field) else {
        return sorted;
    };
    sorted.sort_by(|a, b| config.order.apply(compare_text(key(a), key(b))));
    sorted
}

fn by_name(u: &User) -> &str {
    &u.name
}

fn by_email(u: &User) -> &str {
    &u.email
}

fn by_username(u: &User) -> &str {
    &u.username
}

fn by_company(u: &User) -> &str {
    &u.company.name
}

fn by_city(u: &User) -> &str {
    &u.address.city
}

/// Column extractor for the users list.
pub fn user_sort_key(field: SortField) -> Option<fn(&User) -> &str> {
    Some(match field {
        SortField::Name => by_name,
        SortField::Email => by_email,
        SortField::Username => by_username,
        SortField::Company => by_company,
        SortField::City => by_city,
    })
}

pub fn sort_users(users: &[User], config: SortConfig<SortField>) -> Vec<User> {
    sort_with(users, config, user_sort_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Address, Company, Geo};

    fn mk_user(id: u64, name: &str, username: &str, email: &str, company: &str, city: &str) -> User {
        User {
            id,
            name: name.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            phone: String::new(),
            website: String::new(),
            company: Company {
                name: company.to_string(),
                catch_phrase: String::new(),
                bs: String::new(),
            },
            address: Address {
                street: String::new(),
                suite: String::new(),
                city: city.to_string(),
                zipcode: String::new(),
                geo: Geo {
                    lat: "0".to_string(),
                    lng: "0".to_string(),
                },
            },
        }
    }

    fn names(users: &[User]) -> Vec<&str> {
        users.iter().map(|u| u.name.as_str()).collect()
    }

    #[test]
    fn filter_matches_each_searchable_column() {
        let users = vec![
            mk_user(1, "Alice", "ally", "a@x.io", "Acme", "Oslo"),
            mk_user(2, "Bob", "bobby", "b@y.io", "Globex", "Paris"),
        ];
        assert_eq!(names(&filter_users(&users, "ALI")), ["Alice"]);
        assert_eq!(names(&filter_users(&users, "y.io")), ["Bob"]);
        assert_eq!(names(&filter_users(&users, "bobby")), ["Bob"]);
        assert_eq!(names(&filter_users(&users, "acme")), ["Alice"]);
        assert_eq!(names(&filter_users(&users, "paris")), ["Bob"]);
        assert!(filter_users(&users, "zzz").is_empty());
    }

    #[test]
    fn blank_term_returns_input_unchanged() {
        let users = vec![
            mk_user(1, "Zed", "z", "z@x", "C", "A"),
            mk_user(2, "Amy", "a", "a@x", "C", "B"),
        ];
        assert_eq!(filter_users(&users, ""), users);
        assert_eq!(filter_users(&users, "   "), users);
    }

    #[test]
    fn term_is_not_trimmed() {
        let users = vec![mk_user(1, "Bob", "b", "b@x", "C", "NY")];
        assert!(filter_users(&users, " ny").is_empty());
        assert_eq!(filter_users(&users, "ny").len(), 1);
    }

    #[test]
    fn sort_is_case_insensitive() {
        let users = vec![
            mk_user(1, "bob", "b", "b@x", "C", "A"),
            mk_user(2, "Amy", "a", "a@x", "C", "A"),
            mk_user(3, "carl", "c", "c@x", "C", "A"),
        ];
        let cfg = SortConfig { field: SortField::Name, order: SortOrder::Asc };
        assert_eq!(names(&sort_users(&users, cfg)), ["Amy", "bob", "carl"]);
    }

    #[test]
    fn accented_names_sort_with_their_base_letter() {
        let users = vec![
            mk_user(1, "Zoe", "z", "z@x", "C", "A"),
            mk_user(2, "Émile", "e", "e@x", "C", "A"),
            mk_user(3, "Eve", "v", "v@x", "C", "A"),
        ];
        let cfg = SortConfig { field: SortField::Name, order: SortOrder::Asc };
        assert_eq!(names(&sort_users(&users, cfg)), ["Émile", "Eve", "Zoe"]);
    }

    #[test]
    fn accent_and_case_variants_are_ties() {
        assert_eq!(compare_text("Émile", "emile"), Ordering::Equal);
        let users = vec![
            mk_user(1, "Émile", "a", "a@x", "C", "A"),
            mk_user(2, "emile", "b", "b@x", "C", "A"),
            mk_user(3, "Emile", "c", "c@x", "C", "A"),
        ];
        for order in [SortOrder::Asc, SortOrder::Desc] {
            let cfg = SortConfig { field: SortField::Name, order };
            assert_eq!(names(&sort_users(&users, cfg)), ["Émile", "emile", "Emile"]);
        }
    }

    #[test]
    fn sort_keeps_ties_in_input_order_both_directions() {
        let users = vec![
            mk_user(1, "Bob", "b", "b@x", "C", "NY"),
            mk_user(2, "Amy", "a", "a@x", "C", "NY"),
            mk_user(3, "Cy", "c", "c@x", "C", "LA"),
        ];
        let asc = SortConfig { field: SortField::City, order: SortOrder::Asc };
        assert_eq!(names(&sort_users(&users, asc)), ["Cy", "Bob", "Amy"]);
        let desc = SortConfig { field: SortField::City, order: SortOrder::Desc };
        assert_eq!(names(&sort_users(&users, desc)), ["Bob", "Amy", "Cy"]);
    }

    #[test]
    fn sort_does_not_touch_input() {
        let users = vec![
            mk_user(1, "B", "b", "b@x", "C", "A"),
            mk_user(2, "A", "a", "a@x", "C", "A"),
        ];
        let before = users.clone();
        let _ = sort_users(&users, SortConfig { field: SortField::Name, order: SortOrder::Asc });
        assert_eq!(users, before);
    }

    #[test]
    fn unknown_column_preserves_order() {
        #[derive(Copy, Clone, Debug, PartialEq, Eq)]
        enum Col {
            Known,
            Unknown,
        }
        fn key(c: Col) -> Option<fn(&String) -> &str> {
            match c {
                Col::Known => Some(String::as_str),
                Col::Unknown => None,
            }
        }
        let items = vec!["b".to_string(), "a".to_string(), "c".to_string()];
        let unknown = sort_with(&items, SortConfig { field: Col::Unknown, order: SortOrder::Desc }, key);
        assert_eq!(unknown, items);
        let known = sort_with(&items, SortConfig { field: Col::Known, order: SortOrder::Asc }, key);
        assert_eq!(known, ["a", "b", "c"]);
    }

    #[test]
    fn parse_sort_names() {
        assert_eq!(SortField::parse(" City "), Some(SortField::City));
        assert_eq!(SortField::parse("phone"), None);
        assert_eq!(SortOrder::parse("DESC"), Some(SortOrder::Desc));
        assert_eq!(SortOrder::Asc.toggled(), SortOrder::Desc);
    }
}
