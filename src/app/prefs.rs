//! List preferences: parse/write `prefs.conf` and apply them to `AppState`.
//!
//! The file remembers how the users list was last shown:
//! - the sort column and direction
//! - table or cards layout

use std::fmt::Write as _;
use std::path::Path;

use super::{AppState, ViewMode};
use crate::search::{SortField, SortOrder};

pub const PREFS_FILE: &str = "prefs.conf";

/// Persisted list preferences.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ListPrefs {
    /// Column the list opens sorted by.
    pub sort_field: SortField,
    pub sort_order: SortOrder,
    pub view_mode: ViewMode,
}

impl ListPrefs {
    /// Capture the current list settings of an [`AppState`].
    pub fn from_app(app: &AppState) -> Self {
        let cfg = app.listing.sort_config();
        Self {
            sort_field: cfg.field,
            sort_order: cfg.order,
            view_mode: app.view_mode,
        }
    }

    /// Convenience for [`from_app`](Self::from_app) followed by [`write_file`](Self::write_file).
    pub fn save_from_app(app: &AppState, path: &Path) -> std::io::Result<()> {
        Self::from_app(app).write_file(path)
    }

    /// Load `path`, or write defaults there when it does not exist yet.
    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        let prefs = Self::default();
        if let Err(err) = prefs.write_file(path) {
            tracing::warn!(path = %path.display(), error = %err, "cannot write default prefs");
        }
        prefs
    }

    pub fn from_file(path: &Path) -> Option<Self> {
        std::fs::read_to_string(path).ok().map(|s| Self::parse(&s))
    }

    /// Parse `<key> = <value>` lines. Comments, blanks, unknown keys and
    /// unknown values are skipped, leaving the default in place.
    pub fn parse(contents: &str) -> Self {
        let mut prefs = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((lhs, rhs)) = line.split_once('=') else {
                continue;
            };
            let rhs = rhs.trim();
            match lhs.trim() {
                "sort_field" => {
                    prefs.sort_field = SortField::parse(rhs).unwrap_or(prefs.sort_field);
                }
                "sort_order" => {
                    prefs.sort_order = SortOrder::parse(rhs).unwrap_or(prefs.sort_order);
                }
                "view_mode" => {
                    prefs.view_mode = ViewMode::parse(rhs).unwrap_or(prefs.view_mode);
                }
                _ => {}
            }
        }
        prefs
    }

    pub fn to_conf(&self) -> String {
        let mut buf = String::new();
        buf.push_str("# userdeck list preferences\n");
        buf.push_str("# sort_field: name|email|username|company|city\n");
        buf.push_str("# sort_order: asc|desc\n");
        buf.push_str("# view_mode: table|cards\n\n");
        let _ = writeln!(&mut buf, "sort_field = {}", self.sort_field.as_str());
        let _ = writeln!(&mut buf, "sort_order = {}", self.sort_order.as_str());
        let _ = writeln!(&mut buf, "view_mode = {}", self.view_mode.as_str());
        buf
    }

    pub fn write_file(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, self.to_conf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_reads_known_keys() {
        let p = ListPrefs::parse("sort_field = City\nsort_order=desc\nview_mode = cards\n");
        assert_eq!(
            p,
            ListPrefs {
                sort_field: SortField::City,
                sort_order: SortOrder::Desc,
                view_mode: ViewMode::Cards,
            }
        );
    }

    #[test]
    fn bad_values_keep_defaults() {
        let p = ListPrefs::parse("sort_field = phone\nview_mode\n# sort_order = desc\n");
        assert_eq!(p, ListPrefs::default());
    }

    #[test]
    fn conf_round_trips() {
        let p = ListPrefs {
            sort_field: SortField::Company,
            sort_order: SortOrder::Desc,
            view_mode: ViewMode::Table,
        };
        assert_eq!(ListPrefs::parse(&p.to_conf()), p);
    }
}
