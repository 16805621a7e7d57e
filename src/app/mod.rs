//! Application state types and entry glue.
//!
//! `AppState` owns every piece of the dashboard: the session, the fetch
//! cache, the filter/sort orchestrator and all UI-only state. Key handling
//! lives in [`update`]; this module exposes the operations it calls so they
//! can be driven without a terminal.
//!
pub mod debounce;
pub mod keymap;
pub mod listing;
pub mod prefs;
pub mod session;
pub mod theme;
pub mod update;
pub mod view_state;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::api::UserSource;
use crate::api::cache::{CachePolicy, FetchCache};
use crate::model::{FakeAccount, User, fake_accounts};
use crate::search::{SortField, SortKey, sort_users, user_matches};

use debounce::{DEFAULT_DEBOUNCE, Debouncer};
use keymap::{KEYBINDS_FILE, Keymap};
use listing::FilterSort;
use prefs::{ListPrefs, PREFS_FILE};
use session::{LocalStorage, Session};
use theme::{THEME_FILE, Theme};
use view_state::{SimulatedState, ViewInputs, ViewState};

/// Fake "signing in" pause on the login screen.
pub const LOGIN_DELAY: Duration = Duration::from_millis(500);

/// Which top-level screen is shown.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    Login,
    Dashboard,
}

/// Current input mode for key handling on the dashboard.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Modal,
}

/// Table or card layout of the same list.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Table,
    Cards,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Table => ViewMode::Cards,
            ViewMode::Cards => ViewMode::Table,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Table => "table",
            ViewMode::Cards => "cards",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Some(ViewMode::Table),
            "cards" | "card" => Some(ViewMode::Cards),
            _ => None,
        }
    }
}

/// Dialogs drawn over the dashboard.
#[derive(Clone, Debug, PartialEq)]
pub enum ModalState {
    UserDetails { user: Box<User> },
    SortMenu { selected: usize },
    Help { scroll: u16 },
    Info { message: String },
}

/// Account picker state.
#[derive(Clone, Debug, Default)]
pub struct LoginState {
    pub selected: usize,
    /// Set while the fake sign-in delay runs.
    pub pending_since: Option<Instant>,
}

/// Startup options, usually built from the command line.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Where config files and storage live. `None` keeps everything in memory.
    pub config_dir: Option<PathBuf>,
    pub debounce: Duration,
    pub skip_login: bool,
    pub cache_policy: CachePolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_dir: None,
            debounce: DEFAULT_DEBOUNCE,
            skip_login: false,
            cache_policy: CachePolicy::default(),
        }
    }
}

pub struct AppState {
    pub config_dir: Option<PathBuf>,
    pub screen: Screen,
    pub session: Session,
    pub accounts: Vec<FakeAccount>,
    pub login: LoginState,
    pub cache: FetchCache,
    pub listing: FilterSort<User, SortField>,
    seen_generation: u64,
    pub search_draft: String,
    pub debouncer: Debouncer<String>,
    pub simulated: SimulatedState,
    pub view_mode: ViewMode,
    pub selected_index: usize,
    pub rows_per_page: usize,
    pub input_mode: InputMode,
    pub modal: Option<ModalState>,
    pub theme: Theme,
    pub keymap: Keymap,
    pub show_keybinds: bool,
    pub should_quit: bool,
}

impl AppState {
    /// Build the app, restoring the session and preferences from `config.config_dir`.
    pub fn new(config: AppConfig, source: Arc<dyn UserSource>) -> Self {
        let now = Instant::now();
        let (theme, keymap, prefs, session) = match &config.config_dir {
            Some(dir) => (
                Theme::load_or_init(&dir.join(THEME_FILE)),
                Keymap::load_or_init(&dir.join(KEYBINDS_FILE)),
                ListPrefs::load_or_init(&dir.join(PREFS_FILE)),
                Session::load(LocalStorage::in_dir(dir)),
            ),
            None => (
                Theme::default(),
                Keymap::default(),
                ListPrefs::default(),
                Session::in_memory(),
            ),
        };
        let listing = FilterSort::new(prefs.sort_field)
            .with_order(prefs.sort_order)
            .with_filter(user_matches)
            .with_sort(sort_users);
        let mut app = Self {
            config_dir: config.config_dir,
            screen: Screen::Login,
            session,
            accounts: fake_accounts(),
            login: LoginState::default(),
            cache: FetchCache::new(source, config.cache_policy),
            listing,
            seen_generation: 0,
            search_draft: String::new(),
            debouncer: Debouncer::new(config.debounce),
            simulated: SimulatedState::Normal,
            view_mode: prefs.view_mode,
            selected_index: 0,
            rows_per_page: 10,
            input_mode: InputMode::Normal,
            modal: None,
            theme,
            keymap,
            show_keybinds: false,
            should_quit: false,
        };
        if config.skip_login || app.session.is_authenticated() {
            app.enter_dashboard(now);
        }
        app
    }

    fn enter_dashboard(&mut self, now: Instant) {
        self.screen = Screen::Dashboard;
        self.cache.ensure_fresh(now);
        self.sync_listing();
    }

    /// Advance timers: login delay, search debounce, fetch completion.
    pub fn tick(&mut self, now: Instant) {
        if let Some(since) = self.login.pending_since
            && now.saturating_duration_since(since) >= LOGIN_DELAY
        {
            self.complete_login(now);
        }
        if let Some(term) = self.debouncer.poll(now) {
            self.commit_search(term);
        }
        if self.cache.poll(now) {
            self.sync_listing();
        }
    }

    /// Pull a new snapshot from the cache into the orchestrator.
    pub fn sync_listing(&mut self) {
        if self.cache.generation() == self.seen_generation {
            return;
        }
        self.seen_generation = self.cache.generation();
        self.listing.set_items(self.cache.data().to_vec());
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let len = self.listing.items().len();
        self.selected_index = self.selected_index.min(len.saturating_sub(1));
    }

    pub fn view_inputs(&self) -> ViewInputs<'_> {
        ViewInputs {
            simulated: self.simulated,
            is_loading: self.cache.is_loading(),
            has_error: self.cache.error().is_some(),
            total_count: self.listing.total_count(),
            search_term: self.listing.search_term(),
            filtered_count: self.listing.filtered_count(),
        }
    }

    pub fn view_state(&self) -> ViewState {
        view_state::resolve(&self.view_inputs())
    }

    pub fn visible_users(&self) -> &[User] {
        self.listing.items()
    }

    pub fn selected_user(&self) -> Option<&User> {
        self.listing.items().get(self.selected_index)
    }

    pub fn move_selection(&mut self, delta: isize) {
        let len = self.listing.items().len();
        if len == 0 {
            self.selected_index = 0;
            return;
        }
        let next = self.selected_index.saturating_add_signed(delta);
        self.selected_index = next.min(len - 1);
    }

    pub fn page(&mut self, pages: isize) {
        let step = self.rows_per_page.max(1) as isize;
        self.move_selection(step.saturating_mul(pages));
    }

    // Search

    pub fn start_search(&mut self) {
        self.search_draft = self.listing.search_term().to_string();
        self.input_mode = InputMode::Search;
    }

    pub fn search_push(&mut self, c: char, now: Instant) {
        self.search_draft.push(c);
        self.debouncer.schedule(self.search_draft.clone(), now);
    }

    pub fn search_pop(&mut self, now: Instant) {
        self.search_draft.pop();
        self.debouncer.schedule(self.search_draft.clone(), now);
    }

    /// Commit the draft right away and leave the prompt.
    pub fn search_submit(&mut self) {
        if let Some(term) = self.debouncer.flush() {
            self.commit_search(term);
        }
        self.input_mode = InputMode::Normal;
    }

    /// Clear draft and committed term immediately.
    pub fn search_clear(&mut self) {
        self.search_draft.clear();
        self.debouncer.cancel();
        self.commit_search(String::new());
        self.input_mode = InputMode::Normal;
    }

    pub fn commit_search(&mut self, term: String) {
        tracing::debug!(term = %term, "search committed");
        self.listing.set_search_term(term);
        self.selected_index = 0;
    }

    // Sorting and layout

    pub fn change_sort_field(&mut self, field: SortField) {
        self.listing.change_sort_field(field);
        self.selected_index = 0;
        self.persist_prefs();
    }

    pub fn toggle_sort_order(&mut self) {
        self.listing.toggle_sort_order();
        self.selected_index = 0;
        self.persist_prefs();
    }

    pub fn toggle_view_mode(&mut self) {
        self.view_mode = self.view_mode.toggled();
        tracing::info!(view = self.view_mode.as_str(), "view switched");
        self.persist_prefs();
    }

    fn persist_prefs(&self) {
        if let Some(dir) = &self.config_dir
            && let Err(err) = ListPrefs::save_from_app(self, &dir.join(PREFS_FILE))
        {
            tracing::warn!(error = %err, "cannot save prefs");
        }
    }

    pub fn open_sort_menu(&mut self) {
        let current = self.listing.sort_config().field;
        let selected = SortField::all()
            .iter()
            .position(|f| *f == current)
            .unwrap_or(0);
        self.open_modal(ModalState::SortMenu { selected });
    }

    // Simulator and fetch

    pub fn set_simulated(&mut self, state: SimulatedState) {
        tracing::info!(state = state.label(), "simulated state");
        self.simulated = state;
    }

    /// Retry action of the error panel: drop the override and refetch.
    pub fn retry(&mut self) {
        self.simulated = SimulatedState::Normal;
        self.cache.refetch();
    }

    /// Terminal regained focus: refresh if the data went stale.
    pub fn on_focus_gained(&mut self, now: Instant) {
        if self.screen == Screen::Dashboard {
            self.cache.ensure_fresh(now);
        }
    }

    // Dialogs

    pub fn open_modal(&mut self, modal: ModalState) {
        self.modal = Some(modal);
        self.input_mode = InputMode::Modal;
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
        self.input_mode = InputMode::Normal;
    }

    /// Open the details dialog for the selected row, when a list is shown.
    pub fn open_details(&mut self) {
        if !matches!(self.view_state(), ViewState::Content { .. }) {
            return;
        }
        if let Some(user) = self.selected_user().cloned() {
            self.open_modal(ModalState::UserDetails {
                user: Box::new(user),
            });
        }
    }

    // Session

    pub fn select_account(&mut self, delta: isize) {
        if self.login.pending_since.is_some() || self.accounts.is_empty() {
            return;
        }
        let next = self.login.selected.saturating_add_signed(delta);
        self.login.selected = next.min(self.accounts.len() - 1);
    }

    /// Start the sign-in delay for the highlighted account.
    pub fn begin_login(&mut self, now: Instant) {
        if self.login.pending_since.is_none() && self.accounts.get(self.login.selected).is_some() {
            self.login.pending_since = Some(now);
        }
    }

    fn complete_login(&mut self, now: Instant) {
        self.login.pending_since = None;
        let Some(account) = self.accounts.get(self.login.selected).cloned() else {
            return;
        };
        let failure = self.session.login(account).err();
        self.enter_dashboard(now);
        if let Some(err) = failure {
            tracing::warn!(error = %err, "session not persisted");
            self.open_modal(ModalState::Info {
                message: format!("Logged in, but the session could not be saved:\n{err}"),
            });
        }
    }

    /// Clear the session and reset the dashboard. The fetched list stays cached.
    pub fn logout(&mut self) {
        if let Err(err) = self.session.logout() {
            tracing::warn!(error = %err, "cannot clear stored session");
        }
        self.screen = Screen::Login;
        self.login = LoginState::default();
        self.close_modal();
        self.search_draft.clear();
        self.debouncer.cancel();
        self.listing.set_search_term(String::new());
        self.simulated = SimulatedState::Normal;
        self.selected_index = 0;
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
