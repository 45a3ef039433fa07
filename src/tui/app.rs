//! Application state and key handling for the dashboard TUI.
//!
//! The app is a thin interaction layer: keys become either local reducer
//! actions (view-state edits apply synchronously) or dispatcher calls
//! (fetches and mutations, whose completions come back through the action
//! channel). Rendering reads a [`TableSnapshot`] built fresh each frame by
//! running the view pipeline over the active collection.

use crate::config::RiskPolicy;
use crate::core::{EntityId, RiskLevel};
use crate::store::{Action, Collection, CollectionMeta, DashboardStore, Dispatcher, Mutation};
use crate::view::summary::RiskSummary;
use crate::view::{clamp_page, compute_view, empty_state_message, schemas, ViewSchema};
use crossterm::event::{KeyCode, KeyEvent};

/// Which input surface currently owns the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    List,
    Search,
    FilterMenu,
    SortMenu,
    AssignMenu,
    ConfirmDelete,
    Help,
}

/// One rendered row of the active collection's page.
pub struct RowData {
    pub id: EntityId,
    pub cells: Vec<String>,
    pub risk: Option<RiskLevel>,
    pub selected: bool,
}

/// Everything the table area needs for one frame.
pub struct TableSnapshot {
    pub headers: Vec<String>,
    pub rows: Vec<RowData>,
    pub filtered_count: usize,
    pub total_count: usize,
    pub total_pages: usize,
    pub page: usize,
    pub empty_message: Option<String>,
}

fn build_snapshot<R: Clone>(
    records: Vec<R>,
    schema: &ViewSchema<R>,
    meta: &CollectionMeta,
    id_of: fn(&R) -> EntityId,
    risk_of: fn(&R) -> Option<RiskLevel>,
) -> TableSnapshot {
    let result = compute_view(&records, &meta.view, schema);

    let headers = schema
        .fields()
        .iter()
        .map(|field| {
            if field.name == meta.view.sort_key {
                format!("{} {}", field.name, meta.view.sort_direction.indicator())
            } else {
                field.name.to_string()
            }
        })
        .collect();

    let rows: Vec<RowData> = result
        .page_items
        .iter()
        .map(|record| RowData {
            id: id_of(record),
            cells: schema
                .fields()
                .iter()
                .map(|field| (field.accessor)(record).to_string())
                .collect(),
            risk: risk_of(record),
            selected: meta.selected.contains(&id_of(record)),
        })
        .collect();

    let empty_message = if rows.is_empty() {
        if result.filtered_count > 0 {
            Some(format!(
                "Page {} of {} is empty",
                meta.view.page, result.total_pages
            ))
        } else if meta.loaded {
            Some(empty_state_message(schema.entity(), meta.view.search_active()))
        } else {
            Some("Loading...".to_string())
        }
    } else {
        None
    };

    TableSnapshot {
        headers,
        rows,
        filtered_count: result.filtered_count,
        total_count: result.total_count,
        total_pages: result.total_pages,
        page: meta.view.page,
        empty_message,
    }
}

/// The one widening observed per filter menu; `"all"` always leads.
fn filter_options(collection: Collection) -> Option<(&'static str, &'static [&'static str])> {
    match collection {
        Collection::Students => Some((
            "risk_level",
            &["all", "critical", "high", "medium", "low", "unknown"],
        )),
        Collection::Users => Some(("role", &["all", "admin", "advisor", "student"])),
        Collection::Notifications => Some(("read", &["all", "false", "true"])),
        Collection::Interventions => Some((
            "status",
            &["all", "planned", "in_progress", "completed", "cancelled"],
        )),
        Collection::Meetings => Some(("status", &["all", "scheduled", "completed", "cancelled"])),
        Collection::Advisors => None,
    }
}

fn delete_mutation(collection: Collection, id: EntityId) -> Mutation {
    match collection {
        Collection::Users => Mutation::DeleteUser(id),
        Collection::Students => Mutation::DeleteStudent(id),
        Collection::Advisors => Mutation::DeleteAdvisor(id),
        Collection::Notifications => Mutation::DeleteNotification(id),
        Collection::Interventions => Mutation::DeleteIntervention(id),
        Collection::Meetings => Mutation::DeleteMeeting(id),
    }
}

pub struct DashboardApp {
    pub store: DashboardStore,
    dispatcher: Dispatcher,
    risk: RiskPolicy,
    tabs: Vec<Collection>,
    active_tab: usize,
    pub mode: ViewMode,
    /// Cursor within the visible page.
    pub cursor: usize,
    /// Highlight within the open menu, when a menu is open.
    pub menu_index: usize,
    should_quit: bool,
}

impl DashboardApp {
    pub fn new(store: DashboardStore, dispatcher: Dispatcher, risk: RiskPolicy) -> Self {
        let tabs = store.visible_collections();
        Self {
            store,
            dispatcher,
            risk,
            tabs,
            active_tab: 0,
            mode: ViewMode::List,
            cursor: 0,
            menu_index: 0,
            should_quit: false,
        }
    }

    pub fn active(&self) -> Collection {
        self.tabs[self.active_tab]
    }

    pub fn tabs(&self) -> &[Collection] {
        &self.tabs
    }

    pub fn active_tab(&self) -> usize {
        self.active_tab
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// The students summary card row, on the students tab only.
    pub fn risk_summary(&self) -> Option<(RiskSummary, bool)> {
        if self.active() != Collection::Students {
            return None;
        }
        let students: Vec<_> = self.store.students.iter().cloned().collect();
        Some((
            RiskSummary::from_students(&students),
            self.risk.widen_high_in_summary,
        ))
    }

    /// Runs the view pipeline for the active collection.
    pub fn snapshot(&self) -> TableSnapshot {
        let meta = self.store.meta(self.active());
        match self.active() {
            Collection::Users => build_snapshot(
                self.store.users.iter().cloned().collect(),
                &schemas::user_schema(),
                meta,
                |user| user.id,
                |_| None,
            ),
            Collection::Students => build_snapshot(
                self.store.students.iter().cloned().collect(),
                &schemas::student_schema(self.risk.widen_high_in_lists),
                meta,
                |student| student.id,
                |student| Some(student.risk_level),
            ),
            Collection::Advisors => build_snapshot(
                self.store.advisors.iter().cloned().collect(),
                &schemas::advisor_schema(),
                meta,
                |advisor| advisor.id,
                |_| None,
            ),
            Collection::Notifications => build_snapshot(
                self.store.notifications.iter().cloned().collect(),
                &schemas::notification_schema(),
                meta,
                |notification| notification.id,
                |_| None,
            ),
            Collection::Interventions => build_snapshot(
                self.store.interventions.iter().cloned().collect(),
                &schemas::intervention_schema(),
                meta,
                |intervention| intervention.id,
                |_| None,
            ),
            Collection::Meetings => build_snapshot(
                self.store.meetings.iter().cloned().collect(),
                &schemas::meeting_schema(),
                meta,
                |meeting| meeting.id,
                |_| None,
            ),
        }
    }

    /// Title, items, and highlight index for the open menu, if any.
    pub fn menu(&self) -> Option<(String, Vec<String>, usize)> {
        match self.mode {
            ViewMode::FilterMenu => {
                let (category, values) = filter_options(self.active())?;
                let items = values.iter().map(|v| (*v).to_string()).collect();
                Some((format!("Filter by {category}"), items, self.menu_index))
            }
            ViewMode::SortMenu => Some((
                "Sort by".to_string(),
                self.sort_options().iter().map(|k| (*k).to_string()).collect(),
                self.menu_index,
            )),
            ViewMode::AssignMenu => Some((
                "Assign advisor".to_string(),
                self.store
                    .advisors
                    .iter()
                    .map(|advisor| advisor.name.clone())
                    .collect(),
                self.menu_index,
            )),
            _ => None,
        }
    }

    fn sort_options(&self) -> Vec<&'static str> {
        match self.active() {
            Collection::Users => schemas::user_schema().fields().iter().map(|f| f.name).collect(),
            Collection::Students => schemas::student_schema(false)
                .fields()
                .iter()
                .map(|f| f.name)
                .collect(),
            Collection::Advisors => schemas::advisor_schema()
                .fields()
                .iter()
                .map(|f| f.name)
                .collect(),
            Collection::Notifications => schemas::notification_schema()
                .fields()
                .iter()
                .map(|f| f.name)
                .collect(),
            Collection::Interventions => schemas::intervention_schema()
                .fields()
                .iter()
                .map(|f| f.name)
                .collect(),
            Collection::Meetings => schemas::meeting_schema()
                .fields()
                .iter()
                .map(|f| f.name)
                .collect(),
        }
    }

    /// Applies an async completion from the dispatcher channel.
    pub fn apply(&mut self, action: Action) {
        self.store.apply(action);
        self.settle();
    }

    /// Clamp the page after data changes and keep the cursor on a real row.
    fn settle(&mut self) {
        let snapshot = self.snapshot();
        let active = self.active();
        let page = self.store.meta(active).view.page;
        let clamped = clamp_page(page, snapshot.total_pages);
        if clamped != page {
            self.store.meta_mut(active).view.set_page(clamped);
        }

        let rows = if clamped == page {
            snapshot.rows.len()
        } else {
            self.snapshot().rows.len()
        };
        self.cursor = self.cursor.min(rows.saturating_sub(1));
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.mode {
            ViewMode::List => self.handle_list_key(key),
            ViewMode::Search => self.handle_search_key(key),
            ViewMode::FilterMenu | ViewMode::SortMenu | ViewMode::AssignMenu => {
                self.handle_menu_key(key)
            }
            ViewMode::ConfirmDelete => self.handle_confirm_key(key),
            ViewMode::Help => {
                self.mode = ViewMode::List;
            }
        }
        self.settle();
    }

    fn busy(&self) -> bool {
        self.store.meta(self.active()).busy
    }

    fn current_row_id(&self) -> Option<EntityId> {
        self.snapshot().rows.get(self.cursor).map(|row| row.id)
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        let active = self.active();
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.mode = ViewMode::Help,

            KeyCode::Tab => {
                self.active_tab = (self.active_tab + 1) % self.tabs.len();
                self.cursor = 0;
            }
            KeyCode::BackTab => {
                self.active_tab = (self.active_tab + self.tabs.len() - 1) % self.tabs.len();
                self.cursor = 0;
            }

            KeyCode::Down | KeyCode::Char('j') => self.cursor += 1,
            KeyCode::Up | KeyCode::Char('k') => self.cursor = self.cursor.saturating_sub(1),

            KeyCode::Right | KeyCode::Char('n') => {
                let page = self.store.meta(active).view.page;
                self.store.apply(Action::PageChanged(active, page + 1));
            }
            KeyCode::Left | KeyCode::Char('p') => {
                let page = self.store.meta(active).view.page;
                self.store
                    .apply(Action::PageChanged(active, page.saturating_sub(1)));
            }

            KeyCode::Char('/') => self.mode = ViewMode::Search,
            KeyCode::Char('f') => {
                if filter_options(active).is_some() {
                    self.menu_index = 0;
                    self.mode = ViewMode::FilterMenu;
                }
            }
            KeyCode::Char('s') => {
                self.menu_index = 0;
                self.mode = ViewMode::SortMenu;
            }
            KeyCode::Char('r') => self.dispatcher.load(active),

            KeyCode::Char(' ') => {
                if let Some(id) = self.current_row_id() {
                    self.store.apply(Action::SelectionToggled(active, id));
                }
            }
            KeyCode::Char('m') => {
                // Bulk mark-read, notifications only.
                let selected = self.store.meta(active).selected.clone();
                if active == Collection::Notifications && !selected.is_empty() && !self.busy() {
                    self.dispatcher
                        .mutate(Mutation::MarkNotificationsRead(selected.into_iter().collect()));
                }
            }
            KeyCode::Char('a') => {
                // Bulk advisor assignment, students only.
                let has_selection = !self.store.meta(active).selected.is_empty();
                if active == Collection::Students
                    && has_selection
                    && !self.store.advisors.is_empty()
                    && !self.busy()
                {
                    self.menu_index = 0;
                    self.mode = ViewMode::AssignMenu;
                }
            }

            KeyCode::Char('d') => {
                if !self.busy() {
                    if let Some(id) = self.current_row_id() {
                        self.store.apply(Action::DeleteRequested(active, id));
                        self.mode = ViewMode::ConfirmDelete;
                    }
                }
            }
            KeyCode::Char('x') => self.store.apply(Action::BannerDismissed(active)),
            KeyCode::Esc => self.store.apply(Action::SelectionCleared(active)),

            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        let active = self.active();
        let mut term = self.store.meta(active).view.search_term.clone();
        match key.code {
            KeyCode::Esc => {
                self.store.apply(Action::SearchChanged(active, String::new()));
                self.mode = ViewMode::List;
            }
            KeyCode::Enter => self.mode = ViewMode::List,
            KeyCode::Backspace => {
                term.pop();
                self.store.apply(Action::SearchChanged(active, term));
            }
            KeyCode::Char(c) => {
                term.push(c);
                self.store.apply(Action::SearchChanged(active, term));
            }
            _ => {}
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) {
        let Some((_, items, _)) = self.menu() else {
            self.mode = ViewMode::List;
            return;
        };
        match key.code {
            KeyCode::Esc => self.mode = ViewMode::List,
            KeyCode::Down | KeyCode::Char('j') => {
                self.menu_index = (self.menu_index + 1).min(items.len().saturating_sub(1));
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.menu_index = self.menu_index.saturating_sub(1);
            }
            KeyCode::Enter => self.select_menu_item(),
            _ => {}
        }
    }

    fn select_menu_item(&mut self) {
        let active = self.active();
        match self.mode {
            ViewMode::FilterMenu => {
                if let Some((category, values)) = filter_options(active) {
                    if let Some(value) = values.get(self.menu_index) {
                        self.store.apply(Action::FilterSelected(
                            active,
                            category.to_string(),
                            (*value).to_string(),
                        ));
                    }
                }
            }
            ViewMode::SortMenu => {
                if let Some(key) = self.sort_options().get(self.menu_index) {
                    self.store
                        .apply(Action::SortClicked(active, (*key).to_string()));
                }
            }
            ViewMode::AssignMenu => {
                let advisor_id = self.store.advisors.get(self.menu_index).map(|advisor| advisor.id);
                let student_ids: Vec<_> =
                    self.store.meta(active).selected.iter().copied().collect();
                if let Some(advisor_id) = advisor_id {
                    if !student_ids.is_empty() && !self.busy() {
                        self.dispatcher.mutate(Mutation::AssignAdvisor {
                            student_ids,
                            advisor_id,
                        });
                    }
                }
            }
            _ => {}
        }
        self.mode = ViewMode::List;
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        let active = self.active();
        match key.code {
            KeyCode::Char('y') => {
                let pending = self.store.meta(active).pending_delete;
                if let Some(id) = pending {
                    if !self.busy() {
                        self.dispatcher.mutate(delete_mutation(active, id));
                    }
                }
                self.mode = ViewMode::List;
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                self.store.apply(Action::DeleteCancelled(active));
                self.mode = ViewMode::List;
            }
            _ => {}
        }
    }
}
