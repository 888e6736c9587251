use crate::app::input::helpers::{wrap_decrement, wrap_increment};
use crate::app::message::{AppEvent, Command, Selection, TreeRequest};
use crate::config::AppConfig;
use crate::detail::DetailPanel;
use crate::domain::{FamilyTreeData, Member};
use crate::error::FetchError;
use crate::request::{Generation, RequestTracker};
use crate::tree::{build_family_tree, MemberIndex, PersonCard, TreeLayout};
use crate::viewport::ViewportController;
use chrono::{Local, NaiveDate};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use kurbo::{Point, Size};
use ratatui::layout::Rect;
use std::time::Instant;
use throbber_widgets_tui::ThrobberState;

/// Members plus their one-off layout for the current load.
#[derive(Debug)]
pub struct LoadedTree {
    pub data: FamilyTreeData,
    pub layout: TreeLayout,
}

impl LoadedTree {
    pub fn member(&self, member_id: &str) -> Option<&Member> {
        MemberIndex::new(&self.data.members).get(member_id)
    }
}

#[derive(Debug)]
pub enum TreePage {
    Loading,
    Failed { message: String, retryable: bool },
    /// The backend answered but the root could not be resolved.
    Empty,
    Ready(Box<LoadedTree>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Help,
    Search,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub member_id: String,
    pub fullname: String,
    pub score: i64,
}

#[derive(Debug, Default)]
pub struct SearchState {
    pub query: String,
    pub hits: Vec<SearchHit>,
    pub selected: usize,
}

pub struct App {
    pub running: bool,
    pub config: AppConfig,
    pub page: TreePage,
    pub viewport: ViewportController,
    pub detail: DetailPanel,
    /// Index into `TreeLayout::persons`.
    pub focus: Option<usize>,
    pub overlay: Overlay,
    pub search: SearchState,
    pub status_message: String,
    pub throbber: ThrobberState,
    pub last_frame: Instant,
    /// Whole terminal area as of the last draw or resize.
    pub screen: Rect,
    /// Person under the pointer at press time; cleared once the press turns into a drag.
    pub pending_click: Option<String>,
    tree_requests: RequestTracker,
    commands: Vec<Command>,
    matcher: SkimMatcherV2,
    today: NaiveDate,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        Self {
            running: true,
            viewport: ViewportController::new(config.zoom),
            config,
            page: TreePage::Loading,
            detail: DetailPanel::new(),
            focus: None,
            overlay: Overlay::None,
            search: SearchState::default(),
            status_message: String::new(),
            throbber: ThrobberState::default(),
            last_frame: Instant::now(),
            screen: Rect::new(0, 0, 80, 24),
            pending_click: None,
            tree_requests: RequestTracker::default(),
            commands: Vec::new(),
            matcher: SkimMatcherV2::default(),
            today: Local::now().date_naive(),
        }
    }

    /// Advances the spinner at a fixed cadence.
    pub fn update(&mut self) {
        let now = Instant::now();
        if now.duration_since(self.last_frame).as_millis() >= 100 {
            self.last_frame = now;
            self.throbber.calc_next();
        }
    }

    pub const fn today(&self) -> NaiveDate {
        self.today
    }

    /// Side effects queued since the last call.
    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    pub fn loaded(&self) -> Option<&LoadedTree> {
        match &self.page {
            TreePage::Ready(tree) => Some(tree),
            _ => None,
        }
    }

    pub fn layout(&self) -> Option<&TreeLayout> {
        self.loaded().map(|tree| &tree.layout)
    }

    pub fn load_tree(&mut self) {
        let generation = self.tree_requests.issue();
        tracing::info!(tree_id = %self.config.tree_id, generation = generation.value(), "loading family tree");
        self.page = TreePage::Loading;
        self.status_message.clear();
        self.focus = None;
        self.pending_click = None;
        self.detail.close();
        self.commands.push(Command::FetchTree(TreeRequest {
            generation,
            tree_id: self.config.tree_id.clone(),
        }));
    }

    pub fn dispatch(&mut self, event: AppEvent) {
        match event {
            AppEvent::Selected(selection) => self.select(&selection),
            AppEvent::TreeLoaded { generation, result } => self.on_tree_loaded(generation, result),
            AppEvent::DetailLoaded(response) => {
                self.detail.commit(response);
            }
        }
    }

    /// Retries whatever failed last: the drawer first, then the whole tree.
    pub fn retry(&mut self) {
        if let Some(request) = self.detail.retry() {
            self.commands.push(Command::FetchDetail(request));
            return;
        }
        if matches!(self.page, TreePage::Failed { .. } | TreePage::Empty) {
            self.load_tree();
        }
    }

    pub fn close_detail(&mut self) {
        self.detail.close();
    }

    pub fn canvas_size(&self) -> Size {
        let canvas = crate::ui::frame_areas(self.screen).canvas;
        Size::new(f64::from(canvas.width), f64::from(canvas.height))
    }

    /// Person under a canvas-relative screen point.
    pub fn person_at_screen(&self, point: Point) -> Option<&PersonCard> {
        let logical = self.viewport.screen_to_logical(point);
        self.layout()?.person_at(logical)
    }

    pub fn focused_person(&self) -> Option<&PersonCard> {
        self.layout()?.persons().nth(self.focus?)
    }

    pub fn focus_next(&mut self) {
        let count = self.layout().map_or(0, TreeLayout::person_count);
        if count == 0 {
            return;
        }
        self.focus = Some(self.focus.map_or(0, |index| wrap_increment(index, count)));
        self.center_on_focus();
    }

    pub fn focus_prev(&mut self) {
        let count = self.layout().map_or(0, TreeLayout::person_count);
        if count == 0 {
            return;
        }
        self.focus = Some(self.focus.map_or(count - 1, |index| wrap_decrement(index, count)));
        self.center_on_focus();
    }

    pub fn focus_member(&mut self, member_id: &str) {
        self.focus = self
            .layout()
            .and_then(|layout| layout.persons().position(|p| p.member_id == member_id));
        self.center_on_focus();
    }

    pub fn select_focused(&mut self) {
        if let Some(member_id) = self.focused_person().map(|p| p.member_id.clone()) {
            self.dispatch(AppEvent::Selected(Selection { member_id }));
        }
    }

    pub fn center_view(&mut self) {
        let view = self.canvas_size();
        if let Some(size) = self.layout().map(|layout| layout.size) {
            self.viewport.center_content(size, view);
        }
    }

    pub fn reset_view(&mut self) {
        self.viewport.reset();
        self.center_view();
    }

    pub fn open_search(&mut self) {
        if self.loaded().is_some() {
            self.overlay = Overlay::Search;
            self.search = SearchState::default();
            self.refresh_search();
        }
    }

    pub fn search_push(&mut self, c: char) {
        self.search.query.push(c);
        self.refresh_search();
    }

    pub fn search_pop(&mut self) {
        self.search.query.pop();
        self.refresh_search();
    }

    pub fn search_move(&mut self, forward: bool) {
        let len = self.search.hits.len();
        self.search.selected = if forward {
            wrap_increment(self.search.selected, len)
        } else {
            wrap_decrement(self.search.selected, len)
        };
    }

    /// Focuses the highlighted hit and closes the search box.
    pub fn confirm_search(&mut self) {
        let hit = self.search.hits.get(self.search.selected).map(|hit| hit.member_id.clone());
        self.overlay = Overlay::None;
        if let Some(member_id) = hit {
            self.focus_member(&member_id);
        }
    }

    fn refresh_search(&mut self) {
        let query = self.search.query.trim();
        let mut hits: Vec<SearchHit> = match self.layout() {
            Some(layout) => layout
                .persons()
                .filter_map(|person| {
                    let score = if query.is_empty() {
                        0
                    } else {
                        self.matcher.fuzzy_match(&person.fullname, query)?
                    };
                    Some(SearchHit {
                        member_id: person.member_id.clone(),
                        fullname: person.fullname.clone(),
                        score,
                    })
                })
                .collect(),
            None => Vec::new(),
        };
        // Stable sort keeps display order among equal scores.
        hits.sort_by(|a, b| b.score.cmp(&a.score));
        self.search.hits = hits;
        self.search.selected = 0;
    }

    fn select(&mut self, selection: &Selection) {
        let Some(tree) = self.loaded() else {
            return;
        };
        if tree.member(&selection.member_id).is_none() {
            tracing::warn!(member_id = %selection.member_id, "selection of unknown member ignored");
            return;
        }
        // Focus follows the selection without moving the view under the pointer.
        self.focus = self
            .layout()
            .and_then(|layout| layout.persons().position(|p| p.member_id == selection.member_id));
        if let Some(request) = self.detail.open(&selection.member_id) {
            self.commands.push(Command::FetchDetail(request));
        }
    }

    fn on_tree_loaded(&mut self, generation: Generation, result: Result<FamilyTreeData, FetchError>) {
        if !self.tree_requests.accept(generation) {
            tracing::debug!(generation = generation.value(), "stale tree response dropped");
            return;
        }

        self.page = match result {
            Ok(data) => self.lay_out(data),
            Err(error) => {
                tracing::error!(%error, "family tree fetch failed");
                self.status_message = error.to_string();
                TreePage::Failed {
                    message: error.to_string(),
                    retryable: error.is_retryable(),
                }
            }
        };

        if matches!(self.page, TreePage::Ready(_)) {
            self.reset_view();
        }
    }

    fn lay_out(&mut self, data: FamilyTreeData) -> TreePage {
        let layout = match build_family_tree(&data) {
            Some(root) => TreeLayout::compute(&root, self.today),
            None => {
                tracing::warn!(root_id = %data.root_id, members = data.members.len(), "root member missing");
                self.status_message = FetchError::EmptyData.to_string();
                return TreePage::Empty;
            }
        };
        tracing::info!(
            members = data.members.len(),
            persons = layout.person_count(),
            "family tree ready"
        );
        self.status_message.clear();
        TreePage::Ready(Box::new(LoadedTree { data, layout }))
    }

    fn center_on_focus(&mut self) {
        let view = self.canvas_size();
        if let Some(center) = self.focused_person().map(|p| p.rect.center()) {
            self.viewport.center_on(center, view);
        }
    }
}
