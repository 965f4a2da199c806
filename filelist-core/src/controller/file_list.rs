//! src/controller/file_list.rs
//! ============================================================================
//! # `FileList`: the embeddable widget
//!
//! Owns the catalog, the search session and the confirmation state machine,
//! and talks to its collaborators (enumerators, file operator) through
//! trait objects chosen at construction. The host drives it with three
//! calls per cycle:
//!
//! ```rust,ignore
//! widget.handle_key(&key, Instant::now());   // or handle_mouse
//! widget.update(Instant::now());             // refresh, resort, search
//! widget.render(frame, area, Instant::now());
//! ```
//!
//! Failures never escape these calls. Listing failures become the catalog's
//! error flag; failed actions and directory changes become notifications the
//! host drains with [`FileList::take_notifications`].

use std::path::{Path, PathBuf};
use std::time::Instant;

use crossterm::event::{KeyEvent, KeyEventKind, MouseEvent};
use ratatui::{Frame, layout::Rect};
use tracing::{debug, info, instrument, warn};

use crate::config::FileListConfig;
use crate::controller::actions::{Action, Column};
use crate::controller::mode::{ConfirmInput, NavigationMode};
use crate::error::AppError;
use crate::fs::archive::TarEnumerator;
use crate::fs::enumerator::{ArchiveReader, DirEnumerator, EntryEnumerator};
use crate::fs::operations::{FileOperator, FsOperator, Operation, is_compressed};
use crate::fs::workdir;
use crate::model::catalog::{Classifier, EntryCatalog};
use crate::model::entry::{FileEntry, PARENT_ALIAS};
use crate::model::file_types::{FileTypeId, FileTypeRegistry};
use crate::model::notification::{Notification, NotificationQueue};
use crate::model::search::{SearchState, locate};
use crate::model::sort::SortField;
use crate::view::file_table::{FileTableView, TableModel};
use crate::view::layout::{self, RowMetrics};
use crate::view::scroll::NameScroller;
use crate::view::theme::Theme;

/// Where and how the widget was last drawn; mouse rows map through it.
#[derive(Debug, Clone, Copy)]
struct RenderGeometry {
    area: Rect,
    metrics: RowMetrics,
}

pub struct FileList {
    catalog: EntryCatalog,
    registry: FileTypeRegistry,
    options: FileListConfig,
    search: SearchState,
    mode: NavigationMode,

    dir_source: Box<dyn EntryEnumerator>,
    archive_reader: Option<Box<dyn ArchiveReader>>,
    operator: Box<dyn FileOperator>,

    notifications: NotificationQueue,
    settings_changed: bool,

    theme: Theme,
    scroller: NameScroller,
    last_render: Option<RenderGeometry>,
}

impl FileList {
    /// Widget over the real filesystem, with tar archives when enabled.
    #[must_use]
    pub fn new(options: FileListConfig) -> Self {
        let archives = options
            .archive_support
            .then(|| Box::new(TarEnumerator) as Box<dyn ArchiveReader>);
        Self::with_collaborators(
            options,
            Box::new(DirEnumerator),
            archives,
            Box::new(FsOperator::default()),
        )
    }

    #[must_use]
    pub fn with_collaborators(
        options: FileListConfig,
        dir_source: Box<dyn EntryEnumerator>,
        archive_reader: Option<Box<dyn ArchiveReader>>,
        operator: Box<dyn FileOperator>,
    ) -> Self {
        let root = workdir::absolute(&options.initial_dir)
            .or_else(|e| {
                warn!("Initial directory unusable, using working directory: {e}");
                workdir::ambient_dir()
            })
            .unwrap_or_else(|_| options.initial_dir.clone());
        info!("File list starting in {}", root.display());

        Self {
            catalog: EntryCatalog::new(root, options.max_entries),
            registry: options.type_registry(),
            theme: Theme::from_config(&options),
            options,
            search: SearchState::new(),
            mode: NavigationMode::Normal,
            dir_source,
            archive_reader,
            operator,
            notifications: NotificationQueue::default(),
            settings_changed: false,
            scroller: NameScroller::new(),
            last_render: None,
        }
    }

    // ------------------------------------------------------------------
    // Per-cycle work
    // ------------------------------------------------------------------

    /// Run pending work in order: search timeout, relisting, resort, then
    /// the lookup for the last typed character.
    pub fn update(&mut self, now: Instant) {
        if self.search.expire(now, self.options.search_timeout) {
            debug!("Search session timed out");
        }
        if self.catalog.needs_refresh() {
            self.refresh();
        }
        if self.catalog.needs_resort() {
            self.catalog.resort(&self.options.sort_key, &self.registry);
        }
        if self.search.take_dirty() {
            self.run_search();
        }
    }

    fn refresh(&mut self) {
        let classifier = Classifier {
            registry: &self.registry,
            archives: self.archive_reader.as_deref(),
            strip_names: self.options.strip_names,
        };
        let spec = &self.options.sort_key;

        match self.archive_reader.as_deref() {
            Some(reader) if self.catalog.in_archive() => {
                self.catalog.rebuild(reader, &classifier, spec);
            }
            _ => self.catalog.rebuild(self.dir_source.as_ref(), &classifier, spec),
        }
    }

    fn run_search(&mut self) {
        let names: Vec<&str> = self
            .catalog
            .entries()
            .iter()
            .map(|e| e.display.as_str())
            .collect();

        match locate(&names, self.search.pattern(), self.catalog.current_index()) {
            Some(index) => {
                debug!("Search {:?} found entry {index}", self.search.pattern());
                self.catalog.select(index);
            }
            None => {
                debug!("Search {:?} found nothing", self.search.pattern());
                self.search.mark_not_found();
            }
        }
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Handle a key press. Returns whether the widget consumed it.
    pub fn handle_key(&mut self, key: &KeyEvent, now: Instant) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }

        if self.mode.is_confirming() {
            let (next, operation) = self.mode.on_confirm_input(ConfirmInput::from_key(key));
            debug!("Confirm prompt: {:?} -> {next:?}", self.mode);
            self.mode = next;
            if let Some(operation) = operation {
                self.perform(operation);
            }
            return true;
        }

        match Action::from_key(key, self.search.is_active()) {
            Some(Action::SearchInput(c)) => {
                self.search.push(c, now);
                true
            }
            Some(action) => {
                self.search.clear();
                self.dispatch(action)
            }
            None => {
                self.search.clear();
                false
            }
        }
    }

    /// Handle a mouse event. Ignored while a prompt is showing.
    pub fn handle_mouse(&mut self, mouse: &MouseEvent) -> bool {
        if self.mode.is_confirming() {
            return false;
        }
        Action::from_mouse(mouse).is_some_and(|action| self.dispatch(action))
    }

    fn dispatch(&mut self, action: Action) -> bool {
        debug!(?action, "Dispatching");
        match action {
            Action::SearchInput(c) => self.search.push(c, Instant::now()),
            Action::ToggleColumn(column) => self.toggle_column(column),
            Action::ToggleSortKey(field) => self.toggle_sort_key(field),
            Action::ChangeDrive(letter) => self.change_drive(letter),
            Action::GoToRoot => self.go_to_root(),
            Action::Activate => return self.activate(),
            Action::GoToParent => self.go_up(),
            Action::MoveSelectionUp => self.catalog.move_by(-1),
            Action::MoveSelectionDown => self.catalog.move_by(1),
            Action::PageUp => self.catalog.page(false),
            Action::PageDown => self.catalog.page(true),
            Action::SelectFirst => self.catalog.move_first(),
            Action::SelectLast => self.catalog.move_last(),
            Action::Delete { immediate } => self.request(Operation::Delete, immediate),
            Action::Compress { immediate } => {
                if self.archive_reader.is_some() {
                    self.request(Operation::Compress, immediate);
                }
            }
            Action::Decompress => {
                if self.archive_reader.is_some()
                    && self
                        .catalog
                        .current_entry()
                        .is_some_and(|e| is_compressed(&e.name))
                {
                    self.request(Operation::Decompress, !self.options.confirm_decompress);
                }
            }
            Action::PointAt { column, row } => return self.point_at(column, row),
            Action::Click { column, row } => {
                if !self.point_at(column, row) {
                    return false;
                }
                return self.activate();
            }
        }
        true
    }

    fn toggle_column(&mut self, column: Column) {
        let flag = match column {
            Column::Size => &mut self.options.show_size,
            Column::Date => &mut self.options.show_date,
            Column::Time => &mut self.options.show_time,
        };
        *flag = !*flag;
        self.settings_changed = true;
    }

    fn toggle_sort_key(&mut self, field: SortField) {
        self.options.sort_key.toggle(field);
        info!("Sort keys now {}", self.options.sort_key);
        self.catalog.mark_resort();
        self.settings_changed = true;
    }

    /// Move the cursor to the row under an absolute cell. False when the
    /// cell lies outside the last rendered rectangle.
    fn point_at(&mut self, column: u16, row: u16) -> bool {
        let Some(geometry) = self.last_render else {
            return false;
        };
        let area = geometry.area;
        if column < area.x || column >= area.right() || row < area.y || row >= area.bottom() {
            return false;
        }

        let index = geometry
            .metrics
            .entry_at(row - area.y, self.catalog.window_start());
        self.catalog.select(index);
        true
    }

    // ------------------------------------------------------------------
    // Destructive actions
    // ------------------------------------------------------------------

    /// Start `operation` on the selected file, now or behind a prompt.
    fn request(&mut self, operation: Operation, immediate: bool) {
        let Some(entry) = self.catalog.current_entry() else {
            return;
        };
        if entry.is_dir || self.catalog.in_archive() {
            debug!("Refusing to {} {}", operation.operation_name(), entry.display);
            return;
        }

        if immediate {
            self.perform(operation);
        } else {
            self.mode = NavigationMode::confirming(operation);
        }
    }

    /// Run `operation` on the selected file, then relist and restore the
    /// cursor position as far as the new listing allows.
    #[instrument(level = "info", skip(self))]
    fn perform(&mut self, operation: Operation) {
        let Some(entry) = self.catalog.current_entry() else {
            return;
        };
        if entry.is_dir || self.catalog.in_archive() {
            return;
        }

        let path = entry.path.clone();
        let display = entry.display.clone();
        let previous = self.catalog.current_index();

        match self.operator.perform(operation, &path) {
            Ok(()) => self
                .notifications
                .success(format!("{} done: {display}", operation.operation_name())),
            Err(e) => {
                warn!("{} failed: {e}", operation.operation_name());
                self.notifications
                    .error(format!("Cannot {} {display}: {e}", operation.operation_name()));
            }
        }

        self.refresh();
        self.catalog.select(previous);
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Enter the selected directory or archive. False for plain files and
    /// archive members, which the host may open itself.
    fn activate(&mut self) -> bool {
        let Some(entry) = self.catalog.current_entry() else {
            return true;
        };

        if entry.is_parent_alias() {
            self.go_up();
        } else if self.catalog.in_archive() {
            debug!("Leaving archive member {} to the host", entry.display);
            return false;
        } else if entry.is_dir {
            let name = PathBuf::from(entry.name.as_str());
            self.change_dir(&name);
        } else if entry.is_archive {
            let path = entry.path.clone();
            self.enter_archive(path);
        } else {
            return false;
        }
        true
    }

    /// Leave the current directory or archive, highlighting it in the
    /// parent listing. A filesystem root has no parent and stays put.
    pub fn go_up(&mut self) {
        let root = self.catalog.root().to_path_buf();
        let left = root.file_name().map(|n| n.to_string_lossy().into_owned());

        if self.catalog.in_archive() {
            if let Some(parent) = root.parent() {
                info!("Leaving archive {}", root.display());
                self.catalog.set_root(parent.to_path_buf(), false);
                self.catalog.set_cdup_name(left);
            }
            return;
        }

        if root.parent().is_none() {
            return;
        }
        if self.change_dir(Path::new(PARENT_ALIAS)) {
            self.catalog.set_cdup_name(left);
        }
    }

    /// Change to `target`, resolved against the tracked directory.
    fn change_dir(&mut self, target: &Path) -> bool {
        match workdir::resolve_from(self.catalog.root(), target) {
            Ok(path) => {
                info!("Changing directory to {}", path.display());
                self.catalog.set_root(path, false);
                true
            }
            Err(e) => {
                self.navigation_failed(&e);
                false
            }
        }
    }

    fn enter_archive(&mut self, path: PathBuf) {
        info!("Entering archive {}", path.display());
        self.catalog.set_root(path, true);
    }

    /// Track `path`, made absolute against the ambient working directory.
    /// Returns false, changing nothing, when it cannot be resolved.
    pub fn set_current_dir(&mut self, path: &Path) -> bool {
        match workdir::absolute(path) {
            Ok(path) => {
                self.catalog.set_root(path, false);
                true
            }
            Err(e) => {
                debug!("Ignoring directory {}: {e}", path.display());
                false
            }
        }
    }

    fn go_to_root(&mut self) {
        let root = self.catalog.root();
        if let Some(top) = root.ancestors().last().map(Path::to_path_buf)
            && (top != root || self.catalog.in_archive())
        {
            info!("Going to filesystem root {}", top.display());
            self.catalog.set_root(top, false);
        }
    }

    fn change_drive(&mut self, letter: char) {
        if self.catalog.in_archive() {
            return;
        }
        self.change_dir(&workdir::drive_root(letter));
    }

    fn navigation_failed(&mut self, error: &AppError) {
        warn!("{error}");
        self.notifications.warning(error.to_string());
    }

    /// Relist on the next update.
    pub fn reload(&mut self) {
        self.catalog.mark_refresh();
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    /// Draw into `area`. Nothing is drawn when `area` is too small or not
    /// inside the frame.
    pub fn render(&mut self, frame: &mut Frame<'_>, area: Rect, now: Instant) {
        if !layout::fits(area, frame.area()) {
            return;
        }

        let metrics = RowMetrics::new(
            area.height,
            self.options.interline(),
            self.options.show_status,
        );
        self.catalog.fit_window(metrics.list_rows);
        self.last_render = Some(RenderGeometry { area, metrics });

        let model = TableModel {
            root: self.catalog.root(),
            entries: self.catalog.entries(),
            current: self.catalog.current_index(),
            window_start: self.catalog.window_start(),
            error: self.catalog.has_error(),
            mode: self.mode,
            search: &self.search,
            options: &self.options,
            theme: &self.theme,
            metrics,
        };
        FileTableView::new(model).render(frame, area, &mut self.scroller, now);
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[must_use]
    pub fn current_entry(&self) -> Option<&FileEntry> {
        self.catalog.current_entry()
    }

    #[must_use]
    pub fn current_path(&self) -> Option<&Path> {
        self.current_entry().map(|e| e.path.as_path())
    }

    #[must_use]
    pub fn current_display_name(&self) -> Option<&str> {
        self.current_entry().map(|e| e.display.as_str())
    }

    #[must_use]
    pub fn current_type_id(&self) -> Option<FileTypeId> {
        self.current_entry()
            .and_then(|e| e.type_index)
            .and_then(|i| self.registry.get(i))
            .map(|t| t.id)
    }

    /// True on an empty listing.
    #[must_use]
    pub fn is_current_dir(&self) -> bool {
        self.current_entry().is_none_or(|e| e.is_dir)
    }

    /// True on an empty listing.
    #[must_use]
    pub fn is_current_archive(&self) -> bool {
        self.current_entry().is_none_or(|e| e.is_archive)
    }

    /// Directory or archive being listed.
    #[must_use]
    pub fn current_dir(&self) -> &Path {
        self.catalog.root()
    }

    #[must_use]
    pub const fn mode(&self) -> NavigationMode {
        self.mode
    }

    #[must_use]
    pub const fn search(&self) -> &SearchState {
        &self.search
    }

    #[must_use]
    pub const fn catalog(&self) -> &EntryCatalog {
        &self.catalog
    }

    #[must_use]
    pub const fn options(&self) -> &FileListConfig {
        &self.options
    }

    /// Whether an option changed since construction and should be saved.
    #[must_use]
    pub const fn settings_changed(&self) -> bool {
        self.settings_changed
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain()
    }
}
