//! Searchable combobox: a text field that filters a floating menu of items.
//!
//! Typing filters the candidate list in place, arrow keys move a roving
//! highlight through the matches, and Enter or a click commits the
//! highlighted item. The menu flips above the field or right-aligns when the
//! viewport is too small, and any press outside it closes it.
//!
//! The combobox listens to the document bus itself for pointer and resize
//! events, so the host only forwards key presses and focus changes. Committed
//! changes come back as [`Message::Changed`]; rejected property updates as
//! [`Message::ConfigurationFailed`].
//!
//! # Example
//!
//! ```ignore
//! use forma_widgets::combobox::{Combobox, ComboboxProps, Item, Message};
//!
//! let (fruit, cmd) = Combobox::new(ComboboxProps {
//!     label: "Fruit".into(),
//!     items: vec![Item::labeled("1", "Apple"), Item::labeled("2", "Banana")],
//!     value: "1".into(),
//!     ..ComboboxProps::default()
//! });
//!
//! // In the parent's update:
//! match msg {
//!     Msg::Fruit(Message::Changed(change)) => save(&change.value),
//!     Msg::Fruit(m) => return self.fruit.update(m).map(Msg::Fruit),
//! }
//! ```

pub mod debounce;
pub mod dismiss;
pub mod highlight;
mod keys;
pub mod matcher;
pub mod position;
pub mod props;
mod view;

pub use highlight::MenuState;
pub use keys::ComboboxKeyBindings;
pub use matcher::MatchingSet;
pub use position::{MenuGeometry, Scrollbars};
pub use props::{ComboboxProps, ConfigurationError, Item, Property};

use crate::text_edit::TextEditState;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use debounce::{RepositionTimer, REPOSITION_DELAY};
use dismiss::{DismissalListener, SETTLE_DELAY};
use forma_core::subscription::subscribe;
use forma_core::{document_events, After, Command, Component, Subscription, TerminalEvent};
use highlight::MenuScroll;
use position::Measurements;
use ratatui::layout::{Margin, Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::Frame;
use std::cell::Cell;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use unicode_width::UnicodeWidthStr;

/// Narrowest the control is drawn, in cells.
pub const MIN_CONTROL_WIDTH: u16 = 18;
/// Narrowest the menu is drawn, in cells.
pub const MIN_MENU_WIDTH: u16 = 28;
/// Rows shown before the menu scrolls.
pub const DEFAULT_MAX_VISIBLE: usize = 8;

// Borders plus the check-mark column.
const MENU_CHROME: u16 = 4;

/// Process-unique identity of one combobox.
///
/// Every listener and timer the combobox declares is keyed by it, so two
/// instances never share a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(u64);

impl InstanceId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        InstanceId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "combobox-{}", self.0)
    }
}

/// Payload of [`Message::Changed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub old_value: String,
    pub value: String,
}

/// Messages for the combobox component.
#[derive(Debug, Clone)]
pub enum Message {
    /// A key press while the combobox has focus.
    KeyPress(KeyEvent),
    /// Bracketed paste while the combobox has focus.
    Paste(String),
    /// The host moved focus to the combobox.
    Focus,
    /// The host moved focus away.
    Blur,
    /// A pointer event from the document bus.
    Pointer(MouseEvent),
    /// The viewport was resized.
    WindowResized,
    /// Recompute menu geometry from the last render.
    Reposition,
    /// The reposition delay elapsed.
    RepositionElapsed,
    /// The dismissal listener finished attaching or detaching.
    DismissalSettled,

    SetItems(Vec<Item>),
    SetValue(String),
    SetLabel(String),
    SetDisabled(bool),
    SetRequiredIcon(bool),
    SetVisible(bool),
    SetError(String),
    SetLanguage(String),
    /// Untyped property assignment, validated before it is applied.
    SetProperty {
        name: String,
        value: serde_json::Value,
    },

    /// Emitted: the user committed a different value.
    Changed(ChangeEvent),
    /// Emitted: a property update was rejected and the previous state kept.
    ConfigurationFailed(ConfigurationError),
    /// Emitted: the pointer pressed the field; the host should focus it.
    FocusRequested,
}

/// Style configuration for the combobox.
#[derive(Debug, Clone)]
pub struct ComboboxStyle {
    /// Text in the field.
    pub text: Style,
    /// Text in the field while it is all selected.
    pub selected_text: Style,
    /// The caret cell.
    pub cursor: Style,
    /// Text while disabled.
    pub disabled_text: Style,
    /// The toggle icon.
    pub button: Style,
    /// Menu rows.
    pub item: Style,
    /// The highlighted menu row.
    pub highlighted_item: Style,
    /// The check mark on the committed item.
    pub check: Style,
    /// Patched onto the part of a row that matches the query.
    pub match_emphasis: Style,
}

impl Default for ComboboxStyle {
    fn default() -> Self {
        Self {
            text: Style::default(),
            selected_text: Style::default().add_modifier(Modifier::REVERSED),
            cursor: Style::default().add_modifier(Modifier::REVERSED),
            disabled_text: Style::default().fg(Color::DarkGray),
            button: Style::default().fg(Color::Cyan),
            item: Style::default(),
            highlighted_item: Style::default().fg(Color::Black).bg(Color::Cyan),
            check: Style::default().fg(Color::Cyan),
            match_emphasis: Style::default().add_modifier(Modifier::BOLD),
        }
    }
}

/// What [`Combobox::aria`] reports for assistive technology bridges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aria {
    pub expanded: bool,
    /// Id of the highlighted menu row.
    pub active_descendant: Option<String>,
    pub required: bool,
    pub disabled: bool,
    /// Id of the label element.
    pub labelled_by: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Row(usize),
    Menu,
    Button,
    Input,
    Outside,
}

/// A searchable combobox.
pub struct Combobox {
    id: InstanceId,
    items: Vec<Item>,
    value: String,
    label: String,
    disabled: bool,
    required_icon: bool,
    visible: bool,
    error: String,
    language: String,

    text: TextEditState,
    query: String,
    matching: MatchingSet,
    menu: MenuState,
    scroll: MenuScroll,
    hovering: bool,
    focused: bool,

    geometry: Option<MenuGeometry>,
    measured: Cell<Option<Measurements>>,
    dismissal: DismissalListener,
    reposition: RepositionTimer,

    max_visible: usize,
    min_menu_width: u16,
    scrollbars: Scrollbars,
    reposition_delay: Duration,
    open_on_focus: bool,
    style: ComboboxStyle,
    key_bindings: ComboboxKeyBindings,
}

impl Combobox {
    /// Create a combobox from initial props.
    ///
    /// Invalid props fall back to their defaults; the returned command
    /// reports each rejection as [`Message::ConfigurationFailed`].
    pub fn new(props: ComboboxProps) -> (Self, Command<Message>) {
        let mut rejected = Vec::new();
        let items = match props::validate_items(&props.items) {
            Ok(()) => props.items,
            Err(err) => {
                rejected.push(err);
                Vec::new()
            }
        };

        let mut combobox = Self {
            id: InstanceId::next(),
            items,
            value: props.value,
            label: props.label,
            disabled: props.disabled,
            required_icon: props.required_icon,
            visible: props.visible,
            error: props.error,
            language: props.language,
            text: TextEditState::new(),
            query: String::new(),
            matching: MatchingSet::default(),
            menu: MenuState::Closed,
            scroll: MenuScroll::default(),
            hovering: false,
            focused: false,
            geometry: None,
            measured: Cell::new(None),
            dismissal: DismissalListener::Detached,
            reposition: RepositionTimer::Idle,
            max_visible: DEFAULT_MAX_VISIBLE,
            min_menu_width: MIN_MENU_WIDTH,
            scrollbars: Scrollbars::default(),
            reposition_delay: REPOSITION_DELAY,
            open_on_focus: true,
            style: ComboboxStyle::default(),
            key_bindings: ComboboxKeyBindings::default(),
        };
        combobox.revert_text();

        let cmd = Command::batch(rejected.into_iter().map(|err| combobox.reject(err)));
        (combobox, cmd)
    }

    /// Rows shown before the menu scrolls.
    pub fn with_max_visible(mut self, rows: usize) -> Self {
        self.max_visible = rows.max(1);
        self
    }

    pub fn with_min_menu_width(mut self, width: u16) -> Self {
        self.min_menu_width = width;
        self
    }

    pub fn with_style(mut self, style: ComboboxStyle) -> Self {
        self.style = style;
        self
    }

    /// Cells the host reserves on the viewport's right and bottom edges.
    pub fn with_scrollbars(mut self, scrollbars: Scrollbars) -> Self {
        self.scrollbars = scrollbars;
        self
    }

    /// Delay between a resize or scroll and the reposition it triggers.
    pub fn with_reposition_delay(mut self, delay: Duration) -> Self {
        self.reposition_delay = delay;
        self
    }

    /// Whether gaining focus opens the menu (default: true).
    pub fn with_open_on_focus(mut self, open: bool) -> Self {
        self.open_on_focus = open;
        self
    }

    pub fn with_key_bindings(mut self, bindings: ComboboxKeyBindings) -> Self {
        self.key_bindings = bindings;
        self
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// The committed value; empty when nothing is selected.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The text currently in the field.
    pub fn text(&self) -> String {
        self.text.value()
    }

    /// The active filter; empty when unfiltered.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn error(&self) -> &str {
        &self.error
    }

    /// Font hint from the host. Terminal rendering does not use it.
    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_required(&self) -> bool {
        self.required_icon
    }

    pub fn is_open(&self) -> bool {
        self.menu.is_open()
    }

    pub fn menu_state(&self) -> MenuState {
        self.menu
    }

    pub fn matching(&self) -> &MatchingSet {
        &self.matching
    }

    /// The items shown in the menu, in order.
    pub fn matching_items(&self) -> impl Iterator<Item = &Item> + '_ {
        self.matching.iter().filter_map(|i| self.items.get(i))
    }

    pub fn highlighted_item(&self) -> Option<&Item> {
        self.menu
            .highlighted()
            .and_then(|pos| self.matching.get(pos))
            .and_then(|i| self.items.get(i))
    }

    /// Geometry from the last reposition, if the menu has been placed.
    pub fn geometry(&self) -> Option<MenuGeometry> {
        self.geometry
    }

    pub fn key_bindings(&self) -> &ComboboxKeyBindings {
        &self.key_bindings
    }

    pub fn aria(&self) -> Aria {
        Aria {
            expanded: self.menu.is_open(),
            active_descendant: self
                .menu
                .highlighted()
                .map(|pos| format!("{}-menuitem-{}", self.id, pos)),
            required: self.required_icon,
            disabled: self.disabled,
            labelled_by: format!("{}-label", self.id),
        }
    }

    fn interactive(&self) -> bool {
        self.visible && !self.disabled
    }

    fn selected_item(&self) -> Option<&Item> {
        self.items.iter().find(|item| item.value == self.value)
    }

    fn selected_label(&self) -> String {
        self.selected_item()
            .map(|item| item.display_text().to_owned())
            .unwrap_or_default()
    }

    fn selected_row(&self) -> Option<usize> {
        let index = self.items.iter().position(|item| item.value == self.value)?;
        self.matching.position_of(index)
    }

    /// Show the selected label, drop the filter, and rebuild the matches.
    fn revert_text(&mut self) {
        let label = self.selected_label();
        if self.text.value() != label {
            self.text.set_value(&label);
        }
        self.query.clear();
        self.rebuild_matches();
    }

    fn rebuild_matches(&mut self) {
        self.matching = MatchingSet::build(&self.items, &self.query);
        if self.matching.is_empty() {
            self.close_menu();
        } else if self.menu.is_open() {
            self.menu = MenuState::reset(self.preferred_row());
            self.scroll.reset();
            self.follow_highlight();
        }
    }

    /// The selected item when shown; otherwise the first match of a filter.
    fn preferred_row(&self) -> Option<usize> {
        self.selected_row()
            .or_else(|| (!self.query.is_empty() && !self.matching.is_empty()).then_some(0))
    }

    fn visible_rows(&self) -> usize {
        match self.geometry {
            Some(geometry) => usize::from(geometry.height.saturating_sub(2)),
            None => self.matching.len().min(self.max_visible),
        }
    }

    fn follow_highlight(&mut self) {
        let rows = self.visible_rows();
        if let Some(pos) = self.menu.highlighted() {
            self.scroll.ensure_visible(pos, rows);
        }
        self.scroll.clamp(self.matching.len(), rows);
    }

    /// Full-size menu for the current matches, no wider than the viewport.
    fn natural_menu_size(&self, viewport_width: u16) -> Size {
        let rows = self.matching.len().min(self.max_visible);
        let widest = self
            .matching_items()
            .map(|item| item.display_text().width())
            .max()
            .unwrap_or(0);
        let width = u16::try_from(widest)
            .unwrap_or(u16::MAX)
            .saturating_add(MENU_CHROME)
            .max(self.min_menu_width)
            .min(viewport_width);
        Size {
            width,
            height: u16::try_from(rows).unwrap_or(u16::MAX).saturating_add(2),
        }
    }

    fn relayout(&self) -> Command<Message> {
        if self.menu.is_open() {
            Command::after_render(Message::Reposition)
        } else {
            Command::none()
        }
    }

    fn open_menu(&mut self) -> Command<Message> {
        if !self.interactive() || self.menu.is_open() || self.matching.is_empty() {
            return Command::none();
        }
        self.menu = self.menu.open(self.selected_row());
        self.scroll.reset();
        self.follow_highlight();
        self.dismissal = self.dismissal.sync(true);
        tracing::debug!(id = %self.id, rows = self.matching.len(), "menu opened");
        self.relayout()
    }

    fn close_menu(&mut self) -> Command<Message> {
        if !self.menu.is_open() {
            return Command::none();
        }
        self.menu = self.menu.close();
        self.geometry = None;
        self.hovering = false;
        self.scroll.reset();
        self.reposition = RepositionTimer::Idle;
        self.dismissal = self.dismissal.sync(false);
        tracing::debug!(id = %self.id, "menu closed");
        Command::none()
    }

    fn toggle_menu(&mut self) -> Command<Message> {
        if self.menu.is_open() {
            self.close_menu()
        } else {
            self.open_menu()
        }
    }

    /// Revert and close: outside press, blur, or Escape.
    fn dismiss(&mut self) -> Command<Message> {
        self.revert_text();
        self.close_menu()
    }

    /// Stop reacting to anything: hidden or disabled.
    fn go_inert(&mut self) {
        self.close_menu();
        self.dismissal = DismissalListener::Detached;
        self.reposition = RepositionTimer::Idle;
        self.focused = false;
    }

    /// Query follows the text; the menu opens on matches and closes on none.
    fn text_edited(&mut self) -> Command<Message> {
        self.query = self.text.value();
        self.matching = MatchingSet::build(&self.items, &self.query);
        if self.matching.is_empty() {
            return self.close_menu();
        }
        let opened = self.open_menu();
        self.menu = MenuState::reset(self.preferred_row());
        self.scroll.reset();
        self.follow_highlight();
        if opened.is_none() {
            self.relayout()
        } else {
            opened
        }
    }

    fn commit_row(&mut self, pos: usize) -> Command<Message> {
        let Some(index) = self.matching.get(pos) else {
            return Command::none();
        };
        let Some(item) = self.items.get(index) else {
            return Command::none();
        };
        let value = item.value.clone();
        let changed = if value == self.value {
            Command::none()
        } else {
            let old_value = std::mem::replace(&mut self.value, value.clone());
            tracing::debug!(id = %self.id, %old_value, %value, "value committed");
            Command::message(Message::Changed(ChangeEvent { old_value, value }))
        };
        self.revert_text();
        Command::batch([changed, self.close_menu()])
    }

    fn reject(&self, err: ConfigurationError) -> Command<Message> {
        tracing::warn!(id = %self.id, error = %err, "property update rejected");
        Command::message(Message::ConfigurationFailed(err))
    }

    fn set_items(&mut self, items: Vec<Item>) -> Command<Message> {
        if let Err(err) = props::validate_items(&items) {
            return self.reject(err);
        }
        self.items = items;
        if self.query.is_empty() {
            self.revert_text();
        } else {
            self.rebuild_matches();
        }
        self.relayout()
    }

    fn set_value(&mut self, value: String) -> Command<Message> {
        self.value = value;
        self.revert_text();
        Command::none()
    }

    fn apply(&mut self, property: Property) -> Command<Message> {
        match property {
            Property::Items(items) => self.set_items(items),
            Property::Value(value) => self.set_value(value),
            Property::Label(label) => {
                self.label = label;
                self.relayout()
            }
            Property::Disabled(disabled) => {
                self.disabled = disabled;
                if disabled {
                    self.go_inert();
                }
                Command::none()
            }
            Property::RequiredIcon(required) => {
                self.required_icon = required;
                Command::none()
            }
            Property::Visible(visible) => {
                self.visible = visible;
                if !visible {
                    self.go_inert();
                }
                Command::none()
            }
            Property::Error(error) => {
                self.error = error;
                self.relayout()
            }
            Property::Language(language) => {
                self.language = language;
                Command::none()
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Command<Message> {
        if !self.interactive() || key.kind == KeyEventKind::Release {
            return Command::none();
        }
        let len = self.matching.len();
        let open = self.menu.is_open();
        let keys = &self.key_bindings;

        if keys.next.matches(&key) || keys.prev.matches(&key) {
            if !open {
                return self.open_menu();
            }
            self.menu = if keys.next.matches(&key) {
                self.menu.next(len)
            } else {
                self.menu.prev(len)
            };
            self.follow_highlight();
            Command::none()
        } else if keys.first.matches(&key) {
            if open {
                self.menu = self.menu.first(len);
                self.follow_highlight();
            } else {
                self.text.move_home();
            }
            Command::none()
        } else if keys.last.matches(&key) {
            if open {
                self.menu = self.menu.last(len);
                self.follow_highlight();
            } else {
                self.text.move_end();
            }
            Command::none()
        } else if keys.commit.matches(&key) {
            match self.menu.highlighted() {
                Some(pos) => self.commit_row(pos),
                None => Command::none(),
            }
        } else if keys.cancel.matches(&key) {
            self.dismiss()
        } else if keys.close.matches(&key) {
            self.close_menu()
        } else if keys.delete_word.matches(&key) {
            if self.text.delete_word_back() {
                self.text_edited()
            } else {
                Command::none()
            }
        } else {
            match key.code {
                KeyCode::Backspace if self.text.delete_back() => self.text_edited(),
                KeyCode::Delete if self.text.delete_forward() => self.text_edited(),
                KeyCode::Left => {
                    self.text.move_left();
                    Command::none()
                }
                KeyCode::Right => {
                    self.text.move_right();
                    Command::none()
                }
                KeyCode::Char(c)
                    if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
                {
                    self.text.insert_char(c);
                    self.text_edited()
                }
                _ => Command::none(),
            }
        }
    }

    fn hit_test(&self, measured: &Measurements, pos: Position) -> Target {
        if let Some(menu) = measured.menu.filter(|_| self.menu.is_open()) {
            if menu.contains(pos) {
                let rows = menu.inner(Margin::new(1, 1));
                if rows.contains(pos) {
                    let row = usize::from(pos.y - rows.y) + self.scroll.offset();
                    if row < self.matching.len() {
                        return Target::Row(row);
                    }
                }
                return Target::Menu;
            }
        }
        if measured.button.contains(pos) {
            Target::Button
        } else if measured.control.contains(pos) {
            Target::Input
        } else {
            Target::Outside
        }
    }

    fn handle_pointer(&mut self, event: MouseEvent) -> Command<Message> {
        if !self.interactive() {
            return Command::none();
        }
        let Some(measured) = self.measured.get() else {
            return Command::none();
        };
        let target = self.hit_test(&measured, Position::new(event.column, event.row));

        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => self.press(target),
            MouseEventKind::Moved => {
                match target {
                    Target::Row(pos) => {
                        self.hovering = true;
                        self.menu = self.menu.hover(pos, self.matching.len());
                    }
                    Target::Menu => self.hovering = true,
                    _ if self.hovering => {
                        self.hovering = false;
                        self.menu = self.menu.clear();
                    }
                    _ => {}
                }
                Command::none()
            }
            MouseEventKind::ScrollDown | MouseEventKind::ScrollUp => {
                if matches!(target, Target::Row(_) | Target::Menu) {
                    let delta = if event.kind == MouseEventKind::ScrollDown { 1 } else { -1 };
                    self.scroll
                        .scroll_by(delta, self.matching.len(), self.visible_rows());
                    Command::none()
                } else {
                    self.schedule_reposition()
                }
            }
            _ => Command::none(),
        }
    }

    fn press(&mut self, target: Target) -> Command<Message> {
        if let Target::Row(pos) = target {
            return self.commit_row(pos);
        }
        if self.dismissal.is_listening() {
            // Presses on the field itself end here too: the menu closes and
            // the field's own handlers do not run.
            tracing::debug!(id = %self.id, ?target, "dismissed by press");
            return self.dismiss();
        }
        match target {
            Target::Button => {
                self.focused = true;
                self.revert_text();
                self.text.select_all();
                let toggled = self.toggle_menu();
                Command::batch([Command::message(Message::FocusRequested), toggled])
            }
            Target::Input => {
                self.focused = true;
                self.text.select_all();
                self.rebuild_matches();
                let shown = if self.matching.is_empty() {
                    self.close_menu()
                } else {
                    self.open_menu()
                };
                Command::batch([Command::message(Message::FocusRequested), shown])
            }
            Target::Row(_) | Target::Menu | Target::Outside => Command::none(),
        }
    }

    fn schedule_reposition(&mut self) -> Command<Message> {
        if self
            .reposition
            .schedule(Instant::now(), self.reposition_delay, self.menu.is_open())
        {
            tracing::trace!(id = %self.id, "reposition scheduled");
        }
        Command::none()
    }

    fn reposition(&mut self) -> Command<Message> {
        if !self.menu.is_open() || !self.visible {
            return Command::none();
        }
        let Some(measured) = self.measured.get() else {
            tracing::trace!(id = %self.id, "reposition skipped: not rendered yet");
            return Command::none();
        };
        let natural = self.natural_menu_size(measured.viewport.width);
        let geometry =
            MenuGeometry::compute(measured.control, measured.viewport, self.scrollbars, natural);
        tracing::trace!(id = %self.id, ?geometry, "menu repositioned");
        self.geometry = Some(geometry);
        self.follow_highlight();
        Command::none()
    }
}

impl Component for Combobox {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::KeyPress(key) => self.handle_key(key),
            Message::Paste(text) => {
                if !self.interactive() || self.text.insert_str(&text) == 0 {
                    return Command::none();
                }
                self.text_edited()
            }
            Message::Focus => {
                if !self.interactive() {
                    return Command::none();
                }
                self.focused = true;
                self.text.select_all();
                if self.open_on_focus {
                    self.open_menu()
                } else {
                    Command::none()
                }
            }
            Message::Blur => {
                self.focused = false;
                self.dismiss()
            }
            Message::Pointer(event) => self.handle_pointer(event),
            Message::WindowResized => self.schedule_reposition(),
            Message::RepositionElapsed => {
                if self.reposition.fire() {
                    self.relayout()
                } else {
                    Command::none()
                }
            }
            Message::Reposition => self.reposition(),
            Message::DismissalSettled => {
                self.dismissal = self.dismissal.settle();
                tracing::debug!(id = %self.id, state = ?self.dismissal, "dismissal listener settled");
                Command::none()
            }
            Message::SetItems(items) => self.apply(Property::Items(items)),
            Message::SetValue(value) => self.apply(Property::Value(value)),
            Message::SetLabel(label) => self.apply(Property::Label(label)),
            Message::SetDisabled(disabled) => self.apply(Property::Disabled(disabled)),
            Message::SetRequiredIcon(required) => self.apply(Property::RequiredIcon(required)),
            Message::SetVisible(visible) => self.apply(Property::Visible(visible)),
            Message::SetError(error) => self.apply(Property::Error(error)),
            Message::SetLanguage(language) => self.apply(Property::Language(language)),
            Message::SetProperty { name, value } => match Property::parse(&name, value) {
                Ok(property) => self.apply(property),
                Err(err) => self.reject(err),
            },
            Message::Changed(_) | Message::ConfigurationFailed(_) | Message::FocusRequested => {
                Command::none()
            }
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        self.render(frame, area);
    }

    fn subscriptions(&self) -> Vec<Subscription<Message>> {
        if !self.interactive() {
            return Vec::new();
        }
        let id = self.id.get();
        let mut subs = vec![document_events(id, |event| match event {
            TerminalEvent::Mouse(mouse) => Some(Message::Pointer(mouse)),
            TerminalEvent::Resize(..) => Some(Message::WindowResized),
            _ => None,
        })];
        if self.dismissal.is_settling() {
            subs.push(
                subscribe(After::keyed(SETTLE_DELAY, ("dismissal", id)))
                    .map(|_| Message::DismissalSettled),
            );
        }
        if self.reposition.is_pending() {
            subs.push(
                subscribe(After::keyed(self.reposition_delay, ("reposition", id)))
                    .map(|_| Message::RepositionElapsed),
            );
        }
        subs
    }

    fn focused(&self) -> bool {
        self.focused
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use forma_core::testing::TestProgram;
    use forma_core::Model;
    use position::Placement;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use serde_json::json;

    fn key(code: KeyCode) -> Message {
        Message::KeyPress(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn click(column: u16, row: u16) -> Message {
        mouse(MouseEventKind::Down(MouseButton::Left), column, row)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Message {
        Message::Pointer(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn fruit_props() -> ComboboxProps {
        ComboboxProps {
            label: "Fruit".into(),
            items: vec![
                Item::labeled("1", "Apple"),
                Item::labeled("2", "Banana"),
                Item::labeled("3", "Cherry"),
                Item::labeled("4", "Pineapple"),
            ],
            value: "1".into(),
            ..ComboboxProps::default()
        }
    }

    fn fruit() -> Combobox {
        let (cb, cmd) = Combobox::new(fruit_props());
        assert!(cmd.is_none());
        cb
    }

    fn type_text(cb: &mut Combobox, text: &str) -> Vec<Message> {
        let mut emitted = Vec::new();
        for c in text.chars() {
            emitted.extend(cb.update(key(KeyCode::Char(c))).into_messages().0);
        }
        emitted
    }

    fn changes(messages: Vec<Message>) -> Vec<ChangeEvent> {
        messages
            .into_iter()
            .filter_map(|m| match m {
                Message::Changed(change) => Some(change),
                _ => None,
            })
            .collect()
    }

    fn failures(cmd: Command<Message>) -> Vec<ConfigurationError> {
        cmd.into_messages()
            .0
            .into_iter()
            .filter_map(|m| match m {
                Message::ConfigurationFailed(err) => Some(err),
                _ => None,
            })
            .collect()
    }

    /// Draw into a 40x20 viewport so pointer events have something to hit.
    /// Label on row 0, toggle on rows 1..4 (columns 0..18), menu from row 4.
    fn draw(cb: &Combobox) -> String {
        let mut terminal = Terminal::new(TestBackend::new(40, 20)).unwrap();
        terminal.draw(|f| cb.view(f, f.area())).unwrap();
        forma_core::testing::buffer_to_string(terminal.backend().buffer())
    }

    #[test]
    fn initial_text_is_selected_label() {
        let cb = fruit();
        assert_eq!(cb.text(), "Apple");
        assert_eq!(cb.query(), "");
        assert!(!cb.is_open());
        assert_eq!(cb.matching().len(), 4);
    }

    #[test]
    fn instances_get_distinct_ids() {
        assert_ne!(fruit().id(), fruit().id());
    }

    #[test]
    fn typing_filters_then_enter_commits() {
        let mut cb = fruit();
        cb.update(Message::Focus);
        let emitted = type_text(&mut cb, "ban");
        assert!(emitted.is_empty());

        assert_eq!(cb.query(), "ban");
        let shown: Vec<_> = cb.matching_items().cloned().collect();
        assert_eq!(shown, vec![Item::labeled("2", "Banana")]);
        assert!(cb.is_open());

        let (now, _) = cb.update(key(KeyCode::Enter)).into_messages();
        assert_eq!(
            changes(now),
            vec![ChangeEvent {
                old_value: "1".into(),
                value: "2".into()
            }]
        );
        assert_eq!(cb.value(), "2");
        assert_eq!(cb.text(), "Banana");
        assert_eq!(cb.query(), "");
        assert!(!cb.is_open());
    }

    #[test]
    fn committing_the_selected_value_emits_nothing() {
        let mut cb = fruit();
        cb.update(Message::Focus);
        type_text(&mut cb, "app");
        assert_eq!(cb.highlighted_item(), Some(&Item::labeled("1", "Apple")));

        let (now, _) = cb.update(key(KeyCode::Enter)).into_messages();
        assert!(changes(now).is_empty());
        assert_eq!(cb.text(), "Apple");
        assert_eq!(cb.query(), "");
        assert!(!cb.is_open());
    }

    #[test]
    fn different_value_emits_exactly_one_change() {
        let mut cb = fruit();
        cb.update(Message::Focus);
        cb.update(key(KeyCode::Down));
        let (now, _) = cb.update(key(KeyCode::Enter)).into_messages();
        assert_eq!(
            changes(now),
            vec![ChangeEvent {
                old_value: "1".into(),
                value: "2".into()
            }]
        );
    }

    #[test]
    fn enter_without_highlight_does_nothing() {
        let (mut cb, _) = Combobox::new(ComboboxProps {
            value: String::new(),
            ..fruit_props()
        });
        cb.update(Message::Focus);
        assert_eq!(cb.menu_state(), MenuState::OpenNoHighlight);
        let cmd = cb.update(key(KeyCode::Enter));
        assert!(cmd.is_none());
        assert!(cb.is_open());
    }

    #[test]
    fn zero_matches_closes_and_refocus_reopens_full_list() {
        let mut cb = fruit();
        cb.update(Message::Focus);
        type_text(&mut cb, "zzz");
        assert!(!cb.is_open());
        assert!(cb.matching().is_empty());

        cb.update(Message::Blur);
        assert_eq!(cb.query(), "");
        cb.update(Message::Focus);
        assert!(cb.is_open());
        assert_eq!(cb.matching().len(), cb.items().len());
    }

    #[test]
    fn backspacing_back_to_matches_reopens() {
        let mut cb = fruit();
        cb.update(Message::Focus);
        type_text(&mut cb, "bx");
        assert!(!cb.is_open());
        cb.update(key(KeyCode::Backspace));
        assert!(cb.is_open());
        assert_eq!(cb.query(), "b");
    }

    #[test]
    fn special_characters_are_matched_literally() {
        let mut cb = fruit();
        cb.update(Message::Focus);
        type_text(&mut cb, "a(");
        assert!(cb.matching().is_empty());
        assert!(!cb.is_open());
    }

    #[test]
    fn opening_twice_is_idempotent() {
        let mut cb = fruit();
        cb.update(Message::Focus);
        cb.update(key(KeyCode::Down));
        let state = cb.menu_state();
        let matching = cb.matching().clone();

        cb.update(Message::Focus);
        assert_eq!(cb.menu_state(), state);
        assert_eq!(cb.matching(), &matching);
    }

    #[test]
    fn arrow_opens_with_selection_highlighted() {
        let (mut cb, _) = Combobox::new(ComboboxProps {
            value: "3".into(),
            ..fruit_props()
        });
        cb.update(Message::Focus);
        cb.update(key(KeyCode::Esc));
        assert!(!cb.is_open());

        cb.update(key(KeyCode::Up));
        assert_eq!(cb.menu_state(), MenuState::OpenHighlighted(2));
    }

    #[test]
    fn arrow_down_cycles_through_all_matches() {
        let mut cb = fruit();
        cb.update(Message::Focus);
        let start = cb.menu_state();
        for _ in 0..cb.matching().len() {
            cb.update(key(KeyCode::Down));
        }
        assert_eq!(cb.menu_state(), start);
    }

    #[test]
    fn single_match_wraps_to_itself() {
        let mut cb = fruit();
        cb.update(Message::Focus);
        type_text(&mut cb, "cher");
        assert_eq!(cb.menu_state(), MenuState::OpenHighlighted(0));
        cb.update(key(KeyCode::Down));
        assert_eq!(cb.menu_state(), MenuState::OpenHighlighted(0));
        cb.update(key(KeyCode::Up));
        assert_eq!(cb.menu_state(), MenuState::OpenHighlighted(0));
    }

    #[test]
    fn home_and_end_depend_on_menu() {
        let mut cb = fruit();
        cb.update(Message::Focus);
        cb.update(key(KeyCode::End));
        assert_eq!(cb.menu_state(), MenuState::OpenHighlighted(3));
        cb.update(key(KeyCode::Home));
        assert_eq!(cb.menu_state(), MenuState::OpenHighlighted(0));

        cb.update(key(KeyCode::Tab));
        cb.update(key(KeyCode::Home));
        assert!(!cb.is_open());
        cb.update(key(KeyCode::Char('x')));
        assert_eq!(cb.text(), "xApple");
    }

    #[test]
    fn escape_reverts_text_and_closes() {
        let mut cb = fruit();
        cb.update(Message::Focus);
        type_text(&mut cb, "pine");
        assert_eq!(cb.text(), "pine");
        cb.update(key(KeyCode::Esc));
        assert_eq!(cb.text(), "Apple");
        assert_eq!(cb.query(), "");
        assert!(!cb.is_open());
        assert_eq!(cb.aria().active_descendant, None);
    }

    #[test]
    fn tab_closes_without_commit_or_revert() {
        let mut cb = fruit();
        cb.update(Message::Focus);
        type_text(&mut cb, "pine");
        let cmd = cb.update(key(KeyCode::Tab));
        assert!(cmd.is_none());
        assert!(!cb.is_open());
        assert_eq!(cb.value(), "1");
        assert_eq!(cb.text(), "pine");

        cb.update(Message::Blur);
        assert_eq!(cb.text(), "Apple");
    }

    #[test]
    fn focus_can_leave_menu_closed() {
        let (cb, _) = Combobox::new(fruit_props());
        let mut cb = cb.with_open_on_focus(false);
        cb.update(Message::Focus);
        assert!(cb.focused());
        assert!(!cb.is_open());
    }

    #[test]
    fn duplicate_items_are_rejected_and_prior_kept() {
        let mut cb = fruit();
        let cmd = cb.update(Message::SetItems(vec![Item::new("a"), Item::new("a")]));
        assert_eq!(
            failures(cmd),
            vec![ConfigurationError::DuplicatedValues { value: "a".into() }]
        );
        assert_eq!(cb.items().len(), 4);
        assert_eq!(cb.text(), "Apple");
    }

    #[test]
    fn invalid_initial_items_fall_back_to_empty() {
        let (cb, cmd) = Combobox::new(ComboboxProps {
            items: vec![Item::new("a"), Item::new("a")],
            ..ComboboxProps::default()
        });
        assert!(cb.items().is_empty());
        assert_eq!(failures(cmd).len(), 1);
    }

    #[test]
    fn untyped_properties_are_validated() {
        let mut cb = fruit();
        let cmd = cb.update(Message::SetProperty {
            name: "items".into(),
            value: json!({"value": "x"}),
        });
        assert_eq!(failures(cmd), vec![ConfigurationError::ItemsNotArray]);
        assert_eq!(cb.items().len(), 4);

        let cmd = cb.update(Message::SetProperty {
            name: "value".into(),
            value: json!(2),
        });
        assert_eq!(failures(cmd), vec![ConfigurationError::ValueNotString]);
        assert_eq!(cb.value(), "1");

        let cmd = cb.update(Message::SetProperty {
            name: "value".into(),
            value: json!("2"),
        });
        assert!(failures(cmd).is_empty());
        assert_eq!(cb.value(), "2");
        assert_eq!(cb.text(), "Banana");
    }

    #[test]
    fn programmatic_value_change_emits_nothing() {
        let mut cb = fruit();
        let cmd = cb.update(Message::SetValue("4".into()));
        assert!(cmd.is_none());
        assert_eq!(cb.text(), "Pineapple");

        cb.update(Message::SetValue("missing".into()));
        assert_eq!(cb.value(), "missing");
        assert_eq!(cb.text(), "");
    }

    #[test]
    fn paste_inside_the_text_filters() {
        let (cb, _) = Combobox::new(fruit_props());
        let mut cb = cb.with_open_on_focus(false);
        cb.update(Message::Focus);
        cb.update(key(KeyCode::Home));
        cb.update(Message::Paste("Pine".into()));
        assert_eq!(cb.text(), "PineApple");
        assert_eq!(cb.query(), "PineApple");
        assert!(cb.is_open());
        assert_eq!(cb.highlighted_item(), Some(&Item::labeled("4", "Pineapple")));
        draw(&cb);
    }

    #[test]
    fn emptied_items_close_the_menu() {
        let mut cb = fruit();
        cb.update(Message::Focus);
        assert!(cb.is_open());
        cb.update(Message::SetItems(Vec::new()));
        assert!(!cb.is_open());
        assert!(!cb.aria().expanded);
        assert!(!cb.dismissal.is_listening());
    }

    #[test]
    fn items_without_a_match_for_the_query_close_the_menu() {
        let mut cb = fruit();
        cb.update(Message::Focus);
        type_text(&mut cb, "ban");
        assert!(cb.is_open());
        cb.update(Message::SetItems(vec![Item::labeled("9", "Zucchini")]));
        assert!(cb.matching().is_empty());
        assert!(!cb.is_open());
        assert_eq!(cb.query(), "ban");
    }

    #[test]
    fn new_items_refresh_the_label() {
        let mut cb = fruit();
        cb.update(Message::SetItems(vec![Item::labeled("1", "Apricot")]));
        assert_eq!(cb.text(), "Apricot");
        assert_eq!(cb.matching().len(), 1);
    }

    #[test]
    fn disabled_ignores_input_and_closes() {
        let mut cb = fruit();
        cb.update(Message::Focus);
        assert!(cb.is_open());
        cb.update(Message::SetDisabled(true));
        assert!(!cb.is_open());
        assert!(cb.subscriptions().is_empty());

        cb.update(key(KeyCode::Down));
        type_text(&mut cb, "b");
        cb.update(Message::Focus);
        assert!(!cb.is_open());
        assert_eq!(cb.text(), "Apple");
        assert!(cb.aria().disabled);
    }

    #[test]
    fn hidden_renders_nothing_and_listens_to_nothing() {
        let mut cb = fruit();
        cb.update(Message::SetVisible(false));
        assert!(cb.subscriptions().is_empty());
        assert!(draw(&cb).trim().is_empty());
        cb.update(Message::Focus);
        assert!(!cb.is_open());
    }

    #[test]
    fn listener_lifecycle_follows_menu() {
        let mut cb = fruit();
        assert_eq!(cb.subscriptions().len(), 1);

        cb.update(Message::Focus);
        assert_eq!(cb.dismissal, DismissalListener::Attaching);
        assert_eq!(cb.subscriptions().len(), 2);

        cb.update(Message::DismissalSettled);
        assert_eq!(cb.dismissal, DismissalListener::Attached);
        assert_eq!(cb.subscriptions().len(), 1);

        cb.update(key(KeyCode::Esc));
        assert_eq!(cb.dismissal, DismissalListener::Detaching);
        cb.update(Message::DismissalSettled);
        assert_eq!(cb.dismissal, DismissalListener::Detached);
    }

    #[test]
    fn listener_ids_are_per_instance() {
        let a = fruit();
        let b = fruit();
        let ids_a: Vec<_> = a.subscriptions().iter().map(|s| s.id().clone()).collect();
        let ids_b: Vec<_> = b.subscriptions().iter().map(|s| s.id().clone()).collect();
        assert_ne!(ids_a, ids_b);
    }

    #[test]
    fn resize_bursts_schedule_one_reposition() {
        let mut cb = fruit();
        cb.update(Message::WindowResized);
        assert!(!cb.reposition.is_pending());

        cb.update(Message::Focus);
        cb.update(Message::DismissalSettled);
        cb.update(Message::WindowResized);
        let deadline = cb.reposition.deadline();
        cb.update(Message::WindowResized);
        cb.update(Message::WindowResized);
        assert_eq!(cb.reposition.deadline(), deadline);
        assert_eq!(cb.subscriptions().len(), 2);

        let (now, later) = cb.update(Message::RepositionElapsed).into_messages();
        assert!(now.is_empty());
        assert!(matches!(later.as_slice(), [Message::Reposition]));
        assert!(!cb.reposition.is_pending());
    }

    #[test]
    fn closing_cancels_pending_reposition() {
        let mut cb = fruit();
        cb.update(Message::Focus);
        cb.update(Message::WindowResized);
        cb.update(key(KeyCode::Esc));
        assert!(!cb.reposition.is_pending());
        assert!(cb.update(Message::RepositionElapsed).is_none());
    }

    #[test]
    fn reposition_without_layout_is_noop() {
        let mut cb = fruit();
        let (_, later) = cb.update(Message::Focus).into_messages();
        assert!(matches!(later.as_slice(), [Message::Reposition]));
        cb.update(Message::Reposition);
        assert_eq!(cb.geometry(), None);

        draw(&cb);
        cb.update(Message::Reposition);
        assert_eq!(cb.geometry(), Some(MenuGeometry::natural(6)));
    }

    #[test]
    fn menu_renders_rows_with_check_mark() {
        let mut cb = fruit();
        cb.update(Message::Focus);
        let screen = draw(&cb);
        let lines: Vec<&str> = screen.lines().collect();
        assert!(lines[0].starts_with("Fruit"));
        assert!(lines[2].contains("Apple"));
        assert!(lines[2].contains('▾'));
        assert!(lines[5].contains("✓ Apple"));
        assert!(lines[6].contains("  Banana"));
        assert!(lines[8].contains("Pineapple"));
    }

    #[test]
    fn query_match_is_emphasised() {
        let mut cb = fruit();
        cb.update(Message::Focus);
        type_text(&mut cb, "nan");
        let mut terminal = Terminal::new(TestBackend::new(40, 20)).unwrap();
        terminal.draw(|f| cb.view(f, f.area())).unwrap();
        let buf = terminal.backend().buffer();
        // Row 5: border, "  ", then "Banana"; "nan" starts at column 5.
        assert_eq!(buf[(3, 5)].symbol(), "B");
        assert!(!buf[(3, 5)].modifier.contains(Modifier::BOLD));
        assert_eq!(buf[(5, 5)].symbol(), "n");
        assert!(buf[(5, 5)].modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn required_marker_and_error_are_drawn() {
        let (cb, _) = Combobox::new(ComboboxProps {
            required_icon: true,
            error: "Pick one".into(),
            ..fruit_props()
        });
        let screen = draw(&cb);
        let lines: Vec<&str> = screen.lines().collect();
        assert!(lines[0].starts_with("Fruit *"));
        assert!(lines[4].contains("Pick one"));
        assert!(cb.aria().required);
    }

    #[test]
    fn click_on_row_commits() {
        let mut cb = fruit();
        cb.update(Message::Focus);
        draw(&cb);
        let (now, _) = cb.update(click(3, 6)).into_messages();
        assert_eq!(changes(now).len(), 1);
        assert_eq!(cb.value(), "2");
        assert!(!cb.is_open());
    }

    #[test]
    fn outside_press_dismisses_once_attached() {
        let mut cb = fruit();
        cb.update(Message::Focus);
        type_text(&mut cb, "p");
        draw(&cb);

        // Still attaching: the press that opened the menu is ignored.
        cb.update(click(35, 18));
        assert!(cb.is_open());

        cb.update(Message::DismissalSettled);
        cb.update(click(35, 18));
        assert!(!cb.is_open());
        assert_eq!(cb.text(), "Apple");
        assert_eq!(cb.query(), "");
    }

    #[test]
    fn press_on_toggle_while_open_only_closes() {
        let mut cb = fruit();
        cb.update(Message::Focus);
        cb.update(Message::DismissalSettled);
        draw(&cb);
        let (now, _) = cb.update(click(16, 2)).into_messages();
        assert!(now.is_empty());
        assert!(!cb.is_open());
    }

    #[test]
    fn toggle_button_focuses_selects_and_opens() {
        let mut cb = fruit();
        draw(&cb);
        let (now, later) = cb.update(click(16, 2)).into_messages();
        assert!(matches!(now.as_slice(), [Message::FocusRequested]));
        assert!(matches!(later.as_slice(), [Message::Reposition]));
        assert!(cb.is_open());
        assert!(cb.focused());
        assert!(cb.text.is_all_selected());

        cb.update(key(KeyCode::Char('c')));
        assert_eq!(cb.text(), "c");
        assert_eq!(cb.highlighted_item(), Some(&Item::labeled("3", "Cherry")));
    }

    #[test]
    fn hover_highlights_and_leaving_clears() {
        let mut cb = fruit();
        cb.update(Message::Focus);
        draw(&cb);
        cb.update(mouse(MouseEventKind::Moved, 4, 7));
        assert_eq!(cb.menu_state(), MenuState::OpenHighlighted(2));
        assert_eq!(
            cb.aria().active_descendant,
            Some(format!("{}-menuitem-2", cb.id()))
        );
        cb.update(mouse(MouseEventKind::Moved, 35, 18));
        assert_eq!(cb.menu_state(), MenuState::OpenNoHighlight);
    }

    #[test]
    fn wheel_scrolls_menu_or_schedules_reposition() {
        let (cb, _) = Combobox::new(fruit_props());
        let mut cb = cb.with_max_visible(2);
        cb.update(Message::Focus);
        draw(&cb);
        cb.update(mouse(MouseEventKind::ScrollDown, 3, 5));
        assert_eq!(cb.scroll.offset(), 1);
        assert!(!cb.reposition.is_pending());

        cb.update(mouse(MouseEventKind::ScrollDown, 35, 18));
        assert!(cb.reposition.is_pending());
    }

    #[test]
    fn keyboard_highlight_scrolls_into_view() {
        let (cb, _) = Combobox::new(fruit_props());
        let mut cb = cb.with_max_visible(2);
        cb.update(Message::Focus);
        cb.update(key(KeyCode::End));
        assert_eq!(cb.scroll.offset(), 2);
        cb.update(key(KeyCode::Down));
        assert_eq!(cb.scroll.offset(), 0);
    }

    struct Form {
        fruit: Combobox,
        top: u16,
        changes: Vec<ChangeEvent>,
    }

    enum FormMsg {
        Fruit(Message),
    }

    impl Model for Form {
        type Message = FormMsg;
        type Flags = u16;

        fn init(top: u16) -> (Self, Command<FormMsg>) {
            let (fruit, cmd) = Combobox::new(fruit_props());
            let form = Form {
                fruit,
                top,
                changes: Vec::new(),
            };
            (form, cmd.map(FormMsg::Fruit))
        }

        fn update(&mut self, msg: FormMsg) -> Command<FormMsg> {
            match msg {
                FormMsg::Fruit(Message::Changed(change)) => {
                    self.changes.push(change);
                    Command::none()
                }
                FormMsg::Fruit(m) => self.fruit.update(m).map(FormMsg::Fruit),
            }
        }

        fn view(&self, frame: &mut Frame) {
            let area = frame.area();
            let field = Rect::new(area.x, self.top, area.width, area.height - self.top);
            self.fruit.view(frame, field);
        }
    }

    #[test]
    fn geometry_is_computed_after_render() {
        let mut prog = TestProgram::<Form>::new(0);
        prog.send(FormMsg::Fruit(Message::Focus));
        prog.drain_messages();
        assert_eq!(prog.model().fruit.geometry(), None);
        assert_eq!(prog.pending_after_render(), 1);

        prog.settle(40, 20);
        let geometry = prog.model().fruit.geometry();
        assert_eq!(geometry.map(|g| g.placement), Some(Placement::Below));
    }

    #[test]
    fn menu_flips_above_near_the_bottom() {
        let mut prog = TestProgram::<Form>::new(14);
        prog.send(FormMsg::Fruit(Message::Focus));
        prog.settle(40, 20);

        let geometry = prog.model().fruit.geometry().unwrap();
        assert_eq!(geometry.placement, Placement::Above);
        assert_eq!(geometry.height, 6);
        let screen = prog.render_string(40, 20);
        let lines: Vec<&str> = screen.lines().collect();
        assert!(lines[10].contains("✓ Apple"));
    }

    #[test]
    fn change_reaches_the_parent() {
        let mut prog = TestProgram::<Form>::new(0);
        prog.send(FormMsg::Fruit(Message::Focus));
        prog.send(FormMsg::Fruit(key(KeyCode::Down)));
        prog.send(FormMsg::Fruit(key(KeyCode::Enter)));
        prog.settle(40, 20);
        assert_eq!(
            prog.model().changes,
            vec![ChangeEvent {
                old_value: "1".into(),
                value: "2".into()
            }]
        );
    }
}
