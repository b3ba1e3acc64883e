//! Schedule browser state management.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use chrono_tz::Tz;
use clarotv_api::epg::ScheduleQuery;
use clarotv_catalog::LocationCatalog;

use crate::controller::{Assessment, FetchPhase, LocationPhase, SelectionContext, assess};

/// Date entry format.
pub const DATE_FORMAT: &str = "%d/%m/%Y";
/// Time entry format.
pub const TIME_FORMAT: &str = "%H:%M";

/// Focusable widgets, in Tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// State list.
    States,
    /// City list.
    Cities,
    /// "Dia inicial".
    StartDate,
    /// "Hora inicial".
    StartTime,
    /// "Dia final".
    EndDate,
    /// "Hora final".
    EndTime,
    /// "Carregar programação".
    FetchButton,
    /// Rendered schedule.
    Schedule,
}

impl Focus {
    const ORDER: [Self; 8] = [
        Self::States,
        Self::Cities,
        Self::StartDate,
        Self::StartTime,
        Self::EndDate,
        Self::EndTime,
        Self::FetchButton,
        Self::Schedule,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    /// Next widget in Tab order.
    #[must_use]
    pub fn next(self) -> Self {
        let idx = (self.position() + 1) % Self::ORDER.len();
        Self::ORDER.get(idx).copied().unwrap_or(Self::States)
    }

    /// Previous widget in Tab order.
    #[must_use]
    pub fn prev(self) -> Self {
        let idx = (self.position() + Self::ORDER.len() - 1) % Self::ORDER.len();
        Self::ORDER.get(idx).copied().unwrap_or(Self::States)
    }

    /// Whether this is one of the four date/time fields.
    #[must_use]
    pub const fn is_datetime_field(self) -> bool {
        matches!(
            self,
            Self::StartDate | Self::StartTime | Self::EndDate | Self::EndTime
        )
    }
}

/// Input mode for the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode.
    Normal,
    /// State filter text input.
    Filter,
    /// Text entry for the focused date/time field.
    Edit,
}

/// Action requested by a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserAction {
    /// Leave the browser.
    Quit,
    /// Send this request.
    Fetch(ScheduleQuery),
}

/// State for the schedule browser TUI.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct BrowserState {
    /// Location catalog.
    catalog: LocationCatalog,
    /// Zone used to interpret the date/time fields.
    tz: Tz,
    /// Logo host.
    image_base_url: String,
    /// Current selection.
    context: SelectionContext,
    /// Derived from `context`; refreshed on every change.
    assessment: Assessment,
    /// Focused widget.
    pub focus: Focus,
    /// Current input mode.
    pub input_mode: InputMode,
    /// State filter text.
    pub filter: String,
    /// Text being typed into a date/time field.
    pub edit_buffer: String,
    /// Cursor in the filtered state list.
    pub state_cursor: usize,
    /// Cursor in the city list.
    pub city_cursor: usize,
    /// Cursor in the schedule rows.
    pub schedule_cursor: usize,
    /// Schedule pane lifecycle.
    pub phase: FetchPhase,
    /// Status line text.
    pub status: Option<String>,
}

impl BrowserState {
    /// Creates the initial state: nothing selected, all fields at `now`.
    #[must_use]
    pub fn new(
        catalog: LocationCatalog,
        tz: Tz,
        image_base_url: impl Into<String>,
        now: NaiveDateTime,
        status: Option<String>,
    ) -> Self {
        let context = SelectionContext::starting_at(now);
        let assessment = assess(&context, &catalog, tz);
        Self {
            catalog,
            tz,
            image_base_url: image_base_url.into(),
            context,
            assessment,
            focus: Focus::States,
            input_mode: InputMode::Normal,
            filter: String::new(),
            edit_buffer: String::new(),
            state_cursor: 0,
            city_cursor: 0,
            schedule_cursor: 0,
            phase: FetchPhase::Idle,
            status,
        }
    }

    /// Current selection.
    #[must_use]
    pub const fn context(&self) -> &SelectionContext {
        &self.context
    }

    /// Gate and window derived from the selection.
    #[must_use]
    pub const fn assessment(&self) -> &Assessment {
        &self.assessment
    }

    /// Logo host.
    #[must_use]
    pub fn image_base_url(&self) -> &str {
        &self.image_base_url
    }

    /// Replaces the selection and refreshes the assessment.
    fn set_context(&mut self, context: SelectionContext) {
        self.assessment = assess(&context, &self.catalog, self.tz);
        self.context = context;
    }

    /// State names matching the filter.
    #[must_use]
    pub fn filtered_states(&self) -> Vec<&str> {
        self.catalog.search_states(&self.filter)
    }

    /// Cities of the selected state (empty when none).
    #[must_use]
    pub fn cities(&self) -> Vec<&str> {
        self.context
            .state
            .as_deref()
            .map(|state| self.catalog.list_cities(state))
            .unwrap_or_default()
    }

    /// Whether the city list accepts focus and selection.
    #[must_use]
    pub fn cities_enabled(&self) -> bool {
        !matches!(
            self.assessment.location,
            LocationPhase::NoStateSelected | LocationPhase::CityListEmpty
        )
    }

    /// Appends a character to the filter.
    pub fn filter_push(&mut self, c: char) {
        self.filter.push(c);
        self.state_cursor = 0;
    }

    /// Removes the last filter character.
    pub fn filter_pop(&mut self) {
        self.filter.pop();
        self.state_cursor = 0;
    }

    /// Clears the filter.
    pub fn clear_filter(&mut self) {
        self.filter.clear();
        self.state_cursor = 0;
    }

    /// Moves focus forward, skipping a disabled city list.
    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
        if self.focus == Focus::Cities && !self.cities_enabled() {
            self.focus = self.focus.next();
        }
    }

    /// Moves focus backward, skipping a disabled city list.
    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
        if self.focus == Focus::Cities && !self.cities_enabled() {
            self.focus = self.focus.prev();
        }
    }

    /// Up key.
    pub fn move_up(&mut self) {
        match self.focus {
            Focus::States => self.state_cursor = self.state_cursor.saturating_sub(1),
            Focus::Cities => self.city_cursor = self.city_cursor.saturating_sub(1),
            Focus::Schedule => self.schedule_cursor = self.schedule_cursor.saturating_sub(1),
            Focus::StartDate | Focus::EndDate => self.shift_focused(TimeDelta::days(1)),
            Focus::StartTime | Focus::EndTime => self.shift_focused(TimeDelta::minutes(1)),
            Focus::FetchButton => {}
        }
    }

    /// Down key.
    pub fn move_down(&mut self) {
        match self.focus {
            Focus::States => {
                let len = self.filtered_states().len();
                if self.state_cursor + 1 < len {
                    self.state_cursor += 1;
                }
            }
            Focus::Cities => {
                let len = self.cities().len();
                if self.city_cursor + 1 < len {
                    self.city_cursor += 1;
                }
            }
            Focus::Schedule => {
                let len = self.schedule_len();
                if self.schedule_cursor + 1 < len {
                    self.schedule_cursor += 1;
                }
            }
            Focus::StartDate | Focus::EndDate => self.shift_focused(TimeDelta::days(-1)),
            Focus::StartTime | Focus::EndTime => self.shift_focused(TimeDelta::minutes(-1)),
            Focus::FetchButton => {}
        }
    }

    /// `PageUp` (`forward`) / `PageDown`: one hour on a time field.
    pub fn page(&mut self, forward: bool) {
        if matches!(self.focus, Focus::StartTime | Focus::EndTime) {
            let hours = if forward { 1 } else { -1 };
            self.shift_focused(TimeDelta::hours(hours));
        }
    }

    /// Shifts the focused date/time field by `delta`.
    ///
    /// Times wrap within the day; dates stay put at the calendar bounds.
    fn shift_focused(&mut self, delta: TimeDelta) {
        let ctx = self.context.clone();
        let next = match self.focus {
            Focus::StartDate => {
                let date = shift_date(ctx.start_date, delta);
                ctx.with_start_date(date)
            }
            Focus::EndDate => {
                let date = shift_date(ctx.end_date, delta);
                ctx.with_end_date(date)
            }
            Focus::StartTime => {
                let time = ctx.start_time.overflowing_add_signed(delta).0;
                ctx.with_start_time(time)
            }
            Focus::EndTime => {
                let time = ctx.end_time.overflowing_add_signed(delta).0;
                ctx.with_end_time(time)
            }
            _ => return,
        };
        self.set_context(next);
    }

    /// Enter / Space. Returns the request to send when the button fires.
    pub fn activate(&mut self) -> Option<ScheduleQuery> {
        match self.focus {
            Focus::States => {
                let picked = self
                    .filtered_states()
                    .get(self.state_cursor)
                    .map(|s| String::from(*s));
                if let Some(state) = picked {
                    self.set_context(self.context.clone().with_state(state));
                    self.city_cursor = 0;
                    if self.cities_enabled() {
                        self.focus = Focus::Cities;
                    }
                }
                None
            }
            Focus::Cities => {
                let picked = self
                    .cities()
                    .get(self.city_cursor)
                    .map(|c| String::from(*c));
                if let Some(city) = picked {
                    self.set_context(self.context.clone().with_city(city));
                    self.focus = Focus::StartDate;
                }
                None
            }
            Focus::FetchButton => self.assessment.query().cloned(),
            Focus::Schedule => {
                if let FetchPhase::Rendered(view) = &mut self.phase {
                    view.toggle(self.schedule_cursor);
                }
                None
            }
            Focus::StartDate | Focus::StartTime | Focus::EndDate | Focus::EndTime => {
                self.begin_edit();
                None
            }
        }
    }

    /// Starts text entry on the focused date/time field.
    pub fn begin_edit(&mut self) {
        let Some(current) = self.field_text(self.focus) else {
            return;
        };
        self.edit_buffer = current;
        self.input_mode = InputMode::Edit;
    }

    /// Abandons text entry.
    pub fn cancel_edit(&mut self) {
        self.edit_buffer.clear();
        self.input_mode = InputMode::Normal;
    }

    /// Applies the typed value. Invalid input keeps the old value and sets
    /// the status line.
    pub fn commit_edit(&mut self) {
        let text = self.edit_buffer.trim().to_owned();
        let ctx = self.context.clone();
        let next = match self.focus {
            Focus::StartDate | Focus::EndDate => {
                match NaiveDate::parse_from_str(&text, DATE_FORMAT) {
                    Ok(date) if self.focus == Focus::StartDate => Some(ctx.with_start_date(date)),
                    Ok(date) => Some(ctx.with_end_date(date)),
                    Err(_) => None,
                }
            }
            Focus::StartTime | Focus::EndTime => {
                match NaiveTime::parse_from_str(&text, TIME_FORMAT) {
                    Ok(time) if self.focus == Focus::StartTime => Some(ctx.with_start_time(time)),
                    Ok(time) => Some(ctx.with_end_time(time)),
                    Err(_) => None,
                }
            }
            _ => None,
        };
        match next {
            Some(context) => {
                self.set_context(context);
                self.status = None;
            }
            None => {
                let expected = if matches!(self.focus, Focus::StartDate | Focus::EndDate) {
                    "DD/MM/AAAA"
                } else {
                    "HH:MM"
                };
                self.status = Some(format!("Valor inválido \"{text}\": use {expected}"));
            }
        }
        self.cancel_edit();
    }

    /// Display text of a date/time field.
    #[must_use]
    pub fn field_text(&self, focus: Focus) -> Option<String> {
        let ctx = &self.context;
        let text = match focus {
            Focus::StartDate => ctx.start_date.format(DATE_FORMAT).to_string(),
            Focus::StartTime => ctx.start_time.format(TIME_FORMAT).to_string(),
            Focus::EndDate => ctx.end_date.format(DATE_FORMAT).to_string(),
            Focus::EndTime => ctx.end_time.format(TIME_FORMAT).to_string(),
            _ => return None,
        };
        Some(text)
    }

    /// Marks a request as in flight.
    pub fn begin_fetch(&mut self) {
        self.phase = FetchPhase::Fetching;
        self.status = Some(String::from("Carregando programação..."));
    }

    /// Stores the outcome of a request.
    pub fn finish_fetch(&mut self, phase: FetchPhase) {
        self.status = match &phase {
            FetchPhase::Rendered(view) => {
                self.focus = Focus::Schedule;
                Some(format!(
                    "{} canais, {} programas",
                    view.len(),
                    view.program_count()
                ))
            }
            FetchPhase::Failed(error) => Some(format!(
                "Falha ao carregar programação ({}): {error}",
                error.kind()
            )),
            FetchPhase::Idle | FetchPhase::Fetching => None,
        };
        self.schedule_cursor = 0;
        self.phase = phase;
    }

    /// Number of rendered channel rows.
    #[must_use]
    pub fn schedule_len(&self) -> usize {
        match &self.phase {
            FetchPhase::Rendered(view) => view.len(),
            _ => 0,
        }
    }
}

fn shift_date(date: NaiveDate, delta: TimeDelta) -> NaiveDate {
    date.checked_add_signed(delta).unwrap_or(date)
}
