use crate::calc::{
    can_submit, classify, compute_booked_weeks, date_key, resolve_window, shift_is_offerable,
    BookingWindow, EligibilityResult,
};
use crate::data::{AppSettings, Leave, LeaveData, LeavePolicy, LeaveStatus, SlotData};
use anyhow::Result;
use chrono::{Datelike, Duration, NaiveDate};
use crossterm::event::{self, Event as CEvent, KeyCode, KeyModifiers};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::collections::HashSet;
use std::io::Stdout;
use std::path::PathBuf;
use std::time::Duration as StdDuration;

// Calendar cell colors
const PENDING_COLOR: Color = Color::Yellow;
const APPROVED_COLOR: Color = Color::Green;

const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(PartialEq, Debug)]
enum Mode {
    Normal,
    /// Choosing a shift for the selected date before entering a reason.
    PickShift,
    /// Typing the optional free-text reason for the request.
    Reason,
}

#[derive(PartialEq, Debug, Default)]
enum ViewState {
    #[default]
    Calendar,
    Leaves,
    Policy,
    Settings,
}

pub struct App<'a> {
    policy: &'a mut LeavePolicy,
    leave_data: &'a mut LeaveData,
    slot_data: &'a mut SlotData,
    pub settings: AppSettings,
    today: NaiveDate,
    selected_date: NaiveDate,
    /// Derived from today + the policy's booking range. Recomputed whenever
    /// the policy changes.
    window: BookingWindow,
    /// Monday keys of weeks where the current user already holds an active leave.
    booked_weeks: HashSet<NaiveDate>,
    mode: Mode,
    view_state: ViewState,
    /// Shift under the cursor while in PickShift mode.
    shift_cursor: usize,
    /// Selected row in the leaves/policy/settings views.
    list_cursor: usize,
    /// 0 = browsing; 1 = editing the selected row's value.
    edit_stage: u8,
    input_buffer: String,
    /// One-line result of the last action (message, color). Cleared on next keypress.
    status_line: Option<(String, Color)>,
    data_dir: PathBuf,
}

impl<'a> App<'a> {
    pub fn new(
        policy: &'a mut LeavePolicy,
        leave_data: &'a mut LeaveData,
        slot_data: &'a mut SlotData,
        settings: AppSettings,
        today: NaiveDate,
        data_dir: PathBuf,
    ) -> Self {
        let window = resolve_window(today, policy.week_range);
        // Start on the earliest requestable day; today itself is always
        // inside the lead-time gap.
        let selected_date = if window.is_empty() { today } else { window.min_date };
        let booked_weeks = compute_booked_weeks(&leave_data.leaves, &settings.user_id);
        App {
            policy,
            leave_data,
            slot_data,
            settings,
            today,
            selected_date,
            window,
            booked_weeks,
            mode: Mode::Normal,
            view_state: ViewState::Calendar,
            shift_cursor: 0,
            list_cursor: 0,
            edit_stage: 0,
            input_buffer: String::new(),
            status_line: None,
            data_dir,
        }
    }

    /// Recomputes the booking window and the booked-week index. Called after
    /// any change to the policy, the leave list or the current user.
    fn refresh(&mut self) {
        self.window = resolve_window(self.today, self.policy.week_range);
        self.booked_weeks =
            compute_booked_weeks(&self.leave_data.leaves, &self.settings.user_id);
    }

    fn eligibility_for(&self, date: NaiveDate) -> EligibilityResult {
        let key = date_key(date);
        let by_date = self.leave_data.leaves_by_date(&self.settings.user_id);
        let on_date: Vec<&Leave> = by_date.get(&key).cloned().unwrap_or_default();
        classify(
            date,
            &self.window,
            self.policy,
            self.slot_data.day(&key),
            &on_date,
            &self.booked_weeks,
        )
    }

    /// Leaves shown in the Leaves view: everyone's when admin, otherwise own.
    fn visible_leaves(&self) -> Vec<&Leave> {
        if self.settings.admin {
            self.leave_data.leaves.iter().collect()
        } else {
            self.leave_data.for_user(&self.settings.user_id)
        }
    }

    fn set_status(&mut self, msg: impl Into<String>, color: Color) {
        self.status_line = Some((msg.into(), color));
    }

    /// Returns true if the app should quit.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        // Dispatch to view-specific handlers when not in Calendar view
        match self.view_state {
            ViewState::Leaves => {
                self.handle_leaves_key(code);
                return false;
            }
            ViewState::Policy => {
                self.handle_policy_key(code);
                return false;
            }
            ViewState::Settings => {
                self.handle_settings_key(code);
                return false;
            }
            ViewState::Calendar => {}
        }

        // Clear the status message on every keypress
        self.status_line = None;

        match self.mode {
            Mode::PickShift => {
                match code {
                    KeyCode::Up => {
                        if self.shift_cursor > 0 {
                            self.shift_cursor -= 1;
                        }
                    }
                    KeyCode::Down => {
                        if self.shift_cursor + 1 < self.policy.shifts.len() {
                            self.shift_cursor += 1;
                        }
                    }
                    KeyCode::Enter => {
                        self.confirm_shift();
                    }
                    KeyCode::Esc => {
                        self.mode = Mode::Normal;
                    }
                    _ => {}
                }
                false
            }

            Mode::Reason => {
                match code {
                    KeyCode::Enter => {
                        self.create_leave();
                    }
                    KeyCode::Esc => {
                        self.input_buffer.clear();
                        self.mode = Mode::Normal;
                    }
                    KeyCode::Backspace => {
                        self.input_buffer.pop();
                    }
                    KeyCode::Char(c) => {
                        self.input_buffer.push(c);
                    }
                    _ => {}
                }
                false
            }

            Mode::Normal => {
                match code {
                    KeyCode::Left => {
                        if let Some(d) = self.selected_date.checked_sub_signed(Duration::days(1)) {
                            self.selected_date = d;
                        }
                    }
                    KeyCode::Right => {
                        if let Some(d) = self.selected_date.checked_add_signed(Duration::days(1)) {
                            self.selected_date = d;
                        }
                    }
                    KeyCode::Up => {
                        if let Some(d) = self.selected_date.checked_sub_signed(Duration::days(7)) {
                            self.selected_date = d;
                        }
                    }
                    KeyCode::Down => {
                        if let Some(d) = self.selected_date.checked_add_signed(Duration::days(7)) {
                            self.selected_date = d;
                        }
                    }
                    KeyCode::Enter => {
                        let eligibility = self.eligibility_for(self.selected_date);
                        if eligibility.selectable() {
                            self.shift_cursor = 0;
                            self.mode = Mode::PickShift;
                        } else {
                            let reasons: Vec<&str> =
                                eligibility.reasons.iter().map(|r| r.label()).collect();
                            self.set_status(
                                format!("Not selectable: {}", reasons.join("; ")),
                                Color::Red,
                            );
                        }
                    }
                    KeyCode::Char('x') => {
                        self.cancel_selected_date();
                    }
                    KeyCode::Char('l') => {
                        self.view_state = ViewState::Leaves;
                        self.list_cursor = 0;
                        self.edit_stage = 0;
                    }
                    KeyCode::Char('b') => {
                        if self.settings.admin {
                            self.view_state = ViewState::Policy;
                            self.list_cursor = 0;
                            self.edit_stage = 0;
                            self.input_buffer.clear();
                        } else {
                            self.set_status("Policy view requires admin", Color::DarkGray);
                        }
                    }
                    KeyCode::Char('o') => {
                        self.view_state = ViewState::Settings;
                        self.list_cursor = 0;
                        self.edit_stage = 0;
                        self.input_buffer.clear();
                    }
                    KeyCode::Char('q') => {
                        return true;
                    }
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                        return true;
                    }
                    _ => {}
                }
                false
            }
        }
    }

    /// Enter pressed on a shift in PickShift mode: run the submission guard
    /// and move to the reason prompt when it passes.
    fn confirm_shift(&mut self) {
        let shift_id = match self.policy.shifts.get(self.shift_cursor) {
            Some(s) => s.id.clone(),
            None => {
                self.mode = Mode::Normal;
                return;
            }
        };
        let key = date_key(self.selected_date);
        let eligibility = self.eligibility_for(self.selected_date);
        let detail = self.slot_data.shift_detail(&key, &shift_id);
        match can_submit(&eligibility, Some(&shift_id), detail) {
            Ok(()) => {
                self.input_buffer.clear();
                self.mode = Mode::Reason;
            }
            Err(reason) => {
                self.set_status(format!("Cannot request: {}", reason), Color::Red);
            }
        }
    }

    /// Enter pressed in Reason mode: build the leave, debit the local slot
    /// snapshot and return to browsing.
    fn create_leave(&mut self) {
        let shift_id = match self.policy.shifts.get(self.shift_cursor) {
            Some(s) => s.id.clone(),
            None => {
                self.mode = Mode::Normal;
                return;
            }
        };
        let id = self.leave_data.next_id();
        let reason = if self.input_buffer.is_empty() {
            None
        } else {
            Some(self.input_buffer.as_str())
        };
        let leave = Leave::new(
            &id,
            &self.settings.user_id,
            self.selected_date,
            &shift_id,
            reason,
        );
        let key = leave.date.clone();
        self.leave_data.add(leave);
        self.slot_data.apply_booking(&key, &shift_id);
        self.input_buffer.clear();
        self.mode = Mode::Normal;
        self.refresh();
        self.set_status(format!("Requested {} for {}", id, key), APPROVED_COLOR);
    }

    /// `x` on the calendar: cancel the user's pending leave on the selected
    /// date, crediting the slot back to the local snapshot.
    fn cancel_selected_date(&mut self) {
        let key = date_key(self.selected_date);
        let target = self
            .leave_data
            .for_user(&self.settings.user_id)
            .into_iter()
            .find(|l| l.date == key && l.status == LeaveStatus::Pending)
            .map(|l| (l.id.clone(), l.shift_id.clone()));
        match target {
            Some((id, shift_id)) => {
                if self.leave_data.cancel(&id) {
                    self.slot_data.release_booking(&key, &shift_id);
                    self.refresh();
                    self.set_status(format!("Cancelled {}", id), PENDING_COLOR);
                }
            }
            None => {
                self.set_status(format!("No pending leave on {}", key), Color::DarkGray);
            }
        }
    }

    // ── Leaves view ───────────────────────────────────────────────────────────

    fn handle_leaves_key(&mut self, code: KeyCode) {
        let count = self.visible_leaves().len();
        match code {
            KeyCode::Up => {
                if self.list_cursor > 0 {
                    self.list_cursor -= 1;
                }
            }
            KeyCode::Down => {
                if self.list_cursor + 1 < count {
                    self.list_cursor += 1;
                }
            }
            KeyCode::Char('x') => {
                let target = self
                    .visible_leaves()
                    .get(self.list_cursor)
                    .map(|l| (*l).clone());
                if let Some(leave) = target {
                    let own = leave.user_id == self.settings.user_id;
                    if leave.status == LeaveStatus::Pending && (own || self.settings.admin) {
                        if self.leave_data.cancel(&leave.id) {
                            self.slot_data.release_booking(&leave.date, &leave.shift_id);
                            self.refresh();
                            if self.list_cursor > 0 && self.list_cursor + 1 >= count {
                                self.list_cursor -= 1;
                            }
                        }
                    }
                }
            }
            KeyCode::Char('a') if self.settings.admin => {
                self.decide_selected(LeaveStatus::Approved);
            }
            KeyCode::Char('r') if self.settings.admin => {
                self.decide_selected(LeaveStatus::Rejected);
            }
            KeyCode::Esc | KeyCode::Char('q') => {
                self.view_state = ViewState::Calendar;
            }
            _ => {}
        }
    }

    fn decide_selected(&mut self, status: LeaveStatus) {
        let target = self
            .visible_leaves()
            .get(self.list_cursor)
            .map(|l| (*l).clone());
        if let Some(leave) = target {
            if self.leave_data.decide(&leave.id, status) {
                // A rejected leave no longer occupies a slot
                if status == LeaveStatus::Rejected {
                    self.slot_data.release_booking(&leave.date, &leave.shift_id);
                }
                self.refresh();
            }
        }
    }

    fn render_leaves_view(&self, f: &mut Frame, area: ratatui::layout::Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(5),    // leave list table
                Constraint::Length(2), // key hints
            ])
            .split(area);

        let header = Row::new(vec![
            Cell::from("#").style(Style::default().add_modifier(Modifier::BOLD)),
            Cell::from("User").style(Style::default().add_modifier(Modifier::BOLD)),
            Cell::from("Date").style(Style::default().add_modifier(Modifier::BOLD)),
            Cell::from("Shift").style(Style::default().add_modifier(Modifier::BOLD)),
            Cell::from("Status").style(Style::default().add_modifier(Modifier::BOLD)),
            Cell::from("Reason").style(Style::default().add_modifier(Modifier::BOLD)),
        ]);

        let leaves = self.visible_leaves();
        let rows: Vec<Row> = leaves
            .iter()
            .map(|l| {
                let status_color = match l.status {
                    LeaveStatus::Pending => PENDING_COLOR,
                    LeaveStatus::Approved => APPROVED_COLOR,
                    LeaveStatus::Rejected => Color::Red,
                };
                let shift_name = self
                    .policy
                    .shift(&l.shift_id)
                    .map(|s| s.name.clone())
                    .unwrap_or_else(|| l.shift_id.clone());
                Row::new(vec![
                    Cell::from(l.id.clone()),
                    Cell::from(l.user_id.clone()),
                    Cell::from(l.date.clone()),
                    Cell::from(shift_name),
                    Cell::from(l.status.label()).style(Style::default().fg(status_color)),
                    Cell::from(l.reason.clone().unwrap_or_else(|| "-".to_string())),
                ])
            })
            .collect();

        let mut table_state = TableState::default();
        if !leaves.is_empty() {
            table_state.select(Some(self.list_cursor));
        }

        let title = if self.settings.admin {
            " Leave Requests  (a=approve  r=reject  x=cancel  Esc=back) "
        } else {
            " My Leave Requests  (x=cancel pending  Esc=back) "
        };

        let table = Table::new(
            rows,
            [
                Constraint::Length(8),
                Constraint::Length(12),
                Constraint::Length(12),
                Constraint::Length(12),
                Constraint::Length(10),
                Constraint::Min(20),
            ],
        )
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );

        f.render_stateful_widget(table, chunks[0], &mut table_state);

        let hints = Paragraph::new(Line::from(Span::styled(
            "↑↓=move  x=cancel pending  Esc=back to calendar",
            Style::default().fg(Color::DarkGray),
        )));
        f.render_widget(hints, chunks[1]);
    }

    // ── Policy view (admin) ───────────────────────────────────────────────────

    /// Rows 0..=6 toggle blackout weekdays, row 7 cycles the booking range,
    /// rows 8.. edit per-shift capacity.
    fn policy_row_count(&self) -> usize {
        8 + self.policy.shifts.len()
    }

    fn handle_policy_key(&mut self, code: KeyCode) {
        if self.edit_stage == 0 {
            match code {
                KeyCode::Up => {
                    if self.list_cursor > 0 {
                        self.list_cursor -= 1;
                    }
                }
                KeyCode::Down => {
                    if self.list_cursor + 1 < self.policy_row_count() {
                        self.list_cursor += 1;
                    }
                }
                KeyCode::Enter | KeyCode::Char(' ') => {
                    if self.list_cursor <= 6 {
                        self.policy.toggle_disabled_day(self.list_cursor as u8);
                        self.refresh();
                    } else if self.list_cursor == 7 {
                        self.policy.week_range = self.policy.week_range.cycled();
                        self.refresh();
                    } else {
                        let idx = self.list_cursor - 8;
                        if let Some(shift) = self.policy.shifts.get(idx) {
                            self.input_buffer = shift.slots.to_string();
                            self.edit_stage = 1;
                        }
                    }
                }
                KeyCode::Esc | KeyCode::Char('q') => {
                    self.view_state = ViewState::Calendar;
                }
                _ => {}
            }
        } else {
            match code {
                KeyCode::Char(c) if c.is_ascii_digit() => {
                    self.input_buffer.push(c);
                }
                KeyCode::Backspace => {
                    self.input_buffer.pop();
                }
                KeyCode::Enter => {
                    let idx = self.list_cursor - 8;
                    if let (Ok(slots), Some(shift)) = (
                        self.input_buffer.parse::<u32>(),
                        self.policy.shifts.get_mut(idx),
                    ) {
                        shift.slots = slots;
                    }
                    self.input_buffer.clear();
                    self.edit_stage = 0;
                }
                KeyCode::Esc => {
                    self.input_buffer.clear();
                    self.edit_stage = 0;
                }
                _ => {}
            }
        }
    }

    fn render_policy_view(&self, f: &mut Frame, area: ratatui::layout::Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(5),    // policy table
                Constraint::Length(2), // hints
            ])
            .split(area);

        let header = Row::new(vec![
            Cell::from("Setting").style(Style::default().add_modifier(Modifier::BOLD)),
            Cell::from("Value").style(Style::default().add_modifier(Modifier::BOLD)),
        ]);

        let mut rows: Vec<Row> = Vec::new();
        for (i, name) in WEEKDAY_NAMES.iter().enumerate() {
            let blocked = self.policy.day_disabled(i as u8);
            let value = if blocked { "blocked" } else { "open" };
            let color = if blocked { Color::Red } else { APPROVED_COLOR };
            rows.push(Row::new(vec![
                Cell::from(format!("  Blackout {}", name)),
                Cell::from(value).style(Style::default().fg(color)),
            ]));
        }
        rows.push(Row::new(vec![
            Cell::from("  Booking range"),
            Cell::from(self.policy.week_range.label()),
        ]));
        for (i, shift) in self.policy.shifts.iter().enumerate() {
            let value = if self.edit_stage == 1 && self.list_cursor == 8 + i {
                format!("{}_", self.input_buffer)
            } else {
                shift.slots.to_string()
            };
            rows.push(Row::new(vec![
                Cell::from(format!("  {} slots", shift.name)),
                Cell::from(value),
            ]));
        }

        let mut table_state = TableState::default();
        table_state.select(Some(self.list_cursor));

        let table = Table::new(rows, [Constraint::Length(24), Constraint::Min(20)])
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Leave Policy  (Enter=toggle/cycle/edit  Esc=back) "),
            )
            .row_highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            );

        f.render_stateful_widget(table, chunks[0], &mut table_state);

        let hint_text = if self.edit_stage == 1 {
            "Type slot count  Enter=save  Esc=cancel"
        } else {
            "↑↓=select  Enter=toggle blackout / cycle range / edit slots  Esc=back"
        };
        let hints = Paragraph::new(Line::from(Span::styled(
            hint_text,
            Style::default().fg(Color::DarkGray),
        )));
        f.render_widget(hints, chunks[1]);
    }

    // ── Settings view ─────────────────────────────────────────────────────────

    fn handle_settings_key(&mut self, code: KeyCode) {
        if self.edit_stage == 0 {
            match code {
                KeyCode::Up => {
                    if self.list_cursor > 0 {
                        self.list_cursor -= 1;
                    }
                }
                KeyCode::Down => {
                    if self.list_cursor < 2 {
                        self.list_cursor += 1;
                    }
                }
                KeyCode::Enter | KeyCode::Char('e') => match self.list_cursor {
                    0 => {
                        self.input_buffer = self.settings.user_id.clone();
                        self.edit_stage = 1;
                    }
                    1 => {
                        self.settings.admin = !self.settings.admin;
                    }
                    _ => {
                        self.input_buffer = self.settings.theme.clone();
                        self.edit_stage = 1;
                    }
                },
                KeyCode::Esc | KeyCode::Char('q') => {
                    self.view_state = ViewState::Calendar;
                }
                _ => {}
            }
        } else {
            match code {
                KeyCode::Char(c) => {
                    self.input_buffer.push(c);
                }
                KeyCode::Backspace => {
                    self.input_buffer.pop();
                }
                KeyCode::Enter => {
                    let value = self.input_buffer.clone();
                    if !value.is_empty() {
                        match self.list_cursor {
                            0 => self.settings.user_id = value,
                            _ => self.settings.theme = value,
                        }
                        // Booked weeks are per-user
                        self.refresh();
                    }
                    self.input_buffer.clear();
                    self.edit_stage = 0;
                }
                KeyCode::Esc => {
                    self.input_buffer.clear();
                    self.edit_stage = 0;
                }
                _ => {}
            }
        }
    }

    fn render_settings_view(&self, f: &mut Frame, area: ratatui::layout::Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(5),    // settings table
                Constraint::Length(2), // hints
            ])
            .split(area);

        let header = Row::new(vec![
            Cell::from("Setting").style(Style::default().add_modifier(Modifier::BOLD)),
            Cell::from("Value").style(Style::default().add_modifier(Modifier::BOLD)),
        ]);

        let admin_value = if self.settings.admin { "yes" } else { "no" }.to_string();
        let fields = [
            ("User id", self.settings.user_id.clone()),
            ("Admin", admin_value),
            ("Theme", self.settings.theme.clone()),
        ];

        let rows: Vec<Row> = fields
            .iter()
            .enumerate()
            .map(|(i, (label, current_val))| {
                let value = if self.edit_stage == 1 && self.list_cursor == i {
                    format!("{}_", self.input_buffer)
                } else {
                    current_val.clone()
                };
                Row::new(vec![Cell::from(format!("  {}", label)), Cell::from(value)])
            })
            .collect();

        let mut table_state = TableState::default();
        table_state.select(Some(self.list_cursor));

        let table = Table::new(rows, [Constraint::Length(22), Constraint::Min(30)])
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Settings  (↑↓=select  Enter=edit/toggle  Esc=back) "),
            )
            .row_highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            );

        f.render_stateful_widget(table, chunks[0], &mut table_state);

        let hint_text = if self.edit_stage == 1 {
            "Type new value  Enter=save  Esc=cancel"
        } else {
            "↑↓=select  Enter=edit/toggle  Esc=back to calendar"
        };
        let hints = Paragraph::new(Line::from(Span::styled(
            hint_text,
            Style::default().fg(Color::DarkGray),
        )));
        f.render_widget(hints, chunks[1]);
    }

    // ── Calendar view ─────────────────────────────────────────────────────────

    pub fn render(&mut self, f: &mut Frame) {
        match self.view_state {
            ViewState::Leaves => {
                let area = f.area();
                self.render_leaves_view(f, area);
            }
            ViewState::Policy => {
                let area = f.area();
                self.render_policy_view(f, area);
            }
            ViewState::Settings => {
                let area = f.area();
                self.render_settings_view(f, area);
            }
            ViewState::Calendar => {
                let size = f.area();

                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(10), // calendar (up to 3 months, 8 rows + padding)
                        Constraint::Min(10),    // selected-day panel
                        Constraint::Length(6),  // help table
                        Constraint::Length(1),  // data dir footer
                    ])
                    .split(size);

                self.render_calendar(f, chunks[0]);
                self.render_day_panel(f, chunks[1]);
                self.render_help(f, chunks[2]);

                let footer = Paragraph::new(Line::from(vec![
                    Span::styled("Data  ", Style::default().add_modifier(Modifier::DIM)),
                    Span::styled(
                        self.data_dir.to_string_lossy().to_string(),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]));
                f.render_widget(footer, chunks[3]);
            }
        }
    }

    fn render_calendar(&self, f: &mut Frame, area: ratatui::layout::Rect) {
        let by_date = self.leave_data.leaves_by_date(&self.settings.user_id);

        // Fixed-width columns: 21-char months, 11-char gaps, Min(0) absorbs leftover
        const MONTH_WIDTH: u16 = 21;
        const GAP_WIDTH: u16 = 11;
        let month_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(MONTH_WIDTH),
                Constraint::Length(GAP_WIDTH),
                Constraint::Length(MONTH_WIDTH),
                Constraint::Length(GAP_WIDTH),
                Constraint::Length(MONTH_WIDTH),
                Constraint::Min(0),
            ])
            .split(area);
        let month_rects = [month_chunks[0], month_chunks[2], month_chunks[4]];

        let first_of_month =
            NaiveDate::from_ymd_opt(self.today.year(), self.today.month(), 1).unwrap_or(self.today);

        for i in 0..3 {
            let month_date = add_months(first_of_month, i as i32);
            let year = month_date.year();
            let month = month_date.month();

            let title = format!("{} {}", month_name(month), year);
            let header = "Su Mo Tu We Th Fr Sa";

            let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
            let days_in_month = days_in_month(year, month);
            let start_dow = first.weekday().num_days_from_sunday() as usize;

            let mut lines: Vec<Line> = vec![
                Line::from(Span::styled(
                    format!("{:^21}", title),
                    Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                )),
                Line::from(header),
            ];

            let mut day = 1usize;
            for _row in 0..6 {
                if day > days_in_month as usize {
                    break;
                }
                let mut spans = Vec::new();
                for col in 0..7usize {
                    if (_row == 0 && col < start_dow) || day > days_in_month as usize {
                        spans.push(Span::raw("   "));
                        continue;
                    }
                    let date = NaiveDate::from_ymd_opt(year, month, day as u32).unwrap();
                    let key = date_key(date);
                    let day_str = format!("{:2}", day);

                    let has_own_leave = by_date
                        .get(&key)
                        .map(|ls| ls.iter().any(|l| l.status.is_active()))
                        .unwrap_or(false);
                    let in_window = self.window.contains(date);
                    let selectable =
                        in_window && self.eligibility_for(date).selectable();

                    let style = day_style(
                        date == self.selected_date,
                        has_own_leave,
                        selectable,
                        date == self.today,
                        in_window,
                    );

                    spans.push(Span::styled(day_str, style));
                    spans.push(Span::raw(" "));
                    day += 1;
                }
                lines.push(Line::from(spans));
            }

            let calendar_widget =
                Paragraph::new(lines).block(Block::default().borders(Borders::NONE));
            f.render_widget(calendar_widget, month_rects[i]);
        }
    }

    fn render_day_panel(&self, f: &mut Frame, area: ratatui::layout::Rect) {
        let key = date_key(self.selected_date);
        let eligibility = self.eligibility_for(self.selected_date);

        let mut lines: Vec<Line> = Vec::new();

        if let Some((msg, color)) = &self.status_line {
            lines.push(Line::from(Span::styled(
                msg.clone(),
                Style::default().fg(*color).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(""));
        }

        lines.push(Line::from(vec![
            Span::raw("Selected: "),
            Span::styled(key.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!(
                "    Booking window: {} - {} ({})",
                date_key(self.window.min_date),
                date_key(self.window.max_date),
                self.policy.week_range.label()
            )),
        ]));

        if eligibility.selectable() {
            lines.push(Line::from(Span::styled(
                "  Selectable: press Enter to request leave",
                Style::default().fg(APPROVED_COLOR),
            )));
        } else {
            lines.push(Line::from("  Not selectable:"));
            for reason in &eligibility.reasons {
                lines.push(Line::from(Span::styled(
                    format!("    - {}", reason),
                    Style::default().fg(Color::Red),
                )));
            }
        }

        // Own leaves on this date
        let by_date = self.leave_data.leaves_by_date(&self.settings.user_id);
        if let Some(own) = by_date.get(&key) {
            for leave in own {
                let shift_name = self
                    .policy
                    .shift(&leave.shift_id)
                    .map(|s| s.name.as_str())
                    .unwrap_or(leave.shift_id.as_str());
                lines.push(Line::from(format!(
                    "  {} {} ({})",
                    leave.id,
                    shift_name,
                    leave.status.label()
                )));
            }
        }

        lines.push(Line::from(""));
        match self.mode {
            Mode::PickShift => {
                lines.push(Line::from("  Choose a shift:"));
                for (i, shift) in self.policy.shifts.iter().enumerate() {
                    let prefix = if i == self.shift_cursor { "  > " } else { "    " };
                    let occupancy = match self.slot_data.shift_detail(&key, &shift.id) {
                        Some(d) => {
                            let verdict = if shift_is_offerable(d) { "open" } else { "full" };
                            format!("{} / {}  {}", d.available_slots, d.total_slots, verdict)
                        }
                        None => "no detail fetched".to_string(),
                    };
                    lines.push(Line::from(format!(
                        "{}{:<12} {}",
                        prefix, shift.name, occupancy
                    )));
                }
                lines.push(Line::from("  Enter=confirm  Esc=cancel  ↑↓=move"));
            }
            Mode::Reason => {
                lines.push(Line::from(format!(
                    "  Reason (optional): {}_",
                    self.input_buffer
                )));
                lines.push(Line::from("  Enter=submit  Esc=cancel"));
            }
            Mode::Normal => {
                lines.push(Line::from(format!("  Shifts on {}:", key)));
                match self.slot_data.detail(&key) {
                    Some(details) => {
                        for detail in details {
                            let name = self
                                .policy
                                .shift(&detail.shift_id)
                                .map(|s| s.name.as_str())
                                .unwrap_or(detail.shift_id.as_str());
                            let verdict =
                                if shift_is_offerable(detail) { "open" } else { "full" };
                            lines.push(Line::from(format!(
                                "    {:<12} {:>2} / {:<2}  {}",
                                name, detail.available_slots, detail.total_slots, verdict
                            )));
                        }
                    }
                    None => {
                        lines.push(Line::from("    (no slot detail fetched)"));
                    }
                }
            }
        }

        let p = Paragraph::new(lines).block(Block::default().borders(Borders::NONE));
        f.render_widget(p, area);
    }

    fn render_help(&self, f: &mut Frame, area: ratatui::layout::Rect) {
        let key_rows: Vec<Row> = vec![
            Row::new(vec!["← → ↑ ↓", "Move date", "Enter", "Request leave"]),
            Row::new(vec!["x", "Cancel pending", "l", "Leave requests"]),
            Row::new(vec!["b", "Policy (admin)", "o", "Settings"]),
            Row::new(vec!["q/Ctrl+C", "Quit", "", ""]),
        ];

        let help_table = Table::new(
            key_rows,
            [
                Constraint::Length(12),
                Constraint::Length(24),
                Constraint::Length(12),
                Constraint::Length(24),
            ],
        )
        .block(Block::default().borders(Borders::NONE))
        .column_spacing(1);

        f.render_widget(help_table, area);
    }
}

// ── App event loop ────────────────────────────────────────────────────────────

pub fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;
        if event::poll(StdDuration::from_millis(16))? {
            if let CEvent::Key(key) = event::read()? {
                if app.handle_key(key.code, key.modifiers) {
                    break;
                }
            }
        }
    }
    Ok(())
}

// ── Calendar helpers ──────────────────────────────────────────────────────────

pub(crate) fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

pub(crate) fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap()
        .signed_duration_since(NaiveDate::from_ymd_opt(year, month, 1).unwrap())
        .num_days() as u32
}

pub(crate) fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let year = date.year();
    let month = date.month() as i32;
    let new_total = month - 1 + months;
    let new_month = ((new_total % 12 + 12) % 12 + 1) as u32;
    let year_delta = new_total.div_euclid(12);
    let new_year = year + year_delta;
    let max_day = days_in_month(new_year, new_month);
    let new_day = date.day().min(max_day);
    NaiveDate::from_ymd_opt(new_year, new_month, new_day).unwrap_or(date)
}

/// Determines the ratatui `Style` for a calendar day cell based on its state.
pub(crate) fn day_style(
    is_selected: bool,
    has_own_leave: bool,
    selectable: bool,
    is_today: bool,
    in_window: bool,
) -> Style {
    if is_selected {
        let bg = if has_own_leave {
            PENDING_COLOR
        } else if selectable {
            APPROVED_COLOR
        } else {
            Color::White
        };
        Style::default()
            .fg(Color::Black)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    } else if has_own_leave {
        let mut s = Style::default()
            .fg(PENDING_COLOR)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        if is_today {
            s = s.add_modifier(Modifier::REVERSED);
        }
        s
    } else if is_today {
        Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
    } else if !in_window {
        Style::default().add_modifier(Modifier::DIM)
    } else if selectable {
        Style::default().fg(APPROVED_COLOR)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}
