use std::mem;

use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;
use tracing::{error, info};

use crate::commands::{
    begin_edit, delete_record, insert_record, search_records, submit_edit, Confirmation,
    DeleteOutcome, EditSession,
};
use crate::db::RecordStore;
use crate::error::RecordError;
use crate::view::RecordTable;

use super::forms::{ConfirmDelete, SearchPrompt, StudentField, StudentForm};
use super::helpers::{centered_rect, surface_error};

/// Window title shown above the table.
const TITLE: &str = "Student Management System";
/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;

/// Fine-grained modes layered over the student table.
enum Mode {
    Normal,
    Adding(StudentForm),
    Editing { id: i64, form: StudentForm },
    ConfirmDelete(ConfirmDelete),
    Searching(SearchPrompt),
    NoResults { name: String },
    About,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    store: RecordStore,
    table: RecordTable,
    mode: Mode,
    status: Option<StatusMessage>,
    /// Whether the edit/delete actions are offered in the footer. Set once a
    /// row has been picked, cleared when the table empties.
    actions_visible: bool,
}

impl App {
    pub fn new(store: RecordStore, table: RecordTable) -> Self {
        Self {
            store,
            table,
            mode: Mode::Normal,
            status: None,
            actions_visible: false,
        }
    }

    /// Feed one key press through the current mode. Returns `true` when the
    /// user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::Adding(form) => self.handle_add(code, form),
            Mode::Editing { id, form } => self.handle_edit(code, id, form),
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm),
            Mode::Searching(prompt) => self.handle_search(code, prompt),
            Mode::NoResults { .. } | Mode::About => Mode::Normal,
        };

        exit
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                *exit = true;
                Mode::Normal
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.table.select_previous();
                self.sync_actions();
                Mode::Normal
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.table.select_next();
                self.sync_actions();
                Mode::Normal
            }
            KeyCode::Char('a') => {
                self.clear_status();
                Mode::Adding(StudentForm::default())
            }
            KeyCode::Char('/') | KeyCode::Char('s') => {
                self.clear_status();
                Mode::Searching(SearchPrompt::default())
            }
            KeyCode::Char('e') => self.open_edit(),
            KeyCode::Char('d') => self.open_delete(),
            KeyCode::Char('?') => Mode::About,
            _ => Mode::Normal,
        }
    }

    fn open_edit(&mut self) -> Mode {
        let Some(id) = self.selected_id() else {
            self.set_status("Select a record first.", StatusKind::Error);
            return Mode::Normal;
        };
        match begin_edit(&self.store, &self.table, id) {
            Ok(EditSession { id, draft }) => Mode::Editing {
                id,
                form: StudentForm::from_draft(&draft),
            },
            Err(err) => {
                self.report(&err);
                Mode::Normal
            }
        }
    }

    fn open_delete(&mut self) -> Mode {
        let confirm = self
            .selected_id()
            .and_then(|_| self.table.selected())
            .map(ConfirmDelete::from);
        match confirm {
            Some(confirm) => Mode::ConfirmDelete(confirm),
            None => {
                self.set_status("Select a record first.", StatusKind::Error);
                Mode::Normal
            }
        }
    }

    fn handle_add(&mut self, code: KeyCode, mut form: StudentForm) -> Mode {
        if !apply_form_key(code, &mut form) {
            self.set_status("Add student cancelled.", StatusKind::Info);
            return Mode::Normal;
        }
        if code != KeyCode::Enter {
            return Mode::Adding(form);
        }

        match insert_record(&self.store, &mut self.table, &form.draft()) {
            Ok(id) => {
                self.table.select_id(id);
                self.sync_actions();
                self.set_status(format!("Added student {id}."), StatusKind::Info);
                Mode::Normal
            }
            Err(err) => {
                form.error = Some(self.report(&err));
                Mode::Adding(form)
            }
        }
    }

    fn handle_edit(&mut self, code: KeyCode, id: i64, mut form: StudentForm) -> Mode {
        if !apply_form_key(code, &mut form) {
            self.set_status("Edit cancelled.", StatusKind::Info);
            return Mode::Normal;
        }
        if code != KeyCode::Enter {
            return Mode::Editing { id, form };
        }

        let session = EditSession {
            id,
            draft: form.draft(),
        };
        match submit_edit(&self.store, &mut self.table, &session) {
            Ok(()) => {
                self.sync_actions();
                self.set_status(format!("Updated student {id}."), StatusKind::Info);
                Mode::Normal
            }
            Err(err) => {
                form.error = Some(self.report(&err));
                Mode::Editing { id, form }
            }
        }
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmDelete) -> Mode {
        let confirmation = match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => Confirmation::No,
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => Confirmation::Yes,
            _ => return Mode::ConfirmDelete(confirm),
        };

        match delete_record(&self.store, &mut self.table, confirm.id, confirmation) {
            Ok(DeleteOutcome::Deleted) => {
                self.sync_actions();
                self.set_status("The record was deleted successfully!", StatusKind::Info);
                Mode::Normal
            }
            Ok(DeleteOutcome::Cancelled) => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Mode::Normal
            }
            Err(err) => {
                self.report(&err);
                Mode::Normal
            }
        }
    }

    fn handle_search(&mut self, code: KeyCode, mut prompt: SearchPrompt) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Search cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Backspace => {
                prompt.query.pop();
                Mode::Searching(prompt)
            }
            KeyCode::Enter => match search_records(&self.store, &mut self.table, &prompt.query) {
                Ok(hits) => {
                    self.sync_actions();
                    self.set_status(
                        format!("Found {} matching record(s).", hits.len()),
                        StatusKind::Info,
                    );
                    Mode::Normal
                }
                Err(RecordError::NoResultsFound { name }) => Mode::NoResults { name },
                Err(err) => {
                    self.report(&err);
                    Mode::Normal
                }
            },
            KeyCode::Char(ch) if !ch.is_control() => {
                prompt.query.push(ch);
                Mode::Searching(prompt)
            }
            _ => Mode::Searching(prompt),
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        self.draw_table(frame, content_area);
        self.draw_footer(frame, footer_area);

        match &self.mode {
            Mode::Adding(form) => self.draw_student_form(frame, area, "Insert Student Data", form),
            Mode::Editing { form, .. } => {
                self.draw_student_form(frame, area, "Update Student Data", form)
            }
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::Searching(prompt) => self.draw_search_bar(frame, area, prompt),
            Mode::NoResults { name } => self.draw_notice(
                frame,
                area,
                "No Results Found",
                vec![
                    Line::from("No search results were found."),
                    Line::from(Span::styled(
                        format!("Nobody is named \"{name}\"."),
                        Style::default().fg(Color::Gray),
                    )),
                ],
            ),
            Mode::About => self.draw_notice(
                frame,
                area,
                "About",
                vec![
                    Line::from("This app was created using the Ratatui library."),
                    Line::from(format!("Version {}", env!("CARGO_PKG_VERSION"))),
                ],
            ),
            Mode::Normal => {}
        }
    }

    fn draw_table(&self, frame: &mut Frame, area: Rect) {
        let header_style = Style::default().add_modifier(Modifier::BOLD);
        let header = Row::new(["Id", "Name", "Course", "Mobile"].map(Cell::from))
            .style(header_style)
            .bottom_margin(1);

        let rows = self.table.rows().iter().map(|record| {
            let style = if self.table.is_highlighted(record.id) {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            Row::new([
                Cell::from(record.id.to_string()),
                Cell::from(record.name.clone()),
                Cell::from(record.course.to_string()),
                Cell::from(record.mobile.clone()),
            ])
            .style(style)
        });

        let widths = [
            Constraint::Length(6),
            Constraint::Percentage(40),
            Constraint::Length(12),
            Constraint::Percentage(30),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().title(TITLE).borders(Borders::ALL))
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        let mut state = TableState::default().with_selected(self.table.cursor());
        frame.render_stateful_widget(table, area, &mut state);

        if self.table.is_empty() {
            let inner = Block::default().borders(Borders::ALL).inner(area);
            let hint = Paragraph::new(Line::from(Span::styled(
                "No students yet. Press A to add one.",
                Style::default().fg(Color::DarkGray),
            )))
            .alignment(Alignment::Center);
            let hint_area = Rect {
                y: inner.y + 2u16.min(inner.height),
                height: inner.height.saturating_sub(2),
                ..inner
            };
            frame.render_widget(hint, hint_area);
        }
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph =
            Paragraph::new(vec![status_line, self.footer_instructions()]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match &self.mode {
            Mode::Adding(_) | Mode::Editing { .. } => Line::from(vec![
                Span::styled("[Tab]", key_style),
                Span::raw(" Next Field   "),
                Span::styled("[←→]", key_style),
                Span::raw(" Course   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Submit   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            Mode::Searching(_) => Line::from(vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" Search   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            Mode::ConfirmDelete(_) => Line::from(vec![
                Span::styled("[Y]", key_style),
                Span::raw(" Yes   "),
                Span::styled("[N]", key_style),
                Span::raw(" No"),
            ]),
            Mode::NoResults { .. } | Mode::About => Line::from(vec![
                Span::styled("[Any key]", key_style),
                Span::raw(" Close"),
            ]),
            Mode::Normal => {
                let mut spans = vec![
                    Span::styled("[↑↓]", key_style),
                    Span::raw(" Select   "),
                    Span::styled("[A]", key_style),
                    Span::raw(" Add Student   "),
                    Span::styled("[/]", key_style),
                    Span::raw(" Search   "),
                ];
                if self.actions_visible {
                    spans.extend([
                        Span::styled("[E]", key_style),
                        Span::raw(" Edit Record   "),
                        Span::styled("[D]", key_style),
                        Span::raw(" Delete Record   "),
                    ]);
                }
                spans.extend([
                    Span::styled("[?]", key_style),
                    Span::raw(" About   "),
                    Span::styled("[Q]", key_style),
                    Span::raw(" Quit"),
                ]);
                Line::from(spans)
            }
        }
    }

    fn draw_student_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &StudentForm) {
        let popup_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            form.build_line(StudentField::Name),
            form.build_line(StudentField::Course),
            form.build_line(StudentField::Mobile),
            Line::from(""),
        ];

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to submit • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        if let Some(column) = form.cursor_column() {
            frame.set_cursor_position((inner.x + column, inner.y + form.active.row()));
        }
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Delete Student Data")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from("Are you sure you want to delete?"),
            Line::from(format!("Student {} ({})", confirm.id, confirm.name)),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect, prompt: &SearchPrompt) {
        let height = 3u16.min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title("Search Student Records");
        let paragraph = Paragraph::new(Span::raw(format!("Name: {}", prompt.query)))
            .block(block.clone())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        let cursor_x = inner.x + "Name: ".len() as u16 + prompt.query.chars().count() as u16;
        frame.set_cursor_position((cursor_x, inner.y));
    }

    fn draw_notice(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        mut lines: Vec<Line<'static>>,
    ) {
        let popup_area = centered_rect(50, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title).borders(Borders::ALL);
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press any key to close.",
            Style::default().fg(Color::Gray),
        )));

        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);
    }

    fn selected_id(&self) -> Option<i64> {
        if !self.actions_visible {
            return None;
        }
        self.table.selected().map(|record| record.id)
    }

    /// Offer edit/delete only while some row is actually selected.
    fn sync_actions(&mut self) {
        self.actions_visible = self.table.selected().is_some();
    }

    /// Log a handler failure, show it in the footer, and hand back the text.
    fn report(&mut self, err: &RecordError) -> String {
        error!(error = %err, "student operation failed");
        let message = surface_error(err);
        self.set_status(message.clone(), StatusKind::Error);
        message
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        let text = text.into();
        if matches!(kind, StatusKind::Info) {
            info!(status = %text);
        }
        self.status = Some(StatusMessage { text, kind });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}

/// Shared key handling for the add and edit forms. Returns `false` when
/// the form was dismissed.
fn apply_form_key(code: KeyCode, form: &mut StudentForm) -> bool {
    match code {
        KeyCode::Esc => return false,
        KeyCode::Tab | KeyCode::Down => form.cycle_field(true),
        KeyCode::BackTab | KeyCode::Up => form.cycle_field(false),
        KeyCode::Left => {
            form.cycle_course(-1);
        }
        KeyCode::Right => {
            form.cycle_course(1);
        }
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(' ') if form.active == StudentField::Course => {
            form.cycle_course(1);
        }
        KeyCode::Char(ch) => {
            if form.push_char(ch) {
                form.error = None;
            }
        }
        _ => {}
    }
    true
}
