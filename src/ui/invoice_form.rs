use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::invoice_gen::SubmitOutcome;
use crate::models::amount::format_khr;
use crate::models::invoice_form::{ITEMS_ERROR_KEY, NOTE_COUNT};
use crate::models::{FormErrors, FormField, InvoiceForm, ItemField};
use crate::ui::components::popup::render_notification;

const NOTES_PER_LINE: usize = 4;

// Represents the input the cursor is on
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Cursor {
    Field(FormField),
    Item(usize, ItemField),
    Note(usize),
}

pub enum InvoiceFormAction {
    Submit,
    Quit,
}

struct Notification {
    message: &'static str,
    is_error: bool,
}

pub struct InvoiceFormState {
    form: InvoiceForm,
    errors: FormErrors,
    position: usize,
    editing: bool,
    active_input: String,
    notification: Option<Notification>,
}

impl InvoiceFormState {
    pub fn new(institution_name: &str) -> Self {
        Self {
            form: InvoiceForm::new(institution_name),
            errors: FormErrors::new(),
            position: 0,
            editing: false,
            active_input: String::new(),
            notification: None,
        }
    }

    pub fn form(&self) -> &InvoiceForm {
        &self.form
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn notification(&self) -> Option<&str> {
        self.notification.as_ref().map(|n| n.message)
    }

    // Header fields, then every item column row by row, then the notes
    fn cursors(&self) -> Vec<Cursor> {
        let mut cursors: Vec<Cursor> = FormField::ALL.iter().copied().map(Cursor::Field).collect();
        for index in 0..self.form.items.len() {
            cursors.extend(ItemField::ALL.iter().map(|field| Cursor::Item(index, *field)));
        }
        cursors.extend((0..NOTE_COUNT).map(Cursor::Note));
        cursors
    }

    pub fn cursor(&self) -> Cursor {
        let cursors = self.cursors();
        cursors[self.position.min(cursors.len() - 1)]
    }

    pub fn next_position(&mut self) {
        self.position = (self.position + 1) % self.cursors().len();
    }

    pub fn previous_position(&mut self) {
        let len = self.cursors().len();
        self.position = (self.position + len - 1) % len;
    }

    fn current_text(&self) -> String {
        match self.cursor() {
            Cursor::Field(field) => self.form.field(field).to_string(),
            Cursor::Item(index, field) => self.form.items[index].field_text(field),
            Cursor::Note(index) => self.form.notes[index].clone(),
        }
    }

    fn start_editing(&mut self) {
        self.active_input = self.current_text();
        self.editing = true;
    }

    fn stop_editing(&mut self) {
        self.editing = false;
        self.active_input.clear();
    }

    // Every keystroke replaces the form, so totals are current while typing
    fn apply_input(&mut self) {
        self.form = match self.cursor() {
            Cursor::Field(field) => self.form.with_field(field, &self.active_input),
            Cursor::Item(index, field) => self.form.with_item_field(index, field, &self.active_input),
            Cursor::Note(index) => self.form.with_note(index, &self.active_input),
        };
    }

    pub fn add_item(&mut self) {
        self.form = self.form.with_item_added();
        let last = self.form.items.len() - 1;
        self.position = FormField::ALL.len() + last * ItemField::ALL.len();
    }

    /// Record the result of a submit and raise its notification
    pub fn show_outcome(&mut self, outcome: &SubmitOutcome) {
        self.errors = match outcome {
            SubmitOutcome::Blocked(errors) => errors.clone(),
            _ => FormErrors::new(),
        };
        self.notification = Some(Notification {
            message: outcome.notification(),
            is_error: !matches!(outcome, SubmitOutcome::Exported(_)),
        });
    }

    pub fn handle_key(&mut self, key: KeyCode) -> Option<InvoiceFormAction> {
        if self.notification.take().is_some() {
            return None;
        }

        if self.editing {
            match key {
                KeyCode::Char(c) => {
                    self.active_input.push(c);
                    self.apply_input();
                }
                KeyCode::Backspace => {
                    self.active_input.pop();
                    self.apply_input();
                }
                KeyCode::Enter | KeyCode::Esc => self.stop_editing(),
                KeyCode::Tab => {
                    self.stop_editing();
                    self.next_position();
                }
                KeyCode::BackTab => {
                    self.stop_editing();
                    self.previous_position();
                }
                _ => {}
            }
            return None;
        }

        match key {
            KeyCode::Esc | KeyCode::Char('q') => return Some(InvoiceFormAction::Quit),
            KeyCode::Char('s') => return Some(InvoiceFormAction::Submit),
            KeyCode::Char('a') => self.add_item(),
            KeyCode::Enter => self.start_editing(),
            KeyCode::Down | KeyCode::Tab => self.next_position(),
            KeyCode::Up | KeyCode::BackTab => self.previous_position(),
            _ => {}
        }
        None
    }

    fn shown_text(&self, at: Cursor, value: String) -> String {
        if self.editing && self.cursor() == at {
            format!("{}|", self.active_input)
        } else {
            value
        }
    }

    fn highlight(&self, at: Cursor) -> Style {
        if self.cursor() == at {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        }
    }

    fn field_line(&self, field: FormField) -> Spans<'static> {
        let at = Cursor::Field(field);
        let mut spans = vec![
            Span::styled(format!("{}: ", field.label()), self.highlight(at)),
            Span::raw(self.shown_text(at, self.form.field(field).to_string())),
        ];
        if let Some(message) = self.errors.get(field.key()) {
            spans.push(Span::styled(format!("  {message}"), Style::default().fg(Color::Red)));
        }
        Spans::from(spans)
    }
}

pub fn render_invoice_form<B: Backend>(frame: &mut Frame<B>, state: &InvoiceFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(4), // Title
                Constraint::Length(3), // Preparer
                Constraint::Length(5), // Sender / receiver
                Constraint::Min(6),    // Line items
                Constraint::Length(4), // Notes
                Constraint::Length(3), // Help
            ]
            .as_ref(),
        )
        .split(frame.size());

    let title = Paragraph::new(vec![
        Spans::from(Span::styled(
            "Monthly Price List",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Spans::from(state.form.institution_name.as_str()),
    ])
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    let preparer = Paragraph::new(state.field_line(FormField::PreparerName))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(preparer, chunks[1]);

    render_parties(frame, state, chunks[2]);
    render_items(frame, state, chunks[3]);
    render_notes(frame, state, chunks[4]);

    let help_text = if state.editing {
        "Type to edit | Enter/Esc - Done | Tab - Done and next"
    } else {
        "Up/Down - Navigate | Enter - Edit | A - Add item | S - Submit & export PDF | Esc - Quit"
    };
    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, chunks[5]);

    if let Some(notification) = &state.notification {
        let (title, color) = if notification.is_error {
            ("Error", Color::Red)
        } else {
            ("Done", Color::Green)
        };
        render_notification(frame, title, notification.message, color);
    }
}

fn render_parties<B: Backend>(frame: &mut Frame<B>, state: &InvoiceFormState, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(area);

    let sender = Paragraph::new(vec![
        state.field_line(FormField::SenderCode),
        state.field_line(FormField::SenderAddress),
        state.field_line(FormField::SenderPhone),
    ])
    .block(Block::default().title("Sender").borders(Borders::ALL));
    frame.render_widget(sender, columns[0]);

    let receiver = Paragraph::new(vec![
        state.field_line(FormField::ReceiverCode),
        state.field_line(FormField::ReceiverAddress),
        state.field_line(FormField::ReceiverPhone),
    ])
    .block(Block::default().title("Receiver").borders(Borders::ALL));
    frame.render_widget(receiver, columns[1]);
}

fn render_items<B: Backend>(frame: &mut Frame<B>, state: &InvoiceFormState, area: Rect) {
    let mut rows: Vec<Row> = state
        .form
        .items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let cell = |field: ItemField, value: String| {
                let at = Cursor::Item(index, field);
                Cell::from(state.shown_text(at, value)).style(state.highlight(at))
            };
            Row::new(vec![
                Cell::from(item.id.to_string()),
                cell(ItemField::Name, item.name.clone()),
                cell(ItemField::Quantity, item.quantity.to_string()),
                cell(ItemField::Unit, item.unit.clone()),
                cell(ItemField::Price, format_khr(item.price)),
                Cell::from(format_khr(item.total)),
                cell(ItemField::Note, item.note.clone()),
            ])
        })
        .collect();

    rows.push(
        Row::new(vec![
            Cell::from(""),
            Cell::from(""),
            Cell::from(""),
            Cell::from(""),
            Cell::from("Total"),
            Cell::from(format_khr(state.form.total)),
            Cell::from(""),
        ])
        .style(Style::default().add_modifier(Modifier::BOLD)),
    );

    let (title, title_style) = match state.errors.get(ITEMS_ERROR_KEY) {
        Some(message) => (format!("Items - {message}"), Style::default().fg(Color::Red)),
        None => ("Items".to_string(), Style::default()),
    };

    let widths = [
        Constraint::Length(4),
        Constraint::Percentage(22),
        Constraint::Length(10),
        Constraint::Length(6),
        Constraint::Length(16),
        Constraint::Length(18),
        Constraint::Percentage(22),
    ];

    let table = Table::new(rows)
        .header(
            Row::new(vec!["No.", "Item", "Quantity", "Unit", "Unit price", "Total", "Note"])
                .style(Style::default().add_modifier(Modifier::UNDERLINED)),
        )
        .block(
            Block::default()
                .title(Span::styled(title, title_style))
                .borders(Borders::ALL),
        )
        .widths(&widths)
        .column_spacing(1);

    frame.render_widget(table, area);
}

fn render_notes<B: Backend>(frame: &mut Frame<B>, state: &InvoiceFormState, area: Rect) {
    let lines: Vec<Spans> = state
        .form
        .notes
        .chunks(NOTES_PER_LINE)
        .enumerate()
        .map(|(line, notes)| {
            let spans: Vec<Span> = notes
                .iter()
                .enumerate()
                .map(|(offset, note)| {
                    let index = line * NOTES_PER_LINE + offset;
                    let at = Cursor::Note(index);
                    Span::styled(
                        format!("No({}) {:<14}", index + 1, state.shown_text(at, note.clone())),
                        state.highlight(at),
                    )
                })
                .collect();
            Spans::from(spans)
        })
        .collect();

    let notes = Paragraph::new(lines)
        .block(Block::default().title("Reference numbers").borders(Borders::ALL));
    frame.render_widget(notes, area);
}

pub fn handle_input(state: &mut InvoiceFormState) -> Result<Option<InvoiceFormAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(state.handle_key(key.code));
    }

    Ok(None)
}
