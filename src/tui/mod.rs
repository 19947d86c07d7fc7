//! Ratatui-based terminal UI.
//!
//! A property form on the left and a live chart on the right. Every edit
//! recomputes the valuation; PSF and quantum fields stay synchronized through
//! the size.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

use crate::app::pipeline::{RunOutput, run_report, write_exports};
use crate::cli::ReportArgs;
use crate::domain::{
    BrandingAsset, DisplayMetadata, EditedField, PropertyInputs, PsfQuantum, Rgb, RunConfig,
};
use crate::error::AppError;
use crate::io::ExportFormat;
use crate::report::{ReportSpec, fmt_money, fmt_pct};
use crate::valuation::sync_pair;

mod plotters_chart;

use plotters_chart::PsfPlottersChart;

/// Start the TUI.
pub fn run(args: ReportArgs) -> Result<(), AppError> {
    let config = crate::app::run_config_from_args(&args)?;
    let branding = crate::io::resolve_branding(config.logo.as_deref());
    let form = Form::from_args(&args);

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(form, config, branding);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Form fields, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Dev,
    Unit,
    Size,
    UnitType,
    PreparedBy,
    TransactedLow,
    TransactedHigh,
    AskingLow,
    AskingHigh,
    FmvPsf,
    FmvQuantum,
    AskPsf,
    AskQuantum,
}

impl Field {
    const ALL: [Field; 13] = [
        Field::Dev,
        Field::Unit,
        Field::Size,
        Field::UnitType,
        Field::PreparedBy,
        Field::TransactedLow,
        Field::TransactedHigh,
        Field::AskingLow,
        Field::AskingHigh,
        Field::FmvPsf,
        Field::FmvQuantum,
        Field::AskPsf,
        Field::AskQuantum,
    ];

    fn label(self) -> &'static str {
        match self {
            Field::Dev => "Dev name",
            Field::Unit => "Unit no",
            Field::Size => "Size (sqft)",
            Field::UnitType => "Unit type",
            Field::PreparedBy => "Prepared by",
            Field::TransactedLow => "Transacted low",
            Field::TransactedHigh => "Transacted high",
            Field::AskingLow => "Asking low",
            Field::AskingHigh => "Asking high",
            Field::FmvPsf => "FMV psf",
            Field::FmvQuantum => "FMV quantum",
            Field::AskPsf => "My ask psf",
            Field::AskQuantum => "My ask quantum",
        }
    }

    fn is_text(self) -> bool {
        matches!(
            self,
            Field::Dev | Field::Unit | Field::UnitType | Field::PreparedBy
        )
    }

    fn is_quantum(self) -> bool {
        matches!(self, Field::FmvQuantum | Field::AskQuantum)
    }

    /// Increment used by ←/→.
    fn step(self) -> f64 {
        match self {
            Field::FmvQuantum | Field::AskQuantum => 10_000.0,
            _ => 10.0,
        }
    }
}

/// Editable state of the form, independent of the terminal.
#[derive(Debug, Clone, PartialEq)]
struct Form {
    dev: String,
    unit: String,
    unit_type: String,
    prepared_by: String,
    size: Option<f64>,
    transacted_low: Option<f64>,
    transacted_high: Option<f64>,
    asking_low: Option<f64>,
    asking_high: Option<f64>,
    fmv: PsfQuantum,
    ask: PsfQuantum,
}

impl Form {
    /// The demo property shown when the TUI starts without inputs.
    fn sample() -> Self {
        let mut form = Self {
            dev: "KRHR".to_string(),
            unit: "02-57".to_string(),
            unit_type: "3 Room".to_string(),
            prepared_by: String::new(),
            size: Some(1079.0),
            transacted_low: Some(1000.0),
            transacted_high: Some(1200.0),
            asking_low: Some(1050.0),
            asking_high: Some(1300.0),
            fmv: PsfQuantum { psf: Some(1150.0), quantum: None },
            ask: PsfQuantum { psf: Some(1250.0), quantum: None },
        };
        form.resync_quanta();
        form
    }

    /// Use the given flags, or the sample property when none were given.
    fn from_args(args: &ReportArgs) -> Self {
        let i = &args.inputs;
        let any_given = i.property_inputs() != PropertyInputs::default()
            || [&i.dev, &i.unit, &i.unit_type, &i.prepared_by]
                .iter()
                .any(|s| !s.trim().is_empty());
        if !any_given {
            return Self::sample();
        }

        let mut form = Self {
            dev: i.dev.clone(),
            unit: i.unit.clone(),
            unit_type: i.unit_type.clone(),
            prepared_by: i.prepared_by.clone(),
            size: i.size,
            transacted_low: i.transacted_low,
            transacted_high: i.transacted_high,
            asking_low: i.asking_low,
            asking_high: i.asking_high,
            fmv: PsfQuantum { psf: i.fmv, quantum: None },
            ask: PsfQuantum { psf: i.ask, quantum: None },
        };
        form.resync_quanta();
        form
    }

    fn property_inputs(&self) -> PropertyInputs {
        PropertyInputs {
            size_sqft: self.size,
            transacted_low: self.transacted_low,
            transacted_high: self.transacted_high,
            asking_low: self.asking_low,
            asking_high: self.asking_high,
            fmv_psf: self.fmv.psf,
            ask_psf: self.ask.psf,
        }
    }

    fn metadata(&self, generated_at: chrono::DateTime<chrono::FixedOffset>) -> DisplayMetadata {
        DisplayMetadata {
            dev_name: self.dev.clone(),
            unit_no: self.unit.clone(),
            unit_type: self.unit_type.clone(),
            prepared_by: self.prepared_by.clone(),
            generated_at,
        }
    }

    fn text(&self, field: Field) -> Option<&str> {
        match field {
            Field::Dev => Some(&self.dev),
            Field::Unit => Some(&self.unit),
            Field::UnitType => Some(&self.unit_type),
            Field::PreparedBy => Some(&self.prepared_by),
            _ => None,
        }
    }

    fn number(&self, field: Field) -> Option<f64> {
        match field {
            Field::Size => self.size,
            Field::TransactedLow => self.transacted_low,
            Field::TransactedHigh => self.transacted_high,
            Field::AskingLow => self.asking_low,
            Field::AskingHigh => self.asking_high,
            Field::FmvPsf => self.fmv.psf,
            Field::FmvQuantum => self.fmv.quantum,
            Field::AskPsf => self.ask.psf,
            Field::AskQuantum => self.ask.quantum,
            _ => None,
        }
    }

    fn set_text(&mut self, field: Field, value: String) {
        match field {
            Field::Dev => self.dev = value,
            Field::Unit => self.unit = value,
            Field::UnitType => self.unit_type = value,
            Field::PreparedBy => self.prepared_by = value,
            _ => {}
        }
    }

    /// Store a number and re-derive whatever depends on it.
    fn set_number(&mut self, field: Field, value: Option<f64>) {
        match field {
            Field::Size => {
                self.size = value;
                self.resync_quanta();
            }
            Field::TransactedLow => self.transacted_low = value,
            Field::TransactedHigh => self.transacted_high = value,
            Field::AskingLow => self.asking_low = value,
            Field::AskingHigh => self.asking_high = value,
            Field::FmvPsf => {
                self.fmv = self.sync(PsfQuantum { psf: value, ..self.fmv }, EditedField::Psf)
            }
            Field::FmvQuantum => {
                self.fmv = self.sync(PsfQuantum { quantum: value, ..self.fmv }, EditedField::Quantum)
            }
            Field::AskPsf => {
                self.ask = self.sync(PsfQuantum { psf: value, ..self.ask }, EditedField::Psf)
            }
            Field::AskQuantum => {
                self.ask = self.sync(PsfQuantum { quantum: value, ..self.ask }, EditedField::Quantum)
            }
            _ => {}
        }
    }

    /// Move a numeric field by one step; an empty field starts from zero.
    fn nudge(&mut self, field: Field, direction: f64) {
        if field.is_text() {
            return;
        }
        let current = self.number(field).unwrap_or(0.0);
        let next = (current + direction * field.step()).max(0.0);
        self.set_number(field, Some(next));
    }

    /// PSF is the source of truth when the size changes.
    fn resync_quanta(&mut self) {
        self.fmv = self.sync(self.fmv, EditedField::Psf);
        self.ask = self.sync(self.ask, EditedField::Psf);
    }

    fn has_size(&self) -> bool {
        self.size.is_some_and(|s| s.is_finite() && s > 0.0)
    }

    /// Like `sync_pair`, but a quantum never outlives the size it was
    /// computed from: without a usable size it is dropped.
    fn sync(&self, pair: PsfQuantum, edited: EditedField) -> PsfQuantum {
        if self.has_size() {
            sync_pair(pair, self.size, edited)
        } else {
            PsfQuantum { quantum: None, ..pair }
        }
    }
}

/// Parse a numeric form entry. Empty input clears the field.
fn parse_number(input: &str) -> Result<Option<f64>, String> {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '$' | '_'))
        .collect();
    if cleaned.is_empty() {
        return Ok(None);
    }
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(format!("'{}' is not a number", input.trim())),
    }
}

fn fmt_entry(field: Field, v: Option<f64>) -> String {
    match (field, v) {
        (_, None) => String::new(),
        (Field::FmvQuantum | Field::AskQuantum, Some(v)) => fmt_money(v),
        (_, Some(v)) if v.fract() == 0.0 => format!("{v:.0}"),
        (_, Some(v)) => format!("{v:.2}"),
    }
}

fn term_color(c: Rgb) -> Color {
    Color::Rgb(c.0, c.1, c.2)
}

struct App {
    form: Form,
    config: RunConfig,
    branding: Option<BrandingAsset>,
    selected_field: usize,
    editing: Option<String>,
    status: String,
    meta: DisplayMetadata,
    run: RunOutput,
}

impl App {
    fn new(form: Form, config: RunConfig, branding: Option<BrandingAsset>) -> Self {
        let meta = form.metadata(crate::app::now_in(config.tz_offset));
        let run = run_report(&form.property_inputs(), &meta, &config, branding.as_ref());
        Self {
            form,
            config,
            branding,
            selected_field: 0,
            editing: None,
            status: "Ready.".to_string(),
            meta,
            run,
        }
    }

    fn selected(&self) -> Field {
        Field::ALL[self.selected_field]
    }

    fn recompute(&mut self) {
        self.meta = self.form.metadata(crate::app::now_in(self.config.tz_offset));
        self.run = run_report(
            &self.form.property_inputs(),
            &self.meta,
            &self.config,
            self.branding.as_ref(),
        );
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing.is_some() {
            self.handle_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => {
                self.selected_field = self.selected_field.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected_field + 1 < Field::ALL.len() {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left | KeyCode::Right => {
                let field = self.selected();
                if !field.is_text() {
                    let direction = if code == KeyCode::Left { -1.0 } else { 1.0 };
                    self.form.nudge(field, direction);
                    self.recompute();
                    self.status = format!("{}: {}", field.label(), fmt_entry(field, self.form.number(field)));
                }
            }
            KeyCode::Enter => {
                let field = self.selected();
                let current = match self.form.text(field) {
                    Some(s) => s.to_string(),
                    None => fmt_entry(field, self.form.number(field)).replace(['$', ','], ""),
                };
                self.editing = Some(current);
                self.status = format!("Editing {}. Enter to apply, Esc to cancel.", field.label());
            }
            KeyCode::Char('p') => {
                self.config.policy = self.config.policy.toggle();
                self.recompute();
                self.status = format!("policy: {}", self.config.policy.display_name());
            }
            KeyCode::Char('e') => self.export(),
            _ => {}
        }

        false
    }

    fn handle_edit(&mut self, code: KeyCode) {
        let Some(buffer) = self.editing.as_mut() else {
            return;
        };
        match code {
            KeyCode::Esc => {
                self.editing = None;
                self.status = "Edit canceled.".to_string();
            }
            KeyCode::Enter => {
                let input = std::mem::take(buffer);
                self.editing = None;
                self.apply_edit(input);
            }
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Char(c) => buffer.push(c),
            _ => {}
        }
    }

    fn apply_edit(&mut self, input: String) {
        let field = self.selected();
        if field.is_text() {
            self.form.set_text(field, input.trim().to_string());
        } else {
            match parse_number(&input) {
                Ok(Some(_)) if field.is_quantum() && !self.form.has_size() => {
                    self.status = "Set the size before entering a quantum.".to_string();
                    return;
                }
                Ok(value) => self.form.set_number(field, value),
                Err(msg) => {
                    self.status = msg;
                    return;
                }
            }
        }
        self.recompute();
        self.status = format!("Updated {}.", field.label());
    }

    fn export(&mut self) {
        let formats = [ExportFormat::Svg, ExportFormat::Json];
        self.status = match write_exports(
            &self.run,
            &self.meta,
            &self.config,
            self.branding.as_ref(),
            &formats,
        ) {
            Ok(paths) => {
                let names: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
                format!("Exported: {}", names.join(", "))
            }
            Err(err) => format!("Export failed: {err}"),
        };
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("psf", Style::default().fg(Color::Cyan)),
            Span::raw(" - property PSF analysis"),
            Span::styled(
                format!("  (policy: {})", self.config.policy.display_name()),
                Style::default().fg(Color::Gray),
            ),
        ]));

        let verdict = match self.run.valuation() {
            Some(r) => Line::from(vec![
                Span::styled(
                    format!("ANALYSIS: {}", r.tier.headline(r.variance_pct)),
                    Style::default()
                        .fg(term_color(self.config.theme.palette.tier_color(r.tier)))
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  variance {}", fmt_pct(r.variance_pct)),
                    Style::default().fg(Color::Gray),
                ),
            ]),
            None => Line::from(Span::styled(
                "AWAITING INPUT",
                Style::default().fg(term_color(self.config.theme.palette.awaiting)),
            )),
        };
        lines.push(verdict);

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(40), Constraint::Min(0)])
            .split(area);

        self.draw_form(frame, chunks[0]);
        self.draw_chart(frame, chunks[1]);
    }

    fn draw_form(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = Field::ALL
            .iter()
            .enumerate()
            .map(|(i, &field)| {
                let value = match (&self.editing, i == self.selected_field) {
                    (Some(buffer), true) => format!("{buffer}_"),
                    _ => match self.form.text(field) {
                        Some(s) => s.to_string(),
                        None => fmt_entry(field, self.form.number(field)),
                    },
                };
                ListItem::new(format!("{:<16}{value}", field.label()))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Property").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Valuation").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        match &self.run.spec {
            ReportSpec::Awaiting(awaiting) => {
                let msg = Paragraph::new(awaiting.message.as_str())
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(term_color(awaiting.color)));
                let rect = Rect {
                    y: inner.y + inner.height / 2,
                    height: 1.min(inner.height),
                    ..inner
                };
                frame.render_widget(msg, rect);
            }
            ReportSpec::Chart(chart) => {
                let rows = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Length(2), Constraint::Min(0)])
                    .split(inner);

                let caption = Paragraph::new(vec![
                    Line::from(chart.header_lines.first().map(|l| l.text.clone()).unwrap_or_default()),
                    Line::from(vec![
                        Span::styled("── transacted ", Style::default().fg(term_color(chart.transacted.color))),
                        Span::styled("── asking ", Style::default().fg(term_color(chart.asking.color))),
                        Span::raw("· FMV "),
                        Span::styled("· my ask", Style::default().fg(term_color(chart.status_color))),
                    ]),
                ])
                .style(Style::default().fg(Color::Gray));
                frame.render_widget(caption, rows[0]);

                let widget = PsfPlottersChart {
                    spec: chart,
                    axis: plotters::style::RGBColor(200, 200, 200),
                };
                frame.render_widget(widget, rows[1]);
            }
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  Enter edit  p policy  e export  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn tui_args(extra: &[&str]) -> ReportArgs {
        let mut argv = vec!["psf", "tui"];
        argv.extend_from_slice(extra);
        match crate::cli::Cli::parse_from(argv).command {
            crate::cli::Command::Tui(args) => args,
            _ => panic!("expected tui"),
        }
    }

    #[test]
    fn no_flags_prefills_sample() {
        let form = Form::from_args(&tui_args(&[]));
        assert_eq!(form, Form::sample());
        assert_eq!(form.dev, "KRHR");
        assert_eq!(form.fmv.quantum, Some(1_240_850.0));
    }

    #[test]
    fn flags_replace_the_sample() {
        let form = Form::from_args(&tui_args(&["-s", "1000", "--fmv", "900"]));
        assert_eq!(form.size, Some(1000.0));
        assert_eq!(form.fmv, PsfQuantum { psf: Some(900.0), quantum: Some(900_000.0) });
        assert_eq!(form.ask, PsfQuantum { psf: None, quantum: None });
        assert!(form.dev.is_empty());
    }

    #[test]
    fn quantum_edit_updates_psf() {
        let mut form = Form::sample();
        form.set_number(Field::AskQuantum, Some(1_079_000.0));
        assert_eq!(form.ask.psf, Some(1000.0));
        assert_eq!(form.property_inputs().ask_psf, Some(1000.0));
    }

    #[test]
    fn size_change_keeps_psf_and_rescales_quantum() {
        let mut form = Form::sample();
        form.set_number(Field::Size, Some(2158.0));
        assert_eq!(form.fmv.psf, Some(1150.0));
        assert_eq!(form.fmv.quantum, Some(2_481_700.0));
    }

    #[test]
    fn clearing_size_drops_quanta_but_keeps_psf() {
        let mut form = Form::sample();
        form.set_number(Field::Size, None);
        assert_eq!(form.fmv, PsfQuantum { psf: Some(1150.0), quantum: None });
        assert_eq!(form.ask, PsfQuantum { psf: Some(1250.0), quantum: None });

        form.set_number(Field::Size, Some(1000.0));
        assert_eq!(form.fmv.quantum, Some(1_150_000.0));
    }

    #[test]
    fn quantum_without_size_is_not_stored() {
        let mut form = Form::sample();
        form.set_number(Field::Size, None);
        form.set_number(Field::FmvQuantum, Some(2_000_000.0));
        assert_eq!(form.fmv, PsfQuantum { psf: Some(1150.0), quantum: None });

        form.set_number(Field::AskPsf, Some(1300.0));
        assert_eq!(form.ask, PsfQuantum { psf: Some(1300.0), quantum: None });

        form.nudge(Field::AskQuantum, 1.0);
        assert_eq!(form.ask.quantum, None);
    }

    #[test]
    fn nudge_steps_and_floors_at_zero() {
        let mut form = Form::sample();
        form.nudge(Field::FmvPsf, 1.0);
        assert_eq!(form.fmv.psf, Some(1160.0));

        form.set_number(Field::TransactedLow, Some(5.0));
        form.nudge(Field::TransactedLow, -1.0);
        assert_eq!(form.transacted_low, Some(0.0));

        form.nudge(Field::Dev, 1.0);
        assert_eq!(form.dev, "KRHR");
    }

    #[test]
    fn parse_number_accepts_grouping_and_blank() {
        assert_eq!(parse_number("1,240,850"), Ok(Some(1_240_850.0)));
        assert_eq!(parse_number(" $1150 "), Ok(Some(1150.0)));
        assert_eq!(parse_number(""), Ok(None));
        assert!(parse_number("abc").is_err());
        assert!(parse_number("inf").is_err());
    }

    #[test]
    fn editing_flow_and_policy_toggle() {
        let config = crate::app::run_config_from_args(&tui_args(&[])).unwrap();
        let mut app = App::new(Form::sample(), config, None);
        assert!(app.run.valuation().is_some());

        // Select "My ask psf" and type a new value.
        let target = Field::ALL.iter().position(|&f| f == Field::AskPsf).unwrap();
        for _ in 0..target {
            app.handle_key(KeyCode::Down);
        }
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.editing.as_deref(), Some("1250"));
        for _ in 0..4 {
            app.handle_key(KeyCode::Backspace);
        }
        for c in "1400".chars() {
            app.handle_key(KeyCode::Char(c));
        }
        app.handle_key(KeyCode::Enter);
        assert!(app.editing.is_none());
        assert_eq!(app.form.ask.psf, Some(1400.0));
        assert_eq!(
            app.run.valuation().map(|r| r.tier),
            Some(crate::domain::Tier::HighPremium)
        );

        app.handle_key(KeyCode::Char('p'));
        assert_eq!(app.config.policy, crate::domain::ClassificationPolicy::Absolute);

        // Clearing the size leaves the chart awaiting input.
        app.selected_field = Field::ALL.iter().position(|&f| f == Field::Size).unwrap();
        app.handle_key(KeyCode::Enter);
        for _ in 0..8 {
            app.handle_key(KeyCode::Backspace);
        }
        app.handle_key(KeyCode::Enter);
        assert!(matches!(app.run.spec, ReportSpec::Awaiting(_)));
        assert_eq!(app.form.ask.quantum, None);

        // A quantum cannot be entered until there is a size to divide by.
        app.selected_field = Field::ALL.iter().position(|&f| f == Field::AskQuantum).unwrap();
        app.handle_key(KeyCode::Enter);
        for c in "1500000".chars() {
            app.handle_key(KeyCode::Char(c));
        }
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.status, "Set the size before entering a quantum.");
        assert_eq!(app.form.ask, PsfQuantum { psf: Some(1400.0), quantum: None });

        assert!(app.handle_key(KeyCode::Char('q')));
    }
}
