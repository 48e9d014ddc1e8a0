use std::{io, thread, time::Duration};

use anyhow::{Context, Result};
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use lotto_core::{
    AppConfig, LottoSession, NumberBucket, Phase, DRAW_SIZE, NUMBER_MAX, NUMBER_MIN, PICK_LIMIT,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::block_font::{self, FontStyle};

const TICK_RATE: Duration = Duration::from_millis(250);
const LARGE_STEP: i16 = 10;
const BANNER_TEXT: &str = "LOTTO 6/45";

#[derive(Debug, Clone)]
struct Theme {
    primary_fg: Color,
    accent: Color,
    muted: Color,
    success: Color,
    warning: Color,
    on_ball: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_fg: Color::White,
            accent: Color::Cyan,
            muted: Color::DarkGray,
            success: Color::Green,
            warning: Color::Yellow,
            on_ball: Color::Black,
        }
    }
}

impl Theme {
    fn bucket(&self, value: u8) -> Color {
        match NumberBucket::of(value) {
            NumberBucket::Yellow => Color::Yellow,
            NumberBucket::Blue => Color::Blue,
            NumberBucket::Red => Color::Red,
            NumberBucket::Gray => Color::Gray,
            NumberBucket::Green => Color::Green,
        }
    }
}

enum AppEvent {
    Input(Event),
    Tick,
}

/// Terminal front end driving one [`LottoSession`].
pub struct LottoApp {
    session: LottoSession,
    state: UiState,
    config: AppConfig,
    theme: Theme,
}

impl LottoApp {
    pub fn new(config: AppConfig) -> Self {
        Self {
            session: LottoSession::with_seed(config.seed),
            state: UiState::default(),
            config,
            theme: Theme::default(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        if let Some(seed) = self.config.seed {
            self.state
                .set_status(format!("Seeded draws ({seed}) • press ? for help"));
        }

        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx);

        let outcome = loop {
            if let Err(err) = terminal.draw(|frame| self.draw(frame)) {
                break Err::<(), _>(err).context("failed to draw frame");
            }
            if self.state.should_quit {
                break Ok(());
            }
            match event_rx.recv().await {
                Some(AppEvent::Input(event)) => self.handle_input(event),
                Some(AppEvent::Tick) => self.state.tick(),
                None => break Ok(()),
            }
        };

        restore_terminal(&mut terminal)?;
        info!("Terminal restored");
        outcome
    }

    fn handle_input(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(key),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            self.state.should_quit = true;
            return;
        }
        if let KeyCode::Char(ch) = key.code {
            if ch.is_ascii_digit() {
                self.state.selector.type_digit(ch);
                return;
            }
        }
        self.state.selector.reset_typed();

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.state.should_quit = true;
            }
            KeyCode::Up | KeyCode::Right | KeyCode::Char('k') | KeyCode::Char('l') => {
                self.state.selector.step(1);
            }
            KeyCode::Down | KeyCode::Left | KeyCode::Char('j') | KeyCode::Char('h') => {
                self.state.selector.step(-1);
            }
            KeyCode::PageUp => self.state.selector.step(LARGE_STEP),
            KeyCode::PageDown => self.state.selector.step(-LARGE_STEP),
            KeyCode::Home => self.state.selector.set(NUMBER_MIN),
            KeyCode::End => self.state.selector.set(NUMBER_MAX),
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('a') => self.request_pick(),
            KeyCode::Char('r') | KeyCode::Char('R') => self.request_run(),
            KeyCode::Char('c') | KeyCode::Char('C') => self.request_clear(),
            KeyCode::Char('?') => self.state.show_help = !self.state.show_help,
            _ => {}
        }
    }

    fn request_pick(&mut self) {
        let candidate = self.state.selector.value();
        match self.session.on_pick_requested(candidate) {
            Ok(accepted) => {
                self.state.toast = None;
                self.state.set_status(format!(
                    "Picked {} for slot {}",
                    accepted.number,
                    accepted.slot + 1
                ));
            }
            Err(reason) => {
                debug!(candidate, %reason, "Showing pick warning");
                self.state
                    .show_toast(reason.to_string(), self.config.toast_ticks);
            }
        }
    }

    fn request_run(&mut self) {
        let result = self.session.on_run_requested();
        let drawn_at = self
            .session
            .last_draw()
            .map(|draw| draw.drawn_at.with_timezone(&Local).format("%H:%M:%S").to_string())
            .unwrap_or_default();
        self.state.toast = None;
        self.state
            .set_status(format!("Drawn {result} at {drawn_at} • press c to clear"));
    }

    fn request_clear(&mut self) {
        self.session.on_clear_requested();
        self.state.toast = None;
        self.state.set_status("Cleared".to_string());
    }

    /// Numbers currently visible in the six slots.
    fn slots(&self) -> [Option<u8>; DRAW_SIZE] {
        let mut slots = [None; DRAW_SIZE];
        match self.session.last_draw() {
            Some(draw) => {
                for (slot, value) in slots.iter_mut().zip(draw.result.iter()) {
                    *slot = Some(value);
                }
            }
            None => {
                for (slot, value) in slots.iter_mut().zip(self.session.selection().picks()) {
                    *slot = Some(*value);
                }
            }
        }
        slots
    }

    fn draw(&self, frame: &mut Frame) {
        let area = frame.size();
        let banner_lines = if self.config.show_banner {
            Some(block_font::render(BANNER_TEXT, FontStyle::Banner))
        } else {
            None
        };

        let mut constraints = Vec::new();
        if let Some(lines) = &banner_lines {
            constraints.push(Constraint::Length(lines.len() as u16 + 2));
        }
        constraints.push(Constraint::Length(block_font::FONT_HEIGHT as u16 + 2));
        constraints.push(Constraint::Min(6));
        constraints.push(Constraint::Length(4));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        let mut chunk_iter = chunks.iter().copied();
        if let Some(lines) = &banner_lines {
            if let Some(banner_area) = chunk_iter.next() {
                self.render_banner(frame, banner_area, lines);
            }
        }
        let slots_area = chunk_iter.next().unwrap_or(area);
        let body_area = chunk_iter.next().unwrap_or(area);
        let status_area = chunk_iter.next().unwrap_or(area);

        self.render_slots(frame, slots_area);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(body_area);
        self.render_selector(frame, body[0]);
        if self.state.show_help {
            self.render_help(frame, body[1]);
        } else {
            self.render_picks(frame, body[1]);
        }
        self.render_status(frame, status_area);
    }

    fn render_banner(&self, frame: &mut Frame, area: Rect, lines: &[String]) {
        let content: Vec<Line> = lines
            .iter()
            .map(|line| {
                Line::from(Span::styled(
                    line.clone(),
                    Style::default()
                        .fg(self.theme.accent)
                        .add_modifier(Modifier::BOLD),
                ))
            })
            .collect();
        let paragraph = Paragraph::new(content)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
    }

    fn render_slots(&self, frame: &mut Frame, area: Rect) {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, DRAW_SIZE as u32); DRAW_SIZE])
            .split(area);

        for (index, (value, cell)) in self.slots().iter().zip(cells.iter()).enumerate() {
            let block = Block::default()
                .borders(Borders::ALL)
                .title(format!("#{}", index + 1));
            let paragraph = match value {
                Some(value) => {
                    let color = self.theme.bucket(*value);
                    let text = format!("{value:>2}");
                    let lines: Vec<Line> = if (cell.width as usize)
                        >= block_font::width(&text, FontStyle::Compact) + 2
                    {
                        block_font::render(&text, FontStyle::Compact)
                            .into_iter()
                            .map(|line| Line::from(Span::styled(line, Style::default().fg(color))))
                            .collect()
                    } else {
                        vec![Line::from(Span::styled(
                            text,
                            Style::default()
                                .fg(self.theme.on_ball)
                                .bg(color)
                                .add_modifier(Modifier::BOLD),
                        ))]
                    };
                    Paragraph::new(lines).block(block.border_style(Style::default().fg(color)))
                }
                None => Paragraph::new(Line::from(Span::styled(
                    "·",
                    Style::default().fg(self.theme.muted),
                )))
                .block(block.border_style(Style::default().fg(self.theme.muted))),
            };
            frame.render_widget(paragraph.alignment(Alignment::Center), *cell);
        }
    }

    fn render_selector(&self, frame: &mut Frame, area: Rect) {
        let value = self.state.selector.value();
        let ball = Span::styled(
            format!(" {value:>2} "),
            Style::default()
                .fg(self.theme.on_ball)
                .bg(self.theme.bucket(value))
                .add_modifier(Modifier::BOLD),
        );
        let locked = self.session.phase() == Phase::Run;
        let hint = if locked {
            Span::styled("locked: clear to pick again", Style::default().fg(self.theme.muted))
        } else {
            Span::styled("enter to pick", Style::default().fg(self.theme.muted))
        };
        let mut lines = vec![
            Line::from(vec![Span::raw("◀ "), ball, Span::raw(" ▶")]),
            Line::from(hint),
        ];
        if !self.state.selector.typed().is_empty() {
            lines.push(Line::from(Span::styled(
                format!("typed: {}", self.state.selector.typed()),
                Style::default().fg(self.theme.accent),
            )));
        }
        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Number {NUMBER_MIN}-{NUMBER_MAX}")),
            )
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
    }

    fn render_picks(&self, frame: &mut Frame, area: Rect) {
        let selection = self.session.selection();
        let phase = match self.session.phase() {
            Phase::Idle => "Idle",
            Phase::Picking => "Picking",
            Phase::Run => "Drawn",
        };
        let mut picks: Vec<Span> = vec![Span::raw("Picks: ")];
        if selection.picks().is_empty() {
            picks.push(Span::styled("none", Style::default().fg(self.theme.muted)));
        }
        for value in selection.picks() {
            picks.push(Span::styled(
                format!(" {value} "),
                Style::default()
                    .fg(self.theme.on_ball)
                    .bg(self.theme.bucket(*value)),
            ));
            picks.push(Span::raw(" "));
        }
        let mut lines = vec![
            Line::from(format!("State: {phase}")),
            Line::from(picks),
            Line::from(format!(
                "{} of {PICK_LIMIT} picked, {} filled at random",
                selection.picks().len(),
                DRAW_SIZE - selection.picks().len()
            )),
        ];
        if let Some(draw) = self.session.last_draw() {
            lines.push(Line::from(Span::styled(
                format!("Result: {}", draw.result),
                Style::default()
                    .fg(self.theme.success)
                    .add_modifier(Modifier::BOLD),
            )));
        }
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Selection"))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_help(&self, frame: &mut Frame, area: Rect) {
        let rows = [
            ("↑/↓ k/j", "change number"),
            ("PgUp/PgDn", "change by 10"),
            ("0-9", "type a number"),
            ("enter/a", "pick number"),
            ("r", "draw"),
            ("c", "clear"),
            ("q/esc", "quit"),
        ];
        let lines: Vec<Line> = rows
            .iter()
            .map(|(key, action)| {
                Line::from(vec![
                    Span::styled(format!("{key:<10}"), Style::default().fg(self.theme.accent)),
                    Span::raw(*action),
                ])
            })
            .collect();
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Keys"))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Status");
        let primary = match &self.state.toast {
            Some(toast) => Line::from(Span::styled(
                format!("⚠ {}", toast.message),
                Style::default()
                    .fg(self.theme.warning)
                    .add_modifier(Modifier::BOLD),
            )),
            None => Line::from(Span::styled(
                self.state.status.clone(),
                Style::default().fg(self.theme.primary_fg),
            )),
        };
        let secondary = Line::from(Span::styled(
            "enter pick • r draw • c clear • ? help • q quit",
            Style::default().fg(self.theme.muted),
        ));
        let paragraph = Paragraph::new(vec![primary, secondary])
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}

/// Wrapping 1..=45 selector, the terminal stand-in for a number picker.
#[derive(Debug, Clone, PartialEq, Eq)]
struct NumberSelector {
    value: u8,
    typed: String,
}

impl Default for NumberSelector {
    fn default() -> Self {
        Self {
            value: NUMBER_MIN,
            typed: String::new(),
        }
    }
}

impl NumberSelector {
    fn value(&self) -> u8 {
        self.value
    }

    fn typed(&self) -> &str {
        &self.typed
    }

    fn set(&mut self, value: u8) {
        self.value = value.clamp(NUMBER_MIN, NUMBER_MAX);
    }

    fn step(&mut self, delta: i16) {
        let span = i16::from(NUMBER_MAX - NUMBER_MIN) + 1;
        let offset = i16::from(self.value - NUMBER_MIN) + delta;
        self.value = NUMBER_MIN + offset.rem_euclid(span) as u8;
    }

    /// Append a typed digit; the value follows whenever the buffer forms a
    /// number of the pool. A buffer that can no longer become one restarts
    /// from the new digit.
    fn type_digit(&mut self, digit: char) {
        self.typed.push(digit);
        if self.typed.len() > 2 || (self.typed.len() == 2 && parse_in_pool(&self.typed).is_none()) {
            self.typed = digit.to_string();
        }
        if let Some(value) = parse_in_pool(&self.typed) {
            self.value = value;
        }
    }

    fn reset_typed(&mut self) {
        self.typed.clear();
    }
}

fn parse_in_pool(input: &str) -> Option<u8> {
    input
        .parse::<u8>()
        .ok()
        .filter(|value| (NUMBER_MIN..=NUMBER_MAX).contains(value))
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Toast {
    message: String,
    ticks_left: u32,
}

struct UiState {
    selector: NumberSelector,
    status: String,
    toast: Option<Toast>,
    show_help: bool,
    should_quit: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            selector: NumberSelector::default(),
            status: "Pick up to 5 numbers, then press r to draw".to_string(),
            toast: None,
            show_help: false,
            should_quit: false,
        }
    }
}

impl UiState {
    fn set_status(&mut self, message: String) {
        self.status = message;
    }

    fn show_toast(&mut self, message: String, ticks: u32) {
        self.toast = Some(Toast {
            message,
            ticks_left: ticks.max(1),
        });
    }

    fn tick(&mut self) {
        if let Some(toast) = self.toast.as_mut() {
            toast.ticks_left = toast.ticks_left.saturating_sub(1);
            if toast.ticks_left == 0 {
                self.toast = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> LottoApp {
        LottoApp::new(AppConfig {
            seed: Some(77),
            toast_ticks: 2,
            ..AppConfig::default()
        })
    }

    fn press(app: &mut LottoApp, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn selector_wraps_around_the_pool() {
        let mut selector = NumberSelector::default();
        selector.step(-1);
        assert_eq!(selector.value(), NUMBER_MAX);
        selector.step(1);
        assert_eq!(selector.value(), NUMBER_MIN);
        selector.set(40);
        selector.step(LARGE_STEP);
        assert_eq!(selector.value(), 5);
        selector.step(-LARGE_STEP);
        assert_eq!(selector.value(), 40);
    }

    #[test]
    fn typed_digits_select_numbers() {
        let mut selector = NumberSelector::default();
        selector.type_digit('2');
        assert_eq!(selector.value(), 2);
        selector.type_digit('3');
        assert_eq!(selector.value(), 23);
        // "239" restarts at "9".
        selector.type_digit('9');
        assert_eq!(selector.value(), 9);
        assert_eq!(selector.typed(), "9");
        selector.reset_typed();
        selector.type_digit('5');
        selector.type_digit('0');
        // "50" is out of the pool, "0" as well: value stays.
        assert_eq!(selector.value(), 5);
        assert_eq!(selector.typed(), "0");
    }

    #[test]
    fn toast_expires_after_ticks() {
        let mut state = UiState::default();
        state.show_toast("already selected".to_string(), 2);
        state.tick();
        assert!(state.toast.is_some());
        state.tick();
        assert!(state.toast.is_none());
    }

    #[test]
    fn keys_drive_the_session() {
        let mut app = app();
        press(&mut app, KeyCode::Char('9'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.slots()[0], Some(9));
        assert!(app.slots()[1..].iter().all(Option::is_none));

        press(&mut app, KeyCode::Enter);
        assert_eq!(
            app.state.toast.as_ref().map(|toast| toast.message.as_str()),
            Some("already selected")
        );

        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.session.phase(), Phase::Run);
        let slots = app.slots();
        assert!(slots.iter().all(Option::is_some));
        assert!(slots.contains(&Some(9)));
        assert!(app.state.toast.is_none());

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(
            app.state.toast.as_ref().map(|toast| toast.message.as_str()),
            Some("must clear first")
        );

        press(&mut app, KeyCode::Char('c'));
        assert!(app.slots().iter().all(Option::is_none));
        assert_eq!(app.session.phase(), Phase::Idle);
    }

    #[test]
    fn sixth_pick_shows_limit_warning() {
        let mut app = app();
        for _ in 0..PICK_LIMIT {
            press(&mut app, KeyCode::Enter);
            press(&mut app, KeyCode::Up);
        }
        press(&mut app, KeyCode::Enter);
        assert_eq!(
            app.state.toast.as_ref().map(|toast| toast.message.as_str()),
            Some("max 5 selections")
        );
        assert_eq!(app.slots()[..PICK_LIMIT], [Some(1), Some(2), Some(3), Some(4), Some(5)]);
        assert_eq!(app.slots()[PICK_LIMIT], None);
    }

    #[test]
    fn ctrl_c_quits() {
        let mut app = app();
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.state.should_quit);
        assert_eq!(app.session.phase(), Phase::Idle);
    }
}
