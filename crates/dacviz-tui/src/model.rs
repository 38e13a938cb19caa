//! TUI application model (Elm architecture).

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use rand::rngs::SmallRng;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::Terminal;
use tracing::debug;

use dacviz_core::observers::DemoNotification;
use dacviz_core::{
    CellStep, GateOutcome, Navigation, PlaybackController, Stage, StateChange, TermKey,
};

use crate::bridge::TuiBridgeObserver;
use crate::computation::{render_computation, stages, PanelState};
use crate::footer::render_footer;
use crate::header::render_header;
use crate::keymap::{map_key, KeyAction};
use crate::logs::{render_logs, LogScrollState};
use crate::matrices::render_matrices;
use crate::messages::TuiMessage;
use crate::styles::ColorTheme;

const MAX_LOGS: usize = 500;

/// TUI application state (Elm Model).
pub struct TuiApp {
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Quit was requested with Ctrl+C.
    pub interrupted: bool,
    controller: PlaybackController,
    rng: SmallRng,
    rx: Receiver<TuiMessage>,
    /// Selected stage of the current gate.
    pub selection: Stage,
    /// Steps of the last breakdown shown, cleared when the cursor moves.
    pub breakdown: Option<Vec<CellStep>>,
    /// Feedback on the last refused action.
    pub status: Option<String>,
    /// Log messages.
    pub logs: Vec<String>,
    pub log_scroll: LogScrollState,
    /// Show logs toggle.
    pub show_logs: bool,
    pub terminal_width: u16,
    pub terminal_height: u16,
    theme: ColorTheme,
}

impl TuiApp {
    /// Wrap `controller`; `rng` feeds regeneration.
    #[must_use]
    pub fn new(controller: PlaybackController, rng: SmallRng) -> Self {
        let (tx, rx) = unbounded();
        controller.subscribe(Arc::new(TuiBridgeObserver::new(tx)));
        Self {
            should_quit: false,
            interrupted: false,
            controller,
            rng,
            rx,
            selection: Stage::Term(TermKey::First),
            breakdown: None,
            status: None,
            logs: Vec::new(),
            log_scroll: LogScrollState::new(),
            show_logs: true,
            terminal_width: 80,
            terminal_height: 24,
            theme: ColorTheme::default(),
        }
    }

    /// Root controller.
    #[must_use]
    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    /// Update the model with incoming messages (Elm Update).
    pub fn update(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            self.handle_message(msg);
        }
    }

    /// Handle a single message.
    pub fn handle_message(&mut self, msg: TuiMessage) {
        match msg {
            TuiMessage::Demo(notification) => self.push_log(describe(&notification)),
            TuiMessage::Log(line) => self.push_log(line),
            TuiMessage::KeyPress(action) => self.handle_key_action(action),
            TuiMessage::Resize { width, height } => {
                self.terminal_width = width;
                self.terminal_height = height;
            }
            TuiMessage::Tick => {}
            TuiMessage::Error(err) => self.push_log(format!("[ERROR] {err}")),
            TuiMessage::Quit => self.should_quit = true,
        }
    }

    fn push_log(&mut self, line: String) {
        self.logs.push(line);
        if self.logs.len() > MAX_LOGS {
            self.logs.remove(0);
            self.log_scroll.on_trimmed(1);
        }
        self.log_scroll.on_new_message(self.logs.len());
    }

    /// Handle a keyboard action.
    pub fn handle_key_action(&mut self, action: KeyAction) {
        match action {
            KeyAction::Quit => self.should_quit = true,
            KeyAction::Cancel => {
                self.should_quit = true;
                self.interrupted = true;
            }
            KeyAction::Next => {
                let nav = self.controller.active_mut().next();
                self.after_navigation(nav);
            }
            KeyAction::Prev => {
                let nav = self.controller.active_mut().prev();
                self.after_navigation(nav);
            }
            KeyAction::SelectNext => self.cycle_selection(1),
            KeyAction::SelectPrev => self.cycle_selection(-1),
            KeyAction::Compute => self.act(false),
            KeyAction::Show => self.act(true),
            KeyAction::CloseSubDemo => match self.controller.close_innermost() {
                Ok(GateOutcome::Ignored(reason)) => self.status = Some(reason.describe().into()),
                Ok(_) => {
                    self.status = None;
                    self.breakdown = None;
                    self.select_first_open();
                }
                Err(err) => self.handle_message(TuiMessage::Error(err.to_string())),
            },
            KeyAction::Regenerate => {
                let size = self.controller.timeline().size();
                match self.controller.generate(size, &mut self.rng) {
                    Ok(()) => {
                        self.status = None;
                        self.breakdown = None;
                        self.selection = Stage::Term(TermKey::First);
                    }
                    Err(err) => self.handle_message(TuiMessage::Error(err.to_string())),
                }
            }
            KeyAction::ToggleLogs => self.show_logs = !self.show_logs,
            KeyAction::ScrollUp => self.log_scroll.scroll_up(),
            KeyAction::ScrollDown => self.log_scroll.scroll_down(self.logs.len()),
            KeyAction::PageUp => self.log_scroll.page_up(10),
            KeyAction::PageDown => self.log_scroll.page_down(10, self.logs.len()),
            KeyAction::Home => self.log_scroll.home(),
            KeyAction::End => self.log_scroll.end(self.logs.len()),
            KeyAction::None => {}
        }
    }

    fn after_navigation(&mut self, nav: Navigation) {
        self.status = match nav {
            Navigation::Moved => {
                self.breakdown = None;
                self.select_first_open();
                None
            }
            Navigation::Blocked => Some("Resolve this computation before moving on.".into()),
            Navigation::AtStart => Some("Already at the first step.".into()),
            Navigation::AtEnd => Some("Already at the last step.".into()),
        };
    }

    /// Stages of the gate under the active cursor, if it is on one.
    fn gate_stages(&self) -> Option<Vec<Stage>> {
        match self.controller.active().current_event() {
            dacviz_core::Event::ShowComputation(c) => Some(stages(c)),
            _ => None,
        }
    }

    fn select_first_open(&mut self) {
        let active = self.controller.active();
        let Some(slot) = active.current_slot() else {
            self.selection = Stage::Term(TermKey::First);
            return;
        };
        let open = self.gate_stages().and_then(|all| {
            all.into_iter().find(|stage| {
                active
                    .state()
                    .slot(slot)
                    .is_some_and(|s| s.stage(*stage).is_none())
            })
        });
        self.selection = open.unwrap_or(Stage::Term(TermKey::First));
    }

    fn cycle_selection(&mut self, step: isize) {
        let Some(all) = self.gate_stages() else {
            return;
        };
        let len = all.len() as isize;
        let current = all.iter().position(|s| *s == self.selection).unwrap_or(0) as isize;
        let next = (current + step).rem_euclid(len);
        self.selection = all[next as usize];
    }

    /// Compute or show the selected stage of the current gate.
    fn act(&mut self, show: bool) {
        if self.gate_stages().is_none() {
            self.status = Some("Nothing to compute at this step.".into());
            return;
        }
        let active = self.controller.active_mut();
        let Some(slot) = active.current_slot() else {
            return;
        };
        let stage = self.selection;
        match active.apply(slot, stage, show) {
            Ok(outcome) => {
                debug!(slot = %slot, stage = stage.name(), ?outcome, "Gate action");
                self.status = match outcome {
                    GateOutcome::Breakdown(steps) => {
                        self.breakdown = Some(steps);
                        None
                    }
                    GateOutcome::Ignored(reason) => Some(reason.describe().into()),
                    GateOutcome::AlreadyResolved => {
                        Some(format!("{slot} {} is already resolved.", stage.name()))
                    }
                    GateOutcome::SubDemoOpened { .. } => {
                        self.breakdown = None;
                        None
                    }
                    GateOutcome::Resolved(_) => None,
                };
                self.select_first_open();
            }
            Err(err) => self.handle_message(TuiMessage::Error(err.to_string())),
        }
    }

    /// Compute the layout.
    ///
    /// Returns (header, matrices, computation, logs, footer) rects; `logs`
    /// is empty when the log panel is hidden.
    #[must_use]
    pub fn compute_layout(area: Rect, show_logs: bool) -> (Rect, Rect, Rect, Rect, Rect) {
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // header
                Constraint::Min(5),    // main content
                Constraint::Length(2), // footer
            ])
            .split(area);

        let main = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(outer[1]);

        let (computation, logs) = if show_logs {
            let bottom = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(main[1]);
            (bottom[0], bottom[1])
        } else {
            (main[1], Rect::default())
        };

        (outer[0], main[0], computation, logs, outer[2])
    }

    /// Render the full TUI view.
    pub fn render(&self, frame: &mut ratatui::Frame) {
        let (header, matrices, computation, logs, footer) =
            Self::compute_layout(frame.area(), self.show_logs);

        render_header(frame, header, &self.controller);
        let active = self.controller.active();
        render_matrices(frame, matrices, active, &self.theme);
        let view = PanelState {
            selection: self.selection,
            breakdown: self.breakdown.as_deref(),
            status: self.status.as_deref(),
        };
        render_computation(frame, computation, active, &view, &self.theme);
        if self.show_logs {
            render_logs(frame, logs, &self.logs, &self.log_scroll, &self.theme);
        }
        render_footer(frame, footer);
    }

    /// Set up the terminal for TUI mode.
    pub fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        Terminal::new(backend)
    }

    /// Tear down the terminal, restoring normal mode.
    pub fn teardown_terminal(
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> io::Result<()> {
        terminal::disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        Ok(())
    }

    /// Run the TUI event loop.
    ///
    /// This sets up the terminal, runs the main loop (poll events, update,
    /// render), and tears down on exit.
    pub fn run(&mut self) -> io::Result<()> {
        let mut terminal = Self::setup_terminal()?;
        let result = self.event_loop(&mut terminal);
        Self::teardown_terminal(&mut terminal)?;
        result
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> io::Result<()> {
        let tick_rate = Duration::from_millis(250);

        loop {
            terminal.draw(|frame| {
                self.render(frame);
            })?;

            if self.should_quit {
                return Ok(());
            }

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        self.handle_message(TuiMessage::KeyPress(map_key(key)));
                    }
                    Event::Resize(width, height) => {
                        self.handle_message(TuiMessage::Resize { width, height });
                    }
                    _ => {}
                }
            }

            // Drain controller notifications
            self.update();
        }
    }
}

/// Log line for a controller notification.
#[must_use]
pub fn describe(notification: &DemoNotification) -> String {
    match notification {
        DemoNotification::SubDemoOpened { label, depth } => {
            format!("[d{depth}] nested demo opened: {label}")
        }
        DemoNotification::StateChanged(change) => match change {
            StateChange::Generated { depth, size } => {
                format!("[d{depth}] new {size}×{size} inputs")
            }
            StateChange::Moved { depth, cursor } => format!("[d{depth}] step {cursor}"),
            StateChange::Resolved {
                depth,
                slot,
                stage,
                resolution,
            } => format!(
                "[d{depth}] {slot} {} resolved ({})",
                stage.name(),
                resolution.name()
            ),
            StateChange::SubDemoClosed {
                depth,
                slot,
                resolution,
            } => format!(
                "[d{depth}] nested demo for {slot} closed ({})",
                resolution.name()
            ),
        },
    }
}
