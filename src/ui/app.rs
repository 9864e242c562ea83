//! Main TUI application state and logic

use crate::interpreter::engine::TraceEngine;
use crate::snapshot::{ExecutionState, PlaybackCursor};
use crate::ui::panes::{
    self, SourceRenderData, SourceScrollState, StackRenderData, StackScrollState,
    StatusRenderData,
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Output,
    Variables,
    Stack,
    Trace,
}

impl FocusedPane {
    /// Move focus to the next pane (clockwise: source -> output -> variables -> stack -> trace)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Output,
            FocusedPane::Output => FocusedPane::Variables,
            FocusedPane::Variables => FocusedPane::Stack,
            FocusedPane::Stack => FocusedPane::Trace,
            FocusedPane::Trace => FocusedPane::Source,
        }
    }

    /// Move focus to the previous pane (counter-clockwise)
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Trace,
            FocusedPane::Output => FocusedPane::Source,
            FocusedPane::Variables => FocusedPane::Output,
            FocusedPane::Stack => FocusedPane::Variables,
            FocusedPane::Trace => FocusedPane::Stack,
        }
    }
}

/// The main application state
pub struct App {
    /// The finished trace being browsed
    pub engine: TraceEngine,

    /// Snapshot currently on screen
    pub cursor: PlaybackCursor,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll state
    pub source_scroll: SourceScrollState,
    pub variables_scroll: usize,
    pub stack_scroll: StackScrollState,
    pub output_scroll: usize,
    pub trace_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Whether auto-play mode is active
    pub is_playing: bool,

    /// Delay between auto-play steps
    pub play_interval: Duration,

    /// Last time a step was taken in play mode
    pub last_play_time: Instant,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl App {
    /// Create a new app positioned at the initial snapshot
    pub fn new(engine: TraceEngine, play_interval: Duration) -> Self {
        let cursor = PlaybackCursor::new(engine.total_steps());
        let now = Instant::now();
        App {
            engine,
            cursor,
            focused_pane: FocusedPane::Source,
            source_scroll: SourceScrollState::default(),
            variables_scroll: 0,
            stack_scroll: StackScrollState::default(),
            output_scroll: 0,
            trace_scroll: 0,
            should_quit: false,
            status_message: String::from("Ready!"),
            is_playing: false,
            play_interval,
            last_play_time: now,
            last_space_press: now.checked_sub(Duration::from_secs(1)).unwrap_or(now),
        }
    }

    /// Snapshot at the cursor
    pub fn state(&self) -> &ExecutionState {
        self.engine.get_state(self.cursor.step())
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.is_playing && self.last_play_time.elapsed() >= self.play_interval {
                self.tick_playback();
                self.last_play_time = Instant::now();
            }

            // Poll with a timeout so auto-play keeps ticking
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// One auto-play step; stops playing at the last snapshot
    fn tick_playback(&mut self) {
        if self.cursor.step_forward() {
            self.status_message = "Playing...".to_string();
            self.follow_bottom();
        } else {
            self.is_playing = false;
            self.status_message = "Playback complete".to_string();
        }
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(main_chunks[0]);

        // Left column: Source (top) | Output (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(columns[0]);

        // Right column: Variables | Stack | Trace
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(35),
                Constraint::Percentage(25),
                Constraint::Percentage(40),
            ])
            .split(columns[1]);

        let state = self.engine.get_state(self.cursor.step());
        let error = state.error_message();

        panes::render_source_pane(
            frame,
            left_rows[0],
            SourceRenderData {
                lines: self.engine.lines(),
                current_line: state.current_line,
                is_error: state.error.is_some(),
            },
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        panes::render_terminal_pane(
            frame,
            left_rows[1],
            &state.output,
            self.focused_pane == FocusedPane::Output,
            &mut self.output_scroll,
        );

        panes::render_variables_pane(
            frame,
            right_rows[0],
            &state.variables,
            self.focused_pane == FocusedPane::Variables,
            &mut self.variables_scroll,
        );

        panes::render_stack_pane(
            frame,
            right_rows[1],
            StackRenderData {
                frames: &state.call_stack,
                lines: self.engine.lines(),
            },
            self.focused_pane == FocusedPane::Stack,
            &mut self.stack_scroll,
        );

        panes::render_trace_pane(
            frame,
            right_rows[2],
            &state.trace,
            error.as_deref(),
            self.focused_pane == FocusedPane::Trace,
            &mut self.trace_scroll,
        );

        panes::render_status_bar(
            frame,
            main_chunks[1],
            StatusRenderData {
                message: &self.status_message,
                current_step: self.cursor.position(),
                total_steps: self.cursor.total_steps(),
                error: error.as_deref(),
                is_playing: self.is_playing,
            },
        );
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            // Number keys step forward N times directly
            KeyCode::Char(c @ '1'..='9') => {
                self.is_playing = false;
                let n = c.to_digit(10).unwrap_or(1) as usize;
                let stepped = self.cursor.advance(n);
                self.status_message = format!("Stepped forward {} step(s)", stepped);
                self.follow_bottom();
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Left => {
                self.is_playing = false;
                self.step_backward();
            }
            KeyCode::Right => {
                self.is_playing = false;
                self.step_forward();
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Source => {
                    // Scrolling up makes the current line move down visually
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_add(1));
                    }
                }
                FocusedPane::Output => self.output_scroll = self.output_scroll.saturating_sub(1),
                FocusedPane::Variables => {
                    self.variables_scroll = self.variables_scroll.saturating_sub(1)
                }
                FocusedPane::Stack => {
                    self.stack_scroll.offset = self.stack_scroll.offset.saturating_sub(1)
                }
                FocusedPane::Trace => self.trace_scroll = self.trace_scroll.saturating_sub(1),
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Source => {
                    // Scrolling down makes the current line move up visually
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_sub(1));
                    }
                }
                FocusedPane::Output => self.output_scroll = self.output_scroll.saturating_add(1),
                FocusedPane::Variables => {
                    self.variables_scroll = self.variables_scroll.saturating_add(1)
                }
                FocusedPane::Stack => {
                    self.stack_scroll.offset = self.stack_scroll.offset.saturating_add(1)
                }
                FocusedPane::Trace => self.trace_scroll = self.trace_scroll.saturating_add(1),
            },
            KeyCode::Char(' ') => {
                // Toggle auto-play (200ms debounce against key repeat)
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.toggle_playback();
                }
            }
            KeyCode::Enter => {
                self.is_playing = false;
                self.cursor.jump_to_end();
                self.status_message = "Jumped to end".to_string();
                self.follow_bottom();
            }
            KeyCode::Backspace => {
                self.is_playing = false;
                self.cursor.rewind();
                self.status_message = "Jumped to start".to_string();
                self.follow_bottom();
            }
            _ => {}
        }
    }

    fn toggle_playback(&mut self) {
        self.is_playing = !self.is_playing;
        if self.is_playing {
            // First tick fires immediately
            let now = Instant::now();
            self.last_play_time = now.checked_sub(self.play_interval).unwrap_or(now);
            self.status_message = "Playing...".to_string();
        } else {
            self.status_message = "Paused".to_string();
        }
    }

    /// Step forward in execution
    fn step_forward(&mut self) {
        if self.cursor.step_forward() {
            self.status_message = "Stepped forward".to_string();
            self.follow_bottom();
        } else {
            self.status_message = "Cannot step forward: already at the last step".to_string();
        }
    }

    /// Step backward in execution
    fn step_backward(&mut self) {
        if self.cursor.step_backward() {
            self.status_message = "Stepped backward".to_string();
            self.follow_bottom();
        } else {
            self.status_message = "Cannot step backward: already at the first step".to_string();
        }
    }

    /// Scroll output and trace to their newest rows
    fn follow_bottom(&mut self) {
        self.output_scroll = usize::MAX;
        self.trace_scroll = usize::MAX;
    }
}
