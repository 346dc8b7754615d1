//! Keypress-driven selection menu and free-text query.
//!
//! A [MenuSession] owns the terminal for the lifetime of one `select` call:
//! raw mode is held by its [KeySource] and released when the session is
//! dropped, whichever way the selection ends.

use std::io::{self, BufRead, Write};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    queue,
    terminal::{self, ClearType},
};

use crate::error::{ReleaseError, Result};
use crate::ui::formatter;

/// Lines cleared after a query answer is submitted
const QUERY_CLEAR_LINES: u16 = 1;

/// One selectable row: `key` is returned, `label` is shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOption {
    pub key: String,
    pub label: String,
}

impl MenuOption {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        MenuOption {
            key: key.into(),
            label: label.into(),
        }
    }

    /// Option whose label is its key
    pub fn plain(key: impl Into<String>) -> Self {
        let key = key.into();
        MenuOption {
            label: key.clone(),
            key,
        }
    }
}

/// Input understood by a menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEvent {
    Up,
    Down,
    Confirm,
    Cancel,
}

/// Where a menu stands after an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuStatus {
    Pending,
    Resolved(String),
    Cancelled,
}

/// Question, options and the current selection
///
/// The selection always indexes a valid option and wraps at both ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuState {
    question: Option<String>,
    options: Vec<MenuOption>,
    selected: usize,
}

impl MenuState {
    pub fn new(question: Option<&str>, options: Vec<MenuOption>) -> Result<Self> {
        if options.is_empty() {
            return Err(ReleaseError::prompt("menu has no options"));
        }
        Ok(MenuState {
            question: question.map(str::to_string),
            options,
            selected: 0,
        })
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> &MenuOption {
        &self.options[self.selected]
    }

    pub fn options(&self) -> &[MenuOption] {
        &self.options
    }

    pub fn apply(&mut self, event: MenuEvent) -> MenuStatus {
        let len = self.options.len();
        match event {
            MenuEvent::Up => {
                self.selected = (self.selected + len - 1) % len;
                MenuStatus::Pending
            }
            MenuEvent::Down => {
                self.selected = (self.selected + 1) % len;
                MenuStatus::Pending
            }
            MenuEvent::Confirm => MenuStatus::Resolved(self.selected().key.clone()),
            MenuEvent::Cancel => MenuStatus::Cancelled,
        }
    }

    /// Lines of one frame: the question (if any) then every option
    pub fn render(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.options.len() + 1);
        if let Some(question) = &self.question {
            lines.push(formatter::question(question));
        }
        for (idx, option) in self.options.iter().enumerate() {
            lines.push(formatter::menu_option(&option.label, idx == self.selected));
        }
        lines
    }
}

/// Translate a key press into a menu event
///
/// Releases and unrelated keys map to `None`.
pub fn map_key(key: &KeyEvent) -> Option<MenuEvent> {
    if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(MenuEvent::Cancel)
        }
        KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => Some(MenuEvent::Up),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => Some(MenuEvent::Down),
        KeyCode::Enter => Some(MenuEvent::Confirm),
        KeyCode::Esc => Some(MenuEvent::Cancel),
        _ => None,
    }
}

/// Raw terminal mode, held until dropped
pub struct RawModeGuard {
    _private: (),
}

impl RawModeGuard {
    pub fn acquire() -> Result<Self> {
        terminal::enable_raw_mode()
            .map_err(|e| ReleaseError::prompt(format!("cannot enter raw mode: {}", e)))?;
        Ok(RawModeGuard { _private: () })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            tracing::warn!("failed to leave raw mode: {}", e);
        }
    }
}

/// Blocking supply of key presses
pub trait KeySource {
    fn next_key(&mut self) -> Result<KeyEvent>;
}

/// Keys read from the real terminal; raw mode lasts as long as this value
pub struct TerminalKeys {
    _raw: RawModeGuard,
}

impl TerminalKeys {
    pub fn open() -> Result<Self> {
        Ok(TerminalKeys {
            _raw: RawModeGuard::acquire()?,
        })
    }
}

impl KeySource for TerminalKeys {
    fn next_key(&mut self) -> Result<KeyEvent> {
        loop {
            if let Event::Key(key) = event::read()? {
                return Ok(key);
            }
        }
    }
}

/// One active `select`: state machine plus the frame it last drew
pub struct MenuSession<W: Write, K: KeySource> {
    out: W,
    keys: K,
    state: MenuState,
    rendered_lines: u16,
}

impl<W: Write, K: KeySource> MenuSession<W, K> {
    /// Hide the cursor and draw the first frame
    pub fn open(out: W, keys: K, state: MenuState) -> Result<Self> {
        let mut session = MenuSession {
            out,
            keys,
            state,
            rendered_lines: 0,
        };
        queue!(session.out, cursor::Hide)?;
        session.draw()?;
        Ok(session)
    }

    pub fn state(&self) -> &MenuState {
        &self.state
    }

    /// Block until the next key that means something to the menu
    pub fn next_event(&mut self) -> Result<MenuEvent> {
        loop {
            let key = self.keys.next_key()?;
            if let Some(event) = map_key(&key) {
                return Ok(event);
            }
        }
    }

    /// Drive the menu until it resolves or is cancelled
    pub fn run(mut self) -> Result<String> {
        loop {
            let event = self.next_event()?;
            match self.state.apply(event) {
                MenuStatus::Pending => self.draw()?,
                MenuStatus::Resolved(key) => return Ok(key),
                MenuStatus::Cancelled => return Err(ReleaseError::Cancelled),
            }
        }
    }

    fn clear(&mut self) -> io::Result<()> {
        queue!(self.out, cursor::MoveToColumn(0))?;
        if self.rendered_lines > 0 {
            queue!(self.out, cursor::MoveUp(self.rendered_lines))?;
        }
        queue!(self.out, terminal::Clear(ClearType::FromCursorDown))?;
        self.rendered_lines = 0;
        Ok(())
    }

    fn draw(&mut self) -> Result<()> {
        self.clear()?;
        let lines = self.state.render();
        for line in &lines {
            write!(self.out, "{}\r\n", line)?;
        }
        self.rendered_lines = u16::try_from(lines.len()).unwrap_or(u16::MAX);
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write, K: KeySource> Drop for MenuSession<W, K> {
    fn drop(&mut self) {
        let restored = self
            .clear()
            .and_then(|_| queue!(self.out, cursor::Show))
            .and_then(|_| self.out.flush());
        if let Err(e) = restored {
            tracing::warn!("failed to restore terminal after menu: {}", e);
        }
    }
}

/// Interactive input used by the release workflow
///
/// Only one call may be outstanding at a time.
pub trait Prompter {
    /// Let the user pick an option; returns its key or [ReleaseError::Cancelled]
    fn select(&mut self, question: Option<&str>, options: &[MenuOption]) -> Result<String>;

    /// Ask for a line of text; the answer may be empty
    fn query(&mut self, prompt: &str) -> Result<String>;
}

/// Prompter bound to the process's own terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    pub fn new() -> Self {
        TerminalPrompter
    }
}

impl Prompter for TerminalPrompter {
    fn select(&mut self, question: Option<&str>, options: &[MenuOption]) -> Result<String> {
        let state = MenuState::new(question, options.to_vec())?;
        let keys = TerminalKeys::open()?;
        let session = MenuSession::open(io::stdout(), keys, state)?;
        let chosen = session.run();
        tracing::debug!(?question, ?chosen, "menu closed");
        chosen
    }

    fn query(&mut self, prompt: &str) -> Result<String> {
        let mut stdout = io::stdout();
        write!(stdout, "{} ", formatter::question(prompt))?;
        stdout.flush()?;

        let mut input = String::new();
        io::stdin().lock().read_line(&mut input)?;
        let answer = input.trim_end_matches(['\r', '\n']).to_string();

        queue!(
            stdout,
            cursor::MoveUp(QUERY_CLEAR_LINES),
            cursor::MoveToColumn(0),
            terminal::Clear(ClearType::FromCursorDown)
        )?;
        stdout.flush()?;
        Ok(answer)
    }
}
