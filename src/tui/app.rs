//! Dashboard application.
//!
//! Owns the `DashboardState` and translates keyboard input into state
//! changes and pending actions. The runner processes pending actions and
//! feeds workflow events back into the state.

use crossterm::event::{KeyCode, KeyEvent};

use super::state::{DashboardState, InteractionMode};

/// Dashboard application: state plus input handling.
pub struct App {
    state: DashboardState,
}

impl App {
    /// Create a new application with the given default round limit.
    pub fn new(max_messages: usize) -> Self {
        Self {
            state: DashboardState::new(max_messages),
        }
    }

    /// Get a reference to the state.
    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Get a mutable reference to the state.
    pub fn state_mut(&mut self) -> &mut DashboardState {
        &mut self.state
    }

    /// Handle a key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.state.mode {
            InteractionMode::Normal => self.handle_normal_key(key),
            InteractionMode::TopicInput => self.handle_input_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => {
                self.state.should_quit = true;
                if self.state.run_active {
                    self.state.cancel_requested = true;
                }
            }
            KeyCode::Esc => {
                if self.state.run_active {
                    self.state.cancel_requested = true;
                }
            }
            KeyCode::Char('i') | KeyCode::Char('t') => {
                self.state.mode = InteractionMode::TopicInput;
            }
            KeyCode::Char('a') => {
                self.state.approve_requested = true;
            }
            KeyCode::Char('r') => {
                self.state.regen_requested = true;
            }
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Up => {
                self.state.increase_limit();
            }
            KeyCode::Char('-') | KeyCode::Char('_') | KeyCode::Down => {
                self.state.decrease_limit();
            }
            _ => {}
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                let topic = self.state.topic_input.trim().to_string();
                if !topic.is_empty() {
                    self.state.pending_topic = Some(topic);
                    self.state.topic_input.clear();
                    self.state.mode = InteractionMode::Normal;
                }
            }
            KeyCode::Esc => {
                self.state.mode = InteractionMode::Normal;
            }
            KeyCode::Backspace => {
                self.state.topic_input.pop();
            }
            KeyCode::Char(c) => {
                self.state.topic_input.push(c);
            }
            _ => {}
        }
    }
}
