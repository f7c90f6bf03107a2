use std::sync::Arc;

use muse_core::{GenerationProvider, Orchestrator};
use tokio::task::JoinHandle;
use tracing::debug;

pub struct ChatApp<P> {
    pub should_quit: bool,
    pub orchestrator: Orchestrator<P>,
    /// Text and image model names, for the header.
    pub models: String,
    pub input: String,
    pub cursor_pos: usize,
    pub messages_scroll: u16,
    /// The spawned turn. It settles the conversation itself, even when it
    /// is aborted or panics.
    pub response_task: Option<JoinHandle<()>>,
}

impl<P: GenerationProvider> ChatApp<P> {
    pub fn new(provider: Arc<P>, models: String) -> Self {
        Self {
            should_quit: false,
            orchestrator: Orchestrator::new(provider),
            models,
            input: String::new(),
            cursor_pos: 0,
            messages_scroll: 0,
            response_task: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.orchestrator.is_awaiting()
    }

    pub fn send_message(&mut self) {
        let Ok(pending) = self.orchestrator.begin(&self.input) else {
            return;
        };

        self.input.clear();
        self.cursor_pos = 0;
        self.messages_scroll = 0;

        debug!(mode = ?pending.input().mode, "Spawning request");
        self.response_task = Some(tokio::spawn(pending.run()));
    }

    pub fn poll_response(&mut self) {
        let Some(task) = &self.response_task else {
            return;
        };
        if !task.is_finished() {
            return;
        }

        self.response_task = None;
        self.messages_scroll = 0;
    }

    pub fn scroll_up(&mut self) {
        self.messages_scroll = self.messages_scroll.saturating_add(1);
    }

    pub fn scroll_down(&mut self) {
        self.messages_scroll = self.messages_scroll.saturating_sub(1);
    }

    pub fn input_char(&mut self, c: char) {
        self.input.insert(self.cursor_pos, c);
        self.cursor_pos += c.len_utf8();
    }

    pub fn input_backspace(&mut self) {
        if self.cursor_pos > 0 {
            let prev_char_boundary = self.input[..self.cursor_pos]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.input.remove(prev_char_boundary);
            self.cursor_pos = prev_char_boundary;
        }
    }

    pub fn input_delete(&mut self) {
        if self.cursor_pos < self.input.len() {
            self.input.remove(self.cursor_pos);
        }
    }

    pub fn input_left(&mut self) {
        if self.cursor_pos > 0 {
            self.cursor_pos = self.input[..self.cursor_pos]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    pub fn input_right(&mut self) {
        if self.cursor_pos < self.input.len() {
            self.cursor_pos = self.input[self.cursor_pos..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor_pos + i)
                .unwrap_or(self.input.len());
        }
    }

    pub fn input_home(&mut self) {
        self.cursor_pos = 0;
    }

    pub fn input_end(&mut self) {
        self.cursor_pos = self.input.len();
    }

    /// Cursor offset in characters, for placing the terminal cursor.
    pub fn cursor_column(&self) -> usize {
        self.input[..self.cursor_pos].chars().count()
    }
}
