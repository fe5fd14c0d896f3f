use crate::models::chat::Who;

/// Rendering surface of the chat panel. `html` passed to `push_message` is
/// already escaped (and, for agent messages, markdown-rendered).
pub trait ChatView: Send {
    fn set_panel_visible(&mut self, visible: bool);
    fn focus_input(&mut self);
    fn clear_messages(&mut self);
    fn push_message(&mut self, who: Who, html: &str);
    fn show_typing(&mut self, label: &str);
    fn hide_typing(&mut self);
    fn scroll_to_bottom(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedMessage {
    pub who: Who,
    pub html: String,
}

/// In-memory view that records what the widget drew.
#[derive(Debug, Default)]
pub struct BufferView {
    pub panel_visible: bool,
    pub input_focused: bool,
    pub messages: Vec<RenderedMessage>,
    pub typing: Option<String>,
    /// Every label the typing indicator was shown with, in order.
    pub typing_shown: Vec<String>,
    pub scrolls: usize,
}

impl BufferView {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChatView for BufferView {
    fn set_panel_visible(&mut self, visible: bool) {
        self.panel_visible = visible;
        if !visible {
            self.input_focused = false;
        }
    }

    fn focus_input(&mut self) {
        self.input_focused = true;
    }

    fn clear_messages(&mut self) {
        self.messages.clear();
    }

    fn push_message(&mut self, who: Who, html: &str) {
        self.messages.push(RenderedMessage { who, html: html.to_string() });
    }

    fn show_typing(&mut self, label: &str) {
        self.typing = Some(label.to_string());
        self.typing_shown.push(label.to_string());
    }

    fn hide_typing(&mut self) {
        self.typing = None;
    }

    fn scroll_to_bottom(&mut self) {
        self.scrolls += 1;
    }
}
