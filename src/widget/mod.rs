pub mod history;
pub mod markdown;
pub mod storage;
pub mod transport;
pub mod view;

use log::{ error, info };
use serde_json::Value;
use std::sync::Arc;

use crate::config::WidgetConfig;
use crate::models::chat::{ ChatRequest, ContextMessage, StoredMessage, Who };
use self::history::History;
use self::markdown::{ escape_html, render_agent_text };
use self::storage::KeyValueStore;
use self::transport::RelayTransport;
use self::view::ChatView;

pub const FALLBACK_REPLY: &str = "Sorry, I could not get an answer right now.";
pub const NETWORK_ERROR_REPLY: &str = "Network error while contacting the agent.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    Closed,
    Open,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Blank input; nothing was sent.
    Ignored,
    Replied(String),
    /// The relay answered without a usable reply. Carries the status and body it sent.
    Failed { status: u16, body: Value },
    NetworkError(String),
}

/// Headless chat panel: owns the panel state, the persisted history and the
/// relay round trip, and draws through a [`ChatView`].
pub struct ChatWidget<V: ChatView> {
    config: WidgetConfig,
    history: History,
    transport: Arc<dyn RelayTransport>,
    view: V,
    panel: PanelState,
    temperature: Option<f32>,
}

impl<V: ChatView> ChatWidget<V> {
    pub fn new(
        config: WidgetConfig,
        store: Arc<dyn KeyValueStore>,
        transport: Arc<dyn RelayTransport>,
        view: V,
    ) -> Self {
        let history = History::new(store, config.storage_key.clone(), config.history_limit);
        let mut widget = Self {
            config,
            history,
            transport,
            view,
            panel: PanelState::Closed,
            temperature: None,
        };
        widget.view.set_panel_visible(false);
        widget.render_history();
        widget
    }

    pub fn panel(&self) -> PanelState {
        self.panel
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn quick_replies(&self) -> &[String] {
        &self.config.quick_replies
    }

    pub fn set_temperature(&mut self, temperature: Option<f32>) {
        self.temperature = temperature;
    }

    /// `None` flips the current state. Opening moves focus to the input.
    pub fn toggle_panel(&mut self, open: Option<bool>) {
        let open = open.unwrap_or(self.panel == PanelState::Closed);
        if open {
            self.panel = PanelState::Open;
            self.view.set_panel_visible(true);
            self.view.focus_input();
        } else {
            self.panel = PanelState::Closed;
            self.view.set_panel_visible(false);
        }
    }

    pub fn open_panel(&mut self) {
        self.toggle_panel(Some(true));
    }

    pub fn close_panel(&mut self) {
        self.toggle_panel(Some(false));
    }

    /// Draws a message and records it in history. Empty text is rejected.
    pub fn append_message(&mut self, text: &str, who: Who) -> bool {
        if text.is_empty() {
            return false;
        }
        self.draw(text, who);
        self.history.push(StoredMessage::new(who, text));
        true
    }

    /// Redraws the panel from persisted history without writing it back.
    pub fn render_history(&mut self) {
        self.view.clear_messages();
        for message in self.history.load() {
            self.draw(&message.text, message.who);
        }
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        self.render_history();
    }

    pub fn build_request(&self, question: &str, context: Vec<ContextMessage>) -> ChatRequest {
        ChatRequest {
            question: question.to_string(),
            temperature: self.temperature,
            messages: Some(context),
            system_prompt: None,
        }
    }

    /// Sends one question to the relay and appends the answer, or a fallback
    /// message when the round trip fails.
    pub async fn submit(&mut self, text: &str) -> SubmitOutcome {
        let question = text.trim();
        if question.is_empty() {
            return SubmitOutcome::Ignored;
        }

        let context = self.history.recent_context(self.config.context_messages);
        self.append_message(question, Who::User);
        self.view.show_typing(&self.config.typing_label());
        self.view.scroll_to_bottom();

        let request = self.build_request(question, context);
        let result = self.transport.send(&request).await;
        self.view.hide_typing();

        match result {
            Ok(reply) => match reply.reply_text() {
                Some(text) => {
                    let text = text.to_string();
                    info!("Agent replied ({} chars)", text.len());
                    self.append_message(&text, Who::Agent);
                    SubmitOutcome::Replied(text)
                }
                None => {
                    error!("Agent error ({}): {}", reply.status, reply.body);
                    self.append_message(FALLBACK_REPLY, Who::Agent);
                    SubmitOutcome::Failed { status: reply.status, body: reply.body }
                }
            },
            Err(e) => {
                error!("Network error while contacting the agent: {}", e);
                self.append_message(NETWORK_ERROR_REPLY, Who::Agent);
                SubmitOutcome::NetworkError(e.to_string())
            }
        }
    }

    /// Submits the configured canned question at `index`; out of range is ignored.
    pub async fn quick_reply(&mut self, index: usize) -> SubmitOutcome {
        match self.config.quick_replies.get(index).cloned() {
            Some(question) => self.submit(&question).await,
            None => SubmitOutcome::Ignored,
        }
    }

    fn draw(&mut self, text: &str, who: Who) {
        let html = match who {
            Who::Agent => render_agent_text(text),
            Who::User => escape_html(text),
        };
        self.view.push_message(who, &html);
        self.view.scroll_to_bottom();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::Role;
    use crate::widget::storage::MemoryStore;
    use crate::widget::transport::{ RelayReply, TransportError };
    use crate::widget::view::BufferView;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    enum Scripted {
        Reply(u16, Value),
        Undecodable,
    }

    struct ScriptedTransport {
        script: Scripted,
        sent: Mutex<Vec<ChatRequest>>,
    }

    impl ScriptedTransport {
        fn new(script: Scripted) -> Arc<Self> {
            Arc::new(Self { script, sent: Mutex::new(Vec::new()) })
        }
    }

    #[async_trait]
    impl RelayTransport for ScriptedTransport {
        async fn send(&self, request: &ChatRequest) -> Result<RelayReply, TransportError> {
            self.sent.lock().unwrap().push(request.clone());
            match &self.script {
                Scripted::Reply(status, body) => Ok(RelayReply { status: *status, body: body.clone() }),
                Scripted::Undecodable => {
                    Err(serde_json::from_str::<Value>("<html>").unwrap_err().into())
                }
            }
        }
    }

    fn widget(store: Arc<MemoryStore>, transport: Arc<ScriptedTransport>) -> ChatWidget<BufferView> {
        ChatWidget::new(WidgetConfig::default(), store, transport, BufferView::new())
    }

    #[test]
    fn panel_starts_closed_and_toggles() {
        let mut w = widget(Arc::new(MemoryStore::new()), ScriptedTransport::new(Scripted::Undecodable));
        assert_eq!(w.panel(), PanelState::Closed);
        assert!(!w.view().panel_visible);

        w.open_panel();
        assert_eq!(w.panel(), PanelState::Open);
        assert!(w.view().panel_visible);
        assert!(w.view().input_focused);

        w.toggle_panel(None);
        assert_eq!(w.panel(), PanelState::Closed);
        w.toggle_panel(None);
        assert_eq!(w.panel(), PanelState::Open);
        w.close_panel();
        assert!(!w.view().panel_visible);
    }

    #[test]
    fn user_text_is_escaped_but_not_rendered() {
        let mut w = widget(Arc::new(MemoryStore::new()), ScriptedTransport::new(Scripted::Undecodable));
        assert!(w.append_message("`<b>hi</b>`", Who::User));
        assert!(w.append_message("`<b>hi</b>`", Who::Agent));
        assert!(!w.append_message("", Who::User));

        let messages = &w.view().messages;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].html, "`&lt;b&gt;hi&lt;/b&gt;`");
        assert_eq!(messages[1].html, "<p><code>&lt;b&gt;hi&lt;/b&gt;</code></p>");
        assert_eq!(w.history().load().len(), 2);
    }

    #[test]
    fn history_is_replayed_on_construction() {
        let store = Arc::new(MemoryStore::new());
        {
            let mut w = widget(store.clone(), ScriptedTransport::new(Scripted::Undecodable));
            w.append_message("first", Who::User);
            w.append_message("second", Who::Agent);
        }
        let w = widget(store, ScriptedTransport::new(Scripted::Undecodable));
        let messages = &w.view().messages;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].html, "first");
        assert_eq!(messages[1].html, "<p>second</p>");
        assert_eq!(w.history().load().len(), 2);
    }

    #[test]
    fn clear_then_reload_shows_nothing() {
        let store = Arc::new(MemoryStore::new());
        let mut w = widget(store.clone(), ScriptedTransport::new(Scripted::Undecodable));
        w.append_message("hello", Who::User);
        w.clear_history();
        assert!(w.view().messages.is_empty());

        let reloaded = widget(store, ScriptedTransport::new(Scripted::Undecodable));
        assert!(reloaded.view().messages.is_empty());
    }

    #[tokio::test]
    async fn blank_submission_is_ignored() {
        let transport = ScriptedTransport::new(Scripted::Undecodable);
        let mut w = widget(Arc::new(MemoryStore::new()), transport.clone());
        assert_eq!(w.submit("   \n").await, SubmitOutcome::Ignored);
        assert!(transport.sent.lock().unwrap().is_empty());
        assert!(w.view().messages.is_empty());
    }

    #[tokio::test]
    async fn successful_reply_is_appended_and_persisted() {
        let transport = ScriptedTransport::new(Scripted::Reply(200, json!({ "reply": "Next meetup is **Friday**" })));
        let mut w = widget(Arc::new(MemoryStore::new()), transport.clone());
        w.set_temperature(Some(0.3));

        let outcome = w.submit("  When is the next meetup?  ").await;
        assert_eq!(outcome, SubmitOutcome::Replied("Next meetup is **Friday**".into()));
        assert!(w.view().typing.is_none());

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent[0].question, "When is the next meetup?");
        assert_eq!(sent[0].temperature, Some(0.3));
        assert_eq!(sent[0].messages.as_deref(), Some(&[][..]));

        let stored = w.history().load();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].who, Who::User);
        assert_eq!(stored[1].text, "Next meetup is **Friday**");
    }

    #[tokio::test]
    async fn context_excludes_the_new_question_and_is_windowed() {
        let transport = ScriptedTransport::new(Scripted::Reply(200, json!({ "reply": "ok" })));
        let store = Arc::new(MemoryStore::new());
        let config = WidgetConfig { context_messages: 3, ..WidgetConfig::default() };
        let mut w = ChatWidget::new(config, store, transport.clone(), BufferView::new());
        for i in 0..5 {
            w.append_message(&format!("m{}", i), if i % 2 == 0 { Who::User } else { Who::Agent });
        }

        w.submit("latest").await;

        let sent = transport.sent.lock().unwrap();
        let context = sent[0].messages.clone().unwrap();
        let contents: Vec<_> = context.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["m2", "m3", "m4"]);
        assert_eq!(context[1].role, Role::Assistant);
    }

    #[tokio::test]
    async fn relay_error_shows_fallback() {
        let transport = ScriptedTransport::new(Scripted::Reply(500, json!({ "error": "Failed to get response from OpenAI" })));
        let mut w = widget(Arc::new(MemoryStore::new()), transport);

        match w.submit("hi").await {
            SubmitOutcome::Failed { status, .. } => assert_eq!(status, 500),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(w.history().load().last().unwrap().text, FALLBACK_REPLY);
        assert!(w.view().typing.is_none());
    }

    #[tokio::test]
    async fn missing_reply_field_shows_fallback() {
        let transport = ScriptedTransport::new(Scripted::Reply(200, json!({})));
        let mut w = widget(Arc::new(MemoryStore::new()), transport);
        assert!(matches!(w.submit("hi").await, SubmitOutcome::Failed { status: 200, .. }));
        assert_eq!(w.history().load().last().unwrap().text, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn transport_failure_shows_network_message() {
        let transport = ScriptedTransport::new(Scripted::Undecodable);
        let mut w = widget(Arc::new(MemoryStore::new()), transport);
        assert!(matches!(w.submit("hi").await, SubmitOutcome::NetworkError(_)));

        let last = w.view().messages.last().unwrap().clone();
        assert_eq!(last.who, Who::Agent);
        assert_eq!(last.html, format!("<p>{}</p>", NETWORK_ERROR_REPLY));
        assert!(w.view().typing.is_none());
    }

    #[tokio::test]
    async fn quick_reply_submits_canned_question() {
        let transport = ScriptedTransport::new(Scripted::Reply(200, json!({ "reply": "Soon!" })));
        let mut w = widget(Arc::new(MemoryStore::new()), transport.clone());

        assert_eq!(w.quick_reply(99).await, SubmitOutcome::Ignored);
        assert_eq!(w.quick_reply(0).await, SubmitOutcome::Replied("Soon!".into()));
        assert_eq!(transport.sent.lock().unwrap()[0].question, "Tell me about upcoming events");
    }

    #[test]
    fn every_append_scrolls_to_bottom() {
        let mut w = widget(Arc::new(MemoryStore::new()), ScriptedTransport::new(Scripted::Undecodable));
        let before = w.view().scrolls;

        w.append_message("one", Who::User);
        assert_eq!(w.view().scrolls, before + 1);
        w.append_message("two", Who::Agent);
        assert_eq!(w.view().scrolls, before + 2);

        assert!(!w.append_message("", Who::User));
        assert_eq!(w.view().scrolls, before + 2);
    }

    #[tokio::test]
    async fn typing_indicator_shown_once_per_submit() {
        let transport = ScriptedTransport::new(Scripted::Reply(200, json!({ "reply": "ok" })));
        let mut w = widget(Arc::new(MemoryStore::new()), transport);

        w.submit("first").await;
        assert_eq!(w.view().typing_shown, vec!["BaldKids is typing…".to_string()]);
        assert!(w.view().typing.is_none());

        w.submit("   ").await;
        w.submit("second").await;
        assert_eq!(w.view().typing_shown.len(), 2);
        assert!(w.view().typing.is_none());
    }

    #[tokio::test]
    async fn typing_indicator_uses_assistant_name() {
        let transport = ScriptedTransport::new(Scripted::Undecodable);
        let config = WidgetConfig { assistant_name: "Kuya".into(), ..WidgetConfig::default() };
        let mut w = ChatWidget::new(config, Arc::new(MemoryStore::new()), transport, BufferView::new());

        w.submit("hi").await;
        assert_eq!(w.view().typing_shown, vec!["Kuya is typing…".to_string()]);
    }
}
