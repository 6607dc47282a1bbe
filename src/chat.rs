//! The chat session: input validation, request dispatch, reply rendering and
//! the message log.
//!
//! [`ChatClient`] owns its transport and its view. Each submitted message walks
//! `Idle -> AwaitingResponse -> Idle`; while a request is in flight further
//! submissions are turned away, so the loading placeholder is never shown
//! twice.

use crate::client::Transport;
use crate::models::{ChatRequest, ChatResponse, Endpoint, Message, RawResponse, Reply, Result, Sender};
use crate::validate::{self, ValidationError};
use tracing::{debug, info, warn};

/// Identifier of the single loading placeholder.
pub const LOADING_ID: &str = "loading-message";

pub const ASSISTANT_LABEL: &str = "Superior AI:";
pub const USER_LABEL: &str = "You:";

pub const INVALID_NOTICE: &str = "⚠️ Please enter a valid message before sending.";
pub const TOO_LONG_NOTICE: &str = "⚠️ Message too long! Please limit to 500 characters.";
pub const BUSY_NOTICE: &str = "⏳ A request is already in progress. Please wait for the response.";
pub const PARSE_ERROR_NOTICE: &str = "⚠️ Error processing response. Please try again.";
pub const NETWORK_ERROR_NOTICE: &str = "🚨 Network error. Please check your connection.";

pub fn http_error_notice(status: u16) -> String {
    format!("❌ Error: {} - Unable to fetch response.", status)
}

/// Label printed in front of a message body, if the sender has one.
pub fn label(sender: Sender) -> Option<&'static str> {
    match sender {
        Sender::User => Some(USER_LABEL),
        Sender::Assistant => Some(ASSISTANT_LABEL),
        Sender::System => None,
    }
}

/// Uncoloured single-line rendering: `You: hello [10:42:07]`.
pub fn plain_line(message: &Message) -> String {
    match label(message.sender) {
        Some(label) => format!("{} {} [{}]", label, message.text, message.timestamp),
        None => format!("{} [{}]", message.text, message.timestamp),
    }
}

/// Where the chat log is drawn.
pub trait ChatView {
    fn render_message(&mut self, message: &Message);
    fn show_loading(&mut self, id: &str);
    fn remove_loading(&mut self, id: &str);
    /// Wipes every rendered entry, the loading placeholder included.
    fn clear(&mut self);
    fn scroll_to_latest(&mut self);
    fn clear_input(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    AwaitingResponse { endpoint: Endpoint },
}

/// An accepted message, ready to go out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub endpoint: Endpoint,
    pub request: ChatRequest,
}

/// Classifies the outcome of an exchange.
///
/// Runs while the loading placeholder is still on screen, so anything logged
/// here stays at `debug`; `settle` reports failures once the line is gone.
pub fn interpret(result: Result<RawResponse>) -> Reply {
    match result {
        Ok(RawResponse { status: 200, body }) => match serde_json::from_str::<ChatResponse>(&body) {
            Ok(response) => Reply::Success(response.text()),
            Err(e) => {
                debug!(error = %e, "reply body is not a chat response");
                Reply::ParseError
            }
        },
        Ok(RawResponse { status, .. }) => Reply::HttpError(status),
        Err(e) => {
            debug!(error = %e, "request failed in transport");
            Reply::NetworkError
        }
    }
}

pub struct ChatClient<T, V> {
    transport: T,
    view: V,
    log: Vec<Message>,
    endpoint: Endpoint,
    state: RequestState,
    loading: Option<&'static str>,
}

impl<T: Transport, V: ChatView> ChatClient<T, V> {
    pub fn new(transport: T, view: V) -> Self {
        Self {
            transport,
            view,
            log: Vec::new(),
            endpoint: Endpoint::default(),
            state: RequestState::Idle,
            loading: None,
        }
    }

    pub fn with_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn select_endpoint(&mut self, endpoint: Endpoint) {
        debug!(%endpoint, "endpoint selected");
        self.endpoint = endpoint;
    }

    pub fn messages(&self) -> &[Message] {
        &self.log
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_some()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sends `raw` to the selected endpoint and renders whatever comes back.
    ///
    /// Returns `None` when the input was rejected and nothing was sent.
    ///
    /// If the returned future is dropped before the reply arrives, the request
    /// is abandoned: the placeholder goes away and the client is idle again.
    pub async fn submit(&mut self, raw: &str) -> Option<Reply> {
        let dispatch = self.begin(raw)?;
        let mut in_flight = InFlight { chat: self, armed: true };

        let pending = exchange(&in_flight.chat.transport, &dispatch);
        in_flight.chat.view.clear_input();
        let reply = pending.await;

        in_flight.armed = false;
        in_flight.chat.settle(reply.clone());
        Some(reply)
    }

    /// Accepts a message for sending: validates it, logs the user entry and
    /// shows the loading placeholder.
    pub fn begin(&mut self, raw: &str) -> Option<Dispatch> {
        let text = raw.trim();

        if let RequestState::AwaitingResponse { endpoint } = self.state {
            debug!(%endpoint, "submit rejected, request already in flight");
            self.append_message(Sender::System, BUSY_NOTICE);
            return None;
        }

        if !self.validate(text) {
            self.append_message(Sender::System, INVALID_NOTICE);
            return None;
        }

        self.append_message(Sender::User, text);

        let endpoint = self.endpoint;
        self.show_loading();
        self.state = RequestState::AwaitingResponse { endpoint };
        info!(%endpoint, chars = text.chars().count(), "dispatching message");

        Some(Dispatch {
            endpoint,
            request: ChatRequest { message: text.to_string() },
        })
    }

    pub async fn dispatch(&self, dispatch: &Dispatch) -> Reply {
        exchange(&self.transport, dispatch).await
    }

    /// Renders the reply of the outstanding request and returns to idle.
    /// Returns `false` if nothing was outstanding.
    pub fn settle(&mut self, reply: Reply) -> bool {
        let RequestState::AwaitingResponse { endpoint } = self.state else {
            warn!(outcome = reply.kind(), "reply arrived with no request in flight");
            return false;
        };

        self.remove_loading();
        self.state = RequestState::Idle;

        let text = match reply {
            Reply::Success(message) => message,
            Reply::HttpError(status) => {
                warn!(%endpoint, status, "server answered with an error status");
                http_error_notice(status)
            }
            Reply::ParseError => {
                warn!(%endpoint, "reply body is not a chat response");
                PARSE_ERROR_NOTICE.to_string()
            }
            Reply::NetworkError => {
                warn!(%endpoint, "request failed in transport");
                NETWORK_ERROR_NOTICE.to_string()
            }
        };
        info!(%endpoint, "reply settled");

        self.append_message(Sender::Assistant, text);
        self.view.scroll_to_latest();
        true
    }

    /// Drops the outstanding request without rendering a reply: the
    /// placeholder is removed and the client returns to idle. Returns `false`
    /// if nothing was outstanding.
    pub fn abandon(&mut self) -> bool {
        let RequestState::AwaitingResponse { endpoint } = self.state else {
            return false;
        };

        self.remove_loading();
        self.state = RequestState::Idle;
        warn!(%endpoint, "request abandoned before the reply arrived");
        self.view.scroll_to_latest();
        true
    }

    /// Applies the input rules, posting the length notice when that is the
    /// rule that failed. Empty and symbols-only input fail silently.
    pub fn validate(&mut self, text: &str) -> bool {
        match validate::check(text) {
            Ok(()) => true,
            Err(ValidationError::TooLong) => {
                debug!("message rejected: too long");
                self.append_message(Sender::System, TOO_LONG_NOTICE);
                false
            }
            Err(e) => {
                debug!(reason = %e, "message rejected");
                false
            }
        }
    }

    pub fn append_message(&mut self, sender: Sender, text: impl Into<String>) {
        let message = Message::new(sender, text);
        self.view.render_message(&message);
        self.log.push(message);
        self.view.scroll_to_latest();
    }

    /// Empties the log. A request in flight still renders its reply.
    pub fn clear_log(&mut self) {
        self.log.clear();
        self.loading = None;
        self.view.clear();
    }

    fn show_loading(&mut self) {
        if self.loading.is_none() {
            self.view.show_loading(LOADING_ID);
            self.loading = Some(LOADING_ID);
            self.view.scroll_to_latest();
        }
    }

    fn remove_loading(&mut self) {
        if let Some(id) = self.loading.take() {
            self.view.remove_loading(id);
        }
    }
}

/// Abandons the request when `submit` is dropped mid-flight.
struct InFlight<'a, T: Transport, V: ChatView> {
    chat: &'a mut ChatClient<T, V>,
    armed: bool,
}

impl<T: Transport, V: ChatView> Drop for InFlight<'_, T, V> {
    fn drop(&mut self) {
        if self.armed {
            self.chat.abandon();
        }
    }
}

async fn exchange<T: Transport>(transport: &T, dispatch: &Dispatch) -> Reply {
    interpret(transport.post_message(dispatch.endpoint, &dispatch.request).await)
}
