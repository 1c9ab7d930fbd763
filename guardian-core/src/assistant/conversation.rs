//! The assistant chat widget's transcript and typing delays.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tokio::time::Instant;
use uuid::Uuid;

use crate::assistant::rules::{KeywordResponder, ReplyCategory, INITIAL_SUGGESTIONS, WELCOME_MESSAGE};
use crate::schedule::Schedule;

const WELCOME_DELAY: Duration = Duration::from_millis(800);
const REPLY_BASE_DELAY: Duration = Duration::from_millis(1000);
const REPLY_JITTER_MS: u64 = 1000;

/// Quick-reply chips shown under the transcript.
pub const MAX_QUICK_SUGGESTIONS: usize = 3;

/// Who wrote a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in the transcript.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationTurn {
    pub id: Uuid,
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ConversationTurn {
    fn new(role: Role, text: impl Into<String>, suggestions: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            text: text.into(),
            timestamp: Utc::now(),
            suggestions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Welcome,
    Reply(String),
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Chat session with the scripted assistant.
#[derive(Debug)]
pub struct Conversation {
    open: bool,
    turns: Vec<ConversationTurn>,
    suggestions: Vec<String>,
    pending: usize,
    last_category: Option<ReplyCategory>,
    responder: KeywordResponder,
    schedule: Schedule<Step>,
    rng: StdRng,
}

impl Conversation {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy(), 1.0)
    }

    /// A conversation with reproducible reply delays.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), 1.0)
    }

    pub fn with_rng(rng: StdRng, time_scale: f64) -> Self {
        Self {
            open: false,
            turns: Vec::new(),
            suggestions: owned(INITIAL_SUGGESTIONS),
            pending: 0,
            last_category: None,
            responder: KeywordResponder::new(),
            schedule: Schedule::with_time_scale(time_scale),
            rng,
        }
    }

    /// Show the widget. An empty transcript gets a welcome message shortly after.
    pub fn open(&mut self, now: Instant) {
        if self.open {
            return;
        }
        self.open = true;
        if self.turns.is_empty() && self.pending == 0 {
            self.pending += 1;
            self.schedule.after(now, WELCOME_DELAY, Step::Welcome);
        }
        tracing::debug!("assistant opened");
    }

    /// Hide the widget, dropping the transcript and any pending replies.
    pub fn close(&mut self) {
        self.schedule.cancel_all();
        self.open = false;
        self.turns.clear();
        self.suggestions = owned(INITIAL_SUGGESTIONS);
        self.pending = 0;
        self.last_category = None;
    }

    /// Post a user message and schedule the reply.
    ///
    /// Blank input is ignored and returns `false`.
    pub fn send(&mut self, text: &str, now: Instant) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        self.turns
            .push(ConversationTurn::new(Role::User, text, Vec::new()));
        let jitter = Duration::from_millis(self.rng.gen_range(0..REPLY_JITTER_MS));
        self.pending += 1;
        self.schedule
            .after(now, REPLY_BASE_DELAY + jitter, Step::Reply(text.to_string()));
        true
    }

    /// Deliver every reply due at or before `now`.
    pub fn tick(&mut self, now: Instant) {
        while let Some(fired) = self.schedule.pop_due(now) {
            self.pending = self.pending.saturating_sub(1);
            match fired.event {
                Step::Welcome => {
                    self.turns.push(ConversationTurn::new(
                        Role::Assistant,
                        WELCOME_MESSAGE,
                        owned(INITIAL_SUGGESTIONS),
                    ));
                }
                Step::Reply(text) => {
                    let reply = self.responder.respond(&text);
                    tracing::debug!(category = ?reply.category, "assistant replied");
                    self.suggestions = owned(reply.suggestions);
                    self.last_category = Some(reply.category);
                    self.turns.push(ConversationTurn::new(
                        Role::Assistant,
                        reply.content,
                        owned(reply.suggestions),
                    ));
                }
            }
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Whether the typing indicator should show.
    pub fn is_typing(&self) -> bool {
        self.pending > 0
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn last_category(&self) -> Option<ReplyCategory> {
        self.last_category
    }

    /// Quick-reply chips to show, or none while a reply is pending.
    pub fn quick_suggestions(&self) -> &[String] {
        if self.turns.is_empty() || self.is_typing() {
            return &[];
        }
        let n = self.suggestions.len().min(MAX_QUICK_SUGGESTIONS);
        &self.suggestions[..n]
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.schedule.next_deadline()
    }

    /// The transcript as pretty-printed JSON.
    pub fn transcript_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.turns)
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_welcome_after_open() {
        let t0 = Instant::now();
        let mut chat = Conversation::with_seed(7);
        chat.open(t0);
        assert!(chat.is_typing());
        assert!(chat.quick_suggestions().is_empty());

        chat.tick(t0 + ms(800));
        assert_eq!(chat.turns().len(), 1);
        assert_eq!(chat.turns()[0].role, Role::Assistant);
        assert_eq!(chat.turns()[0].text, WELCOME_MESSAGE);
        assert!(!chat.is_typing());
        assert_eq!(chat.quick_suggestions().len(), 3);
    }

    #[test]
    fn test_reply_within_two_seconds() {
        let t0 = Instant::now();
        let mut chat = Conversation::with_seed(42);
        chat.open(t0);
        chat.tick(t0 + ms(800));

        let sent_at = t0 + ms(1000);
        assert!(chat.send("Show me high-risk zones", sent_at));
        assert_eq!(chat.turns().last().unwrap().role, Role::User);

        chat.tick(sent_at + ms(999));
        assert_eq!(chat.turns().len(), 2);
        assert!(chat.is_typing());

        chat.tick(sent_at + ms(2000));
        assert_eq!(chat.turns().len(), 3);
        assert_eq!(chat.last_category(), Some(ReplyCategory::RiskZones));
        assert_eq!(chat.quick_suggestions()[0], "Deploy assets to Meppadi");
    }

    #[test]
    fn test_blank_send_is_noop() {
        let t0 = Instant::now();
        let mut chat = Conversation::with_seed(1);
        assert!(!chat.send("   ", t0));
        assert!(chat.turns().is_empty());
        assert!(!chat.is_typing());
    }

    #[test]
    fn test_close_clears_transcript() {
        let t0 = Instant::now();
        let mut chat = Conversation::with_seed(3);
        chat.open(t0);
        chat.tick(t0 + ms(800));
        chat.send("drone", t0 + ms(900));
        chat.close();

        chat.tick(t0 + ms(10_000));
        assert!(chat.turns().is_empty());
        assert!(!chat.is_typing());

        chat.open(t0 + ms(20_000));
        chat.tick(t0 + ms(20_800));
        assert_eq!(chat.turns().len(), 1);
    }

    #[test]
    fn test_transcript_json() {
        let t0 = Instant::now();
        let mut chat = Conversation::with_seed(9);
        chat.send("confirm", t0);
        chat.tick(t0 + ms(2000));
        let json = chat.transcript_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["role"], "user");
        assert_eq!(value[1]["role"], "assistant");
    }
}
