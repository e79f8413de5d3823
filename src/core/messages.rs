//! Contact messages and the repository that owns them.

use crate::core::db::MessageDb;
use crate::core::events::{StoreEvent, UNKNOWN_ADDRESS};
use crate::error::Result;
use crate::storage::{Slot, load_slot, save_slot};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A message submitted through the contact form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Time-ordered unique identifier.
    pub id: Uuid,

    /// Sender name.
    pub name: String,

    /// Sender email.
    pub email: String,

    /// Subject line.
    pub subject: String,

    /// Message text.
    pub body: String,

    /// When the message was submitted.
    pub created_at: DateTime<Utc>,

    /// Whether the admin has read it.
    pub read: bool,

    /// Best-effort origin address (simulated, not authoritative).
    pub origin_address: String,
}

/// Contact form fields as submitted. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MessageInput {
    /// Sender name.
    #[serde(default)]
    pub name: Option<String>,

    /// Sender email.
    #[serde(default)]
    pub email: Option<String>,

    /// Subject line.
    #[serde(default)]
    pub subject: Option<String>,

    /// Message text. The form posts this as `message`.
    #[serde(default, alias = "message")]
    pub body: Option<String>,
}

impl Message {
    /// Name used when the sender left it blank.
    pub const DEFAULT_NAME: &'static str = "Anonymous";
    /// Email used when the sender left it blank.
    pub const DEFAULT_EMAIL: &'static str = "No Email";
    /// Subject used when the sender left it blank.
    pub const DEFAULT_SUBJECT: &'static str = "No Subject";
    /// Body used when the sender left it blank.
    pub const DEFAULT_BODY: &'static str = "No Message";

    /// Build an unread message from form input, filling blank fields with
    /// defaults.
    #[must_use]
    pub fn from_input(
        input: MessageInput,
        created_at: DateTime<Utc>,
        origin_address: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: or_default(input.name, Self::DEFAULT_NAME),
            email: or_default(input.email, Self::DEFAULT_EMAIL),
            subject: or_default(input.subject, Self::DEFAULT_SUBJECT),
            body: or_default(input.body, Self::DEFAULT_BODY),
            created_at,
            read: false,
            origin_address: or_default(origin_address, UNKNOWN_ADDRESS),
        }
    }

    /// Case-insensitive substring match on name, email, subject and body.
    /// `needle` must already be lowercase.
    fn matches(&self, needle: &str) -> bool {
        [&self.name, &self.email, &self.subject, &self.body]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

fn or_default(value: Option<String>, fallback: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

/// The last `limit` messages, most recent first.
pub(crate) fn most_recent(messages: &[Message], limit: usize) -> Vec<Message> {
    messages.iter().rev().take(limit).cloned().collect()
}

/// Message slot of a [`MessageDb`].
#[derive(Clone, Copy)]
pub struct Messages<'a> {
    db: &'a MessageDb,
}

impl<'a> Messages<'a> {
    pub(crate) fn new(db: &'a MessageDb) -> Self {
        Self { db }
    }

    fn save(&self, messages: &[Message]) -> Result<()> {
        save_slot(self.db.store(), Slot::Messages, messages)
    }

    /// Store a new message and notify listeners.
    ///
    /// Nothing is written unless both the message and settings slots read
    /// cleanly.
    ///
    /// # Errors
    ///
    /// Returns an error if the message or settings slot cannot be accessed.
    pub fn add(&self, input: MessageInput) -> Result<Message> {
        let mut messages = self.list()?;
        let settings = self.db.settings().get()?;
        let message = Message::from_input(input, self.db.now(), self.db.resolve_address());

        messages.push(message.clone());
        self.save(&messages)?;
        tracing::debug!(id = %message.id, name = %message.name, "message added");

        self.db.emit(&StoreEvent::MessageAdded {
            message: &message,
            settings: &settings,
        });

        Ok(message)
    }

    /// All messages in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the message slot cannot be read.
    pub fn list(&self) -> Result<Vec<Message>> {
        Ok(load_slot(self.db.store(), Slot::Messages)?.unwrap_or_default())
    }

    /// Look up a message by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the message slot cannot be read.
    pub fn get(&self, id: Uuid) -> Result<Option<Message>> {
        Ok(self.list()?.into_iter().find(|m| m.id == id))
    }

    /// The last `limit` messages, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the message slot cannot be read.
    pub fn recent(&self, limit: usize) -> Result<Vec<Message>> {
        Ok(most_recent(&self.list()?, limit))
    }

    /// Mark one message as read. Returns `false` if no message has `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the message slot cannot be accessed.
    pub fn mark_read(&self, id: Uuid) -> Result<bool> {
        let mut messages = self.list()?;
        let Some(message) = messages.iter_mut().find(|m| m.id == id) else {
            return Ok(false);
        };
        message.read = true;
        self.save(&messages)?;
        Ok(true)
    }

    /// Mark every message as read.
    ///
    /// # Errors
    ///
    /// Returns an error if the message slot cannot be accessed.
    pub fn mark_all_read(&self) -> Result<()> {
        let mut messages = self.list()?;
        for message in &mut messages {
            message.read = true;
        }
        self.save(&messages)
    }

    /// Delete one message. Returns `false` if no message has `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the message slot cannot be accessed.
    pub fn delete(&self, id: Uuid) -> Result<bool> {
        let mut messages = self.list()?;
        let Some(index) = messages.iter().position(|m| m.id == id) else {
            return Ok(false);
        };
        messages.remove(index);
        self.save(&messages)?;
        Ok(true)
    }

    /// Delete every message.
    ///
    /// # Errors
    ///
    /// Returns an error if the message slot cannot be written.
    pub fn delete_all(&self) -> Result<()> {
        self.save(&[])
    }

    /// Number of unread messages.
    ///
    /// # Errors
    ///
    /// Returns an error if the message slot cannot be read.
    pub fn unread_count(&self) -> Result<usize> {
        Ok(self.list()?.iter().filter(|m| !m.read).count())
    }

    /// Messages whose name, email, subject or body contains `query`,
    /// ignoring case. Order is preserved; an empty query matches all.
    ///
    /// # Errors
    ///
    /// Returns an error if the message slot cannot be read.
    pub fn search(&self, query: &str) -> Result<Vec<Message>> {
        let needle = query.to_lowercase();
        Ok(self
            .list()?
            .into_iter()
            .filter(|m| m.matches(&needle))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::events::FixedResolver;
    use crate::error::Error;
    use crate::storage::{MemoryBackend, SlotStore};

    fn test_db() -> MessageDb {
        MessageDb::open(MemoryBackend::new())
            .unwrap()
            .with_resolver(FixedResolver(Some("10.0.0.55".to_string())))
    }

    fn input(name: &str, email: &str, subject: &str, body: &str) -> MessageInput {
        MessageInput {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            subject: Some(subject.to_string()),
            body: Some(body.to_string()),
        }
    }

    #[test]
    fn corrupt_settings_block_add_without_storing() {
        let db = test_db();
        db.store().write(Slot::Settings, "{ not json").unwrap();

        let result = db.messages().add(input("Alice", "a@x.com", "Hi", "Hello"));
        assert!(matches!(result, Err(Error::Serde(_))));
        assert!(db.messages().list().unwrap().is_empty());
    }

    #[test]
    fn from_input_applies_defaults() {
        let message = Message::from_input(MessageInput::default(), Utc::now(), None);
        assert_eq!(message.name, "Anonymous");
        assert_eq!(message.email, "No Email");
        assert_eq!(message.subject, "No Subject");
        assert_eq!(message.body, "No Message");
        assert_eq!(message.origin_address, "Unknown");
        assert!(!message.read);
    }

    #[test]
    fn from_input_treats_empty_strings_as_missing() {
        let message = Message::from_input(input("", "", "Hi", ""), Utc::now(), Some(String::new()));
        assert_eq!(message.name, "Anonymous");
        assert_eq!(message.email, "No Email");
        assert_eq!(message.subject, "Hi");
        assert_eq!(message.origin_address, "Unknown");
    }

    #[test]
    fn input_accepts_form_field_name() {
        let parsed: MessageInput =
            serde_json::from_str(r#"{"name":"Alice","message":"Hello"}"#).unwrap();
        assert_eq!(parsed.body.as_deref(), Some("Hello"));
        assert_eq!(parsed.email, None);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let message = Message::from_input(MessageInput::default(), Utc::now(), None);
        let json = serde_json::to_value(&message).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("originAddress").is_some());
        assert!(json.get("body").is_some());
    }

    #[test]
    fn rapid_ids_are_unique_and_ordered() {
        let now = Utc::now();
        let ids: Vec<Uuid> = (0..1000)
            .map(|_| Message::from_input(MessageInput::default(), now, None).id)
            .collect();

        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn add_then_get() {
        let db = test_db();
        let added = db
            .messages()
            .add(input("Alice", "a@x.com", "Hi", "Hello"))
            .unwrap();

        let fetched = db.messages().get(added.id).unwrap().unwrap();
        assert_eq!(fetched, added);
        assert_eq!(fetched.origin_address, "10.0.0.55");
        assert!(!fetched.read);
    }

    #[test]
    fn empty_store() {
        let db = test_db();
        assert!(db.messages().list().unwrap().is_empty());
        assert!(db.messages().recent(5).unwrap().is_empty());
        assert!(db.messages().search("x").unwrap().is_empty());
        assert_eq!(db.messages().unread_count().unwrap(), 0);
        assert!(db.messages().get(Uuid::nil()).unwrap().is_none());
    }

    #[test]
    fn alice_and_bob() {
        let db = test_db();
        let alice = db
            .messages()
            .add(input("Alice", "a@x.com", "Hi", "Hello"))
            .unwrap();
        db.messages()
            .add(input("Bob", "b@x.com", "Re", "World"))
            .unwrap();

        let recent = db.messages().recent(1).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].name, "Bob");
        assert_eq!(db.messages().unread_count().unwrap(), 2);

        assert!(db.messages().mark_read(alice.id).unwrap());
        assert_eq!(db.messages().unread_count().unwrap(), 1);
    }

    #[test]
    fn recent_is_most_recent_first() {
        let db = test_db();
        for name in ["a", "b", "c", "d"] {
            db.messages().add(input(name, "", "", "")).unwrap();
        }

        let names: Vec<String> = db
            .messages()
            .recent(3)
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, ["d", "c", "b"]);
        assert_eq!(db.messages().recent(10).unwrap().len(), 4);
    }

    #[test]
    fn mark_read_unknown_id() {
        let db = test_db();
        db.messages().add(MessageInput::default()).unwrap();
        assert!(!db.messages().mark_read(Uuid::nil()).unwrap());
        assert_eq!(db.messages().unread_count().unwrap(), 1);
    }

    #[test]
    fn mark_all_read_is_idempotent() {
        let db = test_db();
        db.messages().add(MessageInput::default()).unwrap();
        db.messages().add(MessageInput::default()).unwrap();

        db.messages().mark_all_read().unwrap();
        assert_eq!(db.messages().unread_count().unwrap(), 0);
        db.messages().mark_all_read().unwrap();
        assert_eq!(db.messages().unread_count().unwrap(), 0);
    }

    #[test]
    fn delete_removes_exactly_one() {
        let db = test_db();
        let first = db.messages().add(input("a", "", "", "")).unwrap();
        db.messages().add(input("b", "", "", "")).unwrap();

        assert!(db.messages().delete(first.id).unwrap());
        let remaining = db.messages().list().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].name, "b");
    }

    #[test]
    fn delete_unknown_id_leaves_collection_unchanged() {
        let db = test_db();
        db.messages().add(MessageInput::default()).unwrap();

        assert!(!db.messages().delete(Uuid::nil()).unwrap());
        assert_eq!(db.messages().list().unwrap().len(), 1);
    }

    #[test]
    fn delete_all_clears() {
        let db = test_db();
        db.messages().add(MessageInput::default()).unwrap();
        db.messages().delete_all().unwrap();
        assert!(db.messages().list().unwrap().is_empty());
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let db = test_db();
        db.messages()
            .add(input("Alice", "alice@example.com", "Hiring", "Are you free?"))
            .unwrap();
        db.messages()
            .add(input("Bob", "bob@x.com", "Hello", "Loved the PORTFOLIO"))
            .unwrap();

        let by_name = db.messages().search("ALICE").unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].name, "Alice");

        let by_body = db.messages().search("portfolio").unwrap();
        assert_eq!(by_body.len(), 1);
        assert_eq!(by_body[0].name, "Bob");

        let by_email = db.messages().search("example.com").unwrap();
        assert_eq!(by_email.len(), 1);

        assert!(db.messages().search("nothing here").unwrap().is_empty());
    }

    #[test]
    fn empty_search_returns_everything_in_order() {
        let db = test_db();
        db.messages().add(input("a", "", "", "")).unwrap();
        db.messages().add(input("b", "", "", "")).unwrap();

        let all = db.messages().search("").unwrap();
        assert_eq!(all, db.messages().list().unwrap());
    }
}
