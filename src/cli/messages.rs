//! `folio submit|list|show|read|delete|search` command implementations.

use crate::cli::{parse_id, preview};
use crate::core::format::format_relative;
use crate::core::{Message, MessageDb, MessageInput};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};

/// Maximum length for subject previews.
const SUBJECT_PREVIEW_LEN: usize = 30;

/// Run the submit command: store a message as the contact form would.
///
/// # Errors
///
/// Returns an error if the storage backend fails.
pub fn submit(db: &MessageDb, input: MessageInput) -> Result<()> {
    let message = db.messages().add(input)?;
    println!("Stored message {} from {}", message.id, message.name);
    Ok(())
}

/// Run the list command.
///
/// Shows the newest messages first. `limit` defaults to the
/// `itemsPerPage` setting.
///
/// # Errors
///
/// Returns an error if the storage backend fails.
pub fn list(db: &MessageDb, unread_only: bool, limit: Option<usize>) -> Result<()> {
    let limit = match limit {
        Some(limit) => limit,
        None => usize::try_from(db.settings().get()?.items_per_page()).unwrap_or(usize::MAX),
    };

    let mut messages = db.messages().recent(usize::MAX)?;
    if unread_only {
        messages.retain(|m| !m.read);
    }
    let total = messages.len();
    messages.truncate(limit);

    if messages.is_empty() {
        println!("No messages found.");
        return Ok(());
    }

    print!("{}", render_table(&messages, db.now()));
    println!(
        "Showing {} of {total} message(s), {} unread",
        messages.len(),
        db.messages().unread_count()?
    );
    Ok(())
}

/// Run the show command: print one message in full.
///
/// # Errors
///
/// Returns an error if the id is invalid, unknown, or storage fails.
pub fn show(db: &MessageDb, id: &str) -> Result<()> {
    let id = parse_id(id)?;
    let message = db
        .messages()
        .get(id)?
        .ok_or_else(|| Error::MessageNotFound(id.to_string()))?;

    print!("{}", render_message(&message, db.now()));
    Ok(())
}

/// Run the read command: mark one message, or all of them, as read.
///
/// # Errors
///
/// Returns an error if the id is invalid, unknown, or storage fails.
pub fn read(db: &MessageDb, id: Option<&str>, all: bool) -> Result<()> {
    if all {
        db.messages().mark_all_read()?;
        println!("Marked all messages as read.");
        return Ok(());
    }

    let id = require_id(id)?;
    if !db.messages().mark_read(id)? {
        return Err(Error::MessageNotFound(id.to_string()));
    }
    println!("Marked {id} as read.");
    Ok(())
}

/// Run the delete command: remove one message, or all of them.
///
/// # Errors
///
/// Returns an error if the id is invalid, unknown, or storage fails.
pub fn delete(db: &MessageDb, id: Option<&str>, all: bool) -> Result<()> {
    if all {
        let count = db.messages().list()?.len();
        db.messages().delete_all()?;
        println!("Deleted {count} message(s).");
        return Ok(());
    }

    let id = require_id(id)?;
    if !db.messages().delete(id)? {
        return Err(Error::MessageNotFound(id.to_string()));
    }
    println!("Deleted {id}.");
    Ok(())
}

/// Run the search command.
///
/// # Errors
///
/// Returns an error if the storage backend fails.
pub fn search(db: &MessageDb, query: &str) -> Result<()> {
    let matches = db.messages().search(query)?;
    if matches.is_empty() {
        println!("No messages match \"{query}\".");
        return Ok(());
    }

    print!("{}", render_table(&matches, db.now()));
    println!("{} match(es)", matches.len());
    Ok(())
}

fn require_id(id: Option<&str>) -> Result<uuid::Uuid> {
    id.map_or_else(
        || Err(Error::InvalidArgument("a message id or --all is required".to_string())),
        parse_id,
    )
}

/// Render messages as a fixed-width table.
fn render_table(messages: &[Message], now: DateTime<Utc>) -> String {
    let rule = "─".repeat(100);
    let mut lines = vec![
        format!("  {:<36} {:<16} {:<20} Subject", "ID", "Received", "From"),
        rule.clone(),
    ];

    lines.extend(messages.iter().map(|message| {
        let marker = if message.read { ' ' } else { '*' };
        format!(
            "{marker} {:<36} {:<16} {:<20} {}",
            message.id,
            format_relative(message.created_at, now),
            preview(&message.name, 20),
            preview(&message.subject, SUBJECT_PREVIEW_LEN),
        )
    }));

    lines.push(rule);
    lines.join("\n") + "\n"
}

/// Render one message with headers.
fn render_message(message: &Message, now: DateTime<Utc>) -> String {
    let status = if message.read { "read" } else { "unread" };
    format!(
        "ID:       {}\nFrom:     {} <{}>\nSubject:  {}\nReceived: {} ({})\nOrigin:   {}\nStatus:   {status}\n\n{}\n",
        message.id,
        message.name,
        message.email,
        message.subject,
        message.created_at.to_rfc3339(),
        format_relative(message.created_at, now),
        message.origin_address,
        message.body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FixedResolver;
    use crate::storage::MemoryBackend;

    fn test_db() -> MessageDb {
        MessageDb::open(MemoryBackend::new())
            .unwrap()
            .with_resolver(FixedResolver(None))
    }

    fn add(db: &MessageDb, name: &str, subject: &str) -> Message {
        db.messages()
            .add(MessageInput {
                name: Some(name.to_string()),
                subject: Some(subject.to_string()),
                ..Default::default()
            })
            .unwrap()
    }

    #[test]
    fn table_marks_unread_rows() {
        let db = test_db();
        let alice = add(&db, "Alice", "Hi");
        add(&db, "Bob", "Re");
        db.messages().mark_read(alice.id).unwrap();

        let table = render_table(&db.messages().list().unwrap(), db.now());
        let rows: Vec<&str> = table.lines().filter(|l| l.contains("Today")).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("  ") && rows[0].contains("Alice"));
        assert!(rows[1].starts_with("* ") && rows[1].contains("Bob"));
    }

    #[test]
    fn message_rendering_includes_headers_and_body() {
        let db = test_db();
        let message = db
            .messages()
            .add(MessageInput {
                name: Some("Alice".to_string()),
                email: Some("a@x.com".to_string()),
                body: Some("Hello there".to_string()),
                ..Default::default()
            })
            .unwrap();

        let text = render_message(&message, db.now());
        assert!(text.contains("From:     Alice <a@x.com>"));
        assert!(text.contains("Subject:  No Subject"));
        assert!(text.contains("Origin:   Unknown"));
        assert!(text.contains("Status:   unread"));
        assert!(text.ends_with("Hello there\n"));
    }

    #[test]
    fn read_unknown_id_is_not_found() {
        let db = test_db();
        let result = read(&db, Some(&uuid::Uuid::now_v7().to_string()), false);
        assert!(matches!(result, Err(Error::MessageNotFound(_))));
    }

    #[test]
    fn read_without_id_or_all_is_invalid() {
        let db = test_db();
        assert!(matches!(
            read(&db, None, false),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            delete(&db, None, false),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn read_all_clears_unread() {
        let db = test_db();
        add(&db, "a", "");
        add(&db, "b", "");

        read(&db, None, true).unwrap();
        assert_eq!(db.messages().unread_count().unwrap(), 0);
    }

    #[test]
    fn delete_by_id() {
        let db = test_db();
        let message = add(&db, "a", "");

        delete(&db, Some(&message.id.to_string()), false).unwrap();
        assert!(db.messages().list().unwrap().is_empty());

        let again = delete(&db, Some(&message.id.to_string()), false);
        assert!(matches!(again, Err(Error::MessageNotFound(_))));
    }

    #[test]
    fn show_unknown_id_is_not_found() {
        let db = test_db();
        let result = show(&db, &uuid::Uuid::now_v7().to_string());
        assert!(matches!(result, Err(Error::MessageNotFound(_))));
    }
}
