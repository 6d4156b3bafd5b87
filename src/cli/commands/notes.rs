use clap::Subcommand;
use serde_json::{json, Map, Value};

use crate::cli::client::ApiClient;
use crate::cli::utils::{output_note, output_notes, output_success};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum NotesCommands {
    #[command(about = "List all notes, most recently updated first")]
    List,

    #[command(about = "Show a single note")]
    Get {
        #[arg(help = "Note id")]
        id: String,
    },

    #[command(about = "Create a note")]
    Create {
        #[arg(help = "Note title")]
        title: String,
        #[arg(long, help = "Note content")]
        content: Option<String>,
    },

    #[command(about = "Update a note's title and/or content")]
    Update {
        #[arg(help = "Note id")]
        id: String,
        #[arg(long, help = "New title")]
        title: Option<String>,
        #[arg(long, help = "New content")]
        content: Option<String>,
    },

    #[command(about = "Delete a note")]
    Delete {
        #[arg(help = "Note id")]
        id: String,
    },

    #[command(about = "Search notes by title or content")]
    Search {
        #[arg(help = "Search text")]
        query: String,
    },
}

pub async fn handle(cmd: NotesCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = ApiClient::from_config()?;
    client.require_token()?;

    match cmd {
        NotesCommands::List => {
            let envelope = client.get("/api/notes").await?;
            output_notes(&output_format, collection(&envelope))
        }
        NotesCommands::Get { id } => {
            let envelope = client.get(&format!("/api/notes/{}", id)).await?;
            output_note(
                &output_format,
                envelope.get("data").unwrap_or(&Value::Null),
            )
        }
        NotesCommands::Create { title, content } => {
            let mut body = Map::new();
            body.insert("title".to_string(), Value::String(title));
            if let Some(content) = content {
                body.insert("content".to_string(), Value::String(content));
            }

            let envelope = client.post("/api/notes", &Value::Object(body)).await?;
            let id = envelope
                .pointer("/data/id")
                .and_then(Value::as_str)
                .unwrap_or("-");
            output_success(
                &output_format,
                &format!("Note created: {}", id),
                envelope.get("data").cloned().map(|data| json!({ "data": data })),
            )
        }
        NotesCommands::Update { id, title, content } => {
            if title.is_none() && content.is_none() {
                anyhow::bail!("Nothing to update; pass --title and/or --content");
            }

            let mut body = Map::new();
            if let Some(title) = title {
                body.insert("title".to_string(), Value::String(title));
            }
            if let Some(content) = content {
                body.insert("content".to_string(), Value::String(content));
            }

            let envelope = client
                .put(&format!("/api/notes/{}", id), &Value::Object(body))
                .await?;
            output_success(
                &output_format,
                &format!("Note updated: {}", id),
                envelope.get("data").cloned().map(|data| json!({ "data": data })),
            )
        }
        NotesCommands::Delete { id } => {
            client.delete(&format!("/api/notes/{}", id)).await?;
            output_success(&output_format, &format!("Note deleted: {}", id), None)
        }
        NotesCommands::Search { query } => {
            let path = format!(
                "/api/notes/search?q={}",
                urlencode(&query)
            );
            let envelope = client.get(&path).await?;
            output_notes(&output_format, collection(&envelope))
        }
    }
}

fn collection(envelope: &Value) -> &[Value] {
    envelope
        .get("data")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Percent-encode a query value; reqwest does not encode path strings for us
fn urlencode(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urlencode_passes_safe_chars() {
        assert_eq!(urlencode("abc-123_.~"), "abc-123_.~");
    }

    #[test]
    fn urlencode_escapes_reserved_chars() {
        assert_eq!(urlencode("a b&c"), "a%20b%26c");
        assert_eq!(urlencode("100%"), "100%25");
    }
}
