use serde_json::{json, Value};

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let Some(Value::Object(fields)) = data {
                response.as_object_mut().unwrap().extend(fields);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

/// Print a note list as a compact table (text) or raw envelope data (json)
pub fn output_notes(output_format: &OutputFormat, notes: &[Value]) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&Value::Array(notes.to_vec()))?);
        }
        OutputFormat::Text => {
            if notes.is_empty() {
                println!("No notes found");
                return Ok(());
            }
            for note in notes {
                let id = note.get("id").and_then(Value::as_str).unwrap_or("-");
                let title = note.get("title").and_then(Value::as_str).unwrap_or("-");
                let updated = note.get("updatedAt").and_then(Value::as_str).unwrap_or("-");
                println!("{}  {}  {}", id, updated, title);
            }
        }
    }
    Ok(())
}

/// Print a single note with its content
pub fn output_note(output_format: &OutputFormat, note: &Value) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(note)?);
        }
        OutputFormat::Text => {
            let title = note.get("title").and_then(Value::as_str).unwrap_or("-");
            let id = note.get("id").and_then(Value::as_str).unwrap_or("-");
            println!("{} ({})", title, id);
            if let Some(content) = note.get("content").and_then(Value::as_str) {
                if !content.is_empty() {
                    println!();
                    println!("{}", content);
                }
            }
        }
    }
    Ok(())
}
