//! Plain-text rendering of [`CatalogState`].

use std::fmt::Write;

use crate::state::{BookDraft, CatalogState, LoadPhase};

pub const HEADING: &str = "Library Book Management";

pub fn render(state: &CatalogState) -> String {
    match state.phase() {
        LoadPhase::Loading => return "Loading...\n".to_string(),
        LoadPhase::Errored => {
            let message = state.error().unwrap_or_default();
            return format!("Error: {message}\n");
        }
        LoadPhase::Idle | LoadPhase::Loaded => {}
    }

    let mut out = String::new();
    let _ = writeln!(out, "{HEADING}");

    let draft = state.draft();
    if draft != &BookDraft::default() {
        let _ = writeln!(out, "  new: {}", buffer_line(draft));
    }

    if state.books().is_empty() {
        let _ = writeln!(out, "  (no books yet)");
        return out;
    }

    let editing = state.editing();
    for (index, book) in state.books().iter().enumerate() {
        let position = index + 1;
        match editing.filter(|session| session.id == book.id) {
            Some(session) => {
                let _ = writeln!(
                    out,
                    "> {position}. {} [editing]",
                    buffer_line(&session.buffer)
                );
            }
            None => {
                let _ = writeln!(
                    out,
                    "  {position}. {} - {} ({})",
                    book.title, book.author, book.category
                );
            }
        }
    }

    out
}

fn buffer_line(buffer: &BookDraft) -> String {
    format!(
        "title: {:?} | author: {:?} | category: {:?}",
        buffer.title, buffer.author, buffer.category
    )
}
