//! Interactive catalog editor on top of [`CatalogApp`].

use anyhow::Context;
use libris_client::{view, BookGateway, CatalogApp, Field};
use rustyline::error::ReadlineError;

const PROMPT: &str = "libris> ";

const HELP: &str = "\
commands:
  list                     reload the catalog
  new <field> <value>      fill the new-book form (title, author, category)
  add                      submit the new-book form
  edit <n>                 start editing book number <n>
  set <field> <value>      change the edit buffer
  save                     submit the edit buffer
  cancel                   discard the edit buffer
  delete <n>               delete book number <n>
  dismiss                  clear the error and show the list again
  help                     show this text
  quit                     leave the shell";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    List,
    New(Field, String),
    Add,
    Edit(usize),
    Set(Field, String),
    Save,
    Cancel,
    Delete(usize),
    Dismiss,
    Help,
    Quit,
}

impl ShellCommand {
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "list" | "reload" => ShellCommand::List,
            "new" => {
                let (field, value) = field_and_value(rest)?;
                ShellCommand::New(field, value)
            }
            "add" => ShellCommand::Add,
            "edit" => ShellCommand::Edit(position(rest)?),
            "set" => {
                let (field, value) = field_and_value(rest)?;
                ShellCommand::Set(field, value)
            }
            "save" => ShellCommand::Save,
            "cancel" => ShellCommand::Cancel,
            "delete" | "rm" => ShellCommand::Delete(position(rest)?),
            "dismiss" => ShellCommand::Dismiss,
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" => ShellCommand::Quit,
            other => return Err(format!("unknown command '{other}'; try 'help'")),
        };

        Ok(Some(command))
    }
}

fn field_and_value(rest: &str) -> Result<(Field, String), String> {
    let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    if field.is_empty() {
        return Err("expected <field> <value>".to_string());
    }
    Ok((field.parse()?, value.to_string()))
}

fn position(rest: &str) -> Result<usize, String> {
    rest.parse::<usize>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| format!("expected a book number, got '{rest}'"))
}

/// Apply one command. Returns false when the shell should exit.
pub async fn execute<G: BookGateway>(app: &mut CatalogApp<G>, command: ShellCommand) -> bool {
    match command {
        ShellCommand::List => {
            app.load().await;
        }
        ShellCommand::New(field, value) => app.state_mut().set_draft_field(field, value),
        ShellCommand::Add => {
            if !app.state().draft().is_complete() {
                println!("fill in title, author and category first");
            } else {
                app.add().await;
            }
        }
        ShellCommand::Edit(n) => match app.state().book_at(n).map(|book| book.id) {
            Some(id) => {
                app.state_mut().begin_edit(id);
            }
            None => println!("no book number {n}"),
        },
        ShellCommand::Set(field, value) => {
            if !app.state_mut().set_edit_field(field, value) {
                println!("nothing is being edited; use 'edit <n>' first");
            }
        }
        ShellCommand::Save => {
            if app.state().editing().is_none() {
                println!("nothing is being edited");
            } else {
                app.save_edit().await;
            }
        }
        ShellCommand::Cancel => app.state_mut().cancel_edit(),
        ShellCommand::Delete(n) => match app.state().book_at(n).map(|book| book.id) {
            Some(id) => {
                app.delete(id).await;
            }
            None => println!("no book number {n}"),
        },
        ShellCommand::Dismiss => app.state_mut().dismiss_error(),
        ShellCommand::Help => {
            println!("{HELP}");
            return true;
        }
        ShellCommand::Quit => return false,
    }

    print!("{}", view::render(app.state()));
    true
}

pub async fn run<G: BookGateway>(mut app: CatalogApp<G>) -> anyhow::Result<()> {
    let mut editor = rustyline::DefaultEditor::new().context("failed to start line editor")?;

    app.load().await;
    print!("{}", view::render(app.state()));
    println!("type 'help' for commands");

    loop {
        let line = match editor.readline(PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(err) => return Err(err).context("failed to read input"),
        };

        match ShellCommand::parse(&line) {
            Ok(None) => {}
            Ok(Some(command)) => {
                if let Err(err) = editor.add_history_entry(line.as_str()) {
                    tracing::debug!(error = %err, "failed to record shell history");
                }
                if !execute(&mut app, command).await {
                    break;
                }
            }
            Err(message) => println!("{message}"),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(ShellCommand::parse("   ").unwrap(), None);
        assert_eq!(ShellCommand::parse("LIST").unwrap(), Some(ShellCommand::List));
        assert_eq!(
            ShellCommand::parse("new title The Left Hand of Darkness").unwrap(),
            Some(ShellCommand::New(
                Field::Title,
                "The Left Hand of Darkness".to_string()
            ))
        );
        assert_eq!(
            ShellCommand::parse("set category").unwrap(),
            Some(ShellCommand::Set(Field::Category, String::new()))
        );
        assert_eq!(ShellCommand::parse("edit 2").unwrap(), Some(ShellCommand::Edit(2)));
        assert_eq!(ShellCommand::parse("rm 1").unwrap(), Some(ShellCommand::Delete(1)));
        assert_eq!(ShellCommand::parse("exit").unwrap(), Some(ShellCommand::Quit));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(ShellCommand::parse("edit zero").is_err());
        assert!(ShellCommand::parse("delete 0").is_err());
        assert!(ShellCommand::parse("set isbn 123").is_err());
        assert!(ShellCommand::parse("new").is_err());
        assert!(ShellCommand::parse("fly").is_err());
    }
}
