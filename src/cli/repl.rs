//! Line-oriented chat front end.

use std::io::{self, Write};
use std::path::PathBuf;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::core::image::load_image;
use crate::core::prompt::{QUICK_PROMPTS, Subject};
use crate::core::{ChatSession, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplInput {
    Message(String),
    New,
    Image(PathBuf),
    Subjects,
    Subject(String),
    Prompts,
    Prompt(usize),
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl ReplInput {
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }
        let Some(command) = line.strip_prefix('/') else {
            return Self::Message(line.to_string());
        };

        let (name, arg) = command
            .split_once(char::is_whitespace)
            .map_or((command, ""), |(n, a)| (n, a.trim()));

        match (name, arg) {
            ("quit" | "exit" | "q", _) => Self::Quit,
            ("new" | "reset", _) => Self::New,
            ("help", _) => Self::Help,
            ("subjects", _) => Self::Subjects,
            ("prompts", _) => Self::Prompts,
            ("image", path) if !path.is_empty() => Self::Image(PathBuf::from(path)),
            ("subject", subject) if !subject.is_empty() => Self::Subject(subject.to_string()),
            ("prompt", n) => n
                .parse::<usize>()
                .ok()
                .filter(|n| (1..=QUICK_PROMPTS.len()).contains(n))
                .map_or_else(|| Self::Unknown(line.to_string()), Self::Prompt),
            _ => Self::Unknown(line.to_string()),
        }
    }
}

const HELP: &str = "Commands:
  /new             start a new conversation
  /image <path>    attach an image to the next question
  /subjects        list subjects
  /subject <name>  ask the starter question for a subject
  /prompts         list quick prompts
  /prompt <n>      send quick prompt n
  /quit            exit";

fn print_welcome(backend: &str) {
    println!("StudyMate AI - your exam preparation assistant ({backend})");
    println!("Ask a question, or pick a subject with /subject <name>.");
    println!("Type /help for commands.\n");
}

fn print_subjects() {
    for subject in Subject::ALL {
        println!("  {subject}");
    }
}

fn print_prompts() {
    for (i, prompt) in QUICK_PROMPTS.iter().enumerate() {
        println!("  {}. {prompt}", i + 1);
    }
}

fn print_delta(out: &mut impl Write, delta: &str) {
    if let Err(e) = write!(out, "{delta}").and_then(|()| out.flush()) {
        tracing::trace!(error = %e, "Could not write reply text");
    }
}

/// Sends one turn and prints the reply as it streams in.
pub async fn ask(session: &mut ChatSession, text: &str, images: Vec<String>) -> Result<()> {
    let mut stdout = io::stdout();
    let result = session
        .submit(text, images, |delta| print_delta(&mut stdout, delta))
        .await;
    println!();
    result.map(|_| ())
}

pub async fn run_repl(session: &mut ChatSession) -> Result<()> {
    print_welcome(session.backend_name());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending_images: Vec<String> = Vec::new();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let text = match ReplInput::parse(&line) {
            ReplInput::Empty => continue,
            ReplInput::Quit => break,
            ReplInput::Help => {
                println!("{HELP}");
                continue;
            }
            ReplInput::New => {
                session.reset();
                pending_images.clear();
                println!("Started a new conversation.");
                continue;
            }
            ReplInput::Subjects => {
                print_subjects();
                continue;
            }
            ReplInput::Prompts => {
                print_prompts();
                continue;
            }
            ReplInput::Image(path) => {
                match load_image(&path) {
                    Ok(url) => {
                        pending_images.push(url);
                        println!(
                            "Attached {} ({} pending)",
                            path.display(),
                            pending_images.len()
                        );
                    }
                    Err(e) => eprintln!("Error: {e}"),
                }
                continue;
            }
            ReplInput::Subject(name) => match name.parse::<Subject>() {
                Ok(subject) => subject.starter_prompt(),
                Err(e) => {
                    eprintln!("Error: {e}");
                    continue;
                }
            },
            ReplInput::Prompt(n) => QUICK_PROMPTS[n - 1].to_string(),
            ReplInput::Message(text) => text,
            ReplInput::Unknown(input) => {
                eprintln!("Unknown command: {input}. Type /help for commands.");
                continue;
            }
        };

        let images = std::mem::take(&mut pending_images);
        if let Err(e) = ask(session, &text, images).await {
            eprintln!("Error: {e}");
        }
    }

    tracing::debug!(turns = session.conversation().len(), "Leaving chat");
    Ok(())
}
