mod api;
mod app;
mod command;
mod config;
mod dto;
mod render;

use std::io::Write;

use tokio::{
    io::{AsyncBufReadExt, BufReader, Lines, Stdin},
    time::{self, Instant, MissedTickBehavior},
};

use api::{HttpNotesApi, NotesBackend};
use app::{Confirm, NotesApp};
use command::Command;

/// Confirmation prompt that reads the answer from the terminal.
struct StdinPrompt<'a> {
    lines: &'a mut Lines<BufReader<Stdin>>,
}

impl Confirm for StdinPrompt<'_> {
    async fn confirm(&mut self, question: &str) -> bool {
        print!("{question} [y/N] ");
        let _ = std::io::stdout().flush();

        match self.lines.next_line().await {
            Ok(Some(answer)) => command::is_yes(&answer),
            _ => false,
        }
    }
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

fn show<B: NotesBackend>(app: &NotesApp<B>) {
    println!("\n{}\n", app.render());
}

/// Runs one command. Returns false when the user asked to quit.
async fn handle<B: NotesBackend>(
    app: &mut NotesApp<B>,
    lines: &mut Lines<BufReader<Stdin>>,
    line: &str,
) -> bool {
    let cmd = match Command::parse(line) {
        Ok(cmd) => cmd,
        Err(message) => {
            println!("{message}");
            return true;
        }
    };

    // request failures are reported through the app's flash message
    match cmd {
        Command::Quit => return false,
        Command::Help => {
            println!("{}", command::HELP);
            return true;
        }
        Command::Refresh => {
            let _ = app.load().await;
        }
        Command::Title(title) => app.form.title = title,
        Command::Content(content) => app.form.content = content,
        Command::Save => {
            let form = app.form.clone();
            let _ = app.submit(&form.title, &form.content).await;
        }
        Command::Add { title, content } => {
            app.form.title.clone_from(&title);
            app.form.content.clone_from(&content);
            let _ = app.submit(&title, &content).await;
        }
        Command::Edit(target) => {
            if !app.resolve(&target).is_some_and(|id| app.edit(&id)) {
                println!("No note matches '{target}'");
                return true;
            }
        }
        Command::Cancel => app.cancel(),
        Command::Delete(target) => {
            let Some(id) = app.resolve(&target) else {
                println!("No note matches '{target}'");
                return true;
            };
            let _ = app.remove(&id, &mut StdinPrompt { lines }).await;
        }
    }

    show(app);
    true
}

#[tokio::main]
async fn main() {
    // Log setup, kept off stdout so it does not interleave with the UI
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    // Load config
    let cfg = config::load_config().unwrap_or_else(|e| {
        tracing::error!("Failed to load client config: {e}");
        panic!("failed to load client config: {e}");
    });

    let api = HttpNotesApi::new(&cfg.api_url).unwrap_or_else(|e| {
        tracing::error!("Failed to create HTTP client: {e}");
        panic!("failed to create HTTP client: {e}");
    });
    println!("Using notes server at {}", cfg.api_url);

    let mut app = NotesApp::new(api);
    println!("{}", render::LOADING_MESSAGE);
    let _ = app.load().await;
    show(&app);
    println!("Type 'help' for a list of commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut refresh = time::interval_at(
        Instant::now() + cfg.refresh_interval,
        cfg.refresh_interval,
    );
    refresh.set_missed_tick_behavior(MissedTickBehavior::Delay);

    prompt();
    loop {
        tokio::select! {
            _ = refresh.tick() => {
                if app.refresh().await {
                    show(&app);
                    prompt();
                }
            }
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => {
                        if !handle(&mut app, &mut lines, &line).await {
                            break;
                        }
                        prompt();
                    }
                    Ok(None) => break,
                    Err(e) => {
                        tracing::error!("Failed to read input: {e}");
                        break;
                    }
                }
            }
        }
    }
}
