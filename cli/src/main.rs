//! Interactive terminal frontend for the todo service.
//!
//! Renders the list held by `TodoApp` and maps each typed command to one app
//! action. Every mutation is followed by a full refresh inside the app, so
//! what is printed is always the server's list, never a local guess.

mod command;
mod render;

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context};
use clap::Parser;
use todo_core::{Applied, TodoApp, TodoClient, Transport, UreqTransport};
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use command::{Command, HELP};
use render::render;

/// `todo` arguments.
#[derive(Debug, Parser)]
#[command(name = "todo", about = "Edit the shared todo list from a terminal", version)]
struct CliArgs {
    /// Base URL of the todo server.
    #[arg(
        long = "server-url",
        env = "TODO_SERVER_URL",
        default_value = "http://localhost:5000",
        value_name = "url"
    )]
    server_url: String,
}

fn main() -> anyhow::Result<()> {
    // stdout carries the rendered list; logs go to stderr.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = CliArgs::parse();
    let mut app = TodoApp::new(TodoClient::new(&args.server_url), UreqTransport::new());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = app.refresh() {
        warn!(error = %e, server = %args.server_url, "initial refresh failed");
        writeln!(out, "error: {e}")?;
    }
    write!(out, "{}", render(app.todos()))?;

    for line in io::stdin().lock().lines() {
        let line = line.context("reading stdin")?;
        let command = match command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(out, "{e}")?;
                continue;
            }
        };
        match run(&mut app, command) {
            Ok(Flow::Continue) => write!(out, "{}", render(app.todos()))?,
            Ok(Flow::Help) => writeln!(out, "{HELP}")?,
            Ok(Flow::Quit) => break,
            Err(e) => writeln!(out, "error: {e:#}")?,
        }
        out.flush()?;
    }
    Ok(())
}

enum Flow {
    Continue,
    Help,
    Quit,
}

fn run<T: Transport>(app: &mut TodoApp<T>, command: Command) -> anyhow::Result<Flow> {
    match command {
        Command::Add(text) => {
            app.set_input(text);
            if app.add()? == Applied::Skipped {
                bail!("nothing to add");
            }
        }
        Command::Toggle(n) => {
            let todo = at(app, n)?;
            app.toggle(&todo.id, todo.completed)?;
        }
        Command::Delete(n) => {
            let todo = at(app, n)?;
            app.delete(&todo.id)?;
        }
        Command::Refresh => app.refresh()?,
        Command::Help => return Ok(Flow::Help),
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

/// The todo shown at 1-based position `n` in the last render.
fn at<T: Transport>(app: &TodoApp<T>, n: usize) -> anyhow::Result<todo_core::Todo> {
    match app.todos().get(n - 1) {
        Some(todo) => Ok(todo.clone()),
        None => bail!("no item {n}; the list has {} item(s)", app.todos().len()),
    }
}
