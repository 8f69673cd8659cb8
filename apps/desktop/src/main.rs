mod config;

use std::{path::PathBuf, str::FromStr, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{HttpSowBackend, SowForm, SowFormField, SowSession};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::debug;

#[derive(Parser, Debug)]
struct Args {
    /// SOW backend base URL (overrides sow.toml and environment).
    #[arg(long)]
    server_url: Option<String>,
    /// TOML file with initial form field values (camelCase keys).
    #[arg(long)]
    form: Option<PathBuf>,
    /// Directory where downloaded documents are written.
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Start from the built-in boilerplate form instead of an empty one.
    #[arg(long)]
    boilerplate: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();
    let args = Args::parse();

    let mut settings = config::load_settings();
    if let Some(url) = args.server_url {
        settings.server_url = url;
    }
    if let Some(dir) = args.output_dir {
        settings.output_dir = dir;
    }

    let backend = HttpSowBackend::new(&settings.server_url)
        .with_context(|| format!("invalid server url {}", settings.server_url))?;
    let session = SowSession::new(Arc::new(backend));

    if args.boilerplate {
        session.replace_form(SowForm::boilerplate()).await;
    }
    if let Some(path) = &args.form {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading form file {}", path.display()))?;
        let form: SowForm =
            toml::from_str(&raw).with_context(|| format!("parsing form file {}", path.display()))?;
        session.replace_form(form).await;
    }

    {
        let mut events = session.subscribe_events();
        tokio::spawn(async move {
            while let Ok(event) = events.recv().await {
                debug!(?event, "session event");
            }
        });
    }

    println!("Connected to {}. Type 'help' for commands.", settings.server_url);
    repl(session, settings.output_dir).await
}

async fn repl(session: Arc<SowSession>, output_dir: PathBuf) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (command, rest) = match line.split_once(' ') {
            Some((c, r)) => (c, r.trim()),
            None => (line, ""),
        };

        match command {
            "help" => print_help(),
            "quit" | "exit" => break,
            "state" => println!("{:?}", session.state().await),
            "form" => {
                let form = session.form().await;
                for field in SowFormField::ALL {
                    println!("{field}: {}", form.field(field));
                }
            }
            "fields" => {
                for field in SowFormField::ALL {
                    println!("{field}");
                }
            }
            "set" => match rest.split_once(' ') {
                Some((name, value)) => match SowFormField::from_str(name) {
                    Ok(field) => session.set_field(field, value).await,
                    Err(err) => eprintln!("{err}"),
                },
                None => eprintln!("usage: set <field> <value>"),
            },
            "show" => match session.displayed_content().await {
                Some(content) => println!("{content}"),
                None => println!("no document yet; run 'generate' first"),
            },
            "generate" => match session.generate().await {
                Ok(_) => println!("document generated; 'show' to view"),
                Err(err) => eprintln!("{err}"),
            },
            "chat" => match session.send_chat(rest).await {
                Ok(_) => println!("document updated; 'show' to view"),
                Err(err) => eprintln!("{err}"),
            },
            "like" => match session.like().await {
                Ok(()) => println!("liked"),
                Err(err) => eprintln!("{err}"),
            },
            "download" => match session.save_rendered_document(&output_dir).await {
                Ok(path) => println!("saved {}", path.display()),
                Err(err) => eprintln!("{err}"),
            },
            "transcript" => {
                for entry in session.transcript().await {
                    println!("[{:?}] {}", entry.role, entry.content);
                }
            }
            other => eprintln!("unknown command '{other}'; type 'help'"),
        }
    }

    Ok(())
}

fn print_help() {
    println!("commands:");
    println!("  form                 print all form fields");
    println!("  fields               list settable field names");
    println!("  set <field> <value>  set a form field");
    println!("  generate             generate a document from the form");
    println!("  chat <message>       refine the current document");
    println!("  show                 print the current document");
    println!("  like                 record approval of the current document");
    println!("  download             save the rendered .docx");
    println!("  transcript           print the refinement conversation");
    println!("  state                print the session state");
    println!("  quit                 exit");
}
