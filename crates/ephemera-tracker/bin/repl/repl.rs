use ephemera_core::{Clock, Countdown, Record, RecordId};
use ephemera_gateway::Gateway;
use ephemera_storage::DurableStore;
use ephemera_tracker::Session;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::sleep;

const HELP: &str = "\
commands:
  shorten <url>        shorten a link and track it for 30 minutes
  list                 show tracked links with their countdown
  open <id>            count a click and print the short link
  copy <id>            print the short link without counting a click
  watch <id> [secs]    follow a link's countdown (default 10s)
  delete <id>          stop tracking a link
  help                 show this text
  quit                 exit";

const DEFAULT_WATCH_SECS: u64 = 10;

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Shorten(String),
    List,
    Open(String),
    Copy(String),
    Watch(String, u64),
    Delete(String),
    Help,
    Quit,
}

impl Command {
    fn parse(line: &str) -> Result<Option<Self>, String> {
        let mut parts = line.split_whitespace();
        let Some(verb) = parts.next() else {
            return Ok(None);
        };
        let mut arg = |name: &str| {
            parts
                .next()
                .map(str::to_string)
                .ok_or_else(|| format!("usage: {verb} <{name}>"))
        };

        let command = match verb {
            "shorten" | "s" => Command::Shorten(arg("url")?),
            "list" | "ls" => Command::List,
            "open" | "o" => Command::Open(arg("id")?),
            "copy" | "c" => Command::Copy(arg("id")?),
            "watch" | "w" => {
                let id = arg("id")?;
                let secs = match parts.next() {
                    Some(raw) => raw
                        .parse()
                        .map_err(|_| format!("not a number of seconds: {raw}"))?,
                    None => DEFAULT_WATCH_SECS,
                };
                Command::Watch(id, secs)
            }
            "delete" | "rm" => Command::Delete(arg("id")?),
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(format!("unknown command '{other}', try 'help'")),
        };
        Ok(Some(command))
    }
}

/// Finds the single record whose id starts with `prefix`.
fn resolve(records: &[Record], prefix: &str) -> Result<RecordId, String> {
    let mut matches = records
        .iter()
        .filter(|r| r.id().to_string().starts_with(prefix));
    match (matches.next(), matches.next()) {
        (Some(record), None) => Ok(record.id()),
        (None, _) => Err(format!("no link with id '{prefix}'")),
        (Some(_), Some(_)) => Err(format!("id '{prefix}' is ambiguous")),
    }
}

fn short_id(id: RecordId) -> String {
    id.to_string().chars().take(8).collect()
}

pub async fn run<S, G, C>(session: &Session<S, G, C>) -> anyhow::Result<()>
where
    S: DurableStore,
    G: Gateway,
    C: Clock,
{
    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };

        match command {
            Command::Shorten(url) => match session.shorten(&url).await {
                Ok(record) => println!("[{}] {}", short_id(record.id()), record.short_url()),
                Err(e) => println!("error: {e}"),
            },
            Command::List => list(session),
            Command::Open(prefix) => match resolve(&session.records(), &prefix) {
                Ok(id) => {
                    if let (Some(clicks), Some(record)) = (session.record_click(id), session.get(id)) {
                        println!("{} (clicks: {clicks})", record.short_url());
                    }
                }
                Err(message) => println!("{message}"),
            },
            Command::Copy(prefix) => match resolve(&session.records(), &prefix) {
                Ok(id) => {
                    if let Some(record) = session.get(id) {
                        println!("{}", record.short_url());
                    }
                }
                Err(message) => println!("{message}"),
            },
            Command::Watch(prefix, secs) => match resolve(&session.records(), &prefix) {
                Ok(id) => watch(session, id, Duration::from_secs(secs)).await,
                Err(message) => println!("{message}"),
            },
            Command::Delete(prefix) => match resolve(&session.records(), &prefix) {
                Ok(id) => {
                    session.delete(id);
                    println!("deleted {}", short_id(id));
                }
                Err(message) => println!("{message}"),
            },
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
        }
    }

    Ok(())
}

fn list<S, G, C>(session: &Session<S, G, C>)
where
    S: DurableStore,
    G: Gateway,
    C: Clock,
{
    let records = session.records();
    if records.is_empty() {
        println!("no links yet");
        return;
    }

    let now = session.now();
    for record in &records {
        println!(
            "[{}] {}  clicks: {}  {}\n           {}",
            short_id(record.id()),
            record.short_url(),
            record.click_count(),
            Countdown::new(record.expires_at(), now),
            record.original_url(),
        );
    }
}

async fn watch<S, G, C>(session: &Session<S, G, C>, id: RecordId, for_how_long: Duration)
where
    S: DurableStore,
    G: Gateway,
    C: Clock,
{
    let Some(mut countdown) = session.watch_countdown(id) else {
        println!("no link with that id");
        return;
    };

    println!("{}", countdown.text());
    let deadline = sleep(for_how_long);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            state = countdown.changed() => match state {
                Some(state) => println!("{state}"),
                None => break,
            },
        }
    }
}
