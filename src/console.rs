//! Interactive terminal front end.
//!
//! Free text is sent to the agent as a new turn. Slash commands show the
//! stored list, the email queue and the tool invocation log:
//!
//! ```text
//! /list
//! /emails
//! /logs [days=N] [tool=NAME] [per_page=10|25|50|100] [page=N]
//! /history   /clear   /help   /quit
//! ```

use std::str::FromStr;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::agent::Agent;
use crate::llm::Role;
use crate::session::ConversationSession;
use crate::store::{ListItem, LogQuery, QueuedEmail, Store, ToolInvocationRecord};

const HELP: &str = "\
Type a message to chat with the agent, or use a command:
  /list                  show list items
  /emails                show queued emails
  /logs [days=N] [tool=NAME] [per_page=N] [page=N]
                         show tool execution logs
  /history               show this conversation
  /clear                 clear the conversation
  /help                  show this help
  /quit                  exit";

/// A parsed line of input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Chat(String),
    List,
    Emails,
    Logs(LogQuery),
    History,
    Clear,
    Help,
    Quit,
    Empty,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Self::Empty);
        }
        let Some(rest) = line.strip_prefix('/') else {
            return Ok(Self::Chat(line.to_string()));
        };

        let mut parts = rest.split_whitespace();
        let name = parts.next().unwrap_or_default();
        match name {
            "list" => Ok(Self::List),
            "emails" => Ok(Self::Emails),
            "logs" => parse_log_query(parts).map(Self::Logs),
            "history" => Ok(Self::History),
            "clear" => Ok(Self::Clear),
            "help" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(format!("Unknown command: /{}", other)),
        }
    }
}

fn parse_log_query<'a>(args: impl Iterator<Item = &'a str>) -> Result<LogQuery, String> {
    let mut query = LogQuery::default();
    for arg in args {
        let (key, value) = arg
            .split_once('=')
            .ok_or_else(|| format!("Expected key=value, got '{}'", arg))?;
        match key {
            "days" => query.days = parse_number(key, value)?,
            "tool" => query.tool_filter = Some(value.to_string()),
            "per_page" => query.per_page = parse_number(key, value)?,
            "page" => query.page = parse_number(key, value)?,
            other => return Err(format!("Unknown filter '{}'", other)),
        }
    }
    Ok(query)
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("'{}' expects a number in range, got '{}'", key, value))
}

pub fn render_list(items: &[ListItem]) -> String {
    if items.is_empty() {
        return "No items in the list yet.".to_string();
    }
    items
        .iter()
        .map(|i| format!("{:>4}  {}  {}", i.id, i.created_at, i.item))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_emails(emails: &[QueuedEmail]) -> String {
    if emails.is_empty() {
        return "No emails queued.".to_string();
    }
    emails
        .iter()
        .map(|e| {
            format!(
                "{:>4}  {}  [{}]  to: {}  subject: {}\n      {}",
                e.id, e.created_at, e.status, e.recipient, e.subject, e.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_logs(records: &[ToolInvocationRecord]) -> String {
    if records.is_empty() {
        return "No logs found matching the criteria.".to_string();
    }
    records
        .iter()
        .map(|r| {
            format!(
                "{}  {:<20} {:>8.3}s  in: {}  out: {}",
                r.timestamp, r.tool_name, r.execution_time, r.input_params, r.output_result
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_history(session: &ConversationSession) -> String {
    if session.is_empty() {
        return "(no messages yet)".to_string();
    }
    session
        .messages()
        .iter()
        .map(|m| {
            let who = match m.role {
                Role::User => "User",
                Role::Assistant => "Assistant",
                Role::Tool => "Tool",
            };
            format!("{}: {}", who, m.text())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Read-eval-print loop over stdin/stdout. Returns on `/quit` or end of input.
pub async fn run(agent: Agent, store: Arc<Store>) -> anyhow::Result<()> {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut session = ConversationSession::new();

    if agent.tools().is_empty() {
        tracing::warn!("No tools registered; the agent can only answer directly");
    }
    stdout
        .write_all(format!("Tool Agent ({} tools). /help for commands.\n", agent.tools().len()).as_bytes())
        .await?;

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let output = match Command::parse(&line) {
            Ok(Command::Empty) => continue,
            Ok(Command::Quit) => break,
            Ok(Command::Help) => HELP.to_string(),
            Ok(Command::Clear) => {
                session.clear();
                "Conversation cleared.".to_string()
            }
            Ok(Command::History) => render_history(&session),
            Ok(Command::List) => render_or_error(store.list_items().map(|i| render_list(&i))),
            Ok(Command::Emails) => render_or_error(store.emails().map(|e| render_emails(&e))),
            Ok(Command::Logs(query)) => {
                render_or_error(store.invocations(&query).map(|r| render_logs(&r)))
            }
            Ok(Command::Chat(text)) => match session.submit(&agent, &text).await {
                Ok(reply) => format!("Assistant: {}", reply.text()),
                Err(e) => {
                    tracing::error!("Turn failed: {}", e);
                    format!("Error: {}", e)
                }
            },
            Err(message) => message,
        };

        stdout.write_all(output.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
    }

    Ok(())
}

fn render_or_error<E: std::fmt::Display>(result: Result<String, E>) -> String {
    result.unwrap_or_else(|e| format!("Error: {}", e))
}
