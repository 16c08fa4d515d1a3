//! Worklog CLI - Command line interface for the worklog service.

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

use worklog_client::WorklogClient;
use worklog_core::{
    CompletionView, Log, LogId, LogQuery, LogUpdate, Lookback, NewLog, Priority, SortField,
    SortOrder, TaskStatus, TaskType,
};

/// Worklog CLI - track tasks, bugs and stories
#[derive(Parser)]
#[command(name = "worklog")]
#[command(about = "CLI for the worklog service", long_about = None)]
struct Cli {
    /// Service address
    #[arg(short, long, env = "WORKLOG_ADDR", default_value = "http://127.0.0.1:8080")]
    addr: String,

    /// Print raw JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the service is up
    Ping,

    /// List logs
    List {
        /// Search terms matched against task name and notes
        #[arg(short, long)]
        search: Option<String>,

        /// Column to sort by
        #[arg(long, default_value = "updatedAt")]
        sort_by: SortField,

        /// asc or desc
        #[arg(long, default_value = "desc")]
        order: SortOrder,

        /// Page size
        #[arg(short, long, default_value_t = 10)]
        limit: u32,

        /// Zero-based page number
        #[arg(short, long, default_value_t = 0)]
        page: u32,
    },

    /// Show one log
    Get {
        /// Log ID
        id: String,
    },

    /// Create a new log
    Create {
        /// Task name, unique across logs
        #[arg(short, long)]
        name: String,

        /// task, bug or story
        #[arg(short = 't', long = "type", default_value = "task")]
        task_type: TaskType,

        /// backlog, pending, progress, pr or staging
        #[arg(short, long, default_value = "backlog")]
        status: TaskStatus,

        /// 1, 5, 7 or 10
        #[arg(long, value_parser = parse_priority)]
        priority: Option<Priority>,

        #[arg(long)]
        notes: Option<String>,

        /// RFC 3339 timestamp
        #[arg(long)]
        started_at: Option<DateTime<Utc>>,

        /// RFC 3339 timestamp
        #[arg(long)]
        completed_at: Option<DateTime<Utc>>,
    },

    /// Update fields of a log
    Update {
        /// Log ID
        id: String,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short = 't', long = "type")]
        task_type: Option<TaskType>,

        #[arg(short, long)]
        status: Option<TaskStatus>,

        #[arg(long, value_parser = parse_priority)]
        priority: Option<Priority>,

        #[arg(long)]
        notes: Option<String>,

        #[arg(long)]
        started_at: Option<DateTime<Utc>>,

        #[arg(long)]
        completed_at: Option<DateTime<Utc>>,
    },

    /// Delete one or more logs
    Delete {
        /// Log IDs
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Count and share of logs per status
    #[command(name = "status-summary")]
    StatusSummary,

    /// Count and share of logs per type
    #[command(name = "type-summary")]
    TypeSummary,

    /// Logs created per day
    #[command(name = "daily-count")]
    DailyCount,

    /// Completed logs per week or month
    #[command(name = "completed-count")]
    CompletedCount {
        /// week or month
        #[arg(short, long, default_value = "week")]
        view: CompletionView,

        /// How far back to look, e.g. "3 months"
        #[arg(short, long, default_value = "1 month")]
        duration: Lookback,
    },

    /// Headline totals
    Summary,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = WorklogClient::new(&cli.addr);
    let json = cli.json;

    match cli.command {
        Commands::Ping => {
            if client.ping().await? {
                println!("pong");
            } else {
                return Err(format!("{} did not answer pong", client.base_url()).into());
            }
        }
        Commands::List {
            search,
            sort_by,
            order,
            limit,
            page,
        } => {
            let mut query = LogQuery::default().sorted(sort_by, order).paged(limit, page);
            if let Some(search) = search {
                query = query.with_search(search);
            }
            list_logs(&client, &query, json).await?;
        }
        Commands::Get { id } => {
            let log = client.get(&LogId::new(id)).await?;
            show_log(&log, json)?;
        }
        Commands::Create {
            name,
            task_type,
            status,
            priority,
            notes,
            started_at,
            completed_at,
        } => {
            let mut draft = NewLog::new(name, task_type, status);
            draft.priority = priority.map(i64::from);
            draft.notes = notes;
            draft.started_at = started_at;
            draft.completed_at = completed_at;

            let log = client.create(&draft).await?;
            if !json {
                println!("Log created:");
            }
            show_log(&log, json)?;
        }
        Commands::Update {
            id,
            name,
            task_type,
            status,
            priority,
            notes,
            started_at,
            completed_at,
        } => {
            let mut update = LogUpdate::new(id);
            update.task_name = name;
            update.task_type = task_type.map(|t| t.to_string());
            update.task_status = status.map(|s| s.to_string());
            update.priority = priority.map(i64::from);
            update.notes = notes;
            update.started_at = started_at;
            update.completed_at = completed_at;

            let log = client.update(&update).await?;
            if !json {
                println!("Log updated:");
            }
            show_log(&log, json)?;
        }
        Commands::Delete { ids } => {
            let ids: Vec<LogId> = ids.into_iter().map(LogId::new).collect();
            if let [id] = ids.as_slice() {
                client.delete(id).await?;
                println!("Deleted {id}");
            } else {
                let count = client.delete_many(&ids).await?;
                println!("Deleted {count} of {} logs", ids.len());
            }
        }
        Commands::StatusSummary => {
            let rows = client.status_summary().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                println!("{:<10}  {:>6}  {:>7}", "STATUS", "COUNT", "SHARE");
                println!("{}", "-".repeat(27));
                for row in rows {
                    println!(
                        "{:<10}  {:>6}  {:>6.1}%",
                        row.task_status, row.status_count, row.percentage
                    );
                }
            }
        }
        Commands::TypeSummary => {
            let rows = client.type_summary().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                println!("{:<10}  {:>6}  {:>7}", "TYPE", "COUNT", "SHARE");
                println!("{}", "-".repeat(27));
                for row in rows {
                    println!(
                        "{:<10}  {:>6}  {:>6.1}%",
                        row.task_type, row.type_count, row.percentage
                    );
                }
            }
        }
        Commands::DailyCount => {
            let rows = client.daily_task_count().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                println!("{:<12}  {:>6}", "DATE", "COUNT");
                println!("{}", "-".repeat(20));
                for row in rows {
                    println!("{:<12}  {:>6}", row.formatted_date, row.task_count);
                }
            }
        }
        Commands::CompletedCount { view, duration } => {
            let rows = client.completed_task_count(view, duration).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                println!("Completed per {view} over the last {duration}:");
                println!("{:<12}  {:>6}", "FROM", "COUNT");
                println!("{}", "-".repeat(20));
                for row in rows {
                    println!(
                        "{:<12}  {:>6}",
                        row.completed_at.format("%Y-%m-%d"),
                        row.task_count
                    );
                }
            }
        }
        Commands::Summary => {
            let summary = client.task_summary().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("  Total tasks:       {}", summary.total_tasks);
                println!("  Bugs:              {}", summary.total_bugs);
                println!("  In progress:       {}", summary.total_progress_tasks);
                println!("  Critical priority: {}", summary.highest_priority_tasks);
            }
        }
    }

    Ok(())
}

async fn list_logs(
    client: &WorklogClient,
    query: &LogQuery,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (logs, total_pages) = client.list(query).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&logs)?);
        return Ok(());
    }

    println!(
        "Logs (page {} of {}):",
        query.page + 1,
        total_pages.max(1)
    );
    println!(
        "{:<36}  {:<8}  {:<10}  {:>4}  {:<32}  {}",
        "ID", "TYPE", "STATUS", "PRI", "NAME", "UPDATED"
    );
    println!("{}", "-".repeat(120));

    for log in logs {
        println!(
            "{:<36}  {:<8}  {:<10}  {:>4}  {:<32}  {}",
            log.log_id,
            log.task_type,
            log.task_status,
            log.priority,
            truncate(&log.task_name, 32),
            format_timestamp(log.updated_at)
        );
    }

    Ok(())
}

fn show_log(log: &Log, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(log)?);
        return Ok(());
    }

    println!("  ID:         {}", log.log_id);
    println!("  Name:       {}", log.task_name);
    println!("  Type:       {}", log.task_type);
    println!("  Status:     {}", log.task_status);
    println!("  Priority:   {}", log.priority);
    if let Some(notes) = &log.notes {
        println!("  Notes:      {notes}");
    }
    if let Some(started_at) = log.started_at {
        println!("  Started:    {}", format_timestamp(started_at));
    }
    if let Some(completed_at) = log.completed_at {
        println!("  Completed:  {}", format_timestamp(completed_at));
    }
    println!("  Created:    {}", format_timestamp(log.created_at));
    println!("  Updated:    {}", format_timestamp(log.updated_at));

    Ok(())
}

fn parse_priority(s: &str) -> Result<Priority, String> {
    let value: i64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{s}' is not a number"))?;
    Priority::try_from(value).map_err(|e| e.to_string())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}
