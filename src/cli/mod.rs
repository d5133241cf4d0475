pub mod api_client;
mod commands;
pub mod error;
pub mod utils;

#[cfg(test)]
mod api_client_test;
#[cfg(test)]
mod utils_test;

use clap::{Parser, Subcommand};

use crate::cli::error::CliResult;

#[derive(Parser)]
#[command(name = "taskplan")]
#[command(author, version, about = "Request planning and task approval CLI", long_about = None)]
pub struct Cli {
    /// Override the API URL (default: TASKPLAN_API_URL env or http://localhost:3737)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format (table or json)
    #[arg(long, global = true, default_value = "table")]
    pub format: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a request and its ordered tasks
    Plan {
        /// The original request text
        request: String,
        /// Task as TITLE or TITLE::DESCRIPTION (repeatable, in execution order)
        #[arg(short, long = "task", required = true)]
        tasks: Vec<String>,
        /// How the request was split into tasks
        #[arg(long)]
        split_details: Option<String>,
    },
    /// List all requests with progress
    List,
    /// Show a request with all of its tasks
    Show {
        /// Request ID
        request_id: String,
    },
    /// Show the next pending task of a request
    Next {
        /// Request ID
        request_id: String,
    },
    /// Mark a task as done
    Done {
        /// Request ID
        request_id: String,
        /// Task ID
        task_id: String,
        /// What was done
        #[arg(short, long)]
        details: Option<String>,
    },
    /// Approve a completed task
    Approve {
        /// Request ID
        request_id: String,
        /// Task ID
        task_id: String,
    },
    /// Close a request once every task is approved
    Complete {
        /// Request ID
        request_id: String,
    },
    /// Append tasks to a request
    Add {
        /// Request ID
        request_id: String,
        /// Task as TITLE or TITLE::DESCRIPTION (repeatable)
        #[arg(short, long = "task", required = true)]
        tasks: Vec<String>,
    },
    /// Edit a pending task
    Update {
        /// Request ID
        request_id: String,
        /// Task ID
        task_id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a pending task
    Delete {
        /// Request ID
        request_id: String,
        /// Task ID
        task_id: String,
    },
    /// Show every field of a task
    Task {
        /// Task ID
        task_id: String,
    },
    /// List available tools
    Tools,
    /// Invoke a tool with raw JSON parameters
    Invoke {
        /// Tool name
        name: String,
        /// Parameters as a JSON object
        params: Option<String>,
    },
    /// Delete ALL requests and tasks
    Clear {
        /// Must be CLEAR_ALL_MY_DATA
        #[arg(long)]
        confirm: String,
    },
}

async fn execute(cli: Cli) -> CliResult<Option<String>> {
    let api_client = api_client::ApiClient::new(cli.api_url);
    let format = cli.format.as_str();

    let output = match cli.command {
        Some(Commands::Plan {
            request,
            tasks,
            split_details,
        }) => {
            commands::request::plan(&api_client, &request, &tasks, split_details.as_deref(), format)
                .await?
        }
        Some(Commands::List) => commands::request::list(&api_client, format).await?,
        Some(Commands::Show { request_id }) => {
            commands::request::show(&api_client, &request_id, format).await?
        }
        Some(Commands::Next { request_id }) => {
            commands::request::next(&api_client, &request_id, format).await?
        }
        Some(Commands::Done {
            request_id,
            task_id,
            details,
        }) => {
            commands::task::done(&api_client, &request_id, &task_id, details.as_deref(), format)
                .await?
        }
        Some(Commands::Approve {
            request_id,
            task_id,
        }) => commands::task::approve(&api_client, &request_id, &task_id, format).await?,
        Some(Commands::Complete { request_id }) => {
            commands::request::complete(&api_client, &request_id, format).await?
        }
        Some(Commands::Add { request_id, tasks }) => {
            commands::task::add(&api_client, &request_id, &tasks, format).await?
        }
        Some(Commands::Update {
            request_id,
            task_id,
            title,
            description,
        }) => {
            commands::task::update(
                &api_client,
                &request_id,
                &task_id,
                title.as_deref(),
                description.as_deref(),
                format,
            )
            .await?
        }
        Some(Commands::Delete {
            request_id,
            task_id,
        }) => commands::task::delete(&api_client, &request_id, &task_id, format).await?,
        Some(Commands::Task { task_id }) => {
            commands::task::details(&api_client, &task_id, format).await?
        }
        Some(Commands::Tools) => commands::tool::list_tools(&api_client, format).await?,
        Some(Commands::Invoke { name, params }) => {
            commands::tool::invoke(&api_client, &name, params.as_deref()).await?
        }
        Some(Commands::Clear { confirm }) => commands::tool::clear(&api_client, &confirm).await?,
        None => return Ok(None),
    };

    Ok(Some(output))
}

/// Parse arguments, run the command and print its output.
pub async fn run() -> CliResult<()> {
    let cli = Cli::parse();

    match execute(cli).await? {
        Some(output) => println!("{}", output),
        None => println!("taskplan - use --help for available commands"),
    }
    Ok(())
}
