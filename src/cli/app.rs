//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::task;
use crate::domain::Priority;
use crate::storage::{Config, TaskDraft, TaskStore};

#[derive(Parser)]
#[command(name = "tally")]
#[command(author, version, about = "A local-first personal task tracker")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Task file to operate on (defaults to the configured location)
    #[arg(long, global = true, env = "TALLY_FILE", value_name = "PATH")]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new task
    Add {
        /// Task title
        #[arg(value_parser = clap::builder::NonEmptyStringValueParser::new())]
        title: String,

        /// Task description
        #[arg(short, long)]
        description: Option<String>,

        /// Start date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        start_date: Option<String>,

        /// End date (YYYY-MM-DD)
        #[arg(short, long)]
        end_date: Option<String>,

        /// Priority (low or high)
        #[arg(short, long, default_value_t = Priority::Low)]
        priority: Priority,

        /// Record the task as already done
        #[arg(long)]
        done: bool,
    },

    /// List pending tasks (everything with --all)
    List {
        /// Include done and canceled tasks
        #[arg(long)]
        all: bool,
    },

    /// Mark a task as done
    Done {
        /// Task id as shown by `list`
        task_id: usize,
    },

    /// Cancel a task
    Cancel {
        /// Task id as shown by `list`
        task_id: usize,
    },

    /// Show tasks of one priority level
    Filter {
        /// Priority level (low or high)
        priority: Priority,
    },

    /// Show task statistics
    Stats,
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(cli.format, cli.verbose);

    let config = Config::load()?;
    let path = config.resolve_tasks_file(cli.file);
    output.verbose(&format!("Using task file: {}", path.display()));

    let store = TaskStore::new(path);

    match cli.command {
        Commands::Add {
            title,
            description,
            start_date,
            end_date,
            priority,
            done,
        } => task::add(
            &output,
            &store,
            TaskDraft {
                title,
                description,
                start_date,
                end_date,
                priority,
                done,
            },
        ),

        Commands::List { all } => task::list(&output, &store, all),
        Commands::Done { task_id } => task::complete(&output, &store, task_id),
        Commands::Cancel { task_id } => task::cancel(&output, &store, task_id),
        Commands::Filter { priority } => task::filter(&output, &store, priority),
        Commands::Stats => task::stats(&output, &store),
    }
}
