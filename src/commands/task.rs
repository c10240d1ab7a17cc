//! Task list commands.

use std::error::Error;

use clap::{Args, Subcommand, ValueEnum};

use sidepad::{sorted_for_display, FileKeyValue, Priority, StateStore, Task};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PriorityArg {
    High,
    Medium,
    Low,
}

impl From<PriorityArg> for Priority {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::High => Priority::High,
            PriorityArg::Medium => Priority::Medium,
            PriorityArg::Low => Priority::Low,
        }
    }
}

/// Manage the task list
#[derive(Debug, Args)]
pub struct TaskCommand {
    #[command(subcommand)]
    command: Option<TaskSubcommand>,
}

#[derive(Debug, Subcommand)]
enum TaskSubcommand {
    /// Add a task
    Add {
        text: String,
        #[arg(long, short, value_enum)]
        priority: Option<PriorityArg>,
    },
    /// List tasks in stored order (or sorted by priority)
    List {
        #[arg(long)]
        sorted: bool,
    },
    /// Mark a task done by its 1-based position
    Done { position: usize },
    /// Remove a task by its 1-based position
    Remove { position: usize },
    /// Print the pending count driving the badge
    Count,
}

impl TaskCommand {
    pub fn run(&self, store: &StateStore<FileKeyValue>) -> Result<(), Box<dyn Error>> {
        match &self.command {
            None | Some(TaskSubcommand::List { sorted: false }) => {
                print_tasks(&store.tasks());
            }
            Some(TaskSubcommand::List { sorted: true }) => {
                print_tasks(&sorted_for_display(&store.tasks()));
            }
            Some(TaskSubcommand::Add { text, priority }) => {
                let mut task = Task::new(text.clone());
                task.priority = priority.map(Priority::from);
                if !task.is_valid() {
                    return Err("task text cannot be empty".into());
                }
                let mut tasks = store.tasks();
                tasks.push(task);
                store.set_tasks(tasks)?;
                println!("Added.");
            }
            Some(TaskSubcommand::Done { position }) => {
                let mut tasks = store.tasks();
                let task = position
                    .checked_sub(1)
                    .and_then(|i| tasks.get_mut(i))
                    .ok_or("no task at that position")?;
                task.done = true;
                println!("Done: {}", task.text);
                store.set_tasks(tasks)?;
            }
            Some(TaskSubcommand::Remove { position }) => {
                let mut tasks = store.tasks();
                let index = position.checked_sub(1).ok_or("no task at that position")?;
                if index >= tasks.len() {
                    return Err("no task at that position".into());
                }
                let removed = tasks.remove(index);
                store.set_tasks(tasks)?;
                println!("Removed: {}", removed.text);
            }
            Some(TaskSubcommand::Count) => match store.badge_count() {
                Some(count) => println!("{}", count),
                None => println!("(badge clear)"),
            },
        }
        Ok(())
    }
}

fn print_tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks.");
        return;
    }
    for (index, task) in tasks.iter().enumerate() {
        let mark = if task.done { "x" } else { " " };
        let priority = task
            .priority
            .map(|p| format!(" ({})", p))
            .unwrap_or_default();
        println!("{:3}. [{}] {}{}", index + 1, mark, task.text, priority);
    }
}
