use clap::{Args, Parser, Subcommand};
use time::{macros::format_description, Date};

use crate::commands::parse_day;

#[derive(Debug, Parser)]
#[command(name = "timesheet")]
#[command(about = "Weekly timesheet entry from the terminal")]
pub struct Cli {
    /// Run against local in-memory data instead of the API
    #[arg(long, global = true)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: Option<String>,
    },
    /// Sign out and remove the local session
    Logout,
    /// Show the signed-in employee
    Whoami,
    /// List active projects and their activities
    Projects,
    /// Show a week of timesheets
    Week(WeekArgs),
    /// Log hours for a project and activity, then submit them
    Log(LogArgs),
    /// Show the account profile
    Profile,
    /// Change a saved entry
    Edit(EditArgs),
    /// Delete a saved entry
    Delete {
        /// Entry id
        id: i64,
    },
    /// Print config path and create default file if missing
    ConfigPath,
}

#[derive(Debug, Clone, Args)]
pub struct WeekArgs {
    /// Any day of the week to show (YYYY-MM-DD), defaults to today
    #[arg(long, value_parser = parse_date)]
    pub date: Option<Date>,

    /// Weeks to move from that date, e.g. -1 for the week before
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub offset: i64,
}

#[derive(Debug, Clone, Args)]
pub struct LogArgs {
    /// Project name as listed by `timesheet projects`
    #[arg(long)]
    pub project: String,

    #[arg(long)]
    pub activity: String,

    /// Hours per day, rounded to the nearest quarter
    #[arg(long)]
    pub hours: f64,

    /// Weekday(s) of the week, e.g. `mon` or `mon,tue`
    #[arg(long, value_delimiter = ',', value_parser = parse_day_arg)]
    pub day: Vec<usize>,

    /// Date to log (YYYY-MM-DD); with --day, picks the week instead
    #[arg(long, value_parser = parse_date)]
    pub date: Option<Date>,
}

#[derive(Debug, Clone, Args)]
pub struct EditArgs {
    /// Entry id
    pub id: i64,

    #[arg(long)]
    pub hours: Option<f64>,

    #[arg(long, value_parser = parse_date)]
    pub date: Option<Date>,

    #[arg(long)]
    pub description: Option<String>,
}

pub fn parse_date(s: &str) -> Result<Date, String> {
    Date::parse(s.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|e| format!("expected YYYY-MM-DD: {}", e))
}

fn parse_day_arg(s: &str) -> Result<usize, String> {
    parse_day(s).map_err(|e| e.to_string())
}
