use anyhow::{bail, Context, Result};
use std::io::{BufRead, Write};
use std::sync::Arc;
use thiserror::Error;

use timesheet_api::{TimesheetClient, TimesheetUpdatePayload};
use timesheet_core::{
    Hours, RowId, SessionError, SubmitReport, SystemClock, TimesheetBackend, TimesheetSession,
    DAY_NAMES,
};

use crate::api::HttpBackend;
use crate::cli::{Commands, EditArgs, LogArgs, WeekArgs};
use crate::config::TimesheetConfig;
use crate::render;
use crate::session_store::SessionStore;

const UNAUTH_LOGIN: &str = "Not logged in. Run `timesheet login` to authenticate.";
const UNAUTH_RELOGIN: &str = "Session expired. Run `timesheet login` to re-authenticate.";

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown day '{0}', expected one of mon, tue, wed, thu, fri, sat, sun")]
pub struct DayParseError(String);

/// Parse a weekday name (`mon`, `Monday`, ...) into its column index.
pub fn parse_day(s: &str) -> Result<usize, DayParseError> {
    let lower = s.trim().to_lowercase();
    if lower.len() >= 3 {
        let found = DAY_NAMES.iter().position(|name| {
            let name = name.to_lowercase();
            lower.starts_with(&name) && full_day_name(&name).starts_with(&lower)
        });
        if let Some(index) = found {
            return Ok(index);
        }
    }
    Err(DayParseError(s.to_string()))
}

fn full_day_name(short: &str) -> &'static str {
    match short {
        "mon" => "monday",
        "tue" => "tuesday",
        "wed" => "wednesday",
        "thu" => "thursday",
        "fri" => "friday",
        "sat" => "saturday",
        _ => "sunday",
    }
}

fn client(config: &TimesheetConfig) -> Result<TimesheetClient> {
    TimesheetClient::new(&config.api_url, config.timeout())
        .with_context(|| format!("Invalid API URL: {}", config.api_url))
}

/// A client carrying the saved session.
fn authed_client(config: &TimesheetConfig) -> Result<TimesheetClient> {
    let credentials = SessionStore::default_location()?
        .load()?
        .context(UNAUTH_LOGIN)?;
    Ok(client(config)?.with_credentials(credentials))
}

/// Build the HTTP backend from config and the saved session.
pub fn http_backend(config: &TimesheetConfig) -> Result<HttpBackend> {
    Ok(HttpBackend::new(authed_client(config)?))
}

/// Commands that need a signed-in session.
pub async fn run<B: TimesheetBackend>(
    command: Commands,
    backend: Arc<B>,
    config: &TimesheetConfig,
) -> Result<()> {
    let mut session = TimesheetSession::with_system_clock(backend)
        .with_overtime_threshold(config.overtime_threshold);

    match command {
        Commands::Whoami => {
            session.initialize().await.map_err(session_error)?;
            if let Some(user) = session.user() {
                println!("{}", render::user_summary(user));
            }
        }
        Commands::Projects => {
            session.load_catalog().await.map_err(session_error)?;
            print!("{}", render::project_list(session.catalog()));
        }
        Commands::Week(args) => {
            show_week(&mut session, &args).await?;
            print_week(&session);
        }
        Commands::Log(args) => {
            session.initialize().await.map_err(session_error)?;
            let report = log_hours(&mut session, &args).await?;
            println!("Saved {} entries.", report.created);
            if report.skipped > 0 {
                println!(
                    "{} row(s) without project or activity were not submitted.",
                    report.skipped
                );
            }
            print_week(&session);
        }
        Commands::Login { .. }
        | Commands::Logout
        | Commands::Profile
        | Commands::Edit(_)
        | Commands::Delete { .. }
        | Commands::ConfigPath => bail!("command does not use a timesheet session"),
    }

    Ok(())
}

async fn show_week<B: TimesheetBackend>(
    session: &mut TimesheetSession<B, SystemClock>,
    args: &WeekArgs,
) -> Result<()> {
    session.initialize().await.map_err(session_error)?;
    if let Some(date) = args.date {
        session.go_to(date).await.map_err(session_error)?;
    }
    if args.offset != 0 {
        session
            .navigate_weeks(args.offset)
            .await
            .map_err(session_error)?;
    }
    Ok(())
}

fn print_week<B: TimesheetBackend>(session: &TimesheetSession<B, SystemClock>) {
    let totals = session.totals();
    print!(
        "{}",
        render::week_table(session.window(), session.rows(), &totals, session.today())
    );
    println!("{}", render::totals_summary(&totals));
}

/// Put `args.hours` on the requested days of the project/activity row and
/// submit.
pub async fn log_hours<B, C>(
    session: &mut TimesheetSession<B, C>,
    args: &LogArgs,
) -> Result<SubmitReport>
where
    B: TimesheetBackend,
    C: timesheet_core::Clock,
{
    if let Some(date) = args.date {
        session.go_to(date).await.map_err(session_error)?;
    }

    let days = if !args.day.is_empty() {
        args.day.clone()
    } else {
        let date = args.date.unwrap_or_else(|| session.today());
        let day = session
            .window()
            .index_of(date)
            .with_context(|| format!("{} is outside {}", date, session.window().range_label()))?;
        vec![day]
    };

    let project = session
        .catalog()
        .find_by_name(&args.project)
        .with_context(|| format!("Unknown project '{}'. See `timesheet projects`.", args.project))?;
    let activities = session.catalog().activities(project.id);
    if !activities.is_empty() && !activities.iter().any(|a| a == &args.activity) {
        bail!(
            "Unknown activity '{}' for {}. Available: {}",
            args.activity,
            args.project,
            activities.join(", ")
        );
    }

    let row = target_row(session, &args.project, &args.activity)?;
    for day in days {
        session
            .update_hours(&row, day, args.hours)
            .with_context(|| format!("Cannot log hours on {}", DAY_NAMES[day.min(6)]))?;
    }

    session.submit().await.context("Failed to submit timesheet")
}

/// The row for a project/activity pair, creating one if the week has none.
fn target_row<B, C>(
    session: &mut TimesheetSession<B, C>,
    project: &str,
    activity: &str,
) -> Result<RowId>
where
    B: TimesheetBackend,
    C: timesheet_core::Clock,
{
    if let Some(row) = session.store().find_row(project, activity) {
        return Ok(row.id().clone());
    }

    let blank = session
        .rows()
        .iter()
        .find(|r| !r.is_existing() && r.project_name().is_empty() && !r.has_hours())
        .map(|r| r.id().clone());
    let row = match blank {
        Some(row) => row,
        None => session.add_row()?,
    };

    session.select_project(&row, project)?;
    session.select_activity(&row, activity)?;
    Ok(row)
}

fn session_error(e: SessionError) -> anyhow::Error {
    match e {
        SessionError::NotAuthenticated => anyhow::anyhow!(UNAUTH_RELOGIN),
        other => anyhow::Error::new(other),
    }
}

pub async fn login(config: &TimesheetConfig, email: Option<String>) -> Result<()> {
    let email = match email {
        Some(email) => email,
        None => prompt("Email: ")?,
    };
    let password = rpassword::prompt_password("Password: ").context("Failed to read password")?;

    let credentials = client(config)?
        .login(email.trim(), &password)
        .await
        .context("Login failed")?;

    SessionStore::default_location()?.save(&credentials)?;
    println!("Login successful. Session saved.");
    Ok(())
}

pub async fn logout(config: &TimesheetConfig) -> Result<()> {
    let store = SessionStore::default_location()?;
    if let Some(credentials) = store.load()? {
        let client = client(config)?.with_credentials(credentials);
        if let Err(e) = client.logout().await {
            tracing::warn!("Server logout failed: {}", e);
        }
    }
    store.clear()?;
    println!("Logged out.");
    Ok(())
}

pub async fn profile(config: &TimesheetConfig) -> Result<()> {
    let profile = authed_client(config)?
        .fetch_profile()
        .await
        .map_err(unauthorized_hint)?;
    println!("{} {} <{}>", profile.first_name, profile.last_name, profile.email);
    println!("Username: {}", profile.username);
    Ok(())
}

/// The fields to change on a saved entry. Hours are rounded like grid input.
pub fn update_payload(args: &EditArgs) -> Result<TimesheetUpdatePayload> {
    let hours = match args.hours {
        Some(value) => {
            let hours = Hours::from_input(value);
            if hours.is_zero() {
                bail!("Hours must be greater than zero; use `timesheet delete` instead.");
            }
            Some(hours.to_string())
        }
        None => None,
    };

    let payload = TimesheetUpdatePayload {
        hours_worked: hours,
        date: args.date,
        description: args.description.clone(),
        ..TimesheetUpdatePayload::default()
    };
    if payload == TimesheetUpdatePayload::default() {
        bail!("Nothing to change. Pass --hours, --date or --description.");
    }
    Ok(payload)
}

pub async fn edit(config: &TimesheetConfig, args: &EditArgs) -> Result<()> {
    let payload = update_payload(args)?;
    authed_client(config)?
        .update_timesheet(args.id, &payload)
        .await
        .map_err(unauthorized_hint)
        .with_context(|| format!("Failed to update entry {}", args.id))?;
    println!("Updated entry {}.", args.id);
    Ok(())
}

pub async fn delete(config: &TimesheetConfig, id: i64) -> Result<()> {
    authed_client(config)?
        .delete_timesheet(id)
        .await
        .map_err(unauthorized_hint)
        .with_context(|| format!("Failed to delete entry {}", id))?;
    println!("Deleted entry {}.", id);
    Ok(())
}

fn unauthorized_hint(e: timesheet_api::ApiError) -> anyhow::Error {
    match e {
        timesheet_api::ApiError::Unauthorized => anyhow::anyhow!(UNAUTH_RELOGIN),
        other => anyhow::Error::new(other),
    }
}

pub fn config_path() -> Result<()> {
    let path = TimesheetConfig::config_path()?;
    if TimesheetConfig::ensure_exists(&path)? {
        println!("Created default config.");
    }
    println!("{}", path.display());
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read input")?;
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::DevBackend;
    use timesheet_core::{CellState, FixedClock};
    use time::{macros::date, Date};

    const TODAY: Date = date!(2024 - 03 - 06);

    async fn dev_session() -> TimesheetSession<DevBackend, FixedClock> {
        let mut session = TimesheetSession::new(Arc::new(DevBackend::new(TODAY)), FixedClock(TODAY));
        session.initialize().await.unwrap();
        session
    }

    fn args(project: &str, activity: &str, hours: f64, day: Vec<usize>) -> LogArgs {
        LogArgs {
            project: project.to_string(),
            activity: activity.to_string(),
            hours,
            day,
            date: None,
        }
    }

    #[test]
    fn parses_short_and_long_day_names() {
        assert_eq!(parse_day("mon"), Ok(0));
        assert_eq!(parse_day("Wednesday"), Ok(2));
        assert_eq!(parse_day(" SUN "), Ok(6));
        assert_eq!(parse_day("thurs"), Ok(3));
        assert!(parse_day("mo").is_err());
        assert!(parse_day("monkey").is_err());
    }

    #[test]
    fn update_payload_needs_a_change() {
        let args = EditArgs {
            id: 1,
            hours: None,
            date: None,
            description: None,
        };
        assert!(update_payload(&args).is_err());

        let args = EditArgs {
            hours: Some(3.1),
            ..args
        };
        let payload = update_payload(&args).unwrap();
        assert_eq!(payload.hours_worked.as_deref(), Some("3"));
        assert_eq!(payload.project, None);

        let args = EditArgs {
            hours: Some(0.1),
            ..args
        };
        assert!(update_payload(&args).is_err());
    }

    #[tokio::test]
    async fn logs_today_on_a_new_row() {
        let mut session = dev_session().await;

        let report = log_hours(&mut session, &args("Internal", "Training", 1.5, vec![]))
            .await
            .unwrap();

        assert_eq!(report.created, 1);
        let row = session.store().find_row("Internal", "Training").unwrap();
        assert!(matches!(row.cells()[2].state(), CellState::Persisted { .. }));
        assert!(!session.has_unsaved_changes());
    }

    #[tokio::test]
    async fn adds_to_an_existing_row() {
        let mut session = dev_session().await;
        let before = session.rows().len();

        let report = log_hours(&mut session, &args("Apollo", "Development", 8.0, vec![2]))
            .await
            .unwrap();

        assert_eq!(report.created, 1);
        assert_eq!(session.rows().len(), before);
        assert_eq!(
            session.store().find_row("Apollo", "Development").unwrap().total(),
            23.0
        );
    }

    #[tokio::test]
    async fn refuses_persisted_and_future_days() {
        let mut session = dev_session().await;

        let persisted = log_hours(&mut session, &args("Apollo", "Development", 1.0, vec![0])).await;
        assert!(persisted.unwrap_err().to_string().contains("Mon"));

        let future = log_hours(&mut session, &args("Apollo", "Meetings", 1.0, vec![4])).await;
        assert!(future.is_err());
    }

    #[tokio::test]
    async fn unknown_project_or_activity_is_rejected() {
        let mut session = dev_session().await;

        let err = log_hours(&mut session, &args("Nope", "Development", 1.0, vec![0]))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Unknown project"));

        let err = log_hours(&mut session, &args("Internal", "Coding", 1.0, vec![0]))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Support, Training"));
    }
}
