use serde::{Deserialize, Deserializer, Serialize};
use time::Date;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// A timesheet row as returned by `GET /timesheets/my-timesheets/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timesheet {
    pub id: i64,
    pub project: i64,
    #[serde(default)]
    pub project_name: String,
    pub activity_type: String,
    #[serde(with = "iso_date")]
    pub date: Date,
    #[serde(deserialize_with = "decimal_hours")]
    pub hours_worked: f64,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TimesheetList {
    #[serde(default)]
    pub timesheets: Vec<Timesheet>,
}

/// Body of `POST /timesheets/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimesheetPayload {
    pub employee_id: String,
    pub project: i64,
    pub activity_type: String,
    #[serde(with = "iso_date")]
    pub date: Date,
    pub hours_worked: String,
    pub description: String,
}

impl TimesheetPayload {
    pub fn new(
        employee_id: String,
        project: i64,
        activity_type: String,
        date: Date,
        hours_worked: f64,
        description: String,
    ) -> Self {
        Self {
            employee_id,
            project,
            activity_type,
            date,
            // The backend stores a decimal; `4` and `4.25` are both accepted.
            hours_worked: hours_worked.to_string(),
            description,
        }
    }
}

/// Body of `PUT /timesheets/{id}/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimesheetUpdatePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "iso_date::option"
    )]
    pub date: Option<Date>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours_worked: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CreatedId {
    pub id: i64,
}

/// The create endpoint answers either `{"timesheet": {...}}` or the bare row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CreateTimesheetResponse {
    Wrapped { timesheet: CreatedId },
    Bare(CreatedId),
}

impl CreateTimesheetResponse {
    pub fn id(&self) -> i64 {
        match self {
            CreateTimesheetResponse::Wrapped { timesheet } => timesheet.id,
            CreateTimesheetResponse::Bare(created) => created.id,
        }
    }
}

/// Error body returned by the backend on 4xx responses.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    pub error: Option<String>,
    pub message: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.error.or(self.message)
    }
}

fn decimal_hours<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Decimal {
        Text(String),
        Number(f64),
    }

    match Decimal::deserialize(deserializer)? {
        Decimal::Number(n) => Ok(n),
        Decimal::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid hours value: {}", s))),
    }
}
