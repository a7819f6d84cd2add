use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::error::{Error, Result};
use crate::utils::validation::is_iso_date;

pub const MAX_GRADE: i32 = 1000;
pub const PENDING_STATUS: &str = "Pending";

/// Scrape date a job belongs to, always `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JobDate(String);

impl JobDate {
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if is_iso_date(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(Error::BadRequest(
                "Invalid date format. Use YYYY-MM-DD".to_string(),
            ))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for JobDate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for JobDate {
    type Error = Error;

    fn try_from(raw: String) -> Result<Self> {
        Self::parse(&raw)
    }
}

impl From<JobDate> for String {
    fn from(date: JobDate) -> Self {
        date.0
    }
}

impl fmt::Display for JobDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for JobDate {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    Applied,
    Interview,
    Rejected,
    Offer,
    Hired,
    Declined,
    Expired,
}

impl JobStatus {
    pub const ALL: [JobStatus; 8] = [
        JobStatus::Pending,
        JobStatus::Applied,
        JobStatus::Interview,
        JobStatus::Rejected,
        JobStatus::Offer,
        JobStatus::Hired,
        JobStatus::Declined,
        JobStatus::Expired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "Pending",
            JobStatus::Applied => "Applied",
            JobStatus::Interview => "Interview",
            JobStatus::Rejected => "Rejected",
            JobStatus::Offer => "Offer",
            JobStatus::Hired => "Hired",
            JobStatus::Declined => "Declined",
            JobStatus::Expired => "Expired",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Skills {
    List(Vec<String>),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobQuestion {
    #[serde(default, deserialize_with = "lenient_string")]
    pub question: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub answer: String,
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub kind: String,
    #[serde(default)]
    pub previous_answer: Option<String>,
}

/// A scraped job posting as stored in its date partition.
///
/// Legacy records carry `grade` and `experience_required` in several shapes;
/// deserialization normalizes both to plain integers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(default, deserialize_with = "lenient_string")]
    pub job_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub company: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub work_location: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub work_style: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default, deserialize_with = "deserialize_experience")]
    pub experience_required: i32,
    #[serde(default)]
    pub skills: Option<Skills>,
    #[serde(default, deserialize_with = "deserialize_grade")]
    pub grade: i32,
    #[serde(default)]
    pub date_listed: Option<String>,
    #[serde(default)]
    pub date_applied: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub scraped_on: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub job_link: Option<String>,
    #[serde(default)]
    pub application_link: Option<String>,
    #[serde(default)]
    pub hr_link: Option<String>,
    #[serde(default)]
    pub hr_name: Option<String>,
    #[serde(default)]
    pub resume: Option<String>,
    #[serde(default)]
    pub connect_request: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub reposted: bool,
    #[serde(default, deserialize_with = "lenient_questions")]
    pub questions: Vec<JobQuestion>,
}

impl Job {
    pub fn effective_status(&self) -> &str {
        match self.status.as_deref() {
            Some(status) if !status.is_empty() => status,
            _ => PENDING_STATUS,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.effective_status() == PENDING_STATUS
    }
}

/// Integer payload of a boxed number such as `{"$numberInt": "5"}`.
fn boxed_number(map: &Map<String, JsonValue>) -> Option<f64> {
    match map.get("$numberInt")? {
        JsonValue::String(s) => s.trim().parse().ok(),
        JsonValue::Number(n) => n.as_f64(),
        _ => None,
    }
}

fn loose_number(raw: &JsonValue) -> Option<f64> {
    match raw {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse().ok(),
        JsonValue::Object(map) => boxed_number(map),
        _ => None,
    }
}

pub fn normalize_grade(raw: &JsonValue) -> i32 {
    let value = match raw {
        JsonValue::Bool(true) => f64::from(MAX_GRADE),
        JsonValue::Bool(false) => 0.0,
        other => loose_number(other).unwrap_or(0.0),
    };
    if value.is_nan() {
        return 0;
    }
    value.trunc().clamp(0.0, f64::from(MAX_GRADE)) as i32
}

pub fn normalize_experience(raw: &JsonValue) -> i32 {
    match loose_number(raw) {
        Some(years) if years.is_finite() => years.trunc().clamp(0.0, f64::from(i32::MAX)) as i32,
        _ => 0,
    }
}

fn deserialize_grade<'de, D>(deserializer: D) -> std::result::Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = JsonValue::deserialize(deserializer)?;
    Ok(normalize_grade(&raw))
}

fn deserialize_experience<'de, D>(deserializer: D) -> std::result::Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = JsonValue::deserialize(deserializer)?;
    Ok(normalize_experience(&raw))
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match JsonValue::deserialize(deserializer)? {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s,
        other => other.to_string(),
    })
}

fn lenient_bool<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match JsonValue::deserialize(deserializer)? {
        JsonValue::Bool(b) => b,
        JsonValue::String(s) => matches!(s.trim().to_lowercase().as_str(), "true" | "yes" | "1"),
        JsonValue::Number(n) => n.as_f64().map(|v| v != 0.0).unwrap_or(false),
        _ => false,
    })
}

fn lenient_questions<'de, D>(deserializer: D) -> std::result::Result<Vec<JobQuestion>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<JobQuestion>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn job_from(value: JsonValue) -> Job {
        serde_json::from_value(value).expect("job should deserialize")
    }

    #[test]
    fn grade_true_becomes_max() {
        let job = job_from(json!({ "job_id": "a", "grade": true }));
        assert_eq!(job.grade, 1000);
    }

    #[test]
    fn grade_variants_are_normalized() {
        assert_eq!(normalize_grade(&json!(false)), 0);
        assert_eq!(normalize_grade(&json!({ "$numberInt": "742" })), 742);
        assert_eq!(normalize_grade(&json!("315")), 315);
        assert_eq!(normalize_grade(&json!(1500)), 1000);
        assert_eq!(normalize_grade(&json!(-4)), 0);
        assert_eq!(normalize_grade(&json!(88.9)), 88);
        assert_eq!(normalize_grade(&JsonValue::Null), 0);
        assert_eq!(normalize_grade(&json!("n/a")), 0);
    }

    #[test]
    fn boxed_experience_becomes_plain_integer() {
        let job = job_from(json!({
            "job_id": "b",
            "experience_required": { "$numberInt": "5" }
        }));
        assert_eq!(job.experience_required, 5);

        let job = job_from(json!({ "job_id": "c", "experience_required": 3 }));
        assert_eq!(job.experience_required, 3);
    }

    #[test]
    fn normalized_values_serialize_as_plain_numbers() {
        let job = job_from(json!({
            "job_id": "d",
            "grade": { "$numberInt": "640" },
            "experience_required": { "$numberInt": "2" }
        }));
        let out = serde_json::to_value(&job).unwrap();
        assert_eq!(out["grade"], json!(640));
        assert_eq!(out["experience_required"], json!(2));
    }

    #[test]
    fn missing_or_null_status_is_pending() {
        let unset = job_from(json!({ "job_id": "g" }));
        assert!(unset.is_pending());

        let null = job_from(json!({ "job_id": "h", "status": null }));
        assert_eq!(null.effective_status(), "Pending");

        let applied = job_from(json!({ "job_id": "i", "status": "Applied" }));
        assert!(!applied.is_pending());
    }

    #[test]
    fn null_passthrough_fields_are_tolerated() {
        let job = job_from(json!({
            "job_id": "l",
            "title": null,
            "questions": null,
            "reposted": "true"
        }));
        assert_eq!(job.title, "");
        assert!(job.questions.is_empty());
        assert!(job.reposted);
    }

    #[test]
    fn job_date_rejects_bad_input() {
        assert!(JobDate::parse("2024-03-01").is_ok());
        assert!(matches!(JobDate::parse("03-01-2024"), Err(Error::BadRequest(_))));
        assert!("2024-13-01".parse::<JobDate>().is_err());
    }

    #[test]
    fn skills_accept_list_or_delimited_string() {
        let listed = job_from(json!({ "job_id": "e", "skills": ["Rust", "SQL"] }));
        assert_eq!(listed.skills, Some(Skills::List(vec!["Rust".into(), "SQL".into()])));

        let text = job_from(json!({ "job_id": "f", "skills": "Rust, Tokio" }));
        assert_eq!(text.skills, Some(Skills::Text("Rust, Tokio".into())));
    }

    #[test]
    fn numeric_or_missing_job_id_still_decodes() {
        assert_eq!(job_from(json!({ "job_id": 12345 })).job_id, "12345");
        assert_eq!(job_from(json!({ "title": "No id" })).job_id, "");
    }

    #[test]
    fn exotic_numeric_grades_parse() {
        assert_eq!(normalize_grade(&json!("1e3")), 1000);
        assert_eq!(normalize_grade(&json!("+700")), 700);
        assert_eq!(normalize_grade(&json!("5.")), 5);
        assert_eq!(normalize_grade(&json!("\t300")), 300);
        assert_eq!(normalize_grade(&json!("600.7")), 600);
    }
}
