//! Receiving-course records - lenient parsing, labels, ordering and lookup

use std::cmp::Ordering;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::normalizer::normalize_articulations;
use crate::parser::fields;
use crate::{CollegeArticulation, Error, Result};

/// Record type of a receiving course
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourseKind {
    Course,
    Series,
    Other(String),
}

impl CourseKind {
    fn from_tag(tag: &str) -> Self {
        match tag {
            "COURSE" => CourseKind::Course,
            "SERIES" => CourseKind::Series,
            other => CourseKind::Other(other.to_string()),
        }
    }
}

/// One member course of a receiving series
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SeriesMember {
    pub number: String,
    pub title: String,
}

/// One sending college's articulation for the receiving course, still raw
#[derive(Debug, Clone, PartialEq)]
pub struct ArticulationRow {
    pub sending_name: String,
    pub sending_articulation: Value,
}

/// A receiving course together with every raw articulation row for it
#[derive(Debug, Clone, PartialEq)]
pub struct CourseRecord {
    pub key: String,
    pub kind: CourseKind,
    pub number: String,
    pub title: Option<String>,
    pub courses: Vec<SeriesMember>,
    pub articulations: Vec<ArticulationRow>,
}

impl CourseRecord {
    /// Lenient parse; missing or mistyped fields read as empty.
    pub fn from_value(value: &Value) -> Self {
        Self {
            key: fields::string(value, "key"),
            kind: CourseKind::from_tag(&fields::string(value, "type")),
            number: fields::string(value, "number"),
            title: fields::opt_string(value, "title"),
            courses: fields::array(value, "courses")
                .iter()
                .map(|member| SeriesMember {
                    number: fields::string(member, "number"),
                    title: fields::string(member, "title"),
                })
                .collect(),
            articulations: fields::array(value, "articulations")
                .iter()
                .map(|row| ArticulationRow {
                    sending_name: fields::string(row, "sending_name"),
                    sending_articulation: row.get("sending_articulation").cloned().unwrap_or(Value::Null),
                })
                .collect(),
        }
    }

    fn member_titles(&self) -> String {
        self.courses
            .iter()
            .map(|member| member.title.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Heading text for the selected course
    pub fn full_label(&self) -> String {
        match self.kind {
            CourseKind::Course => {
                format!("{} - {}", self.key, self.title.as_deref().unwrap_or(""))
                    .trim()
                    .to_string()
            }
            CourseKind::Series => format!("{} - {}", self.key, self.member_titles()),
            CourseKind::Other(_) => self.key.clone(),
        }
    }

    /// Course picker entry text
    pub fn option_label(&self) -> String {
        match self.kind {
            CourseKind::Course => format!("{} - {}", self.key, self.title.as_deref().unwrap_or("")),
            CourseKind::Series => format!("{} - {}", self.key, self.member_titles()),
            CourseKind::Other(_) => self.key.clone(),
        }
    }

    /// Catalog ordering key: leading number, suffix, courses before series,
    /// then the raw number text.
    pub fn sort_key(&self) -> (u64, String, u8, String) {
        match self.kind {
            CourseKind::Course => {
                let (n, suffix) = split_number(&self.number);
                (n, suffix, 0, self.number.clone())
            }
            CourseKind::Series => {
                let (n, suffix) = self
                    .courses
                    .iter()
                    .map(|member| split_number(&member.number))
                    .min()
                    .unwrap_or((NO_NUMBER, String::new()));
                let numbers = self
                    .courses
                    .iter()
                    .map(|member| member.number.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                (n, suffix, 1, numbers)
            }
            CourseKind::Other(_) => {
                let (n, suffix) = split_number(&self.key);
                (n, suffix, 0, self.key.clone())
            }
        }
    }
}

const NO_NUMBER: u64 = 1_000_000_000;

/// `"12AL"` → `(12, "AL")`; no leading digits sorts after every number.
fn split_number(number: &str) -> (u64, String) {
    let upper = number.trim().to_uppercase();
    let digits = upper.chars().take_while(char::is_ascii_digit).count();
    let n = if digits == 0 {
        NO_NUMBER
    } else {
        upper[..digits].parse().unwrap_or(NO_NUMBER)
    };
    (n, upper[digits..].to_string())
}

/// Parse JSON text holding either an array of records or a single record.
pub fn parse_records(text: &str) -> Result<Vec<CourseRecord>> {
    let value: Value = serde_json::from_str(text)?;
    records_from_value(&value)
}

pub fn records_from_value(value: &Value) -> Result<Vec<CourseRecord>> {
    match value {
        Value::Array(rows) => Ok(rows.iter().map(CourseRecord::from_value).collect()),
        Value::Object(_) => Ok(vec![CourseRecord::from_value(value)]),
        other => Err(Error::ParseError(format!(
            "expected a course record or a list of records, found {}",
            json_type(other)
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Sort records into catalog order (stable)
pub fn sort_records(records: &mut [CourseRecord]) {
    records.sort_by(catalog_order);
}

/// First record carrying `key`
pub fn find_course<'a>(records: &'a [CourseRecord], key: &str) -> Result<&'a CourseRecord> {
    records
        .iter()
        .find(|record| record.key == key)
        .ok_or_else(|| Error::CourseNotFound(key.to_string()))
}

/// A selected course with its normalized articulations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseArticulations {
    #[serde(rename = "courseFull")]
    pub course_full: String,
    pub articulations: Vec<CollegeArticulation>,
}

/// Look up `key` and normalize its articulations.
pub fn articulations_for(records: &[CourseRecord], key: &str) -> Result<CourseArticulations> {
    let record = find_course(records, key)?;
    debug!(course = key, "selected course");
    Ok(CourseArticulations {
        course_full: record.full_label(),
        articulations: normalize_articulations(record),
    })
}

/// Compare two records in catalog order
pub fn catalog_order(a: &CourseRecord, b: &CourseRecord) -> Ordering {
    a.sort_key().cmp(&b.sort_key())
}
