use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::ops::RangeInclusive;

use super::StoreError;

pub const QUADRANTS: RangeInclusive<u8> = 1..=4;
pub const TITLE_MAX_CHARS: usize = 80;
pub const DESCRIPTION_MAX_CHARS: usize = 500;
pub const NAME_MAX_CHARS: usize = 80;

/// A field value that remembers whether it was never given, given as `null`,
/// or given with a value.
///
/// Deserialize it with `#[serde(default)]` so a missing key stays `Unset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tristate<T> {
    Unset,
    Null,
    Set(T),
}

impl<T> Default for Tristate<T> {
    fn default() -> Self {
        Tristate::Unset
    }
}

impl<T> Tristate<T> {
    pub fn is_unset(&self) -> bool {
        matches!(self, Tristate::Unset)
    }

    pub fn as_option(&self) -> Option<&T> {
        match self {
            Tristate::Set(v) => Some(v),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Tristate<U> {
        match self {
            Tristate::Unset => Tristate::Unset,
            Tristate::Null => Tristate::Null,
            Tristate::Set(v) => Tristate::Set(f(v)),
        }
    }

    /// Overwrites `target` unless this value is `Unset`.
    pub fn merge_into(self, target: &mut Tristate<T>) {
        if !self.is_unset() {
            *target = self;
        }
    }

    fn merge_into_option(self, target: &mut Option<T>) {
        match self {
            Tristate::Unset => {}
            Tristate::Null => *target = None,
            Tristate::Set(v) => *target = Some(v),
        }
    }

    fn merge_into_required(self, target: &mut T) {
        if let Tristate::Set(v) = self {
            *target = v;
        }
    }
}

impl<T> From<Option<T>> for Tristate<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Tristate::Set(v),
            None => Tristate::Null,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Tristate<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Tristate::from)
    }
}

impl<T: Serialize> Serialize for Tristate<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Tristate::Set(v) => serializer.serialize_some(v),
            _ => serializer.serialize_none(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "not-started", alias = "未着手")]
    NotStarted,
    #[serde(rename = "in-progress", alias = "進行中")]
    InProgress,
    #[serde(rename = "done", alias = "完了")]
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::NotStarted,
        TaskStatus::InProgress,
        TaskStatus::Done,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "not-started",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Done => "done",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "Not started",
            TaskStatus::InProgress => "In progress",
            TaskStatus::Done => "Done",
        }
    }

    /// CSS badge class used by the board page.
    pub fn badge(&self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "badge--todo",
            TaskStatus::InProgress => "badge--doing",
            TaskStatus::Done => "badge--done",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Priority {
    #[serde(rename = "high", alias = "高")]
    High,
    #[default]
    #[serde(rename = "medium", alias = "中")]
    Medium,
    #[serde(rename = "low", alias = "低")]
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

fn default_quadrant() -> u8 {
    *QUADRANTS.start()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub owner_id: i64,
    #[serde(default)]
    pub created_by: Option<String>,
    /// ISO `YYYY-MM-DD`.
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default = "default_quadrant")]
    pub quadrant: u8,
}

/// Staff optional fields keep the unset/null distinction on disk: unset
/// fields are left out of the JSON object, cleared ones are written as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Tristate::is_unset")]
    pub department: Tristate<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_unset")]
    pub photo: Tristate<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_unset")]
    pub photo_q1: Tristate<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_unset")]
    pub photo_q2: Tristate<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_unset")]
    pub photo_q3: Tristate<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_unset")]
    pub photo_q4: Tristate<String>,
}

impl Staff {
    /// Quadrant avatar for `quadrant`, falling back to the base photo.
    pub fn photo_for_quadrant(&self, quadrant: u8) -> Option<&str> {
        let variant = match quadrant {
            1 => self.photo_q1.as_option(),
            2 => self.photo_q2.as_option(),
            3 => self.photo_q3.as_option(),
            4 => self.photo_q4.as_option(),
            _ => None,
        };
        variant.or(self.photo.as_option()).map(String::as_str)
    }

    /// Every photo filename this record references.
    pub fn photo_files(&self) -> Vec<&str> {
        [
            &self.photo,
            &self.photo_q1,
            &self.photo_q2,
            &self.photo_q3,
            &self.photo_q4,
        ]
        .into_iter()
        .filter_map(|p| p.as_option().map(String::as_str))
        .collect()
    }
}

fn check_len(field: &str, value: &str, max: usize) -> Result<(), StoreError> {
    if value.chars().count() > max {
        return Err(StoreError::ValidationFailed(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

fn check_required_text(field: &str, value: &str, max: usize) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(StoreError::ValidationFailed(format!("{field} is required")));
    }
    check_len(field, value, max)
}

pub(crate) fn check_quadrant(quadrant: u8) -> Result<(), StoreError> {
    if !QUADRANTS.contains(&quadrant) {
        return Err(StoreError::ValidationFailed(format!(
            "quadrant must be between {} and {}, got {quadrant}",
            QUADRANTS.start(),
            QUADRANTS.end()
        )));
    }
    Ok(())
}

fn check_not_null<T>(field: &str, value: &Tristate<T>) -> Result<(), StoreError> {
    if matches!(value, Tristate::Null) {
        return Err(StoreError::ValidationFailed(format!(
            "{field} cannot be null"
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaskCreate {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub owner_id: i64,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default = "default_quadrant")]
    pub quadrant: u8,
}

impl TaskCreate {
    /// A payload with only the required fields; everything else defaulted.
    pub fn new(title: impl Into<String>, owner_id: i64) -> Self {
        Self {
            title: title.into(),
            description: None,
            owner_id,
            created_by: None,
            due_date: None,
            status: TaskStatus::default(),
            department: None,
            priority: Priority::default(),
            quadrant: default_quadrant(),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), StoreError> {
        check_required_text("title", &self.title, TITLE_MAX_CHARS)?;
        if let Some(description) = &self.description {
            check_len("description", description, DESCRIPTION_MAX_CHARS)?;
        }
        check_quadrant(self.quadrant)
    }

    pub(crate) fn into_task(self, id: i64) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            owner_id: self.owner_id,
            created_by: self.created_by,
            due_date: self.due_date.map(canonical_date),
            status: self.status,
            department: self.department,
            priority: self.priority,
            quadrant: self.quadrant,
        }
    }
}

/// Partial task update. Only fields present in the payload are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TaskUpdate {
    pub title: Tristate<String>,
    pub description: Tristate<String>,
    pub owner_id: Tristate<i64>,
    pub created_by: Tristate<String>,
    pub due_date: Tristate<NaiveDate>,
    pub status: Tristate<TaskStatus>,
    pub department: Tristate<String>,
    pub priority: Tristate<Priority>,
    pub quadrant: Tristate<u8>,
}

impl TaskUpdate {
    pub(crate) fn validate(&self) -> Result<(), StoreError> {
        check_not_null("title", &self.title)?;
        check_not_null("owner_id", &self.owner_id)?;
        check_not_null("status", &self.status)?;
        check_not_null("priority", &self.priority)?;
        check_not_null("quadrant", &self.quadrant)?;
        if let Some(title) = self.title.as_option() {
            check_required_text("title", title, TITLE_MAX_CHARS)?;
        }
        if let Some(description) = self.description.as_option() {
            check_len("description", description, DESCRIPTION_MAX_CHARS)?;
        }
        if let Some(quadrant) = self.quadrant.as_option() {
            check_quadrant(*quadrant)?;
        }
        Ok(())
    }

    pub(crate) fn apply_to(self, task: &mut Task) {
        self.title.merge_into_required(&mut task.title);
        self.description.merge_into_option(&mut task.description);
        self.owner_id.merge_into_required(&mut task.owner_id);
        self.created_by.merge_into_option(&mut task.created_by);
        self.due_date
            .map(canonical_date)
            .merge_into_option(&mut task.due_date);
        self.status.merge_into_required(&mut task.status);
        self.department.merge_into_option(&mut task.department);
        self.priority.merge_into_required(&mut task.priority);
        self.quadrant.merge_into_required(&mut task.quadrant);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TaskQuadrantUpdate {
    pub quadrant: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StaffCreate {
    pub name: String,
    pub department: Tristate<String>,
    pub photo: Tristate<String>,
    pub photo_q1: Tristate<String>,
    pub photo_q2: Tristate<String>,
    pub photo_q3: Tristate<String>,
    pub photo_q4: Tristate<String>,
}

impl StaffCreate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<(), StoreError> {
        check_required_text("name", &self.name, NAME_MAX_CHARS)
    }

    pub fn set_quadrant_photo(&mut self, quadrant: u8, file: String) {
        let slot = match quadrant {
            1 => &mut self.photo_q1,
            2 => &mut self.photo_q2,
            3 => &mut self.photo_q3,
            4 => &mut self.photo_q4,
            _ => return,
        };
        *slot = Tristate::Set(file);
    }

    pub(crate) fn into_staff(self, id: i64) -> Staff {
        Staff {
            id,
            name: self.name,
            department: self.department,
            photo: self.photo,
            photo_q1: self.photo_q1,
            photo_q2: self.photo_q2,
            photo_q3: self.photo_q3,
            photo_q4: self.photo_q4,
        }
    }
}

/// Partial staff update. Leave the photo fields `Unset` to keep the existing
/// photo references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StaffUpdate {
    pub name: Tristate<String>,
    pub department: Tristate<String>,
    pub photo: Tristate<String>,
    pub photo_q1: Tristate<String>,
    pub photo_q2: Tristate<String>,
    pub photo_q3: Tristate<String>,
    pub photo_q4: Tristate<String>,
}

impl StaffUpdate {
    pub(crate) fn validate(&self) -> Result<(), StoreError> {
        check_not_null("name", &self.name)?;
        if let Some(name) = self.name.as_option() {
            check_required_text("name", name, NAME_MAX_CHARS)?;
        }
        Ok(())
    }

    pub(crate) fn apply_to(self, staff: &mut Staff) {
        self.name.merge_into_required(&mut staff.name);
        self.department.merge_into(&mut staff.department);
        self.photo.merge_into(&mut staff.photo);
        self.photo_q1.merge_into(&mut staff.photo_q1);
        self.photo_q2.merge_into(&mut staff.photo_q2);
        self.photo_q3.merge_into(&mut staff.photo_q3);
        self.photo_q4.merge_into(&mut staff.photo_q4);
    }

    /// Sets the quadrant variant slot for `quadrant` (1..=4).
    pub fn set_quadrant_photo(&mut self, quadrant: u8, value: Tristate<String>) {
        match quadrant {
            1 => self.photo_q1 = value,
            2 => self.photo_q2 = value,
            3 => self.photo_q3 = value,
            4 => self.photo_q4 = value,
            _ => {}
        }
    }
}

fn canonical_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
