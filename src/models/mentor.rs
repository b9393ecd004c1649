//! Mentor profile model and its availability schedule.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::errors::{WorkflowError, WorkflowResult};

/// Start of the window a day falls back to when its last window is removed.
pub const DEFAULT_WINDOW_FROM: &str = "09:00";
/// End of the window a day falls back to when its last window is removed.
pub const DEFAULT_WINDOW_TO: &str = "17:00";

/// Day key used in the availability map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayKey {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayKey {
    pub const ALL: [DayKey; 7] = [
        DayKey::Monday,
        DayKey::Tuesday,
        DayKey::Wednesday,
        DayKey::Thursday,
        DayKey::Friday,
        DayKey::Saturday,
        DayKey::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DayKey::Monday => "monday",
            DayKey::Tuesday => "tuesday",
            DayKey::Wednesday => "wednesday",
            DayKey::Thursday => "thursday",
            DayKey::Friday => "friday",
            DayKey::Saturday => "saturday",
            DayKey::Sunday => "sunday",
        }
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayKey {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DayKey::ALL
            .into_iter()
            .find(|day| day.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| WorkflowError::validation(format!("Unknown day: {}", s)))
    }
}

/// A `{from, to}` pair of `HH:MM` times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub from: String,
    pub to: String,
}

impl TimeWindow {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Check that both ends parse and `from` is strictly before `to`.
    pub fn validate(&self) -> WorkflowResult<()> {
        let from = parse_time(&self.from)?;
        let to = parse_time(&self.to)?;
        if from >= to {
            return Err(WorkflowError::validation(format!(
                "Window start {} must be before end {}",
                self.from, self.to
            )));
        }
        Ok(())
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_FROM, DEFAULT_WINDOW_TO)
    }
}

fn parse_time(value: &str) -> WorkflowResult<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| WorkflowError::validation(format!("Invalid time {:?}, expected HH:MM", value)))
}

/// Weekly availability: day key to an ordered, never-empty list of windows.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Availability(BTreeMap<DayKey, Vec<TimeWindow>>);

impl Availability {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn days(&self) -> impl Iterator<Item = (&DayKey, &Vec<TimeWindow>)> {
        self.0.iter()
    }

    pub fn windows(&self, day: DayKey) -> Option<&[TimeWindow]> {
        self.0.get(&day).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Make a day available, seeding it with the default window.
    pub fn add_day(&mut self, day: DayKey) {
        self.0.entry(day).or_insert_with(|| vec![TimeWindow::default()]);
    }

    /// Drop a day (and all its windows) from the schedule.
    pub fn remove_day(&mut self, day: DayKey) -> bool {
        self.0.remove(&day).is_some()
    }

    /// Append a window to a day, creating the day if needed.
    pub fn add_window(&mut self, day: DayKey, window: TimeWindow) {
        self.0.entry(day).or_default().push(window);
    }

    /// Replace the window at `index` for `day`.
    pub fn update_window(
        &mut self,
        day: DayKey,
        index: usize,
        window: TimeWindow,
    ) -> WorkflowResult<()> {
        let slot = self
            .0
            .get_mut(&day)
            .and_then(|windows| windows.get_mut(index))
            .ok_or_else(|| no_window(day, index))?;
        *slot = window;
        Ok(())
    }

    /// Remove the window at `index` for `day`.
    ///
    /// A day never ends up with an empty list: removing its last window leaves the
    /// default `09:00-17:00` window in place.
    pub fn remove_window(&mut self, day: DayKey, index: usize) -> WorkflowResult<TimeWindow> {
        let windows = self.0.get_mut(&day).ok_or_else(|| no_window(day, index))?;
        if index >= windows.len() {
            return Err(no_window(day, index));
        }
        let removed = windows.remove(index);
        if windows.is_empty() {
            windows.push(TimeWindow::default());
        }
        Ok(removed)
    }

    /// Validate every window and the non-empty invariant.
    pub fn validate(&self) -> WorkflowResult<()> {
        for (day, windows) in &self.0 {
            if windows.is_empty() {
                return Err(WorkflowError::validation(format!(
                    "{} has no availability windows",
                    day
                )));
            }
            for window in windows {
                window
                    .validate()
                    .map_err(|e| WorkflowError::validation(format!("{}: {}", day, e.message)))?;
            }
        }
        Ok(())
    }

    /// Restore the non-empty invariant on data received from the server.
    pub fn normalized(mut self) -> Self {
        for windows in self.0.values_mut() {
            if windows.is_empty() {
                windows.push(TimeWindow::default());
            }
        }
        self
    }
}

fn no_window(day: DayKey, index: usize) -> WorkflowError {
    WorkflowError::validation(format!("No window {} on {}", index, day))
}

/// A mentor profile owned by one alumni user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentorProfile {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub expertise: String,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub availability: Availability,
    #[serde(default)]
    pub fees: f64,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

/// Editable body sent to the create and edit endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct MentorProfileDraft {
    #[validate(length(min = 1, message = "Expertise is required"))]
    pub expertise: String,
    pub topics: Vec<String>,
    #[validate(custom(function = "validate_availability"))]
    pub availability: Availability,
    #[validate(range(min = 0.0, message = "Fees must be a non-negative number"))]
    pub fees: f64,
    pub available: bool,
}

fn validate_availability(availability: &Availability) -> Result<(), ValidationError> {
    availability
        .validate()
        .map_err(|e| ValidationError::new("availability").with_message(e.message.into()))
}

impl Default for MentorProfileDraft {
    fn default() -> Self {
        Self {
            expertise: String::new(),
            topics: Vec::new(),
            availability: Availability::new(),
            fees: 0.0,
            available: true,
        }
    }
}

impl From<&MentorProfile> for MentorProfileDraft {
    fn from(profile: &MentorProfile) -> Self {
        Self {
            expertise: profile.expertise.clone(),
            topics: profile.topics.clone(),
            availability: profile.availability.clone().normalized(),
            fees: profile.fees,
            available: profile.available,
        }
    }
}

impl MentorProfileDraft {
    /// Add a topic. Blank topics are rejected and duplicates are ignored.
    pub fn add_topic(&mut self, topic: &str) -> WorkflowResult<()> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(WorkflowError::validation("Topic cannot be empty"));
        }
        if !self.topics.iter().any(|t| t.eq_ignore_ascii_case(topic)) {
            self.topics.push(topic.to_string());
        }
        Ok(())
    }

    pub fn remove_topic(&mut self, index: usize) -> Option<String> {
        (index < self.topics.len()).then(|| self.topics.remove(index))
    }
}
