//! Aggregate dashboard views.
//!
//! Every dashboard fans out to several endpoints at once and builds its view
//! from whatever settled successfully: a failed call degrades only the field
//! it feeds.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

use super::errors::ApiError;
use super::notification::{Notification, RecordId};
use super::setup::RootAdminStatus;
use super::user::Profile;
use crate::fetch::SettledExt;

/// Rows shown in the "students currently out" table.
pub const OUTING_PREVIEW: usize = 10;
/// Rows shown in the pending complaints table.
pub const COMPLAINT_PREVIEW: usize = 5;
/// Notifications shown on the student landing page.
pub const RECENT_NOTIFICATIONS: usize = 5;

/// Backend health as shown on the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SystemStatus {
    /// The health check answered.
    Active,
    /// The health check failed.
    #[default]
    Unavailable,
}

impl fmt::Display for SystemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Active => "Active",
            Self::Unavailable => "Unavailable",
        })
    }
}

/// Figures on the admin landing page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AdminStats {
    /// Registered accounts of every role.
    pub total_users: usize,
    /// Students on the hostel roll.
    pub total_students: usize,
    /// Notifications sent so far.
    pub total_notifications: usize,
    /// Whether the backend answered the health check.
    pub system_status: SystemStatus,
}

impl AdminStats {
    /// The notification filter endpoint may answer with a non-array body; that counts as zero.
    #[must_use]
    pub fn from_settled(
        users: Result<Vec<Value>, ApiError>,
        students: Result<Vec<Value>, ApiError>,
        notifications: Result<Value, ApiError>,
        health: Result<RootAdminStatus, ApiError>,
    ) -> Self {
        let system_status = if health.is_ok() {
            SystemStatus::Active
        } else {
            SystemStatus::Unavailable
        };
        Self {
            total_users: users.settle_or("users", Vec::new()).len(),
            total_students: students.settle_or("students", Vec::new()).len(),
            total_notifications: notifications
                .settle_or("notifications", Value::Null)
                .as_array()
                .map_or(0, Vec::len),
            system_status,
        }
    }
}

/// One row of the attendance log.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceLog {
    /// Student PRN.
    #[serde(default)]
    pub prn: Option<String>,
    /// Name as recorded by the gate.
    #[serde(default)]
    pub student_name: Option<String>,
    /// Day of the entry, ISO-8601.
    #[serde(default)]
    pub date: Option<String>,
    /// Time the student left.
    #[serde(default)]
    pub entry_time: Option<String>,
    /// Older spelling of `entry_time`.
    #[serde(default)]
    pub out_time: Option<String>,
    /// Time the student came back.
    #[serde(default)]
    pub exit_time: Option<String>,
    /// Older spelling of `exit_time`.
    #[serde(default)]
    pub in_time: Option<String>,
    /// Room number; text or numeric depending on the endpoint.
    #[serde(default)]
    pub room_no: Option<Value>,
}

impl AttendanceLog {
    /// Day of the record, read from the first ten characters of `date`.
    #[must_use]
    pub fn day(&self) -> Option<NaiveDate> {
        self.date
            .as_deref()
            .and_then(|date| date.get(..10))
            .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
    }

    /// Left the hostel and has not come back yet.
    #[must_use]
    pub fn is_out(&self) -> bool {
        let left = present(self.entry_time.as_deref()).or(present(self.out_time.as_deref()));
        let returned = present(self.exit_time.as_deref()).or(present(self.in_time.as_deref()));
        left.is_some() && returned.is_none()
    }
}

/// Room allotment as listed by `viewAllotments`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Allotment {
    /// PRN of the allotted student.
    #[serde(default)]
    pub student_prn: Option<String>,
    /// Allotted room.
    #[serde(default)]
    pub room_no: Option<Value>,
    /// `ACTIVE` while the allotment holds.
    #[serde(default)]
    pub status: Option<String>,
}

impl Allotment {
    /// Status is `ACTIVE`, ignoring case.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|status| status.eq_ignore_ascii_case("ACTIVE"))
    }
}

/// Complaint fields the dashboards need.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintSummary {
    /// Complaint id.
    #[serde(default, alias = "complaintId")]
    pub id: Option<RecordId>,
    /// Short subject line.
    #[serde(default)]
    pub title: Option<String>,
    /// Full complaint text.
    #[serde(default)]
    pub description: Option<String>,
    /// Workflow state, e.g. `PENDING`.
    #[serde(default)]
    pub status: Option<String>,
}

impl ComplaintSummary {
    /// Status is `PENDING`, ignoring case.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|status| status.eq_ignore_ascii_case("PENDING"))
    }
}

/// A student who is out today, with the room resolved from allotments when the log lacks it.
#[derive(Debug, Clone, PartialEq)]
pub struct OutingStudent {
    /// Today's attendance entry.
    pub log: AttendanceLog,
    /// Room from the log, else from the active allotment.
    pub room_no: Option<Value>,
}

/// Figures and tables on the rector landing page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RectorStats {
    /// Students out today, capped at [`OUTING_PREVIEW`].
    pub students_out: Vec<OutingStudent>,
    /// Pending complaints, capped at [`COMPLAINT_PREVIEW`].
    pub pending_complaints: Vec<ComplaintSummary>,
    /// Rooms in the hostel.
    pub total_rooms: usize,
    /// Allotments currently active.
    pub active_allocations: usize,
}

impl RectorStats {
    /// Build the view for `today` from whichever calls succeeded.
    #[must_use]
    pub fn from_settled(
        attendance: Result<Vec<AttendanceLog>, ApiError>,
        complaints: Result<Vec<ComplaintSummary>, ApiError>,
        rooms: Result<Vec<Value>, ApiError>,
        allotments: Result<Vec<Allotment>, ApiError>,
        today: NaiveDate,
    ) -> Self {
        let active: Vec<Allotment> = allotments
            .settle_or("allotments", Vec::new())
            .into_iter()
            .filter(Allotment::is_active)
            .collect();
        let room_by_prn: HashMap<String, Value> = active
            .iter()
            .filter_map(|allotment| {
                let prn = allotment.student_prn.clone()?;
                let room = allotment.room_no.clone().filter(|room| !room.is_null())?;
                Some((prn, room))
            })
            .collect();

        let students_out = attendance
            .settle_or("attendance", Vec::new())
            .into_iter()
            .filter(|log| log.day() == Some(today) && log.is_out())
            .map(|log| {
                let room_no = log
                    .room_no
                    .clone()
                    .filter(|room| !room.is_null())
                    .or_else(|| log.prn.as_ref().and_then(|prn| room_by_prn.get(prn).cloned()));
                OutingStudent { log, room_no }
            })
            .take(OUTING_PREVIEW)
            .collect();

        let pending_complaints = complaints
            .settle_or("complaints", Vec::new())
            .into_iter()
            .filter(ComplaintSummary::is_pending)
            .take(COMPLAINT_PREVIEW)
            .collect();

        Self {
            students_out,
            pending_complaints,
            total_rooms: rooms.settle_or("rooms", Vec::new()).len(),
            active_allocations: active.len(),
        }
    }
}

/// Data behind the student landing page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StudentOverview {
    /// The student's profile, when it loaded.
    pub profile: Option<Profile>,
    /// Latest notifications, capped at [`RECENT_NOTIFICATIONS`].
    pub recent: Vec<Notification>,
}

impl StudentOverview {
    /// Build the view from whichever calls succeeded.
    #[must_use]
    pub fn from_settled(
        profile: Result<Profile, ApiError>,
        notifications: Result<Vec<Notification>, ApiError>,
    ) -> Self {
        Self {
            profile: profile.settle("student profile"),
            recent: notifications
                .settle_or("notifications", Vec::new())
                .into_iter()
                .take(RECENT_NOTIFICATIONS)
                .collect(),
        }
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.is_empty())
}
