//! Rows written to and read from the remote tables.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Attendance, Commitment, Fulfillment};

pub const USERS: &str = "users";
pub const PODS: &str = "pods";
pub const POD_MEETINGS: &str = "pod_meetings";
pub const COMMITMENTS: &str = "commitments";
pub const MEETING_ATTENDANCE: &str = "meeting_attendance";

/// Status tag on every user created by the import.
pub const IMPORTED_USER_STATUS: &str = "imported_scoreboards";
/// Name of the single pod anchoring every imported meeting.
pub const IMPORT_POD_NAME: &str = "Imported Scoreboards Pod";
/// Detection method recorded on imported attendance rows.
pub const DETECTION_METHOD: &str = "scoreboards_import";
/// Assumed length of an attended meeting.
pub const ATTENDED_MINUTES: u32 = 60;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub status: &'static str,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPod {
    pub name: &'static str,
    pub day_of_week: u8,
    pub time_utc: &'static str,
    pub status: &'static str,
    pub created_at: String,
}

impl NewPod {
    pub fn import_anchor(created_at: String) -> Self {
        Self {
            name: IMPORT_POD_NAME,
            day_of_week: 1,
            time_utc: "19:00:00",
            status: "imported",
            created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMeeting {
    pub pod_id: Uuid,
    pub meeting_date: String,
    pub status: &'static str,
    pub created_at: String,
}

/// Commitment row of the full import, with timestamps pinned to the entry date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCommitment {
    pub user_id: Uuid,
    pub commitment: String,
    pub original_commitment: String,
    pub status: &'static str,
    pub smart_score: f64,
    pub completed_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl NewCommitment {
    pub fn from_entry(user_id: Uuid, date: &str, commitment: &Commitment) -> Self {
        let completed = commitment.fulfilled == Fulfillment::Fulfilled;
        Self {
            user_id,
            commitment: commitment.text.clone(),
            original_commitment: commitment.text.clone(),
            status: commitment_status(commitment.fulfilled),
            smart_score: 1.0,
            completed_at: completed.then(|| end_of_day(date)),
            created_at: start_of_day(date),
            updated_at: end_of_day(date),
        }
    }
}

/// Reduced commitment row used when only commitments are re-imported.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewBareCommitment {
    pub user_id: Uuid,
    pub commitment: String,
    pub status: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewAttendance {
    pub meeting_id: Uuid,
    pub user_id: Uuid,
    pub attended: Option<bool>,
    pub duration_minutes: u32,
    pub detection_method: &'static str,
    pub confidence_score: f64,
    pub created_at: String,
}

impl NewAttendance {
    pub fn from_entry(meeting_id: Uuid, user_id: Uuid, date: &str, attendance: Attendance) -> Self {
        let attended = attendance.as_bool();
        Self {
            meeting_id,
            user_id,
            attended,
            duration_minutes: if attended == Some(true) { ATTENDED_MINUTES } else { 0 },
            detection_method: DETECTION_METHOD,
            confidence_score: if attendance.is_known() { 1.0 } else { 0.5 },
            created_at: start_of_day(date),
        }
    }
}

/// Projection used to read back assigned identifiers.
#[derive(Debug, Clone, Deserialize)]
pub struct IdRow {
    pub id: Uuid,
}

/// Projection of previously imported users.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportedUserRow {
    pub id: Uuid,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Remote status of a commitment with the given fulfillment.
pub fn commitment_status(fulfilled: Fulfillment) -> &'static str {
    match fulfilled {
        Fulfillment::Fulfilled => "completed",
        Fulfillment::Unfulfilled => "failed",
        Fulfillment::Unknown => "pending",
    }
}

fn start_of_day(date: &str) -> String {
    format!("{date}T00:00:00Z")
}

fn end_of_day(date: &str) -> String {
    format!("{date}T23:59:59Z")
}
