//! Pushes the intermediate document into the remote store.
//!
//! The import is an ordered pipeline of steps, each consuming the ids the
//! previous step resolved: users, the anchor pod, one meeting per date,
//! commitments, attendance. Users, the pod and meetings are looked up
//! before being created, so a rerun reuses what an earlier run made.
//! Commitment and attendance rows are plain inserts; repeats are left to the
//! store's uniqueness constraints. Nothing is rolled back or retried: a
//! failed call is recorded in the [`ImportSummary`] and the batch moves on.

pub mod client;
pub mod names;
pub mod rows;
pub mod schema;

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::config::WritePacing;
use crate::error::{Result, ToolError};
use crate::model::{ScoreboardDocument, distinct_dates};

use self::client::{Filter, RemoteError, RestStore};
use self::names::{display_name, login_email, parse_name};
use self::rows::{
    COMMITMENTS, IMPORT_POD_NAME, IMPORTED_USER_STATUS, IdRow, ImportedUserRow,
    MEETING_ATTENDANCE, NewAttendance, NewBareCommitment, NewCommitment, NewMeeting, NewPod,
    NewUser, POD_MEETINGS, PODS, USERS, commitment_status,
};

/// Resolved user id per person name.
pub type UserIds = BTreeMap<String, Uuid>;
/// Resolved meeting id per date key.
pub type MeetingIds = BTreeMap<String, Uuid>;

const COMMITMENT_PROGRESS_EVERY: usize = 10;
const ATTENDANCE_PROGRESS_EVERY: usize = 20;

/// Pipeline step a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    User,
    Pod,
    Meeting,
    Commitment,
    Attendance,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::User => "user",
            Step::Pod => "pod",
            Step::Meeting => "meeting",
            Step::Commitment => "commitment",
            Step::Attendance => "attendance",
        };
        f.write_str(name)
    }
}

/// A remote call that failed, with the person and date it concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFailure {
    pub step: Step,
    pub person: Option<String>,
    pub date: Option<String>,
    pub reason: RemoteError,
}

impl fmt::Display for StepFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.step)?;
        if let Some(person) = &self.person {
            write!(f, " for {person}")?;
        }
        if let Some(date) = &self.date {
            write!(f, " on {date}")?;
        }
        write!(f, ": {}", self.reason)
    }
}

/// What an import run did, returned instead of only being logged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportSummary {
    pub users_created: usize,
    pub users_existing: usize,
    /// People left out of every later step because no user id was resolved.
    pub users_skipped: Vec<String>,
    pub pod_id: Option<Uuid>,
    pub meetings_created: usize,
    pub meetings_existing: usize,
    pub commitments_attempted: usize,
    pub commitments_imported: usize,
    pub attendance_attempted: usize,
    pub attendance_imported: usize,
    pub failures: Vec<StepFailure>,
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "users: {} created, {} existing, {} skipped",
            self.users_created,
            self.users_existing,
            self.users_skipped.len()
        )?;
        if let Some(pod_id) = self.pod_id {
            writeln!(f, "pod: {pod_id}")?;
        }
        writeln!(
            f,
            "meetings: {} created, {} existing",
            self.meetings_created, self.meetings_existing
        )?;
        writeln!(
            f,
            "commitments: {}/{} imported",
            self.commitments_imported, self.commitments_attempted
        )?;
        writeln!(
            f,
            "attendance: {}/{} imported",
            self.attendance_imported, self.attendance_attempted
        )?;
        write!(f, "failures: {}", self.failures.len())?;
        for failure in &self.failures {
            write!(f, "\n  - {failure}")?;
        }
        Ok(())
    }
}

enum Upsert {
    Created(Uuid),
    Existing(Uuid),
}

/// Runs the import steps against a [`RestStore`].
pub struct Importer<S> {
    store: S,
    pacing: WritePacing,
    summary: ImportSummary,
}

impl<S: RestStore> Importer<S> {
    pub fn new(store: S, pacing: WritePacing) -> Self {
        Self {
            store,
            pacing,
            summary: ImportSummary::default(),
        }
    }

    pub fn summary(&self) -> &ImportSummary {
        &self.summary
    }

    pub fn into_summary(self) -> ImportSummary {
        self.summary
    }

    /// Full import: users, pod, meetings, commitments, attendance.
    #[instrument(level = "info", skip_all, fields(people = document.len()))]
    pub fn run(&mut self, document: &ScoreboardDocument) -> Result<()> {
        let users = self.ensure_users(document);
        let pod_id = self.ensure_pod()?;
        let meetings = self.ensure_meetings(document, pod_id);
        self.import_commitments(document, &users);
        self.import_attendance(document, &users, &meetings);
        Ok(())
    }

    /// Commitments-only import for users created by an earlier full run.
    #[instrument(level = "info", skip_all, fields(people = document.len()))]
    pub fn run_commitments_only(&mut self, document: &ScoreboardDocument) -> Result<()> {
        let users = self.resolve_imported_users();
        if users.is_empty() {
            return Err(ToolError::NoImportedUsers);
        }
        self.import_bare_commitments(document, &users);
        Ok(())
    }

    /// Finds or creates one user per person. People whose user cannot be
    /// resolved are recorded and absent from the returned map.
    pub fn ensure_users(&mut self, document: &ScoreboardDocument) -> UserIds {
        let mut users = UserIds::new();

        for person in document.keys() {
            let (first_name, last_name) = parse_name(person);
            let email = login_email(&first_name, &last_name);
            let now = Utc::now().to_rfc3339();
            let row = NewUser {
                first_name,
                last_name,
                email: email.clone(),
                status: IMPORTED_USER_STATUS,
                is_active: true,
                created_at: now.clone(),
                updated_at: now,
            };

            match self.find_or_create(USERS, &[("email", email)], &row) {
                Ok(Upsert::Created(id)) => {
                    info!(person = %person, %id, "created user");
                    self.summary.users_created += 1;
                    users.insert(person.clone(), id);
                }
                Ok(Upsert::Existing(id)) => {
                    info!(person = %person, %id, "reusing existing user");
                    self.summary.users_existing += 1;
                    users.insert(person.clone(), id);
                }
                Err(reason) => {
                    self.record(Step::User, Some(person.as_str()), None, reason);
                    self.summary.users_skipped.push(person.clone());
                }
            }
        }

        info!(resolved = users.len(), "users ready");
        users
    }

    /// Finds or creates the pod every imported meeting hangs off. Without it
    /// no meeting can be created, so failure ends the run.
    pub fn ensure_pod(&mut self) -> Result<Uuid> {
        let row = NewPod::import_anchor(Utc::now().to_rfc3339());
        let filters = [("name", IMPORT_POD_NAME.to_string())];

        let pod_id = match self.find_or_create(PODS, &filters, &row) {
            Ok(Upsert::Created(id)) => {
                info!(%id, "created import pod");
                id
            }
            Ok(Upsert::Existing(id)) => {
                info!(%id, "reusing import pod");
                id
            }
            Err(reason) => {
                self.record(Step::Pod, None, None, reason.clone());
                return Err(ToolError::PodUnavailable(reason));
            }
        };

        self.summary.pod_id = Some(pod_id);
        Ok(pod_id)
    }

    /// Finds or creates one meeting per distinct date, in date order.
    pub fn ensure_meetings(&mut self, document: &ScoreboardDocument, pod_id: Uuid) -> MeetingIds {
        let mut meetings = MeetingIds::new();

        for date in distinct_dates(document) {
            let row = NewMeeting {
                pod_id,
                meeting_date: date.clone(),
                status: "completed",
                created_at: Utc::now().to_rfc3339(),
            };
            let filters = [("meeting_date", date.clone()), ("pod_id", pod_id.to_string())];

            match self.find_or_create(POD_MEETINGS, &filters, &row) {
                Ok(Upsert::Created(id)) => {
                    debug!(%date, %id, "created meeting");
                    self.summary.meetings_created += 1;
                    meetings.insert(date, id);
                }
                Ok(Upsert::Existing(id)) => {
                    debug!(%date, %id, "reusing meeting");
                    self.summary.meetings_existing += 1;
                    meetings.insert(date, id);
                }
                Err(reason) => self.record(Step::Meeting, None, Some(date.as_str()), reason),
            }
        }

        info!(resolved = meetings.len(), "meetings ready");
        meetings
    }

    /// Creates one commitment row per commitment with non-empty text, for
    /// every resolved person.
    pub fn import_commitments(&mut self, document: &ScoreboardDocument, users: &UserIds) {
        for (person, record) in document {
            let Some(&user_id) = users.get(person) else {
                warn!(person = %person, "skipping commitments; no user id resolved");
                continue;
            };

            for (date, entry) in record {
                let commitments = entry.commitments.iter();
                for commitment in commitments.filter(|c| !c.text.trim().is_empty()) {
                    let row = NewCommitment::from_entry(user_id, date, commitment);
                    self.create_commitment(&row, person, date);
                }
            }
        }

        info!(
            imported = self.summary.commitments_imported,
            attempted = self.summary.commitments_attempted,
            "commitments imported"
        );
    }

    /// Creates one attendance row per person and date that has both a user
    /// and a meeting.
    pub fn import_attendance(
        &mut self,
        document: &ScoreboardDocument,
        users: &UserIds,
        meetings: &MeetingIds,
    ) {
        for (person, record) in document {
            let Some(&user_id) = users.get(person) else {
                continue;
            };

            for (date, entry) in record {
                let Some(&meeting_id) = meetings.get(date) else {
                    debug!(person = %person, %date, "no meeting for date; skipping attendance");
                    continue;
                };

                let row = NewAttendance::from_entry(meeting_id, user_id, date, entry.attendance);
                self.summary.attendance_attempted += 1;
                match self.write(MEETING_ATTENDANCE, &row, self.pacing.row_delay) {
                    Ok(()) => {
                        self.summary.attendance_imported += 1;
                        if self.summary.attendance_imported % ATTENDANCE_PROGRESS_EVERY == 0 {
                            info!(
                                imported = self.summary.attendance_imported,
                                "attendance import progress"
                            );
                        }
                    }
                    Err(reason) => self.record(
                        Step::Attendance,
                        Some(person.as_str()),
                        Some(date.as_str()),
                        reason,
                    ),
                }
            }
        }

        info!(
            imported = self.summary.attendance_imported,
            attempted = self.summary.attendance_attempted,
            "attendance imported"
        );
    }

    /// Looks up users tagged by an earlier import, keyed by their rebuilt
    /// display name.
    pub fn resolve_imported_users(&mut self) -> UserIds {
        let filters = [("status", IMPORTED_USER_STATUS.to_string())];
        let rows = match self.store.select(USERS, &filters, "id,first_name,last_name") {
            Ok(rows) => rows,
            Err(reason) => {
                self.record(Step::User, None, None, reason);
                return UserIds::new();
            }
        };

        let mut users = UserIds::new();
        for row in rows {
            match serde_json::from_value::<ImportedUserRow>(row) {
                Ok(user) => {
                    let name = display_name(&user.first_name, user.last_name.as_deref());
                    debug!(person = %name, id = %user.id, "found imported user");
                    users.insert(name, user.id);
                }
                Err(error) => {
                    self.record(Step::User, None, None, RemoteError::Malformed(error.to_string()))
                }
            }
        }

        info!(resolved = users.len(), "imported users resolved");
        users
    }

    fn import_bare_commitments(&mut self, document: &ScoreboardDocument, users: &UserIds) {
        for (person, record) in document {
            let Some(&user_id) = users.get(person) else {
                warn!(person = %person, "skipping commitments; no imported user matches");
                continue;
            };

            for (date, entry) in record {
                for commitment in &entry.commitments {
                    if commitment.is_blank() {
                        // Placeholders count toward the total but are not sent.
                        self.summary.commitments_attempted += 1;
                        continue;
                    }
                    let row = NewBareCommitment {
                        user_id,
                        commitment: commitment.text.clone(),
                        status: commitment_status(commitment.fulfilled),
                    };
                    self.create_commitment(&row, person, date);
                }
            }
        }

        info!(
            imported = self.summary.commitments_imported,
            attempted = self.summary.commitments_attempted,
            "commitments imported"
        );
    }

    fn create_commitment<T: Serialize>(&mut self, row: &T, person: &str, date: &str) {
        self.summary.commitments_attempted += 1;
        match self.write(COMMITMENTS, row, self.pacing.row_delay) {
            Ok(()) => {
                self.summary.commitments_imported += 1;
                if self.summary.commitments_imported % COMMITMENT_PROGRESS_EVERY == 0 {
                    info!(
                        imported = self.summary.commitments_imported,
                        "commitment import progress"
                    );
                }
            }
            Err(reason) => self.record(Step::Commitment, Some(person), Some(date), reason),
        }
    }

    fn find_or_create<T: Serialize>(
        &mut self,
        table: &str,
        filters: &[Filter<'_>],
        row: &T,
    ) -> std::result::Result<Upsert, RemoteError> {
        if let Some(id) = self.find_id(table, filters)? {
            return Ok(Upsert::Existing(id));
        }
        self.write(table, row, self.pacing.entity_delay)?;
        let id = self
            .find_id(table, filters)?
            .ok_or_else(|| RemoteError::NotFound {
                table: table.to_string(),
            })?;
        Ok(Upsert::Created(id))
    }

    fn find_id(
        &mut self,
        table: &str,
        filters: &[Filter<'_>],
    ) -> std::result::Result<Option<Uuid>, RemoteError> {
        let rows = self.store.select(table, filters, "id")?;
        rows.into_iter()
            .next()
            .map(|row| {
                serde_json::from_value::<IdRow>(row)
                    .map(|row| row.id)
                    .map_err(|error| RemoteError::Malformed(error.to_string()))
            })
            .transpose()
    }

    /// Inserts a row, then pauses whether or not the insert succeeded.
    fn write<T: Serialize>(
        &mut self,
        table: &str,
        row: &T,
        delay: Duration,
    ) -> std::result::Result<(), RemoteError> {
        let result = self.store.insert(table, row);
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        result
    }

    fn record(&mut self, step: Step, person: Option<&str>, date: Option<&str>, reason: RemoteError) {
        warn!(%step, person, date, %reason, "remote call failed");
        self.summary.failures.push(StepFailure {
            step,
            person: person.map(str::to_string),
            date: date.map(str::to_string),
            reason,
        });
    }
}
