//! Tables the import expects to exist. The store's REST interface cannot run
//! DDL, so this is printed for an administrator to apply by hand.

pub const POD_MEETINGS_DDL: &str = "\
CREATE TABLE IF NOT EXISTS pod_meetings (
    id uuid NOT NULL DEFAULT gen_random_uuid(),
    pod_id uuid NULL,
    meeting_date date NOT NULL,
    scheduled_time time NULL,
    status varchar(20) DEFAULT 'completed',
    created_at timestamp with time zone DEFAULT now(),
    CONSTRAINT pod_meetings_pkey PRIMARY KEY (id),
    CONSTRAINT pod_meetings_pod_id_fkey FOREIGN KEY (pod_id) REFERENCES pods(id) ON DELETE CASCADE
);";

pub const MEET_PARTICIPANTS_DDL: &str = "\
CREATE TABLE IF NOT EXISTS meet_participants (
    id uuid NOT NULL DEFAULT gen_random_uuid(),
    meeting_id uuid NULL,
    user_id uuid NULL,
    join_time timestamp with time zone NULL,
    leave_time timestamp with time zone NULL,
    duration_minutes integer NULL DEFAULT 0,
    created_at timestamp with time zone DEFAULT now(),
    CONSTRAINT meet_participants_pkey PRIMARY KEY (id),
    CONSTRAINT meet_participants_user_id_fkey FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
);";

pub const MEETING_ATTENDANCE_DDL: &str = "\
CREATE TABLE IF NOT EXISTS meeting_attendance (
    id uuid NOT NULL DEFAULT gen_random_uuid(),
    meeting_id uuid NULL,
    user_id uuid NULL,
    attended boolean NULL DEFAULT false,
    duration_minutes integer NULL DEFAULT 0,
    created_at timestamp with time zone NULL DEFAULT now(),
    meet_participant_id uuid NULL,
    detection_method character varying(50) NULL DEFAULT 'manual'::character varying,
    meet_join_time timestamp with time zone NULL,
    meet_leave_time timestamp with time zone NULL,
    meet_duration_minutes integer NULL,
    meet_reconnect_count integer NULL DEFAULT 0,
    meet_device_type character varying(50) NULL,
    confidence_score double precision NULL DEFAULT 1.0,
    CONSTRAINT meeting_attendance_pkey PRIMARY KEY (id),
    CONSTRAINT meeting_attendance_meeting_id_user_id_key UNIQUE (meeting_id, user_id),
    CONSTRAINT meeting_attendance_meet_participant_id_fkey FOREIGN KEY (meet_participant_id) REFERENCES meet_participants (id),
    CONSTRAINT meeting_attendance_meeting_id_fkey FOREIGN KEY (meeting_id) REFERENCES pod_meetings (id) ON DELETE CASCADE,
    CONSTRAINT meeting_attendance_user_id_fkey FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_meeting_attendance_meet_participant ON meeting_attendance USING btree (meet_participant_id);
CREATE INDEX IF NOT EXISTS idx_meeting_attendance_detection_method ON meeting_attendance USING btree (detection_method);";

/// The full script, in dependency order.
pub fn required_schema() -> String {
    [POD_MEETINGS_DDL, MEET_PARTICIPANTS_DDL, MEETING_ATTENDANCE_DDL].join("\n\n")
}
