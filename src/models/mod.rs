pub mod announcement;
pub mod assignment;
pub mod attendance;
pub mod course;
pub mod department;
pub mod enrollment;
pub mod office_hour;
pub mod profile;
pub mod report;
pub mod section;
pub mod submission;
pub mod user;

pub use announcement::{Announcement, NewAnnouncement, UpdateAnnouncement};
pub use assignment::{Assignment, NewAssignment, UpdateAssignment};
pub use attendance::{
    AttendanceRatio, AttendanceRecord, AttendanceStatus, NewAttendance, UpdateAttendance,
};
pub use course::{
    Course, CourseSummary, NewCourse, NewPrerequisite, Prerequisite, TaughtCourse, UpdateCourse,
};
pub use department::{Department, NewDepartment, UpdateDepartment};
pub use enrollment::{CompletionStatus, EnrollRequest, EnrollmentDetail, UpdateEnrollment};
pub use office_hour::{DayOfWeek, NewOfficeHour, OfficeHourSlot, UpdateOfficeHour};
pub use profile::{
    GpaSummary, InstructorProfileView, StudentProfileView, TranscriptEntry,
    UpdateInstructorProfile, UpdateStudentProfile,
};
pub use report::{AtRiskStudent, CourseDifficultyRow, InstructorWorkloadRow, RiskAggregateRow};
pub use section::{NewSection, SectionOverview, UpdateSection};
pub use submission::{AssignmentSubmission, GradeRequest, NewSubmission, StudentSubmission};
pub use user::{
    CreateUserRequest, LoginRequest, PasswordChangeRequest, RegisterRequest, Role,
    UpdateUserRequest, UserView,
};

use serde::Serialize;

/// Confirmation body for mutations.
#[derive(Debug, Serialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Confirmation body for creations, carrying the new row id.
#[derive(Debug, Serialize)]
pub struct Created {
    pub message: String,
    pub id: i64,
}

impl Created {
    pub fn new(message: impl Into<String>, id: i64) -> Self {
        Self { message: message.into(), id }
    }
}
