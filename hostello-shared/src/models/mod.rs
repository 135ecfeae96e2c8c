//! Wire types of the Hostello backend and the values derived from them.

pub mod dashboard;
pub mod errors;
pub mod notification;
pub mod role;
pub mod setup;
pub mod user;

pub use dashboard::{
    AdminStats, Allotment, AttendanceLog, ComplaintSummary, OutingStudent, RectorStats,
    StudentOverview, SystemStatus,
};
pub use errors::ApiError;
pub use notification::{DisplayedNotification, Notification, RecordId};
pub use role::{
    HOME_PATH, LOGIN_PATH, ROOT_REGISTER_PATH, Role, RoleEndpoints, dashboard_path,
    normalize_role,
};
pub use setup::{RootAdminRequest, RootAdminStatus};
pub use user::{
    Credentials, LoginRequest, LoginResponse, Profile, RefreshRequest, RefreshResponse,
    SessionUser,
};
