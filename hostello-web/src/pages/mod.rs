mod admin_dashboard;
mod home_redirect;
pub mod login;
mod notifications;
mod rector_dashboard;
mod root_register;
mod student_dashboard;

pub use admin_dashboard::AdminDashboardPage;
pub use home_redirect::HomeRedirect;
pub use login::LoginPage;
pub use notifications::NotificationsPage;
pub use rector_dashboard::RectorDashboardPage;
pub use root_register::RootRegisterPage;
pub use student_dashboard::StudentDashboardPage;
