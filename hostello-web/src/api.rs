use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use shared::models::{
    AdminStats, Allotment, ApiError, AttendanceLog, ComplaintSummary, LoginRequest, LoginResponse,
    Notification, Profile, RecordId, RectorStats, RefreshRequest, RefreshResponse, Role,
    RootAdminRequest, RootAdminStatus, StudentOverview,
};
use shared::session::{AuthBackend, CredentialStore, NotificationBackend, RootAdminBackend};
use std::cell::{OnceCell, RefCell};
use std::rc::Rc;
use tracing::{debug, warn};
use yew::Callback;

use crate::config::FrontendConfig;
use crate::storage::BrowserStorage;

const PROFILE_PATH: &str = "auth/login/profile";
const NOTIFICATIONS_PATH: &str = "login/notifications";

thread_local! {
    static SHARED_CLIENT: OnceCell<HostelloClient> = const { OnceCell::new() };
}

/// HTTP gateway to the Hostello REST backend.
///
/// Every request carries the stored access token as a bearer credential and
/// every failure comes back as an [`ApiError`]. A 401/403 from a protected
/// endpoint is also reported to the registered unauthorized handler.
#[derive(Clone, Debug)]
pub struct HostelloClient {
    base_url: String,
    client: Client,
    credentials: CredentialStore,
    unauthorized: Rc<RefCell<Option<Callback<ApiError>>>>,
}

impl HostelloClient {
    /// Create a new API client with the provided base URL.
    pub fn new(base_url: &str, credentials: CredentialStore) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
            credentials,
            unauthorized: Rc::default(),
        }
    }

    /// Client over `localStorage` and the configured base URL, created once per thread.
    pub fn shared() -> Self {
        SHARED_CLIENT.with(|cell| {
            cell.get_or_init(|| {
                let config = FrontendConfig::new();
                let credentials = CredentialStore::new(Rc::new(BrowserStorage));
                Self::new(config.api_base_url(), credentials)
            })
            .clone()
        })
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Route auth failures of protected calls to `handler`, replacing any previous one.
    pub fn on_unauthorized(&self, handler: Option<Callback<ApiError>>) {
        *self.unauthorized.borrow_mut() = handler;
    }

    pub(crate) fn report_unauthorized(&self, error: &ApiError) {
        let handler = self.unauthorized.borrow().clone();
        match handler {
            Some(handler) => handler.emit(error.clone()),
            None => debug!("auth failure with no handler registered"),
        }
    }

    pub(crate) fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.credentials.access_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request to a protected endpoint.
    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let result = self.send_unguarded(request).await;
        if let Err(error) = &result {
            if error.is_auth_failure() {
                self.report_unauthorized(error);
            }
        }
        result
    }

    /// Send a request whose auth failures belong to the caller: session
    /// endpoints and the public root admin endpoints.
    async fn send_unguarded(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|error| ApiError::transport(error.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let reason = status.canonical_reason();
        let body = response.json::<Value>().await.ok();
        let error = ApiError::from_response(status.as_u16(), body, reason);
        debug!(status = status.as_u16(), message = %error.message, "request rejected");
        Err(error)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        response
            .json::<T>()
            .await
            .map_err(|error| ApiError::transport(error.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(self.client.get(self.api_url(path))).await?;
        Self::read_json(response).await
    }

    async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self
            .send(self.client.post(self.api_url(path)).json(body))
            .await?;
        Self::read_json(response).await
    }

    async fn session_json<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self
            .send_unguarded(self.client.post(self.api_url(path)).json(body))
            .await?;
        Self::read_json(response).await
    }

    /// `POST /admin/register-root`
    pub async fn register_root_admin(&self, request: &RootAdminRequest) -> Result<Value, ApiError> {
        let response = self
            .send_unguarded(self.client.post(self.api_url("admin/register-root")).json(request))
            .await?;
        Ok(response.json::<Value>().await.unwrap_or(Value::Null))
    }

    pub async fn root_admin_status(&self) -> Result<RootAdminStatus, ApiError> {
        let response = self
            .send_unguarded(self.client.get(self.api_url("admin/exists")))
            .await?;
        Self::read_json(response).await
    }

    pub async fn student_profile(&self) -> Result<Profile, ApiError> {
        self.get_json("auth/login/student/profile").await
    }

    /// Admin landing statistics; each figure degrades on its own.
    pub async fn admin_stats(&self) -> AdminStats {
        let empty_filter = json!({});
        let (users, students, notifications, health) = futures_util::join!(
            self.get_json::<Vec<Value>>("auth/login/admin/listUsers"),
            self.get_json::<Vec<Value>>("auth/login/admin/students/list"),
            self.post_json::<Value, _>("auth/login/admin/notifications/filter", &empty_filter),
            self.root_admin_status(),
        );
        AdminStats::from_settled(users, students, notifications, health)
    }

    /// Rector landing statistics for `today`; each figure degrades on its own.
    pub async fn rector_stats(&self, today: chrono::NaiveDate) -> RectorStats {
        let (attendance, complaints, rooms, allotments) = futures_util::join!(
            self.get_json::<Vec<AttendanceLog>>("auth/login/rector/attendanceLog"),
            self.get_json::<Vec<ComplaintSummary>>(Role::Rector.endpoints().complaints),
            self.get_json::<Vec<Value>>("auth/login/rector/roomList"),
            self.get_json::<Vec<Allotment>>("auth/login/rector/viewAllotments"),
        );
        RectorStats::from_settled(attendance, complaints, rooms, allotments, today)
    }

    pub async fn student_overview(&self) -> StudentOverview {
        let (profile, notifications) = futures_util::join!(
            self.student_profile(),
            self.list_notifications(Role::Student),
        );
        StudentOverview::from_settled(profile, notifications)
    }
}

#[async_trait(?Send)]
impl AuthBackend for HostelloClient {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.session_json("auth/login", request).await
    }

    async fn profile(&self) -> Result<Profile, ApiError> {
        let response = self
            .send_unguarded(self.client.get(self.api_url(PROFILE_PATH)))
            .await?;
        Self::read_json(response).await
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<RefreshResponse, ApiError> {
        let request = RefreshRequest {
            refresh_token: refresh_token.to_string(),
        };
        self.session_json("auth/refreshToken", &request).await
    }

    async fn logout(&self, role: Option<Role>) -> Result<(), ApiError> {
        let path = Role::logout_path(role);
        self.send_unguarded(self.client.post(self.api_url(path))).await?;
        Ok(())
    }
}

#[async_trait(?Send)]
impl RootAdminBackend for HostelloClient {
    async fn root_admin_exists(&self) -> Result<bool, ApiError> {
        self.root_admin_status().await.map(|status| status.exists)
    }
}

#[async_trait(?Send)]
impl NotificationBackend for HostelloClient {
    async fn list_notifications(&self, role: Role) -> Result<Vec<Notification>, ApiError> {
        let url = self.api_url(&format!("{NOTIFICATIONS_PATH}/view"));
        let response = self
            .send(self.client.get(url).query(&[("role", role.as_str())]))
            .await?;
        let body: Value = Self::read_json(response).await?;
        match body {
            Value::Null => Ok(Vec::new()),
            Value::Array(_) => serde_json::from_value(body)
                .map_err(|error| ApiError::transport(error.to_string())),
            other => {
                warn!(kind = ?other, "notification list was not an array");
                Ok(Vec::new())
            }
        }
    }

    async fn mark_read(&self, id: &RecordId) -> Result<(), ApiError> {
        let url = self.api_url(&format!("{NOTIFICATIONS_PATH}/readStatus"));
        self.send(self.client.put(url).query(&[("notificationId", id.as_str())]))
            .await?;
        Ok(())
    }

    async fn delete_notification(&self, id: &RecordId) -> Result<(), ApiError> {
        let url = self.api_url(&format!("{NOTIFICATIONS_PATH}/delete"));
        self.send(self.client.delete(url).query(&[("notificationId", id.as_str())]))
            .await?;
        Ok(())
    }

    async fn delete_notifications(&self, ids: &[RecordId]) -> Result<(), ApiError> {
        let url = self.api_url(&format!("{NOTIFICATIONS_PATH}/deleteMultiple"));
        self.send(self.client.post(url).json(ids)).await?;
        Ok(())
    }
}
