use crate::components::protected_route::ProtectedRoute;
use crate::containers::layout::Layout;
use crate::pages::*;
use shared::guard::roles_for_path;
use shared::models::Role;
use strum::EnumIter;
use tracing::debug;
use yew::prelude::*;
use yew_router::prelude::*;

/// The main routes
#[derive(Debug, Clone, PartialEq, Routable, EnumIter)]
pub enum MainRoute {
    #[at("/")]
    Home,
    #[at("/login")]
    Login,
    #[at("/root-register")]
    RootRegister,
    #[at("/admin")]
    AdminRoot,
    #[at("/admin/dashboard")]
    AdminDashboard,
    #[at("/rector")]
    RectorRoot,
    #[at("/rector/dashboard")]
    RectorDashboard,
    #[at("/student")]
    StudentRoot,
    #[at("/student/dashboard")]
    StudentDashboard,
    #[at("/student/notifications")]
    StudentNotifications,
    #[not_found]
    #[at("/404")]
    NotFound,
}

impl MainRoute {
    /// Roles admitted by a guarded route; `None` for public routes.
    pub fn allowed_roles(&self) -> Option<&'static [Role]> {
        if self.is_protected() {
            roles_for_path(&self.to_path())
        } else {
            None
        }
    }

    /// Whether the route sits behind the route guard.
    pub fn is_protected(&self) -> bool {
        matches!(
            self,
            Self::AdminDashboard
                | Self::RectorDashboard
                | Self::StudentDashboard
                | Self::StudentNotifications
        )
    }

    /// Route for an application path, falling back to [`MainRoute::Home`].
    pub fn for_path(path: &str) -> Self {
        Self::recognize(path).unwrap_or(Self::Home)
    }
}

/// Location a visitor was turned away from, carried to the login page as history state.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginOrigin(pub String);

/// One-off message shown on the login page after another page sent the visitor there.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginNotice(pub String);

fn guarded(route: MainRoute, page: Html) -> Html {
    html! {
        <ProtectedRoute route={route.clone()}>
            <Layout current_route={route}>
                { page }
            </Layout>
        </ProtectedRoute>
    }
}

/// Switch function for the main routes.
pub fn switch(route: MainRoute) -> Html {
    debug!(route = ?route, "switching route");
    match route {
        MainRoute::Home | MainRoute::NotFound => html! { <HomeRedirect /> },
        MainRoute::Login => html! { <LoginPage /> },
        MainRoute::RootRegister => html! { <RootRegisterPage /> },
        MainRoute::AdminRoot => html! { <Redirect<MainRoute> to={MainRoute::AdminDashboard} /> },
        MainRoute::RectorRoot => html! { <Redirect<MainRoute> to={MainRoute::RectorDashboard} /> },
        MainRoute::StudentRoot => {
            html! { <Redirect<MainRoute> to={MainRoute::StudentDashboard} /> }
        }
        MainRoute::AdminDashboard => guarded(route, html! { <AdminDashboardPage /> }),
        MainRoute::RectorDashboard => guarded(route, html! { <RectorDashboardPage /> }),
        MainRoute::StudentDashboard => guarded(route, html! { <StudentDashboardPage /> }),
        MainRoute::StudentNotifications => guarded(route, html! { <NotificationsPage /> }),
    }
}
