use shared::session::{Session, SessionManager};
use std::rc::Rc;
use yewdux::{Dispatch, Store};

use crate::api::HostelloClient;

/// Snapshot of the session published to every component.
#[derive(Default, Clone, PartialEq, Store)]
pub struct AppState {
    pub session: Session,
}

/// The session manager, provided through a Yew context.
#[derive(Clone)]
pub struct SessionHandle(Rc<SessionManager<HostelloClient>>);

impl PartialEq for SessionHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl SessionHandle {
    pub fn new(client: HostelloClient) -> Self {
        let credentials = client.credentials().clone();
        Self(Rc::new(SessionManager::new(client, credentials)))
    }

    pub fn manager(&self) -> &SessionManager<HostelloClient> {
        &self.0
    }

    pub fn client(&self) -> &HostelloClient {
        self.0.backend()
    }

    /// Copy the manager's current state into the store.
    pub fn publish(&self, dispatch: &Dispatch<AppState>) {
        let session = self.0.snapshot();
        dispatch.reduce_mut(move |state| state.session = session);
    }
}
