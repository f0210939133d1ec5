//! Process-wide cache of the signed-in user.

use log::{debug, warn};
use std::sync::{Arc, RwLock};

use crate::gateway::{AuthGateway, AuthenticatedUser, GatewayError};

/// Read-only view handed to consumers.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    /// The signed-in user as of the last refresh, if any.
    pub user: Option<AuthenticatedUser>,
    /// True until the first load has completed.
    pub loading: bool,
}

#[derive(Debug)]
struct SessionState {
    user: Option<AuthenticatedUser>,
    loading: bool,
}

/// Single writer over the current-user snapshot.
///
/// Constructed explicitly with its gateway dependency and shared (via
/// `Clone`) with every consumer; there is no ambient global to reach
/// for. State transitions are whole-object replacements: the initial
/// load, an explicit refresh after sign-in, and the clear on sign-out.
#[derive(Clone)]
pub struct SessionCoordinator {
    gateway: Arc<AuthGateway>,
    state: Arc<RwLock<SessionState>>,
}

impl SessionCoordinator {
    /// Create a coordinator over the given gateway.
    ///
    /// Starts in the loading state; call [`initialize`](Self::initialize)
    /// to perform the first load.
    pub fn new(gateway: Arc<AuthGateway>) -> Self {
        Self {
            gateway,
            state: Arc::new(RwLock::new(SessionState {
                user: None,
                loading: true,
            })),
        }
    }

    /// First load: resolve the current user and leave the loading
    /// state, whatever the outcome.
    pub async fn initialize(&self) {
        self.refresh_user().await;
    }

    /// Re-resolve the current user and replace the snapshot wholesale.
    ///
    /// Any failure on the load path degrades to "no user"; an error
    /// never escapes, so consumers always reach a determinate state.
    pub async fn refresh_user(&self) {
        let user = match self.gateway.current_user().await {
            Ok(user) => user,
            Err(err) => {
                warn!("failed to load current user: {}", err);
                None
            }
        };

        debug!(
            "session refreshed: {}",
            user.as_ref().map_or("no user", |u| u.user_id.as_str())
        );
        self.replace(user);
    }

    /// Sign out via the gateway and clear the local user.
    ///
    /// The clear happens even when the provider call fails; a stale
    /// "signed in" snapshot must never outlive the user's intent.
    pub async fn sign_out(&self) -> Result<(), GatewayError> {
        let result = self.gateway.sign_out().await;
        self.replace(None);
        result
    }

    /// Current view of the session.
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.read().expect("session state lock poisoned");
        SessionSnapshot {
            user: state.user.clone(),
            loading: state.loading,
        }
    }

    fn replace(&self, user: Option<AuthenticatedUser>) {
        let mut state = self.state.write().expect("session state lock poisoned");
        *state = SessionState {
            user,
            loading: false,
        };
    }
}
