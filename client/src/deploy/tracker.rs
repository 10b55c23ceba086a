//! Polling loop that waits for a deployment to leave the active list

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::deploy::fsm::{TrackerEvent, TrackerFsm, TrackerState};
use crate::http::deployments::list_deployments;
use crate::http::Transport;

/// Tracker options
#[derive(Debug, Clone)]
pub struct Options {
    /// Delay between two fetches of the deployment list
    pub poll_interval: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
        }
    }
}

/// Poll until deployment `id` is gone, the deadline passes or the list
/// cannot be fetched
///
/// The deadline is fixed once at entry to `now + timeout`.
pub async fn track<S, F>(
    transport: &dyn Transport,
    id: &str,
    timeout: Duration,
    options: &Options,
    sleep_fn: S,
) -> TrackerState
where
    S: Fn(Duration) -> F,
    F: Future<Output = ()>,
{
    let deadline = Instant::now() + timeout;
    let mut fsm = TrackerFsm::new();
    debug!("Tracker: {} timeout={:?}", id, timeout);

    loop {
        let event = match list_deployments(transport).await {
            Ok(deployments) => TrackerEvent::Observed {
                present: deployments.iter().any(|d| d.id == id),
                deadline_passed: Instant::now() > deadline,
            },
            Err(e) => TrackerEvent::FetchFailed(e.to_string()),
        };

        if let Err(e) = fsm.process(event) {
            warn!("Tracker: {}", e);
            break;
        }
        if fsm.is_terminal() {
            break;
        }
        debug!("Tracker: {} still in progress (poll {})", id, fsm.polls());
        sleep_fn(options.poll_interval).await;
    }

    let polls = fsm.polls();
    let state = fsm.into_state();
    info!("Tracker: {} finished as {:?} after {} polls", id, state, polls);
    state
}
