//! Single-flight route coordination.
//!
//! The coordinator tracks one selected landmark at a time. Each request is
//! stamped with a sequence number when issued; when its fetch completes the
//! result is committed only if no later request has been issued since. The
//! superseded fetch is not aborted, its result is just dropped.
//!
//! The sequence number and state live together inside a `watch` channel, so
//! the staleness check and the commit are a single step under the channel's
//! lock. Subscribers are notified on every committed transition.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info, warn};

use crate::directions::RouteFetcher;
use crate::domain::{Landmark, LandmarkId, LatLng};

use super::state::{Completion, RouteState};

/// Everything the coordinator tracks, guarded by the watch channel.
#[derive(Debug)]
struct Tracked {
    /// Sequence number of the most recently issued request.
    seq: u64,
    /// Device location used as the origin of new requests.
    origin: LatLng,
    /// Current selection, kept so it can be reloaded.
    selection: Option<Selection>,
    state: RouteState,
}

#[derive(Debug, Clone)]
struct Selection {
    landmark: LandmarkId,
    destination: LatLng,
}

impl Selection {
    fn of(landmark: &Landmark) -> Self {
        Self {
            landmark: landmark.id.clone(),
            destination: landmark.location,
        }
    }
}

/// A request captured at issue time.
#[derive(Debug)]
struct Ticket {
    seq: u64,
    landmark: LandmarkId,
    origin: LatLng,
    destination: LatLng,
}

/// Coordinates route requests for the selected landmark.
///
/// Cloning is cheap and clones share state, so a clone can be moved into a
/// spawned task.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use landmark_server::directions::StraightLineRoutes;
/// use landmark_server::domain::LatLng;
/// use landmark_server::route::{RouteCoordinator, RouteState};
///
/// let origin = LatLng::new(14.5896, 120.9747).unwrap();
/// let routes = RouteCoordinator::new(Arc::new(StraightLineRoutes::new()), origin);
/// assert_eq!(routes.state(), RouteState::Idle);
/// ```
#[derive(Clone)]
pub struct RouteCoordinator {
    fetcher: Arc<dyn RouteFetcher>,
    tracked: Arc<watch::Sender<Tracked>>,
}

impl RouteCoordinator {
    /// Create an idle coordinator fetching from `origin`.
    pub fn new(fetcher: Arc<dyn RouteFetcher>, origin: LatLng) -> Self {
        let (tracked, _) = watch::channel(Tracked {
            seq: 0,
            origin,
            selection: None,
            state: RouteState::Idle,
        });

        Self {
            fetcher,
            tracked: Arc::new(tracked),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> RouteState {
        self.tracked.borrow().state.clone()
    }

    /// The device location new requests will start from.
    pub fn origin(&self) -> LatLng {
        self.tracked.borrow().origin
    }

    /// Update the device location.
    ///
    /// Only affects requests issued afterwards; in-flight requests keep the
    /// origin they were issued with.
    pub fn update_origin(&self, origin: LatLng) {
        self.tracked.send_if_modified(|t| {
            t.origin = origin;
            false
        });
    }

    /// Watch state transitions.
    pub fn subscribe(&self) -> RouteSubscription {
        RouteSubscription {
            rx: self.tracked.subscribe(),
        }
    }

    /// Select `landmark` and request a route to it.
    ///
    /// The state moves to `Loading` immediately, before the returned future
    /// is polled, and any earlier request becomes stale. The future performs
    /// the fetch and resolves to whether its result was applied.
    pub fn request_route(&self, landmark: &Landmark) -> BoxFuture<'static, Completion> {
        let (_, fetch) = self.issue(Selection::of(landmark));
        fetch
    }

    /// Request the route to the current selection again.
    ///
    /// Works from any non-idle state, including `Ready`. Returns `None` if
    /// nothing has been selected.
    pub fn reload(&self) -> Option<BoxFuture<'static, Completion>> {
        let selection = self.tracked.borrow().selection.clone()?;
        let (_, fetch) = self.issue(selection);
        Some(fetch)
    }

    /// Like [`request_route`](Self::request_route), running the fetch on a
    /// spawned task.
    pub fn spawn_request(&self, landmark: &Landmark) -> RouteTask {
        let (issued, fetch) = self.issue(Selection::of(landmark));
        RouteTask::spawn(issued, fetch)
    }

    /// Like [`reload`](Self::reload), running the fetch on a spawned task.
    pub fn spawn_reload(&self) -> Option<RouteTask> {
        let selection = self.tracked.borrow().selection.clone()?;
        let (issued, fetch) = self.issue(selection);
        Some(RouteTask::spawn(issued, fetch))
    }

    /// Begin a request and return the state it committed along with the
    /// fetch that completes it.
    fn issue(&self, selection: Selection) -> (RouteState, BoxFuture<'static, Completion>) {
        let ticket = self.begin(selection);
        let issued = RouteState::Loading {
            landmark: ticket.landmark.clone(),
        };
        (issued, self.clone().run(ticket).boxed())
    }

    /// Issue a new request: bump the sequence and enter `Loading`.
    fn begin(&self, selection: Selection) -> Ticket {
        let landmark = selection.landmark.clone();
        let destination = selection.destination;

        // Both are overwritten under the lock
        let mut seq = 0;
        let mut origin = destination;

        self.tracked.send_modify(|t| {
            t.seq += 1;
            seq = t.seq;
            origin = t.origin;
            t.state = RouteState::Loading {
                landmark: landmark.clone(),
            };
            t.selection = Some(selection);
        });

        info!(%landmark, seq, "requesting route");
        Ticket {
            seq,
            landmark,
            origin,
            destination,
        }
    }

    /// Fetch the route for `ticket` and commit it if still current.
    async fn run(self, ticket: Ticket) -> Completion {
        let result = self
            .fetcher
            .fetch_route(ticket.origin, ticket.destination)
            .await;

        let next = match result {
            Ok(route) => RouteState::Ready {
                landmark: ticket.landmark.clone(),
                route,
            },
            Err(e) => {
                warn!(landmark = %ticket.landmark, seq = ticket.seq, error = %e, "route request failed");
                RouteState::Failed {
                    landmark: ticket.landmark.clone(),
                    reason: e.reason(),
                }
            }
        };

        let mut applied = false;
        self.tracked.send_if_modified(|t| {
            if t.seq != ticket.seq {
                return false;
            }
            t.state = next.clone();
            applied = true;
            true
        });

        if applied {
            Completion::Applied(next)
        } else {
            debug!(landmark = %ticket.landmark, seq = ticket.seq, "discarding stale route result");
            Completion::Superseded
        }
    }
}

/// A route request whose fetch runs on a spawned task.
///
/// Awaiting it yields the fetch's [`Completion`]. Dropping it detaches the
/// task; the result is still committed if current.
#[derive(Debug)]
pub struct RouteTask {
    issued: RouteState,
    handle: JoinHandle<Completion>,
}

impl RouteTask {
    fn spawn(issued: RouteState, fetch: BoxFuture<'static, Completion>) -> Self {
        Self {
            issued,
            handle: tokio::spawn(fetch),
        }
    }

    /// The `Loading` state committed when the request was issued.
    ///
    /// Unlike [`RouteCoordinator::state`], this is unaffected by anything
    /// that happened since.
    pub fn issued(&self) -> &RouteState {
        &self.issued
    }
}

impl Future for RouteTask {
    type Output = Result<Completion, JoinError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.handle.poll_unpin(cx)
    }
}

/// Receives route state transitions.
///
/// Transitions that happen faster than the subscriber reads them are
/// coalesced: `changed` yields the latest state, not every intermediate one.
pub struct RouteSubscription {
    rx: watch::Receiver<Tracked>,
}

impl RouteSubscription {
    /// The state as of now.
    pub fn current(&self) -> RouteState {
        self.rx.borrow().state.clone()
    }

    /// Wait for the next transition and return the new state.
    ///
    /// Returns `None` once the coordinator has been dropped.
    pub async fn changed(&mut self) -> Option<RouteState> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().state.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use tokio::sync::oneshot;

    use super::*;
    use crate::directions::{FailureReason, RouteError, RouteMetrics};

    type Reply = Result<RouteMetrics, RouteError>;

    /// A fetch that has been issued but not yet answered.
    struct Pending {
        destination: LatLng,
        reply: oneshot::Sender<Reply>,
    }

    /// Fetcher whose calls stay pending until the test answers them.
    #[derive(Default)]
    struct ScriptedFetcher {
        pending: Mutex<Vec<Pending>>,
        issued: Mutex<Vec<(LatLng, LatLng)>>,
    }

    impl ScriptedFetcher {
        /// Yield until at least `n` fetches have been issued in total.
        async fn wait_for_calls(&self, n: usize) {
            while self.issued.lock().unwrap().len() < n {
                tokio::task::yield_now().await;
            }
        }

        /// Answer the oldest pending fetch to `destination`.
        fn answer(&self, destination: LatLng, reply: Reply) {
            let mut pending = self.pending.lock().unwrap();
            let idx = pending
                .iter()
                .position(|p| p.destination == destination)
                .expect("no pending fetch to destination");
            let call = pending.remove(idx);
            let _ = call.reply.send(reply);
        }

        fn origins(&self) -> Vec<LatLng> {
            self.issued.lock().unwrap().iter().map(|(o, _)| *o).collect()
        }
    }

    impl RouteFetcher for ScriptedFetcher {
        fn fetch_route(&self, origin: LatLng, destination: LatLng) -> BoxFuture<'_, Reply> {
            let (reply, rx) = oneshot::channel();
            self.pending.lock().unwrap().push(Pending {
                destination,
                reply,
            });
            self.issued.lock().unwrap().push((origin, destination));
            async move {
                rx.await
                    .unwrap_or_else(|_| Err(RouteError::Network("fetch dropped".into())))
            }
            .boxed()
        }
    }

    fn landmark(id: &str, lat: f64, lng: f64) -> Landmark {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": id,
            "location": {"lat": lat, "lng": lng},
        }))
        .unwrap()
    }

    fn id(s: &str) -> LandmarkId {
        LandmarkId::new(s).unwrap()
    }

    fn origin() -> LatLng {
        LatLng::new(14.5896, 120.9747).unwrap()
    }

    fn setup() -> (Arc<ScriptedFetcher>, RouteCoordinator) {
        let fetcher = Arc::new(ScriptedFetcher::default());
        let coordinator = RouteCoordinator::new(fetcher.clone(), origin());
        (fetcher, coordinator)
    }

    fn route(meters: f64) -> RouteMetrics {
        RouteMetrics::new(meters, meters / 1.4)
    }

    #[test]
    fn starts_idle() {
        let (_, coordinator) = setup();
        assert_eq!(coordinator.state(), RouteState::Idle);
        assert_eq!(coordinator.origin(), origin());
    }

    #[tokio::test]
    async fn select_then_ready() {
        let (fetcher, coordinator) = setup();
        let a = landmark("a", 14.5950, 120.9694);

        let task = coordinator.spawn_request(&a);
        assert_eq!(coordinator.state(), RouteState::Loading { landmark: id("a") });

        fetcher.wait_for_calls(1).await;
        fetcher.answer(a.location, Ok(route(800.0)));

        let expected = RouteState::Ready {
            landmark: id("a"),
            route: route(800.0),
        };
        assert_eq!(task.await.unwrap(), Completion::Applied(expected.clone()));
        assert_eq!(coordinator.state(), expected);
    }

    #[tokio::test]
    async fn stale_result_is_discarded() {
        let (fetcher, coordinator) = setup();
        let a = landmark("a", 14.5950, 120.9694);
        let b = landmark("b", 14.5913, 120.9733);

        let task_a = coordinator.spawn_request(&a);
        fetcher.wait_for_calls(1).await;
        assert_eq!(coordinator.state(), RouteState::Loading { landmark: id("a") });

        let task_b = coordinator.spawn_request(&b);
        fetcher.wait_for_calls(2).await;
        assert_eq!(coordinator.state(), RouteState::Loading { landmark: id("b") });

        // A resolves after B was selected
        fetcher.answer(a.location, Ok(route(800.0)));
        assert_eq!(task_a.await.unwrap(), Completion::Superseded);
        assert_eq!(coordinator.state(), RouteState::Loading { landmark: id("b") });

        fetcher.answer(b.location, Ok(route(300.0)));
        assert!(matches!(task_b.await.unwrap(), Completion::Applied(_)));
        assert_eq!(
            coordinator.state(),
            RouteState::Ready {
                landmark: id("b"),
                route: route(300.0),
            }
        );
    }

    #[tokio::test]
    async fn task_reports_state_it_issued() {
        let (fetcher, coordinator) = setup();
        let a = landmark("a", 14.5950, 120.9694);
        let b = landmark("b", 14.5913, 120.9733);

        let task_a = coordinator.spawn_request(&a);
        let task_b = coordinator.spawn_request(&b);

        // A was superseded before anyone looked, but still reports its own state
        assert_eq!(task_a.issued(), &RouteState::Loading { landmark: id("a") });
        assert_eq!(task_b.issued(), &RouteState::Loading { landmark: id("b") });
        assert_eq!(coordinator.state(), RouteState::Loading { landmark: id("b") });

        fetcher.wait_for_calls(2).await;
        fetcher.answer(b.location, Ok(route(300.0)));
        task_b.await.unwrap();

        let reload = coordinator.spawn_reload().unwrap();
        assert_eq!(reload.issued(), &RouteState::Loading { landmark: id("b") });

        fetcher.wait_for_calls(3).await;
        fetcher.answer(a.location, Ok(route(800.0)));
        fetcher.answer(b.location, Ok(route(250.0)));
        assert_eq!(task_a.await.unwrap(), Completion::Superseded);
        assert!(matches!(reload.await.unwrap(), Completion::Applied(_)));
    }

    #[tokio::test]
    async fn dropped_task_still_commits() {
        let (fetcher, coordinator) = setup();
        let a = landmark("a", 14.5950, 120.9694);
        let mut sub = coordinator.subscribe();

        drop(coordinator.spawn_request(&a));
        sub.changed().await.unwrap();

        fetcher.wait_for_calls(1).await;
        fetcher.answer(a.location, Ok(route(800.0)));

        assert_eq!(
            sub.changed().await,
            Some(RouteState::Ready {
                landmark: id("a"),
                route: route(800.0),
            })
        );
    }

    #[tokio::test]
    async fn late_stale_result_does_not_overwrite_ready() {
        let (fetcher, coordinator) = setup();
        let a = landmark("a", 14.5950, 120.9694);
        let b = landmark("b", 14.5913, 120.9733);

        let task_a = coordinator.spawn_request(&a);
        let task_b = coordinator.spawn_request(&b);
        fetcher.wait_for_calls(2).await;

        fetcher.answer(b.location, Ok(route(300.0)));
        task_b.await.unwrap();

        fetcher.answer(a.location, Err(RouteError::Timeout));
        assert_eq!(task_a.await.unwrap(), Completion::Superseded);

        assert_eq!(
            coordinator.state(),
            RouteState::Ready {
                landmark: id("b"),
                route: route(300.0),
            }
        );
    }

    #[tokio::test]
    async fn failure_then_reload() {
        let (fetcher, coordinator) = setup();
        let a = landmark("a", 14.5950, 120.9694);

        let task = coordinator.spawn_request(&a);
        fetcher.wait_for_calls(1).await;
        fetcher.answer(a.location, Err(RouteError::Network("connection reset".into())));
        task.await.unwrap();

        assert_eq!(
            coordinator.state(),
            RouteState::Failed {
                landmark: id("a"),
                reason: FailureReason::NetworkError,
            }
        );

        let retry = coordinator.spawn_reload().expect("landmark is selected");
        assert_eq!(coordinator.state(), RouteState::Loading { landmark: id("a") });

        fetcher.wait_for_calls(2).await;
        fetcher.answer(a.location, Ok(route(800.0)));
        retry.await.unwrap();
        assert!(matches!(coordinator.state(), RouteState::Ready { .. }));
    }

    #[tokio::test]
    async fn failure_reasons() {
        let (fetcher, coordinator) = setup();
        let a = landmark("a", 14.5950, 120.9694);

        let cases = [
            (RouteError::Timeout, FailureReason::Timeout),
            (RouteError::NoRoute("NoSegment".into()), FailureReason::NoRouteFound),
            (RouteError::Unauthorized, FailureReason::NetworkError),
        ];

        for (n, (error, reason)) in cases.into_iter().enumerate() {
            let task = coordinator.spawn_request(&a);
            fetcher.wait_for_calls(n + 1).await;
            fetcher.answer(a.location, Err(error));
            task.await.unwrap();

            assert_eq!(
                coordinator.state(),
                RouteState::Failed {
                    landmark: id("a"),
                    reason,
                }
            );
        }
    }

    #[tokio::test]
    async fn reload_from_ready_reenters_loading() {
        let (fetcher, coordinator) = setup();
        let a = landmark("a", 14.5950, 120.9694);

        let task = coordinator.spawn_request(&a);
        fetcher.wait_for_calls(1).await;
        fetcher.answer(a.location, Ok(route(800.0)));
        task.await.unwrap();

        let reload = coordinator.reload().expect("landmark is selected");
        assert_eq!(coordinator.state(), RouteState::Loading { landmark: id("a") });

        let task = tokio::spawn(reload);
        fetcher.wait_for_calls(2).await;
        fetcher.answer(a.location, Ok(route(750.0)));
        assert_eq!(
            task.await.unwrap(),
            Completion::Applied(RouteState::Ready {
                landmark: id("a"),
                route: route(750.0),
            })
        );
    }

    #[tokio::test]
    async fn reload_while_loading_supersedes_first_request() {
        let (fetcher, coordinator) = setup();
        let a = landmark("a", 14.5950, 120.9694);

        let first = coordinator.spawn_request(&a);
        fetcher.wait_for_calls(1).await;
        let second = coordinator.spawn_reload().unwrap();
        fetcher.wait_for_calls(2).await;

        // Answers go to the oldest pending fetch first
        fetcher.answer(a.location, Ok(route(999.0)));
        assert_eq!(first.await.unwrap(), Completion::Superseded);
        assert!(coordinator.state().is_loading());

        fetcher.answer(a.location, Ok(route(800.0)));
        second.await.unwrap();
        assert_eq!(
            coordinator.state(),
            RouteState::Ready {
                landmark: id("a"),
                route: route(800.0),
            }
        );
    }

    #[test]
    fn reload_without_selection_is_noop() {
        let (_, coordinator) = setup();
        assert!(coordinator.reload().is_none());
        assert_eq!(coordinator.state(), RouteState::Idle);
    }

    #[tokio::test]
    async fn origin_captured_at_issue_time() {
        let (fetcher, coordinator) = setup();
        let a = landmark("a", 14.5950, 120.9694);
        let moved = LatLng::new(14.5900, 120.9750).unwrap();

        let first = coordinator.request_route(&a);
        coordinator.update_origin(moved);
        let first = tokio::spawn(first);
        fetcher.wait_for_calls(1).await;

        let second = coordinator.spawn_reload().unwrap();
        fetcher.wait_for_calls(2).await;

        assert_eq!(fetcher.origins(), [origin(), moved]);
        assert_eq!(coordinator.origin(), moved);

        fetcher.answer(a.location, Ok(route(1.0)));
        fetcher.answer(a.location, Ok(route(2.0)));
        first.await.unwrap();
        second.await.unwrap();
    }

    #[tokio::test]
    async fn subscribers_see_transitions() {
        let (fetcher, coordinator) = setup();
        let a = landmark("a", 14.5950, 120.9694);
        let mut sub = coordinator.subscribe();
        assert_eq!(sub.current(), RouteState::Idle);

        let task = coordinator.spawn_request(&a);
        assert_eq!(
            sub.changed().await,
            Some(RouteState::Loading { landmark: id("a") })
        );

        fetcher.wait_for_calls(1).await;
        fetcher.answer(a.location, Ok(route(800.0)));
        task.await.unwrap();

        assert_eq!(
            sub.changed().await,
            Some(RouteState::Ready {
                landmark: id("a"),
                route: route(800.0),
            })
        );
    }

    #[tokio::test]
    async fn origin_update_does_not_notify() {
        let (_, coordinator) = setup();
        let mut sub = coordinator.subscribe();

        coordinator.update_origin(LatLng::new(14.0, 121.0).unwrap());

        let changed = tokio::time::timeout(std::time::Duration::from_millis(20), sub.changed()).await;
        assert!(changed.is_err(), "origin updates should not wake subscribers");
    }

    #[tokio::test]
    async fn subscription_ends_when_coordinator_dropped() {
        let (_, coordinator) = setup();
        let mut sub = coordinator.subscribe();
        drop(coordinator);
        assert_eq!(sub.changed().await, None);
    }

    #[tokio::test]
    async fn stale_results_never_applied_under_rapid_reselection() {
        let (fetcher, coordinator) = setup();
        let landmarks: Vec<_> = (0..5_u32)
            .map(|i| landmark(&format!("l{i}"), 14.59 + f64::from(i) * 0.001, 120.97))
            .collect();

        let tasks: Vec<_> = landmarks
            .iter()
            .map(|l| coordinator.spawn_request(l))
            .collect();
        fetcher.wait_for_calls(landmarks.len()).await;

        // Answer newest first so every stale result arrives after the live one
        for l in landmarks.iter().rev() {
            fetcher.answer(l.location, Ok(route(100.0)));
        }

        let mut applied = 0;
        for task in tasks {
            if let Completion::Applied(_) = task.await.unwrap() {
                applied += 1;
            }
        }

        assert_eq!(applied, 1);
        assert_eq!(coordinator.state().landmark(), Some(&id("l4")));
    }
}
