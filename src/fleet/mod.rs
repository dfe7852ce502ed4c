//! # Fleet runtime: actor lifecycle and graceful shutdown.
//!
//! [`Fleet`] owns the run of a set of [`Actor`]s against one station:
//!
//! ```text
//!                         ┌─────────────┐
//!    OS signal ─────────▶ │    Fleet    │ ◀──── CancellationToken (tests)
//!                         └──────┬──────┘
//!                 child tokens   │   JoinSet
//!             ┌──────────────────┼──────────────────┐
//!             ▼                  ▼                  ▼
//!        ┌─────────┐        ┌─────────┐        ┌──────────┐
//!        │ vehicle │  ...   │ vehicle │        │ refiller │
//!        └────┬────┘        └────┬────┘        └────┬─────┘
//!             │   publish        │                  │
//!             └────────────▶ Bus ◀─────────────────┘
//!                             │ forward, in seq order
//!                             ▼
//!                        subscribers
//! ```
//!
//! ## Rules
//! - Every actor runs in its own task with a child [`CancellationToken`];
//!   cancelling the run token cancels all of them at once.
//! - [`Fleet::run`] cancels on `SIGINT`/`SIGTERM`/`SIGQUIT`;
//!   [`Fleet::run_until`] takes the token from the caller instead (tests,
//!   embedding).
//! - After cancellation the fleet waits up to [`FleetConfig::grace`] for the
//!   actors to drain. Actors still running after the grace period are aborted
//!   and reported via [`FleetError::GraceExceeded`].
//! - Lifecycle events (`ActorStarting`, `ActorStopped`, `ActorFailed`, the
//!   shutdown trio) go through the same [`Bus`] the actors publish to, and a
//!   single listener task forwards everything to the registered
//!   [`Subscribe`]rs in sequence order.

mod shutdown;

use std::sync::Arc;

use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;

use crate::actors::ActorRef;
use crate::config::FleetConfig;
use crate::error::FleetError;
use crate::events::{Bus, Event, EventKind};
use crate::subscribers::Subscribe;

/// Runs a set of actors to completion or graceful shutdown.
pub struct Fleet {
    cfg: FleetConfig,
    bus: Bus,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl Fleet {
    /// Creates a fleet with no subscribers and a fresh event bus.
    pub fn new(cfg: FleetConfig) -> Self {
        let bus = Bus::new(cfg.bus_capacity);
        Self {
            cfg,
            bus,
            subscribers: Vec::new(),
        }
    }

    /// Returns the event bus actors should publish to.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Registers a subscriber; events are forwarded in sequence order.
    pub fn with_subscriber(mut self, sub: Arc<dyn Subscribe>) -> Self {
        self.subscribers.push(sub);
        self
    }

    /// Runs the actors until they all finish or a termination signal arrives.
    ///
    /// On `SIGINT`/`SIGTERM`/`SIGQUIT` (Ctrl-C on non-Unix) every actor is
    /// cancelled and given [`FleetConfig::grace`] to stop.
    pub async fn run(&self, actors: Vec<ActorRef>) -> Result<(), FleetError> {
        let token = CancellationToken::new();
        let watcher = tokio::spawn({
            let token = token.clone();
            async move {
                let _ = shutdown::wait_for_shutdown_signal().await;
                token.cancel();
            }
        });

        let res = self.run_until(actors, token).await;
        watcher.abort();
        res
    }

    /// Runs the actors until they all finish or `token` is cancelled.
    ///
    /// Returns `Ok(())` when every actor task has stopped, including the case
    /// where some actors reported failures (those surface as
    /// [`EventKind::ActorFailed`] events). The only error is
    /// [`FleetError::GraceExceeded`].
    pub async fn run_until(
        &self,
        actors: Vec<ActorRef>,
        token: CancellationToken,
    ) -> Result<(), FleetError> {
        let listener_stop = CancellationToken::new();
        let listener = self.spawn_listener(listener_stop.clone());

        let mut set: JoinSet<()> = JoinSet::new();
        for actor in actors {
            let bus = self.bus.clone();
            let child = token.child_token();
            set.spawn(async move {
                let name: Arc<str> = Arc::from(actor.name());
                bus.publish(Event::now(EventKind::ActorStarting).with_actor(name.clone()));
                match actor.run(child).await {
                    Ok(()) => {
                        bus.publish(Event::now(EventKind::ActorStopped).with_actor(name));
                    }
                    Err(e) if e.is_graceful() => {
                        bus.publish(Event::now(EventKind::ActorStopped).with_actor(name));
                    }
                    Err(e) => {
                        bus.publish(
                            Event::now(EventKind::ActorFailed)
                                .with_actor(name)
                                .with_reason(e.to_string()),
                        );
                    }
                }
            });
        }

        let res = self.drive_shutdown(&mut set, &token).await;

        listener_stop.cancel();
        if let Some(handle) = listener {
            let _ = handle.await;
        }
        res
    }

    /// Waits for natural completion, switching to the grace path on
    /// cancellation.
    async fn drive_shutdown(
        &self,
        set: &mut JoinSet<()>,
        token: &CancellationToken,
    ) -> Result<(), FleetError> {
        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    self.bus.publish(Event::now(EventKind::ShutdownRequested));
                    return self.wait_all_with_grace(set).await;
                }
                joined = set.join_next() => {
                    if joined.is_none() {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Drains the join set within the grace period; aborts stragglers.
    async fn wait_all_with_grace(&self, set: &mut JoinSet<()>) -> Result<(), FleetError> {
        let grace = self.cfg.grace;
        let drained = async {
            while set.join_next().await.is_some() {}
        };
        if tokio::time::timeout(grace, drained).await.is_ok() {
            self.bus.publish(Event::now(EventKind::AllStoppedWithin));
            return Ok(());
        }

        let running = set.len();
        self.bus.publish(
            Event::now(EventKind::GraceExceeded)
                .with_reason(format!("{running} actor(s) still running")),
        );
        set.abort_all();
        Err(FleetError::GraceExceeded { grace, running })
    }

    /// Spawns the forwarding task that delivers bus events to subscribers.
    ///
    /// The task runs until `stop` is cancelled, then drains events already in
    /// the channel so shutdown events reach the subscribers too.
    fn spawn_listener(&self, stop: CancellationToken) -> Option<JoinHandle<()>> {
        if self.subscribers.is_empty() {
            return None;
        }
        let subs = self.subscribers.clone();
        let mut rx = self.bus.subscribe();
        Some(tokio::spawn(async move {
            loop {
                tokio::select! {
                    res = rx.recv() => match res {
                        Ok(ev) => deliver(&subs, &ev).await,
                        Err(RecvError::Lagged(_)) => continue,
                        Err(RecvError::Closed) => break,
                    },
                    _ = stop.cancelled() => break,
                }
            }
            loop {
                match rx.try_recv() {
                    Ok(ev) => deliver(&subs, &ev).await,
                    Err(TryRecvError::Lagged(_)) => continue,
                    Err(_) => break,
                }
            }
        }))
    }
}

async fn deliver(subs: &[Arc<dyn Subscribe>], ev: &Event) {
    for sub in subs {
        sub.on_event(ev).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actors::{Actor, FuelDemand, Refiller, Vehicle};
    use crate::config::StationConfig;
    use crate::error::StationError;
    use crate::policies::PacePolicy;
    use crate::station::Station;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct Recorder {
        kinds: Mutex<Vec<EventKind>>,
    }

    #[async_trait]
    impl Subscribe for Recorder {
        fn name(&self) -> &str {
            "recorder"
        }

        async fn on_event(&self, event: &Event) {
            self.kinds.lock().unwrap().push(event.kind);
        }
    }

    /// Ignores its cancellation token entirely.
    struct Stubborn;

    #[async_trait]
    impl Actor for Stubborn {
        fn name(&self) -> &str {
            "stubborn"
        }

        async fn run(&self, _ctx: CancellationToken) -> Result<(), StationError> {
            tokio::time::sleep(Duration::from_secs(300)).await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_run_until_returns_when_all_actors_finish() {
        let st = Station::new(StationConfig::default());
        let fleet = Fleet::new(FleetConfig::default());

        let refiller = Refiller::new(
            "refiller-1",
            st.clone(),
            fleet.bus().clone(),
            FuelDemand::Fixed {
                nitrogen: 100,
                quantum: 100,
            },
        )
        .with_pace(PacePolicy::none())
        .with_rounds(1);
        let vehicle = Vehicle::new(
            "vehicle-1",
            st.clone(),
            fleet.bus().clone(),
            FuelDemand::Fixed {
                nitrogen: 100,
                quantum: 100,
            },
        )
        .with_pace(PacePolicy::none())
        .with_rounds(1);

        fleet
            .run_until(
                vec![Arc::new(refiller), Arc::new(vehicle)],
                CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(st.nitrogen_level(), 0);
        assert_eq!(st.quantum_level(), 0);
        assert_eq!(st.occupied_slots(), 0);
    }

    #[tokio::test]
    async fn test_cancellation_stops_blocked_actors_within_grace() {
        let st = Station::new(StationConfig::default());
        let recorder = Arc::new(Recorder::default());
        let fleet = Arc::new(
            Fleet::new(FleetConfig {
                grace: Duration::from_secs(5),
                bus_capacity: 256,
            })
            .with_subscriber(recorder.clone()),
        );

        // Station starts empty, so the vehicle blocks on its first drain.
        let vehicle = Vehicle::arc(
            "vehicle-1",
            st.clone(),
            fleet.bus().clone(),
            FuelDemand::Fixed {
                nitrogen: 50,
                quantum: 50,
            },
        );

        let token = CancellationToken::new();
        let run = tokio::spawn({
            let fleet = fleet.clone();
            let token = token.clone();
            async move { fleet.run_until(vec![vehicle], token).await }
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        token.cancel();
        tokio::time::timeout(Duration::from_secs(2), run)
            .await
            .expect("fleet stopped")
            .unwrap()
            .unwrap();

        let kinds = recorder.kinds.lock().unwrap();
        assert!(kinds.contains(&EventKind::ActorStarting));
        assert!(kinds.contains(&EventKind::ShutdownRequested));
        assert!(kinds.contains(&EventKind::ActorStopped));
        assert!(kinds.contains(&EventKind::AllStoppedWithin));
        assert!(!kinds.contains(&EventKind::ActorFailed));
        assert_eq!(st.occupied_slots(), 0);
    }

    #[tokio::test]
    async fn test_grace_exceeded_reports_stuck_actors() {
        let fleet = Fleet::new(FleetConfig {
            grace: Duration::from_millis(50),
            bus_capacity: 64,
        });

        let token = CancellationToken::new();
        token.cancel();

        let err = fleet
            .run_until(vec![Arc::new(Stubborn)], token)
            .await
            .unwrap_err();
        match err {
            FleetError::GraceExceeded { running, .. } => assert_eq!(running, 1),
        }
    }

    #[tokio::test]
    async fn test_actor_failure_is_reported_not_fatal() {
        let st = Station::new(StationConfig {
            dock_slots: 1,
            nitrogen_capacity: 100,
            quantum_capacity: 100,
        });
        let recorder = Arc::new(Recorder::default());
        let fleet = Fleet::new(FleetConfig::default()).with_subscriber(recorder.clone());

        // Demand above capacity is rejected as invalid, which fails the actor.
        let vehicle = Vehicle::arc(
            "vehicle-1",
            st.clone(),
            fleet.bus().clone(),
            FuelDemand::Fixed {
                nitrogen: 500,
                quantum: 0,
            },
        );

        fleet
            .run_until(vec![vehicle], CancellationToken::new())
            .await
            .unwrap();

        let kinds = recorder.kinds.lock().unwrap();
        assert!(kinds.contains(&EventKind::ActorFailed));
        assert!(!kinds.contains(&EventKind::ActorStopped));
        assert_eq!(st.occupied_slots(), 0);
    }
}
