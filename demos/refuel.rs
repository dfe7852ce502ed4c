//! Demo: a small fleet refueling against one station.
//!
//! Run with:
//! ```sh
//! cargo run --example refuel --features logging
//! ```
//!
//! Ten vehicles with randomized demand share a two-slot bay while one
//! refiller keeps the reservoirs topped up. Vehicles use the
//! requeue-on-contention policy so a fuel shortage never pins the bay.
//! Stop with Ctrl-C; the fleet drains the actors within the grace period.

use std::sync::Arc;
use std::time::Duration;

use fuelbay::{
    ActorRef, BackoffPolicy, DockingPolicy, Fleet, FleetConfig, FuelDemand, LogWriter,
    PacePolicy, Refiller, Station, StationConfig, Vehicle,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let station = Station::new(StationConfig {
        dock_slots: 2,
        nitrogen_capacity: 10_000,
        quantum_capacity: 10_000,
    });

    let fleet = Fleet::new(FleetConfig {
        grace: Duration::from_secs(10),
        bus_capacity: 1024,
    })
    .with_subscriber(Arc::new(LogWriter));

    let requeue = DockingPolicy::RequeueOnContention {
        backoff: BackoffPolicy::default(),
    };

    let mut actors: Vec<ActorRef> = Vec::new();
    for i in 1..=10 {
        let vehicle = Vehicle::new(
            format!("vehicle-{i}"),
            station.clone(),
            fleet.bus().clone(),
            FuelDemand::Uniform {
                nitrogen_max: 100,
                quantum_max: 100,
            },
        )
        .with_docking(requeue)
        .with_pace(PacePolicy::uniform(
            Duration::from_secs(2),
            Duration::from_secs(12),
        ));
        actors.push(Arc::new(vehicle) as _);
    }

    let refiller = Refiller::new(
        "refiller-1",
        station.clone(),
        fleet.bus().clone(),
        FuelDemand::Fixed {
            nitrogen: 5_000,
            quantum: 5_000,
        },
    )
    .with_pace(PacePolicy::uniform(
        Duration::from_secs(2),
        Duration::from_secs(12),
    ));
    actors.push(Arc::new(refiller) as _);

    fleet.run(actors).await?;
    Ok(())
}
