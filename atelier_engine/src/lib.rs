//! Download orchestration: fan out the fetches of each asset batch, wait for them to settle and
//! assemble the result into the [`Scene`](atelier_scene::Scene).

mod assembly;
mod barrier;
mod config;
mod in_flight;
mod orchestrator;

pub use assembly::{
    Finalized, StagedModel, SubObject, bind_staged, bind_sub_asset, finalize, locate_sub_object,
    stage,
};
pub use barrier::{Awaiting, BarrierState, CompletionBarrier};
pub use config::PipelineConfig;
pub use in_flight::{InFlight, InFlightGuard};
pub use orchestrator::{BatchOutcome, BatchReport, Orchestrator};
