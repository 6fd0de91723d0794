//! Geogif Stages: the concrete pipeline
//!
//! One stage per machine state, assembled in fixed order by `pipeline`:
//!
//! ```text
//! Extract → Filter → Resolve → Acquire → Compose → Guard → Publish
//!    ↓         ↓         ↓         ↓         ↓        ↓        ↓
//!  posts   survivors  lat/lng   frames     gif     status  receipt
//! ```
//!
//! Stages hold their collaborators behind `Arc<dyn Trait>` handles and
//! write their own context fields exactly once. The runner owns
//! sequencing and cleanup; nothing here retries.

mod acquire;
mod compose;
mod extract;
mod filter;
mod guard;
mod pipeline;
mod publish;
mod resolve;

pub use acquire::AcquireStage;
pub use compose::ComposeStage;
pub use extract::ExtractStage;
pub use filter::FilterStage;
pub use guard::GuardStage;
pub use pipeline::{build_pipeline, run_once, Collaborators, PipelineConfig};
pub use publish::PublishStage;
pub use resolve::ResolveStage;
