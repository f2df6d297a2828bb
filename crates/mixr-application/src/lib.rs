//! Application layer for mixr.
//!
//! Use cases that coordinate the domain (`mixr-core`) with the adapters
//! (`mixr-infrastructure`): the mix orchestrator, its summaries, and the
//! transport-neutral command service the binaries talk to.

pub mod bootstrap;
pub mod command;
pub mod orchestrator;
pub mod summary;

pub use bootstrap::MixrApp;
pub use command::{CommandResult, MixCommandService};
pub use orchestrator::MixOrchestrator;
pub use summary::{StepReport, StepResult, Summary, SummaryStatus};
