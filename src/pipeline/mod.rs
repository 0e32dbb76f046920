//! Pipeline components: shared context, the three stages, orchestration, error summary.

pub mod context;
pub mod converter;
pub mod error_handler;
pub mod loader;
pub mod orchestrator;
pub mod writer;

pub use context::{PipelineChannels, PipelineContext, PipelineHandles, create_pipeline_channels};
pub use converter::{run_converter_loop, spawn_converter_thread, to_gray_item};
pub use error_handler::check_for_failures;
pub use loader::{WalkOutcome, load_item, run_loader_loop, spawn_loader_thread, to_outcome_walkdir};
pub use orchestrator::{collect_pipeline_results, process_dir, run_pipeline};
pub use writer::{persist_item, spawn_writer_thread};
