pub mod autosave;
pub mod autosave_task;
pub mod fill_flow;
pub mod sheet_ctx;

pub use autosave::{build_payload, AutosaveCoordinator, FlushOutcome, FlushTrigger};
pub use autosave_task::AutosaveTask;
pub use fill_flow::{FillFlow, NavOutcome};
pub use sheet_ctx::SheetCtx;
