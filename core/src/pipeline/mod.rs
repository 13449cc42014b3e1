// core/src/pipeline/mod.rs

//! A small async step pipeline.
//!
//! A `Pipeline<TData, Err>` is an ordered list of named steps. Each step may
//! carry `before`, `on` and `after` handlers that operate on a shared
//! `ContextData<TData>`. Cart mutations (authorize, load, apply, persist) and
//! the storefront checkout flow are both expressed this way.

pub mod context_data;
pub mod control;
pub mod definition;
pub mod execution;
pub mod hooks;
pub mod step;

pub use context_data::ContextData;
pub use control::{PipelineControl, PipelineResult};
pub use definition::Pipeline;
pub use step::{Handler, SkipCondition, StepDef};
