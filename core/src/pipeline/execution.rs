// core/src/pipeline/execution.rs

//! `Pipeline::run`.

use super::context_data::ContextData;
use super::control::{PipelineControl, PipelineResult};
use super::definition::Pipeline;
use super::step::{Handler, StepDef};
use crate::error::PipelineError;
use tracing::{event, info_span, instrument, Instrument, Level};

/// Outcome of one step, or of one phase within a step.
enum Flow<Err> {
  Continue,
  Stopped,
  Failed(Err),
}

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  /// Runs every step in order against `ctx_data`.
  ///
  /// A step whose `skip_if` evaluates to `true` is passed over. A required
  /// step that has no handlers at all fails the run with
  /// `PipelineError::HandlerMissing`. The first handler error aborts the run
  /// and is returned unchanged.
  #[instrument(
    name = "Pipeline::run",
    skip_all,
    fields(
      pipeline_context_data_type = %std::any::type_name::<TData>(),
      num_steps = self.steps.len(),
    ),
    err(Display)
  )]
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, Err> {
    event!(Level::DEBUG, "Pipeline execution starting.");

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_span = info_span!(
        "pipeline_step",
        step_name = step_def.name.as_str(),
        step_index = step_idx,
        optional = step_def.optional
      );
      match self.run_step(step_def, &ctx_data).instrument(step_span).await {
        Flow::Continue => {}
        Flow::Stopped => return Ok(PipelineResult::Stopped),
        Flow::Failed(e) => return Err(e),
      }
    }

    event!(Level::DEBUG, "Pipeline execution completed.");
    Ok(PipelineResult::Completed)
  }

  async fn run_step(&self, step_def: &StepDef<TData>, ctx_data: &ContextData<TData>) -> Flow<Err> {
    let step_name = step_def.name.as_str();

    if let Some(skip_cond_fn) = &step_def.skip_if {
      if skip_cond_fn(ctx_data.clone()) {
        event!(Level::DEBUG, "Step skipped by its skip_if condition.");
        return Flow::Continue;
      }
    }

    let phases = [
      ("before", self.before.get(step_name)),
      ("on", self.on.get(step_name)),
      ("after", self.after.get(step_name)),
    ];

    let has_handlers = phases
      .iter()
      .any(|(_, handlers)| handlers.map_or(false, |v| !v.is_empty()));
    if !has_handlers {
      if step_def.optional {
        event!(Level::DEBUG, "Optional step has no handlers, skipping.");
        return Flow::Continue;
      }
      event!(Level::ERROR, "Required step has no handlers.");
      return Flow::Failed(Err::from(PipelineError::HandlerMissing {
        step_name: step_def.name.clone(),
      }));
    }

    for (phase_name, handlers) in phases {
      let Some(handlers) = handlers else { continue };
      match Self::run_phase(phase_name, handlers, ctx_data).await {
        Flow::Continue => {}
        other => return other,
      }
    }
    event!(Level::DEBUG, "Step finished.");
    Flow::Continue
  }

  async fn run_phase(
    phase_name: &'static str,
    handlers: &[Handler<TData, Err>],
    ctx_data: &ContextData<TData>,
  ) -> Flow<Err> {
    for (handler_idx, handler_fn) in handlers.iter().enumerate() {
      let handler_span = tracing::debug_span!("handler", phase = phase_name, handler_index = handler_idx);
      match handler_fn(ctx_data.clone()).instrument(handler_span).await {
        Ok(PipelineControl::Continue) => {}
        Ok(PipelineControl::Stop) => {
          event!(Level::INFO, phase = phase_name, "Pipeline stopped by a handler.");
          return Flow::Stopped;
        }
        Err(e) => {
          event!(Level::ERROR, phase = phase_name, error = %e, "Handler failed.");
          return Flow::Failed(e);
        }
      }
    }
    Flow::Continue
  }
}
