use std::time::{Duration, Instant};

use deed_types::code::Labelled;
use deed_types::{Principal, RejectCode};
use tracing::debug;

use crate::error::GateError;
use crate::proposal::{RegistrationProposal, UpdateProposal};
use crate::stage::{GateContext, GateStage, RegistryView, StageDecision, StageResult};
use crate::stages::{
    AuthorityStage, CapacityStage, ExistenceStage, OwnershipStage, RegistrationFieldsStage,
    UniquenessStage, UpdateFieldsStage,
};

// ---------------------------------------------------------------------------
// Decision / GateResult
// ---------------------------------------------------------------------------

/// Final verdict of a gate pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    Accepted,
    Rejected { code: RejectCode, reason: String },
}

impl Decision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// The reject code, if the proposal was rejected.
    pub fn reject_code(&self) -> Option<RejectCode> {
        match self {
            Self::Accepted => None,
            Self::Rejected { code, .. } => Some(*code),
        }
    }
}

/// The outcome of running a proposal through the full gate pipeline.
#[derive(Clone, Debug)]
pub struct GateResult {
    /// The final decision.
    pub decision: Decision,
    /// Per-stage results in evaluation order.
    pub stage_results: Vec<StageResult>,
    /// Total wall-clock time for the pipeline evaluation.
    pub elapsed: Duration,
}

impl GateResult {
    /// Returns `true` if the proposal was accepted.
    pub fn is_accepted(&self) -> bool {
        self.decision.is_accepted()
    }

    /// `Ok(())` when accepted, otherwise the reject code.
    pub fn into_result(self) -> Result<(), RejectCode> {
        match self.decision {
            Decision::Accepted => Ok(()),
            Decision::Rejected { code, .. } => Err(code),
        }
    }
}

// ---------------------------------------------------------------------------
// Gate
// ---------------------------------------------------------------------------

/// A fail-fast pipeline of stages that every proposal of type `P` must pass
/// before the registry mutates anything.
pub struct Gate<P> {
    stages: Vec<Box<dyn GateStage<P>>>,
}

/// Gate run before a property is registered.
pub type RegistrationGate = Gate<RegistrationProposal>;

/// Gate run before an owner update is applied.
pub type UpdateGate = Gate<UpdateProposal>;

impl<P> Gate<P> {
    /// Create a gate with an empty pipeline.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Append a stage to the end of the pipeline.
    pub fn add_stage(&mut self, stage: Box<dyn GateStage<P>>) {
        self.stages.push(stage);
    }

    /// Number of stages in the pipeline.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Names of the stages, in evaluation order.
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Evaluate a proposal through the full pipeline.
    ///
    /// The first failing stage stops evaluation and its code becomes the
    /// decision. Later stages are never run.
    pub fn evaluate(
        &self,
        proposal: &P,
        caller: &Principal,
        view: &dyn RegistryView,
    ) -> Result<GateResult, GateError> {
        if self.stages.is_empty() {
            return Err(GateError::EmptyPipeline);
        }

        let pipeline_start = Instant::now();
        let mut context = GateContext::new(caller, view);
        let mut stage_results = Vec::with_capacity(self.stages.len());

        for stage in &self.stages {
            let stage_start = Instant::now();
            let decision = stage.evaluate(proposal, &context)?;

            let rejection = match &decision {
                StageDecision::Pass => None,
                StageDecision::Fail { code, reason } => Some((*code, reason.clone())),
            };
            let result = StageResult {
                stage_name: stage.name().to_string(),
                passed: rejection.is_none(),
                rejection,
                elapsed: stage_start.elapsed(),
            };
            stage_results.push(result.clone());
            context.previous_stages.push(result);

            if let StageDecision::Fail { code, reason } = decision {
                debug!(
                    stage = stage.name(),
                    code = %Labelled(code),
                    %reason,
                    "proposal rejected"
                );
                return Ok(GateResult {
                    decision: Decision::Rejected { code, reason },
                    stage_results,
                    elapsed: pipeline_start.elapsed(),
                });
            }
        }

        Ok(GateResult {
            decision: Decision::Accepted,
            stage_results,
            elapsed: pipeline_start.elapsed(),
        })
    }
}

impl<P> Default for Gate<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl Gate<RegistrationProposal> {
    /// The registration pipeline:
    /// Capacity -> Fields -> Uniqueness -> Authority
    pub fn registration() -> Self {
        let mut gate = Self::new();
        gate.add_stage(Box::new(CapacityStage));
        gate.add_stage(Box::new(RegistrationFieldsStage));
        gate.add_stage(Box::new(UniquenessStage));
        gate.add_stage(Box::new(AuthorityStage));
        gate
    }
}

impl Gate<UpdateProposal> {
    /// The update pipeline:
    /// Existence -> Ownership -> Fields
    pub fn update() -> Self {
        let mut gate = Self::new();
        gate.add_stage(Box::new(ExistenceStage));
        gate.add_stage(Box::new(OwnershipStage));
        gate.add_stage(Box::new(UpdateFieldsStage));
        gate
    }
}
