use std::time::Duration;

use deed_types::{DocumentHash, Principal, PropertyId, RejectCode};

use crate::error::GateError;

// ---------------------------------------------------------------------------
// RegistryView
// ---------------------------------------------------------------------------

/// Read-only view of registry state that stages consult.
///
/// The registry implements this over its locked state so that the checks and
/// the mutation that follows see the same snapshot.
pub trait RegistryView {
    /// Number of properties ever registered (the next id).
    fn property_count(&self) -> u64;

    /// Maximum number of properties the registry accepts.
    fn max_properties(&self) -> u64;

    /// Whether a property with this document hash is registered.
    fn contains_hash(&self, hash: &DocumentHash) -> bool;

    /// The configured authority, if any.
    fn authority(&self) -> Option<&Principal>;

    /// Owner of the property with this id, if it exists.
    fn owner_of(&self, id: PropertyId) -> Option<&Principal>;
}

// ---------------------------------------------------------------------------
// StageDecision
// ---------------------------------------------------------------------------

/// The outcome of a single gate stage evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StageDecision {
    /// The stage passed; proceed to the next stage.
    Pass,
    /// The stage failed; the proposal is rejected with `code`.
    Fail { code: RejectCode, reason: String },
}

impl StageDecision {
    pub fn fail(code: RejectCode, reason: impl Into<String>) -> Self {
        Self::Fail {
            code,
            reason: reason.into(),
        }
    }

    /// Returns `true` if the decision is `Pass`.
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Returns `true` if the decision is `Fail`.
    pub fn is_fail(&self) -> bool {
        matches!(self, Self::Fail { .. })
    }
}

// ---------------------------------------------------------------------------
// StageResult
// ---------------------------------------------------------------------------

/// Recorded result from a completed stage evaluation.
#[derive(Clone, Debug)]
pub struct StageResult {
    /// Name of the stage that produced this result.
    pub stage_name: String,
    /// Whether the stage passed.
    pub passed: bool,
    /// Reject code and reason, populated on failure.
    pub rejection: Option<(RejectCode, String)>,
    /// Wall-clock time the stage took to evaluate.
    pub elapsed: Duration,
}

// ---------------------------------------------------------------------------
// GateContext
// ---------------------------------------------------------------------------

/// Contextual information available to every gate stage.
pub struct GateContext<'a> {
    /// Principal making the call.
    pub caller: &'a Principal,
    /// Registry state the proposal is checked against.
    pub view: &'a dyn RegistryView,
    /// Results from stages that have already run in this evaluation.
    pub previous_stages: Vec<StageResult>,
}

impl<'a> GateContext<'a> {
    pub fn new(caller: &'a Principal, view: &'a dyn RegistryView) -> Self {
        Self {
            caller,
            view,
            previous_stages: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// GateStage trait
// ---------------------------------------------------------------------------

/// A single evaluation stage in a gate pipeline over proposals of type `P`.
///
/// Stages are evaluated in order. The trait is object-safe and `Send + Sync`
/// so stages can be stored in a `Vec<Box<dyn GateStage<P>>>`.
pub trait GateStage<P>: Send + Sync {
    /// Human-readable name of this stage (e.g., "capacity", "fields").
    fn name(&self) -> &str;

    /// Evaluate the proposal and return a decision.
    fn evaluate(&self, proposal: &P, context: &GateContext<'_>)
        -> Result<StageDecision, GateError>;
}
