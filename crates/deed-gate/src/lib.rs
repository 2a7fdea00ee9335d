//! Validation gate pipeline for the Deed Registry.
//!
//! Every registration and every owner update passes through a gate before the
//! registry changes anything. A gate is an ordered, fail-fast pipeline of
//! stages; the first stage that fails decides the reject code, and stages
//! after it never run.
//!
//! # Quick Start
//!
//! ```rust
//! use deed_gate::{Gate, RegistrationProposal, RegistryView};
//! use deed_types::{DocumentHash, Principal, PropertyId};
//!
//! struct Empty(Principal);
//!
//! impl RegistryView for Empty {
//!     fn property_count(&self) -> u64 { 0 }
//!     fn max_properties(&self) -> u64 { 10 }
//!     fn contains_hash(&self, _: &DocumentHash) -> bool { false }
//!     fn authority(&self) -> Option<&Principal> { Some(&self.0) }
//!     fn owner_of(&self, _: PropertyId) -> Option<&Principal> { None }
//! }
//!
//! let view = Empty(Principal::new("ST2TEST").unwrap());
//! let caller = Principal::new("ST1TEST").unwrap();
//! let proposal = RegistrationProposal {
//!     legal_description: "Lot 7, Block 3".into(),
//!     document_hash: vec![1; 32],
//!     address: "123 Main St".into(),
//!     location: "City".into(),
//!     currency: "STX".into(),
//!     size_sqft: 2000,
//!     zoning_type: "residential".into(),
//!     tax_id: "TAX123".into(),
//!     assessment_value: 100_000,
//!     lien_amount: 0,
//!     mortgage_amount: 50_000,
//! };
//! let result = Gate::registration().evaluate(&proposal, &caller, &view).unwrap();
//! assert!(result.is_accepted());
//! ```

pub mod error;
pub mod gate;
pub mod proposal;
pub mod stage;
pub mod stages;

// Re-exports for convenience.
pub use error::GateError;
pub use gate::{Decision, Gate, GateResult, RegistrationGate, UpdateGate};
pub use proposal::{
    FieldViolation, RegistrationProposal, UpdateProposal, ValidatedRegistration, ValidatedUpdate,
};
pub use stage::{GateContext, GateStage, RegistryView, StageDecision, StageResult};

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use super::*;
    use deed_types::{DocumentHash, Principal, PropertyId, RejectCode};

    /// Hand-built registry state for driving the stages.
    struct FakeView {
        count: u64,
        max: u64,
        hashes: HashSet<DocumentHash>,
        authority: Option<Principal>,
        owners: HashMap<PropertyId, Principal>,
    }

    impl FakeView {
        fn configured() -> Self {
            Self {
                count: 0,
                max: 10_000,
                hashes: HashSet::new(),
                authority: Some(principal("ST2TEST")),
                owners: HashMap::new(),
            }
        }
    }

    impl RegistryView for FakeView {
        fn property_count(&self) -> u64 {
            self.count
        }
        fn max_properties(&self) -> u64 {
            self.max
        }
        fn contains_hash(&self, hash: &DocumentHash) -> bool {
            self.hashes.contains(hash)
        }
        fn authority(&self) -> Option<&Principal> {
            self.authority.as_ref()
        }
        fn owner_of(&self, id: PropertyId) -> Option<&Principal> {
            self.owners.get(&id)
        }
    }

    fn principal(s: &str) -> Principal {
        Principal::new(s).unwrap()
    }

    fn valid_registration() -> RegistrationProposal {
        RegistrationProposal {
            legal_description: "Legal Desc".into(),
            document_hash: vec![1; 32],
            address: "123 Main St".into(),
            location: "City".into(),
            currency: "STX".into(),
            size_sqft: 2000,
            zoning_type: "residential".into(),
            tax_id: "TAX123".into(),
            assessment_value: 100_000,
            lien_amount: 0,
            mortgage_amount: 50_000,
        }
    }

    fn valid_update(id: PropertyId) -> UpdateProposal {
        UpdateProposal {
            id,
            legal_description: "New Desc".into(),
            address: "New Address".into(),
            size_sqft: 2500,
            zoning_type: "commercial".into(),
        }
    }

    fn register(view: &FakeView, proposal: &RegistrationProposal) -> GateResult {
        Gate::registration()
            .evaluate(proposal, &principal("ST1TEST"), view)
            .unwrap()
    }

    // -----------------------------------------------------------------------
    // Registration pipeline
    // -----------------------------------------------------------------------

    #[test]
    fn registration_pipeline_order() {
        assert_eq!(
            Gate::registration().stage_names(),
            vec!["capacity", "fields", "uniqueness", "authority"]
        );
    }

    #[test]
    fn valid_registration_passes_every_stage() {
        let result = register(&FakeView::configured(), &valid_registration());
        assert!(result.is_accepted());
        assert_eq!(result.stage_results.len(), 4);
        assert!(result.stage_results.iter().all(|r| r.passed));
    }

    #[test]
    fn capacity_is_checked_before_fields() {
        let mut view = FakeView::configured();
        view.count = 1;
        view.max = 1;
        let mut proposal = valid_registration();
        proposal.legal_description = String::new();

        let result = register(&view, &proposal);
        assert_eq!(
            result.decision.reject_code(),
            Some(RejectCode::MaxPropertiesExceeded)
        );
        assert_eq!(result.stage_results.len(), 1);
    }

    #[test]
    fn field_failure_stops_pipeline() {
        let mut proposal = valid_registration();
        proposal.document_hash = vec![1; 31];
        let result = register(&FakeView::configured(), &proposal);
        assert_eq!(result.decision.reject_code(), Some(RejectCode::InvalidHash));
        assert_eq!(result.stage_results.len(), 2);
        let (_, reason) = result.stage_results[1].rejection.clone().unwrap();
        assert!(reason.starts_with("document_hash"));
    }

    #[test]
    fn duplicate_hash_rejected_before_authority_check() {
        let mut view = FakeView::configured();
        view.authority = None;
        view.hashes.insert(DocumentHash::new([1; 32]));
        let result = register(&view, &valid_registration());
        assert_eq!(result.decision.reject_code(), Some(RejectCode::PropertyExists));
    }

    #[test]
    fn missing_authority_rejected_last() {
        let mut view = FakeView::configured();
        view.authority = None;
        let result = register(&view, &valid_registration());
        assert_eq!(
            result.decision.reject_code(),
            Some(RejectCode::AuthorityNotVerified)
        );
        assert_eq!(result.stage_results.len(), 4);
    }

    #[test]
    fn invalid_fields_win_over_missing_authority() {
        let mut view = FakeView::configured();
        view.authority = None;
        let mut proposal = valid_registration();
        proposal.currency = "EUR".into();
        let result = register(&view, &proposal);
        assert_eq!(result.decision.reject_code(), Some(RejectCode::InvalidCurrency));
    }

    #[test]
    fn uniqueness_stage_alone_rejects_short_hash() {
        let mut gate = RegistrationGate::new();
        gate.add_stage(Box::new(stages::UniquenessStage));
        let mut proposal = valid_registration();
        proposal.document_hash = vec![9; 4];
        let result = gate
            .evaluate(&proposal, &principal("ST1TEST"), &FakeView::configured())
            .unwrap();
        assert_eq!(result.decision.reject_code(), Some(RejectCode::InvalidHash));
    }

    #[test]
    fn capacity_stage_decides_on_its_own() {
        let caller = principal("ST1TEST");
        let mut view = FakeView::configured();
        view.max = 1;

        let context = GateContext::new(&caller, &view);
        let decision = stages::CapacityStage
            .evaluate(&valid_registration(), &context)
            .unwrap();
        assert!(decision.is_pass());
        assert!(!decision.is_fail());

        view.count = 1;
        let context = GateContext::new(&caller, &view);
        let decision = stages::CapacityStage
            .evaluate(&valid_registration(), &context)
            .unwrap();
        assert!(decision.is_fail());
        assert!(!decision.is_pass());
    }

    #[test]
    fn empty_gate_is_an_error() {
        let gate = RegistrationGate::new();
        let err = gate
            .evaluate(
                &valid_registration(),
                &principal("ST1TEST"),
                &FakeView::configured(),
            )
            .unwrap_err();
        assert_eq!(err, GateError::EmptyPipeline);
    }

    // -----------------------------------------------------------------------
    // Update pipeline
    // -----------------------------------------------------------------------

    #[test]
    fn update_pipeline_order() {
        assert_eq!(
            Gate::update().stage_names(),
            vec!["existence", "ownership", "fields"]
        );
    }

    #[test]
    fn owner_update_passes() {
        let mut view = FakeView::configured();
        view.owners.insert(0, principal("ST1TEST"));
        let result = Gate::update()
            .evaluate(&valid_update(0), &principal("ST1TEST"), &view)
            .unwrap();
        assert!(result.is_accepted());
        assert!(result.into_result().is_ok());
    }

    #[test]
    fn missing_property_rejected() {
        let result = Gate::update()
            .evaluate(&valid_update(99), &principal("ST1TEST"), &FakeView::configured())
            .unwrap();
        assert_eq!(result.into_result(), Err(RejectCode::PropertyNotFound));
    }

    #[test]
    fn non_owner_rejected_before_field_checks() {
        let mut view = FakeView::configured();
        view.owners.insert(0, principal("ST1TEST"));
        let mut proposal = valid_update(0);
        proposal.size_sqft = 0;
        let result = Gate::update()
            .evaluate(&proposal, &principal("ST3FAKE"), &view)
            .unwrap();
        assert_eq!(result.into_result(), Err(RejectCode::NotAuthorized));
    }

    #[test]
    fn invalid_update_field_rejected() {
        let mut view = FakeView::configured();
        view.owners.insert(0, principal("ST1TEST"));
        let mut proposal = valid_update(0);
        proposal.zoning_type = "Residential".into();
        let result = Gate::update()
            .evaluate(&proposal, &principal("ST1TEST"), &view)
            .unwrap();
        assert_eq!(result.into_result(), Err(RejectCode::InvalidUpdateParam));
    }

    // -----------------------------------------------------------------------
    // Custom stages
    // -----------------------------------------------------------------------

    struct AlwaysFail;

    impl GateStage<UpdateProposal> for AlwaysFail {
        fn name(&self) -> &str {
            "always-fail"
        }
        fn evaluate(
            &self,
            _proposal: &UpdateProposal,
            context: &GateContext<'_>,
        ) -> Result<StageDecision, GateError> {
            // Sees the results of stages that ran before it.
            assert_eq!(context.previous_stages.len(), 3);
            Ok(StageDecision::fail(RejectCode::NotAuthorized, "frozen"))
        }
    }

    #[test]
    fn custom_stage_runs_after_builtins() {
        let mut view = FakeView::configured();
        view.owners.insert(0, principal("ST1TEST"));
        let mut gate = Gate::update();
        gate.add_stage(Box::new(AlwaysFail));
        assert_eq!(gate.stage_count(), 4);

        let result = gate
            .evaluate(&valid_update(0), &principal("ST1TEST"), &view)
            .unwrap();
        assert_eq!(
            result.decision,
            Decision::Rejected {
                code: RejectCode::NotAuthorized,
                reason: "frozen".into()
            }
        );
    }
}
