//! Built-in gate stages.

pub mod authority;
pub mod capacity;
pub mod fields;
pub mod ownership;
pub mod uniqueness;

pub use authority::AuthorityStage;
pub use capacity::CapacityStage;
pub use fields::{RegistrationFieldsStage, UpdateFieldsStage};
pub use ownership::{ExistenceStage, OwnershipStage};
pub use uniqueness::UniquenessStage;
