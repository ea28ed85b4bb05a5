//! Intervention selection and message templating.

pub mod messages;
pub mod selector;

pub use messages::MessageTemplates;
pub use selector::{DecisionInputs, InterventionSelector};
