//! Cart validation and repair.

mod defect;
mod repair;
mod validator;

pub use defect::{Defect, DefectCategory, LineField};
pub use repair::{CartRepairer, DropReason, RepairAction, RepairReport};
pub use validator::{CartValidationSummary, CartValidator, LineValidation};
