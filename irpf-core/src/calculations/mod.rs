//! Monthly IRPF calculation pipeline.
//!
//! Deductions feed the progressive table, whose tax is then reduced under
//! Lei 15.270/2025. The selector runs the pipeline for both deduction
//! methods and keeps the cheaper one.

pub mod common;
pub mod deductions;
pub mod engine;
pub mod progressive;
pub mod reduction;
pub mod selector;

pub use deductions::{DeductionBreakdown, deductions_for, itemized_deductions, simplified_deductions};
pub use engine::IrpfEngine;
pub use progressive::{BracketLookup, apply_progressive_table};
pub use reduction::{StatutoryReduction, calculate_statutory_reduction, reduction_tier};
pub use selector::select_best_method;
