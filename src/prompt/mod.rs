//! Instruction text sent to the generation service.
pub mod constructor;

pub use constructor::PromptConstructor;
