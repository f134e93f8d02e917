//! Safety Arbiter
//!
//! Maps each classified [`Intent`](intent_bridge::Intent) to exactly one
//! [`Instruction`]. Precedence is fixed: emergency braking overrides
//! everything, recognized gesture and posture intents carry hard-coded
//! safety responses, and only what remains consults the generic rule
//! table. Arbitration is total; there is no error path.

mod arbiter;
mod instruction;
mod rules;

pub use arbiter::SafetyArbiter;
pub use instruction::{Instruction, InstructionCode, Params, Priority, Role};
pub use rules::{lookup_rule, Rule, RULES};
