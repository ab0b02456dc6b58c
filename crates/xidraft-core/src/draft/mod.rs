// Drafting domain: slot eligibility, squad state, chemistry and the
// candidate engine.

pub mod chemistry;
pub mod engine;
pub mod positions;
pub mod random;
pub mod squad;
