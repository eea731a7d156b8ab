pub mod expected;
pub mod extraction;
pub mod mantissa;

pub use expected::{expected, ExpectedDistribution};
pub use extraction::{DigitBase, DiscardTally};
