//! Test orchestration: the session, the derived tests and the one-shot
//! entry points.

mod battery;
pub mod duplicates;
pub mod functions;
pub mod mantissas;
pub mod rolling;
pub mod second_order;
pub mod session;
pub mod summation;

pub use duplicates::{duplicates, DuplicateEntry, DuplicatesReport};
pub use functions::{digit_test, first_digits, last_two_digits, mad, mse, second_digit};
pub use mantissas::{
    arc_test, mantissa_stats, mantissa_test, ArcTest, MantissaReference, MantissaStats,
};
pub use rolling::{rolling_mad, rolling_mse};
pub use second_order::{second_order_differences, second_order_test, SecondOrderResult};
pub use session::{AnalysisSession, SessionOutput};
pub use summation::{mad_summ, summation_test, SummationResult, SummationRow};
