pub mod frequency;
pub mod goodness_of_fit;
pub mod result;

pub use frequency::FrequencyTable;
pub use result::{
    run_digit_test, ChiSquareStat, DigitFrequency, HighZ, KsStat, MadStat, TestResult, TestSettings,
};
