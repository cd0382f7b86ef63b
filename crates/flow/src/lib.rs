//! Interview flow control
//!
//! The decision core of the survey agent: given the current question, the
//! classification of the respondent's answer, and the raw answer text, decide
//! what happens next. Pure and synchronous; all I/O lives in the caller.

pub mod controller;
pub mod sentiment;
pub mod urdu;

pub use controller::{next_step, FlowError, NextStep, SCALE_GUIDANCE};
pub use sentiment::{scale_value, sentiment, Sentiment};
