// Core modules implementing wait scheduling and error modeling.
pub mod error;
pub mod schedule;
