pub mod cooperative;
pub mod strategy;
pub mod unwinding;
