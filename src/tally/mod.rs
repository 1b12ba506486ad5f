pub mod assertions;
pub mod context;
pub mod counters;
pub mod host;
pub mod notifier;
pub mod tally;
pub mod verbosity;
