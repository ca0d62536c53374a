//! Prebuilt simulation setups for testing and examples.

mod basic;
pub use basic::basic;

mod generic;
pub use generic::generic;

mod unknown_destination;
pub use unknown_destination::unknown_destination;
