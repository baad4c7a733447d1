pub mod balance;
pub mod market;
pub mod order;
pub mod venue;

pub use balance::*;
pub use market::*;
pub use order::*;
pub use venue::*;
