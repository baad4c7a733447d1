pub mod traits;
pub mod stream;
pub mod normalizer;
pub mod prelude;

pub use traits::*;
pub use stream::*;
pub use normalizer::*;
