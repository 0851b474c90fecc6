pub mod combination;
pub mod decomposition;
pub mod detection;

pub use combination::*;
pub use decomposition::*;
pub use detection::*;
