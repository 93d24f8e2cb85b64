/// Colors, font requests and geometry.
pub mod core;
/// Error taxonomy.
pub mod error;
