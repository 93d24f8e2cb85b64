/// Deterministic block-glyph backend.
pub mod fixed;
/// Backend traits and centering.
pub mod layout;
/// System-font backend built on parley and vello_cpu.
pub mod parley_backend;
