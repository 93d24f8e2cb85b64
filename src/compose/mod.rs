/// Template + name to artifact.
pub mod certificate;
