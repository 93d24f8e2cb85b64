/// Header validation and record streaming.
pub mod reader;
