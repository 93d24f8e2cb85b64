/// Image decoding and PNG encoding.
pub mod decode;
