/// Premultiplied RGBA8 compositing.
pub mod composite;
/// Owned pixel surface.
pub mod surface;
