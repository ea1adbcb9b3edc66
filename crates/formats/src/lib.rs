pub mod route_manifest;
pub mod slot_paths;

pub use route_manifest::*;
pub use slot_paths::*;
