// Cheque module - payment orders, their signed authorizations, and the registry

mod builder;
mod model;
mod registry;

pub use builder::*;
pub use model::*;
pub use registry::*;
