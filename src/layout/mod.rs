//! Template assembly: turns a YAML layout plus an application name into a
//! tree descriptor ready for materialization.

mod app_name;
#[allow(clippy::module_inception)]
mod layout;

pub use app_name::AppName;
pub use layout::{Layout, LayoutError};
