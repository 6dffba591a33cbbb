pub mod app;
pub mod error;
pub mod graph;
pub mod service;
pub mod util;

pub use app::controller::{Command, Controller, Event};
pub use app::{Session, Topic};
pub use error::{HierarchyError, ServiceError};
