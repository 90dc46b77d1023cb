//! Configuration sources, in precedence order.

pub(crate) mod environment;
pub(crate) mod global_file;
pub(crate) mod workspace_file;
