mod edit_handle;

pub use edit_handle::{EditHandle, HandleRole};
