mod central_panel;
mod shape_list_panel;
mod tools_panel;

pub use central_panel::central_panel;
pub use shape_list_panel::shape_list_panel;
pub use tools_panel::tools_panel;
