mod central_panel;
mod tools_panel;

pub(crate) use central_panel::central_panel;
pub(crate) use tools_panel::tools_panel;
