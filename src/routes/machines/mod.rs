mod handlers;
mod types;

pub use handlers::{create_machine, delete_machine, get_machine, list_machines, update_machine};
pub use types::{MachineInput, MachineResponse};

// Re-export utoipa path structs for OpenAPI documentation
pub use handlers::{
    __path_create_machine, __path_delete_machine, __path_get_machine, __path_list_machines,
    __path_update_machine,
};
