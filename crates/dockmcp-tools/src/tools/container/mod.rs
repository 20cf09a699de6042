//! Container tools

mod copy;
mod create;
mod exec;
mod lifecycle;
mod list;
mod logs;
mod recreate;
mod run;

pub use copy::CopyToContainerTool;
pub use create::CreateContainerTool;
pub use exec::ExecContainerTool;
pub use lifecycle::{RemoveContainerTool, StartContainerTool, StopContainerTool};
pub use list::ListContainersTool;
pub use logs::FetchContainerLogsTool;
pub use recreate::RecreateContainerTool;
pub use run::RunContainerTool;

use crate::runtime::CreatedContainer;
use serde_json::{Map, Value};

/// `{"80/tcp": {}}` to `["80/tcp"]`
fn port_keys(ports: &Map<String, Value>) -> Vec<String> {
    ports.keys().cloned().collect()
}

fn container_text(verb: &str, created: &CreatedContainer) -> String {
    format!(
        "Container {} successfully. ID: {}, Name: {}",
        verb,
        created.id,
        created.name.as_deref().unwrap_or_default()
    )
}
