//! Image tools

mod build;
pub mod credentials;
mod list;
mod pull;
mod push;
mod remove;
mod tag;

pub use build::BuildImageTool;
pub use credentials::CredentialStore;
pub use list::ListImagesTool;
pub use pull::PullImageTool;
pub use push::PushImageTool;
pub use remove::RemoveImageTool;
pub use tag::TagImageTool;
