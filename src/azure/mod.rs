// src/azure/mod.rs
pub mod client;
pub mod environment;
pub mod error;
pub mod lro;
pub mod registry;
pub mod resources;
pub mod storage;
pub mod token;

pub use client::ArmClient;
pub use environment::AzureEnvironment;
pub use error::ArmError;
pub use lro::PollConfig;
pub use registry::Registry;
pub use resources::ResourceGroup;
pub use storage::StorageAccount;
pub use token::{ServicePrincipalToken, StaticToken, TokenCredential};
