pub mod client;
pub mod model;

pub use client::CatalogClient;
pub use model::{AddonInfo, LatestFile, RemoteFileDescriptor};
