pub mod engine;

pub use engine::{DownloadReport, DownloadedMod, FailedMod, ModDownloader};
