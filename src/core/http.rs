use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING};
use reqwest::Client;

use crate::core::settings::InstallerSettings;

const APP_USER_AGENT: &str = concat!("packsmith/", env!("CARGO_PKG_VERSION"));

/// Shared client for catalog lookups and mod downloads.
///
/// Only the connect phase and the gap between reads are bounded; a body that
/// keeps arriving may take as long as it needs.
pub fn build_http_client(settings: &InstallerSettings) -> Result<Client, reqwest::Error> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));

    Client::builder()
        .user_agent(APP_USER_AGENT)
        .default_headers(default_headers)
        .connect_timeout(settings.connect_timeout())
        .read_timeout(settings.read_timeout())
        .build()
}
