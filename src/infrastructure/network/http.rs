// HTTP client utilities
use crate::domain::error::TranslateError;
use crate::infrastructure::config::HttpSettings;
use reqwest::Client;
use std::time::Duration;

/// Create the shared HTTP client.
///
/// Connect and read timeouts live on the client; the total budget of a
/// non-streamed call is applied per request.
pub fn create_client(settings: &HttpSettings, proxy: Option<&str>) -> Result<Client, TranslateError> {
    let mut builder = Client::builder()
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
        .read_timeout(Duration::from_secs(settings.read_timeout_secs))
        .user_agent(settings.user_agent.as_str());

    if let Some(proxy) = proxy.filter(|p| !p.is_empty()) {
        builder = builder.proxy(reqwest::Proxy::all(proxy)?);
    }

    Ok(builder.build()?)
}
