//! Engine-related configuration methods

use crate::error::{Error, Result};
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
use base64::Engine as _;

use super::EngineConfig;

/// Port used by Elastic Cloud deployments that do not name one
const DEFAULT_CLOUD_PORT: u16 = 443;

impl EngineConfig {
    /// Resolve the base URL requests are sent to
    ///
    /// A configured `cloud_id` takes precedence over `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the cloud id cannot be decoded or `url` is empty.
    pub fn endpoint(&self) -> Result<String> {
        match self.cloud_id.as_deref().map(str::trim) {
            Some(cloud_id) if !cloud_id.is_empty() => Self::decode_cloud_id(cloud_id),
            _ => {
                let url = self.url.trim().trim_end_matches('/');
                if url.is_empty() {
                    return Err(Error::config("engine.url must not be empty".to_string()));
                }
                Ok(url.to_string())
            }
        }
    }

    /// Decode an Elastic Cloud id into the https endpoint of its Elasticsearch node
    ///
    /// A cloud id looks like `<label>:<base64>`, where the payload decodes to
    /// `<domain>[:<port>]$<es_uuid>$<kibana_uuid>`. The endpoint is
    /// `https://<es_uuid>.<domain>:<port>`, port defaulting to 443.
    pub fn decode_cloud_id(cloud_id: &str) -> Result<String> {
        let payload = cloud_id
            .rsplit_once(':')
            .map_or(cloud_id, |(_, payload)| payload);

        let decoded = STANDARD
            .decode(payload)
            .or_else(|_| STANDARD_NO_PAD.decode(payload))
            .map_err(|e| Error::config(format!("Invalid cloud id: not base64 ({e})")))?;
        let decoded = String::from_utf8(decoded)
            .map_err(|e| Error::config(format!("Invalid cloud id: not UTF-8 ({e})")))?;

        let mut parts = decoded.split('$');
        let domain = parts.next().unwrap_or_default();
        let es_uuid = parts.next().unwrap_or_default();
        if domain.is_empty() || es_uuid.is_empty() {
            return Err(Error::config(
                "Invalid cloud id: expected '<domain>$<es_uuid>$...'".to_string(),
            ));
        }

        let (host, port) = match domain.rsplit_once(':') {
            Some((host, port)) => {
                let port = port.parse::<u16>().map_err(|e| {
                    Error::config(format!("Invalid cloud id: bad port '{port}' ({e})"))
                })?;
                (host, port)
            }
            None => (domain, DEFAULT_CLOUD_PORT),
        };

        Ok(format!("https://{es_uuid}.{host}:{port}"))
    }
}
