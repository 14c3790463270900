use serde::Serialize;
use serde_json::Value;
use ureq::tls::{TlsConfig, TlsProvider};
use url::Url;

use crate::config::Settings;
use crate::constants::defaults;
use crate::data_mgmt::models::ObservationRecord;

use super::{
    BulkDatapoints, CreateRequest, GeoStore, GeoStreamsError, RemoteResource, ResourceId,
    ResourceKind,
};

const DATAPOINTS_BULK_ENDPOINT: &str = "datapoints/bulk";
const KEY_QUERY_PARAM: &str = "key";

/// Builds `<base>/api/geostreams/<endpoint>`, tolerating a trailing slash on the base
pub fn api_url(base_url: &Url, endpoint: &str) -> Result<Url, GeoStreamsError> {
    let mut url = base_url.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .map_err(|_| GeoStreamsError::CannotBeABase(base_url.to_string()))?
        .pop_if_empty()
        .extend(defaults::GEOSTREAMS_API_PATH.split('/'))
        .extend(endpoint.split('/').filter(|s| !s.is_empty()));
    Ok(url)
}

fn get_ureq_agent() -> ureq::Agent {
    ureq::Agent::config_builder()
        .tls_config(
            TlsConfig::builder()
                .provider(TlsProvider::NativeTls)
                .build(),
        )
        .build()
        .into()
}

/// Blocking HTTP client for the GeoStreams API
pub struct GeoStreamsClient {
    agent: ureq::Agent,
    base_url: Url,
    key: Option<String>,
}

impl GeoStreamsClient {
    pub fn new(base_url: Url, key: Option<String>) -> Self {
        GeoStreamsClient {
            agent: get_ureq_agent(),
            base_url,
            key: key.filter(|k| !k.is_empty()),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.base_url.clone(), settings.key.clone())
    }

    fn post_json<B: Serialize>(&self, endpoint: &str, body: &B) -> Result<Value, GeoStreamsError> {
        let url = api_url(&self.base_url, endpoint)?;
        let mut request = self.agent.post(url.as_str());
        if let Some(key) = &self.key {
            request = request.query(KEY_QUERY_PARAM, key);
        }
        let mut resp = request
            .send_json(body)
            .map_err(|source| GeoStreamsError::Transport {
                url: url.to_string(),
                source,
            })?;
        // Bulk uploads may answer with an empty or non-JSON body
        Ok(resp.body_mut().read_json::<Value>().unwrap_or(Value::Null))
    }
}

impl GeoStore for GeoStreamsClient {
    fn list_by_name(
        &self,
        kind: ResourceKind,
        name: &str,
    ) -> Result<Vec<RemoteResource>, GeoStreamsError> {
        let url = api_url(&self.base_url, kind.endpoint())?;
        log::debug!(
            "Calling GeoStreams url '{}' with {}='{}'",
            url,
            kind.name_query_key(),
            name
        );
        let mut request = self.agent.get(url.as_str()).query(kind.name_query_key(), name);
        if let Some(key) = &self.key {
            request = request.query(KEY_QUERY_PARAM, key);
        }
        let mut resp = request.call().map_err(|source| GeoStreamsError::Transport {
            url: url.to_string(),
            source,
        })?;
        resp.body_mut()
            .read_json::<Vec<RemoteResource>>()
            .map_err(|source| GeoStreamsError::Decode {
                url: url.to_string(),
                source,
            })
    }

    fn create(&self, request: &CreateRequest) -> Result<Option<ResourceId>, GeoStreamsError> {
        let endpoint = request.kind().endpoint();
        let resp = self.post_json(endpoint, request)?;
        let id = resp
            .get("id")
            .cloned()
            .and_then(|id| serde_json::from_value::<ResourceId>(id).ok());
        match &id {
            Some(id) => log::debug!("Created GeoStreams {}: id = '{}'", endpoint, id),
            None => log::debug!("Call to GeoStreams create {} returned no ID", endpoint),
        }
        Ok(id)
    }

    fn add_datapoints(
        &self,
        stream_id: &ResourceId,
        records: &[ObservationRecord],
    ) -> Result<(), GeoStreamsError> {
        self.post_json(
            DATAPOINTS_BULK_ENDPOINT,
            &BulkDatapoints::new(stream_id, records),
        )?;
        Ok(())
    }
}
