use std::collections::HashMap;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::data_mgmt::models::Geometry;
use crate::interfaces::geostreams::{
    CreateRequest, GeoStore, GeoStreamsError, NewSensor, NewStream, ResourceId, ResourceKind,
    SensorProperties, SensorType,
};

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("{0} name must not be empty")]
    EmptyName(ResourceKind),
    #[error("lookup of {kind} '{name}' failed: {source}")]
    Lookup {
        kind: ResourceKind,
        name: String,
        #[source]
        source: GeoStreamsError,
    },
    #[error("creation of {kind} '{name}' failed: {source}")]
    Create {
        kind: ResourceKind,
        name: String,
        #[source]
        source: GeoStreamsError,
    },
    #[error("no identifier returned for {kind} '{name}'")]
    MissingId { kind: ResourceKind, name: String },
}

/// What to create if a sensor or stream does not exist yet
#[derive(Clone, Debug, PartialEq)]
pub enum CreationArgs {
    Sensor {
        geometry: Geometry,
        sensor_type: SensorType,
        region: String,
    },
    Stream {
        geometry: Geometry,
        sensor_id: ResourceId,
        properties: Option<Map<String, Value>>,
    },
}

impl CreationArgs {
    pub fn kind(&self) -> ResourceKind {
        match self {
            CreationArgs::Sensor { .. } => ResourceKind::Sensor,
            CreationArgs::Stream { .. } => ResourceKind::Stream,
        }
    }

    fn to_request(&self, name: &str) -> CreateRequest {
        match self {
            CreationArgs::Sensor {
                geometry,
                sensor_type,
                region,
            } => CreateRequest::Sensor(NewSensor {
                name: name.to_string(),
                kind: "Point",
                geometry: geometry.clone(),
                properties: SensorProperties {
                    popup_content: name.to_string(),
                    sensor_type: sensor_type.clone(),
                    name: name.to_string(),
                    region: region.clone(),
                },
            }),
            CreationArgs::Stream {
                geometry,
                sensor_id,
                properties,
            } => CreateRequest::Stream(NewStream {
                name: name.to_string(),
                kind: "Feature",
                geometry: geometry.clone(),
                properties: properties.clone().unwrap_or_default(),
                sensor_id: sensor_id.clone(),
            }),
        }
    }
}

/// Looks up sensors and streams by exact name, creating them when missing.
/// Identifiers are remembered, so each name is resolved at most once.
pub struct Resolver<'a, S: GeoStore> {
    store: &'a S,
    resolved: HashMap<(ResourceKind, String), ResourceId>,
}

impl<'a, S: GeoStore> Resolver<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Resolver {
            store,
            resolved: HashMap::new(),
        }
    }

    pub fn resolve_or_create(
        &mut self,
        name: &str,
        args: &CreationArgs,
    ) -> Result<ResourceId, ResolveError> {
        let kind = args.kind();
        if name.is_empty() {
            return Err(ResolveError::EmptyName(kind));
        }
        let key = (kind, name.to_string());
        if let Some(id) = self.resolved.get(&key) {
            return Ok(id.clone());
        }

        let id = match self.find(kind, name)? {
            Some(id) => id,
            None => self.create(name, args)?,
        };
        self.resolved.insert(key, id.clone());
        Ok(id)
    }

    fn find(&self, kind: ResourceKind, name: &str) -> Result<Option<ResourceId>, ResolveError> {
        let listed = self
            .store
            .list_by_name(kind, name)
            .map_err(|source| ResolveError::Lookup {
                kind,
                name: name.to_string(),
                source,
            })?;

        match listed
            .into_iter()
            .find(|r| r.name.as_deref() == Some(name))
        {
            Some(found) => {
                let id = found.id.ok_or_else(|| ResolveError::MissingId {
                    kind,
                    name: name.to_string(),
                })?;
                log::debug!("Found {} '{}' = [{}]", kind, name, id);
                Ok(Some(id))
            }
            None => Ok(None),
        }
    }

    fn create(&self, name: &str, args: &CreationArgs) -> Result<ResourceId, ResolveError> {
        let kind = args.kind();
        log::info!("Creating {} '{}'", kind, name);
        self.store
            .create(&args.to_request(name))
            .map_err(|source| ResolveError::Create {
                kind,
                name: name.to_string(),
                source,
            })?
            .ok_or_else(|| {
                log::error!("Creation of {} '{}' returned no identifier", kind, name);
                ResolveError::MissingId {
                    kind,
                    name: name.to_string(),
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::interfaces::geostreams::fake::{Call, FakeStore};

    fn sensor_args() -> CreationArgs {
        CreationArgs::Sensor {
            geometry: Geometry::point(&[-111.97, 33.07, 361.0]),
            sensor_type: SensorType {
                id: "MAC Met Station".into(),
                title: "MAC Met Station".into(),
                sensor_type: 4,
            },
            region: "Maricopa".into(),
        }
    }

    fn stream_args(sensor_id: &str) -> CreationArgs {
        CreationArgs::Stream {
            geometry: Geometry::point(&[-111.97, 33.07, 361.0]),
            sensor_id: ResourceId::new(sensor_id),
            properties: None,
        }
    }

    #[test]
    fn existing_resource_is_not_created() {
        let store = FakeStore::new().with_resource(ResourceKind::Sensor, "Irrigation", "s1");
        let mut resolver = Resolver::new(&store);
        let id = resolver.resolve_or_create("Irrigation", &sensor_args()).unwrap();
        assert_eq!(id, ResourceId::new("s1"));
        assert_eq!(store.creates(), 0);
    }

    #[test]
    fn missing_resource_is_created_once() {
        let store = FakeStore::new();
        let mut resolver = Resolver::new(&store);
        let id = resolver.resolve_or_create("Irrigation", &sensor_args()).unwrap();
        assert_eq!(
            store.calls(),
            vec![
                Call::List(ResourceKind::Sensor, "Irrigation".into()),
                Call::Create(ResourceKind::Sensor, "Irrigation".into()),
            ]
        );
        assert_eq!(id, ResourceId::new("sensor-1"));
    }

    #[test]
    fn resolving_twice_returns_same_id() {
        let store = FakeStore::new();

        let first = Resolver::new(&store)
            .resolve_or_create("Irrigation Observations", &stream_args("s1"))
            .unwrap();
        // A fresh resolver has no memory and must find the persisted stream
        let second = Resolver::new(&store)
            .resolve_or_create("Irrigation Observations", &stream_args("s1"))
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(store.creates(), 1);
        assert_eq!(store.lookups(), 2);
    }

    #[test]
    fn resolved_ids_are_not_looked_up_again() {
        let store = FakeStore::new().with_resource(ResourceKind::Stream, "Irrigation", "st1");
        let mut resolver = Resolver::new(&store);
        resolver.resolve_or_create("Irrigation", &stream_args("s1")).unwrap();
        resolver.resolve_or_create("Irrigation", &stream_args("s1")).unwrap();
        assert_eq!(store.lookups(), 1);
    }

    #[test]
    fn only_exact_names_match() {
        let store = FakeStore::new()
            .with_resource(ResourceKind::Sensor, "Irrigation Meter 2", "s2")
            .with_resource(ResourceKind::Sensor, "irrigation", "s3");
        let mut resolver = Resolver::new(&store);
        let id = resolver.resolve_or_create("Irrigation", &sensor_args()).unwrap();
        assert_eq!(store.creates(), 1);
        assert_ne!(id, ResourceId::new("s2"));
        assert_ne!(id, ResourceId::new("s3"));
    }

    #[test]
    fn kinds_are_resolved_separately() {
        let store = FakeStore::new().with_resource(ResourceKind::Sensor, "Irrigation", "s1");
        let mut resolver = Resolver::new(&store);
        let id = resolver.resolve_or_create("Irrigation", &stream_args("s1")).unwrap();
        assert_eq!(id, ResourceId::new("stream-1"));
    }

    #[test]
    fn failed_lookup_is_not_treated_as_missing() {
        let store = FakeStore::new().failing_lookups();
        let mut resolver = Resolver::new(&store);
        let err = resolver.resolve_or_create("Irrigation", &sensor_args()).unwrap_err();
        assert!(matches!(err, ResolveError::Lookup { .. }));
        assert_eq!(store.creates(), 0);
    }

    #[test]
    fn failed_create_is_reported() {
        let store = FakeStore::new().failing_creates();
        let err = Resolver::new(&store)
            .resolve_or_create("Irrigation", &sensor_args())
            .unwrap_err();
        assert!(matches!(err, ResolveError::Create { .. }));
    }

    #[test]
    fn create_without_id_is_rejected() {
        let store = FakeStore::new().without_created_ids();
        let err = Resolver::new(&store)
            .resolve_or_create("Irrigation", &sensor_args())
            .unwrap_err();
        assert!(matches!(err, ResolveError::MissingId { kind: ResourceKind::Sensor, .. }));
    }

    #[test]
    fn empty_name_is_rejected_without_requests() {
        let store = FakeStore::new();
        let err = Resolver::new(&store)
            .resolve_or_create("", &sensor_args())
            .unwrap_err();
        assert!(matches!(err, ResolveError::EmptyName(ResourceKind::Sensor)));
        assert!(store.calls().is_empty());
    }

    #[test]
    fn stream_request_carries_sensor_id() {
        let request = stream_args("42").to_request("Irrigation Observations");
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["sensor_id"], "42");
        assert_eq!(body["type"], "Feature");
        assert_eq!(body["properties"], serde_json::json!({}));
    }
}
