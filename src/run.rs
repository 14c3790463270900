use std::path::PathBuf;

use thiserror::Error;

use crate::config::Settings;
use crate::constants::transformer;
use crate::data_mgmt::models::Geometry;
use crate::data_mgmt::summary::{RunOutcome, SummaryBuilder};
use crate::geo::{BatchUploader, CreationArgs, ResolveError, Resolver, UploadError};
use crate::interfaces::geostreams::{GeoStore, ResourceId, SensorType};
use crate::readers::irrigation_csv::{self, ParseError};
use crate::sensors;

const PRECONDITION_FAILED: i32 = -1;

/// Stages of a run, in the order they are entered
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Start,
    SensorResolved,
    StreamResolved,
    Uploading,
    Done,
}

#[derive(Error, Debug)]
pub enum RunError {
    #[error("could not resolve sensor: {0}")]
    Sensor(#[source] ResolveError),
    #[error("could not resolve stream: {0}")]
    Stream(#[source] ResolveError),
    #[error("could not read '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
    #[error("reading '{path}' failed after {uploaded} data points were added: {source}")]
    Read {
        path: PathBuf,
        uploaded: usize,
        #[source]
        source: ParseError,
    },
    #[error(transparent)]
    Upload(UploadError),
}

impl RunError {
    /// Last state the run had reached before failing
    pub fn state(&self) -> RunState {
        match self {
            RunError::Sensor(_) => RunState::Start,
            RunError::Stream(_) => RunState::SensorResolved,
            RunError::Parse { .. } => RunState::StreamResolved,
            RunError::Read { .. } | RunError::Upload(_) => RunState::Uploading,
        }
    }
}

/// Loads one flow meter file into its GeoStreams stream
pub struct Orchestrator<'a, S: GeoStore> {
    store: &'a S,
    settings: &'a Settings,
}

impl<'a, S: GeoStore> Orchestrator<'a, S> {
    pub fn new(store: &'a S, settings: &'a Settings) -> Self {
        Orchestrator { store, settings }
    }

    pub fn run(&self, files: &[PathBuf]) -> Result<RunOutcome, RunError> {
        let mut summary = SummaryBuilder::start(files.len());

        let Some(file_to_load) = irrigation_csv::select_file_to_load(files) else {
            return Ok(RunOutcome::Precondition {
                code: PRECONDITION_FAILED,
                message: irrigation_csv::no_file_message(),
            });
        };

        let geometry = Geometry::point(&transformer::REFERENCE_COORDINATES);
        let mut resolver = Resolver::new(self.store);

        let sensor_id = self
            .resolve_sensor(&mut resolver, geometry.clone())
            .map_err(RunError::Sensor)?;
        log::debug!("Sensor resolved: {}", sensor_id);

        let stream_id = resolver
            .resolve_or_create(
                transformer::STREAM_NAME,
                &CreationArgs::Stream {
                    geometry,
                    sensor_id,
                    properties: None,
                },
            )
            .map_err(RunError::Stream)?;
        log::debug!("Stream resolved: {}", stream_id);

        log::info!("Processing file: '{}'", file_to_load.display());
        let records =
            irrigation_csv::parse_file(file_to_load, &transformer::REFERENCE_COORDINATES)
                .map_err(|source| RunError::Parse {
                    path: file_to_load.clone(),
                    source,
                })?;

        let uploaded = BatchUploader::new(self.store, self.settings.batch_size)
            .upload_all(records, &stream_id)
            .map_err(|e| match e {
                UploadError::Read { uploaded, source } => RunError::Read {
                    path: file_to_load.clone(),
                    uploaded,
                    source,
                },
                e => RunError::Upload(e),
            })?;
        summary.add_uploaded(uploaded);

        let summary = summary.finish();
        log::info!(
            "Added {} data points from {} in {:.1}s",
            summary.records_uploaded,
            file_to_load.display(),
            summary.elapsed.as_secs_f32()
        );
        Ok(RunOutcome::Completed(summary))
    }

    fn resolve_sensor(
        &self,
        resolver: &mut Resolver<'_, S>,
        geometry: Geometry,
    ) -> Result<ResourceId, ResolveError> {
        let display_name = sensors::display_name(transformer::SENSOR, &self.settings.site);
        resolver.resolve_or_create(
            &display_name,
            &CreationArgs::Sensor {
                geometry,
                sensor_type: SensorType {
                    id: transformer::SENSOR_TYPE_TITLE.to_string(),
                    title: transformer::SENSOR_TYPE_TITLE.to_string(),
                    sensor_type: transformer::SENSOR_TYPE,
                },
                region: transformer::SENSOR_REGION.to_string(),
            },
        )
    }
}
