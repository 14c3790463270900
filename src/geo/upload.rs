use thiserror::Error;

use crate::data_mgmt::models::ObservationRecord;
use crate::interfaces::geostreams::{GeoStore, GeoStreamsError, ResourceId};
use crate::readers::irrigation_csv::ParseError;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("uploading {batch_len} data points to stream {stream_id} failed after {uploaded} were added: {source}")]
    Flush {
        stream_id: ResourceId,
        batch_len: usize,
        uploaded: usize,
        #[source]
        source: GeoStreamsError,
    },
    #[error("reading records failed after {uploaded} data points were added: {source}")]
    Read {
        uploaded: usize,
        #[source]
        source: ParseError,
    },
}

/// Sends records to a stream in bulk requests.
///
/// A batch is flushed once it holds *more* than `batch_size` records, so
/// requests carry up to `batch_size + 1` data points. The remote side has
/// always been fed chunks of that size, and the boundary is kept as is.
pub struct BatchUploader<'a, S: GeoStore> {
    store: &'a S,
    batch_size: usize,
}

impl<'a, S: GeoStore> BatchUploader<'a, S> {
    pub fn new(store: &'a S, batch_size: usize) -> Self {
        BatchUploader { store, batch_size }
    }

    /// Uploads every record in order, returning how many were accepted.
    /// A record source error stops the upload; buffered records are dropped.
    pub fn upload_all<I>(&self, records: I, stream_id: &ResourceId) -> Result<usize, UploadError>
    where
        I: IntoIterator<Item = Result<ObservationRecord, ParseError>>,
    {
        let mut uploaded = 0;
        let mut batch = Vec::new();

        for record in records {
            let record = record.map_err(|source| UploadError::Read { uploaded, source })?;
            batch.push(record);
            if batch.len() > self.batch_size {
                log::debug!("Adding {} data points", batch.len());
                uploaded += self.flush(&mut batch, stream_id, uploaded)?;
            }
        }

        log::debug!(
            "Remaining number of points: {} vs max: {}",
            batch.len(),
            self.batch_size
        );
        if !batch.is_empty() {
            log::debug!("Adding {} remaining data points", batch.len());
            uploaded += self.flush(&mut batch, stream_id, uploaded)?;
        }

        Ok(uploaded)
    }

    fn flush(
        &self,
        batch: &mut Vec<ObservationRecord>,
        stream_id: &ResourceId,
        uploaded: usize,
    ) -> Result<usize, UploadError> {
        self.store
            .add_datapoints(stream_id, batch)
            .map_err(|source| UploadError::Flush {
                stream_id: stream_id.clone(),
                batch_len: batch.len(),
                uploaded,
                source,
            })?;
        let flushed = batch.len();
        batch.clear();
        Ok(flushed)
    }
}
