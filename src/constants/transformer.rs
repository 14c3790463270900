pub const NAME: &str = "terra.environmental.irrigation_datparser";
pub const VERSION: &str = "2.0";
pub const DESCRIPTION: &str = "Met Station Irrigation CSV file parser";

pub const SENSOR: &str = "irrigation_datparser";
pub const SENSOR_TYPE: i32 = 4;
pub const SENSOR_TYPE_TITLE: &str = "MAC Met Station";
pub const SENSOR_REGION: &str = "Maricopa";
pub const STREAM_NAME: &str = "Irrigation Observations";

pub const FILENAME_START: &str = "flowmetertotals";
pub const FILENAME_END: &str = ".csv";

// Longitude, latitude, elevation of the Maricopa field station
pub const REFERENCE_COORDINATES: [f64; 3] = [-111.974304, 33.075576, 361.0];
