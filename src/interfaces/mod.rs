pub mod geostreams;
