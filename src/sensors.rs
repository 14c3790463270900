use std::collections::HashMap;

use once_cell::sync::Lazy;

// site -> sensor -> display name
static STATIONS: Lazy<HashMap<&str, HashMap<&str, &str>>> = Lazy::new(|| {
    HashMap::from([(
        "ua-mac",
        HashMap::from([
            ("irrigation_datparser", "AZMET Maricopa Irrigation"),
            ("weather_datparser", "AZMET Maricopa Weather Station"),
            ("envlog_netcdf", "EnvironmentLogger netCDFs"),
        ]),
    )])
});

/// Name under which a sensor is published for a site. Unknown pairs fall
/// back to the sensor's own name.
pub fn display_name(sensor: &str, site: &str) -> String {
    match STATIONS.get(site).and_then(|sensors| sensors.get(sensor)) {
        Some(name) => name.to_string(),
        None => {
            log::warn!(
                "No display name for sensor '{}' at site '{}'; using sensor name",
                sensor,
                site
            );
            sensor.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_sensor_display_name() {
        assert_eq!(
            display_name("irrigation_datparser", "ua-mac"),
            "AZMET Maricopa Irrigation"
        );
    }

    #[test]
    fn unknown_site_falls_back_to_sensor_name() {
        assert_eq!(
            display_name("irrigation_datparser", "ksu"),
            "irrigation_datparser"
        );
    }
}
