use std::fs;

use anyhow::Context;

use crate::argsets::ProcessArgs;
use crate::config::Settings;
use crate::constants::defaults;
use crate::data_mgmt::summary::RunOutcome;
use crate::interfaces::geostreams::GeoStreamsClient;
use crate::run::Orchestrator;

pub fn process(args: ProcessArgs) -> anyhow::Result<RunOutcome> {
    let settings = Settings::new(&args)?;
    log::debug!(
        "GeoStreams at {} for site '{}', batch size {}",
        settings.base_url,
        settings.site,
        settings.batch_size
    );
    let client = GeoStreamsClient::from_settings(&settings);

    let outcome = Orchestrator::new(&client, &settings).run(&args.files)?;
    if let RunOutcome::Precondition { message, .. } = &outcome {
        log::warn!("{}", message);
    }

    let result = serde_json::to_string_pretty(&outcome.to_json())?;
    if let Some(working_space) = &settings.working_space {
        let result_path = working_space.join(defaults::RESULT_FILENAME);
        fs::write(&result_path, &result)
            .with_context(|| format!("writing result to {}", result_path.display()))?;
    }
    println!("{result}");

    Ok(outcome)
}
