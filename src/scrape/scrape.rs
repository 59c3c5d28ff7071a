// src/scrape/scrape.rs
use std::{error::Error, fs, time::Instant};

use crate::{
    config::options::{AppOptions, Source},
    core::net,
    model::ResultsModel,
    specs, store,
};

/// Collect the event results into memory: obtain the page HTML from the
/// configured source, then hand it to the results spec.
pub fn collect_results(options: &AppOptions) -> Result<ResultsModel, Box<dyn Error>> {
    let html_doc = match &options.scrape.source {
        Source::File(path) => fs::read_to_string(path)
            .map_err(|e| format!("Could not read {}: {}", path.display(), e))?,
        Source::Cached => store::load_snapshot()
            .ok_or("No cached results page; run a live scrape first")?,
        Source::Live => {
            let doc = net::http_get(&options.scrape.page)?;
            // best-effort cache; a failed write never kills the scrape
            if let Err(e) = store::save_snapshot(&doc) {
                loge!("Results: snapshot save failed: {e}");
            }
            doc
        }
    };

    logf!("Results: page loaded ({} bytes)", html_doc.len());

    let t = Instant::now();
    let model = specs::results::parse_doc(&html_doc)?;
    logd!(
        "Results: parsed {} drivers across {} classes in {:?}",
        model.drivers.len(),
        model.classes.len(),
        t.elapsed()
    );
    Ok(model)
}
