use crate::{
    browser::session::BrowserSession,
    error::FillerError,
    field::extractor::{FieldScan, find_fields},
    matcher::data::DataDictionary,
    trace::logger::TraceLogger,
    traversal::{
        controller::{FormTraversalController, PageSource},
        traversal_model::{PageSignals, RunReport, TraversalConfig},
    },
};

pub mod browser;
pub mod cli;
pub mod error;
pub mod field;
pub mod matcher;
pub mod trace;
pub mod traversal;

/// Scan the current page of a live session: extract the DOM snapshot and
/// run field detection over it.
pub fn scan_page(
    session: &mut BrowserSession,
) -> Result<(PageSignals, FieldScan), FillerError> {
    let snapshot = session.scan()?;
    let scan = find_fields(&snapshot.elements);
    Ok((snapshot.signals, scan))
}

/// Navigate to a form page and run the full traversal.
///
/// Failing to reach the page at all is the one condition that aborts before
/// step 1; everything after that is accumulated into the returned report.
pub fn run_fill(
    session: &mut BrowserSession,
    url: &str,
    data: &DataDictionary,
    config: TraversalConfig,
    tracer: &TraceLogger,
) -> Result<RunReport, FillerError> {
    session.navigate(url)?;

    let controller = FormTraversalController::new(config, tracer);
    Ok(controller.run(session, data))
}
