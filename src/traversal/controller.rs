use crate::error::FillerError;
use crate::field::extractor::find_fields;
use crate::field::field_model::{FieldRecord, FieldType, RawElement, SelectOption};
use crate::matcher::data::DataDictionary;
use crate::matcher::label_matcher::{MatcherConfig, best_match_with};
use crate::trace::{logger::TraceLogger, trace::TraceEvent};
use crate::traversal::traversal_model::{
    PageSignals, RunReport, TraversalConfig, TraversalPhase, TraversalState,
};

// ============================================================================
// Collaborator seams
// ============================================================================

/// One scan of the current page: identity signals plus the raw elements.
#[derive(Debug, Clone)]
pub struct PageSnapshot {
    pub signals: PageSignals,
    pub elements: Vec<RawElement>,
}

/// The DOM source. Backed by a live browser session in production, by
/// scripted snapshots in tests.
pub trait PageSource {
    fn scan(&mut self) -> Result<PageSnapshot, FillerError>;

    /// Wait for the page to reach a ready state after navigation. A
    /// `NavigationTimeout` here is a warning, not a failure: partially
    /// rendered pages often still carry usable forms.
    fn settle(&mut self, timeout_ms: u64) -> Result<(), FillerError>;
}

/// The input-synthesis layer. One action completes before the next is
/// issued; the core adds no pacing of its own.
pub trait InputDriver {
    fn fill_text(&mut self, field: &FieldRecord, value: &str) -> Result<(), FillerError>;
    fn select_option(&mut self, field: &FieldRecord, option_index: usize)
    -> Result<(), FillerError>;
    fn click(&mut self, field: &FieldRecord) -> Result<(), FillerError>;
}

/// Both collaborator seams in one object, the shape a live browser session
/// has. Anything implementing both gets this for free.
pub trait TraversalBrowser: PageSource + InputDriver {}

impl<T: PageSource + InputDriver> TraversalBrowser for T {}

// ============================================================================
// Field partitioning
// ============================================================================

/// Extracted fields split into the three actionable buckets. Buttons with
/// neither navigation role land in none of them and are never interacted
/// with.
#[derive(Debug, Default)]
pub struct PartitionedFields {
    pub input_fields: Vec<FieldRecord>,
    pub next_buttons: Vec<FieldRecord>,
    pub final_submit_buttons: Vec<FieldRecord>,
}

pub fn partition_fields(fields: Vec<FieldRecord>) -> PartitionedFields {
    let mut partitioned = PartitionedFields::default();

    for field in fields {
        if field.field_type.is_button_like() {
            if field.is_next_button {
                partitioned.next_buttons.push(field);
            } else if field.is_final_submit {
                partitioned.final_submit_buttons.push(field);
            }
            // Plain buttons: not actionable, dropped.
        } else {
            partitioned.input_fields.push(field);
        }
    }

    partitioned
}

// ============================================================================
// FormTraversalController
// ============================================================================

/// Outcome of attempting one field.
enum FillOutcome {
    Filled,
    Skipped(&'static str),
}

/// Drives the page-by-page loop: scan fields, match them against the data
/// dictionary, issue fill instructions, pick a navigation button, and detect
/// page transitions, bounded by `max_steps`.
pub struct FormTraversalController<'a> {
    config: TraversalConfig,
    matcher: MatcherConfig,
    tracer: &'a TraceLogger,
}

impl<'a> FormTraversalController<'a> {
    pub fn new(config: TraversalConfig, tracer: &'a TraceLogger) -> Self {
        Self {
            config,
            matcher: MatcherConfig::default(),
            tracer,
        }
    }

    pub fn with_matcher(mut self, matcher: MatcherConfig) -> Self {
        self.matcher = matcher;
        self
    }

    /// Run the traversal to completion. The caller has already navigated to
    /// the start page; a failure to reach it at all is the caller's to
    /// surface, before step 1.
    pub fn run(&self, browser: &mut dyn TraversalBrowser, data: &DataDictionary) -> RunReport {
        let mut state = TraversalState::new();

        loop {
            if state.step_count >= self.config.max_steps {
                state.errors.push(format!(
                    "Reached maximum of {} steps; stopping traversal",
                    self.config.max_steps
                ));
                break;
            }
            state.step_count += 1;

            // ---- Scanning ----
            let snapshot = match browser.scan() {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    state
                        .errors
                        .push(format!("Scan failed on step {}: {}", state.step_count, e));
                    break;
                }
            };

            let change = state
                .previous_signals
                .as_ref()
                .and_then(|prev| snapshot.signals.changed_from(prev));

            let scan = find_fields(&snapshot.elements);
            self.tracer.log(
                &TraceEvent::now(state.step_count, TraversalPhase::Scanning)
                    .with_page(&snapshot.signals)
                    .with_page_change(change)
                    .with_fields_found(scan.fields.len(), scan.skipped.len()),
            );
            state.previous_signals = Some(snapshot.signals);

            if scan.fields.is_empty() {
                if state.step_count == 1 {
                    // Nothing to do on the very first page: hard failure.
                    state.errors.push(FillerError::NoFieldsFound.to_string());
                }
                // On later steps an empty page means the form is complete.
                break;
            }

            let partitioned = partition_fields(scan.fields);

            // ---- Matching + Filling ----
            for field in &partitioned.input_fields {
                self.process_field(field, data, browser, &mut state);
            }

            // ---- AwaitingButton ----
            if let Some(next) = partitioned.next_buttons.first() {
                self.tracer.log(
                    &TraceEvent::now(state.step_count, TraversalPhase::AwaitingButton)
                        .with_field(next.display_name())
                        .with_action("click_next"),
                );
                if let Err(e) = browser.click(next) {
                    state
                        .errors
                        .push(format!("Next-button click failed: {}", e));
                    break;
                }

                // ---- Continuing ----
                if let Err(e) = browser.settle(self.config.settle_ms) {
                    // Best effort: rescan anyway, partially rendered pages
                    // often still expose usable fields.
                    state.errors.push(format!("{}", e));
                    self.tracer.log(
                        &TraceEvent::now(state.step_count, TraversalPhase::Continuing)
                            .with_note(format!("settle failed: {}", e)),
                    );
                }
                continue;
            }

            if let Some(submit) = partitioned.final_submit_buttons.first() {
                // ---- Submitting ----
                self.tracer.log(
                    &TraceEvent::now(state.step_count, TraversalPhase::Submitting)
                        .with_field(submit.display_name())
                        .with_action("click_submit"),
                );
                match browser.click(submit) {
                    Ok(()) => state.submitted = true,
                    Err(e) => {
                        state.failed_fields.push(submit.element_id.clone());
                        state
                            .errors
                            .push(format!("Final-submit click failed: {}", e));
                    }
                }
                break;
            }

            // No navigation buttons at all: form assumed complete.
            break;
        }

        // ---- Terminating ----
        let report = state.into_report();
        self.tracer.log(
            &TraceEvent::now(report.steps_processed, TraversalPhase::Terminating).with_note(
                format!(
                    "filled={} failed={} skipped={} submitted={}",
                    report.filled_fields.len(),
                    report.failed_fields.len(),
                    report.skipped_fields.len(),
                    report.submitted,
                ),
            ),
        );
        report
    }

    /// Match one input field and, if the match clears the confidence floor,
    /// issue the fill. A failure here is recorded and never stops the
    /// remaining fields or steps.
    fn process_field(
        &self,
        field: &FieldRecord,
        data: &DataDictionary,
        browser: &mut dyn TraversalBrowser,
        state: &mut TraversalState,
    ) {
        let result = best_match_with(match_text(field), data, &self.matcher);

        self.tracer.log(
            &TraceEvent::now(state.step_count, TraversalPhase::Matching)
                .with_field(field.display_name())
                .with_match(result.matched_key.as_deref(), result.score),
        );

        if !result.is_reliable(self.config.min_score) {
            state.skipped_fields.push(field.element_id.clone());
            return;
        }

        let value = result.matched_value.as_deref().unwrap_or("");
        let mut event = TraceEvent::now(state.step_count, TraversalPhase::Filling)
            .with_field(field.display_name());

        match self.fill_field(field, value, browser) {
            Ok(FillOutcome::Filled) => {
                state.filled_fields.push(field.element_id.clone());
                event = event.with_action("filled");
            }
            Ok(FillOutcome::Skipped(reason)) => {
                state.skipped_fields.push(field.element_id.clone());
                event = event.with_action("skipped").with_note(reason);
            }
            Err(e) => {
                state.failed_fields.push(field.element_id.clone());
                state.errors.push(format!("{}", e));
                event = event.with_action("failed").with_note(format!("{}", e));
            }
        }

        self.tracer.log(&event);
    }

    /// Dispatch the fill instruction appropriate to the field type.
    fn fill_field(
        &self,
        field: &FieldRecord,
        value: &str,
        driver: &mut dyn TraversalBrowser,
    ) -> Result<FillOutcome, FillerError> {
        match field.field_type {
            FieldType::Select => {
                let index = choose_option(&field.options, value).ok_or_else(|| {
                    FillerError::FieldFill {
                        field: field.element_id.clone(),
                        reason: format!("no option matching '{}'", value),
                    }
                })?;
                driver.select_option(field, index)?;
                Ok(FillOutcome::Filled)
            }
            FieldType::Checkbox => {
                if is_truthy(value) {
                    driver.click(field)?;
                    Ok(FillOutcome::Filled)
                } else {
                    // Clicking would toggle an already-unchecked box.
                    Ok(FillOutcome::Skipped("checkbox value not truthy"))
                }
            }
            FieldType::Radio => {
                driver.click(field)?;
                Ok(FillOutcome::Filled)
            }
            FieldType::File => {
                // Upload synthesis is out of scope; clicking would wedge on
                // a native dialog.
                Ok(FillOutcome::Skipped("file upload not supported"))
            }
            _ => {
                driver.fill_text(field, value)?;
                Ok(FillOutcome::Filled)
            }
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Text the matcher sees for a field: label, else placeholder, else name.
/// Unlabeled fields still deserve a shot at matching.
fn match_text(field: &FieldRecord) -> &str {
    if !field.label.is_empty() {
        &field.label
    } else if !field.placeholder.is_empty() {
        &field.placeholder
    } else {
        &field.name
    }
}

/// Pick the select option for a value: exact text or value match first
/// (case-insensitive), then substring, skipping disabled options.
pub fn choose_option(options: &[SelectOption], value: &str) -> Option<usize> {
    let wanted = value.to_lowercase();

    let exact = options.iter().position(|o| {
        !o.disabled
            && (o.text.to_lowercase() == wanted || o.value.to_lowercase() == wanted)
    });
    if exact.is_some() {
        return exact;
    }

    options.iter().position(|o| {
        !o.disabled
            && (o.text.to_lowercase().contains(&wanted)
                || o.value.to_lowercase().contains(&wanted))
    })
}

/// Checkbox data values that mean "check it".
fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "yes" | "1" | "on" | "checked"
    )
}
