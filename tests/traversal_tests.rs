use std::collections::HashSet;

use form_autofill::error::FillerError;
use form_autofill::field::field_model::{BoundingBox, RawElement, SelectOption};
use form_autofill::matcher::data::DataDictionary;
use form_autofill::trace::logger::TraceLogger;
use form_autofill::traversal::controller::{
    FormTraversalController, InputDriver, PageSnapshot, PageSource, choose_option,
    partition_fields,
};
use form_autofill::traversal::traversal_model::{
    PageChange, PageSignals, TraversalConfig,
};

// ============================================================================
// Raw element builders
// ============================================================================

fn bbox() -> Option<BoundingBox> {
    Some(BoundingBox {
        x: 10.0,
        y: 10.0,
        width: 200.0,
        height: 30.0,
    })
}

fn text_input(id: &str, label: &str) -> RawElement {
    RawElement {
        tag: "input".into(),
        r#type: Some("text".into()),
        id: Some(id.into()),
        label_for: Some(label.into()),
        visible: true,
        bounding_box: bbox(),
        ..Default::default()
    }
}

fn checkbox(id: &str, label: &str) -> RawElement {
    RawElement {
        tag: "input".into(),
        r#type: Some("checkbox".into()),
        id: Some(id.into()),
        label_for: Some(label.into()),
        visible: true,
        bounding_box: bbox(),
        ..Default::default()
    }
}

fn select(id: &str, label: &str, options: Vec<SelectOption>) -> RawElement {
    RawElement {
        tag: "select".into(),
        id: Some(id.into()),
        label_for: Some(label.into()),
        visible: true,
        bounding_box: bbox(),
        options,
        ..Default::default()
    }
}

fn button(id: &str, text: &str) -> RawElement {
    RawElement {
        tag: "button".into(),
        id: Some(id.into()),
        text: Some(text.into()),
        visible: true,
        bounding_box: bbox(),
        ..Default::default()
    }
}

fn page(url: &str, title: &str, elements: Vec<RawElement>) -> PageSnapshot {
    PageSnapshot {
        signals: PageSignals::new(url, title),
        elements,
    }
}

fn data(pairs: &[(&str, &str)]) -> DataDictionary {
    pairs.iter().copied().collect()
}

// ============================================================================
// Scripted browser mock
// ============================================================================

/// Serves a fixed sequence of page snapshots (the last one repeats) and
/// records every input action it is asked to perform.
struct MockBrowser {
    pages: Vec<PageSnapshot>,
    scans: usize,
    actions: Vec<String>,
    fail_fill: HashSet<String>,
    settle_times_out: bool,
}

impl MockBrowser {
    fn new(pages: Vec<PageSnapshot>) -> Self {
        Self {
            pages,
            scans: 0,
            actions: Vec::new(),
            fail_fill: HashSet::new(),
            settle_times_out: false,
        }
    }

    fn failing_on(mut self, element_id: &str) -> Self {
        self.fail_fill.insert(element_id.to_string());
        self
    }
}

impl PageSource for MockBrowser {
    fn scan(&mut self) -> Result<PageSnapshot, FillerError> {
        let index = self.scans.min(self.pages.len() - 1);
        self.scans += 1;
        Ok(self.pages[index].clone())
    }

    fn settle(&mut self, timeout_ms: u64) -> Result<(), FillerError> {
        if self.settle_times_out {
            Err(FillerError::NavigationTimeout {
                waited_ms: timeout_ms,
            })
        } else {
            Ok(())
        }
    }
}

impl InputDriver for MockBrowser {
    fn fill_text(&mut self, field: &form_autofill::field::field_model::FieldRecord, value: &str) -> Result<(), FillerError> {
        if self.fail_fill.contains(&field.element_id) {
            return Err(FillerError::FieldFill {
                field: field.element_id.clone(),
                reason: "element detached".into(),
            });
        }
        self.actions.push(format!("fill:{}={}", field.element_id, value));
        Ok(())
    }

    fn select_option(&mut self, field: &form_autofill::field::field_model::FieldRecord, option_index: usize) -> Result<(), FillerError> {
        self.actions
            .push(format!("select:{}#{}", field.element_id, option_index));
        Ok(())
    }

    fn click(&mut self, field: &form_autofill::field::field_model::FieldRecord) -> Result<(), FillerError> {
        self.actions.push(format!("click:{}", field.element_id));
        Ok(())
    }
}

fn run(
    browser: &mut MockBrowser,
    dict: &DataDictionary,
    config: TraversalConfig,
) -> form_autofill::traversal::traversal_model::RunReport {
    let tracer = TraceLogger::disabled();
    let controller = FormTraversalController::new(config, &tracer);
    controller.run(browser, dict)
}

// ============================================================================
// Single-page runs
// ============================================================================

#[test]
fn fills_matched_fields_and_submits() {
    let mut browser = MockBrowser::new(vec![page(
        "https://jobs.example.com/apply",
        "Apply",
        vec![
            text_input("fn", "First Name"),
            text_input("em", "Email"),
            button("go", "Submit application"),
        ],
    )]);
    let dict = data(&[("first name", "John"), ("email", "j@d.com")]);

    let report = run(&mut browser, &dict, TraversalConfig::default());

    assert!(report.success, "all fields filled, none failed");
    assert!(report.submitted, "final submit was clicked");
    assert_eq!(report.steps_processed, 1);
    assert_eq!(report.filled_fields, vec!["fn", "em"]);
    assert!(report.failed_fields.is_empty());
    assert_eq!(
        browser.actions,
        vec!["fill:fn=John", "fill:em=j@d.com", "click:go"],
        "fields in extraction order, then the submit click"
    );
}

#[test]
fn no_fields_on_first_scan_is_a_failure() {
    let mut browser = MockBrowser::new(vec![page("https://x.test", "Empty", vec![])]);
    let dict = data(&[("email", "a@b.com")]);

    let report = run(&mut browser, &dict, TraversalConfig::default());

    assert!(!report.success);
    assert_eq!(report.steps_processed, 1);
    assert!(report.filled_fields.is_empty());
    assert!(report.failed_fields.is_empty());
    assert!(
        report
            .errors
            .iter()
            .any(|e| e.to_lowercase().contains("no form fields found")),
        "explicit no-fields error expected, got {:?}",
        report.errors
    );
}

#[test]
fn one_field_failure_never_blocks_the_rest() {
    let mut browser = MockBrowser::new(vec![page(
        "https://x.test",
        "Apply",
        vec![
            text_input("a", "First Name"),
            text_input("b", "Last Name"),
            text_input("c", "Email"),
            button("go", "Submit"),
        ],
    )])
    .failing_on("b");
    let dict = data(&[
        ("first name", "John"),
        ("last name", "Doe"),
        ("email", "j@d.com"),
    ]);

    let report = run(&mut browser, &dict, TraversalConfig::default());

    assert_eq!(report.filled_fields, vec!["a", "c"], "a and c still filled");
    assert_eq!(report.failed_fields, vec!["b"]);
    assert!(!report.success, "a failed field fails the run");
    assert!(report.submitted, "submission still attempted");
    assert!(
        report.errors.iter().any(|e| e.contains("b")),
        "failure recorded in errors"
    );
}

#[test]
fn unmatched_fields_are_skipped_not_failed() {
    let mut browser = MockBrowser::new(vec![page(
        "https://x.test",
        "Apply",
        vec![text_input("mystery", "Quantum flux capacitance")],
    )]);
    let dict = data(&[("email", "a@b.com")]);

    let report = run(&mut browser, &dict, TraversalConfig::default());

    assert!(report.filled_fields.is_empty());
    assert!(report.failed_fields.is_empty(), "no data is not a failure");
    assert_eq!(report.skipped_fields, vec!["mystery"]);
    assert!(browser.actions.is_empty(), "no fill was issued");
}

#[test]
fn plain_buttons_are_never_clicked() {
    let mut browser = MockBrowser::new(vec![page(
        "https://x.test",
        "Apply",
        vec![
            text_input("em", "Email"),
            button("cancel", "Cancel"),
            button("help", "Help"),
        ],
    )]);
    let dict = data(&[("email", "a@b.com")]);

    let report = run(&mut browser, &dict, TraversalConfig::default());

    assert_eq!(report.steps_processed, 1, "no navigation button, one step");
    assert!(!report.submitted);
    assert!(
        browser.actions.iter().all(|a| !a.starts_with("click:")),
        "neither plain button received a click: {:?}",
        browser.actions
    );
}

// ============================================================================
// Field-type-specific fills
// ============================================================================

#[test]
fn select_fields_pick_the_matching_option() {
    let mut browser = MockBrowser::new(vec![page(
        "https://x.test",
        "Apply",
        vec![select(
            "country",
            "Country",
            vec![
                SelectOption { text: "United States".into(), value: "us".into(), disabled: false },
                SelectOption { text: "Canada".into(), value: "ca".into(), disabled: false },
            ],
        )],
    )]);
    let dict = data(&[("country", "Canada")]);

    let report = run(&mut browser, &dict, TraversalConfig::default());

    assert_eq!(report.filled_fields, vec!["country"]);
    assert_eq!(browser.actions, vec!["select:country#1"]);
}

#[test]
fn select_without_matching_option_fails_that_field() {
    let mut browser = MockBrowser::new(vec![page(
        "https://x.test",
        "Apply",
        vec![select(
            "country",
            "Country",
            vec![SelectOption { text: "Canada".into(), value: "ca".into(), disabled: false }],
        )],
    )]);
    let dict = data(&[("country", "Atlantis")]);

    let report = run(&mut browser, &dict, TraversalConfig::default());

    assert_eq!(report.failed_fields, vec!["country"]);
    assert!(browser.actions.is_empty(), "no select action was issued");
}

#[test]
fn checkboxes_click_on_truthy_values_only() {
    let elements = vec![
        checkbox("remote", "Remote work"),
        checkbox("relocate", "Willing to relocate"),
    ];
    let mut browser = MockBrowser::new(vec![page("https://x.test", "Apply", elements)]);
    let dict = data(&[("remote work", "yes"), ("willing to relocate", "no")]);

    let report = run(&mut browser, &dict, TraversalConfig::default());

    assert_eq!(report.filled_fields, vec!["remote"]);
    assert_eq!(
        report.skipped_fields,
        vec!["relocate"],
        "falsy value leaves the box untouched"
    );
    assert_eq!(browser.actions, vec!["click:remote"]);
}

// ============================================================================
// Multi-step traversal
// ============================================================================

#[test]
fn next_button_advances_to_the_following_page() {
    let mut browser = MockBrowser::new(vec![
        page(
            "https://x.test/step1",
            "Step 1",
            vec![text_input("fn", "First Name"), button("nx", "Next")],
        ),
        page(
            "https://x.test/step2",
            "Step 2",
            vec![text_input("em", "Email"), button("go", "Submit")],
        ),
    ]);
    let dict = data(&[("first name", "John"), ("email", "j@d.com")]);

    let report = run(&mut browser, &dict, TraversalConfig::default());

    assert!(report.success);
    assert!(report.submitted);
    assert_eq!(report.steps_processed, 2);
    assert_eq!(report.filled_fields, vec!["fn", "em"]);
    assert_eq!(
        browser.actions,
        vec!["fill:fn=John", "click:nx", "fill:em=j@d.com", "click:go"]
    );
}

#[test]
fn empty_page_after_step_one_means_form_complete() {
    let mut browser = MockBrowser::new(vec![
        page(
            "https://x.test/step1",
            "Step 1",
            vec![text_input("fn", "First Name"), button("nx", "Continue")],
        ),
        page("https://x.test/done", "Thanks", vec![]),
    ]);
    let dict = data(&[("first name", "John")]);

    let report = run(&mut browser, &dict, TraversalConfig::default());

    assert!(report.success, "filled one field, failed none");
    assert!(!report.submitted, "no final submit was ever seen");
    assert_eq!(report.steps_processed, 2);
    assert!(
        !report
            .errors
            .iter()
            .any(|e| e.to_lowercase().contains("no form fields")),
        "an empty later page is completion, not an error"
    );
}

#[test]
fn settle_timeout_is_a_warning_not_a_stop() {
    let mut browser = MockBrowser::new(vec![
        page(
            "https://x.test/step1",
            "Step 1",
            vec![text_input("fn", "First Name"), button("nx", "Next")],
        ),
        page(
            "https://x.test/step2",
            "Step 2",
            vec![text_input("em", "Email"), button("go", "Submit")],
        ),
    ]);
    browser.settle_times_out = true;
    let dict = data(&[("first name", "John"), ("email", "j@d.com")]);

    let report = run(&mut browser, &dict, TraversalConfig::default());

    assert_eq!(report.steps_processed, 2, "rescan happened regardless");
    assert!(report.submitted);
    assert!(
        report.errors.iter().any(|e| e.contains("settle") || e.contains("ms")),
        "timeout logged as a warning: {:?}",
        report.errors
    );
}

#[test]
fn step_limit_caps_cyclic_next_buttons() {
    // A page whose next button leads right back to itself.
    let mut browser = MockBrowser::new(vec![page(
        "https://x.test/loop",
        "Loop",
        vec![button("nx", "Next")],
    )]);
    let dict = data(&[("email", "a@b.com")]);

    let config = TraversalConfig {
        max_steps: 200,
        ..TraversalConfig::default()
    };
    let report = run(&mut browser, &dict, config);

    assert_eq!(report.steps_processed, 200, "hard stop at max_steps");
    assert!(
        report
            .errors
            .iter()
            .any(|e| e.to_lowercase().contains("maximum")),
        "cap-reached notice expected, got {:?}",
        report.errors
    );
    assert_eq!(
        browser.actions.len(),
        200,
        "one next click per step, then the cap"
    );
}

// ============================================================================
// Partitioning
// ============================================================================

#[test]
fn partition_splits_inputs_and_button_roles() {
    let scan = form_autofill::field::extractor::find_fields(&[
        text_input("a", "First Name"),
        text_input("b", "Last Name"),
        text_input("c", "Email"),
        button("nx", "Next"),
    ]);
    let partitioned = partition_fields(scan.fields);

    assert_eq!(partitioned.input_fields.len(), 3);
    assert_eq!(partitioned.next_buttons.len(), 1);
    assert_eq!(partitioned.final_submit_buttons.len(), 0);
}

#[test]
fn partition_drops_plain_buttons_entirely() {
    let scan = form_autofill::field::extractor::find_fields(&[
        button("cancel", "Cancel"),
        button("nx", "Next"),
        button("go", "Submit"),
    ]);
    let partitioned = partition_fields(scan.fields);

    assert_eq!(partitioned.input_fields.len(), 0);
    assert_eq!(partitioned.next_buttons.len(), 1);
    assert_eq!(partitioned.final_submit_buttons.len(), 1);
}

// ============================================================================
// Page-change signals
// ============================================================================

#[test]
fn page_change_checks_url_then_hash_then_title() {
    let before = PageSignals::new("https://x.test/a#top", "Step 1");

    assert_eq!(
        PageSignals::new("https://x.test/b#top", "Step 1").changed_from(&before),
        Some(PageChange::Url),
        "URL difference is the highest-priority signal"
    );
    assert_eq!(
        PageSignals::new("https://x.test/a#bottom", "Step 1").changed_from(&before),
        Some(PageChange::Hash),
        "same URL, different fragment"
    );
    assert_eq!(
        PageSignals::new("https://x.test/a#top", "Step 2").changed_from(&before),
        Some(PageChange::Title),
        "same URL and fragment, different title"
    );
    assert_eq!(
        PageSignals::new("https://x.test/a#top", "Step 1").changed_from(&before),
        None,
        "identical signals mean no observable change"
    );
}

// ============================================================================
// Option selection helper
// ============================================================================

#[test]
fn choose_option_prefers_exact_then_substring_and_skips_disabled() {
    let options = vec![
        SelectOption { text: "Select a country".into(), value: "".into(), disabled: true },
        SelectOption { text: "United States".into(), value: "us".into(), disabled: false },
        SelectOption { text: "United Kingdom".into(), value: "uk".into(), disabled: false },
    ];

    assert_eq!(choose_option(&options, "us"), Some(1), "exact value match");
    assert_eq!(
        choose_option(&options, "united kingdom"),
        Some(2),
        "exact text match, case-insensitive"
    );
    assert_eq!(
        choose_option(&options, "kingdom"),
        Some(2),
        "substring fallback"
    );
    assert_eq!(choose_option(&options, "mars"), None, "no match at all");
    assert_eq!(
        choose_option(&options, "select a country"),
        None,
        "disabled options are never chosen"
    );
}
