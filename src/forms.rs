//! Required-field form guard
//!
//! Blocks submission while any mandatory input is blank, flags the blank
//! inputs for a moment and raises a warning toast.

use crate::config::{Config, TimingConfig};
use crate::dom::{Document, Element, SubmitOutcome, Subscription};
use crate::notify::{NotificationCenter, Severity};
use crate::timer::Scheduler;

/// Border color of a flagged field
pub const INVALID_BORDER: &str = "#ff6b6b";

/// A value counts as missing when it is empty after trimming
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Mandatory fields of `form` that are currently blank
pub fn blank_fields<E: Element>(form: &E, required_selector: &str) -> Vec<E> {
    form.query_all(required_selector)
        .into_iter()
        .filter(|field| is_blank(&field.value()))
        .collect()
}

fn flag_field<E: Element, S: Scheduler>(field: &E, scheduler: &S, timing: &TimingConfig) {
    field.set_style("border-color", INVALID_BORDER);

    let field = field.clone();
    scheduler.schedule(timing.field_flag_ms, move || {
        field.set_style("border-color", "");
    });
}

/// Guard every form on the page. Returns the number of forms guarded.
pub fn guard_forms<D: Document, S: Scheduler>(
    document: &D,
    scheduler: &S,
    notifications: &NotificationCenter<D, S>,
    config: &Config,
) -> usize {
    let forms = document.query_all(&config.selectors.form);

    for form in &forms {
        let guarded = form.clone();
        let scheduler = scheduler.clone();
        let notifications = notifications.clone();
        let required = config.selectors.required_field.clone();
        let timing = config.timing.clone();
        let message = config.messages.missing_fields.clone();

        document.on_submit(form, move || {
            let blank = blank_fields(&guarded, &required);
            if blank.is_empty() {
                return SubmitOutcome::Proceed;
            }

            for field in &blank {
                flag_field(field, &scheduler, &timing);
            }
            tracing::debug!("Blocked submit with {} blank required fields", blank.len());
            notifications.show(&message, Severity::Warning);
            SubmitOutcome::Prevent
        })
        .forget();
    }

    forms.len()
}
