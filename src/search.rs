//! Table search filter
//!
//! Every keystroke in the search box re-filters the table rows by
//! case-insensitive substring match on the row text.

use crate::dom::{Document, Element, Subscription};

/// Rows left visible and hidden by one filter pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterSummary {
    pub visible: usize,
    pub hidden: usize,
}

/// Case-insensitive substring test; an empty query matches everything
pub fn row_matches(row_text: &str, query: &str) -> bool {
    row_text.to_lowercase().contains(&query.to_lowercase())
}

/// Show rows matching `query`, hide the rest
pub fn apply_filter<D: Document>(document: &D, rows_selector: &str, query: &str) -> FilterSummary {
    let query = query.to_lowercase();
    let mut summary = FilterSummary::default();

    for row in document.query_all(rows_selector) {
        if row.text_content().to_lowercase().contains(&query) {
            row.set_style("display", "");
            summary.visible += 1;
        } else {
            row.set_style("display", "none");
            summary.hidden += 1;
        }
    }

    summary
}

/// Attach the filter to the search box, if the page has one.
///
/// Returns whether the filter was installed.
pub fn install_search<D: Document>(document: &D, search_input_id: &str, rows_selector: &str) -> bool {
    let Some(input) = document.element_by_id(search_input_id) else {
        tracing::debug!("No #{} search box, table filter disabled", search_input_id);
        return false;
    };

    let filter_document = document.clone();
    let rows_selector = rows_selector.to_string();
    document.on_input(&input, move |query| {
        let summary = apply_filter(&filter_document, &rows_selector, &query);
        tracing::trace!(?summary, "Table filtered");
    })
    .forget();

    true
}
