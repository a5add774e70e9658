//! Card entrance animation
//!
//! Cards start transparent and 20px low, then fade and slide into place one
//! after another.

use crate::config::TimingConfig;
use crate::dom::{Document, Element};
use crate::timer::Scheduler;

/// Initial vertical offset of a card, in pixels
pub const CARD_OFFSET_PX: u32 = 20;

/// Delay before the card at `index` starts moving
pub fn entrance_delay(index: usize, stagger_ms: u32) -> u32 {
    u32::try_from(index)
        .unwrap_or(u32::MAX)
        .saturating_mul(stagger_ms)
}

/// Stagger the entrance of every element matching `selector`.
///
/// Returns the number of cards animated.
pub fn animate_cards<D: Document, S: Scheduler>(
    document: &D,
    scheduler: &S,
    selector: &str,
    timing: &TimingConfig,
) -> usize {
    let cards = document.query_all(selector);
    let transition = format!("all {}ms ease", timing.card_transition_ms);

    for (index, card) in cards.iter().enumerate() {
        card.set_style("opacity", "0");
        card.set_style("transform", &format!("translateY({}px)", CARD_OFFSET_PX));

        let card = card.clone();
        let transition = transition.clone();
        scheduler.schedule(entrance_delay(index, timing.card_stagger_ms), move || {
            card.set_style("transition", &transition);
            card.set_style("opacity", "1");
            card.set_style("transform", "translateY(0)");
        });
    }

    tracing::debug!("Animating {} cards", cards.len());
    cards.len()
}
