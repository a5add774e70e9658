//! Page Behavior Controller
//!
//! Wires every behavior onto the page once its markup is ready.

use std::fmt;

use crate::cards::animate_cards;
use crate::charts::{install_charts, ChartHost};
use crate::config::Config;
use crate::dom::Document;
use crate::error::BehaviorResult;
use crate::forms::guard_forms;
use crate::notify::{NotificationCenter, Severity};
use crate::ripple::install_ripples;
use crate::search::install_search;
use crate::timer::Scheduler;

/// What initialization found and wired
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InitReport {
    pub cards: usize,
    pub charts: usize,
    pub forms: usize,
    pub search: bool,
    pub buttons: usize,
}

impl fmt::Display for InitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} cards, {} charts, {} forms, search {}, {} buttons",
            self.cards,
            self.charts,
            self.forms,
            if self.search { "on" } else { "off" },
            self.buttons
        )
    }
}

/// The initialized page: owns the notification center
pub struct PageBehavior<D: Document, S: Scheduler> {
    notifications: NotificationCenter<D, S>,
    report: InitReport,
}

impl<D: Document, S: Scheduler> PageBehavior<D, S> {
    /// Attach all behaviors. Fails only if the document has no body to
    /// hold the notification container.
    pub fn init<H: ChartHost<D::Element>>(
        document: D,
        scheduler: S,
        charts: &H,
        config: &Config,
    ) -> BehaviorResult<Self> {
        let notifications = NotificationCenter::install(document.clone(), scheduler.clone(), config.timing.clone())?;
        notifications.listen_for_requests();

        let selectors = &config.selectors;
        let report = InitReport {
            cards: animate_cards(&document, &scheduler, &selectors.card, &config.timing),
            charts: install_charts(&document, charts, &selectors.waste_chart, &selectors.trend_chart),
            forms: guard_forms(&document, &scheduler, &notifications, config),
            search: install_search(&document, &selectors.search_input, &selectors.table_rows),
            buttons: install_ripples(&document, &scheduler, &selectors.button, &config.timing),
        };

        if config.messages.welcome_enabled {
            let welcome = notifications.clone();
            let message = config.messages.welcome.clone();
            scheduler.schedule(config.timing.welcome_delay_ms, move || {
                welcome.show(&message, Severity::Success);
            });
        }

        tracing::info!("Page behaviors ready: {}", report);

        Ok(Self {
            notifications,
            report,
        })
    }

    pub fn notifications(&self) -> &NotificationCenter<D, S> {
        &self.notifications
    }

    pub fn report(&self) -> InitReport {
        self.report
    }
}
