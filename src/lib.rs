//! # Smart Waste Tracker page behaviors
//!
//! Client-side behaviors for the server-rendered Smart Waste Tracker pages,
//! written against a small document abstraction so they run the same in the
//! browser (see the `wastetrack-ui` crate) and in native tests.
//!
//! ## Modules
//!
//! - [`dom`]: the `Document`/`Element` traits the behaviors are written against
//! - [`timer`]: cancellable delayed tasks and a virtual-clock scheduler
//! - [`headless`]: in-memory document for tests
//! - [`notify`]: toast notifications
//! - [`cards`], [`charts`], [`forms`], [`search`], [`ripple`]: one behavior each
//! - [`controller`]: wires everything up once the page is ready
//!
//! ## Quick Start
//!
//! ```rust
//! use wastetrack::charts::{ChartConfig, ChartHost};
//! use wastetrack::headless::{HeadlessDocument, HeadlessElement};
//! use wastetrack::{BehaviorResult, Config, ManualScheduler, PageBehavior, Severity};
//!
//! struct NoCharts;
//!
//! impl ChartHost<HeadlessElement> for NoCharts {
//!     fn render(&self, _mount: &HeadlessElement, _config: &ChartConfig) -> BehaviorResult<()> {
//!         Ok(())
//!     }
//! }
//!
//! let document = HeadlessDocument::new();
//! let scheduler = ManualScheduler::new();
//! let page = PageBehavior::init(document, scheduler.clone(), &NoCharts, &Config::default())?;
//!
//! page.notifications().show("Item saved", Severity::Success);
//! // The welcome toast appears after 1s; both are gone 5.3s after showing
//! scheduler.advance(6300);
//! assert_eq!(page.notifications().active(), 0);
//! # Ok::<(), wastetrack::BehaviorError>(())
//! ```

pub mod cards;
pub mod charts;
pub mod config;
pub mod controller;
pub mod dom;
pub mod error;
pub mod forms;
pub mod headless;
pub mod notify;
pub mod ripple;
pub mod search;
pub mod timer;

// Re-export top-level types for convenience
pub use charts::{ChartConfig, ChartHost, ChartKind};
pub use config::{generate_default_config, Config, ConfigError, LoggingConfig, TimingConfig};
pub use controller::{InitReport, PageBehavior};
pub use dom::{Document, Element, PointerPosition, Rect, SubmitOutcome, Subscription};
pub use error::{BehaviorError, BehaviorResult};
pub use notify::{NotificationCenter, NotificationId, NotificationRequest, Phase, Severity};
pub use timer::{ManualScheduler, Scheduler, TaskHandle};
