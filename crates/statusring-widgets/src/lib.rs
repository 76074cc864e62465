//! Donut + legend widget instances for statusring.
//!
//! A [`DonutWidget`] owns its selection and last frame, draws through a
//! [`Presenter`] and talks to the host through a [`HostSink`].
//!
//! # Examples
//!
//! ```
//! use statusring_core::{SlotAssignments, ThemeConfig};
//! use statusring_widgets::{
//!     DonutWidget, RecordingPresenter, RecordingSink, Size, Variant, WidgetConfig,
//! };
//!
//! let mut widget = DonutWidget::new(
//!     WidgetConfig::new(Variant::HealthScore),
//!     RecordingPresenter::new(),
//!     RecordingSink::new(),
//! );
//! widget.render(&[], &SlotAssignments::new(), &ThemeConfig::default(), "en", Size::new(320.0, 240.0));
//! widget.click("Healthy");
//!
//! assert_eq!(widget.presenter().frames.len(), 2);
//! assert_eq!(widget.sink().messages.len(), 2);
//! ```

pub mod donut;
pub mod geometry;
pub mod host;
pub mod presenter;
pub mod variant;
pub mod view;

pub use donut::{DonutWidget, WidgetState};
pub use geometry::{layout_slices, Size, Slice};
pub use host::{HostSink, JsonLinesSink, RecordingSink};
pub use presenter::{Presenter, RecordingPresenter};
pub use variant::{Variant, WidgetConfig};
pub use view::{LegendEntry, ViewState, EMPTY_STATE_MESSAGE};
