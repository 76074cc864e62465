//! Core logic for statusring donut widgets.
//!
//! This crate turns host rows into categorized, colored and totaled view
//! state, and keeps that state consistent across selection changes:
//! - Cell extraction: [`Cell`], [`extract`], [`display_name`]
//! - Categorization policies: [`Policy`], [`categorize`]
//! - Aggregation: [`aggregate`], [`Aggregate`], [`Totals`]
//! - Color and order resolution: [`Resolver`], [`Palette`]
//! - Selection: [`Selection`], [`State`]
//! - Host wire types: [`FilterExpression`], [`HostMessage`], [`Query`]
//!
//! # Examples
//!
//! ```
//! use statusring_core::{
//!     aggregate, categorize, CategorizeBy, Cell, ColumnRef, Palette, QueryPlan, SlotAssignments,
//! };
//!
//! let slots = SlotAssignments::new().with("category", ColumnRef::new("ds", "score"));
//! let plan = QueryPlan::build(CategorizeBy::ScoreBands, &slots);
//! let rows: Vec<Vec<Cell>> = vec![vec![90.into()], vec![60.into()], vec![20.into()]];
//!
//! let categorized = categorize(&rows, &plan, "en", true);
//! let view = aggregate(&categorized, &Palette::default(), None);
//! assert_eq!(view.totals.overall_total, 3);
//! assert_eq!(view.totals.weighted_score, 57);
//! ```

pub mod aggregate;
pub mod cell;
mod color;
pub mod column;
pub mod filter;
pub mod policy;
pub mod query;
pub mod resolve;
mod state;
mod theme;

pub use aggregate::{aggregate, percent, weighted_score, Aggregate, Category, Totals};
pub use cell::{display_name, extract, try_number, Cell, CellRef, Extract, Row, UNKNOWN};
pub use color::{Color, ColorParseError, Palette, DEFAULT_PALETTE};
pub use column::{
    format_title, AggregationFunc, ColumnRef, Slot, SlotAssignments, SlotColumn, SlotRole,
};
pub use filter::{
    category_to_filter, selection_to_event, selection_to_filters, CustomEventPayload,
    FilterExpression, FilterValue, HostMessage, Operator,
};
pub use policy::{categorize, Band, Categorized, CategorizeBy, Policy, Tally};
pub use query::{build_query, DataShape, Query, QueryPlan, RowLayout};
pub use resolve::{named_color, Resolver, MISSING_ORDER_RANK};
pub use state::{Command, Selection, SelectionMessage, State};
pub use theme::{readable_text, ThemeConfig, ThemeContext, DEFAULT_FONT_FAMILY};
