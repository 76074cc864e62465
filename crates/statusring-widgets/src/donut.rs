//! `DonutWidget`: one donut + legend instance driven by host entry points.
//!
//! The host calls [`DonutWidget::build_query`] before fetching, then
//! [`DonutWidget::render`] with the rows it fetched. [`DonutWidget::resize`]
//! re-lays out the cached data, and [`DonutWidget::click`] toggles the
//! selected category. Every frame goes to the [`Presenter`]; selection
//! changes also go to the [`HostSink`].

use crate::geometry::Size;
use crate::host::HostSink;
use crate::presenter::Presenter;
use crate::variant::WidgetConfig;
use crate::view::ViewState;
use statusring_core::{
    aggregate, categorize, format_title, selection_to_event, selection_to_filters, Categorized,
    Command, HostMessage, Query, QueryPlan, Row, Selection, SelectionMessage, SlotAssignments,
    SlotRole, State, ThemeConfig, ThemeContext,
};

/// State held between entry points. Exists after the first render.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetState {
    /// Plan the cached data was read with
    pub plan: QueryPlan,
    /// Categorized rows from the last render
    pub categorized: Categorized,
    /// Language the rows were resolved in
    pub language: String,
    /// Current selection
    pub selection: Selection,
    /// Last computed frame
    pub view: ViewState,
}

/// A donut + legend widget instance.
#[derive(Debug)]
pub struct DonutWidget<P, S> {
    config: WidgetConfig,
    presenter: P,
    sink: S,
    state: Option<WidgetState>,
}

impl<P: Presenter, S: HostSink> DonutWidget<P, S> {
    /// Create a widget that has not rendered yet.
    pub const fn new(config: WidgetConfig, presenter: P, sink: S) -> Self {
        Self {
            config,
            presenter,
            sink,
            state: None,
        }
    }

    /// Widget configuration.
    pub const fn config(&self) -> &WidgetConfig {
        &self.config
    }

    /// Drawing collaborator.
    pub const fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Host message sink.
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable host message sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// State from the last render, if any.
    pub const fn state(&self) -> Option<&WidgetState> {
        self.state.as_ref()
    }

    /// Last computed frame.
    pub fn view(&self) -> Option<&ViewState> {
        self.state.as_ref().map(|s| &s.view)
    }

    /// Current selection.
    pub fn selection(&self) -> Selection {
        self.state
            .as_ref()
            .map(|s| s.selection.clone())
            .unwrap_or_default()
    }

    /// Plan for a slot configuration.
    pub fn plan(&self, slots: &SlotAssignments) -> QueryPlan {
        QueryPlan::build(
            self.config.categorize_by,
            &self.config.effective_slots(slots),
        )
    }

    /// What the host should fetch. Pure.
    pub fn build_query(&self, slots: &SlotAssignments) -> Query {
        self.plan(slots).query
    }

    /// Full recomputation from fresh rows. Clears any selection.
    pub fn render(
        &mut self,
        rows: &[Row],
        slots: &SlotAssignments,
        theme: &ThemeConfig,
        language: &str,
        size: Size,
    ) {
        let plan = self.plan(slots);
        let categorized = categorize(rows, &plan, language, self.config.fallback);
        let selection = Selection::Unselected;

        let view = self.compute_view(&categorized, &selection, slots, theme, size);
        tracing::debug!(
            policy = ?plan.policy,
            rows = rows.len(),
            categories = view.aggregate.categories.len(),
            sample = view.aggregate.sample,
            "rendered"
        );
        self.presenter.present(&view);
        self.state = Some(WidgetState {
            plan,
            categorized,
            language: language.to_string(),
            selection,
            view,
        });
    }

    /// Re-lay out cached data for a new size or theme. Keeps the selection.
    /// Does nothing before the first render.
    pub fn resize(&mut self, slots: &SlotAssignments, theme: &ThemeConfig, size: Size) {
        let Some(state) = self.state.take() else {
            tracing::debug!("resize before render ignored");
            return;
        };
        let view = self.compute_view(&state.categorized, &state.selection, slots, theme, size);
        self.presenter.present(&view);
        self.state = Some(WidgetState { view, ..state });
    }

    /// Toggle the category `key`. Redraws, then notifies the host and
    /// replaces the widget's filters. Does nothing before the first render.
    pub fn click(&mut self, key: &str) {
        let Some(mut state) = self.state.take() else {
            tracing::debug!(key, "click before render ignored");
            return;
        };
        if state.selection.update(SelectionMessage::Click(key.to_string())) == Command::Recompute {
            // Tinting follows the full category list, so the theme is unchanged.
            let theme = state.view.theme.clone();
            let aggregate = aggregate(
                &state.categorized,
                &theme.color_palette,
                state.selection.key(),
            );
            let view = ViewState::new(state.view.title.clone(), aggregate, theme, state.view.size);
            self.presenter.present(&view);

            let event = selection_to_event(&view.aggregate);
            // Sample categories have no backing column to filter on.
            let column = if state.categorized.sample {
                None
            } else {
                state.plan.filter_column.as_ref()
            };
            let filters = selection_to_filters(&state.selection, state.plan.policy, column);
            tracing::debug!(
                event = %event.event_type,
                category = %event.category,
                filters = filters.len(),
                "posting selection"
            );
            self.sink.post(HostMessage::CustomEvent { data: event });
            self.sink.post(HostMessage::SetFilter { filters });
            state.view = view;
        }
        self.state = Some(state);
    }

    fn compute_view(
        &self,
        categorized: &Categorized,
        selection: &Selection,
        slots: &SlotAssignments,
        theme: &ThemeConfig,
        size: Size,
    ) -> ViewState {
        let mut context = ThemeContext::derive(theme, self.config.palette.as_ref());
        let aggregate = aggregate(categorized, &context.color_palette, selection.key());
        if self.config.tint_background {
            if let Some(dominant) = aggregate.dominant() {
                context = context.tinted(dominant.color);
            }
        }
        ViewState::new(self.title(slots), aggregate, context, size)
    }

    fn title(&self, slots: &SlotAssignments) -> String {
        let slots = self.config.effective_slots(slots);
        slots
            .get(SlotRole::Legend)
            .map(|legend| format_title(legend.name.as_deref().unwrap_or(&legend.column.column_id)))
            .filter(|title| !title.is_empty())
            .or_else(|| self.config.title.clone())
            .unwrap_or_else(|| self.config.variant.default_title().to_string())
    }
}
