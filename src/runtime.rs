// Runtime executor for analytics views

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use log::{debug, info};

use crate::catalog::{charts, Builder, ChartSlot, View};
use crate::data::{AnalyticsPayload, DatasetStatus, Source};
use crate::domain::brand_domain;
use crate::error::EngineError;
use crate::filter::{badge, summary, FilterSelection};
use crate::ir::{AxisTitles, ChartData, ChartPanel, ViewOutput};
use crate::join::{build_combination, build_scatter};
use crate::palette::ColorPalette;
use crate::transform::{build_series, build_trend, BuildContext};

/// Render `view` of a completed payload. Fails only on payload status.
pub fn render(
    payload: &AnalyticsPayload,
    selection: &FilterSelection,
    view: View,
) -> Result<ViewOutput, EngineError> {
    match payload.status() {
        DatasetStatus::Completed => Ok(render_view(payload, selection, view)),
        DatasetStatus::Failed => Err(EngineError::Failed),
        status => Err(EngineError::NotReady(status)),
    }
}

/// Render every chart slot of `view`. Deterministic: the same payload,
/// selection and view always give the same output.
pub fn render_view(payload: &AnalyticsPayload, selection: &FilterSelection, view: View) -> ViewOutput {
    let palette = ColorPalette::dashboard();
    let brands = brand_domain(payload);
    let ctx = BuildContext {
        selection,
        palette: &palette,
        brands: &brands,
    };

    let charts: Vec<ChartPanel> = charts(view)
        .into_iter()
        .map(|slot| {
            let data = build_slot(payload, &slot, &ctx);
            if data.is_none() {
                debug!("chart '{}' has no data", slot.id);
            }
            ChartPanel {
                id: slot.id.to_string(),
                title: slot.title.to_string(),
                badge: badge(selection, slot.badge),
                kind: slot.kind,
                unit: slot.unit(),
                axes: slot.axes.map(|(x, y)| AxisTitles {
                    x: x.to_string(),
                    y: y.to_string(),
                }),
                data,
            }
        })
        .collect();

    info!(
        "rendered view '{}' ({} of {} charts with data)",
        view,
        charts.iter().filter(|c| c.data.is_some()).count(),
        charts.len()
    );

    ViewOutput {
        view,
        filter_summary: summary(selection),
        charts,
    }
}

fn required<'a, T>(rows: Option<&'a [T]>, name: &str) -> Option<&'a [T]> {
    if rows.is_none() {
        debug!("source '{}' is missing", name);
    }
    rows
}

/// Run one slot's builder. `None` when a required source is missing.
fn build_slot(payload: &AnalyticsPayload, slot: &ChartSlot, ctx: &BuildContext) -> Option<ChartData> {
    let source = |s: Source| required(payload.source(s), s.field_name());

    match &slot.builder {
        Builder::Series { source: s, spec } => {
            let records = source(*s)?;
            build_series(records, spec, ctx).map(ChartData::Series)
        }
        Builder::Trend(spec) => {
            let points = required(payload.monthly(), "monthly_trend")?;
            build_trend(points, spec, ctx).map(ChartData::Series)
        }
        Builder::Scatter { row_filter } => {
            let sales = source(Source::SalesByBrandYear)?;
            let volume = source(Source::VolumeByBrandYear)?;
            Some(ChartData::Scatter(build_scatter(sales, volume, row_filter, ctx)))
        }
        Builder::Combination(spec) => {
            let sales = source(Source::SalesByBrandYear)?;
            let volume = payload.source(Source::VolumeByBrandYear);
            Some(ChartData::Series(build_combination(sales, volume, spec, ctx)))
        }
    }
}

/// Handle for one outstanding payload request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

/// Current payload plus memoized views.
///
/// Payloads are replaced wholesale. Only the newest fetch may deliver; an
/// older response arriving late is discarded. Replacing the payload bumps
/// the version and drops every cached view. Each view keeps the output of
/// its most recent selection only.
#[derive(Debug, Default)]
pub struct Dashboard {
    payload: Option<AnalyticsPayload>,
    version: u64,
    last_ticket: u64,
    cache: HashMap<View, (FilterSelection, ViewOutput)>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn payload(&self) -> Option<&AnalyticsPayload> {
        self.payload.as_ref()
    }

    pub fn cached_views(&self) -> usize {
        self.cache.len()
    }

    /// Issue a ticket for a new request; it supersedes all earlier ones.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.last_ticket += 1;
        FetchTicket(self.last_ticket)
    }

    /// Deliver the response for `ticket`. Returns `false` if a newer request
    /// was issued since, in which case the payload is dropped.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, payload: AnalyticsPayload) -> bool {
        if ticket.0 < self.last_ticket {
            debug!(
                "discarding stale payload (ticket {}, latest {})",
                ticket.0, self.last_ticket
            );
            return false;
        }
        self.replace(payload);
        true
    }

    pub fn replace(&mut self, payload: AnalyticsPayload) {
        self.version += 1;
        self.payload = Some(payload);
        self.cache.clear();
        info!("payload replaced, version {}", self.version);
    }

    /// Rendered `view` for `selection`. Re-rendered only when the payload or
    /// the view's selection changed since the last call.
    pub fn view(&mut self, view: View, selection: &FilterSelection) -> Result<&ViewOutput, EngineError> {
        let payload = self
            .payload
            .as_ref()
            .ok_or(EngineError::NotReady(DatasetStatus::Pending))?;

        match self.cache.entry(view) {
            Entry::Occupied(mut entry) => {
                if entry.get().0 != *selection {
                    debug!("selection changed for view '{}', re-rendering", view);
                    entry.insert((selection.clone(), render(payload, selection, view)?));
                }
                Ok(&entry.into_mut().1)
            }
            Entry::Vacant(entry) => {
                let output = render(payload, selection, view)?;
                Ok(&entry.insert((selection.clone(), output)).1)
            }
        }
    }
}
