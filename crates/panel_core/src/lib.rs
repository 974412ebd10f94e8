use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use shared::{
    domain::{ControlState, Parameter, ParameterRecord},
    error::{PanelError, ResourceKind},
};
use tracing::{error, info};

pub mod config;
pub mod dispatch;
pub mod resolver;
pub mod ui;

pub use config::{load_settings, Settings, Transport};
pub use dispatch::{
    dispatcher_from_settings, ActionDispatcher, ChannelActionDispatcher, HttpActionDispatcher,
    LocalMessageChannel, MessageChannel, MissingMessageChannel,
};
pub use ui::{TriggerControl, UiController, BUSY_INDICATOR};

/// Entry seam to the host dashboard runtime. Implementations wrap whatever
/// the embedding shell exposes; tests substitute fakes.
#[async_trait]
pub trait DashboardHost: Send + Sync {
    /// Completes the host initialization handshake and yields the active
    /// dashboard, or `HostUnavailable` when the handshake fails.
    async fn initialize(&self) -> Result<Arc<dyn DashboardHandle>, PanelError>;
}

pub struct MissingDashboardHost;

#[async_trait]
impl DashboardHost for MissingDashboardHost {
    async fn initialize(&self) -> Result<Arc<dyn DashboardHandle>, PanelError> {
        Err(PanelError::HostUnavailable(
            "no dashboard host injected".to_string(),
        ))
    }
}

#[async_trait]
pub trait DashboardHandle: Send + Sync {
    fn name(&self) -> String;
    async fn parameters(&self) -> Result<Vec<Parameter>, PanelError>;
    async fn worksheets(&self) -> Result<Vec<Arc<dyn WorksheetHandle>>, PanelError>;
}

#[async_trait]
pub trait WorksheetHandle: Send + Sync {
    fn name(&self) -> String;
    async fn data_sources(&self) -> Result<Vec<Arc<dyn DataSourceHandle>>, PanelError>;
}

#[async_trait]
pub trait DataSourceHandle: Send + Sync {
    fn name(&self) -> String;
    /// Resolves once the host confirms the refresh has started, not once
    /// the underlying data has finished loading.
    async fn refresh(&self) -> Result<(), PanelError>;
}

/// Wraps an initialized dashboard handle with the two operations the panel
/// needs: parameter projection and named data-source refresh.
pub struct DashboardAdapter {
    dashboard: Arc<dyn DashboardHandle>,
}

impl DashboardAdapter {
    pub fn new(dashboard: Arc<dyn DashboardHandle>) -> Self {
        Self { dashboard }
    }

    pub fn dashboard_name(&self) -> String {
        self.dashboard.name()
    }

    /// Projects every host parameter into a [`ParameterRecord`]. Empty when
    /// the active dashboard has no parameters.
    pub async fn parameter_records(&self) -> Result<Vec<ParameterRecord>, PanelError> {
        let parameters = self.dashboard.parameters().await?;
        Ok(parameters.into_iter().map(ParameterRecord::from).collect())
    }

    /// Refreshes the named data source on the named worksheet. Exact name
    /// match, first match wins; a missing worksheet or data source fails
    /// with `NotFound`.
    pub async fn refresh_data_source(
        &self,
        worksheet_name: &str,
        data_source_name: &str,
    ) -> Result<(), PanelError> {
        let worksheets = self.dashboard.worksheets().await?;
        let worksheet = worksheets
            .into_iter()
            .find(|worksheet| worksheet.name() == worksheet_name)
            .ok_or_else(|| PanelError::not_found(ResourceKind::Worksheet, worksheet_name))?;

        let data_sources = worksheet.data_sources().await?;
        let data_source = data_sources
            .into_iter()
            .find(|data_source| data_source.name() == data_source_name)
            .ok_or_else(|| PanelError::not_found(ResourceKind::DataSource, data_source_name))?;

        data_source.refresh().await?;
        info!(
            worksheet = worksheet_name,
            data_source = data_source_name,
            "refresh: data source refresh started"
        );
        Ok(())
    }
}

/// The panel itself: one trigger control wired to the
/// fetch-resolve-dispatch-refresh cycle.
pub struct ActionPanel {
    adapter: DashboardAdapter,
    dispatcher: Arc<dyn ActionDispatcher>,
    ui: UiController,
    query_parameter: String,
    refresh_target: Option<(String, String)>,
    cycle_timeout: Duration,
}

impl std::fmt::Debug for ActionPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionPanel")
            .field("query_parameter", &self.query_parameter)
            .field("refresh_target", &self.refresh_target)
            .field("cycle_timeout", &self.cycle_timeout)
            .finish_non_exhaustive()
    }
}

impl ActionPanel {
    /// Runs the host initialization handshake once and wires the panel.
    /// A failed handshake is fatal to the panel: logged, no retry.
    pub async fn connect(
        host: Arc<dyn DashboardHost>,
        dispatcher: Arc<dyn ActionDispatcher>,
        control: Arc<dyn TriggerControl>,
        settings: &Settings,
    ) -> Result<Self, PanelError> {
        let dashboard = match host.initialize().await {
            Ok(dashboard) => dashboard,
            Err(err) => {
                error!("init: host extension API initialization failed: {err}");
                return Err(err);
            }
        };
        info!(dashboard = %dashboard.name(), "init: dashboard host initialized");

        Ok(Self {
            adapter: DashboardAdapter::new(dashboard),
            dispatcher,
            ui: UiController::new(control),
            query_parameter: settings.query_parameter.clone(),
            refresh_target: settings.refresh_target(),
            cycle_timeout: Duration::from_secs(settings.cycle_timeout_seconds),
        })
    }

    pub async fn control_state(&self) -> ControlState {
        self.ui.state().await
    }

    /// One click cycle. A re-entrant trigger while a cycle is in flight is
    /// rejected with `Busy`; however the cycle settles, the control returns
    /// to its idle, clickable state so the user can retry.
    pub async fn run_action(&self) -> Result<(), PanelError> {
        self.ui.begin().await?;

        let result = match tokio::time::timeout(self.cycle_timeout, self.run_action_cycle()).await
        {
            Ok(result) => result,
            Err(_) => Err(PanelError::Timeout),
        };

        self.ui.finish().await;
        if let Err(err) = &result {
            error!("action: cycle failed: {err}");
        }
        result
    }

    async fn run_action_cycle(&self) -> Result<(), PanelError> {
        info!(dashboard = %self.adapter.dashboard_name(), "action: fetching parameters");
        let records = self.adapter.parameter_records().await?;
        let query = resolver::resolve(&records, &self.query_parameter);

        info!(query = %query, "action: dispatching query");
        self.dispatcher.send(&query).await?;

        if let Some((worksheet, data_source)) = &self.refresh_target {
            self.adapter
                .refresh_data_source(worksheet, data_source)
                .await?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
