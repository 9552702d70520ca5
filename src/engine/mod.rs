mod dispatch;
mod error;
mod mutations;
mod queries;
mod store;

pub use dispatch::{Method, Patch};
pub use error::{EngineError, timer_status};
pub use store::{RuleNode, ScheduleGraph};

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::backend::{Backend, BackendError};
use crate::config::EngineConfig;
use crate::model::*;
use crate::observability;
use crate::version::{CategoryOverTime, HelperContext, VersionHelper};

/// Backend setting naming the category that gets extra recording time.
pub const OVERTIME_CATEGORY_SETTING: &str = "OverTimeCategory";
/// Backend setting holding that extra time in minutes.
pub const OVERTIME_MINUTES_SETTING: &str = "CategoryOverTime";

/// State guarded by the manager lock.
pub(super) struct Inner {
    pub(super) graph: ScheduleGraph,
    pub(super) helper: VersionHelper,
    pub(super) show_not_recording: bool,
}

/// Reconciles host timers with the backend's rules and upcoming instances.
///
/// Every public operation holds one lock for its whole duration, backend
/// round-trips included.
pub struct ScheduleManager {
    backend: Arc<dyn Backend>,
    config: EngineConfig,
    inner: Mutex<Inner>,
}

impl ScheduleManager {
    /// Manager with an empty snapshot. Call [`update`](Self::update) before use.
    pub fn new(backend: Arc<dyn Backend>, config: EngineConfig) -> Self {
        let helper = VersionHelper::new(0, helper_context(&config, Vec::new(), Vec::new(), None));
        let inner = Inner {
            graph: ScheduleGraph::default(),
            helper,
            show_not_recording: config.show_not_recording,
        };
        Self { backend, config, inner: Mutex::new(inner) }
    }

    pub async fn connect(backend: Arc<dyn Backend>, config: EngineConfig) -> Result<Self, EngineError> {
        let manager = Self::new(backend, config);
        manager.update().await?;
        Ok(manager)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Rebuild the snapshot from the backend. The previous snapshot stays in
    /// place if any fetch fails.
    pub async fn update(&self) -> Result<(), EngineError> {
        let start = Instant::now();
        let mut inner = self.inner.lock().await;
        let result = self.refresh(&mut inner).await;
        metrics::histogram!(observability::REFRESH_DURATION_SECONDS).record(start.elapsed().as_secs_f64());
        let status = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!(observability::REFRESH_TOTAL, "status" => status).increment(1);
        result.map_err(EngineError::Fetch)
    }

    async fn refresh(&self, inner: &mut Inner) -> Result<(), BackendError> {
        let protocol = self.backend.check_service().await?;
        let groups = self.backend.rec_group_list().await?;
        let overtime_category = self.backend.setting(OVERTIME_CATEGORY_SETTING).await?;
        let overtime_minutes = self.backend.setting(OVERTIME_MINUTES_SETTING).await?;
        let rules = self.backend.record_schedule_list().await?;
        let upcoming = self.backend.upcoming_list().await?;

        let category_overtime = match (overtime_category, overtime_minutes) {
            (Some(category), Some(minutes)) if !category.is_empty() => {
                minutes.trim().parse().ok().map(|minutes| CategoryOverTime { category, minutes })
            }
            _ => None,
        };
        let templates: Vec<RecordingRule> =
            rules.iter().filter(|r| r.rule_type == RuleType::Template).cloned().collect();
        let helper = VersionHelper::new(protocol, helper_context(&self.config, groups, templates, category_overtime));
        let graph = ScheduleGraph::build(rules, upcoming, |a, b| helper.same_timeslot(a, b));

        if helper.protocol() != inner.helper.protocol() {
            info!(
                protocol,
                generation = ?helper.generation(),
                "backend protocol changed"
            );
        }
        debug!(rules = graph.rule_count(), upcoming = graph.upcoming_count(), "snapshot rebuilt");
        metrics::gauge!(observability::RULES).set(graph.rule_count() as f64);
        metrics::gauge!(observability::UPCOMING).set(graph.upcoming_count() as f64);

        inner.graph = graph;
        inner.helper = helper;
        Ok(())
    }
}

fn helper_context(
    config: &EngineConfig,
    recording_groups: Vec<String>,
    templates: Vec<RecordingRule>,
    category_overtime: Option<CategoryOverTime>,
) -> HelperContext {
    HelperContext {
        template: config.template.clone(),
        dummy_channel: config.dummy_channel.clone(),
        recording_groups,
        templates,
        category_overtime,
    }
}
