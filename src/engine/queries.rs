use std::collections::HashSet;

use tracing::info;

use crate::index::{Handle, rule_index};
use crate::model::*;
use crate::version::{FillOptions, RuleSummary, TimerTypeDescriptor};

use super::{Inner, ScheduleManager};

fn now() -> Timestamp {
    chrono::Utc::now().timestamp()
}

impl ScheduleManager {
    pub async fn upcoming_count(&self) -> usize {
        self.inner.lock().await.graph.upcoming_count()
    }

    /// One timer per presented main rule, then one per upcoming instance.
    pub async fn timer_entries(&self) -> Vec<TimerEntry> {
        self.timer_entries_at(now()).await
    }

    /// [`timer_entries`](Self::timer_entries) evaluated at a fixed clock.
    pub async fn timer_entries_at(&self, now: Timestamp) -> Vec<TimerEntry> {
        let inner = self.inner.lock().await;
        let opts = FillOptions {
            now,
            stale_after: self.config.stale_rule_window_secs,
            show_inactive: inner.show_not_recording,
        };
        collect_entries(&inner, opts)
    }

    /// Flip whether superseded instances and stale rules are listed.
    pub async fn toggle_show_not_recording(&self) -> bool {
        let mut inner = self.inner.lock().await;
        inner.show_not_recording = !inner.show_not_recording;
        info!(show_not_recording = inner.show_not_recording, "toggled");
        inner.show_not_recording
    }

    pub async fn protocol_version(&self) -> u32 {
        self.inner.lock().await.helper.protocol()
    }

    /// Translate a timer with the active helper, without touching the backend.
    pub async fn new_from_timer(&self, entry: &TimerEntry, with_template: bool) -> RecordingRule {
        self.inner.lock().await.helper.new_from_timer(entry, with_template)
    }

    // ── Snapshot lookups ─────────────────────────────────

    pub async fn find_rule_by_id(&self, record_id: u32) -> Option<RecordingRule> {
        self.inner.lock().await.graph.node(record_id).map(|n| n.rule.clone())
    }

    pub async fn find_rule_by_index(&self, index: u32) -> Option<RecordingRule> {
        self.inner.lock().await.graph.node_by_index(index).map(|n| n.rule.clone())
    }

    /// Rule behind any handle: the rule itself, or the rule owning an instance.
    pub async fn rule_for_index(&self, index: u32) -> Option<RecordingRule> {
        let inner = self.inner.lock().await;
        let node = match Handle::from_index(index) {
            Handle::Rule(_) => inner.graph.node_by_index(index),
            Handle::Instance(_) => inner.graph.instance(index).and_then(|p| inner.graph.node(p.record_id)),
        };
        node.map(|n| n.rule.clone())
    }

    /// Modifiers linked to a main rule.
    pub async fn modifiers_of(&self, record_id: u32) -> Vec<RecordingRule> {
        self.inner
            .lock()
            .await
            .graph
            .node(record_id)
            .map(|n| n.modifiers.clone())
            .unwrap_or_default()
    }

    pub async fn upcoming_by_rule_id(&self, record_id: u32) -> Vec<ScheduledInstance> {
        let inner = self.inner.lock().await;
        inner
            .graph
            .upcoming_for_rule(record_id)
            .into_iter()
            .map(|(_, p)| p.clone())
            .collect()
    }

    pub async fn upcoming_by_index(&self, index: u32) -> Option<ScheduledInstance> {
        self.inner.lock().await.graph.instance(index).cloned()
    }

    pub async fn template_rules(&self) -> Vec<RecordingRule> {
        self.inner.lock().await.graph.templates().to_vec()
    }

    // ── Descriptor tables ────────────────────────────────

    pub async fn timer_types(&self) -> Vec<TimerTypeDescriptor> {
        self.inner.lock().await.helper.timer_types().to_vec()
    }

    pub async fn priority_list(&self) -> Vec<(i32, String)> {
        self.inner.lock().await.helper.priority_list().to_vec()
    }

    pub async fn priority_default(&self) -> i32 {
        self.inner.lock().await.helper.priority_default()
    }

    pub async fn dup_method_list(&self) -> Vec<(DupMethod, String)> {
        self.inner.lock().await.helper.dup_method_list().to_vec()
    }

    pub async fn dup_method_default(&self) -> DupMethod {
        self.inner.lock().await.helper.dup_method_default()
    }

    pub async fn expiration_list(&self) -> Vec<(bool, String)> {
        self.inner.lock().await.helper.expiration_list().to_vec()
    }

    pub async fn expiration_default(&self) -> bool {
        self.inner.lock().await.helper.expiration_default()
    }

    pub async fn recording_group_list(&self) -> Vec<(u32, String)> {
        self.inner.lock().await.helper.recording_group_list().to_vec()
    }

    pub async fn recording_group_default(&self) -> u32 {
        self.inner.lock().await.helper.recording_group_default()
    }

    // ── Rule seeding ─────────────────────────────────────

    pub async fn summary_info(&self, rule: &RecordingRule) -> RuleSummary {
        self.inner.lock().await.helper.summary_info(rule)
    }

    pub async fn new_single_record(&self, epg: Option<&EpgInfo>) -> RecordingRule {
        self.inner.lock().await.helper.new_single_record(epg)
    }

    pub async fn new_daily_record(&self, epg: Option<&EpgInfo>) -> RecordingRule {
        self.inner.lock().await.helper.new_daily_record(epg)
    }

    pub async fn new_weekly_record(&self, epg: Option<&EpgInfo>) -> RecordingRule {
        self.inner.lock().await.helper.new_weekly_record(epg)
    }

    pub async fn new_channel_record(&self, epg: Option<&EpgInfo>) -> RecordingRule {
        self.inner.lock().await.helper.new_channel_record(epg)
    }

    pub async fn new_one_record(&self, epg: Option<&EpgInfo>) -> RecordingRule {
        self.inner.lock().await.helper.new_one_record(epg)
    }
}

fn collect_entries(inner: &Inner, opts: FillOptions) -> Vec<TimerEntry> {
    let graph = &inner.graph;
    let helper = &inner.helper;
    let mut entries = Vec::new();
    let mut declined = HashSet::new();

    for node in graph.nodes() {
        if node.is_modifier() {
            continue;
        }
        let upcoming: Vec<&ScheduledInstance> =
            graph.upcoming_for_rule(node.rule.record_id).into_iter().map(|(_, p)| p).collect();
        match helper.fill_rule_entry(&node.rule, &upcoming, opts) {
            Some(entry) => entries.push(entry),
            None => {
                declined.insert(node.rule.record_id);
            }
        }
    }

    for (_, instance) in graph.instances() {
        let Some(owner) = graph.node(instance.record_id) else { continue };
        let main_id = graph.main_rule_id(owner.rule.record_id);
        if main_id.is_some_and(|id| declined.contains(&id)) {
            continue;
        }
        let main_index = main_id.map_or(0, rule_index);
        let upcoming: Vec<&ScheduledInstance> =
            graph.upcoming_for_rule(owner.rule.record_id).into_iter().map(|(_, p)| p).collect();
        if let Some(entry) = helper.fill_instance_entry(instance, &owner.rule, main_index, &upcoming, opts) {
            entries.push(entry);
        }
    }
    entries
}
