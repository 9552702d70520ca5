use tracing::{debug, error, warn};

use crate::backend::BackendError;
use crate::index::rule_index;
use crate::model::*;
use crate::observability;

use super::dispatch::{self, Method, Patch};
use super::error::timer_status;
use super::{EngineError, Inner, ScheduleManager};

fn track<T>(call: &'static str, result: Result<T, BackendError>) -> Result<T, BackendError> {
    let status = if result.is_ok() { "ok" } else { "error" };
    metrics::counter!(observability::BACKEND_WRITES_TOTAL, "call" => call, "status" => status).increment(1);
    result
}

fn report(op: &'static str, result: Result<(), EngineError>) -> TimerStatus {
    if let Err(e) = &result {
        warn!(op, "timer operation failed: {e}");
    }
    let status = timer_status(&result);
    metrics::counter!(
        observability::TIMER_OPS_TOTAL,
        "op" => op,
        "status" => observability::status_label(status)
    )
    .increment(1);
    status
}

fn ensure_translated(rule: &RecordingRule) -> Result<(), EngineError> {
    match rule.rule_type {
        RuleType::Unknown | RuleType::NotRecording => Err(EngineError::Untranslatable(rule.rule_type)),
        _ => Ok(()),
    }
}

/// Body of a full update: every field a timer carries comes from `newrule`,
/// identity and backend-only settings stay with `current`. A backend-row
/// translation (not-recording) keeps the current rule shape.
fn merge_full(current: &RecordingRule, newrule: &RecordingRule) -> RecordingRule {
    let mut handle = current.clone();
    let reshape = newrule.rule_type != RuleType::NotRecording;
    if reshape {
        handle.rule_type = newrule.rule_type;
        handle.search = newrule.search;
        handle.filter = current.filter.with_timer_bits(newrule.filter);
    }
    if reshape || !newrule.description.is_empty() {
        handle.description = newrule.description.clone();
    }
    handle.chan_id = newrule.chan_id;
    handle.callsign = newrule.callsign.clone();
    handle.start_time = newrule.start_time;
    handle.end_time = newrule.end_time;
    handle.title = newrule.title.clone();
    handle.subtitle = newrule.subtitle.clone();
    handle.category = newrule.category.clone();
    handle.start_offset = newrule.start_offset;
    handle.end_offset = newrule.end_offset;
    handle.priority = newrule.priority;
    handle.dup_method = newrule.dup_method;
    handle.auto_expire = newrule.auto_expire;
    handle.recording_group = newrule.recording_group.clone();
    handle.inactive = newrule.inactive;
    handle
}

impl ScheduleManager {
    // ── Host timer operations ────────────────────────────

    pub async fn submit_timer(&self, entry: &TimerEntry) -> TimerStatus {
        let mut inner = self.inner.lock().await;
        let result = self.submit_locked(&mut inner, entry).await;
        report("submit_timer", result)
    }

    pub async fn update_timer(&self, entry: &TimerEntry) -> TimerStatus {
        let mut inner = self.inner.lock().await;
        let result = self.update_timer_locked(&mut inner, entry).await;
        report("update_timer", result)
    }

    pub async fn delete_timer(&self, entry: &TimerEntry, force: bool) -> TimerStatus {
        let mut inner = self.inner.lock().await;
        let result = self.delete_timer_locked(&mut inner, entry, force).await;
        report("delete_timer", result)
    }

    async fn submit_locked(&self, inner: &mut Inner, entry: &TimerEntry) -> Result<(), EngineError> {
        if entry.timer_type.is_backend_row() {
            return Err(EngineError::NotImplemented("backend rows cannot be submitted"));
        }
        let rule = inner.helper.new_from_timer(entry, true);
        self.add_rule_locked(inner, rule).await.map(|_| ())
    }

    async fn update_timer_locked(&self, inner: &mut Inner, entry: &TimerEntry) -> Result<(), EngineError> {
        match entry.timer_type {
            TimerType::Unhandled => Err(EngineError::NotImplemented("unhandled timers cannot be edited")),
            TimerType::Record | TimerType::Override | TimerType::DontRecord => {
                let rule = inner.helper.new_from_timer(entry, false);
                self.update_recording_locked(inner, entry.entry_index, rule).await
            }
            _ => {
                let rule = inner.helper.new_from_timer(entry, false);
                self.update_rule_locked(inner, entry.entry_index, rule).await
            }
        }
    }

    async fn delete_timer_locked(&self, inner: &mut Inner, entry: &TimerEntry, force: bool) -> Result<(), EngineError> {
        match entry.timer_type {
            TimerType::Record => self.disable_locked(inner, entry.entry_index).await,
            TimerType::Override | TimerType::DontRecord => self.delete_modifier_locked(inner, entry.entry_index).await,
            TimerType::ThisShowing | TimerType::ManualSearch => self.delete_rule_locked(inner, entry.entry_index).await,
            _ if force => self.delete_rule_locked(inner, entry.entry_index).await,
            _ => {
                debug!(index = entry.entry_index, "delete of repeating timer needs force");
                Ok(())
            }
        }
    }

    // ── Occurrence operations ────────────────────────────

    /// Remove the modifier behind an occurrence unless it is already recorded.
    pub async fn delete_modifier(&self, index: u32) -> Result<(), EngineError> {
        let mut inner = self.inner.lock().await;
        self.delete_modifier_locked(&mut inner, index).await
    }

    pub async fn disable_recording(&self, index: u32) -> Result<(), EngineError> {
        let mut inner = self.inner.lock().await;
        self.disable_locked(&mut inner, index).await
    }

    pub async fn enable_recording(&self, index: u32) -> Result<(), EngineError> {
        let mut inner = self.inner.lock().await;
        self.enable_locked(&mut inner, index).await
    }

    pub async fn update_recording(&self, index: u32, newrule: RecordingRule) -> Result<(), EngineError> {
        let mut inner = self.inner.lock().await;
        self.update_recording_locked(&mut inner, index, newrule).await
    }

    fn occurrence(inner: &Inner, index: u32) -> Result<(ScheduledInstance, RecordingRule), EngineError> {
        let instance = inner.graph.instance(index).cloned().ok_or(EngineError::NotFound(index))?;
        let rule = inner
            .graph
            .node(instance.record_id)
            .map(|n| n.rule.clone())
            .ok_or(EngineError::NotFound(index))?;
        Ok((instance, rule))
    }

    async fn delete_modifier_locked(&self, inner: &mut Inner, index: u32) -> Result<(), EngineError> {
        let (instance, rule) = Self::occurrence(inner, index)?;
        if instance.status == RecordingStatus::Recorded {
            return Err(EngineError::Refused("occurrence is already recorded"));
        }
        if rule.is_modifier() {
            self.remove_best_effort(rule.record_id).await;
            inner.graph.remove_rule(rule.record_id);
        }
        Ok(())
    }

    async fn disable_locked(&self, inner: &mut Inner, index: u32) -> Result<(), EngineError> {
        let (instance, rule) = Self::occurrence(inner, index)?;
        if matches!(instance.status, RecordingStatus::Inactive | RecordingStatus::DontRecord) {
            return Ok(());
        }
        let method = dispatch::disable_method(rule.rule_type, instance.status);
        debug!(index, record_id = rule.record_id, method = method.label(), "disable recording");
        match method {
            Method::UpdateInactive => {
                if rule.inactive {
                    return Ok(());
                }
                let mut handle = rule;
                handle.inactive = true;
                self.write_update(inner, handle).await?;
                inner.graph.set_instance_status(index, RecordingStatus::Inactive);
                Ok(())
            }
            Method::CreateDontRecord => {
                let modifier = inner.helper.make_dont_record(&rule, &instance);
                self.create_modifier(inner, rule.record_id, modifier).await?;
                inner.graph.set_instance_status(index, RecordingStatus::DontRecord);
                Ok(())
            }
            Method::Delete => self.delete_rule_locked(inner, rule_index(rule.record_id)).await,
            _ => Err(EngineError::NotImplemented("disabling this rule type")),
        }
    }

    async fn enable_locked(&self, inner: &mut Inner, index: u32) -> Result<(), EngineError> {
        let (instance, rule) = Self::occurrence(inner, index)?;
        let method = dispatch::enable_method(instance.status);
        debug!(index, record_id = rule.record_id, method = method.label(), "enable recording");
        match method {
            Method::CreateOverride => {
                let modifier = inner.helper.make_override(&rule, &instance);
                self.create_modifier(inner, rule.record_id, modifier).await?;
            }
            _ => {
                if !rule.inactive {
                    return Ok(());
                }
                let mut handle = rule;
                handle.inactive = false;
                self.write_update(inner, handle).await?;
            }
        }
        inner.graph.set_instance_status(index, RecordingStatus::WillRecord);
        Ok(())
    }

    async fn update_recording_locked(
        &self,
        inner: &mut Inner,
        index: u32,
        newrule: RecordingRule,
    ) -> Result<(), EngineError> {
        if newrule.rule_type == RuleType::Unknown {
            return Err(EngineError::Untranslatable(newrule.rule_type));
        }
        let (instance, rule) = Self::occurrence(inner, index)?;
        if !rule.inactive && newrule.inactive {
            return self.disable_locked(inner, index).await;
        }
        let method = dispatch::update_instance_method(rule.rule_type, instance.status);
        debug!(index, record_id = rule.record_id, method = method.label(), "update recording");
        match method {
            Method::Noop => Ok(()),
            Method::DiscreetUpdate(patch) => {
                let mut handle = rule;
                dispatch::apply_patch(&mut handle, &newrule, patch);
                self.write_update(inner, handle).await
            }
            Method::CreateOverride => {
                let mut handle = rule.clone();
                dispatch::apply_patch(&mut handle, &newrule, Patch::Settings);
                let modifier = inner.helper.make_override(&handle, &instance);
                self.create_modifier(inner, rule.record_id, modifier).await?;
                inner.graph.set_instance_status(index, RecordingStatus::WillRecord);
                Ok(())
            }
            Method::FullUpdate => self.write_update(inner, merge_full(&rule, &newrule)).await,
            _ => Err(EngineError::NotImplemented("updating this rule type")),
        }
    }

    // ── Rule operations ──────────────────────────────────

    /// Create a rule and return its backend id.
    pub async fn add_recording_rule(&self, rule: RecordingRule) -> Result<u32, EngineError> {
        let mut inner = self.inner.lock().await;
        self.add_rule_locked(&mut inner, rule).await
    }

    pub async fn update_recording_rule(&self, index: u32, newrule: RecordingRule) -> Result<(), EngineError> {
        let mut inner = self.inner.lock().await;
        self.update_rule_locked(&mut inner, index, newrule).await
    }

    /// Remove a rule and its modifiers, stopping whatever they are recording.
    /// Backend failures are logged; the rule is gone from the snapshot either way.
    pub async fn delete_recording_rule(&self, index: u32) -> Result<(), EngineError> {
        let mut inner = self.inner.lock().await;
        self.delete_rule_locked(&mut inner, index).await
    }

    async fn add_rule_locked(&self, inner: &mut Inner, mut rule: RecordingRule) -> Result<u32, EngineError> {
        ensure_translated(&rule)?;
        inner.helper.fix_rule(&mut rule);
        let id = track("add_record_schedule", self.backend.add_record_schedule(&rule).await)?;
        rule.record_id = id;
        debug!(record_id = id, rule_type = ?rule.rule_type, "rule added");
        inner.graph.add_rule(rule);
        Ok(id)
    }

    async fn update_rule_locked(&self, inner: &mut Inner, index: u32, newrule: RecordingRule) -> Result<(), EngineError> {
        if newrule.rule_type == RuleType::Unknown {
            return Err(EngineError::Untranslatable(newrule.rule_type));
        }
        let rule = inner
            .graph
            .node_by_index(index)
            .map(|n| n.rule.clone())
            .ok_or(EngineError::NotFound(index))?;

        if rule.rule_type == RuleType::Single {
            let last = inner.graph.last_upcoming(rule.record_id).map(|(i, _)| i);
            return match last {
                Some(instance) => self.update_recording_locked(inner, instance, newrule).await,
                None => Err(EngineError::NotImplemented("single rule without upcoming instance")),
            };
        }

        let method = dispatch::update_rule_method(rule.rule_type, rule.inactive, newrule.inactive);
        debug!(index, method = method.label(), "update recording rule");
        match method {
            Method::Noop => Ok(()),
            Method::DiscreetUpdate(patch) => {
                let mut handle = rule;
                dispatch::apply_patch(&mut handle, &newrule, patch);
                self.write_update(inner, handle).await
            }
            Method::FullUpdate => self.write_update(inner, merge_full(&rule, &newrule)).await,
            _ => Err(EngineError::NotImplemented("updating this rule type")),
        }
    }

    async fn delete_rule_locked(&self, inner: &mut Inner, index: u32) -> Result<(), EngineError> {
        let Some(node) = inner.graph.node_by_index(index) else {
            debug!(index, "rule already absent");
            return Ok(());
        };
        let record_id = node.rule.record_id;
        let children: Vec<u32> = node.modifiers.iter().map(|m| m.record_id).collect();

        for child in children {
            self.stop_active(inner, child).await;
            self.remove_best_effort(child).await;
            inner.graph.remove_rule(child);
        }
        self.stop_active(inner, record_id).await;
        self.remove_best_effort(record_id).await;
        inner.graph.remove_rule(record_id);
        Ok(())
    }

    // ── Backend writes ───────────────────────────────────

    async fn write_update(&self, inner: &mut Inner, mut handle: RecordingRule) -> Result<(), EngineError> {
        inner.helper.fix_rule(&mut handle);
        track("update_record_schedule", self.backend.update_record_schedule(&handle).await)?;
        inner.graph.replace_rule(handle);
        Ok(())
    }

    async fn create_modifier(&self, inner: &mut Inner, main_id: u32, mut modifier: RecordingRule) -> Result<(), EngineError> {
        inner.helper.fix_rule(&mut modifier);
        let id = track("add_record_schedule", self.backend.add_record_schedule(&modifier).await)?;
        modifier.record_id = id;
        debug!(record_id = id, main_id, rule_type = ?modifier.rule_type, "modifier added");
        inner.graph.attach_modifier(main_id, modifier);
        Ok(())
    }

    async fn remove_best_effort(&self, record_id: u32) {
        if let Err(e) = track("remove_record_schedule", self.backend.remove_record_schedule(record_id).await) {
            error!(record_id, "removing rule failed: {e}");
        }
    }

    async fn stop_active(&self, inner: &Inner, record_id: u32) {
        let active: Vec<ScheduledInstance> = inner
            .graph
            .upcoming_for_rule(record_id)
            .into_iter()
            .filter(|(_, p)| p.status.is_active())
            .map(|(_, p)| p.clone())
            .collect();
        for instance in active {
            if let Err(e) = track("stop_recording", self.backend.stop_recording(&instance).await) {
                error!(record_id, uid = %instance.uid, "stopping recording failed: {e}");
            }
        }
    }
}
