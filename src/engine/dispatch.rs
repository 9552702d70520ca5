//! Pure decision tables mapping a rule and instance state to a backend method.

use crate::model::*;

/// How a mutation is carried out against the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Noop,
    UpdateInactive,
    CreateOverride,
    CreateDontRecord,
    DiscreetUpdate(Patch),
    FullUpdate,
    Delete,
    NotImplemented,
}

/// Field subsets applied by a discreet update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Patch {
    /// Priority, expiry, offsets, group and inactive flag of a modifier.
    Modifier,
    /// End time and end offset of an in-progress recording.
    EndTime,
    /// Priority, expiry, offsets and group. Seeds newly created overrides.
    Settings,
    /// Settings plus duplicate control, filter, channel, search and title.
    Rule,
}

impl Method {
    pub fn label(&self) -> &'static str {
        match self {
            Method::Noop => "noop",
            Method::UpdateInactive => "update_inactive",
            Method::CreateOverride => "create_override",
            Method::CreateDontRecord => "create_dontrecord",
            Method::DiscreetUpdate(_) => "discreet_update",
            Method::FullUpdate => "full_update",
            Method::Delete => "delete",
            Method::NotImplemented => "not_implemented",
        }
    }
}

fn needs_override(status: RecordingStatus) -> bool {
    matches!(
        status,
        RecordingStatus::NeverRecord
            | RecordingStatus::PreviousRecording
            | RecordingStatus::EarlierShowing
            | RecordingStatus::CurrentRecording
    )
}

/// Stop recording one occurrence.
pub fn disable_method(rule_type: RuleType, status: RecordingStatus) -> Method {
    match rule_type {
        RuleType::DontRecord | RuleType::Override => Method::Delete,
        RuleType::Single => match status {
            RecordingStatus::Recording | RecordingStatus::Tuning => Method::Delete,
            RecordingStatus::PreviousRecording | RecordingStatus::EarlierShowing => Method::CreateDontRecord,
            _ => Method::UpdateInactive,
        },
        RuleType::One
        | RuleType::Channel
        | RuleType::All
        | RuleType::Daily
        | RuleType::Weekly
        | RuleType::FindDaily
        | RuleType::FindWeekly => Method::CreateDontRecord,
        RuleType::NotRecording | RuleType::Template | RuleType::Unknown => Method::NotImplemented,
    }
}

/// Record one occurrence.
pub fn enable_method(status: RecordingStatus) -> Method {
    if needs_override(status) { Method::CreateOverride } else { Method::UpdateInactive }
}

/// Edit the rule behind one occurrence.
pub fn update_instance_method(rule_type: RuleType, status: RecordingStatus) -> Method {
    match rule_type {
        RuleType::NotRecording | RuleType::Template | RuleType::Unknown => Method::NotImplemented,
        RuleType::DontRecord => Method::Noop,
        RuleType::Override => Method::DiscreetUpdate(Patch::Modifier),
        RuleType::Single => {
            if status.is_active() {
                Method::DiscreetUpdate(Patch::EndTime)
            } else if needs_override(status) {
                Method::CreateOverride
            } else {
                Method::FullUpdate
            }
        }
        _ => Method::CreateOverride,
    }
}

/// Edit a rule directly. Single-record rules are redirected to their most
/// recent occurrence before reaching this table.
pub fn update_rule_method(rule_type: RuleType, current_inactive: bool, new_inactive: bool) -> Method {
    match rule_type {
        RuleType::NotRecording | RuleType::Template | RuleType::Unknown | RuleType::Single => Method::NotImplemented,
        RuleType::DontRecord => Method::Noop,
        RuleType::Override => Method::DiscreetUpdate(Patch::Modifier),
        _ if current_inactive || new_inactive => Method::FullUpdate,
        _ => Method::DiscreetUpdate(Patch::Rule),
    }
}

/// Copy a patch's fields from `source` onto `target`.
pub fn apply_patch(target: &mut RecordingRule, source: &RecordingRule, patch: Patch) {
    match patch {
        Patch::EndTime => {
            target.end_time = source.end_time;
            target.end_offset = source.end_offset;
        }
        Patch::Modifier | Patch::Settings | Patch::Rule => {
            target.priority = source.priority;
            target.auto_expire = source.auto_expire;
            target.start_offset = source.start_offset;
            target.end_offset = source.end_offset;
            target.recording_group = source.recording_group.clone();
            if patch == Patch::Modifier {
                target.inactive = source.inactive;
            }
            if patch == Patch::Rule {
                target.dup_method = source.dup_method;
                target.chan_id = source.chan_id;
                target.callsign = source.callsign.clone();
                // Search-defining fields only carry over between rules of one shape.
                if target.rule_type == source.rule_type {
                    target.filter = target.filter.with_timer_bits(source.filter);
                    target.search = source.search;
                    target.description = source.description.clone();
                    target.title = source.title.clone();
                }
            }
        }
    }
}
