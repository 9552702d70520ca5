use serde::Serialize;

use crate::model::{DupMethod, TimerType};

use super::Generation;

/// Name of the recording group that always holds id 0.
pub const DEFAULT_RECORDING_GROUP: &str = "Default";

/// Capability bits the host uses to build its timer editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct TimerAttributes(pub u32);

impl TimerAttributes {
    pub const IS_MANUAL: TimerAttributes = TimerAttributes(1 << 0);
    pub const IS_REPEATING: TimerAttributes = TimerAttributes(1 << 1);
    pub const IS_READONLY: TimerAttributes = TimerAttributes(1 << 2);
    pub const FORBIDS_NEW_INSTANCES: TimerAttributes = TimerAttributes(1 << 3);
    pub const SUPPORTS_ENABLE_DISABLE: TimerAttributes = TimerAttributes(1 << 4);
    pub const SUPPORTS_CHANNELS: TimerAttributes = TimerAttributes(1 << 5);
    pub const SUPPORTS_ANY_CHANNEL: TimerAttributes = TimerAttributes(1 << 6);
    pub const SUPPORTS_START_END_TIME: TimerAttributes = TimerAttributes(1 << 7);
    pub const SUPPORTS_FIRST_DAY: TimerAttributes = TimerAttributes(1 << 8);
    pub const SUPPORTS_MARGIN: TimerAttributes = TimerAttributes(1 << 9);
    pub const SUPPORTS_PRIORITY: TimerAttributes = TimerAttributes(1 << 10);
    pub const SUPPORTS_LIFETIME: TimerAttributes = TimerAttributes(1 << 11);
    pub const SUPPORTS_RECORDING_GROUP: TimerAttributes = TimerAttributes(1 << 12);
    pub const SUPPORTS_RECORD_ONLY_NEW_EPISODES: TimerAttributes = TimerAttributes(1 << 13);
    pub const SUPPORTS_TITLE_EPG_MATCH: TimerAttributes = TimerAttributes(1 << 14);
    pub const SUPPORTS_FULLTEXT_EPG_MATCH: TimerAttributes = TimerAttributes(1 << 15);

    pub fn contains(self, other: TimerAttributes) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for TimerAttributes {
    type Output = TimerAttributes;

    fn bitor(self, rhs: TimerAttributes) -> TimerAttributes {
        TimerAttributes(self.0 | rhs.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimerTypeDescriptor {
    pub id: TimerType,
    pub attributes: TimerAttributes,
    pub description: &'static str,
}

// ── Tables ───────────────────────────────────────────────

pub(super) fn timer_types(generation: Generation) -> Vec<TimerTypeDescriptor> {
    use TimerAttributes as A;

    if generation == Generation::Legacy {
        return Vec::new();
    }

    let settings = A::SUPPORTS_MARGIN | A::SUPPORTS_PRIORITY | A::SUPPORTS_LIFETIME | A::SUPPORTS_RECORDING_GROUP;
    let repeating = A::IS_REPEATING | A::SUPPORTS_ENABLE_DISABLE | A::SUPPORTS_RECORD_ONLY_NEW_EPISODES | settings;

    vec![
        TimerTypeDescriptor {
            id: TimerType::ManualSearch,
            attributes: A::IS_MANUAL
                | A::SUPPORTS_ENABLE_DISABLE
                | A::SUPPORTS_CHANNELS
                | A::SUPPORTS_START_END_TIME
                | settings,
            description: "Manual",
        },
        TimerTypeDescriptor {
            id: TimerType::ThisShowing,
            attributes: A::SUPPORTS_ENABLE_DISABLE | A::SUPPORTS_CHANNELS | A::SUPPORTS_START_END_TIME | settings,
            description: "Record this showing",
        },
        TimerTypeDescriptor {
            id: TimerType::OneShowing,
            attributes: repeating | A::SUPPORTS_CHANNELS | A::SUPPORTS_ANY_CHANNEL,
            description: "Record one showing",
        },
        TimerTypeDescriptor {
            id: TimerType::OneShowingWeekly,
            attributes: repeating | A::SUPPORTS_CHANNELS | A::SUPPORTS_START_END_TIME | A::SUPPORTS_FIRST_DAY,
            description: "Record one showing every week",
        },
        TimerTypeDescriptor {
            id: TimerType::OneShowingDaily,
            attributes: repeating | A::SUPPORTS_CHANNELS | A::SUPPORTS_START_END_TIME | A::SUPPORTS_FIRST_DAY,
            description: "Record one showing every day",
        },
        TimerTypeDescriptor {
            id: TimerType::AllShowings,
            attributes: repeating | A::SUPPORTS_CHANNELS | A::SUPPORTS_ANY_CHANNEL,
            description: "Record all showings",
        },
        TimerTypeDescriptor {
            id: TimerType::TextSearch,
            attributes: repeating
                | A::SUPPORTS_CHANNELS
                | A::SUPPORTS_ANY_CHANNEL
                | A::SUPPORTS_TITLE_EPG_MATCH
                | A::SUPPORTS_FULLTEXT_EPG_MATCH,
            description: "Search keyword",
        },
        TimerTypeDescriptor {
            id: TimerType::Unhandled,
            attributes: A::IS_REPEATING | A::FORBIDS_NEW_INSTANCES | A::SUPPORTS_ENABLE_DISABLE | settings,
            description: "Rule not handled",
        },
        TimerTypeDescriptor {
            id: TimerType::Record,
            attributes: A::FORBIDS_NEW_INSTANCES | A::SUPPORTS_ENABLE_DISABLE | settings,
            description: "Upcoming recording",
        },
        TimerTypeDescriptor {
            id: TimerType::Override,
            attributes: A::FORBIDS_NEW_INSTANCES | A::SUPPORTS_ENABLE_DISABLE | settings,
            description: "Overridden recording",
        },
        TimerTypeDescriptor {
            id: TimerType::DontRecord,
            attributes: A::FORBIDS_NEW_INSTANCES | A::IS_READONLY | A::SUPPORTS_ENABLE_DISABLE,
            description: "Don't record",
        },
    ]
}

pub(super) fn priority_list(generation: Generation) -> Vec<(i32, String)> {
    if generation == Generation::Legacy {
        return vec![(0, "0".into())];
    }
    (-99..=99)
        .map(|p| {
            let label = if p == 0 { "0".to_string() } else { format!("{p:+}") };
            (p, label)
        })
        .collect()
}

pub(super) fn dup_method_list(generation: Generation) -> Vec<(DupMethod, String)> {
    if generation == Generation::Legacy {
        return vec![(DupMethod::None, DupMethod::None.label().into())];
    }
    DupMethod::ALL.iter().map(|m| (*m, m.label().to_string())).collect()
}

pub(super) fn expiration_list(generation: Generation) -> Vec<(bool, String)> {
    let keep = (false, "Keep until deleted".to_string());
    if generation == Generation::Legacy {
        return vec![keep];
    }
    vec![keep, (true, "Allow auto-expire".to_string())]
}

/// `Default` first at id 0, then every other backend group in backend order.
pub(super) fn recording_group_list(generation: Generation, groups: &[String]) -> Vec<(u32, String)> {
    let mut list = vec![(0, DEFAULT_RECORDING_GROUP.to_string())];
    if generation == Generation::Legacy {
        return list;
    }
    for name in groups {
        if name != DEFAULT_RECORDING_GROUP && !list.iter().any(|(_, n)| n == name) {
            list.push((list.len() as u32, name.clone()));
        }
    }
    list
}
