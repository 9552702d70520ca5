//! Backend-protocol dependent translation between rules and host timers.
//!
//! One [`VersionHelper`] serves every protocol generation; behavior differences
//! are carried by [`Capabilities`]. A helper holds no state beyond what it was
//! built with, so each refresh builds a new one.

mod descriptors;
mod translate;
#[cfg(test)]
mod tests;

pub use descriptors::{DEFAULT_RECORDING_GROUP, TimerAttributes, TimerTypeDescriptor};
pub use translate::{FillOptions, RuleSummary};

use crate::config::{DummyChannel, TemplateConfig};
use crate::model::*;

/// Protocol generations with distinct rule semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Generation {
    /// Before protocol 75: rules pass through unhandled.
    Legacy,
    /// Protocol 75.
    V75,
    /// Protocols 76 through 90.
    V76,
    /// Protocol 91 and later.
    V91,
}

impl Generation {
    pub fn from_protocol(protocol: u32) -> Generation {
        match protocol {
            91.. => Generation::V91,
            76..=90 => Generation::V76,
            75 => Generation::V75,
            _ => Generation::Legacy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Rules can be classified and built at all.
    pub translates: bool,
    /// EPG-based daily/weekly timers are record-all rules with the
    /// this-time / this-day-and-time filters.
    pub timeslot_filters: bool,
    /// Searches other than none/manual may leave start and end empty.
    pub search_timeslot_optional: bool,
    pub dup_method_default: DupMethod,
    pub expiration_default: bool,
}

impl Capabilities {
    pub fn for_generation(generation: Generation) -> Capabilities {
        match generation {
            Generation::Legacy => Capabilities {
                translates: false,
                timeslot_filters: false,
                search_timeslot_optional: false,
                dup_method_default: DupMethod::None,
                expiration_default: false,
            },
            Generation::V75 => Capabilities {
                translates: true,
                timeslot_filters: false,
                search_timeslot_optional: false,
                dup_method_default: DupMethod::SubtitleAndDescription,
                expiration_default: true,
            },
            Generation::V76 => Capabilities {
                translates: true,
                timeslot_filters: true,
                search_timeslot_optional: false,
                dup_method_default: DupMethod::SubtitleAndDescription,
                expiration_default: true,
            },
            Generation::V91 => Capabilities {
                translates: true,
                timeslot_filters: true,
                search_timeslot_optional: true,
                dup_method_default: DupMethod::SubtitleAndDescription,
                expiration_default: true,
            },
        }
    }
}

/// Category whose rules get a fixed end offset (minutes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOverTime {
    pub category: String,
    pub minutes: i32,
}

/// Everything a helper is built from besides the protocol version.
#[derive(Debug, Clone, Default)]
pub struct HelperContext {
    pub template: TemplateConfig,
    pub dummy_channel: DummyChannel,
    pub recording_groups: Vec<String>,
    pub templates: Vec<RecordingRule>,
    pub category_overtime: Option<CategoryOverTime>,
}

#[derive(Debug, Clone)]
pub struct VersionHelper {
    protocol: u32,
    generation: Generation,
    caps: Capabilities,
    template: TemplateConfig,
    dummy_channel: DummyChannel,
    templates: Vec<RecordingRule>,
    category_overtime: Option<CategoryOverTime>,
    timer_types: Vec<TimerTypeDescriptor>,
    priorities: Vec<(i32, String)>,
    dup_methods: Vec<(DupMethod, String)>,
    expirations: Vec<(bool, String)>,
    recording_groups: Vec<(u32, String)>,
}

impl VersionHelper {
    pub fn new(protocol: u32, ctx: HelperContext) -> Self {
        let generation = Generation::from_protocol(protocol);
        Self {
            protocol,
            generation,
            caps: Capabilities::for_generation(generation),
            template: ctx.template,
            dummy_channel: ctx.dummy_channel,
            templates: ctx.templates,
            category_overtime: ctx.category_overtime,
            timer_types: descriptors::timer_types(generation),
            priorities: descriptors::priority_list(generation),
            dup_methods: descriptors::dup_method_list(generation),
            expirations: descriptors::expiration_list(generation),
            recording_groups: descriptors::recording_group_list(generation, &ctx.recording_groups),
        }
    }

    pub fn protocol(&self) -> u32 {
        self.protocol
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    pub fn templates(&self) -> &[RecordingRule] {
        &self.templates
    }

    // ── Descriptor tables ────────────────────────────────

    pub fn timer_types(&self) -> &[TimerTypeDescriptor] {
        &self.timer_types
    }

    pub fn priority_list(&self) -> &[(i32, String)] {
        &self.priorities
    }

    pub fn priority_default(&self) -> i32 {
        0
    }

    pub fn dup_method_list(&self) -> &[(DupMethod, String)] {
        &self.dup_methods
    }

    pub fn dup_method_default(&self) -> DupMethod {
        self.caps.dup_method_default
    }

    pub fn expiration_list(&self) -> &[(bool, String)] {
        &self.expirations
    }

    pub fn expiration_default(&self) -> bool {
        self.caps.expiration_default
    }

    pub fn recording_group_list(&self) -> &[(u32, String)] {
        &self.recording_groups
    }

    pub fn recording_group_default(&self) -> u32 {
        0
    }

    /// Unknown names map to the default group.
    pub fn recording_group_id(&self, name: &str) -> u32 {
        self.recording_groups
            .iter()
            .find(|(_, n)| n == name)
            .map_or(0, |(id, _)| *id)
    }

    pub fn recording_group_name(&self, id: u32) -> &str {
        self.recording_groups
            .iter()
            .find(|(i, _)| *i == id)
            .map_or(DEFAULT_RECORDING_GROUP, |(_, n)| n.as_str())
    }
}
