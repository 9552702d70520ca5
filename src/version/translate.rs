use chrono::{DateTime, Datelike, Local, NaiveTime, Weekday};
use tracing::{debug, info, warn};

use crate::config::TemplateProvider;
use crate::index::{instance_index, rule_index};
use crate::model::*;

use super::VersionHelper;

/// Read-side switches for rule and instance translation.
#[derive(Debug, Clone, Copy)]
pub struct FillOptions {
    pub now: Timestamp,
    /// Hide non-repeating rules with no activity within this many seconds.
    pub stale_after: i64,
    /// Keep stale rules and superseded instances.
    pub show_inactive: bool,
}

/// Display summary of a rule: whether it repeats, the weekdays it covers
/// (bit 0 is Monday) and a one-letter type marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RuleSummary {
    pub repeating: bool,
    pub week_days: u8,
    pub marker: Option<char>,
}

const EVERY_DAY: u8 = 0x7F;

const TIMESLOT_FILTERS: RuleFilter =
    RuleFilter(RuleFilter::THIS_CHANNEL.0 | RuleFilter::THIS_TIME.0 | RuleFilter::THIS_DAY_AND_TIME.0);

fn local(ts: Timestamp) -> Option<DateTime<Local>> {
    DateTime::from_timestamp(ts, 0).map(|t| t.with_timezone(&Local))
}

fn daytime(ts: Timestamp) -> Option<NaiveTime> {
    local(ts).map(|t| t.time())
}

fn weekday(ts: Timestamp) -> Option<Weekday> {
    local(ts).map(|t| t.weekday())
}

fn unknown_rule() -> RecordingRule {
    RecordingRule { rule_type: RuleType::Unknown, ..Default::default() }
}

impl VersionHelper {
    // ── Rule → timer ─────────────────────────────────────

    /// Timer for a main rule, or `None` when the rule is not presented.
    /// `upcoming` holds the rule's instances in backend order.
    pub fn fill_rule_entry(
        &self,
        rule: &RecordingRule,
        upcoming: &[&ScheduledInstance],
        opts: FillOptions,
    ) -> Option<TimerEntry> {
        if !opts.show_inactive && !rule.rule_type.is_repeating() && self.is_stale(rule, opts) {
            debug!(record_id = rule.record_id, "skipping stale rule");
            return None;
        }
        self.classify(rule, upcoming)
    }

    /// Timer for one upcoming instance of `owner`. `main_index` is the index of
    /// the main rule the instance ultimately belongs to (0 when unknown).
    /// Returns `None` when `owner` itself is not presented.
    pub fn fill_instance_entry(
        &self,
        instance: &ScheduledInstance,
        owner: &RecordingRule,
        main_index: u32,
        upcoming: &[&ScheduledInstance],
        opts: FillOptions,
    ) -> Option<TimerEntry> {
        if !opts.show_inactive && instance.status.is_superseded() {
            return None;
        }
        let mut entry = self.fill_rule_entry(owner, upcoming, opts)?;
        if !matches!(
            entry.timer_type,
            TimerType::Unhandled | TimerType::DontRecord | TimerType::Override
        ) {
            entry.timer_type = TimerType::Record;
        }
        entry.epg_search.clear();
        entry.full_text_search = false;
        entry.any_channel = false;
        entry.description.clear();
        entry.chan_id = instance.chan_id;
        entry.callsign = instance.callsign.clone();
        entry.start_time = instance.start_time;
        entry.end_time = instance.end_time;
        entry.title = instance.title.clone();
        entry.subtitle = instance.subtitle.clone();
        entry.category = instance.category.clone();
        entry.recording_status = instance.status;
        entry.entry_index = instance_index(instance.record_id, &instance.uid);
        entry.parent_index = main_index;
        Some(entry)
    }

    fn is_stale(&self, rule: &RecordingRule, opts: FillOptions) -> bool {
        let last_active = if rule.next_recording > 0 {
            rule.next_recording
        } else if rule.last_recorded > 0 {
            rule.last_recorded
        } else {
            rule.start_time
        };
        last_active + opts.stale_after < opts.now
    }

    fn classify(&self, rule: &RecordingRule, upcoming: &[&ScheduledInstance]) -> Option<TimerEntry> {
        let mut entry = TimerEntry::default();
        let filter = rule.filter;
        let any_channel = !filter.contains(RuleFilter::THIS_CHANNEL);

        entry.timer_type = if !self.caps.translates {
            TimerType::Unhandled
        } else {
            match rule.rule_type {
                RuleType::Single => {
                    let last = upcoming.last()?;
                    entry.recording_status = last.status;
                    if rule.search == SearchKind::Manual {
                        TimerType::ManualSearch
                    } else {
                        TimerType::ThisShowing
                    }
                }
                RuleType::One => {
                    entry.any_channel = any_channel;
                    TimerType::OneShowing
                }
                RuleType::Daily => TimerType::OneShowingDaily,
                RuleType::Weekly => TimerType::OneShowingWeekly,
                RuleType::Channel if self.caps.timeslot_filters => TimerType::Unhandled,
                RuleType::All | RuleType::Channel => {
                    if rule.rule_type == RuleType::All {
                        entry.any_channel = any_channel;
                    }
                    if self.caps.timeslot_filters && filter.contains(RuleFilter::THIS_DAY_AND_TIME) {
                        TimerType::OneShowingWeekly
                    } else if self.caps.timeslot_filters && filter.contains(RuleFilter::THIS_TIME) {
                        TimerType::OneShowingDaily
                    } else {
                        match rule.search {
                            SearchKind::None => TimerType::AllShowings,
                            SearchKind::Title => {
                                entry.epg_search = rule.description.clone();
                                entry.full_text_search = false;
                                TimerType::TextSearch
                            }
                            SearchKind::Keyword => {
                                entry.epg_search = rule.description.clone();
                                entry.full_text_search = true;
                                TimerType::TextSearch
                            }
                            _ => TimerType::Unhandled,
                        }
                    }
                }
                RuleType::Override => TimerType::Override,
                RuleType::DontRecord => TimerType::DontRecord,
                _ => TimerType::Unhandled,
            }
        };

        if matches!(rule.search, SearchKind::People | SearchKind::Power) {
            entry.timer_type = TimerType::Unhandled;
            entry.epg_search = rule.description.clone();
        }

        entry.chan_id = rule.chan_id;
        entry.callsign = rule.callsign.clone();
        entry.title = rule.title.clone();
        entry.subtitle = rule.subtitle.clone();
        entry.category = rule.category.clone();
        if !rule.search.uses_description() {
            entry.description = rule.description.clone();
        }

        entry.start_time = rule.start_time;
        entry.end_time = rule.end_time;
        if rule.rule_type.is_repeating() {
            let anchor = if rule.next_recording > 0 {
                rule.next_recording
            } else if rule.last_recorded > 0 {
                rule.last_recorded
            } else {
                rule.start_time
            };
            entry.start_time = anchor;
            entry.end_time = anchor + rule.duration();
            if let Some(active) = upcoming.iter().rev().find(|p| p.status.is_active()) {
                entry.recording_status = active.status;
                entry.start_time = active.start_time;
                entry.end_time = active.end_time;
            }
        }

        entry.start_offset = rule.start_offset;
        entry.end_offset = rule.end_offset;
        entry.dup_method = rule.dup_method;
        entry.priority = rule.priority;
        entry.auto_expire = rule.auto_expire;
        entry.is_inactive = rule.inactive;
        entry.first_showing = filter.contains(RuleFilter::FIRST_SHOWING);
        entry.recording_group = self.recording_group_id(&rule.recording_group);
        entry.entry_index = rule_index(rule.record_id);
        entry.parent_index = 0;
        Some(entry)
    }

    // ── Timer → rule ─────────────────────────────────────

    /// Inverse of the rule translation. A rule of type `Unknown` signals that
    /// the timer does not describe any rule this generation can build.
    pub fn new_from_timer(&self, entry: &TimerEntry, with_template: bool) -> RecordingRule {
        if !self.caps.translates {
            warn!(protocol = self.protocol, "rule creation is not supported by this backend");
            return unknown_rule();
        }

        let mut rule = if with_template {
            let mut rule = self.new_from_template(entry.epg.as_ref());
            rule.start_offset += entry.start_offset;
            rule.end_offset += entry.end_offset;
            if entry.dup_method != self.dup_method_default() {
                rule.dup_method = entry.dup_method;
            }
            if entry.priority != self.priority_default() {
                rule.priority = entry.priority;
            }
            if entry.auto_expire != self.expiration_default() {
                rule.auto_expire = entry.auto_expire;
            }
            if entry.recording_group != self.recording_group_default() {
                rule.recording_group = self.recording_group_name(entry.recording_group).to_string();
            }
            rule
        } else {
            RecordingRule {
                start_offset: entry.start_offset,
                end_offset: entry.end_offset,
                dup_method: entry.dup_method,
                priority: entry.priority,
                auto_expire: entry.auto_expire,
                recording_group: self.recording_group_name(entry.recording_group).to_string(),
                ..Default::default()
            }
        };

        if self.shape(entry, &mut rule).is_none() {
            warn!(timer_type = ?entry.timer_type, "invalid timer");
            return unknown_rule();
        }
        rule.inactive = entry.is_inactive;
        rule
    }

    fn shape(&self, entry: &TimerEntry, rule: &mut RecordingRule) -> Option<()> {
        rule.filter.remove(TIMESLOT_FILTERS);
        let epg = entry.epg.as_ref();

        match entry.timer_type {
            TimerType::ManualSearch => {
                if !(entry.has_channel() && entry.has_timeslot()) {
                    return None;
                }
                rule.rule_type = RuleType::Single;
                rule.search = SearchKind::Manual;
                copy_entry(rule, entry);
            }
            TimerType::ThisShowing => {
                rule.rule_type = RuleType::Single;
                rule.search = SearchKind::None;
                if let Some(epg) = epg {
                    copy_epg(rule, epg);
                } else if !entry.any_channel && entry.has_channel() && entry.has_timeslot() {
                    copy_entry(rule, entry);
                } else {
                    return None;
                }
            }
            TimerType::OneShowing => {
                rule.rule_type = RuleType::One;
                rule.search = SearchKind::None;
                if !entry.any_channel {
                    rule.filter.insert(RuleFilter::THIS_CHANNEL);
                }
                if let Some(epg) = epg {
                    copy_epg(rule, epg);
                } else if entry.any_channel || entry.has_channel() {
                    copy_entry(rule, entry);
                } else {
                    return None;
                }
            }
            TimerType::OneShowingWeekly | TimerType::OneShowingDaily => {
                let weekly = entry.timer_type == TimerType::OneShowingWeekly;
                if let Some(epg) = epg {
                    if self.caps.timeslot_filters {
                        rule.rule_type = RuleType::All;
                        rule.filter.insert(RuleFilter::THIS_CHANNEL);
                        rule.filter.insert(if weekly {
                            RuleFilter::THIS_DAY_AND_TIME
                        } else {
                            RuleFilter::THIS_TIME
                        });
                    } else {
                        rule.rule_type = if weekly { RuleType::Weekly } else { RuleType::Daily };
                    }
                    rule.search = SearchKind::None;
                    copy_epg(rule, epg);
                } else if !entry.any_channel && entry.has_channel() && entry.has_timeslot() {
                    rule.rule_type = if weekly { RuleType::Weekly } else { RuleType::Daily };
                    rule.search = if self.caps.timeslot_filters { SearchKind::Manual } else { SearchKind::None };
                    copy_entry(rule, entry);
                } else {
                    return None;
                }
            }
            TimerType::AllShowings => {
                rule.rule_type = if self.caps.timeslot_filters || entry.any_channel {
                    RuleType::All
                } else {
                    RuleType::Channel
                };
                rule.search = SearchKind::None;
                if !entry.any_channel {
                    rule.filter.insert(RuleFilter::THIS_CHANNEL);
                }
                if let Some(epg) = epg {
                    copy_epg(rule, epg);
                } else if entry.any_channel || entry.has_channel() {
                    copy_entry(rule, entry);
                } else {
                    return None;
                }
            }
            TimerType::TextSearch => {
                if entry.epg_search.trim().is_empty() {
                    return None;
                }
                rule.rule_type = RuleType::All;
                rule.search = if entry.full_text_search { SearchKind::Keyword } else { SearchKind::Title };
                if !entry.any_channel {
                    rule.chan_id = entry.chan_id;
                    rule.callsign = entry.callsign.clone();
                    rule.filter.insert(RuleFilter::THIS_CHANNEL);
                }
                rule.title = entry.title.clone();
                rule.subtitle.clear();
                rule.description = entry.epg_search.clone();
                if let Some(epg) = epg {
                    rule.start_time = epg.start_time;
                    rule.end_time = epg.end_time;
                    rule.category = epg.category.clone();
                } else if !self.caps.search_timeslot_optional {
                    rule.start_time = entry.start_time;
                    rule.end_time = entry.end_time;
                }
            }
            TimerType::Record | TimerType::Override | TimerType::DontRecord => {
                rule.rule_type = RuleType::NotRecording;
                copy_entry(rule, entry);
            }
            TimerType::Unhandled => return None,
        }

        if !entry.timer_type.is_backend_row() {
            if entry.first_showing {
                rule.filter.insert(RuleFilter::FIRST_SHOWING);
            } else {
                rule.filter.remove(RuleFilter::FIRST_SHOWING);
            }
        }
        Some(())
    }

    /// Seed a new rule with default settings, from a backend template matching
    /// the program category or from process-wide defaults.
    pub fn new_from_template(&self, epg: Option<&EpgInfo>) -> RecordingRule {
        let mut rule = RecordingRule::default();
        if !self.caps.translates {
            return rule;
        }

        match self.template.provider {
            TemplateProvider::Backend => {
                if let Some(epg) = epg {
                    match self.match_template(epg) {
                        Some(t) => {
                            debug!(template = %t.title, category = %epg.category, "using backend template");
                            rule.priority = t.priority;
                            rule.start_offset = t.start_offset;
                            rule.end_offset = t.end_offset;
                            rule.search = t.search;
                            rule.dup_method = t.dup_method;
                            rule.dup_in = t.dup_in;
                            rule.recording_group = t.recording_group.clone();
                            rule.recording_profile = t.recording_profile.clone();
                            rule.storage_group = t.storage_group.clone();
                            rule.playback_group = t.playback_group.clone();
                            rule.user_jobs = t.user_jobs;
                            rule.auto_transcode = t.auto_transcode;
                            rule.auto_commflag = t.auto_commflag;
                            rule.auto_expire = t.auto_expire;
                            rule.auto_metadata = t.auto_metadata;
                            rule.max_episodes = t.max_episodes;
                            rule.new_expires_old = t.new_expires_old;
                            rule.filter = t.filter;
                            rule.transcoder = t.transcoder;
                        }
                        None => info!(category = %epg.category, "no template matches category"),
                    }
                }
            }
            TemplateProvider::Internal => {
                rule.auto_commflag = self.template.auto_commflag;
                rule.auto_metadata = self.template.auto_metadata;
                rule.auto_transcode = self.template.auto_transcode;
                rule.user_jobs = self.template.user_jobs;
                rule.transcoder = self.template.transcoder;
                rule.auto_expire = self.expiration_default();
                rule.dup_method = self.dup_method_default();
                rule.dup_in = DupScope::InAll;
                rule.priority = self.priority_default();
                rule.recording_group = self.recording_group_name(self.recording_group_default()).to_string();
            }
        }

        if let (Some(epg), Some(ot)) = (epg, &self.category_overtime)
            && !ot.category.is_empty()
            && (ot.category == epg.category || ot.category == epg.category_type)
        {
            rule.end_offset = ot.minutes;
        }
        rule
    }

    /// Exact category first, then category type, then the `Default` template.
    fn match_template(&self, epg: &EpgInfo) -> Option<&RecordingRule> {
        let mut found = None;
        for t in &self.templates {
            if t.category == epg.category {
                return Some(t);
            }
            if !epg.category_type.is_empty() && t.category == epg.category_type {
                found = Some(t);
            } else if t.category == "Default" && found.is_none() {
                found = Some(t);
            }
        }
        found
    }

    // ── EPG-seeded rules ─────────────────────────────────

    pub fn new_single_record(&self, epg: Option<&EpgInfo>) -> RecordingRule {
        let Some(mut rule) = self.seeded(epg, RuleType::Single, DupMethod::None) else {
            return unknown_rule();
        };
        match epg {
            Some(epg) => {
                rule.search = SearchKind::None;
                copy_epg(&mut rule, epg);
            }
            None => rule.search = SearchKind::Manual,
        }
        rule
    }

    pub fn new_daily_record(&self, epg: Option<&EpgInfo>) -> RecordingRule {
        self.new_timeslot_record(epg, false)
    }

    pub fn new_weekly_record(&self, epg: Option<&EpgInfo>) -> RecordingRule {
        self.new_timeslot_record(epg, true)
    }

    /// Every showing on the program's channel. Needs EPG data.
    pub fn new_channel_record(&self, epg: Option<&EpgInfo>) -> RecordingRule {
        let rule_type = if self.caps.timeslot_filters { RuleType::All } else { RuleType::Channel };
        let Some(mut rule) = self.seeded(epg, rule_type, DupMethod::SubtitleAndDescription) else {
            return unknown_rule();
        };
        if self.caps.timeslot_filters {
            rule.filter = RuleFilter::THIS_CHANNEL;
        }
        self.seed_program(&mut rule, epg);
        rule
    }

    /// One showing of the program on any channel. Needs EPG data.
    pub fn new_one_record(&self, epg: Option<&EpgInfo>) -> RecordingRule {
        let Some(mut rule) = self.seeded(epg, RuleType::One, DupMethod::SubtitleAndDescription) else {
            return unknown_rule();
        };
        if self.caps.timeslot_filters {
            rule.filter = RuleFilter::THIS_EPISODE;
        }
        self.seed_program(&mut rule, epg);
        rule
    }

    /// With EPG data a timeslot filter on an `All` rule from V76, the
    /// dedicated rule type before. Without it, a manual rule on the channel.
    fn new_timeslot_record(&self, epg: Option<&EpgInfo>, weekly: bool) -> RecordingRule {
        let (rule_type, slot) = if weekly {
            (RuleType::Weekly, RuleFilter::THIS_DAY_AND_TIME)
        } else {
            (RuleType::Daily, RuleFilter::THIS_TIME)
        };
        let Some(mut rule) = self.seeded(epg, rule_type, DupMethod::SubtitleAndDescription) else {
            return unknown_rule();
        };
        match epg {
            Some(epg) => {
                if self.caps.timeslot_filters {
                    rule.rule_type = RuleType::All;
                    rule.filter = RuleFilter::THIS_CHANNEL | slot;
                }
                rule.search = SearchKind::None;
                copy_epg(&mut rule, epg);
            }
            None => {
                if self.caps.timeslot_filters {
                    rule.filter = RuleFilter::THIS_CHANNEL;
                }
                rule.search = SearchKind::Manual;
            }
        }
        rule
    }

    fn seeded(&self, epg: Option<&EpgInfo>, rule_type: RuleType, dup_method: DupMethod) -> Option<RecordingRule> {
        if !self.caps.translates {
            warn!(protocol = self.protocol, "rule creation is not supported by this backend");
            return None;
        }
        let mut rule = self.new_from_template(epg);
        rule.rule_type = rule_type;
        rule.dup_method = dup_method;
        rule.dup_in = DupScope::InAll;
        rule.inactive = false;
        Some(rule)
    }

    /// Title search before V76, a plain program copy after.
    fn seed_program(&self, rule: &mut RecordingRule, epg: Option<&EpgInfo>) {
        let Some(epg) = epg else {
            rule.rule_type = RuleType::NotRecording;
            return;
        };
        copy_epg(rule, epg);
        if self.caps.timeslot_filters {
            rule.search = SearchKind::None;
        } else {
            rule.search = SearchKind::Title;
            rule.description = epg.title.clone();
        }
    }

    pub fn summary_info(&self, rule: &RecordingRule) -> RuleSummary {
        if !self.caps.translates {
            return RuleSummary::default();
        }
        let that_day = weekday(rule.start_time).map_or(0, |d| 1u8 << d.num_days_from_monday());
        let slot = |f: RuleFilter| self.caps.timeslot_filters && rule.filter.contains(f);
        let (repeating, week_days, marker) = match rule.rule_type {
            RuleType::Daily | RuleType::FindDaily => (true, EVERY_DAY, 'd'),
            RuleType::Weekly | RuleType::FindWeekly => (true, that_day, 'w'),
            RuleType::Channel => (true, EVERY_DAY, 'C'),
            RuleType::All if slot(RuleFilter::THIS_DAY_AND_TIME) => (true, that_day, 'w'),
            RuleType::All if slot(RuleFilter::THIS_TIME) => (true, EVERY_DAY, 'd'),
            RuleType::All => (true, EVERY_DAY, 'A'),
            RuleType::One => (false, 0, '1'),
            RuleType::DontRecord => (false, 0, 'x'),
            RuleType::Override => (false, 0, 'o'),
            _ => return RuleSummary::default(),
        };
        RuleSummary { repeating, week_days, marker: Some(marker) }
    }

    // ── Linking & validation ─────────────────────────────

    /// Whether `other` plausibly schedules the same occurrences as `rule`.
    /// Compared fields depend on `rule`'s type.
    pub fn same_timeslot(&self, rule: &RecordingRule, other: &RecordingRule) -> bool {
        if !self.caps.translates {
            return false;
        }
        let channel = rule.chan_id == other.chan_id;
        let filter = rule.filter == other.filter;
        let title = rule.title == other.title;
        let same_daytime = || daytime(rule.start_time) == daytime(other.start_time);
        let same_weekday = || weekday(rule.start_time) == weekday(other.start_time);

        match rule.rule_type {
            RuleType::NotRecording | RuleType::Single | RuleType::Override | RuleType::DontRecord => {
                rule.start_time == other.start_time && rule.end_time == other.end_time && channel && filter
            }
            RuleType::One | RuleType::FindDaily | RuleType::Channel => title && channel && filter,
            RuleType::Daily => title && same_daytime() && channel && filter,
            RuleType::Weekly => title && same_daytime() && same_weekday() && channel && filter,
            RuleType::FindWeekly => title && same_weekday() && channel && filter,
            RuleType::All => title && filter,
            RuleType::Template | RuleType::Unknown => false,
        }
    }

    /// Normalize a rule before it is sent to the backend. Returns false when
    /// the rule is submitted anyway but is known to be degraded.
    pub fn fix_rule(&self, rule: &mut RecordingRule) -> bool {
        let mut valid = true;
        let untimed_search = self.caps.search_timeslot_optional
            && !matches!(rule.search, SearchKind::None | SearchKind::Manual)
            && rule.start_time == 0
            && rule.end_time == 0;
        if !untimed_search && rule.start_time >= rule.end_time {
            debug!(record_id = rule.record_id, "repairing end time");
            rule.end_time = rule.start_time + 2;
        }
        if rule.search.uses_description() && rule.description.trim().is_empty() {
            warn!(record_id = rule.record_id, search = ?rule.search, "search rule has no search text");
            valid = false;
        }
        if rule.chan_id == 0 || rule.callsign.is_empty() {
            rule.chan_id = self.dummy_channel.chan_id;
            rule.callsign = self.dummy_channel.callsign.clone();
        }
        valid
    }

    // ── Modifiers ────────────────────────────────────────

    pub fn make_override(&self, rule: &RecordingRule, instance: &ScheduledInstance) -> RecordingRule {
        make_modifier(rule, instance, RuleType::Override)
    }

    pub fn make_dont_record(&self, rule: &RecordingRule, instance: &ScheduledInstance) -> RecordingRule {
        make_modifier(rule, instance, RuleType::DontRecord)
    }
}

fn make_modifier(rule: &RecordingRule, instance: &ScheduledInstance, rule_type: RuleType) -> RecordingRule {
    let mut modifier = rule.clone();
    if modifier.search != SearchKind::Manual {
        modifier.search = SearchKind::None;
    }
    modifier.rule_type = rule_type;
    modifier.parent_id = rule.record_id;
    modifier.record_id = 0;
    modifier.inactive = false;
    modifier.title = instance.title.clone();
    modifier.subtitle = instance.subtitle.clone();
    modifier.description = instance.description.clone();
    modifier.category = instance.category.clone();
    modifier.chan_id = instance.chan_id;
    modifier.callsign = instance.callsign.clone();
    modifier.start_time = instance.start_time;
    modifier.end_time = instance.end_time;
    modifier.series_id = instance.series_id.clone();
    modifier.program_id = instance.program_id.clone();
    if rule.inetref.is_empty() {
        modifier.inetref = instance.inetref.clone();
        modifier.season = instance.season;
        modifier.episode = instance.episode;
    }
    modifier.last_recorded = 0;
    modifier.next_recording = 0;
    modifier
}

fn copy_epg(rule: &mut RecordingRule, epg: &EpgInfo) {
    rule.chan_id = epg.chan_id;
    rule.callsign = epg.callsign.clone();
    rule.start_time = epg.start_time;
    rule.end_time = epg.end_time;
    rule.title = epg.title.clone();
    rule.subtitle = epg.subtitle.clone();
    rule.description = epg.description.clone();
    rule.category = epg.category.clone();
    rule.program_id = epg.program_id.clone();
    rule.series_id = epg.series_id.clone();
}

fn copy_entry(rule: &mut RecordingRule, entry: &TimerEntry) {
    rule.chan_id = entry.chan_id;
    rule.callsign = entry.callsign.clone();
    rule.start_time = entry.start_time;
    rule.end_time = entry.end_time;
    rule.title = entry.title.clone();
    rule.subtitle = entry.subtitle.clone();
    rule.description = entry.description.clone();
    rule.category = entry.category.clone();
}
