use super::*;
use crate::config::{TemplateConfig, TemplateProvider};
use crate::index::{instance_index, is_instance_index};

const NOW: Timestamp = 1_718_000_000;
const HOUR: Timestamp = 3600;
const DAY: Timestamp = 86_400;

fn helper(protocol: u32) -> VersionHelper {
    VersionHelper::new(
        protocol,
        HelperContext {
            recording_groups: vec!["Default".into(), "Movies".into(), "Kids".into()],
            ..Default::default()
        },
    )
}

fn opts() -> FillOptions {
    FillOptions { now: NOW, stale_after: DAY, show_inactive: false }
}

fn epg() -> EpgInfo {
    EpgInfo {
        chan_id: 1051,
        callsign: "BBC1".into(),
        start_time: NOW + HOUR,
        end_time: NOW + 2 * HOUR,
        title: "Doctor Who".into(),
        subtitle: "Blink".into(),
        description: "Angels".into(),
        category: "Drama".into(),
        category_type: "series".into(),
        program_id: "EP0001".into(),
        series_id: "SH0001".into(),
    }
}

fn entry(timer_type: TimerType) -> TimerEntry {
    let g = epg();
    TimerEntry {
        timer_type,
        chan_id: g.chan_id,
        callsign: g.callsign.clone(),
        start_time: g.start_time,
        end_time: g.end_time,
        title: g.title.clone(),
        ..Default::default()
    }
}

fn epg_entry(timer_type: TimerType) -> TimerEntry {
    TimerEntry { epg: Some(epg()), ..entry(timer_type) }
}

fn instance(record_id: u32, uid: &str, status: RecordingStatus) -> ScheduledInstance {
    let g = epg();
    ScheduledInstance {
        uid: uid.into(),
        record_id,
        chan_id: g.chan_id,
        callsign: g.callsign,
        start_time: g.start_time,
        end_time: g.end_time,
        title: g.title,
        subtitle: g.subtitle,
        status,
        ..Default::default()
    }
}

/// Build a rule from a timer, then classify it back.
fn round_trip(h: &VersionHelper, e: &TimerEntry) -> TimerEntry {
    let mut rule = h.new_from_timer(e, true);
    assert_ne!(rule.rule_type, RuleType::Unknown, "{:?} did not translate", e.timer_type);
    rule.record_id = 5;
    let p = instance(5, "1051_a", RecordingStatus::WillRecord);
    h.fill_rule_entry(&rule, &[&p], opts()).expect("rule should be presented")
}

fn assert_same_slot(back: &TimerEntry, e: &TimerEntry) {
    assert_eq!(back.timer_type, e.timer_type);
    assert_eq!(back.chan_id, e.chan_id);
    assert_eq!(back.callsign, e.callsign);
    assert_eq!(back.start_time, e.start_time);
    assert_eq!(back.end_time, e.end_time);
    assert_eq!(back.title, e.title);
}

// ── Generations & tables ─────────────────────────────────

#[test]
fn generation_from_protocol() {
    assert_eq!(Generation::from_protocol(0), Generation::Legacy);
    assert_eq!(Generation::from_protocol(74), Generation::Legacy);
    assert_eq!(Generation::from_protocol(75), Generation::V75);
    assert_eq!(Generation::from_protocol(76), Generation::V76);
    assert_eq!(Generation::from_protocol(88), Generation::V76);
    assert_eq!(Generation::from_protocol(91), Generation::V91);
    assert_eq!(Generation::from_protocol(1000), Generation::V91);
}

#[test]
fn priority_table() {
    let h = helper(91);
    let list = h.priority_list();
    assert_eq!(list.len(), 199);
    assert_eq!(list[0], (-99, "-99".to_string()));
    assert_eq!(list[99], (0, "0".to_string()));
    assert_eq!(list[104], (5, "+5".to_string()));
    assert_eq!(h.priority_default(), 0);
}

#[test]
fn legacy_tables_are_minimal() {
    let h = helper(70);
    assert!(h.timer_types().is_empty());
    assert_eq!(h.priority_list().len(), 1);
    assert_eq!(h.dup_method_list().len(), 1);
    assert_eq!(h.expiration_list().len(), 1);
    assert_eq!(h.recording_group_list(), &[(0, "Default".to_string())]);
    assert_eq!(h.dup_method_default(), DupMethod::None);
    assert!(!h.expiration_default());
}

#[test]
fn modern_defaults() {
    let h = helper(75);
    assert_eq!(h.timer_types().len(), 11);
    assert_eq!(h.dup_method_list().len(), 5);
    assert_eq!(h.dup_method_default(), DupMethod::SubtitleAndDescription);
    assert!(h.expiration_default());
    assert_eq!(h.expiration_list().len(), 2);
}

#[test]
fn recording_groups_default_first() {
    let h = VersionHelper::new(
        91,
        HelperContext { recording_groups: vec!["Movies".into(), "Default".into(), "Kids".into()], ..Default::default() },
    );
    assert_eq!(
        h.recording_group_list(),
        &[(0, "Default".to_string()), (1, "Movies".to_string()), (2, "Kids".to_string())]
    );
    assert_eq!(h.recording_group_id("Kids"), 2);
    assert_eq!(h.recording_group_id("Nope"), 0);
    assert_eq!(h.recording_group_name(1), "Movies");
    assert_eq!(h.recording_group_name(42), "Default");
}

#[test]
fn timer_type_attributes() {
    let h = helper(76);
    let text = h.timer_types().iter().find(|t| t.id == TimerType::TextSearch).unwrap();
    assert!(text.attributes.contains(TimerAttributes::SUPPORTS_FULLTEXT_EPG_MATCH));
    assert!(text.attributes.contains(TimerAttributes::IS_REPEATING));
    let manual = h.timer_types().iter().find(|t| t.id == TimerType::ManualSearch).unwrap();
    assert!(manual.attributes.contains(TimerAttributes::IS_MANUAL));
    assert!(!manual.attributes.contains(TimerAttributes::IS_REPEATING));
}

// ── Round trips ──────────────────────────────────────────

#[test]
fn round_trip_every_creatable_type() {
    for protocol in [75, 76, 91] {
        let h = helper(protocol);
        for e in [
            entry(TimerType::ManualSearch),
            epg_entry(TimerType::ThisShowing),
            entry(TimerType::ThisShowing),
            epg_entry(TimerType::OneShowing),
            epg_entry(TimerType::OneShowingWeekly),
            entry(TimerType::OneShowingWeekly),
            epg_entry(TimerType::OneShowingDaily),
            entry(TimerType::OneShowingDaily),
            epg_entry(TimerType::AllShowings),
        ] {
            let back = round_trip(&h, &e);
            assert_same_slot(&back, &e);
            assert!(!back.any_channel, "protocol {protocol} {:?}", e.timer_type);
        }
    }
}

#[test]
fn round_trip_any_channel() {
    for protocol in [75, 76] {
        let h = helper(protocol);
        for t in [TimerType::OneShowing, TimerType::AllShowings] {
            let e = TimerEntry { any_channel: true, ..epg_entry(t) };
            let rule = h.new_from_timer(&e, true);
            assert!(!rule.filter.contains(RuleFilter::THIS_CHANNEL));
            let back = round_trip(&h, &e);
            assert_eq!(back.timer_type, t);
            assert!(back.any_channel);
            assert_eq!(back.title, e.title);
        }
    }
}

#[test]
fn round_trip_text_search() {
    for full_text in [false, true] {
        let h = helper(76);
        let e = TimerEntry {
            epg_search: "angels".into(),
            full_text_search: full_text,
            ..entry(TimerType::TextSearch)
        };
        let rule = h.new_from_timer(&e, false);
        assert_eq!(rule.rule_type, RuleType::All);
        assert_eq!(rule.description, "angels");
        assert!(rule.subtitle.is_empty());
        let back = round_trip(&h, &e);
        assert_same_slot(&back, &e);
        assert_eq!(back.epg_search, "angels");
        assert_eq!(back.full_text_search, full_text);
        assert!(back.description.is_empty());
    }
}

#[test]
fn round_trip_keeps_settings() {
    let h = helper(91);
    let e = TimerEntry {
        priority: 7,
        start_offset: 2,
        end_offset: 10,
        dup_method: DupMethod::Subtitle,
        auto_expire: false,
        recording_group: 1,
        first_showing: true,
        is_inactive: true,
        ..epg_entry(TimerType::AllShowings)
    };
    let back = round_trip(&h, &e);
    assert_eq!(back.priority, 7);
    assert_eq!(back.start_offset, 2);
    assert_eq!(back.end_offset, 10);
    assert_eq!(back.dup_method, DupMethod::Subtitle);
    assert!(!back.auto_expire);
    assert_eq!(back.recording_group, 1);
    assert!(back.first_showing);
    assert!(back.is_inactive);
}

#[test]
fn epg_weekly_uses_filters_from_v76() {
    let e = epg_entry(TimerType::OneShowingWeekly);

    let rule = helper(76).new_from_timer(&e, true);
    assert_eq!(rule.rule_type, RuleType::All);
    assert!(rule.filter.contains(RuleFilter::THIS_CHANNEL | RuleFilter::THIS_DAY_AND_TIME));

    let rule = helper(75).new_from_timer(&e, true);
    assert_eq!(rule.rule_type, RuleType::Weekly);
    assert!(!rule.filter.contains(RuleFilter::THIS_DAY_AND_TIME));

    let daily = helper(91).new_from_timer(&epg_entry(TimerType::OneShowingDaily), true);
    assert_eq!(daily.rule_type, RuleType::All);
    assert!(daily.filter.contains(RuleFilter::THIS_TIME));
}

#[test]
fn manual_weekly_is_timeslot_rule() {
    let rule = helper(76).new_from_timer(&entry(TimerType::OneShowingWeekly), false);
    assert_eq!(rule.rule_type, RuleType::Weekly);
    assert_eq!(rule.search, SearchKind::Manual);
}

#[test]
fn this_channel_all_showings_is_channel_rule_on_v75() {
    let rule = helper(75).new_from_timer(&epg_entry(TimerType::AllShowings), true);
    assert_eq!(rule.rule_type, RuleType::Channel);
    let rule = helper(76).new_from_timer(&epg_entry(TimerType::AllShowings), true);
    assert_eq!(rule.rule_type, RuleType::All);
}

#[test]
fn v91_search_without_epg_has_no_timeslot() {
    let e = TimerEntry { epg_search: "news".into(), ..entry(TimerType::TextSearch) };
    let rule = helper(91).new_from_timer(&e, true);
    assert_eq!((rule.start_time, rule.end_time), (0, 0));
    let rule = helper(76).new_from_timer(&e, true);
    assert_eq!((rule.start_time, rule.end_time), (e.start_time, e.end_time));
}

#[test]
fn invalid_timers_translate_to_unknown() {
    let h = helper(91);
    let no_channel = TimerEntry { chan_id: 0, callsign: String::new(), ..entry(TimerType::ManualSearch) };
    let no_search = entry(TimerType::TextSearch);
    let any_channel_showing = TimerEntry { any_channel: true, ..entry(TimerType::ThisShowing) };
    for e in [no_channel, no_search, any_channel_showing, entry(TimerType::Unhandled)] {
        assert_eq!(h.new_from_timer(&e, true).rule_type, RuleType::Unknown, "{:?}", e.timer_type);
    }
    assert_eq!(helper(60).new_from_timer(&epg_entry(TimerType::ThisShowing), true).rule_type, RuleType::Unknown);
}

#[test]
fn backend_rows_build_not_recording_rules() {
    let h = helper(91);
    for t in [TimerType::Record, TimerType::Override, TimerType::DontRecord] {
        let e = TimerEntry { priority: 3, is_inactive: true, ..entry(t) };
        let rule = h.new_from_timer(&e, false);
        assert_eq!(rule.rule_type, RuleType::NotRecording);
        assert_eq!(rule.priority, 3);
        assert!(rule.inactive);
        assert_eq!(rule.start_time, e.start_time);
    }
}

// ── Rule classification ──────────────────────────────────

#[test]
fn single_without_upcoming_is_dropped() {
    let h = helper(91);
    let rule = RecordingRule {
        record_id: 3,
        rule_type: RuleType::Single,
        start_time: NOW + HOUR,
        end_time: NOW + 2 * HOUR,
        ..Default::default()
    };
    assert!(h.fill_rule_entry(&rule, &[], opts()).is_none());

    let p = instance(3, "u", RecordingStatus::Conflict);
    let e = h.fill_rule_entry(&rule, &[&p], opts()).unwrap();
    assert_eq!(e.timer_type, TimerType::ThisShowing);
    assert_eq!(e.recording_status, RecordingStatus::Conflict);
    assert_eq!(e.entry_index, 3);
    assert_eq!(e.parent_index, 0);
}

#[test]
fn stale_single_hidden_unless_show_inactive() {
    let h = helper(91);
    let rule = RecordingRule {
        record_id: 3,
        rule_type: RuleType::Single,
        start_time: NOW - 3 * DAY,
        end_time: NOW - 3 * DAY + HOUR,
        last_recorded: NOW - 2 * DAY,
        ..Default::default()
    };
    let p = instance(3, "u", RecordingStatus::Recorded);
    assert!(h.fill_rule_entry(&rule, &[&p], opts()).is_none());

    let shown = FillOptions { show_inactive: true, ..opts() };
    assert!(h.fill_rule_entry(&rule, &[&p], shown).is_some());

    let recent = RecordingRule { last_recorded: NOW - HOUR, ..rule.clone() };
    assert!(h.fill_rule_entry(&recent, &[&p], opts()).is_some());

    let repeating = RecordingRule { rule_type: RuleType::All, ..rule };
    assert!(h.fill_rule_entry(&repeating, &[], opts()).is_some());
}

#[test]
fn people_search_is_unhandled() {
    let h = helper(91);
    let rule = RecordingRule {
        record_id: 4,
        rule_type: RuleType::All,
        search: SearchKind::People,
        description: "Tom Baker".into(),
        ..Default::default()
    };
    let e = h.fill_rule_entry(&rule, &[], opts()).unwrap();
    assert_eq!(e.timer_type, TimerType::Unhandled);
    assert_eq!(e.epg_search, "Tom Baker");
}

#[test]
fn find_rules_are_unhandled() {
    let h = helper(76);
    for rule_type in [RuleType::FindDaily, RuleType::FindWeekly, RuleType::NotRecording] {
        let rule = RecordingRule { record_id: 4, rule_type, start_time: NOW, end_time: NOW + HOUR, ..Default::default() };
        assert_eq!(h.fill_rule_entry(&rule, &[], opts()).unwrap().timer_type, TimerType::Unhandled);
    }
}

#[test]
fn channel_rules_are_unhandled_from_v76() {
    let rule = RecordingRule {
        record_id: 4,
        rule_type: RuleType::Channel,
        filter: RuleFilter::THIS_CHANNEL,
        chan_id: 1051,
        start_time: NOW,
        end_time: NOW + HOUR,
        ..Default::default()
    };
    let e = helper(75).fill_rule_entry(&rule, &[], opts()).unwrap();
    assert_eq!(e.timer_type, TimerType::AllShowings);
    assert!(!e.any_channel);
    for protocol in [76, 91] {
        let e = helper(protocol).fill_rule_entry(&rule, &[], opts()).unwrap();
        assert_eq!(e.timer_type, TimerType::Unhandled);
    }
}

#[test]
fn legacy_reports_everything_unhandled() {
    let h = helper(72);
    let rule = RecordingRule { record_id: 4, rule_type: RuleType::All, ..Default::default() };
    assert_eq!(h.fill_rule_entry(&rule, &[], opts()).unwrap().timer_type, TimerType::Unhandled);
}

#[test]
fn repeating_rule_reports_next_slot() {
    let h = helper(91);
    let rule = RecordingRule {
        record_id: 8,
        rule_type: RuleType::All,
        filter: RuleFilter::THIS_CHANNEL,
        start_time: NOW - 10 * DAY,
        end_time: NOW - 10 * DAY + HOUR,
        next_recording: NOW + DAY,
        ..Default::default()
    };
    let e = h.fill_rule_entry(&rule, &[], opts()).unwrap();
    assert_eq!((e.start_time, e.end_time), (NOW + DAY, NOW + DAY + HOUR));

    let mut live = instance(8, "live", RecordingStatus::Recording);
    live.start_time = NOW - 60;
    live.end_time = NOW + 1800;
    let later = instance(8, "later", RecordingStatus::WillRecord);
    let e = h.fill_rule_entry(&rule, &[&live, &later], opts()).unwrap();
    assert_eq!(e.recording_status, RecordingStatus::Recording);
    assert_eq!((e.start_time, e.end_time), (NOW - 60, NOW + 1800));
}

// ── Instance classification ──────────────────────────────

#[test]
fn instance_entry_is_retagged_record() {
    let h = helper(91);
    let rule = RecordingRule {
        record_id: 9,
        rule_type: RuleType::All,
        title: "Doctor Who".into(),
        description: "rule text".into(),
        priority: 4,
        ..Default::default()
    };
    let mut p = instance(9, "1051_x", RecordingStatus::WillRecord);
    p.start_time = NOW + 5 * HOUR;
    p.end_time = NOW + 6 * HOUR;
    let e = h.fill_instance_entry(&p, &rule, 9, &[&p], opts()).unwrap();
    assert_eq!(e.timer_type, TimerType::Record);
    assert_eq!(e.entry_index, instance_index(9, "1051_x"));
    assert!(is_instance_index(e.entry_index));
    assert_eq!(e.parent_index, 9);
    assert_eq!(e.start_time, NOW + 5 * HOUR);
    assert_eq!(e.priority, 4);
    assert!(e.description.is_empty());
}

#[test]
fn modifier_instances_keep_their_type() {
    let h = helper(91);
    for (rule_type, timer_type) in [(RuleType::Override, TimerType::Override), (RuleType::DontRecord, TimerType::DontRecord)] {
        let rule = RecordingRule { record_id: 12, parent_id: 9, rule_type, start_time: NOW + HOUR, ..Default::default() };
        let p = instance(12, "u", RecordingStatus::WillRecord);
        let e = h.fill_instance_entry(&p, &rule, 9, &[&p], opts()).unwrap();
        assert_eq!(e.timer_type, timer_type);
        assert_eq!(e.parent_index, 9);
    }
}

#[test]
fn stale_owner_hides_its_instances() {
    let h = helper(91);
    let rule = RecordingRule {
        record_id: 2,
        rule_type: RuleType::Single,
        start_time: NOW - 3 * DAY,
        end_time: NOW - 3 * DAY + HOUR,
        ..Default::default()
    };
    let p = instance(2, "u", RecordingStatus::WillRecord);
    assert!(h.fill_rule_entry(&rule, &[&p], opts()).is_none());
    assert!(h.fill_instance_entry(&p, &rule, 2, &[&p], opts()).is_none());
    let shown = FillOptions { show_inactive: true, ..opts() };
    assert!(h.fill_instance_entry(&p, &rule, 2, &[&p], shown).is_some());
}

#[test]
fn superseded_instances_need_show_inactive() {
    let h = helper(91);
    let rule = RecordingRule { record_id: 9, rule_type: RuleType::All, ..Default::default() };
    let p = instance(9, "u", RecordingStatus::EarlierShowing);
    assert!(h.fill_instance_entry(&p, &rule, 9, &[&p], opts()).is_none());
    let shown = FillOptions { show_inactive: true, ..opts() };
    assert!(h.fill_instance_entry(&p, &rule, 9, &[&p], shown).is_some());
    let never = instance(9, "v", RecordingStatus::NeverRecord);
    assert!(h.fill_instance_entry(&never, &rule, 9, &[&never], opts()).is_some());
}

// ── Templates ────────────────────────────────────────────

fn template(category: &str, priority: i32) -> RecordingRule {
    RecordingRule {
        rule_type: RuleType::Template,
        title: format!("{category} (Template)"),
        category: category.into(),
        priority,
        end_offset: 1,
        recording_group: "Movies".into(),
        storage_group: "Fast".into(),
        ..Default::default()
    }
}

fn backend_helper(templates: Vec<RecordingRule>, overtime: Option<CategoryOverTime>) -> VersionHelper {
    VersionHelper::new(
        91,
        HelperContext {
            template: TemplateConfig { provider: TemplateProvider::Backend, ..Default::default() },
            templates,
            category_overtime: overtime,
            ..Default::default()
        },
    )
}

#[test]
fn backend_template_matches_category_then_type_then_default() {
    let g = epg();
    let h = backend_helper(vec![template("Default", 1), template("series", 2), template("Drama", 3)], None);
    assert_eq!(h.new_from_template(Some(&g)).priority, 3);

    let h = backend_helper(vec![template("series", 2), template("Default", 1)], None);
    assert_eq!(h.new_from_template(Some(&g)).priority, 2);

    let h = backend_helper(vec![template("Default", 1), template("Sports", 5)], None);
    let rule = h.new_from_template(Some(&g));
    assert_eq!(rule.priority, 1);
    assert_eq!(rule.storage_group, "Fast");
    assert_eq!(rule.recording_group, "Movies");

    let h = backend_helper(vec![template("Sports", 5)], None);
    assert_eq!(h.new_from_template(Some(&g)), RecordingRule::default());
}

#[test]
fn category_overtime_sets_end_offset() {
    let g = epg();
    let overtime = Some(CategoryOverTime { category: "Drama".into(), minutes: 30 });
    let h = backend_helper(vec![template("Drama", 3)], overtime);
    assert_eq!(h.new_from_template(Some(&g)).end_offset, 30);

    let by_type = Some(CategoryOverTime { category: "series".into(), minutes: 15 });
    let h = backend_helper(vec![], by_type);
    assert_eq!(h.new_from_template(Some(&g)).end_offset, 15);
}

#[test]
fn internal_template_uses_config() {
    let h = VersionHelper::new(
        76,
        HelperContext {
            template: TemplateConfig { auto_transcode: true, user_jobs: [false, true, false, false], transcoder: 3, ..Default::default() },
            ..Default::default()
        },
    );
    let rule = h.new_from_template(None);
    assert!(rule.auto_transcode);
    assert!(rule.auto_commflag);
    assert_eq!(rule.user_jobs, [false, true, false, false]);
    assert_eq!(rule.transcoder, 3);
    assert_eq!(rule.dup_method, DupMethod::SubtitleAndDescription);
    assert_eq!(rule.dup_in, DupScope::InAll);
    assert!(rule.auto_expire);
    assert_eq!(rule.recording_group, "Default");
}

#[test]
fn template_offsets_add_to_timer_offsets() {
    let h = backend_helper(vec![template("Drama", 3)], None);
    let e = TimerEntry { start_offset: 2, end_offset: 5, ..epg_entry(TimerType::ThisShowing) };
    let rule = h.new_from_timer(&e, true);
    assert_eq!(rule.start_offset, 2);
    assert_eq!(rule.end_offset, 6);
    assert_eq!(rule.priority, 3);
    assert_eq!(rule.recording_group, "Movies");
}

// ── Same timeslot ────────────────────────────────────────

fn timeslot_rule(rule_type: RuleType, start: Timestamp) -> RecordingRule {
    RecordingRule {
        rule_type,
        title: "News".into(),
        chan_id: 1051,
        filter: RuleFilter::THIS_CHANNEL,
        start_time: start,
        end_time: start + HOUR,
        ..Default::default()
    }
}

#[test]
fn same_timeslot_by_rule_type() {
    let h = helper(91);
    let a = timeslot_rule(RuleType::Override, NOW);
    assert!(h.same_timeslot(&a, &timeslot_rule(RuleType::All, NOW)));
    assert!(!h.same_timeslot(&a, &timeslot_rule(RuleType::All, NOW + 60)));

    let weekly = timeslot_rule(RuleType::Weekly, NOW);
    assert!(h.same_timeslot(&weekly, &timeslot_rule(RuleType::Weekly, NOW + 7 * DAY)));
    assert!(!h.same_timeslot(&weekly, &timeslot_rule(RuleType::Weekly, NOW + DAY)));

    let daily = timeslot_rule(RuleType::Daily, NOW);
    assert!(h.same_timeslot(&daily, &timeslot_rule(RuleType::Daily, NOW + DAY)));
    assert!(!h.same_timeslot(&daily, &timeslot_rule(RuleType::Daily, NOW + DAY + 60)));

    let all = timeslot_rule(RuleType::All, NOW);
    let other_channel = RecordingRule { chan_id: 2000, ..timeslot_rule(RuleType::All, NOW + 5 * HOUR) };
    assert!(h.same_timeslot(&all, &other_channel));
    let channel = timeslot_rule(RuleType::Channel, NOW);
    assert!(!h.same_timeslot(&channel, &other_channel));

    let retitled = RecordingRule { title: "Sport".into(), ..timeslot_rule(RuleType::One, NOW) };
    assert!(!h.same_timeslot(&timeslot_rule(RuleType::One, NOW), &retitled));
}

#[test]
fn legacy_never_matches_timeslot() {
    let h = helper(70);
    let a = timeslot_rule(RuleType::Override, NOW);
    assert!(!h.same_timeslot(&a, &a.clone()));
}

// ── Fix pass & modifiers ─────────────────────────────────

#[test]
fn fix_repairs_times_and_channel() {
    let h = helper(91);
    let mut rule = RecordingRule {
        rule_type: RuleType::Single,
        start_time: NOW,
        end_time: NOW,
        ..Default::default()
    };
    assert!(h.fix_rule(&mut rule));
    assert_eq!(rule.end_time, NOW + 2);
    assert_eq!(rule.chan_id, 1000);
    assert_eq!(rule.callsign, "DUMMY");
}

#[test]
fn fix_flags_empty_search() {
    let h = helper(76);
    let mut rule = RecordingRule {
        rule_type: RuleType::All,
        search: SearchKind::Keyword,
        chan_id: 5,
        callsign: "ITV".into(),
        start_time: NOW,
        end_time: NOW + HOUR,
        ..Default::default()
    };
    assert!(!h.fix_rule(&mut rule));
    assert_eq!(rule.chan_id, 5);
    rule.description = "cooking".into();
    assert!(h.fix_rule(&mut rule));
}

#[test]
fn fix_leaves_untimed_search_on_v91() {
    let mut rule = RecordingRule {
        rule_type: RuleType::All,
        search: SearchKind::Title,
        description: "news".into(),
        ..Default::default()
    };
    helper(91).fix_rule(&mut rule);
    assert_eq!(rule.end_time, 0);
    helper(76).fix_rule(&mut rule);
    assert_eq!(rule.end_time, 2);
}

#[test]
fn modifier_is_scoped_to_instance() {
    let h = helper(91);
    let main = RecordingRule {
        record_id: 9,
        rule_type: RuleType::All,
        search: SearchKind::Title,
        title: "Doctor".into(),
        priority: 6,
        inactive: true,
        next_recording: NOW,
        ..Default::default()
    };
    let mut p = instance(9, "u", RecordingStatus::WillRecord);
    p.inetref = "tt123".into();
    p.season = 3;
    p.program_id = "EP9".into();
    let m = h.make_override(&main, &p);
    assert_eq!(m.rule_type, RuleType::Override);
    assert_eq!(m.record_id, 0);
    assert_eq!(m.parent_id, 9);
    assert_eq!(m.search, SearchKind::None);
    assert!(!m.inactive);
    assert_eq!(m.priority, 6);
    assert_eq!(m.title, p.title);
    assert_eq!((m.start_time, m.end_time), (p.start_time, p.end_time));
    assert_eq!(m.program_id, "EP9");
    assert_eq!(m.inetref, "tt123");
    assert_eq!(m.season, 3);

    let manual = RecordingRule { search: SearchKind::Manual, inetref: "tt999".into(), ..main };
    let d = h.make_dont_record(&manual, &p);
    assert_eq!(d.rule_type, RuleType::DontRecord);
    assert_eq!(d.search, SearchKind::Manual);
    assert_eq!(d.inetref, "tt999");
    assert_eq!(d.season, 0);
}

// ── EPG-seeded rules and summaries ───────────────────────

#[test]
fn seeded_single_copies_program_or_goes_manual() {
    let h = helper(91);
    let rule = h.new_single_record(Some(&epg()));
    assert_eq!((rule.rule_type, rule.search), (RuleType::Single, SearchKind::None));
    assert_eq!((rule.chan_id, rule.start_time), (1051, NOW + HOUR));
    assert_eq!(rule.program_id, "EP0001");
    assert_eq!((rule.dup_method, rule.dup_in), (DupMethod::None, DupScope::InAll));
    assert!(!rule.inactive);

    let manual = h.new_single_record(None);
    assert_eq!((manual.rule_type, manual.search), (RuleType::Single, SearchKind::Manual));
}

#[test]
fn seeded_daily_and_weekly_follow_generation() {
    let daily = helper(75).new_daily_record(Some(&epg()));
    assert_eq!((daily.rule_type, daily.search), (RuleType::Daily, SearchKind::None));
    assert_eq!(daily.dup_method, DupMethod::SubtitleAndDescription);

    let daily = helper(76).new_daily_record(Some(&epg()));
    assert_eq!(daily.rule_type, RuleType::All);
    assert_eq!(daily.filter, RuleFilter::THIS_CHANNEL | RuleFilter::THIS_TIME);
    let weekly = helper(91).new_weekly_record(Some(&epg()));
    assert_eq!(weekly.rule_type, RuleType::All);
    assert_eq!(weekly.filter, RuleFilter::THIS_CHANNEL | RuleFilter::THIS_DAY_AND_TIME);

    let manual = helper(91).new_weekly_record(None);
    assert_eq!((manual.rule_type, manual.search), (RuleType::Weekly, SearchKind::Manual));
    assert_eq!(manual.filter, RuleFilter::THIS_CHANNEL);
}

#[test]
fn seeded_channel_and_one_need_epg() {
    let channel = helper(75).new_channel_record(Some(&epg()));
    assert_eq!((channel.rule_type, channel.search), (RuleType::Channel, SearchKind::Title));
    assert_eq!(channel.description, "Doctor Who");
    let channel = helper(91).new_channel_record(Some(&epg()));
    assert_eq!((channel.rule_type, channel.search), (RuleType::All, SearchKind::None));
    assert_eq!((channel.filter, channel.description.as_str()), (RuleFilter::THIS_CHANNEL, "Angels"));

    let one = helper(91).new_one_record(Some(&epg()));
    assert_eq!((one.rule_type, one.filter), (RuleType::One, RuleFilter::THIS_EPISODE));
    let one = helper(75).new_one_record(Some(&epg()));
    assert_eq!((one.rule_type, one.search), (RuleType::One, SearchKind::Title));

    for protocol in [75, 91] {
        assert_eq!(helper(protocol).new_channel_record(None).rule_type, RuleType::NotRecording);
        assert_eq!(helper(protocol).new_one_record(None).rule_type, RuleType::NotRecording);
    }
}

#[test]
fn seeded_rules_round_trip_to_timers() {
    let h = helper(91);
    let weekly = RecordingRule { record_id: 3, ..h.new_weekly_record(Some(&epg())) };
    let e = h.fill_rule_entry(&weekly, &[], opts()).unwrap();
    assert_eq!(e.timer_type, TimerType::OneShowingWeekly);
    let channel = RecordingRule { record_id: 4, ..h.new_channel_record(Some(&epg())) };
    let e = h.fill_rule_entry(&channel, &[], opts()).unwrap();
    assert_eq!(e.timer_type, TimerType::AllShowings);
    assert!(!e.any_channel);
}

#[test]
fn legacy_cannot_seed_rules() {
    let h = helper(72);
    assert_eq!(h.new_single_record(Some(&epg())).rule_type, RuleType::Unknown);
    assert_eq!(h.new_daily_record(None).rule_type, RuleType::Unknown);
    assert_eq!(h.new_one_record(Some(&epg())).rule_type, RuleType::Unknown);
    let all = RecordingRule { rule_type: RuleType::All, ..Default::default() };
    assert_eq!(h.summary_info(&all), RuleSummary::default());
}

#[test]
fn summary_markers_by_type() {
    let h = helper(75);
    let at = |rule_type, filter| RecordingRule { rule_type, filter, start_time: NOW, ..Default::default() };
    let summary = |h: &VersionHelper, rule: &RecordingRule| {
        let s = h.summary_info(rule);
        (s.repeating, s.marker)
    };
    assert_eq!(summary(&h, &at(RuleType::Daily, RuleFilter::NONE)), (true, Some('d')));
    assert_eq!(summary(&h, &at(RuleType::FindWeekly, RuleFilter::NONE)), (true, Some('w')));
    assert_eq!(summary(&h, &at(RuleType::Channel, RuleFilter::NONE)), (true, Some('C')));
    assert_eq!(summary(&h, &at(RuleType::One, RuleFilter::NONE)), (false, Some('1')));
    assert_eq!(summary(&h, &at(RuleType::DontRecord, RuleFilter::NONE)), (false, Some('x')));
    assert_eq!(summary(&h, &at(RuleType::Override, RuleFilter::NONE)), (false, Some('o')));
    assert_eq!(summary(&h, &at(RuleType::Single, RuleFilter::NONE)), (false, None));

    let slotted = at(RuleType::All, RuleFilter::THIS_CHANNEL | RuleFilter::THIS_DAY_AND_TIME);
    assert_eq!(summary(&h, &slotted), (true, Some('A')));
    assert_eq!(summary(&helper(76), &slotted), (true, Some('w')));
    let daily = at(RuleType::All, RuleFilter::THIS_TIME);
    assert_eq!(summary(&helper(91), &daily), (true, Some('d')));
}

#[test]
fn summary_weekdays() {
    let h = helper(91);
    let daily = RecordingRule { rule_type: RuleType::Daily, start_time: NOW, ..Default::default() };
    assert_eq!(h.summary_info(&daily).week_days, 0x7F);

    let weekly = |start| RecordingRule { rule_type: RuleType::Weekly, start_time: start, ..Default::default() };
    let mask = h.summary_info(&weekly(NOW)).week_days;
    assert_eq!(mask.count_ones(), 1);
    assert_eq!(h.summary_info(&weekly(NOW + 7 * DAY)).week_days, mask);
    assert_ne!(h.summary_info(&weekly(NOW + DAY)).week_days, mask);
    assert_eq!(h.summary_info(&RecordingRule { rule_type: RuleType::One, ..Default::default() }).week_days, 0);
}
