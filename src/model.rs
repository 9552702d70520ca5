use serde::{Deserialize, Serialize};

/// Unix seconds. Every timestamp in the crate uses it.
pub type Timestamp = i64;

// ── Rule vocabulary ──────────────────────────────────────

/// What a recording rule schedules. `Unknown` marks a failed translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    #[default]
    NotRecording,
    Single,
    One,
    Daily,
    Weekly,
    Channel,
    All,
    FindDaily,
    FindWeekly,
    Override,
    DontRecord,
    Template,
    Unknown,
}

impl RuleType {
    pub const ALL: [RuleType; 13] = [
        RuleType::NotRecording,
        RuleType::Single,
        RuleType::One,
        RuleType::Daily,
        RuleType::Weekly,
        RuleType::Channel,
        RuleType::All,
        RuleType::FindDaily,
        RuleType::FindWeekly,
        RuleType::Override,
        RuleType::DontRecord,
        RuleType::Template,
        RuleType::Unknown,
    ];

    /// Override and don't-record rules modify exactly one occurrence of another rule.
    pub fn is_modifier(self) -> bool {
        matches!(self, RuleType::Override | RuleType::DontRecord)
    }

    /// Rule types that schedule more than one occurrence.
    pub fn is_repeating(self) -> bool {
        matches!(
            self,
            RuleType::One
                | RuleType::Daily
                | RuleType::Weekly
                | RuleType::Channel
                | RuleType::All
                | RuleType::FindDaily
                | RuleType::FindWeekly
        )
    }
}

/// How a rule matches programs in the guide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchKind {
    #[default]
    None,
    Manual,
    Title,
    Keyword,
    People,
    Power,
}

impl SearchKind {
    /// Searches whose matching text lives in the rule description.
    pub fn uses_description(self) -> bool {
        matches!(
            self,
            SearchKind::Title | SearchKind::Keyword | SearchKind::People | SearchKind::Power
        )
    }
}

/// Bitset of rule filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleFilter(pub u32);

impl RuleFilter {
    pub const NONE: RuleFilter = RuleFilter(0);
    pub const NEW_EPISODE: RuleFilter = RuleFilter(0x001);
    pub const IDENTIFIABLE_EPISODE: RuleFilter = RuleFilter(0x002);
    pub const FIRST_SHOWING: RuleFilter = RuleFilter(0x004);
    pub const PRIME_TIME: RuleFilter = RuleFilter(0x008);
    pub const COMMERCIAL_FREE: RuleFilter = RuleFilter(0x010);
    pub const HIGH_DEFINITION: RuleFilter = RuleFilter(0x020);
    pub const THIS_EPISODE: RuleFilter = RuleFilter(0x040);
    pub const THIS_SERIES: RuleFilter = RuleFilter(0x080);
    pub const THIS_TIME: RuleFilter = RuleFilter(0x100);
    pub const THIS_DAY_AND_TIME: RuleFilter = RuleFilter(0x200);
    pub const THIS_CHANNEL: RuleFilter = RuleFilter(0x400);

    /// Bits a host timer can express. The rest belong to the backend rule.
    pub const TIMER_MANAGED: RuleFilter = RuleFilter(0x004 | 0x100 | 0x200 | 0x400);

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, other: RuleFilter) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: RuleFilter) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: RuleFilter) {
        self.0 &= !other.0;
    }

    /// Timer-managed bits from `timer`, every other bit from `self`.
    pub fn with_timer_bits(self, timer: RuleFilter) -> RuleFilter {
        let managed = RuleFilter::TIMER_MANAGED.0;
        RuleFilter((self.0 & !managed) | (timer.0 & managed))
    }
}

impl std::ops::BitOr for RuleFilter {
    type Output = RuleFilter;

    fn bitor(self, rhs: RuleFilter) -> RuleFilter {
        RuleFilter(self.0 | rhs.0)
    }
}

/// Which program fields decide that two showings are the same episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DupMethod {
    #[default]
    None,
    Subtitle,
    Description,
    SubtitleAndDescription,
    SubtitleThenDescription,
}

impl DupMethod {
    pub const ALL: [DupMethod; 5] = [
        DupMethod::None,
        DupMethod::Subtitle,
        DupMethod::Description,
        DupMethod::SubtitleAndDescription,
        DupMethod::SubtitleThenDescription,
    ];

    /// Backend wire code.
    pub fn code(self) -> u32 {
        match self {
            DupMethod::None => 0x01,
            DupMethod::Subtitle => 0x02,
            DupMethod::Description => 0x04,
            DupMethod::SubtitleAndDescription => 0x06,
            DupMethod::SubtitleThenDescription => 0x08,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DupMethod::None => "Don't match duplicates",
            DupMethod::Subtitle => "Match duplicates using subtitle",
            DupMethod::Description => "Match duplicates using description",
            DupMethod::SubtitleAndDescription => "Match duplicates using subtitle & description",
            DupMethod::SubtitleThenDescription => "Match duplicates using subtitle then description",
        }
    }
}

/// Where the backend looks for earlier copies of an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DupScope {
    InRecorded,
    InOldRecorded,
    #[default]
    InAll,
    NewEpisodes,
}

/// Backend-reported state of one scheduled occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordingStatus {
    WillRecord,
    Recording,
    Tuning,
    Recorded,
    Conflict,
    EarlierShowing,
    LaterShowing,
    CurrentRecording,
    PreviousRecording,
    OtherShowing,
    NeverRecord,
    DontRecord,
    Inactive,
    Repeat,
    Cancelled,
    Missed,
    Aborted,
    Failed,
    TunerBusy,
    LowDiskSpace,
    TooManyRecordings,
    NotListed,
    Offline,
    #[default]
    Unknown,
}

impl RecordingStatus {
    pub const ALL: [RecordingStatus; 24] = [
        RecordingStatus::WillRecord,
        RecordingStatus::Recording,
        RecordingStatus::Tuning,
        RecordingStatus::Recorded,
        RecordingStatus::Conflict,
        RecordingStatus::EarlierShowing,
        RecordingStatus::LaterShowing,
        RecordingStatus::CurrentRecording,
        RecordingStatus::PreviousRecording,
        RecordingStatus::OtherShowing,
        RecordingStatus::NeverRecord,
        RecordingStatus::DontRecord,
        RecordingStatus::Inactive,
        RecordingStatus::Repeat,
        RecordingStatus::Cancelled,
        RecordingStatus::Missed,
        RecordingStatus::Aborted,
        RecordingStatus::Failed,
        RecordingStatus::TunerBusy,
        RecordingStatus::LowDiskSpace,
        RecordingStatus::TooManyRecordings,
        RecordingStatus::NotListed,
        RecordingStatus::Offline,
        RecordingStatus::Unknown,
    ];

    /// The occurrence is being captured right now.
    pub fn is_active(self) -> bool {
        matches!(self, RecordingStatus::Recording | RecordingStatus::Tuning)
    }

    /// Another showing or recording of the same episode took precedence.
    pub fn is_superseded(self) -> bool {
        matches!(
            self,
            RecordingStatus::EarlierShowing
                | RecordingStatus::LaterShowing
                | RecordingStatus::CurrentRecording
                | RecordingStatus::PreviousRecording
        )
    }
}

// ── Backend records ──────────────────────────────────────

/// A backend-persisted recording rule. Offsets are minutes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordingRule {
    pub record_id: u32,
    pub parent_id: u32,
    pub rule_type: RuleType,
    pub search: SearchKind,
    pub filter: RuleFilter,
    pub chan_id: u32,
    pub callsign: String,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub start_offset: i32,
    pub end_offset: i32,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub category: String,
    pub program_id: String,
    pub series_id: String,
    pub inetref: String,
    pub season: u16,
    pub episode: u16,
    pub priority: i32,
    pub dup_method: DupMethod,
    pub dup_in: DupScope,
    pub auto_expire: bool,
    pub max_episodes: u32,
    pub new_expires_old: bool,
    pub recording_group: String,
    pub recording_profile: String,
    pub storage_group: String,
    pub playback_group: String,
    pub user_jobs: [bool; 4],
    pub auto_transcode: bool,
    pub auto_commflag: bool,
    pub auto_metadata: bool,
    pub transcoder: u32,
    pub inactive: bool,
    /// Backend-computed, read-only.
    pub last_recorded: Timestamp,
    /// Backend-computed, read-only.
    pub next_recording: Timestamp,
}

impl RecordingRule {
    pub fn is_modifier(&self) -> bool {
        self.rule_type.is_modifier()
    }

    pub fn duration(&self) -> Timestamp {
        self.end_time - self.start_time
    }
}

/// One upcoming (or in-progress) occurrence produced by a rule.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduledInstance {
    /// Backend-unique identifier of the occurrence.
    pub uid: String,
    /// Owning rule as reported by the backend.
    pub record_id: u32,
    pub chan_id: u32,
    pub callsign: String,
    pub channel_name: String,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub category: String,
    pub program_id: String,
    pub series_id: String,
    pub inetref: String,
    pub season: u16,
    pub episode: u16,
    pub status: RecordingStatus,
    pub recording_group: String,
}

/// Guide information attached to a timer created from the EPG.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EpgInfo {
    pub chan_id: u32,
    pub callsign: String,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub category: String,
    pub category_type: String,
    pub program_id: String,
    pub series_id: String,
}

// ── Host-facing timers ───────────────────────────────────

/// Host vocabulary of timer kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerType {
    ManualSearch,
    ThisShowing,
    OneShowing,
    OneShowingWeekly,
    OneShowingDaily,
    AllShowings,
    TextSearch,
    Record,
    Override,
    DontRecord,
    #[default]
    Unhandled,
}

impl TimerType {
    /// Types that only ever describe backend rows and cannot be submitted.
    pub fn is_backend_row(self) -> bool {
        matches!(
            self,
            TimerType::Record | TimerType::Override | TimerType::DontRecord | TimerType::Unhandled
        )
    }
}

/// Status codes returned to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerStatus {
    Success,
    Failed,
    NotImplemented,
}

/// A rule or instance as the host sees it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerEntry {
    pub is_inactive: bool,
    pub timer_type: TimerType,
    pub epg: Option<EpgInfo>,
    pub chan_id: u32,
    pub callsign: String,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub epg_search: String,
    pub full_text_search: bool,
    pub any_channel: bool,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub category: String,
    pub start_offset: i32,
    pub end_offset: i32,
    pub priority: i32,
    pub dup_method: DupMethod,
    pub auto_expire: bool,
    pub first_showing: bool,
    pub recording_group: u32,
    pub recording_status: RecordingStatus,
    pub entry_index: u32,
    pub parent_index: u32,
}

impl TimerEntry {
    pub fn has_channel(&self) -> bool {
        self.chan_id > 0 && !self.callsign.is_empty()
    }

    pub fn has_timeslot(&self) -> bool {
        self.start_time > 0 && self.end_time >= self.start_time
    }
}
