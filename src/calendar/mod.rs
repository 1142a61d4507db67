//! Pure calendar logic: day ranges, per-day attachments, composite colors and
//! range summaries. Nothing in here touches the database or the clock.

pub mod aggregate;
pub mod attachments;
pub mod color;
pub mod range;
pub mod time;

pub use aggregate::{aggregate, mood_comparison, weekday_distribution, RangeSummary};
pub use attachments::{day_key, DayAttachment, DayIndex, DayRecord, Event, Mood};
pub use color::{matches_filter, project_color, resolve_click, Background, FilterOutcome};
pub use range::{expand_range, month_groups, CalendarDay, Granularity};
pub use time::TimeContext;
