use chrono::NaiveDate;
use prayerplan::views::{ClockFrame, RenderTarget, TimelineFrame};
use prayerplan::{Planner, PlannerConfig, PlannerTargets, ScheduleScope};

const PAYLOAD: &str = r#"[
    {"date": "06/06/2025",
     "prayer_times": {"fajr": "03:48", "sunset": "05:47", "dohr": "13:47",
                      "asr": "17:57", "maghreb": "21:50", "icha": "23:48"}},
    {"date": "07/06/2025",
     "prayer_times": {"fajr": "03:47", "sunset": "05:46", "dohr": "13:48",
                      "asr": "17:57", "maghreb": "21:51", "icha": "00:02"}}
]"#;

const CONFIG: &str = r#"
[padding]
before = 10
after = 15

[padding.prayers.dohr]
before = 10
after = 40
"#;

struct PrintTimeline;

impl RenderTarget<TimelineFrame> for PrintTimeline {
    fn present(&mut self, frame: &TimelineFrame) {
        println!("timeline {}", frame.date());
        for block in frame.blocks() {
            println!("  {}", block.title);
        }
        for bar in frame.bars().iter().filter(|b| b.show_title) {
            println!("  {} - {}  {}", bar.key.start, bar.key.end, bar.title);
        }
    }
}

struct PrintClock;

impl RenderTarget<ClockFrame> for PrintClock {
    fn present(&mut self, frame: &ClockFrame) {
        match frame.face() {
            Some(face) => {
                for marker in &face.markers {
                    println!("  {:>8} at {:6.2}°", marker.prayer, marker.angle.value());
                }
            }
            None => println!("clock {}: no data", frame.date()),
        }
    }
}

fn main() -> prayerplan::PlanResult<()> {
    let config = PlannerConfig::from_toml_str(CONFIG)?;
    let planner = Planner::from_config(
        NaiveDate::from_ymd_opt(2025, 6, 6).unwrap_or_default(),
        &config,
        PlannerTargets {
            timeline: Some(Box::new(PrintTimeline)),
            clock: Some(Box::new(PrintClock)),
            calendar: None,
        },
    );

    planner.load_json(ScheduleScope::Month, PAYLOAD)?;
    planner.navigate_timeline(1);
    Ok(())
}
