use std::env;
use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;

use timedial::{DialCommand, DialConfig, TimeDial, TimeRange};

/// Hours and minutes for stdout, rounded to the nearest minute.
fn format_clock(t: f64) -> String {
    let minutes = ((t / 60.0).round() as i64).rem_euclid(1440);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Parse --range START END (seconds since midnight) and --title
    let mut start = 22.0 * 3600.0;
    let mut end = 6.0 * 3600.0;
    let mut title = "Time Dial".to_string();
    let mut args = env::args().peekable();
    while let Some(arg) = args.next() {
        if arg == "--range" {
            if let (Some(s), Some(e)) = (args.next(), args.next()) {
                if let (Ok(s), Ok(e)) = (s.parse::<f64>(), e.parse::<f64>()) {
                    start = s;
                    end = e;
                }
            }
        } else if arg == "--title" {
            if let Some(t) = args.next() {
                title = t;
            }
        }
    }

    let config = DialConfig::builder().title(title).build();
    let mut dial = TimeDial::new(config, TimeRange::new(start, end))?;

    dial.set_change_handler(|range| {
        println!(
            "{} - {}",
            format_clock(range.start),
            format_clock(range.end)
        );
    });
    dial.set_detent_handler(|| log::debug!("detent"));

    // Lines of "START END" on stdin reposition the selection while the
    // window is open.
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let mut parts = line.split_whitespace();
            if let (Some(s), Some(e)) = (parts.next(), parts.next()) {
                if let (Ok(s), Ok(e)) = (s.parse::<f64>(), e.parse::<f64>()) {
                    if sender
                        .send(DialCommand::SetRange(TimeRange::new(s, e)))
                        .is_err()
                    {
                        break;
                    }
                }
            }
        }
    });

    dial.show_with_commands(receiver)
}
