use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use timedial::{Color, DialCommand, DialConfig, TimeDial, TimeRange};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Configure the dial with the bon-generated builder
    let config = DialConfig::builder()
        .title("Sleep Schedule".to_string())
        .band_color(Color::new(0x5e, 0x5c, 0xe6))
        .knob_radius(18.0)
        .minor_ticks_per_hour(3)
        // A span between 4 and 12 hours
        .allowed_duration(4.0 * 3600.0..12.0 * 3600.0)
        .build();

    let mut dial = TimeDial::new(config, TimeRange::new(23.0 * 3600.0, 7.0 * 3600.0))?;
    dial.set_change_handler(|range| println!("selected {range:?}"));

    // Walk the whole selection around the dial, a quarter hour per tick
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let mut shift = 0.0;
        loop {
            shift += 900.0;
            let command = DialCommand::SetRange(TimeRange::new(
                23.0 * 3600.0 + shift,
                7.0 * 3600.0 + shift,
            ));
            if sender.send(command).is_err() {
                break;
            }
            thread::sleep(Duration::from_secs(1));
        }
    });

    println!("Displaying the picker; stdin is ignored, close the window to exit");
    dial.show_with_commands(receiver)
}
