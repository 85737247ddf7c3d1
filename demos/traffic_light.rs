//! Traffic Light State Machine
//!
//! This example demonstrates a simple cyclic machine driven reactively.
//!
//! Key concepts:
//! - Cyclic transitions between sibling states
//! - Entry actions updating a caller-owned context
//! - Reactive dispatch with `handle_event`
//!
//! Run with: cargo run --example traffic_light

use hsmkit::builder::MachineBuilder;
use hsmkit::core::{Event, Response, State};

#[derive(Default)]
struct Lamp {
    lit: &'static str,
    cycles: u32,
}

fn light(colour: &'static str) -> State<Lamp> {
    State::new(colour).on_entry(move |lamp: &mut Lamp| {
        lamp.lit = colour;
        Ok(())
    })
}

fn main() {
    println!("=== Traffic Light State Machine ===\n");

    let mut builder = MachineBuilder::<Lamp>::new("traffic_light");
    let root = builder.root();
    let red = builder.add_state(root, light("Red")).unwrap();
    let green = builder.add_state(root, light("Green")).unwrap();
    let yellow = builder.add_state(root, light("Yellow")).unwrap();

    builder.add_response(red, "timer", Response::to(green)).unwrap();
    builder.add_response(green, "timer", Response::to(yellow)).unwrap();
    builder
        .add_response(
            yellow,
            "timer",
            Response::to(red).action(|lamp: &mut Lamp, _: &Event| {
                lamp.cycles += 1;
                Ok(())
            }),
        )
        .unwrap();

    let mut machine = builder.build().unwrap();
    let mut lamp = Lamp {
        lit: "Red",
        ..Lamp::default()
    };

    println!("Initial state: {}\n", machine.current_name());
    println!("Transition sequence:");

    let timer = Event::new("timer");
    for _ in 0..6 {
        let from = machine.current_name().to_string();
        machine.handle_event(&timer, &mut lamp).unwrap();
        println!("  {from:<6} -> {:<6} (lamp shows {})", machine.current_name(), lamp.lit);
    }

    println!("\nCompleted cycles: {}", lamp.cycles);
    println!("Recorded transitions: {}", machine.history().len());

    println!("\nKey Characteristics:");
    println!("- States are siblings under the root, so every target is in scope");
    println!("- The lamp is plain application data passed into each action");
    println!("- No end state: the cycle repeats for as long as events arrive");

    println!("\n=== Example Complete ===");
}
