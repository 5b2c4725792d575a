//! Simulated Weather Station Example
//!
//! This example wires the acquisition core up as a small outdoor weather
//! station: three physical channels behind one BME280 address, a derived
//! dew-point channel, and a supply-voltage diagnostic, all driven by
//! scheduler tasks over mock time.
//!
//! ## What You'll Learn
//!
//! - Registering bus-addressed, virtual, and derived devices
//! - Presence probing and what happens when a sensor drops off the bus
//! - Driving the sample/probe/log cadence with scheduler tasks
//! - Smoothing a noisy channel with the scalar Kalman estimator
//! - Reading filtered values and day-long history logs back out
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_weather_station
//! ```

use std::cell::Cell;
use std::rc::Rc;

use stratus_core::{
    physics,
    time::{intervals, MockClock},
    DeviceSpec, KalmanEstimator, Knob, Location, PresenceProbe, Registry, Scheduler,
};

const BME280_ADDR: u8 = 0x76;

/// Bus that can lose a device mid-run.
struct DemoBus {
    bme280_connected: bool,
}

impl PresenceProbe for DemoBus {
    fn probe(&mut self, address: u8) -> bool {
        address == BME280_ADDR && self.bme280_connected
    }
}

/// Everything the scheduler tasks touch.
struct Station {
    registry: Registry,
    bus: DemoBus,
}

fn main() {
    println!("Stratus Weather Station Example");
    println!("===============================\n");

    // Simulated environment the "hardware" closures read from.
    let temperature = Rc::new(Cell::new(21.3_f32));
    let humidity = Rc::new(Cell::new(58.0_f32));
    let pressure = Rc::new(Cell::new(749.5_f32));

    let mut registry = Registry::new();

    let t = temperature.clone();
    registry
        .register(
            DeviceSpec::new(
                "out_temperature",
                Knob::new(-40, 125, ".1", "Temperature", "C"),
                move |_| t.get(),
            )
            .address(BME280_ADDR)
            .on_init(|| println!("  [bus] BME280 initialized"))
            .logged(),
        )
        .unwrap();

    let h = humidity.clone();
    registry
        .register(
            DeviceSpec::new(
                "out_humidity",
                Knob::new(0, 100, ".01", "Humidity", "%"),
                move |_| h.get(),
            )
            .address(BME280_ADDR)
            .logged(),
        )
        .unwrap();

    let p = pressure.clone();
    registry
        .register(
            DeviceSpec::new(
                "out_pressure",
                Knob::new(-500, 9000, ".01", "Pressure", "mm"),
                move |_| p.get(),
            )
            .address(BME280_ADDR)
            .logged(),
        )
        .unwrap();

    // Derived channel: computed from other devices' filtered values.
    // Registered after its dependencies so each pass sees fresh inputs.
    registry
        .register(
            DeviceSpec::new(
                "out_dew_point",
                Knob::new(-40, 125, ".1", "Dew point", "C"),
                |r| physics::dew_point(r.value("out_temperature"), r.value("out_humidity")),
            )
            .logged(),
        )
        .unwrap();

    // Diagnostic channel with no bus address: always sampleable. The raw
    // ADC reading is noisy, so the closure smooths it with a scalar Kalman
    // estimator before the median filter sees it.
    let mut vcc_estimator = KalmanEstimator::new(0.002, 0.05, 1.0, 3.28);
    let mut adc_phase = 0u32;
    registry
        .register(
            DeviceSpec::new("vcc", Knob::new(0, 5, ".01", "Supply", "V"), move |_| {
                adc_phase = adc_phase.wrapping_add(1);
                let ripple = if adc_phase % 2 == 0 { 0.02 } else { -0.02 };
                vcc_estimator.update(3.28 + ripple)
            })
            .location(Location::Indoor),
        )
        .unwrap();

    let mut station = Station {
        registry,
        bus: DemoBus {
            bme280_connected: true,
        },
    };

    // Task cadence: sample every 5 s, probe every 30 s, log every 10 min.
    let clock = MockClock::new(0);
    let mut scheduler: Scheduler<Station> = Scheduler::new();
    scheduler
        .register(intervals::TIME_5S, Some("sample"), &clock, |_, s| {
            s.registry.sample_all()
        })
        .unwrap();
    scheduler
        .register(intervals::TIME_30S, Some("probe"), &clock, |_, s| {
            s.registry.probe_all(&mut s.bus)
        })
        .unwrap();
    scheduler
        .register(intervals::TIME_10M, Some("log"), &clock, |_, s| {
            s.registry.log_all()
        })
        .unwrap();

    println!("Registered {} devices:", station.registry.len());
    for info in station.registry.describe_all() {
        println!(
            "  {:16} {:12} [{}..{}] {}{}",
            info.name,
            info.title,
            info.min,
            info.max,
            info.unit,
            if info.logged { "  (logged)" } else { "" },
        );
    }

    // Run an hour of mock time, one-second run-loop granularity.
    println!("\nRunning 1 hour of simulated time...");
    run_minutes(&mut scheduler, &clock, &mut station, 60);
    print_readings(&station.registry);

    // Knock the sensor off the bus: presence drops at the next probe
    // pass and the last filtered values freeze.
    println!("\nBME280 unplugged. Running 5 more minutes...");
    station.bus.bme280_connected = false;
    run_minutes(&mut scheduler, &clock, &mut station, 5);
    print_readings(&station.registry);

    // Plug it back in: the init hook fires once and sampling resumes.
    println!("\nBME280 replugged. Running 5 more minutes...");
    station.bus.bme280_connected = true;
    temperature.set(20.1);
    humidity.set(63.0);
    run_minutes(&mut scheduler, &clock, &mut station, 5);
    print_readings(&station.registry);

    let log_len = station
        .registry
        .log_of("out_temperature")
        .map(Iterator::count)
        .unwrap_or(0);
    println!("\nTemperature history: {} samples at 10-minute cadence", log_len);
}

fn run_minutes(
    scheduler: &mut Scheduler<Station>,
    clock: &MockClock,
    station: &mut Station,
    minutes: u32,
) {
    for _ in 0..minutes * 60 {
        clock.advance(intervals::SECOND);
        scheduler.tick(clock, station);
    }
}

fn print_readings(registry: &Registry) {
    println!("Current readings:");
    for (name, present) in registry.statuses() {
        println!(
            "  {:16} {:8.2}  {}",
            name,
            registry.value(name),
            if present { "present" } else { "absent" },
        );
    }
}
