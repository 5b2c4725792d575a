//! End-to-end exercise of the acquisition core: a scheduler driving a
//! registry of simulated weather-station devices over hours of mock time,
//! including sensors dropping off the bus and the millisecond counter
//! wrapping.

use std::cell::Cell;
use std::rc::Rc;

use stratus_core::{
    physics,
    time::{intervals, MockClock},
    DeviceSpec, Knob, Location, PresenceProbe, Registry, Scheduler, TimeSource,
};

/// Bus where devices can be plugged and unplugged between ticks.
struct SimulatedBus {
    present: Vec<u8>,
}

impl PresenceProbe for SimulatedBus {
    fn probe(&mut self, address: u8) -> bool {
        self.present.contains(&address)
    }
}

/// Application context handed to every task callback.
struct Station {
    registry: Registry,
    bus: SimulatedBus,
}

/// Shared environment value the test can change while device closures read it.
fn env(initial: f32) -> Rc<Cell<f32>> {
    Rc::new(Cell::new(initial))
}

const BME280: u8 = 0x76;
const SHT31: u8 = 0x44;

fn build_station(temp: &Rc<Cell<f32>>, humidity: &Rc<Cell<f32>>) -> Station {
    let mut registry = Registry::new();

    let t = temp.clone();
    registry
        .register(
            DeviceSpec::new(
                "out_temperature",
                Knob::new(-40, 125, ".1", "Temperature", "C"),
                move |_| t.get(),
            )
            .address(BME280)
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
            .address(SHT31)
            .logged(),
        )
        .unwrap();

    // Derived device, registered after its dependencies so it sees their
    // values from the same pass.
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

    registry
        .register(
            DeviceSpec::new("vcc", Knob::new(0, 5, ".01", "Supply", "V"), |_| 3.28)
                .location(Location::Indoor),
        )
        .unwrap();

    Station {
        registry,
        bus: SimulatedBus {
            present: vec![BME280, SHT31],
        },
    }
}

fn register_tasks(scheduler: &mut Scheduler<Station>, clock: &MockClock) {
    scheduler
        .register(intervals::TIME_5S, Some("sample"), clock, |_, station| {
            station.registry.sample_all()
        })
        .unwrap();
    scheduler
        .register(intervals::TIME_30S, Some("probe"), clock, |_, station| {
            station.registry.probe_all(&mut station.bus)
        })
        .unwrap();
    scheduler
        .register(intervals::TIME_10M, Some("log"), clock, |_, station| {
            station.registry.log_all()
        })
        .unwrap();
}

/// Step mock time forward one second at a time, ticking after each step.
fn run_seconds(
    scheduler: &mut Scheduler<Station>,
    clock: &MockClock,
    station: &mut Station,
    seconds: u32,
) {
    for _ in 0..seconds {
        clock.advance(intervals::SECOND);
        scheduler.tick(clock, station);
    }
}

#[test]
fn one_simulated_day() {
    let temp = env(21.5);
    let humidity = env(60.0);
    let mut station = build_station(&temp, &humidity);
    let clock = MockClock::new(0);
    let mut scheduler = Scheduler::new();
    register_tasks(&mut scheduler, &clock);

    // First probe pass hasn't run yet: bus devices absent, nothing sampled.
    run_seconds(&mut scheduler, &clock, &mut station, 10);
    assert!(!station.registry.is_present("out_temperature"));
    assert_eq!(station.registry.value("out_temperature"), 0.0);

    run_seconds(&mut scheduler, &clock, &mut station, 86_400 - 10);

    let registry = &station.registry;
    assert!(registry.is_present("out_temperature"));
    assert!(registry.is_present("out_humidity"));
    assert_eq!(registry.value("out_temperature"), 21.5);
    assert_eq!(registry.value("out_humidity"), 60.0);

    let expected_dp = physics::dew_point(21.5, 60.0);
    assert!((registry.value("out_dew_point") - expected_dp).abs() < 1e-3);

    // Virtual device sampled from the start despite a false presence flag.
    assert!((registry.value("vcc") - 3.28).abs() < 1e-6);

    // With 1 s ticks and drift-on-fire stamping, a 10-minute task fires
    // every 601 s: 143 rolls fit in the day.
    let temps: Vec<f32> = registry.log_of("out_temperature").unwrap().collect();
    assert_eq!(temps.len(), 143);
    assert!(temps[temps.len() - 1] == 21.5);
    // Three logging devices, each with the same roll count.
    assert_eq!(registry.logs().count(), 3);
    for (_, log) in registry.logs() {
        assert_eq!(log.count(), 143);
    }
}

#[test]
fn sensor_drops_off_bus_and_returns() {
    let temp = env(18.0);
    let humidity = env(55.0);
    let inits = Rc::new(Cell::new(0u32));

    let mut station = build_station(&temp, &humidity);
    // A fifth device with an init hook, to count bus transitions.
    let inits_in = inits.clone();
    station
        .registry
        .register(
            DeviceSpec::new("out_pressure", Knob::new(-500, 9000, ".01", "Pressure", "mm"), |_| {
                748.0
            })
            .address(0x77)
            .on_init(move || inits_in.set(inits_in.get() + 1)),
        )
        .unwrap();
    station.bus.present.push(0x77);

    let clock = MockClock::new(0);
    let mut scheduler = Scheduler::new();
    register_tasks(&mut scheduler, &clock);

    run_seconds(&mut scheduler, &clock, &mut station, 120);
    assert!(station.registry.is_present("out_pressure"));
    assert_eq!(station.registry.value("out_pressure"), 748.0);
    assert_eq!(inits.get(), 1);

    // Unplug: presence drops at the next probe pass, the last filtered
    // value freezes instead of decaying.
    station.bus.present.retain(|&a| a != 0x77);
    run_seconds(&mut scheduler, &clock, &mut station, 120);
    assert!(!station.registry.is_present("out_pressure"));
    assert_eq!(station.registry.value("out_pressure"), 748.0);
    assert_eq!(inits.get(), 1);

    // Replug: one more init, sampling resumes.
    station.bus.present.push(0x77);
    run_seconds(&mut scheduler, &clock, &mut station, 120);
    assert!(station.registry.is_present("out_pressure"));
    assert_eq!(inits.get(), 2);
}

#[test]
fn survives_counter_wrap() {
    let temp = env(5.0);
    let humidity = env(80.0);
    let mut station = build_station(&temp, &humidity);

    // Two minutes before the 32-bit wrap.
    let clock = MockClock::new(u32::MAX - 120_000);
    let mut scheduler = Scheduler::new();
    register_tasks(&mut scheduler, &clock);

    let samples = Rc::new(Cell::new(0u32));
    let samples_in = samples.clone();
    scheduler
        .register(intervals::TIME_5S, Some("count"), &clock, move |_, _| {
            samples_in.set(samples_in.get() + 1)
        })
        .unwrap();

    run_seconds(&mut scheduler, &clock, &mut station, 600);
    assert!(clock.now() < u32::MAX - 120_000, "clock wrapped");

    // A 5 s task at 1 s granularity fires every 6 s: 100 firings in
    // 600 s, with no stall at the wrap.
    assert_eq!(samples.get(), 100);
    assert!(station.registry.is_present("out_temperature"));
    assert_eq!(station.registry.value("out_temperature"), 5.0);

    // By-id timing queries stay sane across the wrap too.
    assert!(scheduler.elapsed_since("sample", &clock) <= 6_000);
}

#[test]
fn environment_changes_propagate_through_filters() {
    let temp = env(10.0);
    let humidity = env(50.0);
    let mut station = build_station(&temp, &humidity);
    let clock = MockClock::new(0);
    let mut scheduler = Scheduler::new();
    register_tasks(&mut scheduler, &clock);

    run_seconds(&mut scheduler, &clock, &mut station, 300);
    assert_eq!(station.registry.value("out_temperature"), 10.0);

    // A step change takes a majority of the 5-slot window to win the
    // median: three samples at 6 s cadence, so under a minute.
    temp.set(25.0);
    run_seconds(&mut scheduler, &clock, &mut station, 60);
    assert_eq!(station.registry.value("out_temperature"), 25.0);

    let expected_dp = physics::dew_point(25.0, 50.0);
    run_seconds(&mut scheduler, &clock, &mut station, 60);
    assert!((station.registry.value("out_dew_point") - expected_dp).abs() < 1e-3);
}
