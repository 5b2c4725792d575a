//! Append-only sensor/device registry
//!
//! ## Overview
//!
//! The registry is the shared state of the controller: a bounded table of
//! device descriptors, each owning a sampling closure, a median filter, a
//! presence flag, and an optional history log. Physical devices carry a bus
//! address and are only sampled while present; virtual devices have no
//! address and are always sampleable — their sampling closure typically
//! derives a value from other devices' filtered readings via
//! [`Registry::value`].
//!
//! ## Passes
//!
//! Three periodic passes, normally driven by scheduler tasks:
//!
//! - [`Registry::sample_all`] — run each sampleable device's closure and
//!   feed the raw reading (or `0.0` on a non-numeric result) into its
//!   filter.
//! - [`Registry::probe_all`] — presence-check every bus-addressed device;
//!   an absent-to-present transition runs the device's init hook exactly
//!   once.
//! - [`Registry::log_all`] — roll the current filtered value of every
//!   logging device into its ring log.
//!
//! Every pass visits devices most-recently-registered first, each device at
//! most once. A derived device therefore reads, at its own visit, the
//! latest filtered value its dependencies have at that point in the pass.
//! Register derived devices after the devices they read.
//!
//! ## Degradation policy
//!
//! Nothing here faults. Unknown names read as `0.0` / `false` / nothing; a
//! NaN sample clears the presence flag and feeds `0.0` into the filter; a
//! failed probe simply leaves the device absent until the next probe pass.

use alloc::boxed::Box;
use heapless::Vec;

use crate::{
    errors::{RegistryError, RegistryResult},
    filter::MedianFilter,
    history::{RingLog, RingLogIter, LOG_DEPTH},
    traits::{PresenceProbe, YieldNow},
};

/// Maximum number of registered devices.
///
/// Sized for the reference deployment (a handful of bus sensors plus a few
/// derived and diagnostic channels) with headroom.
pub const MAX_DEVICES: usize = 16;

/// Sampling closure: returns a raw reading, or NaN when the hardware has
/// nothing valid to report. Receives the registry read-only so derived
/// devices can read other devices' filtered values.
pub type SampleFn = Box<dyn FnMut(&Registry) -> f32>;

/// Init hook, run once per absent-to-present transition.
pub type InitFn = Box<dyn FnMut()>;

/// Where a device lives, for UI grouping only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Location {
    /// Outdoor sensor group.
    Outdoor = 1,
    /// Indoor sensor group.
    Indoor = 2,
}

/// Display metadata for one device: bounds, step, title, unit.
///
/// Purely descriptive; consumed by the UI collaborator via
/// [`Registry::describe_all`].
#[derive(Debug, Clone, Copy)]
pub struct Knob {
    /// Minimum displayable value.
    pub min: i32,
    /// Maximum displayable value.
    pub max: i32,
    /// Display step, as the UI widget expects it.
    pub step: &'static str,
    /// Indicator title.
    pub title: &'static str,
    /// Unit label.
    pub unit: &'static str,
}

impl Knob {
    /// Display metadata literal.
    pub const fn new(
        min: i32,
        max: i32,
        step: &'static str,
        title: &'static str,
        unit: &'static str,
    ) -> Self {
        Self {
            min,
            max,
            step,
            title,
            unit,
        }
    }
}

/// Static description of one registered device, in plain primitives ready
/// for serialization by the API collaborator.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DeviceInfo {
    /// Unique device name.
    pub name: &'static str,
    /// UI grouping.
    pub location: Location,
    /// Whether the device keeps a history log.
    pub logged: bool,
    /// Minimum displayable value.
    pub min: i32,
    /// Maximum displayable value.
    pub max: i32,
    /// Display step.
    pub step: &'static str,
    /// Indicator title.
    pub title: &'static str,
    /// Unit label.
    pub unit: &'static str,
}

/// Everything needed to register a device, builder style.
///
/// ```
/// use stratus_core::{DeviceSpec, Knob, Location};
///
/// let spec = DeviceSpec::new(
///     "out_pressure",
///     Knob::new(-500, 9000, ".01", "Pressure", "mm"),
///     |_| 748.2,
/// )
/// .address(0x76)
/// .logged();
/// ```
pub struct DeviceSpec {
    name: &'static str,
    knob: Knob,
    location: Location,
    address: Option<u8>,
    init: Option<InitFn>,
    logged: bool,
    filter_window: usize,
    sample: SampleFn,
}

impl DeviceSpec {
    /// New spec: virtual, outdoor, unlogged, default filter window.
    pub fn new(
        name: &'static str,
        knob: Knob,
        sample: impl FnMut(&Registry) -> f32 + 'static,
    ) -> Self {
        Self {
            name,
            knob,
            location: Location::Outdoor,
            address: None,
            init: None,
            logged: false,
            filter_window: 5,
            sample: Box::new(sample),
        }
    }

    /// Set the UI grouping.
    pub fn location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    /// Shorthand for `.location(Location::Indoor)`.
    pub fn indoor(self) -> Self {
        self.location(Location::Indoor)
    }

    /// Give the device a bus address. Addressed devices are only sampled
    /// while present and take part in probe passes.
    pub fn address(mut self, address: u8) -> Self {
        self.address = Some(address);
        self
    }

    /// Hook run once each time the device comes back on the bus.
    pub fn on_init(mut self, init: impl FnMut() + 'static) -> Self {
        self.init = Some(Box::new(init));
        self
    }

    /// Allocate a history log for this device.
    pub fn logged(mut self) -> Self {
        self.logged = true;
        self
    }

    /// Override the median-filter window (rounded to the next odd >= 3).
    pub fn filter_window(mut self, window: usize) -> Self {
        self.filter_window = window;
        self
    }
}

/// One registered device. Created by [`Registry::register`], never removed.
pub struct Device {
    name: &'static str,
    knob: Knob,
    location: Location,
    address: Option<u8>,
    init: Option<InitFn>,
    /// Taken out for the duration of a sample call so the closure can read
    /// the registry; `None` only transiently.
    sample: Option<SampleFn>,
    present: bool,
    filter: MedianFilter,
    log: Option<Box<RingLog<LOG_DEPTH>>>,
}

impl Device {
    /// Unique device name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// UI grouping.
    pub fn location(&self) -> Location {
        self.location
    }

    /// Bus address; `None` for virtual devices.
    pub fn address(&self) -> Option<u8> {
        self.address
    }

    /// Current presence flag. Virtual devices report whatever the flag
    /// says but are sampled regardless of it.
    pub fn is_present(&self) -> bool {
        self.present
    }

    /// Whether the device keeps a history log.
    pub fn has_log(&self) -> bool {
        self.log.is_some()
    }

    /// Display metadata.
    pub fn knob(&self) -> &Knob {
        &self.knob
    }

    /// Current filtered reading.
    pub fn value(&self) -> f32 {
        self.filter.read()
    }

    fn info(&self) -> DeviceInfo {
        DeviceInfo {
            name: self.name,
            location: self.location,
            logged: self.log.is_some(),
            min: self.knob.min,
            max: self.knob.max,
            step: self.knob.step,
            title: self.knob.title,
            unit: self.knob.unit,
        }
    }
}

/// Append-only table of devices plus the passes that keep them fresh.
///
/// Single-writer by construction: all mutation happens on the thread
/// driving the run loop, collaborators only touch the read surface.
#[derive(Default)]
pub struct Registry {
    devices: Vec<Device, MAX_DEVICES>,
    yield_hook: Option<Box<dyn YieldNow>>,
}

impl Registry {
    /// Empty registry.
    pub fn new() -> Self {
        Self {
            devices: Vec::new(),
            yield_hook: None,
        }
    }

    /// Install a cooperative yield hook, called between devices during a
    /// full probe pass.
    pub fn set_yield_hook(&mut self, hook: Box<dyn YieldNow>) {
        self.yield_hook = Some(hook);
    }

    /// Register a device. Fails on a duplicate name (the first
    /// registration stays authoritative) or a full table; either way the
    /// call is a no-op on failure.
    pub fn register(&mut self, spec: DeviceSpec) -> RegistryResult<()> {
        if self.index_of(spec.name).is_some() {
            #[cfg(feature = "log")]
            log::warn!("registry: duplicate device name {:?}", spec.name);
            return Err(RegistryError::DuplicateName);
        }

        let device = Device {
            name: spec.name,
            knob: spec.knob,
            location: spec.location,
            address: spec.address,
            init: spec.init,
            sample: Some(spec.sample),
            present: false,
            filter: MedianFilter::new(spec.filter_window),
            log: spec.logged.then(|| Box::new(RingLog::new())),
        };

        self.devices
            .push(device)
            .map_err(|_| RegistryError::TableFull)
    }

    /// Number of registered devices.
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Look up a device by exact name.
    pub fn find(&self, name: &str) -> Option<&Device> {
        self.index_of(name).map(|index| &self.devices[index])
    }

    /// Force the presence flag on without probing. Manual override.
    pub fn enable(&mut self, name: &str) {
        if let Some(index) = self.index_of(name) {
            self.devices[index].present = true;
        }
    }

    /// Force the presence flag off without probing.
    pub fn disable(&mut self, name: &str) {
        if let Some(index) = self.index_of(name) {
            self.devices[index].present = false;
        }
    }

    /// Current filtered reading of `name`, or `0.0` for an unknown name.
    pub fn value(&self, name: &str) -> f32 {
        self.find(name).map(Device::value).unwrap_or(0.0)
    }

    /// Presence flag of `name`, or `false` for an unknown name.
    pub fn is_present(&self, name: &str) -> bool {
        self.find(name).map(Device::is_present).unwrap_or(false)
    }

    /// Presence flags of every device, newest registration first.
    pub fn statuses(&self) -> impl Iterator<Item = (&'static str, bool)> + '_ {
        self.devices.iter().rev().map(|d| (d.name, d.present))
    }

    /// Chronological history of `name`; `None` when the device is unknown
    /// or keeps no log.
    pub fn log_of(&self, name: &str) -> Option<RingLogIter<'_, LOG_DEPTH>> {
        self.find(name).and_then(|d| d.log.as_ref()).map(|l| l.iter())
    }

    /// Chronological histories of every logging device, newest
    /// registration first. Devices without a log contribute nothing.
    pub fn logs(
        &self,
    ) -> impl Iterator<Item = (&'static str, RingLogIter<'_, LOG_DEPTH>)> + '_ {
        self.devices
            .iter()
            .rev()
            .filter_map(|d| d.log.as_ref().map(|l| (d.name, l.iter())))
    }

    /// Static display metadata of every device, newest registration first.
    pub fn describe_all(&self) -> impl Iterator<Item = DeviceInfo> + '_ {
        self.devices.iter().rev().map(Device::info)
    }

    /// Sample one device by name. Unknown names are ignored.
    pub fn sample_one(&mut self, name: &str) {
        if let Some(index) = self.index_of(name) {
            self.sample_index(index);
        }
    }

    /// Sample every sampleable device, newest registration first.
    pub fn sample_all(&mut self) {
        for index in (0..self.devices.len()).rev() {
            self.sample_index(index);
        }
    }

    /// Probe one bus-addressed device by name. Virtual devices and unknown
    /// names are ignored.
    pub fn probe_one(&mut self, name: &str, probe: &mut dyn PresenceProbe) {
        if let Some(index) = self.index_of(name) {
            self.probe_index(index, probe);
        }
    }

    /// Presence-probe every bus-addressed device, newest registration
    /// first, yielding to the host between devices.
    pub fn probe_all(&mut self, probe: &mut dyn PresenceProbe) {
        for index in (0..self.devices.len()).rev() {
            self.probe_index(index, probe);
            self.breathe();
        }
    }

    /// Roll the filtered value of one logging device into its log.
    pub fn log_one(&mut self, name: &str) {
        if let Some(index) = self.index_of(name) {
            self.log_index(index);
        }
    }

    /// Roll every logging device's filtered value into its log.
    pub fn log_all(&mut self) {
        for index in (0..self.devices.len()).rev() {
            self.log_index(index);
        }
    }

    /// Most-recently-registered match, mirroring the lookup order of the
    /// sampling passes. Names are unique, so at most one entry matches.
    fn index_of(&self, name: &str) -> Option<usize> {
        self.devices.iter().rposition(|d| d.name == name)
    }

    fn sample_index(&mut self, index: usize) {
        let dev = &mut self.devices[index];
        // Absent bus device: skipped entirely, filter left untouched.
        if dev.address.is_some() && !dev.present {
            return;
        }
        let Some(mut sample) = dev.sample.take() else {
            return;
        };

        // The closure sees the registry read-only, so derived devices can
        // read their dependencies' filtered values here.
        let mut raw = sample(&*self);

        let dev = &mut self.devices[index];
        dev.sample = Some(sample);
        if raw.is_nan() {
            #[cfg(feature = "log")]
            log::warn!("registry: non-numeric sample from {:?}", dev.name);
            dev.present = false;
            raw = 0.0;
        }
        dev.filter.push(raw);
    }

    fn probe_index(&mut self, index: usize, probe: &mut dyn PresenceProbe) {
        let dev = &mut self.devices[index];
        let Some(address) = dev.address else {
            return;
        };
        let was_present = dev.present;
        dev.present = probe.probe(address);
        if !was_present && dev.present {
            #[cfg(feature = "log")]
            log::info!("registry: {:?} answered at 0x{:02x}", dev.name, address);
            if let Some(init) = dev.init.as_mut() {
                init();
            }
        }
        // Present-to-absent is silent: no teardown hook, the next probe
        // pass may bring the device back.
    }

    fn log_index(&mut self, index: usize) {
        let dev = &mut self.devices[index];
        if dev.log.is_some() {
            let value = dev.filter.read();
            if let Some(log) = dev.log.as_mut() {
                log.push(value);
            }
        }
    }

    fn breathe(&mut self) {
        if let Some(hook) = self.yield_hook.as_mut() {
            hook.yield_now();
        }
    }
}
