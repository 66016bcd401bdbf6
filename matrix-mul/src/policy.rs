//! How many workers the machine can take right now.

use std::time::Duration;

use sysinfo::{CpuRefreshKind, MINIMUM_CPU_UPDATE_INTERVAL, RefreshKind, System};

/// Decides the upper bound on concurrently running workers.
pub trait WorkerPolicy {
    fn max_workers(&self) -> usize;
}

/// Always allows the same number of workers.
#[derive(Debug, Clone, Copy)]
pub struct FixedPolicy(pub usize);

impl WorkerPolicy for FixedPolicy {
    fn max_workers(&self) -> usize {
        self.0.max(1)
    }
}

/// Scales the core count by the fraction of CPU currently idle.
///
/// `max_workers` blocks for the sampling window.
#[derive(Debug, Clone, Copy)]
pub struct CpuLoadPolicy {
    sample: Duration,
}

impl CpuLoadPolicy {
    pub fn new(sample: Duration) -> Self {
        Self {
            sample: sample.max(MINIMUM_CPU_UPDATE_INTERVAL),
        }
    }
}

impl Default for CpuLoadPolicy {
    fn default() -> Self {
        Self::new(MINIMUM_CPU_UPDATE_INTERVAL)
    }
}

impl WorkerPolicy for CpuLoadPolicy {
    fn max_workers(&self) -> usize {
        let mut system = System::new_with_specifics(
            RefreshKind::new().with_cpu(CpuRefreshKind::new().with_cpu_usage()),
        );
        std::thread::sleep(self.sample);
        system.refresh_cpu_usage();

        let cpus = system.cpus();
        if cpus.is_empty() {
            return available_workers(fallback_cores(), 0.0);
        }
        let usage: f64 = cpus.iter().map(|cpu| f64::from(cpu.cpu_usage())).sum();
        let load = usage / cpus.len() as f64 / 100.0;
        available_workers(cpus.len(), load)
    }
}

fn fallback_cores() -> usize {
    std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1)
}

/// `max(1, floor(cores * (1 - load)))`, with `load` clamped to `[0, 1]`.
pub fn available_workers(cores: usize, load: f64) -> usize {
    let idle = 1.0 - load.clamp(0.0, 1.0);
    ((cores as f64 * idle).floor() as usize).max(1)
}

/// Clamps an operator request into `1..=max_workers`.
pub fn clamp_workers(requested: usize, max_workers: usize) -> usize {
    requested.clamp(1, max_workers.max(1))
}
