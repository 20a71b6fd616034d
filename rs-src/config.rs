use std::env;

use tracing::warn;

/// Environment variable overriding the worker count
pub const WORKERS_ENV: &str = "XOR_TUNNEL_WORKERS";

/// Pool threads allowed per logical CPU
pub const WORKERS_PER_CPU: usize = 4;

/// Renderer settings. The framebuffer resolution is not part of it: each
/// frame renders at the resolution of the view it is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    workers: usize,
}

impl Default for RenderConfig {
    fn default() -> RenderConfig {
        RenderConfig { workers: num_cpus::get().max(1) }
    }
}

impl RenderConfig {
    /// Defaults, with the worker count taken from `XOR_TUNNEL_WORKERS` when
    /// it holds a positive integer.
    pub fn from_env() -> RenderConfig {
        let config = RenderConfig::default();
        match env::var(WORKERS_ENV) {
            Ok(value) => match parse_workers(&value) {
                Some(workers) => config.with_workers(workers),
                None => {
                    warn!(value = %value, "ignoring invalid {}", WORKERS_ENV);
                    config
                }
            },
            Err(_) => config,
        }
    }

    /// Zero is treated as one, anything above `max_workers()` is capped.
    pub fn with_workers(mut self, workers: usize) -> RenderConfig {
        let capped = workers.max(1).min(max_workers());
        if capped != workers {
            warn!(requested = workers, workers = capped, "adjusted render worker count");
        }
        self.workers = capped;
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}

/// Upper bound on render workers for this machine.
pub fn max_workers() -> usize {
    num_cpus::get().max(1).saturating_mul(WORKERS_PER_CPU)
}

fn parse_workers(value: &str) -> Option<usize> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Some(n),
        _ => None,
    }
}
