//! Frame renderer that spreads the sweep over a thread pool.
//!
//! Pixels do not depend on each other, so the framebuffer is cut into bands
//! of whole rows and each band is shaded on its own worker. Time is sampled
//! once before the bands are handed out and the pool is joined before
//! `render` returns.

use std::convert::TryFrom;

use scoped_threadpool::Pool;
use tracing::{debug, trace};

use crate::bridge::HostPrimitives;
use crate::config::RenderConfig;
use crate::framebuffer::{FramebufferView, Resolution};
use crate::kernel::{self, FrameTime};

pub struct Renderer<H> {
    host: H,
    config: RenderConfig,
    pool: Option<Pool>,
}

impl<H: HostPrimitives + Sync> Renderer<H> {
    pub fn new(host: H, config: RenderConfig) -> Renderer<H> {
        // Single worker renders inline, no pool threads at all
        let pool = if config.workers() > 1 {
            let workers = u32::try_from(config.workers()).unwrap_or(u32::MAX);
            debug!(workers, "starting render pool");
            Some(Pool::new(workers))
        } else {
            None
        };
        Renderer { host, config, pool }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Threads rendering a frame, 1 when rendering inline.
    pub fn workers(&self) -> usize {
        self.pool.as_ref().map_or(1, |pool| pool.thread_count() as usize)
    }

    /// Samples host time and renders one frame into `fb`.
    pub fn render(&mut self, fb: &mut FramebufferView) -> FrameTime {
        let t = FrameTime::sample(&self.host);
        self.render_at(fb, t);
        t
    }

    /// Renders one frame at an already sampled time.
    pub fn render_at(&mut self, fb: &mut FramebufferView, t: FrameTime) {
        let res = fb.resolution();
        let host = &self.host;
        trace!(time = t.scaled(), width = res.width(), height = res.height(), "rendering frame");

        match self.pool {
            Some(ref mut pool) => {
                let band = band_len(res, pool.thread_count() as usize);
                pool.scoped(|scope| {
                    for (n, span) in fb.as_mut_slice().chunks_mut(band).enumerate() {
                        scope.execute(move || kernel::shade_span(span, n * band, res, t, host));
                    }
                });
            }
            None => kernel::shade_span(fb.as_mut_slice(), 0, res, t, host),
        }
    }
}

/// Bytes per band: the rows split evenly over the workers, rounded up.
fn band_len(res: Resolution, workers: usize) -> usize {
    let workers = workers.max(1);
    let rows = (res.height() + workers - 1) / workers;
    rows.max(1) * res.width()
}
