//! Math and timing primitives the host hands to the kernel.

/// The two host services the kernel depends on.
///
/// `angle` follows the two-argument arctangent convention (`x.atan2(y)`);
/// whatever it returns at the origin, NaN included, is accepted. `now` is
/// elapsed host time in host-defined units and must never decrease.
pub trait HostPrimitives {
    fn angle(&self, x: f32, y: f32) -> f32;
    fn now(&self) -> f32;
}

impl<'a, H: HostPrimitives + ?Sized> HostPrimitives for &'a H {
    fn angle(&self, x: f32, y: f32) -> f32 {
        (**self).angle(x, y)
    }

    fn now(&self) -> f32 {
        (**self).now()
    }
}

/// Native host: std `atan2`, seconds since construction on a monotonic clock.
#[derive(Debug, Clone, Copy)]
pub struct StdPrimitives {
    start: f64,
}

impl StdPrimitives {
    pub fn new() -> StdPrimitives {
        StdPrimitives { start: time::precise_time_s() }
    }
}

impl Default for StdPrimitives {
    fn default() -> StdPrimitives {
        StdPrimitives::new()
    }
}

impl HostPrimitives for StdPrimitives {
    fn angle(&self, x: f32, y: f32) -> f32 {
        x.atan2(y)
    }

    fn now(&self) -> f32 {
        (time::precise_time_s() - self.start) as f32
    }
}

/// Clock stopped at a fixed host time. Used for reproducible frames and for
/// hosts that pass time in explicitly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrozenClock {
    now: f32,
}

impl FrozenClock {
    pub fn new(now: f32) -> FrozenClock {
        FrozenClock { now }
    }
}

impl HostPrimitives for FrozenClock {
    fn angle(&self, x: f32, y: f32) -> f32 {
        x.atan2(y)
    }

    fn now(&self) -> f32 {
        self.now
    }
}

/// Primitives backed by a pair of closures.
pub struct HostFns<A, N> {
    angle: A,
    now: N,
}

impl<A, N> HostFns<A, N>
where
    A: Fn(f32, f32) -> f32,
    N: Fn() -> f32,
{
    pub fn new(angle: A, now: N) -> HostFns<A, N> {
        HostFns { angle, now }
    }
}

impl<A, N> HostPrimitives for HostFns<A, N>
where
    A: Fn(f32, f32) -> f32,
    N: Fn() -> f32,
{
    fn angle(&self, x: f32, y: f32) -> f32 {
        (self.angle)(x, y)
    }

    fn now(&self) -> f32 {
        (self.now)()
    }
}

#[cfg(target_arch = "wasm32")]
#[link(wasm_import_module = "env")]
extern "C" {
    #[link_name = "atan2"]
    fn host_atan2(x: f32, y: f32) -> f32;
    #[link_name = "time"]
    fn host_time() -> f32;
}

/// Console imports. Unresolved imports fail module instantiation, so a
/// running cart can always call them.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct HostImports;

#[cfg(target_arch = "wasm32")]
impl HostPrimitives for HostImports {
    fn angle(&self, x: f32, y: f32) -> f32 {
        unsafe { host_atan2(x, y) }
    }

    fn now(&self) -> f32 {
        unsafe { host_time() }
    }
}
