//! The XOR tunnel: a palette index per pixel from its distance and angle to
//! the screen center, scrolled by time.

use std::f32::consts::PI;

use na::Vector2;

use crate::bridge::HostPrimitives;
use crate::framebuffer::{FramebufferView, Resolution};

pub const TIME_SCALE: f32 = 63.0;
pub const RADIAL_SCALE: f32 = 40000.0;
pub const ANGLE_SCALE: f32 = 512.0;
/// The radial term scrolls twice as fast as the angular one
pub const RADIAL_SPEED: f32 = 2.0;
pub const SHADE_SHIFT: u32 = 4;

/// Host time scaled for the kernel. Sampled once per frame and shared by
/// every pixel of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime(f32);

impl FrameTime {
    pub fn sample<H: HostPrimitives + ?Sized>(host: &H) -> FrameTime {
        FrameTime::from_host(host.now())
    }

    pub fn from_host(now: f32) -> FrameTime {
        FrameTime(now * TIME_SCALE)
    }

    pub fn scaled(self) -> f32 {
        self.0
    }
}

/// Real to integer conversion used for both terms.
///
/// Truncates toward zero and saturates: `+inf` and anything above the range
/// give `i32::MAX`, `-inf` and anything below give `i32::MIN`, NaN gives 0.
/// This holds on every target, so the center pixel (where the radial term
/// divides by zero) renders the same everywhere.
#[inline]
pub fn to_int(v: f32) -> i32 {
    v as i32
}

/// The two integer terms XOR-ed together into a color byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Terms {
    pub radial: i32,
    pub angular: i32,
}

impl Terms {
    #[inline]
    pub fn color(self) -> u8 {
        // Arithmetic shift, then keep the low byte
        ((self.radial ^ self.angular) >> SHADE_SHIFT) as u8
    }
}

#[inline]
pub fn position(idx: usize, res: Resolution) -> Vector2<f32> {
    let (x, y) = res.centered(idx);
    Vector2::new(x as f32, y as f32)
}

#[inline]
pub fn terms<H: HostPrimitives + ?Sized>(idx: usize, res: Resolution, t: FrameTime, host: &H) -> Terms {
    let p = position(idx, res);
    let d = RADIAL_SCALE / p.norm();
    let u = host.angle(p.x, p.y) * ANGLE_SCALE / PI;
    Terms {
        radial: to_int(d + t.0 * RADIAL_SPEED),
        angular: to_int(u + t.0),
    }
}

#[inline]
pub fn shade<H: HostPrimitives + ?Sized>(idx: usize, res: Resolution, t: FrameTime, host: &H) -> u8 {
    terms(idx, res, t, host).color()
}

/// Shades a contiguous run of pixels starting at index `first`.
pub fn shade_span<H: HostPrimitives + ?Sized>(
    span: &mut [u8],
    first: usize,
    res: Resolution,
    t: FrameTime,
    host: &H,
) {
    for (n, px) in span.iter_mut().enumerate() {
        *px = shade(first + n, res, t, host);
    }
}

/// Renders one full frame on the calling thread and returns the time it was
/// rendered at. Every byte of `fb` is overwritten.
pub fn render_frame<H: HostPrimitives + ?Sized>(host: &H, fb: &mut FramebufferView) -> FrameTime {
    let t = FrameTime::sample(host);
    let res = fb.resolution();
    shade_span(fb.as_mut_slice(), 0, res, t, host);
    t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{FrozenClock, HostFns};

    const CENTER: usize = 120 * 320 + 160;

    #[test]
    fn cast_policy() {
        assert_eq!(to_int(f32::INFINITY), i32::MAX);
        assert_eq!(to_int(f32::NEG_INFINITY), i32::MIN);
        assert_eq!(to_int(f32::NAN), 0);
        assert_eq!(to_int(3.0e10), i32::MAX);
        assert_eq!(to_int(-3.0e10), i32::MIN);
        assert_eq!(to_int(-360.87), -360);
        assert_eq!(to_int(200.9), 200);
    }

    #[test]
    fn color_shifts_arithmetically() {
        assert_eq!(Terms { radial: 200, angular: -360 }.color(), 229);
        assert_eq!(Terms { radial: i32::MAX, angular: 0 }.color(), 0xff);
        assert_eq!(Terms { radial: 0x1230, angular: 0 }.color(), 0x23);
    }

    #[test]
    fn golden_top_left() {
        let res = Resolution::DEFAULT;
        let host = FrozenClock::new(0.0);
        let t = FrameTime::sample(&host);
        assert_eq!(terms(0, res, t, &host), Terms { radial: 200, angular: -360 });
        assert_eq!(shade(0, res, t, &host), 229);

        let host = FrozenClock::new(1.0);
        let t = FrameTime::sample(&host);
        assert_eq!(t.scaled(), 63.0);
        assert_eq!(terms(0, res, t, &host), Terms { radial: 326, angular: -297 });
        assert_eq!(shade(0, res, t, &host), 249);
    }

    #[test]
    fn center_pixel_saturates() {
        let res = Resolution::DEFAULT;
        let host = FrozenClock::new(0.0);
        let t = FrameTime::sample(&host);
        assert_eq!(terms(CENTER, res, t, &host), Terms { radial: i32::MAX, angular: 0 });
        assert_eq!(shade(CENTER, res, t, &host), 255);
    }

    #[test]
    fn center_pixel_tolerates_nan_angle() {
        let res = Resolution::DEFAULT;
        let host = HostFns::new(
            |x: f32, y: f32| if x == 0.0 && y == 0.0 { f32::NAN } else { x.atan2(y) },
            || 0.5,
        );
        let t = FrameTime::sample(&host);
        let first = shade(CENTER, res, t, &host);
        let again = shade(CENTER, res, t, &host);
        assert_eq!(first, again);
        assert_eq!(terms(CENTER, res, t, &host).angular, 0);
    }

    #[test]
    fn point_symmetric_at_time_zero() {
        let res = Resolution::DEFAULT;
        let host = FrozenClock::new(0.0);
        let t = FrameTime::sample(&host);
        for y in -119..120 {
            for x in -159..160 {
                if x == 0 && y == 0 {
                    continue;
                }
                let a = terms(res.index_of(x, y).unwrap(), res, t, &host);
                let b = terms(res.index_of(-x, -y).unwrap(), res, t, &host);
                assert_eq!(a.radial, b.radial, "radial at ({}, {})", x, y);
                let half_turn = (a.angular - b.angular).abs();
                assert!((half_turn - 512).abs() <= 1, "angular at ({}, {}): {}", x, y, half_turn);
            }
        }
    }

    #[test]
    fn mirror_negates_angle() {
        let res = Resolution::DEFAULT;
        let host = FrozenClock::new(0.0);
        let t = FrameTime::sample(&host);
        for y in -120..120 {
            for x in 1..160 {
                let a = terms(res.index_of(x, y).unwrap(), res, t, &host);
                let b = terms(res.index_of(-x, y).unwrap(), res, t, &host);
                assert_eq!(b, Terms { radial: a.radial, angular: -a.angular });
            }
        }
    }

    #[test]
    fn render_frame_samples_time_once() {
        use std::cell::Cell;

        let calls = Cell::new(0);
        let host = HostFns::new(
            |x: f32, y: f32| x.atan2(y),
            || {
                calls.set(calls.get() + 1);
                calls.get() as f32
            },
        );
        let res = Resolution::new(16, 8).unwrap();
        let mut buf = vec![0u8; res.pixel_count()];
        let mut fb = FramebufferView::new(&mut buf, res).unwrap();
        let t = render_frame(&host, &mut fb);
        assert_eq!(calls.get(), 1);
        assert_eq!(t, FrameTime::from_host(1.0));

        let fixed = FrozenClock::new(1.0);
        for idx in 0..res.pixel_count() {
            assert_eq!(fb.get(idx), Some(shade(idx, res, t, &fixed)));
        }
    }
}
