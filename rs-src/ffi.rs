//! Entry points exported to the host.
//!
//! On `wasm32` the cart exports a single `upd` that renders straight into
//! the console framebuffer at `FRAMEBUFFER_ADDR`. Native hosts link the
//! static library and either let it own the framebuffer (`tunnel_upd` plus
//! `tunnel_framebuffer`) or hand over their own buffer (`tunnel_draw`).

#[cfg(target_arch = "wasm32")]
#[no_mangle]
pub extern fn upd() {
    use crate::bridge::HostImports;
    use crate::framebuffer::{FramebufferView, Resolution, FRAMEBUFFER_ADDR};
    use crate::kernel;

    // The console reserves this region for us, see FRAMEBUFFER_ADDR
    let view = unsafe { FramebufferView::from_raw_parts(FRAMEBUFFER_ADDR as *mut u8, Resolution::DEFAULT) };
    if let Ok(mut fb) = view {
        kernel::render_frame(&HostImports, &mut fb);
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use self::native::*;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::sync::{Mutex, MutexGuard, PoisonError};

    use tracing::error;

    use crate::bridge::StdPrimitives;
    use crate::config::RenderConfig;
    use crate::error::Result;
    use crate::framebuffer::{Framebuffer, FramebufferView, Resolution, FRAMEBUFFER_LEN};
    use crate::kernel::FrameTime;
    use crate::renderer::Renderer;

    struct Tunnel {
        renderer: Renderer<StdPrimitives>,
        framebuffer: Framebuffer,
    }

    lazy_static! {
        static ref TUNNEL: Mutex<Tunnel> = {
            Mutex::new(Tunnel {
                renderer: Renderer::new(StdPrimitives::new(), RenderConfig::from_env()),
                framebuffer: Framebuffer::new(),
            })
        };
    }

    fn tunnel() -> MutexGuard<'static, Tunnel> {
        // A panicking frame leaves nothing half-updated that the next
        // full sweep would not overwrite
        TUNNEL.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn upd(tunnel: &mut Tunnel) -> FrameTime {
        let Tunnel { ref mut renderer, ref mut framebuffer } = *tunnel;
        renderer.render(&mut framebuffer.view())
    }

    /// Renders one frame into the library-owned 320x240 framebuffer.
    #[no_mangle]
    pub extern fn tunnel_upd() {
        upd(&mut tunnel());
    }

    /// Start of the library-owned framebuffer. Read it only between calls to
    /// `tunnel_upd`.
    #[no_mangle]
    pub extern fn tunnel_framebuffer() -> *const u8 {
        tunnel().framebuffer.as_ptr()
    }

    #[no_mangle]
    pub extern fn tunnel_framebuffer_len() -> usize {
        FRAMEBUFFER_LEN
    }

    /// Renders into a host buffer of `w * h` bytes at host time `time`.
    #[no_mangle]
    pub extern fn tunnel_draw(w: i32, h: i32, fb: *mut u8, time: f64) {
        if let Err(e) = draw(w, h, fb, time) {
            error!("tunnel_draw({}, {}): {}", w, h, e);
        }
    }

    fn draw(w: i32, h: i32, fb: *mut u8, time: f64) -> Result<()> {
        let res = Resolution::new(w.max(0) as usize, h.max(0) as usize)?;
        let mut view = unsafe { FramebufferView::from_raw_parts(fb, res)? };
        tunnel().renderer.render_at(&mut view, FrameTime::from_host(time as f32));
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::bridge::FrozenClock;
        use crate::kernel;
        use std::slice;

        #[test]
        fn draw_into_host_buffer() {
            let res = Resolution::new(40, 30).unwrap();
            let mut buf = vec![0xaau8; res.pixel_count()];
            tunnel_draw(40, 30, buf.as_mut_ptr(), 1.0);

            let host = FrozenClock::new(1.0);
            let t = FrameTime::sample(&host);
            for (idx, &px) in buf.iter().enumerate() {
                assert_eq!(px, kernel::shade(idx, res, t, &host));
            }
        }

        #[test]
        fn draw_rejects_bad_arguments() {
            let mut buf = vec![0u8; 4];
            assert!(draw(0, 4, buf.as_mut_ptr(), 0.0).is_err());
            assert!(draw(-2, 2, buf.as_mut_ptr(), 0.0).is_err());
            assert!(draw(2, 2, std::ptr::null_mut(), 0.0).is_err());
            // Logged, not propagated
            tunnel_draw(2, 2, std::ptr::null_mut(), 0.0);
        }

        #[test]
        fn owned_framebuffer_is_overwritten() {
            let mut guard = tunnel();
            guard.framebuffer.fill(0x5a);
            let t = upd(&mut guard);

            let res = Resolution::DEFAULT;
            let host = FrozenClock::new(0.0);
            for (idx, &px) in guard.framebuffer.as_bytes().iter().enumerate() {
                assert_eq!(px, kernel::shade(idx, res, t, &host));
            }
        }

        #[test]
        fn framebuffer_hand_off() {
            let ptr = tunnel_framebuffer();
            assert_eq!(ptr, tunnel().framebuffer.as_ptr());
            assert_eq!(tunnel_framebuffer_len(), 320 * 240);

            tunnel_upd();
            let pixels = unsafe { slice::from_raw_parts(ptr, tunnel_framebuffer_len()) };
            assert_eq!(pixels.len(), FRAMEBUFFER_LEN);
        }
    }
}
