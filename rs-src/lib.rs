#[macro_use]
extern crate lazy_static;

extern crate nalgebra as na;
extern crate num_cpus;
extern crate scoped_threadpool;
extern crate thiserror;
extern crate time;
extern crate tracing;

pub mod error;
pub mod config;
pub mod framebuffer;
pub mod bridge;
pub mod kernel;
pub mod renderer;
pub mod ffi;

pub use bridge::{FrozenClock, HostFns, HostPrimitives, StdPrimitives};
pub use config::RenderConfig;
pub use error::{Result, TunnelError};
pub use framebuffer::{Framebuffer, FramebufferView, Resolution, FRAMEBUFFER_ADDR, FRAMEBUFFER_LEN, HEIGHT, WIDTH};
pub use kernel::{render_frame, FrameTime, Terms};
pub use renderer::Renderer;
