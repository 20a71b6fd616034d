use std::slice;

use crate::error::{Result, TunnelError};

pub const WIDTH: usize = 320;
pub const HEIGHT: usize = 240;
pub const FRAMEBUFFER_LEN: usize = WIDTH * HEIGHT;

/// Offset of the framebuffer inside the cart's linear memory. The bytes below
/// it are reserved by the console for time and input registers.
///
/// By default rustc's wasm linker puts a 1 MiB stack at the bottom of memory,
/// on top of the framebuffer and larger than the whole cart memory. A cart
/// has to be linked with
///
/// ```text
/// -C link-arg=--import-memory
/// -C link-arg=--no-stack-first
/// -C link-arg=--global-base=77824      (CART_GLOBAL_BASE)
/// -C link-arg=-zstack-size=65536       (CART_STACK_SIZE)
/// -C link-arg=--initial-memory=262144  (CART_MEMORY_SIZE)
/// -C link-arg=--max-memory=262144
/// ```
///
/// so data and stack sit above the framebuffer. `.cargo/config.toml` sets
/// these for `wasm32-unknown-unknown`.
pub const FRAMEBUFFER_ADDR: usize = 120;

/// First byte of the cart's own data, page aligned above the framebuffer
pub const CART_GLOBAL_BASE: usize = 77824;
pub const CART_STACK_SIZE: usize = 64 * 1024;
/// Linear memory the console gives a cart: 4 wasm pages
pub const CART_MEMORY_SIZE: usize = 4 * 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
    width: usize,
    height: usize,
}

impl Resolution {
    pub const DEFAULT: Resolution = Resolution { width: WIDTH, height: HEIGHT };

    pub fn new(width: usize, height: usize) -> Result<Resolution> {
        if width == 0 || height == 0 {
            return Err(TunnelError::ZeroResolution { width, height });
        }
        // Centered coordinates are computed in i32
        match width.checked_mul(height) {
            Some(n) if n <= i32::MAX as usize => Ok(Resolution { width, height }),
            _ => Err(TunnelError::ResolutionTooLarge { width, height }),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Pixel position of a row-major index, origin at the screen center.
    pub fn centered(&self, idx: usize) -> (i32, i32) {
        let x = (idx % self.width) as i32 - (self.width / 2) as i32;
        let y = (idx / self.width) as i32 - (self.height / 2) as i32;
        (x, y)
    }

    /// Inverse of `centered`, `None` when the position falls off screen.
    pub fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        let col = x + (self.width / 2) as i32;
        let row = y + (self.height / 2) as i32;
        if col < 0 || row < 0 || col as usize >= self.width || row as usize >= self.height {
            return None;
        }
        Some(col as usize + row as usize * self.width)
    }
}

impl Default for Resolution {
    fn default() -> Resolution {
        Resolution::DEFAULT
    }
}

// Word aligned so hosts can blit it as u32s
#[repr(C, align(4))]
struct Pixels([u8; FRAMEBUFFER_LEN]);

/// Owned 320x240 framebuffer, the region handed to the host after each frame.
pub struct Framebuffer {
    pixels: Box<Pixels>,
}

impl Framebuffer {
    pub fn new() -> Framebuffer {
        Framebuffer { pixels: Box::new(Pixels([0; FRAMEBUFFER_LEN])) }
    }

    pub fn resolution(&self) -> Resolution {
        Resolution::DEFAULT
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels.0
    }

    /// Start of the region for the host hand-off. Valid for `FRAMEBUFFER_LEN`
    /// bytes while `self` is alive and not being rendered into.
    pub fn as_ptr(&self) -> *const u8 {
        self.pixels.0.as_ptr()
    }

    pub fn fill(&mut self, value: u8) {
        for px in self.pixels.0.iter_mut() {
            *px = value;
        }
    }

    pub fn view(&mut self) -> FramebufferView<'_> {
        FramebufferView { pixels: &mut self.pixels.0, resolution: Resolution::DEFAULT }
    }
}

impl Default for Framebuffer {
    fn default() -> Framebuffer {
        Framebuffer::new()
    }
}

/// Mutable, bounds-checked window over a row-major byte framebuffer whose
/// length always equals `resolution.pixel_count()`.
pub struct FramebufferView<'a> {
    pixels: &'a mut [u8],
    resolution: Resolution,
}

impl<'a> FramebufferView<'a> {
    pub fn new(pixels: &'a mut [u8], resolution: Resolution) -> Result<FramebufferView<'a>> {
        if pixels.len() != resolution.pixel_count() {
            return Err(TunnelError::BufferSizeMismatch {
                expected: resolution.pixel_count(),
                actual: pixels.len(),
            });
        }
        Ok(FramebufferView { pixels, resolution })
    }

    /// Wraps memory owned by the host.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for writes of `resolution.pixel_count()` bytes for
    /// `'a`, and nothing else may access that memory while the view lives.
    pub unsafe fn from_raw_parts(ptr: *mut u8, resolution: Resolution) -> Result<FramebufferView<'a>> {
        if ptr.is_null() {
            return Err(TunnelError::NullFramebuffer);
        }
        Ok(FramebufferView {
            pixels: slice::from_raw_parts_mut(ptr, resolution.pixel_count()),
            resolution,
        })
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<u8> {
        self.pixels.get(idx).copied()
    }

    /// Byte at a screen-centered position.
    pub fn pixel(&self, x: i32, y: i32) -> Option<u8> {
        self.resolution.index_of(x, y).and_then(|idx| self.get(idx))
    }

    pub fn as_slice(&self) -> &[u8] {
        &*self.pixels
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut *self.pixels
    }
}
