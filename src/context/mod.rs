//! GLX context bootstrap.
//!
//! Creates a modern-versioned rendering context against the window's
//! framebuffer config, falling back to the oldest selectable version when
//! the driver refuses, then makes it current and loads the GL entry points.

use std::ffi::CString;
use std::os::raw::{c_int, c_void};
use std::ptr;

use anyhow::{bail, Result};
use x11::glx;
use x11::glx::arb;
use x11::xlib;

use crate::window::XWindow;

type GlXCreateContextAttribsArb = unsafe extern "C" fn(
    display: *mut xlib::Display,
    fb_config: glx::GLXFBConfig,
    shared: glx::GLXContext,
    direct: xlib::Bool,
    attributes: *const c_int,
) -> glx::GLXContext;

/// The GPU command context, current on the calling thread after `create`.
pub struct GlContext {
    display: *mut xlib::Display,
    context: glx::GLXContext,
    direct: bool,
}

impl GlContext {
    /// Creates and makes current a context for `window`.
    ///
    /// Requests GL 4.5 with a compatibility profile, and on failure retries
    /// with version 1.0 attributes, which makes the platform return the
    /// newest context compatible with pre-3.0 semantics.
    pub fn create(window: &XWindow) -> Result<Self> {
        let display = window.display();
        let create_context = resolve_create_context()?;

        let modern: [c_int; 7] = [
            arb::GLX_CONTEXT_MAJOR_VERSION_ARB,
            4,
            arb::GLX_CONTEXT_MINOR_VERSION_ARB,
            5,
            arb::GLX_CONTEXT_PROFILE_MASK_ARB,
            arb::GLX_CONTEXT_COMPATIBILITY_PROFILE_BIT_ARB,
            0,
        ];

        let mut context = unsafe {
            create_context(
                display,
                window.fb_config(),
                ptr::null_mut(),
                xlib::True,
                modern.as_ptr(),
            )
        };

        if context.is_null() {
            log::warn!("no GL 4.5 context available, falling back to the oldest version");

            let legacy: [c_int; 5] = [
                arb::GLX_CONTEXT_MAJOR_VERSION_ARB,
                1,
                arb::GLX_CONTEXT_MINOR_VERSION_ARB,
                0,
                0,
            ];

            context = unsafe {
                create_context(
                    display,
                    window.fb_config(),
                    ptr::null_mut(),
                    xlib::True,
                    legacy.as_ptr(),
                )
            };
        } else {
            log::info!("GL 4.5 context created");
        }

        if context.is_null() {
            bail!("unable to create any GLX context");
        }

        let direct = unsafe { glx::glXIsDirect(display, context) } != 0;
        if direct {
            log::info!("direct GLX rendering context, hardware rendering available");
        } else {
            log::info!("indirect GLX rendering context");
        }

        unsafe {
            glx::glXMakeCurrent(display, window.drawable(), context);
        }

        load_gl_entry_points()?;

        let context = Self {
            display,
            context,
            direct,
        };
        context.log_extensions();

        Ok(context)
    }

    /// Whether the context renders directly on hardware. Logged at creation;
    /// never alters control flow.
    pub fn is_direct(&self) -> bool {
        self.direct
    }

    /// Clears currency (only if this context is the thread's current one)
    /// and destroys the context. Idempotent.
    pub fn release(&mut self) {
        if self.context.is_null() {
            return;
        }

        unsafe {
            let current = glx::glXGetCurrentContext();
            if current == self.context {
                glx::glXMakeCurrent(self.display, 0, ptr::null_mut());
            }

            glx::glXDestroyContext(self.display, self.context);
        }

        self.context = ptr::null_mut();
        self.display = ptr::null_mut();
    }

    fn log_extensions(&self) {
        let mut count: gl::types::GLint = 0;
        unsafe {
            gl::GetIntegerv(gl::NUM_EXTENSIONS, &mut count);
        }

        log::info!("extension count: {count}");

        for i in 0..count {
            let name = unsafe { gl::GetStringi(gl::EXTENSIONS, i as gl::types::GLuint) };
            if !name.is_null() {
                let name = unsafe { std::ffi::CStr::from_ptr(name.cast()) };
                log::debug!("extension {}: {}", i + 1, name.to_string_lossy());
            }
        }
    }
}

impl Default for GlContext {
    /// A released context; safe to drop or release again.
    fn default() -> Self {
        Self {
            display: ptr::null_mut(),
            context: ptr::null_mut(),
            direct: false,
        }
    }
}

impl Drop for GlContext {
    fn drop(&mut self) {
        self.release();
    }
}

fn resolve_create_context() -> Result<GlXCreateContextAttribsArb> {
    let address =
        unsafe { glx::glXGetProcAddressARB(c"glXCreateContextAttribsARB".as_ptr().cast()) };

    match address {
        Some(f) => Ok(unsafe {
            std::mem::transmute::<unsafe extern "C" fn(), GlXCreateContextAttribsArb>(f)
        }),
        None => bail!("glXCreateContextAttribsARB is not available"),
    }
}

/// Resolves the GL entry points through GLX and verifies the load took.
fn load_gl_entry_points() -> Result<()> {
    gl::load_with(|symbol| {
        let symbol = CString::new(symbol).unwrap();
        match unsafe { glx::glXGetProcAddressARB(symbol.as_ptr().cast()) } {
            Some(f) => f as *const c_void,
            None => ptr::null(),
        }
    });

    // A context that cannot even clear is unusable; treat it the same as a
    // failed loader initialization.
    if !gl::Viewport::is_loaded() || !gl::CreateShader::is_loaded() {
        bail!("failed to load core OpenGL entry points");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_on_default_context_is_noop() {
        let mut context = GlContext::default();
        context.release();
        context.release();

        assert!(context.context.is_null());
        assert!(context.display.is_null());
    }
}
