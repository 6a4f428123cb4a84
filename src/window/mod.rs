//! X11 platform window.
//!
//! Owns the display connection, the chosen framebuffer config and visual,
//! the colormap and the on-screen window. Event decoding stops here; the
//! rest of the crate only sees [`crate::input::Action`] values.

mod select;

pub use select::{pick_best, pick_worst, BestConfigPolicy, Candidate};

use std::ffi::CString;
use std::os::raw::{c_char, c_int, c_long, c_uint};
use std::ptr;

use anyhow::{bail, Context, Result};
use x11::glx;
use x11::xlib;

use crate::core::AppConfig;
use crate::input::{key_action, Action, MouseButton};

/// Required framebuffer attributes: RGBA8, 24-bit depth, 8-bit stencil,
/// double-buffered, true-color, window-drawable, multisample-capable.
const FRAMEBUFFER_ATTRIBUTES: [c_int; 27] = [
    glx::GLX_RED_SIZE,
    8,
    glx::GLX_GREEN_SIZE,
    8,
    glx::GLX_BLUE_SIZE,
    8,
    glx::GLX_ALPHA_SIZE,
    8,
    glx::GLX_DEPTH_SIZE,
    24,
    glx::GLX_STENCIL_SIZE,
    8,
    glx::GLX_DOUBLEBUFFER,
    1,
    glx::GLX_X_RENDERABLE,
    1,
    glx::GLX_X_VISUAL_TYPE,
    glx::GLX_TRUE_COLOR,
    glx::GLX_DRAWABLE_TYPE,
    glx::GLX_WINDOW_BIT,
    glx::GLX_RENDER_TYPE,
    glx::GLX_RGBA_BIT,
    glx::GLX_SAMPLE_BUFFERS,
    1,
    glx::GLX_SAMPLES,
    4,
    0,
];

/// The on-screen surface and everything needed to tear it down.
///
/// All handles use null/zero as a released sentinel, so [`XWindow::release`]
/// is idempotent and safe on a partially constructed value.
pub struct XWindow {
    display: *mut xlib::Display,
    visual: *mut xlib::XVisualInfo,
    colormap: xlib::Colormap,
    window: xlib::Window,
    fb_config: glx::GLXFBConfig,
    wm_delete_window: xlib::Atom,
    width: u32,
    height: u32,
}

impl XWindow {
    /// Opens the display, picks a framebuffer config and creates the window.
    pub fn create(config: &AppConfig) -> Result<Self> {
        let display = unsafe { xlib::XOpenDisplay(ptr::null()) };
        if display.is_null() {
            bail!("unable to open X display");
        }

        let mut window = Self {
            display,
            visual: ptr::null_mut(),
            colormap: 0,
            window: 0,
            fb_config: ptr::null_mut(),
            wm_delete_window: 0,
            width: config.initial_width,
            height: config.initial_height,
        };

        window.fb_config = choose_fb_config(display, config.best_config_policy)?;

        window.visual = unsafe { glx::glXGetVisualFromFBConfig(display, window.fb_config) };
        if window.visual.is_null() {
            bail!("unable to resolve a visual for the chosen framebuffer config");
        }

        log::info!("selected visual id 0x{:x}", unsafe {
            (*window.visual).visualid
        });

        window.create_x_window(config)?;

        Ok(window)
    }

    fn create_x_window(&mut self, config: &AppConfig) -> Result<()> {
        let screen = unsafe { (*self.visual).screen };
        let root = unsafe { xlib::XRootWindow(self.display, screen) };

        let mut attributes: xlib::XSetWindowAttributes = unsafe { std::mem::zeroed() };
        attributes.border_pixel = 0;
        attributes.background_pixel = unsafe { xlib::XBlackPixel(self.display, screen) };
        attributes.colormap = unsafe {
            xlib::XCreateColormap(self.display, root, (*self.visual).visual, xlib::AllocNone)
        };
        attributes.event_mask = xlib::ExposureMask
            | xlib::VisibilityChangeMask
            | xlib::ButtonPressMask
            | xlib::KeyPressMask
            | xlib::PointerMotionMask
            | xlib::StructureNotifyMask;

        self.colormap = attributes.colormap;

        let value_mask =
            xlib::CWBorderPixel | xlib::CWBackPixel | xlib::CWEventMask | xlib::CWColormap;

        self.window = unsafe {
            xlib::XCreateWindow(
                self.display,
                root,
                0,
                0,
                self.width,
                self.height,
                0,
                (*self.visual).depth,
                xlib::InputOutput as c_uint,
                (*self.visual).visual,
                value_mask,
                &mut attributes,
            )
        };

        if self.window == 0 {
            bail!("failed to create main window");
        }

        let title = CString::new(config.title.as_str()).context("window title contains NUL")?;

        unsafe {
            xlib::XStoreName(self.display, self.window, title.as_ptr());

            // Observe the window manager's close affordance.
            self.wm_delete_window =
                xlib::XInternAtom(self.display, c"WM_DELETE_WINDOW".as_ptr(), xlib::True);
            xlib::XSetWMProtocols(self.display, self.window, &mut self.wm_delete_window, 1);

            xlib::XMapWindow(self.display, self.window);
        }

        Ok(())
    }

    /// Drains the pending event queue, mapping each recognized event to an
    /// action. Unrecognized event kinds are silently ignored.
    pub fn pump_events(&mut self, mut apply: impl FnMut(Action)) {
        unsafe {
            while xlib::XPending(self.display) > 0 {
                let mut event: xlib::XEvent = std::mem::zeroed();
                xlib::XNextEvent(self.display, &mut event);

                if let Some(action) = self.map_event(&event) {
                    apply(action);
                }
            }
        }
    }

    fn map_event(&self, event: &xlib::XEvent) -> Option<Action> {
        match event.get_type() {
            xlib::KeyPress => self.map_key_press(event),
            xlib::ButtonPress => {
                let button = xlib::XButtonEvent::from(*event);
                if let Some(button) = MouseButton::from_code(button.button) {
                    log::trace!("button press: {button:?}");
                }
                None
            }
            xlib::ConfigureNotify => {
                let configure = xlib::XConfigureEvent::from(*event);
                Some(Action::Resized {
                    width: configure.width,
                    height: configure.height,
                })
            }
            xlib::ClientMessage => {
                let message = xlib::XClientMessageEvent::from(*event);
                if message.data.get_long(0) as xlib::Atom == self.wm_delete_window {
                    Some(Action::CloseRequested)
                } else {
                    None
                }
            }
            // MapNotify, MotionNotify, Expose and DestroyNotify are delivered
            // but carry no behavior in this scene.
            _ => None,
        }
    }

    fn map_key_press(&self, event: &xlib::XEvent) -> Option<Action> {
        let mut key = xlib::XKeyEvent::from(*event);

        let keysym = unsafe {
            xlib::XkbKeycodeToKeysym(self.display, key.keycode as xlib::KeyCode, 0, 0)
        };

        let mut buffer = [0 as c_char; 32];
        let written = unsafe {
            xlib::XLookupString(
                &mut key,
                buffer.as_mut_ptr(),
                buffer.len() as c_int,
                ptr::null_mut(),
                ptr::null_mut(),
            )
        };

        let ascii = if written > 0 {
            Some(buffer[0] as u8 as char)
        } else {
            None
        };

        key_action(keysym, ascii)
    }

    /// Sends the EWMH fullscreen state change for this window.
    pub fn set_fullscreen(&mut self, fullscreen: bool) {
        unsafe {
            let wm_state = xlib::XInternAtom(self.display, c"_NET_WM_STATE".as_ptr(), xlib::False);
            let wm_fullscreen = xlib::XInternAtom(
                self.display,
                c"_NET_WM_STATE_FULLSCREEN".as_ptr(),
                xlib::False,
            );

            let mut message: xlib::XClientMessageEvent = std::mem::zeroed();
            message.type_ = xlib::ClientMessage;
            message.window = self.window;
            message.message_type = wm_state;
            message.format = 32;
            message.data.set_long(0, if fullscreen { 1 } else { 0 });
            message.data.set_long(1, wm_fullscreen as c_long);

            let root = xlib::XRootWindow(self.display, (*self.visual).screen);
            let mut event = xlib::XEvent::from(message);
            xlib::XSendEvent(
                self.display,
                root,
                xlib::False,
                xlib::StructureNotifyMask,
                &mut event,
            );
        }
    }

    /// Last size reported by the platform.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub(crate) fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub(crate) fn display(&self) -> *mut xlib::Display {
        self.display
    }

    pub(crate) fn fb_config(&self) -> glx::GLXFBConfig {
        self.fb_config
    }

    pub(crate) fn drawable(&self) -> glx::GLXDrawable {
        self.window
    }

    /// Releases window, colormap, visual and display in that order.
    ///
    /// Idempotent; every step is guarded by its handle's sentinel.
    pub fn release(&mut self) {
        if self.display.is_null() {
            return;
        }

        unsafe {
            if self.window != 0 {
                xlib::XDestroyWindow(self.display, self.window);
                self.window = 0;
            }

            if self.colormap != 0 {
                xlib::XFreeColormap(self.display, self.colormap);
                self.colormap = 0;
            }

            if !self.visual.is_null() {
                xlib::XFree(self.visual.cast());
                self.visual = ptr::null_mut();
            }

            xlib::XCloseDisplay(self.display);
            self.display = ptr::null_mut();
        }
    }
}

impl Default for XWindow {
    /// A fully released window; every handle at its sentinel.
    fn default() -> Self {
        Self {
            display: ptr::null_mut(),
            visual: ptr::null_mut(),
            colormap: 0,
            window: 0,
            fb_config: ptr::null_mut(),
            wm_delete_window: 0,
            width: 0,
            height: 0,
        }
    }
}

impl Drop for XWindow {
    fn drop(&mut self) {
        self.release();
    }
}

/// Enumerates matching framebuffer configs and returns the best one.
fn choose_fb_config(
    display: *mut xlib::Display,
    policy: BestConfigPolicy,
) -> Result<glx::GLXFBConfig> {
    let screen = unsafe { xlib::XDefaultScreen(display) };

    let mut count: c_int = 0;
    let configs = unsafe {
        glx::glXChooseFBConfig(display, screen, FRAMEBUFFER_ATTRIBUTES.as_ptr(), &mut count)
    };

    if configs.is_null() || count <= 0 {
        bail!("no framebuffer configuration matches the required attributes");
    }

    log::info!("total framebuffer configurations: {count}");

    // Collect multisampling attributes for every config with a resolvable
    // visual, remembering original indices for the selection scan.
    let mut candidates = Vec::new();
    let mut indices = Vec::new();

    for i in 0..count as isize {
        let config = unsafe { *configs.offset(i) };
        let visual = unsafe { glx::glXGetVisualFromFBConfig(display, config) };

        if !visual.is_null() {
            let mut sample_buffers: c_int = 0;
            let mut samples: c_int = 0;

            unsafe {
                glx::glXGetFBConfigAttrib(
                    display,
                    config,
                    glx::GLX_SAMPLE_BUFFERS,
                    &mut sample_buffers,
                );
                glx::glXGetFBConfigAttrib(display, config, glx::GLX_SAMPLES, &mut samples);
            }

            log::debug!(
                "fb config {i}: visual id 0x{:x}, sample buffers {sample_buffers}, samples {samples}",
                unsafe { (*visual).visualid }
            );

            candidates.push(Candidate {
                sample_buffers,
                samples,
            });
            indices.push(i);

            unsafe {
                xlib::XFree(visual.cast());
            }
        }
    }

    let best = pick_best(&candidates, policy);
    let worst = pick_worst(&candidates);

    let chosen = match best {
        Some(best) => {
            log::info!(
                "best fb config {} ({} samples); worst fb config {:?}",
                indices[best],
                candidates[best].samples,
                worst.map(|w| indices[w]),
            );
            unsafe { *configs.offset(indices[best]) }
        }
        None => {
            unsafe { xlib::XFree(configs.cast()) };
            bail!("no framebuffer configuration has a usable visual");
        }
    };

    unsafe {
        xlib::XFree(configs.cast());
    }

    Ok(chosen)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_on_default_window_is_noop() {
        let mut window = XWindow::default();
        window.release();
        window.release();

        assert!(window.display.is_null());
        assert!(window.visual.is_null());
        assert_eq!(window.window, 0);
        assert_eq!(window.colormap, 0);
    }
}
