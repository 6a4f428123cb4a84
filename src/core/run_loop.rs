//! Render-loop sequencing.
//!
//! The ordering here is the load-bearing contract: events are drained, the
//! exit flag is sampled, and the frame is rendered unconditionally before
//! the flag is acted on. An iteration that observes a termination signal
//! therefore still renders one final frame.

/// The three hooks the loop alternates between.
pub(crate) trait LoopApp {
    /// Drain and apply all pending platform events.
    fn pump(&mut self);

    /// Render and present one frame.
    fn frame(&mut self);

    /// Whether a termination signal has been observed.
    fn exit_requested(&self) -> bool;
}

/// Runs the synchronous event/render loop to completion.
pub(crate) fn drive(app: &mut impl LoopApp) {
    loop {
        app.pump();
        let done = app.exit_requested();
        app.frame();

        if done {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scripted loop app: requests exit during the pump of a chosen
    /// iteration and counts rendered frames.
    struct Scripted {
        exit_on_iteration: usize,
        iteration: usize,
        exit: bool,
        frames: usize,
    }

    impl Scripted {
        fn exit_on(iteration: usize) -> Self {
            Self {
                exit_on_iteration: iteration,
                iteration: 0,
                exit: false,
                frames: 0,
            }
        }
    }

    impl LoopApp for Scripted {
        fn pump(&mut self) {
            if self.iteration == self.exit_on_iteration {
                self.exit = true;
            }
            self.iteration += 1;
        }

        fn frame(&mut self) {
            self.frames += 1;
        }

        fn exit_requested(&self) -> bool {
            self.exit
        }
    }

    #[test]
    fn termination_signal_still_renders_that_frame() {
        // Signal observed while pumping the first iteration: the loop must
        // render exactly one frame, then exit.
        let mut app = Scripted::exit_on(0);
        drive(&mut app);
        assert_eq!(app.frames, 1);
    }

    #[test]
    fn frames_render_until_signal_plus_one() {
        // Signal during the fourth pump: three full frames before it, plus
        // the final frame of the observing iteration.
        let mut app = Scripted::exit_on(3);
        drive(&mut app);
        assert_eq!(app.frames, 4);
    }
}
