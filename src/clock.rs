//! Fixed-timestep accumulator
//!
//! Turns variable frame times into whole simulation steps. Long frames are
//! clamped so a stall never triggers a burst of catch-up steps, and each
//! frame runs at most `max_substeps` steps; anything left over stays in the
//! accumulator for the next frame.

/// Longest frame time fed into the accumulator (seconds)
const MAX_FRAME_TIME: f32 = 0.1;

#[derive(Debug, Clone)]
pub struct FixedStep {
    dt: f32,
    max_substeps: u32,
    accumulator: f32,
}

impl FixedStep {
    pub fn new(dt: f32, max_substeps: u32) -> Self {
        Self {
            dt,
            max_substeps: max_substeps.max(1),
            accumulator: 0.0,
        }
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Unconsumed time carried into the next frame
    pub fn pending(&self) -> f32 {
        self.accumulator
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    /// Feed one frame's elapsed time and run the due steps. Returns the
    /// number of steps run, or the first error a step produced.
    pub fn advance<E>(&mut self, elapsed: f32, mut step: impl FnMut(f32) -> Result<(), E>) -> Result<u32, E> {
        if elapsed.is_finite() && elapsed > 0.0 {
            self.accumulator += elapsed.min(MAX_FRAME_TIME);
        }

        let mut substeps = 0;
        while self.accumulator >= self.dt && substeps < self.max_substeps {
            step(self.dt)?;
            self.accumulator -= self.dt;
            substeps += 1;
        }
        Ok(substeps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 64.0;

    fn run(clock: &mut FixedStep, elapsed: f32) -> u32 {
        clock.advance(elapsed, |_| Ok::<(), ()>(())).expect("infallible")
    }

    #[test]
    fn test_runs_whole_steps_and_keeps_remainder() {
        let mut clock = FixedStep::new(DT, 8);
        assert_eq!(run(&mut clock, 0.05), 3);
        assert!((clock.pending() - 0.003125).abs() < 1e-5);
        assert_eq!(run(&mut clock, 0.013), 1);
    }

    #[test]
    fn test_long_frame_is_clamped() {
        let mut clock = FixedStep::new(DT, 100);
        assert_eq!(run(&mut clock, 5.0), 6);
    }

    #[test]
    fn test_substeps_are_capped() {
        let mut clock = FixedStep::new(DT, 4);
        assert_eq!(run(&mut clock, 0.1), 4);
        assert!(clock.pending() > 0.03);
        clock.reset();
        assert_eq!(clock.pending(), 0.0);
    }

    #[test]
    fn test_bad_elapsed_is_ignored() {
        let mut clock = FixedStep::new(DT, 4);
        assert_eq!(run(&mut clock, f32::NAN), 0);
        assert_eq!(run(&mut clock, -1.0), 0);
    }

    #[test]
    fn test_step_error_stops_the_frame() {
        let mut clock = FixedStep::new(DT, 8);
        let mut calls = 0;
        let result = clock.advance(0.05, |_| {
            calls += 1;
            if calls == 2 { Err("boom") } else { Ok(()) }
        });
        assert_eq!(result, Err("boom"));
        assert_eq!(calls, 2);
    }
}
