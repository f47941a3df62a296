//! Fixed-rate frame driver.
//!
//! [`FrameLoop::run`] owns the timing: it forwards every input to the step in
//! arrival order as soon as it arrives, and calls [`FrameStep::frame`] once per
//! interval tick. The step never runs concurrently with itself, so it can hold
//! all application state by `&mut` without locks.

use anyhow::Result;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTick {
    /// Time since the loop started
    pub elapsed: Duration,
    /// Zero-based frame counter
    pub frame: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepControl {
    Continue,
    Stop,
}

/// Application side of the loop
pub trait FrameStep {
    type Input;

    fn input(&mut self, input: Self::Input) -> StepControl;

    fn frame(&mut self, tick: FrameTick) -> Result<StepControl>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The cancellation signal fired or its sender went away
    Cancelled,
    /// The step returned [`StepControl::Stop`]
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopStats {
    pub frames: u64,
    pub elapsed: Duration,
    pub reason: StopReason,
}

pub struct FrameLoop {
    period: Duration,
}

impl FrameLoop {
    pub fn new(fps: u32) -> Self {
        Self {
            period: Duration::from_secs_f64(1.0 / fps.max(1) as f64),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub async fn run<S: FrameStep>(
        &self,
        step: &mut S,
        mut input: mpsc::Receiver<S::Input>,
        mut cancel: watch::Receiver<bool>,
    ) -> Result<LoopStats> {
        let start = Instant::now();
        let mut interval = time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut frames: u64 = 0;
        let mut input_open = true;

        let reason = loop {
            if *cancel.borrow() {
                break StopReason::Cancelled;
            }

            tokio::select! {
                biased;

                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        break StopReason::Cancelled;
                    }
                }

                event = input.recv(), if input_open => match event {
                    Some(event) => {
                        if step.input(event) == StepControl::Stop {
                            break StopReason::Stopped;
                        }
                    }
                    None => {
                        debug!("Input channel closed");
                        input_open = false;
                    }
                },

                _ = interval.tick() => {
                    let tick = FrameTick {
                        elapsed: start.elapsed(),
                        frame: frames,
                    };
                    frames += 1;
                    if step.frame(tick)? == StepControl::Stop {
                        break StopReason::Stopped;
                    }
                }
            }
        };

        Ok(LoopStats {
            frames,
            elapsed: start.elapsed(),
            reason,
        })
    }
}
