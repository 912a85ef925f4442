//! Purpose: Plan the idle-wait heartbeat cadence without performing any sleeps.
//! Exports: `WaitPlan`, `run_wait`.
//! Role: Pure scheduling layer used by the CLI wait loop.
//! Invariants: No side effects; output depends only on the three input durations.
//! Invariants: Tick 0 carries a heartbeat whenever the plan has any ticks.
use std::time::Duration;

use crate::core::error::{Error, ErrorKind};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WaitPlan {
    pub ticks: u64,
    pub stride: u64,
    pub tick: Duration,
}

impl WaitPlan {
    pub fn new(wait: Duration, every: Duration, tick: Duration) -> Result<WaitPlan, Error> {
        if tick.is_zero() {
            return Err(Error::new(ErrorKind::Usage)
                .with_message("tick must be greater than zero")
                .with_flag("--tick")
                .with_hint("Use a positive duration like 1s or 100ms."));
        }
        if every < tick {
            return Err(Error::new(ErrorKind::Usage)
                .with_message("heartbeat interval is shorter than one tick")
                .with_flag("--every")
                .with_hint("Use an --every of at least one --tick."));
        }
        let tick_ns = tick.as_nanos();
        // A trailing partial tick is dropped rather than slept.
        let ticks = (wait.as_nanos() / tick_ns) as u64;
        let stride = (every.as_nanos() / tick_ns) as u64;
        Ok(WaitPlan {
            ticks,
            stride,
            tick,
        })
    }

    pub fn is_beat(&self, tick_index: u64) -> bool {
        tick_index < self.ticks && tick_index % self.stride == 0
    }

    pub fn heartbeats(&self) -> u64 {
        if self.ticks == 0 {
            return 0;
        }
        (self.ticks - 1) / self.stride + 1
    }

    pub fn first_beat(&self) -> Option<u64> {
        (self.ticks > 0).then_some(0)
    }

    pub fn last_beat(&self) -> Option<u64> {
        if self.ticks == 0 {
            return None;
        }
        Some((self.ticks - 1) / self.stride * self.stride)
    }

    pub fn total_sleep(&self) -> Duration {
        self.tick
            .saturating_mul(u32::try_from(self.ticks).unwrap_or(u32::MAX))
    }
}

pub fn run_wait<S, B>(plan: &WaitPlan, mut sleep: S, mut on_beat: B)
where
    S: FnMut(Duration),
    B: FnMut(u64, u64),
{
    for tick_index in 0..plan.ticks {
        if plan.is_beat(tick_index) {
            on_beat(tick_index, plan.ticks);
        }
        sleep(plan.tick);
    }
}
