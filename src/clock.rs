//! Keeps the instruction rate and the timer/frame rate in step with the wall clock.
//!
//! Both rates are measured from the same monotonic clock but tracked separately, so a slow frame never
//! eats into instruction time and vice versa. Each rate advances its own virtual clock by whole intervals,
//! which keeps any leftover fraction of an interval for the next check instead of drifting.

use std::time::{Duration, Instant};

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// How many frames worth of instructions may be replayed after the host stalls.
const MAX_CATCH_UP_FRAMES: u32 = 4;

/// Hands out how many instructions and frames are due at a given instant.
pub struct Scheduler {
    instruction_interval: Duration,
    frame_interval: Duration,
    max_instruction_batch: u32,
    last_instruction: Instant,
    last_frame: Instant,
}

impl Scheduler {
    /// Returns a scheduler whose clocks both start at `start`.
    /// Rates of zero are treated as one per second.
    #[must_use]
    pub fn new(instructions_per_second: u32, frames_per_second: u32, start: Instant) -> Scheduler {
        let instruction_interval = interval(instructions_per_second);
        let frame_interval = interval(frames_per_second);
        let batch = (frame_interval * MAX_CATCH_UP_FRAMES).as_nanos() / instruction_interval.as_nanos();

        Scheduler {
            instruction_interval,
            frame_interval,
            max_instruction_batch: u32::try_from(batch).unwrap_or(u32::MAX).max(1),
            last_instruction: start,
            last_frame: start,
        }
    }

    /// Number of instructions to run now. Backlog beyond the catch-up limit is dropped.
    pub fn due_instructions(&mut self, now: Instant) -> u32 {
        let ticks = elapsed_ticks(&mut self.last_instruction, self.instruction_interval, now);
        ticks.min(self.max_instruction_batch)
    }

    /// Number of frame intervals that have fully elapsed since the last call.
    pub fn due_frames(&mut self, now: Instant) -> u32 {
        elapsed_ticks(&mut self.last_frame, self.frame_interval, now)
    }

    /// Time left until either clock has something due.
    #[must_use]
    pub fn time_until_next(&self, now: Instant) -> Duration {
        let next_instruction = (self.last_instruction + self.instruction_interval).saturating_duration_since(now);
        let next_frame = (self.last_frame + self.frame_interval).saturating_duration_since(now);
        next_instruction.min(next_frame)
    }

    #[must_use]
    pub fn instruction_interval(&self) -> Duration {
        self.instruction_interval
    }

    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }
}

fn interval(per_second: u32) -> Duration {
    Duration::from_nanos(NANOS_PER_SECOND / u64::from(per_second.max(1)))
}

/// Counts whole intervals between `last` and `now` and moves `last` forward by exactly that many.
fn elapsed_ticks(last: &mut Instant, interval: Duration, now: Instant) -> u32 {
    let elapsed = now.saturating_duration_since(*last);
    let ticks = u32::try_from(elapsed.as_nanos() / interval.as_nanos()).unwrap_or(u32::MAX);
    *last += interval * ticks;
    ticks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn millis(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn intervals_from_rates() {
        let scheduler = Scheduler::new(500, 60, Instant::now());
        assert_eq!(scheduler.instruction_interval(), millis(2));
        assert_eq!(scheduler.frame_interval(), Duration::from_nanos(16_666_666));
    }

    #[test]
    fn zero_rate_treated_as_one() {
        let scheduler = Scheduler::new(0, 0, Instant::now());
        assert_eq!(scheduler.instruction_interval(), Duration::from_secs(1));
        assert_eq!(scheduler.frame_interval(), Duration::from_secs(1));
    }

    #[test]
    fn nothing_due_before_first_interval() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new(500, 60, start);

        assert_eq!(scheduler.due_instructions(start), 0);
        assert_eq!(scheduler.due_instructions(start + Duration::from_micros(1999)), 0);
        assert_eq!(scheduler.due_frames(start + millis(16)), 0);
    }

    #[test]
    fn one_instruction_per_elapsed_interval() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new(500, 60, start);

        assert_eq!(scheduler.due_instructions(start + millis(2)), 1, "Elapsed interval skipped.");
        assert_eq!(scheduler.due_instructions(start + millis(2)), 0, "Interval counted twice.");
        assert_eq!(scheduler.due_instructions(start + millis(11)), 4, "Multiple intervals not batched.");
    }

    #[test]
    fn partial_intervals_carry_over() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new(500, 60, start);

        assert_eq!(scheduler.due_instructions(start + millis(3)), 1);
        assert_eq!(scheduler.due_instructions(start + millis(4)), 1, "Leftover fraction of an interval lost.");
    }

    #[test]
    fn frames_independent_of_instructions() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new(500, 60, start);

        assert_eq!(scheduler.due_instructions(start + millis(17)), 8);
        assert_eq!(scheduler.due_frames(start + millis(17)), 1, "Frame clock affected by the instruction clock.");
        assert_eq!(scheduler.due_frames(start + millis(34)), 1);
        assert_eq!(scheduler.due_instructions(start + millis(34)), 9, "Instruction clock affected by the frame clock.");
    }

    #[test]
    fn frames_count_every_elapsed_interval() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new(500, 60, start);

        assert_eq!(scheduler.due_frames(start + Duration::from_secs(1)), 60);
    }

    #[test]
    fn instruction_backlog_capped() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new(500, 60, start);

        assert_eq!(scheduler.due_instructions(start + Duration::from_secs(1)), 33, "Backlog not capped.");
        assert_eq!(scheduler.due_instructions(start + Duration::from_secs(1)), 0, "Dropped backlog replayed.");
        assert_eq!(scheduler.due_instructions(start + Duration::from_secs(1) + millis(2)), 1);
    }

    #[test]
    fn batch_never_below_one() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new(1, 60, start);

        assert_eq!(scheduler.due_instructions(start + Duration::from_secs(5)), 1);
    }

    #[test]
    fn time_until_next_is_nearest_deadline() {
        let start = Instant::now();
        let scheduler = Scheduler::new(500, 60, start);

        assert_eq!(scheduler.time_until_next(start), millis(2));
        assert_eq!(scheduler.time_until_next(start + millis(5)), Duration::ZERO, "Overdue work reported as pending.");
    }
}
