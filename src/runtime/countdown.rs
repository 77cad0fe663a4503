use embassy_time::{Duration, Instant};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CountdownEvent {
    Tick { remaining: Duration },
    Timeout,
}

/// Per-command countdown. `poll` is the only place events surface, so once
/// `cancel` returns nothing else fires until the next `start`.
pub trait CountdownTimer {
    /// Restarts the countdown; any running one is replaced.
    fn start(&mut self, now: Instant, duration: Duration, tick_interval: Duration);
    fn cancel(&mut self);
    fn poll(&mut self, now: Instant) -> Option<CountdownEvent>;
    /// Next instant at which `poll` may produce an event.
    fn deadline(&self) -> Option<Instant>;

    fn is_active(&self) -> bool {
        self.deadline().is_some()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct DeadlineCountdown {
    expires_at: Option<Instant>,
    next_tick_at: Option<Instant>,
    tick_interval: Duration,
}

impl Default for DeadlineCountdown {
    fn default() -> Self {
        Self::new()
    }
}

impl DeadlineCountdown {
    pub const fn new() -> Self {
        Self {
            expires_at: None,
            next_tick_at: None,
            tick_interval: Duration::from_ticks(0),
        }
    }

    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.expires_at
            .map(|expires| expires.checked_duration_since(now).unwrap_or(Duration::from_ticks(0)))
    }
}

impl CountdownTimer for DeadlineCountdown {
    fn start(&mut self, now: Instant, duration: Duration, tick_interval: Duration) {
        self.expires_at = Some(now + duration);
        self.tick_interval = tick_interval;
        self.next_tick_at = (tick_interval.as_ticks() > 0).then(|| now + tick_interval);
    }

    fn cancel(&mut self) {
        self.expires_at = None;
        self.next_tick_at = None;
    }

    fn poll(&mut self, now: Instant) -> Option<CountdownEvent> {
        let expires_at = self.expires_at?;
        if now >= expires_at {
            self.cancel();
            return Some(CountdownEvent::Timeout);
        }

        let next_tick_at = self.next_tick_at?;
        if now < next_tick_at {
            return None;
        }
        let mut following = next_tick_at + self.tick_interval;
        while following <= now {
            following += self.tick_interval;
        }
        self.next_tick_at = Some(following);
        Some(CountdownEvent::Tick {
            remaining: expires_at - now,
        })
    }

    fn deadline(&self) -> Option<Instant> {
        let expires_at = self.expires_at?;
        Some(match self.next_tick_at {
            Some(tick) if tick < expires_at => tick,
            _ => expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    #[test]
    fn ticks_then_times_out_once() {
        let mut timer = DeadlineCountdown::new();
        timer.start(at(0), Duration::from_millis(120), Duration::from_millis(50));

        assert_eq!(timer.poll(at(10)), None);
        assert_eq!(
            timer.poll(at(50)),
            Some(CountdownEvent::Tick {
                remaining: Duration::from_millis(70)
            })
        );
        assert_eq!(timer.deadline(), Some(at(100)));
        assert_eq!(
            timer.poll(at(100)),
            Some(CountdownEvent::Tick {
                remaining: Duration::from_millis(20)
            })
        );
        assert_eq!(timer.deadline(), Some(at(120)));
        assert_eq!(timer.poll(at(120)), Some(CountdownEvent::Timeout));
        assert_eq!(timer.poll(at(200)), None);
        assert!(!timer.is_active());
    }

    #[test]
    fn cancel_is_safe_and_final() {
        let mut timer = DeadlineCountdown::new();
        timer.cancel();
        timer.start(at(0), Duration::from_millis(100), Duration::from_millis(50));
        timer.cancel();
        timer.cancel();
        assert_eq!(timer.poll(at(500)), None);
        assert_eq!(timer.deadline(), None);
    }

    #[test]
    fn restart_replaces_running_countdown() {
        let mut timer = DeadlineCountdown::new();
        timer.start(at(0), Duration::from_millis(100), Duration::from_millis(50));
        timer.start(at(90), Duration::from_millis(100), Duration::from_millis(50));
        assert_eq!(
            timer.poll(at(150)),
            Some(CountdownEvent::Tick {
                remaining: Duration::from_millis(40)
            })
        );
        assert_eq!(timer.remaining(at(150)), Some(Duration::from_millis(40)));
        assert_eq!(timer.poll(at(190)), Some(CountdownEvent::Timeout));
    }

    #[test]
    fn late_poll_coalesces_missed_ticks() {
        let mut timer = DeadlineCountdown::new();
        timer.start(at(0), Duration::from_millis(1_000), Duration::from_millis(50));
        assert!(matches!(
            timer.poll(at(275)),
            Some(CountdownEvent::Tick { .. })
        ));
        assert_eq!(timer.deadline(), Some(at(300)));
    }
}
