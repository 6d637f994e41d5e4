use std::cmp;
use std::time::Duration;

use instant::Instant;
use log::warn;


#[must_use]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PollOutcome {
    // Time to ask the server for a fresh state.
    // Action. Send the request and report back with `register_response` once it completes,
    // successfully or not.
    Fetch,

    // Either the next poll is not due yet or a request is still in flight. A request that has
    // been in flight for longer than the request timeout is given up on, and a new one is due.
    // Action. None required.
    Wait,

    // Polling is over for good (game finished or the page is going away).
    // Action. Tear down the timer that drives `tick`.
    Stopped,
}

// Fixed-interval poll schedule. Doesn't own a timer: the caller drives it with `tick`, as often
// as it likes.
pub struct Poller {
    interval: Duration,
    request_timeout: Duration,
    next_poll: Instant,
    // When the outstanding request was sent.
    in_flight_since: Option<Instant>,
    stopped: bool,
}

impl Poller {
    // The first poll is due immediately.
    pub fn new(interval: Duration, request_timeout: Duration, now: Instant) -> Self {
        Poller {
            interval,
            request_timeout,
            next_poll: now,
            in_flight_since: None,
            stopped: false,
        }
    }

    pub fn is_stopped(&self) -> bool { self.stopped }
    pub fn is_in_flight(&self) -> bool { self.in_flight_since.is_some() }

    pub fn tick(&mut self, now: Instant) -> PollOutcome {
        if self.stopped {
            return PollOutcome::Stopped;
        }
        if let Some(sent) = self.in_flight_since {
            if now < sent + self.request_timeout {
                return PollOutcome::Wait;
            }
            warn!(
                "State request got no response in {:?}, sending a new one",
                now.duration_since(sent)
            );
        } else if now < self.next_poll {
            return PollOutcome::Wait;
        }
        self.in_flight_since = Some(now);
        self.next_poll = now + self.interval;
        PollOutcome::Fetch
    }

    // Brings the next poll forward so that it happens no later than `delay` from now.
    pub fn schedule_refresh(&mut self, now: Instant, delay: Duration) {
        self.next_poll = cmp::min(self.next_poll, now + delay);
    }

    pub fn register_response(&mut self) { self.in_flight_since = None; }

    pub fn stop(&mut self) { self.stopped = true; }
}
