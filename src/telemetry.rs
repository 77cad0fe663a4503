use core::sync::atomic::{AtomicU32, Ordering};

use crate::gesture::GestureCommand;

static GAMES_STARTED: AtomicU32 = AtomicU32::new(0);
static GAMES_TIMED_OUT: AtomicU32 = AtomicU32::new(0);
static MATCHES_ACCEPTED: AtomicU32 = AtomicU32::new(0);
static RAMPS_APPLIED: AtomicU32 = AtomicU32::new(0);
static DETECTIONS_SHAKE: AtomicU32 = AtomicU32::new(0);
static DETECTIONS_FLICK_UP: AtomicU32 = AtomicU32::new(0);
static DETECTIONS_TWIST: AtomicU32 = AtomicU32::new(0);
static DETECTIONS_SPIN_CROWN: AtomicU32 = AtomicU32::new(0);
static STALE_DETECTIONS_DROPPED: AtomicU32 = AtomicU32::new(0);
static DETECTIONS_SUPERSEDED: AtomicU32 = AtomicU32::new(0);
static SENSOR_UNAVAILABLE: AtomicU32 = AtomicU32::new(0);
static STORE_WRITE_FAILURES: AtomicU32 = AtomicU32::new(0);
static BEST_SCORE_SEEN: AtomicU32 = AtomicU32::new(0);

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Snapshot {
    pub games_started: u32,
    pub games_timed_out: u32,
    pub matches_accepted: u32,
    pub ramps_applied: u32,
    pub detections_shake: u32,
    pub detections_flick_up: u32,
    pub detections_twist: u32,
    pub detections_spin_crown: u32,
    pub stale_detections_dropped: u32,
    pub detections_superseded: u32,
    pub sensor_unavailable: u32,
    pub store_write_failures: u32,
    pub best_score_seen: u32,
}

impl Snapshot {
    pub fn detections_for(&self, gesture: GestureCommand) -> u32 {
        match gesture {
            GestureCommand::Shake => self.detections_shake,
            GestureCommand::FlickUp => self.detections_flick_up,
            GestureCommand::Twist => self.detections_twist,
            GestureCommand::SpinCrown => self.detections_spin_crown,
        }
    }
}

pub fn record_game_started() {
    saturating_add_u32(&GAMES_STARTED, 1);
}

pub fn record_game_timed_out(final_score: u32) {
    saturating_add_u32(&GAMES_TIMED_OUT, 1);
    update_max_u32(&BEST_SCORE_SEEN, final_score);
}

pub fn record_match(score: u32) {
    saturating_add_u32(&MATCHES_ACCEPTED, 1);
    update_max_u32(&BEST_SCORE_SEEN, score);
}

pub fn record_ramp() {
    saturating_add_u32(&RAMPS_APPLIED, 1);
}

pub fn record_detection(gesture: GestureCommand) {
    let counter = match gesture {
        GestureCommand::Shake => &DETECTIONS_SHAKE,
        GestureCommand::FlickUp => &DETECTIONS_FLICK_UP,
        GestureCommand::Twist => &DETECTIONS_TWIST,
        GestureCommand::SpinCrown => &DETECTIONS_SPIN_CROWN,
    };
    saturating_add_u32(counter, 1);
}

pub fn record_stale_detection() {
    saturating_add_u32(&STALE_DETECTIONS_DROPPED, 1);
}

pub fn record_detection_superseded() {
    saturating_add_u32(&DETECTIONS_SUPERSEDED, 1);
}

pub fn record_sensor_unavailable() {
    saturating_add_u32(&SENSOR_UNAVAILABLE, 1);
}

pub fn record_store_write_failure() {
    saturating_add_u32(&STORE_WRITE_FAILURES, 1);
}

pub fn snapshot() -> Snapshot {
    Snapshot {
        games_started: GAMES_STARTED.load(Ordering::Relaxed),
        games_timed_out: GAMES_TIMED_OUT.load(Ordering::Relaxed),
        matches_accepted: MATCHES_ACCEPTED.load(Ordering::Relaxed),
        ramps_applied: RAMPS_APPLIED.load(Ordering::Relaxed),
        detections_shake: DETECTIONS_SHAKE.load(Ordering::Relaxed),
        detections_flick_up: DETECTIONS_FLICK_UP.load(Ordering::Relaxed),
        detections_twist: DETECTIONS_TWIST.load(Ordering::Relaxed),
        detections_spin_crown: DETECTIONS_SPIN_CROWN.load(Ordering::Relaxed),
        stale_detections_dropped: STALE_DETECTIONS_DROPPED.load(Ordering::Relaxed),
        detections_superseded: DETECTIONS_SUPERSEDED.load(Ordering::Relaxed),
        sensor_unavailable: SENSOR_UNAVAILABLE.load(Ordering::Relaxed),
        store_write_failures: STORE_WRITE_FAILURES.load(Ordering::Relaxed),
        best_score_seen: BEST_SCORE_SEEN.load(Ordering::Relaxed),
    }
}

fn saturating_add_u32(counter: &AtomicU32, value: u32) {
    let _ = counter.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
        Some(current.saturating_add(value))
    });
}

fn update_max_u32(max_counter: &AtomicU32, value: u32) {
    let mut current = max_counter.load(Ordering::Relaxed);
    while value > current {
        match max_counter.compare_exchange_weak(
            current,
            value,
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => break,
            Err(observed) => current = observed,
        }
    }
}
