//! Alarm registry.
//!
//! Exactly two alarms exist for the lifetime of the firmware.  Each tick
//! the registry compares them against the wall-clock hour:minute and
//! raises the "alarm triggered" condition when one matches.
//!
//! ```text
//!            arm()                 evaluate() match
//!  INACTIVE ───────▶ ACTIVE ─────────────────────────▶ RINGING
//!     ▲                ▲  ▲                              │   │
//!     │ delete()       │  └────────── stop_all() ────────┘   │ snooze()
//!     │                │                                     ▼
//!     │                └──── expiry: re-arm to now ───── SNOOZED
//!     └──────────────────────── delete() from any state
//! ```
//!
//! Invariants held by every method: `ringing ⇒ active` and
//! `snoozed ⇒ !ringing`.  The flags are private so only the registry can
//! move an alarm between these states; the hour/minute fields are public
//! because the editor mutates them in place.
//!
//! ## Evaluation rules
//!
//! * While any alarm rings, evaluation is skipped entirely.
//! * A snoozed alarm is skipped until its deadline.  On expiry it is
//!   re-armed to the *current* hour:minute, so it matches and rings again
//!   on the same pass.
//! * A match rings once per minute.  The minute an alarm rang in is
//!   remembered, so stopping it does not make it ring again on the next
//!   tick of that same minute.

use log::info;
use serde::Serialize;

/// Number of alarm slots.
pub const ALARM_COUNT: usize = 2;

/// One alarm slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Alarm {
    pub hour: u8,
    pub minute: u8,
    active: bool,
    ringing: bool,
    snoozed: bool,
    snooze_deadline_ms: u64,
    /// Hour:minute the alarm last rang in; blocks re-ringing in that minute.
    #[serde(skip)]
    rang_in: Option<(u8, u8)>,
}

impl Alarm {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_ringing(&self) -> bool {
        self.ringing
    }

    pub fn is_snoozed(&self) -> bool {
        self.snoozed
    }

    /// Monotonic time at which the current snooze ends.  Meaningless unless
    /// [`is_snoozed`](Self::is_snoozed).
    pub fn snooze_deadline_ms(&self) -> u64 {
        self.snooze_deadline_ms
    }

    /// Does this slot satisfy the registry invariants?
    pub fn is_consistent(&self) -> bool {
        (!self.ringing || self.active) && !(self.snoozed && self.ringing)
    }

    fn matches(&self, hour: u8, minute: u8) -> bool {
        self.hour == hour && self.minute == minute
    }
}

/// The two alarms and their snooze policy.
#[derive(Debug, Clone)]
pub struct AlarmRegistry {
    alarms: [Alarm; ALARM_COUNT],
    snooze_ms: u64,
}

impl AlarmRegistry {
    pub fn new(snooze_ms: u32) -> Self {
        Self {
            alarms: [Alarm::default(); ALARM_COUNT],
            snooze_ms: u64::from(snooze_ms),
        }
    }

    /// One evaluation pass.  Returns the lowest-indexed ringing alarm when
    /// this pass raised the trigger.
    pub fn evaluate(&mut self, hour: u8, minute: u8, now_ms: u64) -> Option<usize> {
        if self.any_ringing() {
            return None;
        }

        let mut raised = false;
        for (i, alarm) in self.alarms.iter_mut().enumerate() {
            if alarm.rang_in.is_some_and(|hm| hm != (hour, minute)) {
                alarm.rang_in = None;
            }

            if alarm.snoozed {
                if now_ms < alarm.snooze_deadline_ms {
                    continue;
                }
                alarm.snoozed = false;
                alarm.hour = hour;
                alarm.minute = minute;
                alarm.rang_in = None;
                info!("Alarm {} snooze expired, re-armed at {hour:02}:{minute:02}", i + 1);
            }

            if alarm.active && !alarm.ringing && alarm.rang_in.is_none() && alarm.matches(hour, minute) {
                alarm.ringing = true;
                alarm.rang_in = Some((hour, minute));
                raised = true;
                info!("Alarm {} ringing at {hour:02}:{minute:02}", i + 1);
            }
        }

        if raised { self.ringing_index() } else { None }
    }

    /// Stop: silence every alarm and cancel every pending snooze.
    pub fn stop_all(&mut self) {
        for alarm in &mut self.alarms {
            alarm.ringing = false;
            alarm.snoozed = false;
        }
        info!("Alarms stopped");
    }

    /// Snooze one ringing alarm.  Returns `false` (and changes nothing) if
    /// the slot is not ringing.
    pub fn snooze(&mut self, index: usize, now_ms: u64) -> bool {
        let snooze_ms = self.snooze_ms;
        let Some(alarm) = self.alarms.get_mut(index) else {
            return false;
        };
        if !alarm.ringing {
            return false;
        }
        alarm.ringing = false;
        alarm.snoozed = true;
        alarm.snooze_deadline_ms = now_ms.saturating_add(snooze_ms);
        info!("Alarm {} snoozed for {} s", index + 1, snooze_ms / 1000);
        true
    }

    /// Clear the slot's active/ringing/snoozed flags.  Hour and minute are
    /// left as they were.
    pub fn delete(&mut self, index: usize) {
        if let Some(alarm) = self.alarms.get_mut(index) {
            alarm.active = false;
            alarm.ringing = false;
            alarm.snoozed = false;
            alarm.rang_in = None;
            info!("Alarm {} deleted", index + 1);
        }
    }

    /// Enable the slot at its current hour:minute.
    pub fn arm(&mut self, index: usize) {
        if let Some(alarm) = self.alarms.get_mut(index) {
            alarm.active = true;
            alarm.rang_in = None;
            info!("Alarm {} set for {:02}:{:02}", index + 1, alarm.hour, alarm.minute);
        }
    }

    /// Lowest-indexed ringing alarm, the one the alarm screen shows.
    pub fn ringing_index(&self) -> Option<usize> {
        self.alarms.iter().position(|a| a.ringing)
    }

    pub fn any_ringing(&self) -> bool {
        self.ringing_index().is_some()
    }

    pub fn alarm(&self, index: usize) -> Option<&Alarm> {
        self.alarms.get(index)
    }

    pub fn alarm_mut(&mut self, index: usize) -> Option<&mut Alarm> {
        self.alarms.get_mut(index)
    }

    pub fn alarms(&self) -> &[Alarm; ALARM_COUNT] {
        &self.alarms
    }

    pub fn snooze_ms(&self) -> u64 {
        self.snooze_ms
    }
}
