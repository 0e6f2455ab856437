//! Timers: periodic tick sources marshalled onto the event queue.
//!
//! A running timer lives on its own thread with a current-thread tokio
//! runtime. It never touches the scene tree; each tick is posted to the
//! application's queue as [`Event::Timer`], and the application then
//! transmits the tick number on the timer's [`Signal`] from the main loop.

use std::thread::JoinHandle;
use std::time::Duration;

use slotmap::{new_key_type, SlotMap};
use tokio::sync::oneshot;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::error::{GuiError, Result};
use crate::event::{Event, EventSender};
use crate::signal::Signal;

new_key_type! {
    pub struct TimerId;
}

/// Shortest accepted period.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Post `Event::Timer` every `period` until `stop` fires (or its sender is
/// dropped) or the queue closes. Ticks are numbered from 1; the first
/// arrives one period after the call.
pub async fn run_interval(
    sender: EventSender,
    timer: TimerId,
    period: Duration,
    mut stop: oneshot::Receiver<()>,
) {
    let period = period.max(MIN_PERIOD);
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut tick = 0u64;
    loop {
        tokio::select! {
            _ = &mut stop => break,
            _ = interval.tick() => {
                tick += 1;
                if !sender.send(Event::Timer { timer, tick }) {
                    break;
                }
            }
        }
    }
    log::trace!("timer {timer:?} stopped after {tick} ticks");
}

struct TimerEntry {
    period: Duration,
    signal: Signal<u64>,
    running: Option<(oneshot::Sender<()>, JoinHandle<()>)>,
}

/// Registry of application timers.
#[derive(Default)]
pub struct Timers {
    entries: SlotMap<TimerId, TimerEntry>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a stopped timer. Periods below [`MIN_PERIOD`] are raised to it.
    pub fn add(&mut self, period: Duration) -> TimerId {
        self.entries.insert(TimerEntry {
            period: period.max(MIN_PERIOD),
            signal: Signal::new(),
            running: None,
        })
    }

    /// Signal carrying this timer's tick numbers.
    pub fn signal(&self, id: TimerId) -> Option<&Signal<u64>> {
        self.entries.get(id).map(|entry| &entry.signal)
    }

    pub fn period(&self, id: TimerId) -> Option<Duration> {
        self.entries.get(id).map(|entry| entry.period)
    }

    pub fn is_running(&self, id: TimerId) -> bool {
        self.entries
            .get(id)
            .is_some_and(|entry| entry.running.is_some())
    }

    /// Start posting ticks to `sender`. Restarts a running timer.
    pub fn start(&mut self, id: TimerId, sender: EventSender) -> Result<()> {
        self.stop(id);
        let entry = self.entries.get_mut(id).ok_or(GuiError::UnknownTimer)?;
        let period = entry.period;
        let (stop_tx, stop_rx) = oneshot::channel();
        let thread = std::thread::Builder::new()
            .name("gadgetry-timer".into())
            .spawn(move || {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .enable_time()
                    .build();
                match runtime {
                    Ok(runtime) => runtime.block_on(run_interval(sender, id, period, stop_rx)),
                    Err(err) => log::error!("timer runtime failed to start: {err}"),
                }
            })?;
        entry.running = Some((stop_tx, thread));
        log::debug!("timer {id:?} started with period {period:?}");
        Ok(())
    }

    /// Stop a running timer. No-op for stopped or unknown timers.
    pub fn stop(&mut self, id: TimerId) {
        if let Some((stop, _thread)) = self.entries.get_mut(id).and_then(|e| e.running.take()) {
            // The task may already have exited on a closed queue.
            let _ = stop.send(());
        }
    }

    /// Stop and forget a timer. Its signal is dropped with it.
    pub fn remove(&mut self, id: TimerId) {
        self.stop(id);
        self.entries.remove(id);
    }

    /// Deliver a tick to the timer's subscribers. Returns `false` for an
    /// unknown timer (a late tick after `remove`).
    pub fn transmit(&self, id: TimerId, tick: u64) -> bool {
        match self.entries.get(id) {
            Some(entry) => {
                entry.signal.transmit(tick);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Drop for Timers {
    fn drop(&mut self) {
        let ids: Vec<TimerId> = self.entries.keys().collect();
        for id in ids {
            self.stop(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventQueue;
    use crate::signal::Slot;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[tokio::test(start_paused = true)]
    async fn interval_posts_numbered_ticks() {
        let mut queue = EventQueue::new();
        let timer = TimerId::default();
        let (stop_tx, stop_rx) = oneshot::channel();
        let task = tokio::spawn(run_interval(
            queue.sender(),
            timer,
            Duration::from_millis(100),
            stop_rx,
        ));

        time::sleep(Duration::from_millis(350)).await;
        assert_eq!(
            queue.drain(),
            vec![
                Event::Timer { timer, tick: 1 },
                Event::Timer { timer, tick: 2 },
                Event::Timer { timer, tick: 3 },
            ]
        );

        stop_tx.send(()).unwrap();
        task.await.unwrap();
        time::sleep(Duration::from_millis(500)).await;
        assert!(queue.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn interval_stops_when_queue_closes() {
        let queue = EventQueue::new();
        let sender = queue.sender();
        drop(queue);
        let (_stop_tx, stop_rx) = oneshot::channel();
        // Returns on the first failed send instead of running forever.
        run_interval(sender, TimerId::default(), Duration::from_millis(10), stop_rx).await;
    }

    #[test]
    fn transmit_reaches_subscribers() {
        let mut timers = Timers::new();
        let id = timers.add(Duration::from_millis(16));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let slot = Slot::new(move |tick| sink.borrow_mut().push(tick));
        timers.signal(id).unwrap().connect(&slot);

        assert!(timers.transmit(id, 1));
        assert!(timers.transmit(id, 2));
        assert_eq!(*seen.borrow(), vec![1, 2]);

        timers.remove(id);
        assert!(!timers.transmit(id, 3));
    }

    #[test]
    fn zero_period_is_raised() {
        let mut timers = Timers::new();
        let id = timers.add(Duration::ZERO);
        assert_eq!(timers.period(id), Some(MIN_PERIOD));
    }

    #[test]
    fn start_unknown_timer_fails() {
        let mut timers = Timers::new();
        let id = timers.add(Duration::from_millis(5));
        timers.remove(id);
        let queue = EventQueue::new();
        assert!(matches!(
            timers.start(id, queue.sender()),
            Err(GuiError::UnknownTimer)
        ));
    }

    #[test]
    fn started_timer_delivers_to_queue() {
        let mut timers = Timers::new();
        let id = timers.add(Duration::from_millis(5));
        let mut queue = EventQueue::new();
        timers.start(id, queue.sender()).unwrap();
        assert!(timers.is_running(id));

        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        let event = loop {
            if let Some(event) = queue.try_next() {
                break event;
            }
            assert!(std::time::Instant::now() < deadline, "no tick arrived");
            std::thread::sleep(Duration::from_millis(1));
        };
        assert_eq!(event, Event::Timer { timer: id, tick: 1 });

        timers.stop(id);
        assert!(!timers.is_running(id));
    }
}
