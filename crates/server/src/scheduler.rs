//! Fixed-rate cooperative scheduler driven one tick at a time.

use holomenu_core::SimTick;
use holomenu_ui3d::{OnceTask, PeriodicTask, Scheduler, TaskControl, TaskHandle};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::trace;

enum Job {
    Periodic { interval: u64, run: PeriodicTask },
    Once(OnceTask),
}

struct ScheduledTask {
    handle: TaskHandle,
    due: SimTick,
    job: Job,
}

struct SchedulerState {
    now: SimTick,
    next_id: u64,
    tasks: Vec<ScheduledTask>,
}

/// Tick scheduler: tasks run when [`TickScheduler::run_tick`] reaches their due tick.
///
/// Tasks run without the scheduler lock held, so a task may schedule or
/// cancel other tasks (itself included). Tasks due on the same tick run in
/// the order they were first scheduled.
pub struct TickScheduler {
    state: Mutex<SchedulerState>,
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TickScheduler {
    /// Scheduler at tick zero with no tasks.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SchedulerState {
                now: SimTick::ZERO,
                next_id: 1,
                tasks: Vec::new(),
            }),
        }
    }

    /// Last tick run.
    pub fn now(&self) -> SimTick {
        self.lock().now
    }

    /// Number of tasks still waiting to run.
    pub fn pending(&self) -> usize {
        self.lock()
            .tasks
            .iter()
            .filter(|task| !task.handle.is_cancelled())
            .count()
    }

    /// Advance one tick and run every task due on it.
    pub fn run_tick(&self) -> SimTick {
        let (now, mut due) = {
            let mut state = self.lock();
            state.now = state.now.advance(1);
            let now = state.now;
            let (due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut state.tasks)
                .into_iter()
                .filter(|task| !task.handle.is_cancelled())
                .partition(|task| task.due <= now);
            state.tasks = waiting;
            (now, due)
        };
        due.sort_by_key(|task| task.handle.id());

        trace!(tick = now.0, due = due.len(), "running scheduler tick");
        for task in due {
            if task.handle.is_cancelled() {
                continue;
            }
            match task.job {
                Job::Once(run) => run(),
                Job::Periodic { interval, mut run } => {
                    let control = run();
                    if control == TaskControl::Continue && !task.handle.is_cancelled() {
                        self.lock().tasks.push(ScheduledTask {
                            handle: task.handle,
                            due: now.advance(interval),
                            job: Job::Periodic { interval, run },
                        });
                    }
                }
            }
        }
        now
    }

    /// Run `count` ticks.
    pub fn run_ticks(&self, count: u64) -> SimTick {
        let mut now = self.now();
        for _ in 0..count {
            now = self.run_tick();
        }
        now
    }

    fn push(&self, delay: u64, job: Job) -> TaskHandle {
        let mut state = self.lock();
        let handle = TaskHandle::new(state.next_id);
        state.next_id += 1;
        let due = state.now.advance(delay.max(1));
        state.tasks.push(ScheduledTask {
            handle: handle.clone(),
            due,
            job,
        });
        handle
    }

    fn lock(&self) -> MutexGuard<'_, SchedulerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Scheduler for TickScheduler {
    fn schedule_periodic(&self, interval_ticks: u64, task: PeriodicTask) -> TaskHandle {
        self.push(
            1,
            Job::Periodic {
                interval: interval_ticks.max(1),
                run: task,
            },
        )
    }

    fn schedule_once(&self, delay_ticks: u64, task: OnceTask) -> TaskHandle {
        self.push(delay_ticks, Job::Once(task))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    #[test]
    fn periodic_runs_next_tick_then_every_interval() {
        let scheduler = TickScheduler::new();
        let runs = Arc::new(AtomicU64::new(0));
        let counter = runs.clone();
        scheduler.schedule_periodic(
            5,
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                TaskControl::Continue
            }),
        );

        let mut ran_on = Vec::new();
        for _ in 0..16 {
            let before = runs.load(Ordering::SeqCst);
            let now = scheduler.run_tick();
            if runs.load(Ordering::SeqCst) != before {
                ran_on.push(now.0);
            }
        }
        assert_eq!(ran_on, vec![1, 6, 11, 16]);
    }

    #[test]
    fn once_runs_after_delay_and_only_once() {
        let scheduler = TickScheduler::new();
        let hits = Arc::new(AtomicU64::new(0));
        let counter = hits.clone();
        scheduler.schedule_once(
            4,
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        scheduler.run_ticks(3);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        scheduler.run_tick();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        scheduler.run_ticks(10);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn cancelled_tasks_never_run() {
        let scheduler = TickScheduler::new();
        let hits = Arc::new(AtomicU64::new(0));
        let counter = hits.clone();
        let handle = scheduler.schedule_periodic(
            1,
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                TaskControl::Continue
            }),
        );

        scheduler.run_ticks(2);
        scheduler.cancel(&handle);
        scheduler.run_ticks(5);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn periodic_task_can_stop_itself() {
        let scheduler = TickScheduler::new();
        let hits = Arc::new(AtomicU64::new(0));
        let counter = hits.clone();
        scheduler.schedule_periodic(
            1,
            Box::new(move || {
                if counter.fetch_add(1, Ordering::SeqCst) + 1 == 3 {
                    TaskControl::Stop
                } else {
                    TaskControl::Continue
                }
            }),
        );

        scheduler.run_ticks(10);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }
}
