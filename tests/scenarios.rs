//! End-to-end runs of both policies through the public API.

use fair_scheduler_sim::scheduler::*;
use std::{cell::RefCell, rc::Rc};

type Trace = Rc<RefCell<Vec<(Pid, ProcessState)>>>;

fn traced(pid: Pid, priority: Priority, start_time: SimTime, burst: u64, trace: &Trace) -> Process {
    let trace = Rc::clone(trace);
    Process::builder(pid)
        .name(&format!("p{pid}"))
        .priority(priority)
        .start_time(start_time)
        .burst_time(burst)
        .task(from_fn(move |ctx| {
            trace.borrow_mut().push((ctx.pid, ctx.state));
            Ok(ctx.pid.to_string())
        }))
        .build()
        .unwrap()
}

fn drain<S: Scheduler>(scheduler: &mut S) -> Vec<Dispatch> {
    std::iter::from_fn(|| scheduler.step().unwrap()).collect()
}

mod fifo_tests {
    use super::*;

    #[test]
    fn each_process_runs_in_one_unbroken_dispatch() {
        let trace = Trace::default();
        let mut scheduler = FifoScheduler::with_processes(vec![
            traced(3, Priority::High, 2, 3, &trace),
            traced(1, Priority::Normal, 0, 5, &trace),
            traced(2, Priority::High, 1, 2, &trace),
        ]);

        let dispatches = drain(&mut scheduler);
        let pids: Vec<_> = dispatches.iter().map(|d| d.pid).collect();
        assert_eq!(pids, vec![1, 2, 3]);
        assert!(dispatches.iter().all(|d| d.completed && d.ran == d.slice));

        let launches: Vec<_> = trace.borrow().iter().map(|&(pid, _)| pid).collect();
        assert_eq!(launches, vec![1, 1, 1, 1, 1, 2, 2, 3, 3, 3]);
        assert!(trace.borrow().iter().all(|&(_, state)| state == ProcessState::Running));
    }

    #[test]
    fn completion_times_follow_arrival_order() {
        let trace = Trace::default();
        let mut scheduler = FifoScheduler::with_processes(vec![
            traced(1, Priority::Normal, 0, 10, &trace),
            traced(2, Priority::Normal, 30, 1, &trace),
        ]);
        scheduler.run().unwrap();

        let ends: Vec<_> = scheduler.completed().iter().map(|p| p.end_time()).collect();
        assert_eq!(ends, vec![Some(10), Some(31)]);
        for process in scheduler.completed() {
            assert!(process.end_time().unwrap() >= process.start_time());
        }
    }
}

mod fair_tests {
    use super::*;

    fn three_arrivals(trace: &Trace) -> Vec<Process> {
        vec![
            traced(1, Priority::High, 0, 9, trace),
            traced(2, Priority::Normal, 1, 9, trace),
            traced(3, Priority::High, 2, 9, trace),
        ]
    }

    #[test]
    fn first_dispatch_of_three_arrivals() {
        let trace = Trace::default();
        let mut scheduler = FairScheduler::with_processes(three_arrivals(&trace), 10).unwrap();
        assert_eq!(scheduler.time_slices().time_high(), 10);
        assert_eq!(scheduler.time_slices().time_low(), 5);

        let next = scheduler.get_next(None).unwrap();
        assert_eq!(next.pid(), 1);
        assert_eq!(scheduler.timer_interrupt(), 3);
    }

    #[test]
    fn three_arrivals_run_to_completion() {
        let trace = Trace::default();
        let mut scheduler = FairScheduler::with_processes(three_arrivals(&trace), 10).unwrap();

        let dispatches = drain(&mut scheduler);
        assert_eq!(&dispatches.iter().map(|d| d.pid).collect::<Vec<_>>()[..3], &[1, 2, 3]);
        assert!(dispatches.iter().all(|d| d.slice >= TIME_MINIMUM && d.ran <= d.slice));

        assert_eq!(scheduler.completed().len(), 3);
        for process in scheduler.completed() {
            assert_eq!(process.virtual_runtime(), 9);
            assert!(process.end_time().unwrap() >= process.start_time());
        }
        assert_eq!(trace.borrow().len(), 27);
    }

    #[test]
    fn runtimes_stay_close_under_contention() {
        let trace = Trace::default();
        let mut scheduler = FairScheduler::with_processes(
            (1..=4)
                .map(|pid| traced(pid, Priority::Normal, 0, 1000, &trace))
                .collect(),
            10,
        )
        .unwrap();

        for _ in 0..200 {
            let dispatch = scheduler.step().unwrap().unwrap();
            assert_eq!(dispatch.slice, 3);

            let runtimes: Vec<_> = scheduler
                .ready()
                .into_iter()
                .chain(scheduler.current_process())
                .map(Process::virtual_runtime)
                .collect();
            let spread = runtimes.iter().max().unwrap() - runtimes.iter().min().unwrap();
            assert!(spread <= 3, "spread {spread} in {runtimes:?}");
        }
    }

    #[test]
    fn late_arrival_leaves_no_idle_time_for_earlier_work() {
        let trace = Trace::default();
        let mut scheduler = FairScheduler::with_processes(
            vec![
                traced(1, Priority::Normal, 0, 9, &trace),
                traced(2, Priority::Normal, 2, 6, &trace),
                traced(3, Priority::Normal, 60, 4, &trace),
            ],
            10,
        )
        .unwrap();
        scheduler.run().unwrap();

        let summary = RunSummary::from_completed(scheduler.completed());
        let stats = |pid: Pid| summary.processes.iter().find(|s| s.pid == pid).unwrap();

        // The two early processes share the CPU back to back: 15 busy units, no gap.
        assert_eq!((stats(1).end_time, stats(1).turnaround, stats(1).waiting), (15, 15, 6));
        assert_eq!((stats(2).end_time, stats(2).turnaround, stats(2).waiting), (12, 10, 4));
        // The late one starts on arrival and never waits.
        assert_eq!((stats(3).end_time, stats(3).turnaround, stats(3).waiting), (64, 4, 0));
        assert_eq!(summary.makespan, 64);
    }

    #[test]
    fn preempted_process_is_ready_again() {
        let trace = Trace::default();
        let mut scheduler = FairScheduler::with_processes(
            vec![
                traced(1, Priority::Normal, 0, 50, &trace),
                traced(2, Priority::Normal, 0, 50, &trace),
            ],
            10,
        )
        .unwrap();

        scheduler.step().unwrap();
        assert_eq!(scheduler.current_process().unwrap().state(), ProcessState::Running);
        scheduler.step().unwrap();

        let ready = scheduler.ready();
        assert_eq!(ready.len(), 1);
        assert_eq!(ready[0].pid(), 1);
        assert_eq!(ready[0].state(), ProcessState::Ready);
    }
}

#[test]
fn both_policies_finish_the_same_work() {
    let trace = Trace::default();
    let batch = |trace: &Trace| {
        vec![
            traced(1, Priority::High, 0, 7, trace),
            traced(2, Priority::Normal, 3, 4, trace),
            traced(3, Priority::Normal, 5, 11, trace),
        ]
    };

    let mut fifo = FifoScheduler::with_processes(batch(&trace));
    fifo.run().unwrap();
    let mut fair = FairScheduler::with_processes(batch(&trace), 8).unwrap();
    fair.run().unwrap();

    let fifo_summary = RunSummary::from_completed(fifo.completed());
    let fair_summary = RunSummary::from_completed(fair.completed());
    assert_eq!(fifo_summary.processes.len(), 3);
    assert_eq!(fair_summary.processes.len(), 3);
    assert_eq!(fifo_summary.makespan, 22);
    assert_eq!(fair_summary.makespan, 22);
}
