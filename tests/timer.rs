mod tests {
    use embassy_time::{Duration, Instant};
    use launchgrid::{Clock, FramePacer, ManualClock, TimerQueue};

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    #[test]
    fn test_timers_fire_in_deadline_order() {
        let mut timers = TimerQueue::new();
        timers.schedule_at(at(30), "c");
        timers.schedule_at(at(10), "a");
        timers.schedule_at(at(10), "b");

        assert_eq!(timers.next_deadline(), Some(at(10)));
        assert_eq!(timers.pop_due(at(5)), None);
        assert_eq!(timers.pop_due(at(10)).map(|(_, value)| value), Some("a"));
        assert_eq!(timers.pop_due(at(10)).map(|(_, value)| value), Some("b"));
        assert_eq!(timers.pop_due(at(20)), None);
        assert_eq!(timers.pop_due(at(40)).map(|(_, value)| value), Some("c"));
        assert!(timers.is_empty());
    }

    #[test]
    fn test_cancel() {
        let mut timers = TimerQueue::new();
        let first = timers.schedule_after(at(0), Duration::from_millis(10), 1);
        let second = timers.schedule_after(at(0), Duration::from_millis(20), 2);

        assert_eq!(timers.cancel(first), Some(1));
        assert_eq!(timers.cancel(first), None);
        assert!(timers.is_pending(second));
        assert_eq!(timers.deadline(second), Some(at(20)));
        assert_eq!(timers.next_deadline(), Some(at(20)));
    }

    #[test]
    fn test_fired_handle_is_stale() {
        let mut timers = TimerQueue::new();
        let handle = timers.schedule_at(at(10), ());
        let (fired, ()) = timers.pop_due(at(10)).unwrap();
        assert_eq!(fired, handle);

        let newer = timers.schedule_at(at(10), ());
        assert_ne!(newer, handle);
        assert_eq!(timers.cancel(handle), None);
        assert!(timers.is_pending(newer));
    }

    #[test]
    fn test_frame_pacer() {
        let mut pacer = FramePacer::new(at(0), Duration::from_millis(22));
        assert_eq!(pacer.next_deadline(), at(0));

        let first = pacer.tick(at(0));
        assert_eq!(first.next_deadline, at(22));
        assert_eq!(first.sleep_duration, Duration::from_millis(22));

        let late = pacer.tick(at(30));
        assert_eq!(late.next_deadline, at(44));
        assert_eq!(late.elapsed, Duration::from_millis(30));
    }

    #[test]
    fn test_frame_pacer_skips_backlog_after_stall() {
        let mut pacer = FramePacer::new(at(0), Duration::from_millis(22));
        pacer.tick(at(0));

        let stalled = pacer.tick(at(200));
        assert_eq!(stalled.next_deadline, at(222));
        assert_eq!(stalled.elapsed, Duration::from_millis(200));
    }

    #[test]
    fn test_manual_clock_only_moves_forward() {
        let clock = ManualClock::default();
        assert_eq!(clock.now(), at(0));
        clock.advance(Duration::from_millis(25));
        assert_eq!(clock.now(), at(25));
        clock.set(at(10));
        assert_eq!(clock.now(), at(25));
        clock.set(at(100));
        assert_eq!(clock.now(), at(100));
    }
}
