mod support;

mod tests {
    use embassy_time::Instant;
    use launchgrid::{
        AnimationEngine, AnimationKind, AnimationOptions, AnimationOutcome, Color, PadPainter,
    };

    use crate::support::RecordingPort;

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    fn drive(engine: &mut AnimationEngine, painter: &mut PadPainter<RecordingPort>) {
        while let Some(next) = engine.next_deadline() {
            engine.poll(next, painter);
        }
    }

    fn blink_options(period_ms: u64, cycles: u32) -> AnimationOptions {
        AnimationOptions {
            period_ms: Some(period_ms),
            cycles: Some(cycles),
            ..AnimationOptions::default()
        }
    }

    #[test]
    fn test_blink_cycles_then_off() {
        let mut engine = AnimationEngine::new(vec![1, 2, 3]);
        let mut painter = PadPainter::new(RecordingPort::default());

        let id = engine
            .blink_pulse(&mut painter, &[2], Color::GREEN, &blink_options(200, 2), at(0))
            .unwrap();
        assert_eq!(painter.port().writes_for(2), vec![Color::GREEN]);

        drive(&mut engine, &mut painter);

        assert_eq!(
            painter.port().writes_for(2),
            vec![Color::GREEN, Color::OFF, Color::GREEN, Color::OFF]
        );
        assert!(painter.port().writes_for(1).is_empty());
        assert!(!engine.is_running(id));
        assert!(engine.is_idle());

        let reports = engine.take_reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].id, id);
        assert_eq!(reports[0].kind, AnimationKind::Blink);
        assert_eq!(reports[0].outcome, AnimationOutcome::Completed);
        assert!(engine.take_reports().is_empty());
    }

    #[test]
    fn test_cancel_paints_terminal_color() {
        let mut engine = AnimationEngine::new(vec![1, 2, 3]);
        let mut painter = PadPainter::new(RecordingPort::default());

        let id = engine
            .blink_pulse(&mut painter, &[2], Color::GREEN, &blink_options(200, 5), at(0))
            .unwrap();
        engine.poll(at(50), &mut painter);

        assert!(engine.cancel(id, &mut painter));
        assert!(!engine.cancel(id, &mut painter));
        assert_eq!(painter.port().writes_for(2), vec![Color::GREEN, Color::OFF]);
        assert_eq!(engine.next_deadline(), None);
        assert_eq!(engine.owner_of(2), None);

        let reports = engine.take_reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].outcome, AnimationOutcome::Cancelled);
    }

    #[test]
    fn test_cancel_pad_and_cancel_all() {
        let mut engine = AnimationEngine::new(vec![1, 2, 3]);
        let mut painter = PadPainter::new(RecordingPort::default());
        let options = blink_options(200, 5);

        engine.blink_pulse(&mut painter, &[1], Color::RED, &options, at(0));
        engine.blink_pulse(&mut painter, &[2], Color::GREEN, &options, at(0));
        engine.blink_pulse(&mut painter, &[3], Color::AMBER, &options, at(0));

        assert!(engine.cancel_pad(1, &mut painter));
        assert!(!engine.cancel_pad(1, &mut painter));
        engine.cancel_all(&mut painter);

        assert!(engine.is_idle());
        for pad in [1, 2, 3] {
            assert_eq!(painter.port().last(pad), Some(Color::OFF));
        }
        assert_eq!(engine.take_reports().len(), 3);
    }

    #[test]
    fn test_new_animation_takes_over_pads() {
        let mut engine = AnimationEngine::new(vec![1, 2, 3]);
        let mut painter = PadPainter::new(RecordingPort::default());
        let options = blink_options(200, 5);

        let first = engine
            .blink_pulse(&mut painter, &[1, 2], Color::GREEN, &options, at(0))
            .unwrap();
        let second = engine
            .blink_pulse(&mut painter, &[2, 3], Color::RED, &options, at(10))
            .unwrap();

        assert!(engine.is_running(first));
        assert_eq!(engine.owner_of(1), Some(first));
        assert_eq!(engine.owner_of(2), Some(second));
        assert_eq!(painter.port().writes_for(2), vec![Color::GREEN, Color::RED]);

        // The first blink toggles at 100 but no longer touches pad 2.
        engine.poll(at(100), &mut painter);
        assert_eq!(painter.port().last(1), Some(Color::OFF));
        assert_eq!(painter.port().last(2), Some(Color::RED));

        let third = engine
            .blink_pulse(&mut painter, &[1], Color::AMBER, &options, at(120))
            .unwrap();
        assert!(!engine.is_running(first));
        assert_eq!(engine.owner_of(1), Some(third));
        assert_eq!(painter.port().last(1), Some(Color::AMBER));

        let reports = engine.take_reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].id, first);
        assert_eq!(reports[0].outcome, AnimationOutcome::Superseded);
    }

    #[test]
    fn test_empty_targets_start_nothing() {
        let mut engine = AnimationEngine::new(vec![1, 2, 3]);
        let mut painter = PadPainter::new(RecordingPort::default());

        let id = engine.blink_pulse(
            &mut painter,
            &[],
            Color::GREEN,
            &AnimationOptions::default(),
            at(0),
        );
        assert_eq!(id, None);
        assert!(engine.is_idle());
        assert!(painter.port().writes.is_empty());
    }

    #[test]
    fn test_shutdown_ripple_trail() {
        let mut engine = AnimationEngine::new(vec![1, 2, 3]);
        let mut painter = PadPainter::new(RecordingPort::default());

        engine.play_shutdown_animation(&mut painter, &[3, 1, 2], &AnimationOptions::default(), at(0));
        // The head starts at the lowest pad, the rest wait for it.
        assert_eq!(painter.port().writes_for(1), vec![Color::AMBER]);
        assert!(painter.port().writes_for(3).is_empty());

        drive(&mut engine, &mut painter);

        let pass = [Color::AMBER, Color::ORANGE, Color::RED, Color::RED_DIM, Color::OFF];
        let expected: Vec<Color> = pass.iter().chain(pass.iter()).copied().collect();
        assert_eq!(painter.port().writes_for(1), expected);
        for pad in [1, 2, 3] {
            assert_eq!(painter.port().last(pad), Some(Color::OFF));
            assert!(!painter.port().has_consecutive_duplicates(pad));
        }

        let reports = engine.take_reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].kind, AnimationKind::Shutdown);
        assert_eq!(reports[0].outcome, AnimationOutcome::Completed);
    }

    #[test]
    fn test_short_trail() {
        let mut engine = AnimationEngine::new(vec![1, 2]);
        let mut painter = PadPainter::new(RecordingPort::default());
        let options = AnimationOptions {
            trail: Some(1),
            passes: Some(1),
            ..AnimationOptions::default()
        };

        engine.play_shutdown_animation(&mut painter, &[1, 2], &options, at(0));
        drive(&mut engine, &mut painter);

        assert_eq!(painter.port().writes_for(1), vec![Color::AMBER, Color::OFF]);
        assert_eq!(painter.port().writes_for(2), vec![Color::AMBER, Color::OFF]);
    }

    #[test]
    fn test_boot_wave_covers_whole_grid() {
        let grid: Vec<u8> = (0..8).collect();
        let mut engine = AnimationEngine::new(grid.clone());
        let mut painter = PadPainter::new(RecordingPort::default());
        let options = AnimationOptions {
            use_all_pads: true,
            ..AnimationOptions::default()
        };

        let id = engine
            .play_boot_animation(&mut painter, &[], &options, at(0))
            .unwrap();

        // Neighbouring groups are out of phase from the first frame.
        assert_eq!(painter.port().last(0), Some(Color::GREEN_DIM));
        assert_eq!(painter.port().last(4), Some(Color::GREEN_MID));

        drive(&mut engine, &mut painter);

        for &pad in &grid {
            let writes = painter.port().writes_for(pad);
            assert!(writes.contains(&Color::AMBER));
            assert_eq!(writes.last(), Some(&Color::OFF));
            assert!(!painter.port().has_consecutive_duplicates(pad));
        }
        let reports = engine.take_reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].id, id);
        assert_eq!(reports[0].kind, AnimationKind::Boot);
        assert_eq!(reports[0].outcome, AnimationOutcome::Completed);
    }

    #[test]
    fn test_failed_writes_do_not_stop_animation() {
        let mut engine = AnimationEngine::new(vec![1, 2]);
        let mut painter = PadPainter::new(RecordingPort::failing_on(&[1]));

        engine.blink_pulse(&mut painter, &[1, 2], Color::RED, &blink_options(200, 1), at(0));
        drive(&mut engine, &mut painter);

        assert!(painter.port().writes_for(1).is_empty());
        assert_eq!(painter.port().writes_for(2), vec![Color::RED, Color::OFF]);
        assert!(painter.failed_writes() > 0);
        assert_eq!(
            engine.take_reports()[0].outcome,
            AnimationOutcome::Completed
        );
    }
}
