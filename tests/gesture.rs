mod tests {
    use embassy_time::{Duration, Instant};
    use launchgrid::{GestureDecoder, GestureEvent, GestureKind, GestureTimings};

    const PAD: u8 = 5;

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    fn tap(decoder: &mut GestureDecoder, down: u64, up: u64) -> Option<GestureKind> {
        decoder.on_down(PAD, at(down));
        decoder.on_up(PAD, at(up)).map(|event| event.kind)
    }

    #[test]
    fn test_single_press() {
        let mut decoder = GestureDecoder::default();
        decoder.on_down(PAD, at(0));
        assert_eq!(
            decoder.on_up(PAD, at(100)),
            Some(GestureEvent {
                pad: PAD,
                kind: GestureKind::SinglePress
            })
        );
        assert_eq!(decoder.poll(at(2_000)), None);
    }

    #[test]
    fn test_bounce_is_ignored_and_disarms_long_press() {
        let mut decoder = GestureDecoder::default();
        assert_eq!(tap(&mut decoder, 0, 10), None);
        assert_eq!(decoder.poll(at(1_000)), None);
        assert!(!decoder.is_down(PAD));
    }

    #[test]
    fn test_up_without_down_is_noise() {
        let mut decoder = GestureDecoder::default();
        assert_eq!(decoder.on_up(PAD, at(100)), None);
    }

    #[test]
    fn test_double_tap() {
        let mut decoder = GestureDecoder::default();
        assert_eq!(tap(&mut decoder, 0, 100), Some(GestureKind::SinglePress));
        assert_eq!(tap(&mut decoder, 200, 300), Some(GestureKind::DoubleTap));
    }

    #[test]
    fn test_slow_second_tap_is_single() {
        let mut decoder = GestureDecoder::default();
        assert_eq!(tap(&mut decoder, 0, 100), Some(GestureKind::SinglePress));
        assert_eq!(tap(&mut decoder, 550, 650), Some(GestureKind::SinglePress));
    }

    #[test]
    fn test_triple_tap_does_not_double_twice() {
        let mut decoder = GestureDecoder::default();
        assert_eq!(tap(&mut decoder, 0, 80), Some(GestureKind::SinglePress));
        assert_eq!(tap(&mut decoder, 150, 230), Some(GestureKind::DoubleTap));
        assert_eq!(tap(&mut decoder, 300, 380), Some(GestureKind::SinglePress));
    }

    #[test]
    fn test_double_tap_is_per_pad() {
        let mut decoder = GestureDecoder::default();
        assert_eq!(tap(&mut decoder, 0, 100), Some(GestureKind::SinglePress));
        decoder.on_down(6, at(150));
        assert_eq!(
            decoder.on_up(6, at(250)).map(|event| event.kind),
            Some(GestureKind::SinglePress)
        );
    }

    #[test]
    fn test_long_press_fires_once() {
        let mut decoder = GestureDecoder::default();
        decoder.on_down(PAD, at(0));
        assert_eq!(decoder.next_deadline(), Some(at(800)));
        assert_eq!(decoder.poll(at(799)), None);
        assert_eq!(
            decoder.poll(at(800)),
            Some(GestureEvent {
                pad: PAD,
                kind: GestureKind::LongPress
            })
        );
        assert_eq!(decoder.poll(at(900)), None);
        assert_eq!(decoder.on_up(PAD, at(1_000)), None);
        assert!(!decoder.is_down(PAD));
    }

    #[test]
    fn test_tap_after_long_press_is_not_double() {
        let mut decoder = GestureDecoder::default();
        decoder.on_down(PAD, at(0));
        assert!(decoder.poll(at(800)).is_some());
        assert_eq!(decoder.on_up(PAD, at(850)), None);
        assert_eq!(tap(&mut decoder, 900, 1_000), Some(GestureKind::SinglePress));
    }

    #[test]
    fn test_repeated_down_replaces_timer() {
        let mut decoder = GestureDecoder::default();
        decoder.on_down(PAD, at(0));
        decoder.on_down(PAD, at(300));
        assert_eq!(decoder.poll(at(800)), None);
        assert_eq!(
            decoder.poll(at(1_100)).map(|event| event.kind),
            Some(GestureKind::LongPress)
        );
        assert_eq!(decoder.poll(at(2_000)), None);
    }

    #[test]
    fn test_cooldown_suppresses_quick_repeat() {
        let timings = GestureTimings {
            cooldown: Duration::from_millis(300),
            ..GestureTimings::default()
        };
        let mut decoder = GestureDecoder::new(timings);
        assert_eq!(tap(&mut decoder, 0, 100), Some(GestureKind::SinglePress));
        assert_eq!(tap(&mut decoder, 150, 250), None);
        assert_eq!(tap(&mut decoder, 1_000, 1_100), Some(GestureKind::SinglePress));
    }

    #[test]
    fn test_cancel_pad_keeps_double_tap_memory() {
        let mut decoder = GestureDecoder::default();
        assert_eq!(tap(&mut decoder, 0, 100), Some(GestureKind::SinglePress));
        decoder.on_down(PAD, at(150));
        decoder.cancel_pad(PAD);
        assert!(!decoder.is_down(PAD));
        assert_eq!(decoder.poll(at(160)), None);
        assert_eq!(decoder.next_deadline(), None);
        assert_eq!(tap(&mut decoder, 300, 400), Some(GestureKind::DoubleTap));
    }

    #[test]
    fn test_reset_forgets_everything() {
        let mut decoder = GestureDecoder::default();
        assert_eq!(tap(&mut decoder, 0, 100), Some(GestureKind::SinglePress));
        decoder.on_down(PAD, at(150));
        decoder.reset();
        assert_eq!(decoder.next_deadline(), None);
        assert_eq!(decoder.on_up(PAD, at(200)), None);
        assert_eq!(tap(&mut decoder, 250, 350), Some(GestureKind::SinglePress));
    }

    #[test]
    fn test_idle_pads_are_pruned() {
        let mut decoder = GestureDecoder::default();
        assert_eq!(tap(&mut decoder, 0, 100), Some(GestureKind::SinglePress));
        assert_eq!(decoder.tracked_pads(), 1);
        assert_eq!(decoder.poll(at(1_000)), None);
        assert_eq!(decoder.tracked_pads(), 0);
    }

    #[test]
    fn test_long_hold_released_before_poll() {
        let mut decoder = GestureDecoder::default();
        decoder.on_down(PAD, at(0));
        assert_eq!(
            decoder.on_up(PAD, at(1_500)),
            Some(GestureEvent {
                pad: PAD,
                kind: GestureKind::LongPress
            })
        );
        assert_eq!(decoder.poll(at(1_600)), None);
        assert_eq!(decoder.next_deadline(), None);
        // A long press leaves no double-tap memory behind.
        assert_eq!(tap(&mut decoder, 1_700, 1_800), Some(GestureKind::SinglePress));
    }

    #[test]
    fn test_hold_of_exactly_long_press_on_release() {
        let mut decoder = GestureDecoder::default();
        decoder.on_down(PAD, at(0));
        assert_eq!(
            decoder.on_up(PAD, at(800)).map(|event| event.kind),
            Some(GestureKind::LongPress)
        );

        let mut decoder = GestureDecoder::default();
        assert_eq!(tap(&mut decoder, 0, 799), Some(GestureKind::SinglePress));
    }
}
