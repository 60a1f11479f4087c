mod tests {
    use launchgrid::color::{Color, LedState, blend_colors};

    #[test]
    fn test_channels_are_clamped() {
        assert_eq!(Color::new(7, 9), Color::new(3, 3));
        assert_eq!(Color::new(7, 9).red(), 3);
        assert!(Color::OFF.is_off());
        assert!(!Color::RED_DIM.is_off());
    }

    #[test]
    fn test_blend_colors() {
        assert_eq!(blend_colors(Color::GREEN_DIM, Color::GREEN, 0), Color::GREEN_DIM);
        assert_eq!(blend_colors(Color::GREEN_DIM, Color::GREEN, 255), Color::GREEN);
        assert_eq!(blend_colors(Color::GREEN_DIM, Color::GREEN, 128), Color::GREEN_MID);
        assert_eq!(blend_colors(Color::AMBER, Color::OFF, 255), Color::OFF);
    }

    #[test]
    fn test_unknown_states_fall_back_to_unassigned() {
        assert_eq!(LedState::from_raw(200), LedState::Unassigned);
        assert_eq!(LedState::parse_from_str("sleeping"), LedState::Unassigned);
        assert_eq!(LedState::from_raw(200).color(), Color::OFF);
    }

    #[test]
    fn test_state_names() {
        assert_eq!(LedState::parse_from_str("running_focused"), LedState::RunningFocused);
        assert_eq!(LedState::from_raw(9), LedState::Error);
        assert_eq!(LedState::Minimized.as_str(), "minimized");
    }

    #[test]
    fn test_app_states_are_distinguishable() {
        let colors = [
            LedState::Unassigned.color(),
            LedState::AssignedStopped.color(),
            LedState::RunningBackground.color(),
            LedState::RunningFocused.color(),
            LedState::Minimized.color(),
            LedState::Error.color(),
        ];
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_transitional_states() {
        assert!(LedState::Launching.is_transitional());
        assert!(!LedState::RunningFocused.is_transitional());
    }
}
