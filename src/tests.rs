#[cfg(test)]
mod tests {
    use crate::reconciler::Inbound;
    use crate::state::{ConnectionState, State};

    fn apply_frame(state: &mut State, raw: &str) {
        state.apply(Inbound::parse(raw));
    }

    /// A greeting frame must not move the log or the aggregates
    #[test]
    fn test_status_frame_changes_nothing() {
        let mut state = State::new();

        apply_frame(&mut state, r#"{"message":"connected"}"#);

        assert_eq!(state.event_count(), 0);
        assert_eq!(state.stats().total, 0);
        assert_eq!(state.stats().flagged, 0);
        assert_eq!(state.stats().recent_volume, 0.0);
    }

    /// Paired frames grow both logs by one and scale volume by ten
    #[test]
    fn test_paired_frame_counts_and_scales_volume() {
        let mut state = State::new();

        apply_frame(
            &mut state,
            r#"{"predictions":{"logistic":0,"random_forest":0,"xgboost":1},"transaction":{"Amount":50}}"#,
        );

        assert_eq!(state.transaction_count(), 1);
        assert_eq!(state.prediction_count(), 1);
        let stats = state.stats();
        assert_eq!(stats.total, 1);
        assert_eq!(stats.flagged, 1);
        assert_eq!(stats.recent_volume, 500.0);
    }

    /// Single-prediction frames contribute the raw amount, unscaled
    #[test]
    fn test_single_frames_accumulate_unscaled_volume() {
        let mut state = State::new();
        let frame = r#"{"prediction":{"logistic":0,"random_forest":0,"xgboost":0},"transaction":{"Amount":200}}"#;

        apply_frame(&mut state, frame);
        apply_frame(&mut state, frame);

        let stats = state.stats();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.flagged, 0);
        assert_eq!(stats.recent_volume, 400.0);
    }

    /// A bare prediction grows only the prediction log, leaving the two
    /// logs out of lockstep; pairing by index then shows a missing side
    #[test]
    fn test_bare_prediction_desyncs_logs() {
        let mut state = State::new();

        apply_frame(&mut state, r#"{"prediction":{"logistic":1}}"#);

        assert_eq!(state.prediction_count(), 1);
        assert_eq!(state.transaction_count(), 0);
        assert_eq!(state.stats().total, 0);
        assert_eq!(state.stats().flagged, 0);

        let (transaction, prediction) = state.event_at(0).unwrap();
        assert!(transaction.is_none());
        assert!(prediction.is_some());
    }

    /// Absent amounts contribute zero volume, never an error
    #[test]
    fn test_absent_amount_contributes_zero() {
        let mut state = State::new();

        apply_frame(
            &mut state,
            r#"{"predictions":{"xgboost":1},"transaction":{"transaction_id":"tx-1"}}"#,
        );

        assert_eq!(state.stats().total, 1);
        assert_eq!(state.stats().recent_volume, 0.0);
    }

    /// Unrecognized frames are dropped without any state change
    #[test]
    fn test_unknown_frames_are_dropped() {
        let mut state = State::new();

        apply_frame(&mut state, r#"{"heartbeat":true}"#);
        apply_frame(&mut state, "not json at all");
        apply_frame(&mut state, r#"{"error":"model exploded"}"#);

        assert_eq!(state.event_count(), 0);
        assert_eq!(state.stats().total, 0);
    }

    #[test]
    fn test_connection_status_tracking() {
        let mut state = State::new();
        assert_eq!(state.connection(), ConnectionState::Connecting);

        state.set_connection(ConnectionState::Connected);
        assert_eq!(state.connection(), ConnectionState::Connected);

        state.set_connection(ConnectionState::Disconnected);
        assert_eq!(state.connection(), ConnectionState::Disconnected);
    }

    /// Mixed traffic: paired and single frames interleaved with noise
    #[test]
    fn test_interleaved_shapes() {
        let mut state = State::new();

        apply_frame(&mut state, r#"{"message":"Connected to WebSocket"}"#);
        apply_frame(
            &mut state,
            r#"{"predictions":{"logistic":1},"transaction":{"Amount":10}}"#,
        );
        apply_frame(&mut state, r#"{"prediction":{"logistic":0}}"#);
        apply_frame(
            &mut state,
            r#"{"prediction":{"xgboost":1},"transaction":{"Amount":30}}"#,
        );

        assert_eq!(state.transaction_count(), 2);
        assert_eq!(state.prediction_count(), 3);
        let stats = state.stats();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.flagged, 2);
        // 10 * 10 (paired) + 30 (single)
        assert_eq!(stats.recent_volume, 130.0);
    }
}
