//! Trim runs against a fake media toolchain.

mod common;

use std::sync::Arc;

use chrono::Utc;

use demoreel_editor::artifact::default_trimmed_path;
use demoreel_editor::{AnalysisConfig, EditorError, TrimOptions, VideoAnalyzer};
use demoreel_models::{
    AnalysisSummary, SilenceSegment, TimeRange, TimeSegment, TrimResult, TrimSuggestion, VideoAnalysis,
};

use common::{static_then_busy, write_video, FakeAdapter};

fn analysis_with(duration: f64, suggestions: Vec<TrimSuggestion>, silences: Vec<SilenceSegment>) -> VideoAnalysis {
    VideoAnalysis {
        video_path: "demo.mp4".to_string(),
        duration,
        silences,
        keyframes: Vec::new(),
        actions: None,
        suggestions,
        frame_diffs: Vec::new(),
        summary: AnalysisSummary::default(),
        analyzed_at: Utc::now(),
    }
}

fn assert_partition(result: &TrimResult) {
    let mut all: Vec<TimeSegment> = result
        .kept_segments
        .iter()
        .chain(&result.removed_segments)
        .copied()
        .collect();
    all.sort_by(|a, b| a.start_sec.total_cmp(&b.start_sec));

    assert_eq!(all.first().map(|s| s.start_sec), Some(0.0));
    assert_eq!(all.last().map(|s| s.end_sec), Some(result.original_duration));
    for pair in all.windows(2) {
        assert!((pair[0].end_sec - pair[1].start_sec).abs() < 1e-9);
    }

    let kept: f64 = result.kept_segments.iter().map(|s| s.duration_sec()).sum();
    assert!((kept - result.trimmed_duration).abs() < 1e-9);
}

#[tokio::test]
async fn test_trim_without_analysis_fails() {
    let dir = tempfile::tempdir().unwrap();
    let video = write_video(dir.path(), "demo.mp4").await;

    let analyzer = VideoAnalyzer::with_adapter(Arc::new(FakeAdapter::new(60.0)), AnalysisConfig::default());
    let err = analyzer.trim_video(&video, None, None).await.unwrap_err();

    assert!(matches!(err, EditorError::AnalysisMissing(_)));
    assert!(err.to_string().contains("run analysis"));
    assert!(!default_trimmed_path(&video).exists());
}

#[tokio::test]
async fn test_analyze_then_trim() {
    let dir = tempfile::tempdir().unwrap();
    let video = write_video(dir.path(), "demo.mp4").await;

    let adapter = Arc::new(
        FakeAdapter::new(60.0)
            .with_silences(&[(20.0, 30.0)])
            .with_frame_size(static_then_busy(10.0)),
    );
    let analyzer = VideoAnalyzer::with_adapter(adapter.clone(), AnalysisConfig::default());

    analyzer.analyze_video(&video).await.unwrap();
    let result = analyzer.trim_video(&video, None, None).await.unwrap();

    assert_eq!(
        result.removed_segments,
        vec![TimeSegment::new(0.0, 10.0), TimeSegment::new(20.5, 29.5)]
    );
    assert_eq!(
        result.kept_segments,
        vec![TimeSegment::new(10.0, 20.5), TimeSegment::new(29.5, 60.0)]
    );
    assert!((result.trimmed_duration - 41.0).abs() < 1e-9);
    assert_partition(&result);

    let output = default_trimmed_path(&video);
    assert_eq!(result.trimmed_path, output.display().to_string());
    assert!(output.exists());

    let calls = adapter.concat_calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0], result.kept_segments);
}

#[tokio::test]
async fn test_no_suggestions_copies_source() {
    let dir = tempfile::tempdir().unwrap();
    let video = write_video(dir.path(), "demo.mp4").await;
    let output = dir.path().join("out.mp4");

    let adapter = Arc::new(FakeAdapter::new(42.0));
    let analyzer = VideoAnalyzer::with_adapter(adapter.clone(), AnalysisConfig::default());

    let result = analyzer
        .trim_with_analysis(
            &video,
            analysis_with(42.0, Vec::new(), Vec::new()),
            TrimOptions {
                output: Some(output.clone()),
                min_pause_to_keep_sec: None,
            },
        )
        .await
        .unwrap();

    assert!(result.removed_segments.is_empty());
    assert_eq!(result.kept_segments, vec![TimeSegment::new(0.0, 42.0)]);
    assert!((result.trimmed_duration - 42.0).abs() < f64::EPSILON);
    assert_eq!(
        tokio::fs::read(&output).await.unwrap(),
        tokio::fs::read(&video).await.unwrap()
    );
    assert!(adapter.concat_calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_min_pause_override_rederives_suggestions() {
    let dir = tempfile::tempdir().unwrap();
    let video = write_video(dir.path(), "demo.mp4").await;

    let silences = vec![SilenceSegment::new(40.0, 50.0).with_decision(false, "Long pause (10.0s) - recommend removal")];
    let stored = vec![TrimSuggestion::remove_pause(40.5, 49.5, 0.9, "Long pause")];

    let analyzer = VideoAnalyzer::with_adapter(Arc::new(FakeAdapter::new(100.0)), AnalysisConfig::default());
    let result = analyzer
        .trim_with_analysis(
            &video,
            analysis_with(100.0, stored, silences),
            TrimOptions {
                output: None,
                min_pause_to_keep_sec: Some(4.0),
            },
        )
        .await
        .unwrap();

    assert_eq!(result.removed_segments, vec![TimeSegment::new(42.0, 48.0)]);
    assert_partition(&result);
}

#[tokio::test]
async fn test_overlapping_suggestions_still_partition() {
    let dir = tempfile::tempdir().unwrap();
    let video = write_video(dir.path(), "demo.mp4").await;

    let suggestions = vec![
        TrimSuggestion::remove_pause(25.0, 35.0, 0.7, "b"),
        TrimSuggestion::remove_pause(0.0, 5.0, 0.9, "a"),
        TrimSuggestion::remove_pause(30.0, 40.0, 0.7, "c"),
        TrimSuggestion::remove_pause(55.0, 70.0, 0.7, "d"),
    ];

    let analyzer = VideoAnalyzer::with_adapter(Arc::new(FakeAdapter::new(60.0)), AnalysisConfig::default());
    let result = analyzer
        .trim_with_analysis(&video, analysis_with(60.0, suggestions, Vec::new()), TrimOptions::default())
        .await
        .unwrap();

    assert_eq!(
        result.removed_segments,
        vec![
            TimeSegment::new(0.0, 5.0),
            TimeSegment::new(25.0, 40.0),
            TimeSegment::new(55.0, 60.0),
        ]
    );
    assert_partition(&result);
}

#[tokio::test]
async fn test_output_cannot_overwrite_source() {
    let dir = tempfile::tempdir().unwrap();
    let video = write_video(dir.path(), "demo.mp4").await;

    let analyzer = VideoAnalyzer::with_adapter(Arc::new(FakeAdapter::new(10.0)), AnalysisConfig::default());
    let err = analyzer
        .trim_with_analysis(
            &video,
            analysis_with(10.0, Vec::new(), Vec::new()),
            TrimOptions {
                output: Some(video.clone()),
                min_pause_to_keep_sec: None,
            },
        )
        .await
        .unwrap_err();

    assert!(err.is_precondition());
}

#[tokio::test]
async fn test_output_through_dot_dot_cannot_overwrite_source() {
    let dir = tempfile::tempdir().unwrap();
    let video = write_video(dir.path(), "demo.mp4").await;
    let output = dir.path().join("sub").join("..").join("demo.mp4");

    let adapter = Arc::new(FakeAdapter::new(10.0));
    let analyzer = VideoAnalyzer::with_adapter(adapter.clone(), AnalysisConfig::default());
    let suggestions = vec![TrimSuggestion::remove_pause(2.0, 4.0, 0.9, "pause")];
    let err = analyzer
        .trim_with_analysis(
            &video,
            analysis_with(10.0, suggestions, Vec::new()),
            TrimOptions {
                output: Some(output),
                min_pause_to_keep_sec: None,
            },
        )
        .await
        .unwrap_err();

    assert!(err.is_precondition());
    assert!(adapter.concat_calls.lock().unwrap().is_empty());
    assert_eq!(tokio::fs::read(&video).await.unwrap(), b"not really a video");
}

#[tokio::test]
async fn test_sibling_analysis_is_not_reused() {
    let dir = tempfile::tempdir().unwrap();
    let first = write_video(dir.path(), "first.mp4").await;
    let second = write_video(dir.path(), "second.mp4").await;

    let adapter = Arc::new(
        FakeAdapter::new(60.0)
            .with_silences(&[(20.0, 30.0)])
            .with_frame_size(static_then_busy(0.0)),
    );
    let analyzer = VideoAnalyzer::with_adapter(adapter.clone(), AnalysisConfig::default());
    analyzer.analyze_video(&first).await.unwrap();

    let err = analyzer.trim_video(&second, None, None).await.unwrap_err();

    assert!(matches!(err, EditorError::AnalysisMissing(_)));
    assert!(!default_trimmed_path(&second).exists());
    assert!(adapter.concat_calls.lock().unwrap().is_empty());

    // The first video's own artifact still drives its trim
    let result = analyzer.trim_video(&first, None, None).await.unwrap();
    assert_eq!(result.removed_segments, vec![TimeSegment::new(20.5, 29.5)]);
}
