//! Pipeline integration: CSV in, JSON report out, policies and conditions.

use signalscope_core::data::{load_csv, read_csv};
use signalscope_core::frame::columns;
use signalscope_core::signals::{SignalCategory, SignalPolicy, TargetModel};
use signalscope_core::{analyze, AnalysisConfig, AnalysisError, Condition, SeriesMeta};
use std::io::Write;

// ── Helpers ──────────────────────────────────────────────────────────

/// CSV text for `n` daily bars with a damped oscillation around 100.
fn csv_text(n: usize, missing_volume: &[usize]) -> String {
    let mut out = String::from("timestamp,open,high,low,close,volume\n");
    let mut prev: f64 = 100.0;
    for i in 0..n {
        let close = 100.0 + (i as f64 * 0.3).sin() * 8.0 + i as f64 * 0.05;
        let high = prev.max(close) + 0.8;
        let low = prev.min(close) - 0.8;
        let volume = if missing_volume.contains(&i) {
            String::new()
        } else {
            format!("{}", 1000 + (i * 37) % 400)
        };
        let day = chrono::NaiveDate::from_ymd_opt(2023, 1, 1).unwrap() + chrono::Duration::days(i as i64);
        out.push_str(&format!("{day},{prev},{high},{low},{close},{volume}\n"));
        prev = close;
    }
    out
}

fn meta() -> SeriesMeta {
    SeriesMeta::new("SOLUSDT", "1d")
}

// ── Tests ────────────────────────────────────────────────────────────

#[test]
fn csv_file_to_report() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(csv_text(120, &[]).as_bytes()).unwrap();

    let series = load_csv(file.path(), meta()).unwrap();
    let report = analyze(&series, &AnalysisConfig::default()).unwrap();

    assert_eq!(report.meta, meta());
    assert_eq!(report.signals.len(), 120);
    assert!(report.conditions.is_empty());
    assert_eq!(report.frame.names().count(), 21);
    assert!(report.manipulation.unwrap().volume_spike.is_some());
}

#[test]
fn missing_volume_is_reported_not_filled() {
    let series = read_csv(csv_text(80, &[5]).as_bytes(), meta()).unwrap();
    let report = analyze(&series, &AnalysisConfig::default()).unwrap();

    assert!(report
        .conditions
        .contains(&Condition::VolumeUnavailable { bars: 1 }));
    assert_eq!(report.frame.get(columns::MFI, 10), None);
    assert!(report.frame.get(columns::MFI, 40).is_some());
}

#[test]
fn fingerprint_tracks_config() {
    let series = read_csv(csv_text(60, &[]).as_bytes(), meta()).unwrap();
    let threshold = analyze(&series, &AnalysisConfig::default()).unwrap();
    let vote = analyze(
        &series,
        &AnalysisConfig {
            signal_policy: SignalPolicy::MajorityVote,
            ..AnalysisConfig::default()
        },
    )
    .unwrap();
    let again = analyze(&series, &AnalysisConfig::default()).unwrap();

    assert_ne!(threshold.fingerprint, vote.fingerprint);
    assert_eq!(threshold.fingerprint, again.fingerprint);
}

#[test]
fn atr_targets_follow_signals() {
    let series = read_csv(csv_text(150, &[]).as_bytes(), meta()).unwrap();
    let config = AnalysisConfig {
        signal_policy: SignalPolicy::MajorityVote,
        targets: TargetModel::AtrMultiple {
            take_profit: 2.0,
            stop_loss: 1.0,
        },
        ..AnalysisConfig::default()
    };
    let report = analyze(&series, &config).unwrap();

    for signal in &report.signals {
        let close = series.bars[signal.index].close;
        match (signal.category, signal.take_profit, signal.stop_loss) {
            (SignalCategory::Hold, tp, sl) => assert!(tp.is_none() && sl.is_none()),
            (SignalCategory::Buy, Some(tp), Some(sl)) => assert!(sl < close && close < tp),
            (SignalCategory::Sell, Some(tp), Some(sl)) => assert!(tp < close && close < sl),
            // ATR still warming up
            (_, None, None) => assert!(report.frame.get(columns::ATR, signal.index).is_none()),
            other => panic!("inconsistent targets {other:?}"),
        }
    }
}

#[test]
fn trend_assessment_counts_match_conditions() {
    let series = read_csv(csv_text(100, &[]).as_bytes(), meta()).unwrap();
    let report = analyze(&series, &AnalysisConfig::default()).unwrap();
    let trend = report.trend.unwrap();

    assert_eq!(trend.index, 99);
    assert_eq!(trend.bullish.len(), 6);
    assert_eq!(trend.bearish.len(), 6);
    assert_eq!(
        trend.bullish_count,
        trend.bullish.iter().filter(|c| c.met).count()
    );
    assert_eq!(
        trend.bearish_count,
        trend.bearish.iter().filter(|c| c.met).count()
    );
}

#[test]
fn invalid_config_from_toml_is_rejected() {
    let series = read_csv(csv_text(60, &[]).as_bytes(), meta()).unwrap();
    let mut config = AnalysisConfig::from_toml_str("rsi_window = 7").unwrap();
    config.rsi_window = 0;
    assert!(matches!(
        analyze(&series, &config),
        Err(AnalysisError::InvalidConfig(_))
    ));
}
