use rl_logger::{
    Accumulator, DisplayHints, HistoryStore, InMemoryHistoryStore, JsonHistoryStore, Logger, LoggerConfig,
    LoggerError, Reading, RecordingReporter, Update,
};

type TestLogger = Logger<RecordingReporter, InMemoryHistoryStore>;

fn test_logger(dir: &tempfile::TempDir) -> TestLogger {
    let config = LoggerConfig::new("experiment1").with_path(dir.path().join("run"));
    Logger::with_parts(config, RecordingReporter::new(), InMemoryHistoryStore::new()).unwrap()
}

#[test]
fn test_create_makes_run_directory() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("experiment1");

    let log = Logger::create("experiment1", Some(path.clone())).unwrap();
    assert!(path.is_dir());
    assert_eq!(log.label(), "experiment1");
    assert_eq!(log.path(), path.as_path());

    // Reusing an existing directory is allowed
    assert!(Logger::create("experiment1", Some(path)).is_ok());
}

#[test]
fn test_duplicate_group_tag_rejected() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut log = test_logger(&temp_dir);

    log.add_group(Some("training"), [Accumulator::max("max_q").unwrap()], DisplayHints::default())
        .unwrap();
    let err = log
        .add_group(Some("training"), [Accumulator::sum("reward").unwrap()], DisplayHints::default())
        .unwrap_err();

    assert!(matches!(err, LoggerError::DuplicateGroupTag(ref t) if t == "training"));
    assert_eq!(log.registry().live_count(), 1);
    assert_eq!(log.reporter().groups, vec!["training".to_string()]);
}

#[test]
fn test_failed_group_leaves_registry_untouched() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut log = test_logger(&temp_dir);

    let err = log
        .add_group(None, [Accumulator::max("q").unwrap(), Accumulator::max("q").unwrap()], DisplayHints::default())
        .unwrap_err();
    assert!(matches!(err, LoggerError::DuplicateMetricName { .. }));
    assert_eq!(log.registry().live_count(), 0);

    let group = log.add_group(None, [Accumulator::max("q").unwrap()], DisplayHints::default()).unwrap();
    assert_eq!(group.tag(), "group00");
}

#[test]
fn test_auto_tags_per_logger() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut a = test_logger(&temp_dir);
    let mut b = test_logger(&temp_dir);

    let a0 = a.add_group(None, [Accumulator::max("q").unwrap()], DisplayHints::default()).unwrap();
    let a1 = a.add_group(None, [Accumulator::max("q").unwrap()], DisplayHints::default()).unwrap();
    let b0 = b.add_group(None, [Accumulator::max("q").unwrap()], DisplayHints::default()).unwrap();

    assert_eq!(a0.tag(), "group00");
    assert_eq!(a1.tag(), "group01");
    assert_eq!(b0.tag(), "group00", "loggers must not share naming state");

    a.release_group(a0).unwrap();
    assert_eq!(a.registry().live_count(), 1);
}

#[test]
fn test_emit_reports_and_persists() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut log = test_logger(&temp_dir);
    let mut eval = log
        .add_group(
            Some("evaluation"),
            [
                Accumulator::episodic_average("rw_per_ep").unwrap().emphasized(),
                Accumulator::average("rw_per_step").unwrap(),
                Accumulator::max("max_q").unwrap(),
            ],
            DisplayHints::parse(Some("white"), Some("on_magenta"), &["bold"]).unwrap(),
        )
        .unwrap();

    for (i, r) in [1.0, 2.0, 3.0, 4.0].into_iter().enumerate() {
        let done = i % 2 == 1;
        let updates: [(&str, Update); 3] = [
            ("rw_per_ep", (r, u64::from(done)).into()),
            ("rw_per_step", r.into()),
            ("max_q", (r * 10.0).into()),
        ];
        eval.update(updates).unwrap();
    }

    let report = log.emit(&eval, 1000).unwrap();
    assert_eq!(report.step_idx, 1000);
    assert!(report.failed.is_empty());
    assert!(report.time_idx >= 0.0);

    // Reporter sees the post-update state in construction order
    let shown = log.reporter().last().unwrap();
    assert_eq!(shown.tag, "evaluation");
    assert_eq!(shown.step_idx, 1000);
    let values: Vec<(&str, Option<&Reading>, bool)> =
        shown.metrics.iter().map(|m| (m.name.as_str(), m.value.as_ref(), m.emphasized)).collect();
    assert_eq!(
        values,
        vec![
            ("rw_per_ep", Some(&Reading::Scalar(5.0)), true),
            ("rw_per_step", Some(&Reading::Scalar(2.5)), false),
            ("max_q", Some(&Reading::Scalar(40.0)), false),
        ]
    );

    let history = log.store().load("evaluation").unwrap().unwrap();
    for name in ["rw_per_ep", "rw_per_step", "max_q"] {
        let series = history.get(name).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].step_idx, 1000);
        assert_eq!(series[0].time_idx, report.time_idx, "one time index per emit");
    }
}

#[test]
fn test_emit_isolates_failed_metrics() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut log = test_logger(&temp_dir);
    let mut group = log
        .add_group(
            Some("training"),
            [Accumulator::average("loss").unwrap(), Accumulator::max("max_q").unwrap()],
            DisplayHints::default(),
        )
        .unwrap();
    group.update([("max_q", 2.0)]).unwrap();

    let report = log.emit(&group, 10).unwrap();
    assert_eq!(report.failed, vec!["loss".to_string()]);

    let shown = log.reporter().last().unwrap();
    assert_eq!(shown.metrics[0].value, None);
    assert_eq!(shown.metrics[1].value, Some(Reading::Scalar(2.0)));

    let history = log.store().load("training").unwrap().unwrap();
    assert!(history.get("loss").unwrap().is_empty(), "series exists but has no entry");
    assert_eq!(history.get("max_q").unwrap().len(), 1);
}

#[test]
fn test_emit_then_reset_windows() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut log = test_logger(&temp_dir);
    let mut train = log
        .add_group(Some("training"), [Accumulator::sum("reward").unwrap()], DisplayHints::default())
        .unwrap();

    for step in 1..=6u64 {
        train.update([("reward", 1.0)]).unwrap();
        if step % 3 == 0 {
            log.emit(&train, step).unwrap();
            log.reset(&mut train);
        }
    }

    let history = log.store().load("training").unwrap().unwrap();
    let values: Vec<(u64, Reading)> =
        history.get("reward").unwrap().iter().map(|e| (e.step_idx, e.value.clone())).collect();
    assert_eq!(values, vec![(3, Reading::Scalar(3.0)), (6, Reading::Scalar(3.0))]);
}

#[test]
fn test_emit_unregistered_group_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut a = test_logger(&temp_dir);
    let mut b = test_logger(&temp_dir);
    let group = a
        .add_group(Some("training"), [Accumulator::max("q").unwrap()], DisplayHints::default())
        .unwrap();

    let err = b.emit(&group, 1).unwrap_err();
    assert!(matches!(err, LoggerError::UnknownGroup(ref t) if t == "training"));
    assert!(b.store().load("training").unwrap().is_none());
}

#[test]
fn test_log_info_and_time() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut log = test_logger(&temp_dir);
    let group = log
        .add_group(Some("training"), [Accumulator::max("q").unwrap()], DisplayHints::default())
        .unwrap();

    log.log_info(&group, "warming up").unwrap();
    log.log_time(&group).unwrap();

    let infos = &log.reporter().infos;
    assert_eq!(infos[0], ("training".to_string(), "warming up".to_string()));
    assert!(infos[1].1.starts_with("date: "));
    assert!(infos[1].1.contains(" | "));
}

#[test]
fn test_default_logger_writes_json_history() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("run");
    let config = LoggerConfig::new("run").with_path(&path);
    let mut log = Logger::with_parts(config, RecordingReporter::new(), JsonHistoryStore::new(&path)).unwrap();

    let mut group = log
        .add_group(Some("Eval Greedy"), [Accumulator::max("q").unwrap()], DisplayHints::default())
        .unwrap();
    group.update([("q", 1.0)]).unwrap();
    log.emit(&group, 1).unwrap();
    group.update([("q", 2.0)]).unwrap();
    log.emit(&group, 2).unwrap();

    assert!(path.join("eval_greedy.json").exists());

    // A second logger on the same directory continues the history
    let reopened = JsonHistoryStore::new(&path);
    let history = reopened.load("Eval Greedy").unwrap().unwrap();
    let steps: Vec<u64> = history.get("q").unwrap().iter().map(|e| e.step_idx).collect();
    assert_eq!(steps, vec![1, 2]);
}

#[test]
fn test_invalid_display_hints_rejected() {
    let err = DisplayHints::parse(Some("not-a-color"), None, &[]).unwrap_err();
    assert!(matches!(err, LoggerError::InvalidConfiguration(_)));

    let err = DisplayHints::parse(Some("white"), Some("on_blue"), &["blink_fast"]).unwrap_err();
    assert!(matches!(err, LoggerError::InvalidConfiguration(_)));

    assert!(DisplayHints::parse(Some("white"), Some("on_blue"), &["bold"]).is_ok());
}

#[test]
fn test_tags_sharing_a_history_file_rejected() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("run");
    let config = LoggerConfig::new("run").with_path(&path);
    let mut log = Logger::with_parts(config, RecordingReporter::new(), JsonHistoryStore::new(&path)).unwrap();

    let mut train = log
        .add_group(Some("Train"), [Accumulator::max("loss").unwrap()], DisplayHints::default())
        .unwrap();
    let err = log
        .add_group(Some("train"), [Accumulator::sum("reward").unwrap()], DisplayHints::default())
        .unwrap_err();
    assert!(matches!(err, LoggerError::DuplicateGroupTag(ref t) if t == "train"));
    assert_eq!(log.registry().live_count(), 1);

    train.update([("loss", 1.0)]).unwrap();
    log.emit(&train, 1).unwrap();
    let history = log.store().load("Train").unwrap().unwrap();
    assert_eq!(history.names().collect::<Vec<_>>(), vec!["loss"]);
}

#[test]
fn test_path_like_group_tag_rejected() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("run");
    let config = LoggerConfig::new("run").with_path(&path);
    let mut log = Logger::with_parts(config, RecordingReporter::new(), JsonHistoryStore::new(&path)).unwrap();

    let err = log
        .add_group(Some("../escaped"), [Accumulator::max("q").unwrap()], DisplayHints::default())
        .unwrap_err();
    assert!(matches!(err, LoggerError::InvalidConfiguration(_)));
    assert_eq!(log.registry().live_count(), 0);
    assert!(log.reporter().groups.is_empty());
    assert!(!temp_dir.path().join("escaped.json").exists());
}
