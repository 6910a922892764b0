//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 模板物化性质测试
//! - 端到端生成测试（文件 sink + 内存队列 sink，无需 Kafka）

#[cfg(test)]
mod contract_tests {
    use contracts::{GeneratorCall, RunBlueprint, SinkKind};
    use generators::{Arity, GeneratorRegistry};
    use template::RANGED_GENERATORS;

    #[test]
    fn test_blueprint_defaults() {
        let bp = RunBlueprint::new("t.json");
        assert_eq!(bp.limit, 0);
        assert_eq!(bp.generation.record_ceiling, 1000);
        assert!(!bp.has_unbounded_sink());
        assert!(SinkKind::Queue.is_unbounded());
        assert!(!SinkKind::File.is_unbounded());
    }

    #[test]
    fn test_call_display_matches_directive_grammar() {
        assert_eq!(GeneratorCall::new("uuid").to_string(), "fake:{uuid}");
        assert_eq!(
            GeneratorCall::ranged("number", "1", "100").to_string(),
            "fake:{number:1,100}"
        );
    }

    #[test]
    fn test_ranged_names_match_registry() {
        let registry = GeneratorRegistry::with_builtins();
        let mut ranged: Vec<String> = registry
            .catalog()
            .into_iter()
            .filter(|g| g.arity == Arity::Range)
            .map(|g| g.name)
            .collect();
        ranged.sort();

        let mut expected: Vec<String> = RANGED_GENERATORS.iter().map(|s| s.to_string()).collect();
        expected.sort();
        assert_eq!(ranged, expected);
    }
}

#[cfg(test)]
mod materialize_tests {
    use std::sync::Arc;

    use contracts::FieldErrorPolicy;
    use generators::GeneratorRegistry;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::{json, Value};
    use template::{Materializer, Template};

    fn materializer(policy: FieldErrorPolicy) -> Materializer {
        Materializer::with_rng(
            Arc::new(GeneratorRegistry::with_builtins()),
            policy,
            StdRng::seed_from_u64(42),
        )
    }

    #[test]
    fn test_template_without_directives_is_copied() {
        let source = json!({
            "a": 1,
            "b": "text",
            "c": {"d": [1, 2, {"e": null}], "f": true},
            "g": "fake: not quite"
        });
        let template = Template::from_value(source.clone()).unwrap();
        let mut m = materializer(FieldErrorPolicy::Null);
        for _ in 0..10 {
            assert_eq!(m.materialize(&template).unwrap(), source);
        }
    }

    #[test]
    fn test_template_unchanged_after_many_records() {
        let template = Template::parse(
            r#"{"id":"fake:{uuid}","user":{"name":"fake:{name}","geo":{"lat":"fake:{latitude}"}}}"#,
        )
        .unwrap();
        let before = format!("{:?}", template);
        let snapshot = template.clone();

        let mut m = materializer(FieldErrorPolicy::Null);
        let records: Vec<Value> = (0..100).map(|_| m.materialize(&template).unwrap()).collect();

        assert_eq!(template, snapshot);
        assert_eq!(format!("{:?}", template), before);
        // Fresh trees per record
        assert_ne!(records[0]["id"], records[1]["id"]);
    }

    #[test]
    fn test_number_range_is_inclusive_and_bounded() {
        let template = Template::parse(r#"{"n":"fake:{number:1,100}"}"#).unwrap();
        let mut m = materializer(FieldErrorPolicy::Abort);
        let mut seen_min = i64::MAX;
        let mut seen_max = i64::MIN;
        for _ in 0..1000 {
            let n = m.materialize(&template).unwrap()["n"].as_i64().unwrap();
            assert!((1..=100).contains(&n), "{n} out of range");
            seen_min = seen_min.min(n);
            seen_max = seen_max.max(n);
        }
        assert!(seen_min < 20 && seen_max > 80);
    }

    #[test]
    fn test_deep_nesting_and_arrays() {
        let template = Template::parse(
            r#"{"l1":{"l2":{"l3":{"l4":"fake:{bool}"}}},"list":["fake:{uuid}"]}"#,
        )
        .unwrap();
        let record = materializer(FieldErrorPolicy::Null)
            .materialize(&template)
            .unwrap();
        assert!(record["l1"]["l2"]["l3"]["l4"].is_boolean());
        assert_eq!(record["list"], json!(["fake:{uuid}"]));
    }

    #[test]
    fn test_coordinate_ranges() {
        let template = Template::parse(
            r#"{"lat":"fake:{latituderange:-10,10}","lon":"fake:{longituderange:100,120}"}"#,
        )
        .unwrap();
        let mut m = materializer(FieldErrorPolicy::Abort);
        for _ in 0..200 {
            let r = m.materialize(&template).unwrap();
            let lat = r["lat"].as_f64().unwrap();
            let lon = r["lon"].as_f64().unwrap();
            assert!((-10.0..=10.0).contains(&lat));
            assert!((100.0..=120.0).contains(&lon));
        }
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use contracts::{
        ContractError, EncodedRecord, RecordSink, RetryPolicy, RunBlueprint, SinkConfig, SinkKind,
    };
    use dispatcher::{Fanout, FileSink, FileSinkConfig, QueueSink, QueueSinkConfig, SinkHandle};
    use emitter::{run_blueprint, EmitterBuilder, EmitterConfig, RunState};
    use generators::GeneratorRegistry;
    use serde_json::Value;
    use template::Template;
    use tempfile::tempdir;
    use tokio_util::sync::CancellationToken;

    /// Queue-kind sink that buffers locally and "delivers" on flush
    struct MemoryQueueSink {
        name: String,
        buffered: u64,
        accepted: Arc<AtomicU64>,
        delivered: Arc<AtomicU64>,
    }

    impl MemoryQueueSink {
        fn new(accepted: &Arc<AtomicU64>, delivered: &Arc<AtomicU64>) -> Self {
            Self {
                name: "queue".to_string(),
                buffered: 0,
                accepted: Arc::clone(accepted),
                delivered: Arc::clone(delivered),
            }
        }
    }

    impl RecordSink for MemoryQueueSink {
        fn name(&self) -> &str {
            &self.name
        }

        fn kind(&self) -> SinkKind {
            SinkKind::Queue
        }

        async fn write(&mut self, record: &EncodedRecord) -> Result<usize, ContractError> {
            self.buffered += 1;
            self.accepted.fetch_add(1, Ordering::SeqCst);
            Ok(record.len())
        }

        async fn flush(&mut self) -> Result<(), ContractError> {
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.delivered.fetch_add(self.buffered, Ordering::SeqCst);
            self.buffered = 0;
            Ok(())
        }

        async fn close(&mut self) -> Result<(), ContractError> {
            self.flush().await
        }
    }

    fn write_template(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("template.json");
        std::fs::write(&path, content).unwrap();
        path
    }

    fn read_records(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    fn file_blueprint(template: PathBuf, output: &Path, limit: u64) -> RunBlueprint {
        let mut bp = RunBlueprint::new(template);
        bp.limit = limit;
        bp.sinks
            .push(SinkConfig::new("file", SinkKind::File).with_param("path", output.to_string_lossy()));
        bp
    }

    fn registry() -> Arc<GeneratorRegistry> {
        Arc::new(GeneratorRegistry::with_builtins())
    }

    #[tokio::test]
    async fn test_limit_three_id_status() {
        let dir = tempdir().unwrap();
        let template = write_template(dir.path(), r#"{"id":"fake:{number:1,100}","status":"active"}"#);
        let output = dir.path().join("data/data.txt");

        let report = run_blueprint(
            &file_blueprint(template, &output, 3),
            registry(),
            CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(report.outcome, RunState::Completed);
        assert_eq!(report.records, 3);
        let records = read_records(&output);
        assert_eq!(records.len(), 3);
        for record in records {
            assert_eq!(record["status"], "active");
            let id = record["id"].as_i64().unwrap();
            assert!((1..=100).contains(&id));
        }
    }

    #[tokio::test]
    async fn test_zero_limit_file_only_writes_ceiling() {
        let dir = tempdir().unwrap();
        let template = write_template(dir.path(), r#"{"name":"fake:{name}"}"#);
        let output = dir.path().join("out.txt");

        let report = run_blueprint(
            &file_blueprint(template, &output, 0),
            registry(),
            CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(report.outcome, RunState::Completed);
        assert_eq!(report.records, 1000);
        assert_eq!(read_records(&output).len(), 1000);
    }

    #[tokio::test]
    async fn test_unknown_generator_completes_with_null() {
        let dir = tempdir().unwrap();
        let template = write_template(dir.path(), r#"{"x":"fake:{doesnotexist}","y":"fake:{uuid}"}"#);
        let output = dir.path().join("out.txt");

        let report = run_blueprint(
            &file_blueprint(template, &output, 4),
            registry(),
            CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(report.outcome, RunState::Completed);
        assert_eq!(report.fallbacks, 4);
        for record in read_records(&output) {
            assert!(record["x"].is_null());
            assert!(record["y"].is_string());
        }
    }

    #[tokio::test]
    async fn test_invalid_template_opens_no_sink() {
        let dir = tempdir().unwrap();
        let template = write_template(dir.path(), "[1, 2, 3]");
        let output = dir.path().join("untouched.txt");
        std::fs::write(&output, "keep\n").unwrap();

        let result = run_blueprint(
            &file_blueprint(template, &output, 3),
            registry(),
            CancellationToken::new(),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "keep\n");
    }

    #[tokio::test]
    async fn test_limit_five_file_and_queue() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("five.txt");
        let accepted = Arc::new(AtomicU64::new(0));
        let delivered = Arc::new(AtomicU64::new(0));

        let file = FileSink::open(
            "file",
            FileSinkConfig {
                path: output.clone(),
                append: false,
            },
        )
        .await
        .unwrap();
        let fanout = Fanout::with_handles(vec![
            SinkHandle::spawn(file, 16, RetryPolicy::default()),
            SinkHandle::spawn(
                MemoryQueueSink::new(&accepted, &delivered),
                16,
                RetryPolicy::default(),
            ),
        ]);

        let template = Template::parse(r#"{"id":"fake:{uuid}"}"#).unwrap();
        let mut emitter = EmitterBuilder::new(template, fanout)
            .config(EmitterConfig {
                limit: 5,
                ..Default::default()
            })
            .build()
            .await
            .unwrap();
        let report = emitter.run().await.unwrap();

        assert_eq!(report.outcome, RunState::Completed);
        assert_eq!(read_records(&output).len(), 5);
        assert_eq!(accepted.load(Ordering::SeqCst), 5);
        assert_eq!(delivered.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_zero_limit_queue_stops_on_cancel_and_flushes() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("capped.txt");
        let accepted = Arc::new(AtomicU64::new(0));
        let delivered = Arc::new(AtomicU64::new(0));

        let file = FileSink::open(
            "file",
            FileSinkConfig {
                path: output.clone(),
                append: false,
            },
        )
        .await
        .unwrap();
        let fanout = Fanout::with_handles(vec![
            SinkHandle::spawn(
                MemoryQueueSink::new(&accepted, &delivered),
                64,
                RetryPolicy::default(),
            ),
            SinkHandle::spawn(file, 64, RetryPolicy::default()),
        ]);

        let cancel = CancellationToken::new();
        let template = Template::parse(r#"{"v":"fake:{word}"}"#).unwrap();
        let mut emitter = EmitterBuilder::new(template, fanout)
            .config(EmitterConfig::default())
            .cancel_token(cancel.clone())
            .build()
            .await
            .unwrap();

        let run = tokio::spawn(async move { emitter.run().await });

        // Still running well past the ceiling
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(!run.is_finished());
        cancel.cancel();

        let report = run.await.unwrap().unwrap();
        assert_eq!(report.outcome, RunState::Stopped);
        assert!(report.records > 1000, "only {} records", report.records);

        // Bounded sink saw only the first 1000
        assert_eq!(read_records(&output).len(), 1000);

        // Every record the queue accepted was flushed before run() returned
        let accepted = accepted.load(Ordering::SeqCst);
        assert!(accepted >= report.records);
        assert_eq!(delivered.load(Ordering::SeqCst), accepted);
    }

    #[tokio::test]
    async fn test_kafka_sink_overrunning_shutdown_accounts_every_record() {
        // Flush alone outlasts both shutdown stages, so the worker gets aborted
        let mut config = QueueSinkConfig::new("datagen-e2e");
        config.flush_timeout = Duration::from_secs(3);
        config.properties_path = PathBuf::from("/nonexistent/kafka.properties");
        config.brokers = Some("127.0.0.1:1".to_string());
        let sink = QueueSink::new("kafka", config).unwrap();

        let mut handle = SinkHandle::spawn(sink, 16, RetryPolicy::default());
        for seq in 0..3u64 {
            let record = EncodedRecord::new(seq, format!("{{\"seq\":{seq}}}"));
            let _ = handle.send(record).await;
        }

        let budget = Duration::from_millis(500);
        let started = std::time::Instant::now();
        let m = handle.shutdown(budget).await;
        assert!(started.elapsed() < budget * 6, "took {:?}", started.elapsed());

        assert_eq!(m.accepted, 3);
        assert_eq!(m.write_count, 3);
        assert_eq!(m.delivered, 0);
        assert_eq!(m.delivered + m.delivery_failed + m.dropped_count, m.accepted);
    }
}
