//! Integration tests for the job builder

#[cfg(test)]
mod tests {
    use crate::{
        scan_documents, write_job_file, DocumentTextSource, ExtractorConfig, ExtractorError,
        JobBuilder, ModelConfig, MAX_CONCURRENCY,
    };
    use serde_json::Value;
    use std::collections::HashSet;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;
    use torx_domain::traits::TextSource;
    use torx_domain::{ProjectId, SourceDocument};

    const WITH_SECTION: &str = "ส่วนที่ ๑\n๓. หลักฐานการยื่นข้อเสนอ\n  (๑) สำเนาหนังสือรับรองการจดทะเบียนนิติบุคคล\n๓.๒ ส่วนที่ ๒";
    const WITHOUT_SECTION: &str = "เอกสารนี้ไม่มีหัวข้อที่ต้องการ";

    fn config_for(dir: &TempDir) -> ExtractorConfig {
        ExtractorConfig {
            input_dir: dir.path().join("input"),
            extension: "txt".to_string(),
            job_file: dir.path().join("batch_input.jsonl"),
            ..Default::default()
        }
    }

    fn write_input(dir: &TempDir, name: &str, text: &str) {
        let input = dir.path().join("input");
        std::fs::create_dir_all(&input).unwrap();
        std::fs::write(input.join(name), text).unwrap();
    }

    #[derive(Default)]
    struct Counters {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        calls: AtomicUsize,
    }

    /// Text source that records how many extractions overlap
    ///
    /// With a non-zero `gate`, each call holds until `gate` calls overlap
    /// (or a timeout passes), so the observed peak is deterministic.
    #[derive(Clone, Default)]
    struct CountingSource {
        counters: Arc<Counters>,
        gate: usize,
    }

    impl CountingSource {
        fn gated(gate: usize) -> Self {
            Self {
                gate,
                ..Default::default()
            }
        }
    }

    impl TextSource for CountingSource {
        type Error = String;

        fn extract_text(&self, path: &Path) -> Result<String, Self::Error> {
            let c = &self.counters;
            let now = c.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            c.peak.fetch_max(now, Ordering::SeqCst);
            c.calls.fetch_add(1, Ordering::SeqCst);
            let deadline = Instant::now() + Duration::from_secs(2);
            while c.peak.load(Ordering::SeqCst) < self.gate && Instant::now() < deadline {
                std::thread::sleep(Duration::from_millis(1));
            }
            std::thread::sleep(Duration::from_millis(5));
            c.in_flight.fetch_sub(1, Ordering::SeqCst);

            if path.to_string_lossy().contains("panic") {
                panic!("corrupt document");
            }
            Ok(WITH_SECTION.to_string())
        }
    }

    fn text_builder(config: ExtractorConfig) -> JobBuilder<DocumentTextSource> {
        JobBuilder::new(DocumentTextSource::new(), config, ModelConfig::default()).unwrap()
    }

    fn fake_documents(count: usize) -> Vec<SourceDocument> {
        (0..count)
            .map(|i| SourceDocument::from_path(format!("/virtual/doc_{:03}.pdf", i)).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_three_document_scenario() {
        let dir = TempDir::new().unwrap();
        write_input(&dir, "A.txt", WITH_SECTION);
        write_input(&dir, "B.txt", WITH_SECTION);
        write_input(&dir, "C.txt", WITHOUT_SECTION);

        let builder = text_builder(config_for(&dir));
        let existing: HashSet<ProjectId> = [ProjectId::new("B")].into_iter().collect();

        let report = builder.build(&existing).await.unwrap();
        assert_eq!(report.scanned, 3);
        assert_eq!(report.skipped_existing, 1);
        assert_eq!(report.extraction_failed, 1);
        assert_eq!(report.queued, 1);
        assert_eq!(report.missing_sections, vec!["C.txt".to_string()]);

        let job_file = report.job_file.unwrap();
        let content = std::fs::read_to_string(job_file).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 1);

        let request: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(request["custom_id"], "A.txt");
        assert!(request["body"]["messages"][1]["content"]
            .as_str()
            .unwrap()
            .ends_with("(๑) สำเนาหนังสือรับรองการจดทะเบียนนิติบุคคล"));
    }

    #[tokio::test]
    async fn test_skip_existing_disabled_requeues_stored_projects() {
        let dir = TempDir::new().unwrap();
        write_input(&dir, "A.txt", WITH_SECTION);
        write_input(&dir, "B.txt", WITH_SECTION);

        let config = ExtractorConfig {
            skip_existing: false,
            ..config_for(&dir)
        };
        let builder = text_builder(config);
        let existing: HashSet<ProjectId> =
            [ProjectId::new("A"), ProjectId::new("B")].into_iter().collect();

        let report = builder.build(&existing).await.unwrap();
        assert_eq!(report.skipped_existing, 0);
        assert_eq!(report.queued, 2);
    }

    #[tokio::test]
    async fn test_no_work_writes_no_file() {
        let dir = TempDir::new().unwrap();
        write_input(&dir, "A.txt", WITH_SECTION);
        write_input(&dir, "B.txt", WITHOUT_SECTION);

        let config = config_for(&dir);
        let job_file = config.job_file.clone();
        let builder = text_builder(config);
        let existing: HashSet<ProjectId> = [ProjectId::new("A")].into_iter().collect();

        let report = builder.build(&existing).await.unwrap();
        assert!(!report.has_work());
        assert_eq!(report.queued, 0);
        assert!(!job_file.exists());
    }

    #[tokio::test]
    async fn test_requests_ordered_by_file_name() {
        let dir = TempDir::new().unwrap();
        for name in ["c.txt", "a.txt", "b.txt"] {
            write_input(&dir, name, WITH_SECTION);
        }

        let builder = text_builder(config_for(&dir));
        let report = builder.build(&HashSet::new()).await.unwrap();

        let content = std::fs::read_to_string(report.job_file.unwrap()).unwrap();
        let ids: Vec<String> = content
            .lines()
            .map(|l| {
                let line: Value = serde_json::from_str(l).unwrap();
                line["custom_id"].as_str().unwrap().to_string()
            })
            .collect();
        assert_eq!(ids, vec!["a.txt", "b.txt", "c.txt"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_extraction_runs_exactly_limit_wide() {
        for limit in [1, 3, 4] {
            let source = CountingSource::gated(limit);
            let counters = Arc::clone(&source.counters);
            let config = ExtractorConfig {
                concurrency: limit,
                ..Default::default()
            };
            let builder = JobBuilder::new(source, config, ModelConfig::default()).unwrap();

            let batch = builder
                .build_requests(fake_documents(12), &HashSet::new())
                .await
                .unwrap();

            assert_eq!(batch.queued(), 12);
            assert_eq!(counters.calls.load(Ordering::SeqCst), 12);
            // Bounded, but still fully parallel up to the bound
            assert_eq!(counters.peak.load(Ordering::SeqCst), limit);
            assert_eq!(counters.in_flight.load(Ordering::SeqCst), 0);
        }
    }

    #[tokio::test]
    async fn test_panicking_worker_does_not_cancel_siblings() {
        let builder = JobBuilder::new(
            CountingSource::default(),
            ExtractorConfig::default(),
            ModelConfig::default(),
        )
        .unwrap();

        let mut documents = fake_documents(4);
        documents.push(SourceDocument::from_path("/virtual/panic.pdf").unwrap());

        let batch = builder.build_requests(documents, &HashSet::new()).await.unwrap();
        assert_eq!(batch.queued(), 4);
        assert_eq!(batch.extraction_failed, 1);
    }

    #[test]
    fn test_scan_filters_extension_case_insensitively() {
        let dir = TempDir::new().unwrap();
        write_input(&dir, "one.PDF", "");
        write_input(&dir, "two.pdf", "");
        write_input(&dir, "notes.txt", "");
        std::fs::create_dir_all(dir.path().join("input").join("nested.pdf")).unwrap();

        let docs = scan_documents(&dir.path().join("input"), "pdf").unwrap();
        let names: Vec<&str> = docs.iter().map(|d| d.file_name.as_str()).collect();
        assert_eq!(names, vec!["one.PDF", "two.pdf"]);
        assert_eq!(docs[0].project_id, ProjectId::new("one"));
    }

    #[test]
    fn test_scan_errors() {
        let dir = TempDir::new().unwrap();
        let missing = scan_documents(&dir.path().join("nope"), "pdf").unwrap_err();
        assert!(matches!(missing, ExtractorError::InputFolderMissing(_)));

        write_input(&dir, "notes.txt", "");
        let empty = scan_documents(&dir.path().join("input"), "pdf").unwrap_err();
        assert!(matches!(empty, ExtractorError::NoDocuments { .. }));
    }

    #[test]
    fn test_write_empty_job_file_is_no_work() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("jobs.jsonl");
        assert!(matches!(write_job_file(&path, &[]), Err(ExtractorError::NoWork)));
        assert!(!path.exists());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        for concurrency in [0, MAX_CONCURRENCY + 1, usize::MAX] {
            let config = ExtractorConfig {
                concurrency,
                ..Default::default()
            };
            let result =
                JobBuilder::new(DocumentTextSource::new(), config, ModelConfig::default());
            assert!(matches!(result, Err(ExtractorError::Config(_))));
        }
    }
}
