use std::{sync::Arc, time::Instant};

use futures::future::try_join_all;

use crate::{
    chunker::{dto::Chunk, handler::TextChunker},
    error::{ScribeError, ScribeResult},
    llm::handler::LanguageModel,
    prompt::{dto::Phase, handler::prompt_for},
    summarizer::dto::{
        EngineConfig, EngineError, EngineProgress, SummarizationResult, SummaryStyle,
    },
};

/// Map-reduce summarization over an injected language model.
#[derive(Clone)]
pub struct Summarizer {
    llm: Arc<dyn LanguageModel>,
    chunker: TextChunker,
    config: EngineConfig,
}

impl Summarizer {
    pub fn new(llm: Arc<dyn LanguageModel>, config: EngineConfig) -> ScribeResult<Self> {
        if config.batch_size == 0 {
            return Err(ScribeError::Configuration(
                "batch size must be greater than zero".to_string(),
            ));
        }

        let chunker = TextChunker::new(config.chunker_config())?;

        Ok(Self {
            llm,
            chunker,
            config,
        })
    }

    pub fn get_config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn get_llm(&self) -> Arc<dyn LanguageModel> {
        self.llm.clone()
    }

    pub async fn summarize(
        &self,
        text: &str,
        style: SummaryStyle,
    ) -> ScribeResult<SummarizationResult> {
        self.summarize_with_progress(text, style, |_| {}).await
    }

    pub async fn summarize_with_progress<F>(
        &self,
        text: &str,
        style: SummaryStyle,
        on_progress: F,
    ) -> ScribeResult<SummarizationResult>
    where
        F: Fn(EngineProgress) + Send + Sync,
    {
        if text.trim().is_empty() {
            return Err(ScribeError::Validation("Text cannot be empty".to_string()));
        }

        let started = Instant::now();
        let chunks = self.chunker.split(text);

        log::info!(
            "Starting summarization: {} characters, {} chunks, style {}",
            text.chars().count(),
            chunks.len(),
            style
        );

        let summary = match chunks.as_slice() {
            [single] => {
                let prompt = prompt_for(Phase::Single, style).render(&single.content);
                self.call(Phase::Single, None, prompt).await?
            }
            _ => {
                let partials = self.map_chunks(&chunks, style, &on_progress).await?;
                let prompt = prompt_for(Phase::Reduce, style).render(&partials.join("\n\n"));
                self.call(Phase::Reduce, None, prompt).await?
            }
        };

        let result = SummarizationResult::new(text, summary, chunks.len(), style);

        log::info!(
            "Summarization finished in {:.2}s: {} chunks, compression ratio {:.2}",
            started.elapsed().as_secs_f64(),
            result.chunk_count,
            result.compression_ratio
        );

        Ok(result)
    }

    async fn map_chunks<F>(
        &self,
        chunks: &[Chunk],
        style: SummaryStyle,
        on_progress: &F,
    ) -> Result<Vec<String>, EngineError>
    where
        F: Fn(EngineProgress) + Send + Sync,
    {
        let template = prompt_for(Phase::Map, style);
        let total_chunks = chunks.len();
        let mut partials = Vec::with_capacity(total_chunks);

        for (batch_index, batch) in chunks.chunks(self.config.batch_size).enumerate() {
            if batch_index > 0 {
                tokio::time::sleep(self.config.batch_delay).await;
            }

            let calls = batch.iter().map(|chunk| {
                self.call(Phase::Map, Some(chunk.index), template.render(&chunk.content))
            });

            // try_join_all keeps input order whatever the completion order
            let outputs = try_join_all(calls).await?;
            partials.extend(outputs);

            on_progress(EngineProgress {
                completed_chunks: partials.len(),
                total_chunks,
            });
        }

        Ok(partials)
    }

    async fn call(
        &self,
        phase: Phase,
        chunk: Option<usize>,
        prompt: String,
    ) -> Result<String, EngineError> {
        match tokio::time::timeout(self.config.call_timeout, self.llm.invoke(&prompt)).await {
            Ok(Ok(output)) => Ok(output.trim().to_string()),
            Ok(Err(source)) => {
                log::error!("Language model {} call failed: {}", phase, source);
                Err(EngineError::Llm {
                    phase,
                    chunk,
                    source,
                })
            }
            Err(_) => {
                log::error!(
                    "Language model {} call timed out after {:?}",
                    phase,
                    self.config.call_timeout
                );
                Err(EngineError::Timeout {
                    phase,
                    chunk,
                    timeout: self.config.call_timeout,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::dto::LlmError;
    use async_trait::async_trait;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    };
    use std::time::Duration;

    /// Answers map prompts with `S<n>` for the paragraph number it sees and
    /// records every prompt. Later paragraphs answer faster.
    struct EchoModel {
        prompts: Mutex<Vec<String>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        fail_on: Option<usize>,
        reply: Option<String>,
        delay: Duration,
    }

    impl EchoModel {
        fn new() -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
                fail_on: None,
                reply: None,
                delay: Duration::ZERO,
            }
        }

        fn replying(reply: &str) -> Self {
            Self {
                reply: Some(reply.to_string()),
                ..Self::new()
            }
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }

        fn last_prompt(&self) -> String {
            self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
        }
    }

    fn paragraph_number(prompt: &str) -> Option<usize> {
        let start = prompt.find("Paragraph ")? + "Paragraph ".len();
        prompt.get(start..start + 2)?.parse().ok()
    }

    #[async_trait]
    impl LanguageModel for EchoModel {
        async fn invoke(&self, prompt: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());

            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            let reply = if let Some(reply) = &self.reply {
                Ok(reply.clone())
            } else if prompt.contains("Section Summaries:") {
                Ok("final summary".to_string())
            } else {
                let n = paragraph_number(prompt).unwrap_or(0);
                // Reverse completion order inside a batch.
                tokio::time::sleep(Duration::from_millis((20 - n as u64) * 2)).await;
                if self.fail_on == Some(n) {
                    Err(LlmError::Response(format!("chunk {} exploded", n)))
                } else {
                    Ok(format!("  S{}  ", n))
                }
            };

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            reply
        }

        async fn health(&self) -> Result<(), LlmError> {
            Ok(())
        }
    }

    /// Paragraphs of exactly 52 chars, so a 60-char chunker with no overlap
    /// puts one paragraph in each chunk.
    fn paragraphs(count: usize) -> String {
        (0..count)
            .map(|i| format!("{:x<50}\n\n", format!("Paragraph {:02} ", i)))
            .collect()
    }

    fn small_config() -> EngineConfig {
        EngineConfig {
            chunk_size: 60,
            chunk_overlap: 0,
            batch_size: 3,
            batch_delay: Duration::from_millis(5),
            call_timeout: Duration::from_secs(5),
        }
    }

    #[tokio::test]
    async fn test_compression_ratio_single_chunk() {
        let llm = Arc::new(EchoModel::replying(&"b".repeat(100)));
        let summarizer = Summarizer::new(llm.clone(), EngineConfig::default()).unwrap();

        let result = summarizer
            .summarize(&"a".repeat(1000), SummaryStyle::Comprehensive)
            .await
            .unwrap();

        assert_eq!(result.chunk_count, 1);
        assert_eq!(result.original_length, 1000);
        assert_eq!(result.summary_length, 100);
        assert_eq!(result.compression_ratio, 10.0);
        assert!(result.processing_time.is_none());
        assert_eq!(llm.calls(), 1);
        assert!(llm.last_prompt().contains("Comprehensive Summary:"));
    }

    #[tokio::test]
    async fn test_empty_summary_gives_zero_ratio() {
        let llm = Arc::new(EchoModel::replying("   "));
        let summarizer = Summarizer::new(llm, EngineConfig::default()).unwrap();

        let result = summarizer
            .summarize(&"a".repeat(1000), SummaryStyle::Brief)
            .await
            .unwrap();

        assert_eq!(result.summary, "");
        assert_eq!(result.summary_length, 0);
        assert_eq!(result.compression_ratio, 0.0);
    }

    #[tokio::test]
    async fn test_rejects_blank_text_without_calling_model() {
        let llm = Arc::new(EchoModel::new());
        let summarizer = Summarizer::new(llm.clone(), EngineConfig::default()).unwrap();

        let err = summarizer
            .summarize(" \n\t ", SummaryStyle::Comprehensive)
            .await
            .unwrap_err();

        assert!(matches!(err, ScribeError::Validation(_)));
        assert_eq!(llm.calls(), 0);
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let llm: Arc<dyn LanguageModel> = Arc::new(EchoModel::new());

        let overlap = EngineConfig {
            chunk_overlap: 4000,
            ..EngineConfig::default()
        };
        assert!(matches!(
            Summarizer::new(llm.clone(), overlap),
            Err(ScribeError::Configuration(_))
        ));

        let batch = EngineConfig {
            batch_size: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            Summarizer::new(llm, batch),
            Err(ScribeError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_map_reduce_keeps_chunk_order() {
        let llm = Arc::new(EchoModel::new());
        let summarizer = Summarizer::new(llm.clone(), small_config()).unwrap();

        let result = summarizer
            .summarize(&paragraphs(7), SummaryStyle::Comprehensive)
            .await
            .unwrap();

        assert_eq!(result.chunk_count, 7);
        assert_eq!(result.summary, "final summary");
        assert_eq!(llm.calls(), 8);

        let reduce_prompt = llm.last_prompt();
        assert!(reduce_prompt.contains("Section Summaries:\nS0\n\nS1\n\nS2\n\nS3\n\nS4\n\nS5\n\nS6\n\n"));
    }

    #[tokio::test]
    async fn test_map_batches_bound_concurrency_and_report_progress() {
        let llm = Arc::new(EchoModel::new());
        let summarizer = Summarizer::new(llm.clone(), small_config()).unwrap();
        let reports = Mutex::new(Vec::new());

        summarizer
            .summarize_with_progress(&paragraphs(7), SummaryStyle::Brief, |progress| {
                reports.lock().unwrap().push(progress)
            })
            .await
            .unwrap();

        let reports = reports.into_inner().unwrap();
        let completed: Vec<usize> = reports.iter().map(|p| p.completed_chunks).collect();
        assert_eq!(completed, vec![3, 6, 7]);
        assert!(reports.iter().all(|p| p.total_chunks == 7));
        assert!(llm.max_in_flight.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_only_between_batches() {
        let llm = Arc::new(EchoModel::replying("ok"));
        let config = EngineConfig {
            batch_delay: Duration::from_millis(500),
            ..small_config()
        };
        let summarizer = Summarizer::new(llm, config).unwrap();

        let started = tokio::time::Instant::now();
        summarizer
            .summarize(&paragraphs(7), SummaryStyle::Comprehensive)
            .await
            .unwrap();

        // Three batches, two pauses.
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(1000));
        assert!(elapsed < Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn test_failure_on_second_chunk_aborts() {
        let llm = Arc::new(EchoModel {
            fail_on: Some(1),
            ..EchoModel::new()
        });
        let summarizer = Summarizer::new(llm.clone(), small_config()).unwrap();

        let err = summarizer
            .summarize(&paragraphs(5), SummaryStyle::KeyPoints)
            .await
            .unwrap_err();

        match err {
            ScribeError::Engine(EngineError::Llm { phase, chunk, .. }) => {
                assert_eq!(phase, Phase::Map);
                assert_eq!(chunk, Some(1));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(!llm.last_prompt().contains("Section Summaries:"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_call_times_out() {
        let llm = Arc::new(EchoModel {
            delay: Duration::from_secs(10),
            reply: Some("late".to_string()),
            ..EchoModel::new()
        });
        let config = EngineConfig {
            call_timeout: Duration::from_secs(1),
            ..EngineConfig::default()
        };
        let summarizer = Summarizer::new(llm, config).unwrap();

        let err = summarizer
            .summarize("some transcript text", SummaryStyle::Brief)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ScribeError::Engine(EngineError::Timeout {
                phase: Phase::Single,
                ..
            })
        ));
    }

    #[test]
    fn test_style_parsing() {
        assert_eq!("brief".parse::<SummaryStyle>().unwrap(), SummaryStyle::Brief);
        assert_eq!(" Key_Points ".parse::<SummaryStyle>().unwrap(), SummaryStyle::KeyPoints);
        assert!(matches!(
            "executive".parse::<SummaryStyle>(),
            Err(ScribeError::Validation(_))
        ));
        assert_eq!(
            serde_json::to_string(&SummaryStyle::KeyPoints).unwrap(),
            "\"key_points\""
        );
    }
}
