use std::sync::Arc;

use chrono::Utc;
use futures::future::try_join5;
use log::{debug, info, warn};
use serde_json::Value;
use tokio::sync::mpsc::Sender;

use crate::config::ExtractorConfig;
use crate::confidence::ConfidenceLedger;
use crate::error::{ExtractionError, Result, TransportError};
use crate::inference::apply_voice_fallback;
use crate::llm::client::LanguageModel;
use crate::llm::prompts::{build_prompt, category_instruction};
use crate::llm::types::{ExtractionEvent, ModelRequest};
use crate::repair::{repair, RepairOutcome};
use crate::report::{ExtractionReport, ExtractionRequest};
use crate::schema::{
    BrandSection, Category, CategoryRecord, Guidelines, Messaging, SocialMedia, VisualIdentity,
    VoiceAndTone,
};
use crate::utils::truncate_chars;
use crate::validation::{validate_section, FieldIssue, ValidationOutcome};

async fn send_event(sender: Option<&Sender<ExtractionEvent>>, event: ExtractionEvent) {
    if let Some(tx) = sender {
        let _ = tx.send(event).await;
    }
}

/// Runs a single category pass: one model call plus at most one repair-and-revalidate cycle.
#[derive(Clone)]
pub struct PassExecutor {
    model: Arc<dyn LanguageModel>,
    config: ExtractorConfig,
}

impl PassExecutor {
    pub fn new(model: Arc<dyn LanguageModel>, config: ExtractorConfig) -> Self {
        Self { model, config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extracts one category from an already-truncated excerpt.
    pub async fn run_pass(
        &self,
        category: Category,
        document_excerpt: &str,
        brand_name: &str,
    ) -> Result<CategoryRecord> {
        match category {
            Category::VoiceAndTone => self
                .run_section::<VoiceAndTone>(document_excerpt, brand_name, None)
                .await
                .map(BrandSection::into_record),
            Category::VisualIdentity => self
                .run_section::<VisualIdentity>(document_excerpt, brand_name, None)
                .await
                .map(BrandSection::into_record),
            Category::SocialMedia => self
                .run_section::<SocialMedia>(document_excerpt, brand_name, None)
                .await
                .map(BrandSection::into_record),
            Category::Messaging => self
                .run_section::<Messaging>(document_excerpt, brand_name, None)
                .await
                .map(BrandSection::into_record),
            Category::Guidelines => self
                .run_section::<Guidelines>(document_excerpt, brand_name, None)
                .await
                .map(BrandSection::into_record),
        }
    }

    pub async fn run_section<S: BrandSection>(
        &self,
        document_excerpt: &str,
        brand_name: &str,
        progress: Option<&Sender<ExtractionEvent>>,
    ) -> Result<S> {
        let category = S::CATEGORY;
        send_event(progress, ExtractionEvent::PassStarted { category }).await;

        let prompt = build_prompt(category_instruction(category), document_excerpt, brand_name);
        let request = ModelRequest::new(category, self.config.system_prompt.as_str(), prompt);
        let raw = self.call_model(&request).await?;

        let section = match validate_section::<S>(&raw) {
            ValidationOutcome::Valid(section) => section,
            ValidationOutcome::Invalid(issues) => {
                debug!("{}: {} issue(s) in model output, repairing", category, issues.len());
                self.repair_section(&raw, &issues, progress).await?
            }
        };

        info!(
            "{}: pass complete (confidence {:.2})",
            category,
            section.confidence_score()
        );
        send_event(
            progress,
            ExtractionEvent::PassCompleted {
                category,
                confidence: section.confidence_score(),
            },
        )
        .await;

        Ok(section)
    }

    async fn repair_section<S: BrandSection>(
        &self,
        raw: &Value,
        issues: &[FieldIssue],
        progress: Option<&Sender<ExtractionEvent>>,
    ) -> Result<S> {
        let category = S::CATEGORY;
        match repair(category, raw, issues) {
            RepairOutcome::Repaired { value, applied } => {
                info!("{}: output repaired with {:?}", category, applied);
                send_event(
                    progress,
                    ExtractionEvent::RepairApplied {
                        category,
                        rules: applied,
                    },
                )
                .await;

                match validate_section::<S>(&value) {
                    ValidationOutcome::Valid(section) => Ok(section),
                    ValidationOutcome::Invalid(issues) => Err(ExtractionError::Validation {
                        category,
                        issues,
                        raw_value: raw.clone(),
                    }),
                }
            }
            RepairOutcome::Unrepairable { issues, applied, .. } => {
                warn!(
                    "{}: {} issue(s) left after repair {:?}",
                    category,
                    issues.len(),
                    applied
                );
                Err(ExtractionError::Validation {
                    category,
                    issues,
                    raw_value: raw.clone(),
                })
            }
        }
    }

    async fn call_model(&self, request: &ModelRequest) -> Result<Value> {
        let call = self.model.generate_json(request);
        let result = match self.config.request_timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => Err(TransportError::Timeout(limit)),
            },
            None => call.await,
        };

        result.map_err(|source| {
            warn!("{}: model call failed: {}", request.category, source);
            ExtractionError::Transport {
                category: request.category,
                source,
            }
        })
    }
}

/// Runs all five category passes and assembles the report.
pub struct BrandExtractor {
    executor: PassExecutor,
}

impl BrandExtractor {
    pub fn new(model: Arc<dyn LanguageModel>, config: ExtractorConfig) -> Self {
        Self {
            executor: PassExecutor::new(model, config),
        }
    }

    pub fn executor(&self) -> &PassExecutor {
        &self.executor
    }

    /// Extracts every category from `request`. Any failing pass fails the whole extraction.
    ///
    /// Passes run concurrently; progress events from different passes may interleave.
    pub async fn extract(
        &self,
        request: &ExtractionRequest,
        progress: Option<Sender<ExtractionEvent>>,
    ) -> Result<ExtractionReport> {
        let brand_name = request.brand_name.trim();
        if brand_name.is_empty() {
            return Err(ExtractionError::InvalidRequest(
                "brand name must not be empty".to_string(),
            ));
        }

        let config = self.executor.config();
        let excerpt = truncate_chars(&request.document_text, config.excerpt_limit);
        let progress = progress.as_ref();

        info!(
            "Extracting brand guidelines for '{}' ({} of {} chars)",
            brand_name,
            excerpt.chars().count(),
            request.document_text.chars().count()
        );
        send_event(progress, ExtractionEvent::Starting).await;

        let passes = try_join5(
            self.executor
                .run_section::<VoiceAndTone>(excerpt, brand_name, progress),
            self.executor
                .run_section::<VisualIdentity>(excerpt, brand_name, progress),
            self.executor
                .run_section::<SocialMedia>(excerpt, brand_name, progress),
            self.executor
                .run_section::<Messaging>(excerpt, brand_name, progress),
            self.executor
                .run_section::<Guidelines>(excerpt, brand_name, progress),
        )
        .await;

        let (mut voice_and_tone, mut visual_identity, mut social_media, mut messaging, mut guidelines) =
            match passes {
                Ok(sections) => sections,
                Err(e) => {
                    warn!("Extraction for '{}' failed: {}", brand_name, e);
                    send_event(
                        progress,
                        ExtractionEvent::Failed {
                            reason: e.to_string(),
                        },
                    )
                    .await;
                    return Err(e);
                }
            };

        apply_voice_fallback(&mut voice_and_tone);

        let mut ledger = ConfidenceLedger::new();
        ledger.normalize_section(&mut voice_and_tone);
        ledger.normalize_section(&mut visual_identity);
        ledger.normalize_section(&mut social_media);
        ledger.normalize_section(&mut messaging);
        ledger.normalize_section(&mut guidelines);

        let report = ExtractionReport {
            brand_name: brand_name.to_string(),
            source_text_preview: truncate_chars(&request.document_text, config.preview_limit)
                .to_string(),
            extraction_date: Utc::now(),
            voice_and_tone,
            visual_identity,
            social_media,
            messaging,
            guidelines,
            extraction_metadata: ledger.into_metadata(),
        };

        info!(
            "Extraction for '{}' complete (average confidence {:.2})",
            brand_name, report.extraction_metadata.average_confidence
        );
        send_event(progress, ExtractionEvent::Success).await;

        Ok(report)
    }
}
