//! Run Pipeline use case
//!
//! Fixed two-step research/decision flow: the researcher gathers evidence,
//! then the analyst decides with the researcher's full report in context.
//! Any failure aborts; there is no retry at this level.

use crate::ports::actor::{ActContext, ActError, ActOutput, Actor};
use crate::ports::conversation_logger::{
    ConversationLogger, NoConversationLogger, session_event,
};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::shared::{cancelled, is_cancelled};
use roundtable_domain::{
    Citation, DecisionReport, Phase, PromptTemplate, SessionId, extract_citations,
    merge_citations, parse_decision, parse_risk_label,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum RunPipelineError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Research failed: {0}")]
    Research(ActError),

    #[error("Analysis failed: {0}")]
    Analysis(ActError),

    #[error("Pipeline cancelled")]
    Cancelled,
}

/// Use case for running the researcher → analyst pipeline
pub struct RunPipelineUseCase {
    researcher: Arc<dyn Actor>,
    analyst: Arc<dyn Actor>,
    conversation_logger: Arc<dyn ConversationLogger>,
    cancellation: Option<CancellationToken>,
}

impl RunPipelineUseCase {
    pub fn new(researcher: Arc<dyn Actor>, analyst: Arc<dyn Actor>) -> Self {
        Self {
            researcher,
            analyst,
            conversation_logger: Arc::new(NoConversationLogger),
            cancellation: None,
        }
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub async fn run_pipeline(&self, subject: &str) -> Result<DecisionReport, RunPipelineError> {
        self.run_pipeline_with_progress(subject, &NoProgress).await
    }

    pub async fn run_pipeline_with_progress(
        &self,
        subject: &str,
        progress: &dyn ProgressNotifier,
    ) -> Result<DecisionReport, RunPipelineError> {
        let subject = subject.trim();
        if subject.is_empty() {
            return Err(RunPipelineError::Configuration(
                "subject cannot be empty".to_string(),
            ));
        }

        let run_id = SessionId::generate();
        info!(session = %run_id, "Starting pipeline for: {}", subject);
        self.conversation_logger.log(session_event(
            "pipeline_started",
            run_id.as_str(),
            json!({ "subject": subject }),
        ));

        // Step 1: research
        let research = self
            .step(
                self.researcher.as_ref(),
                ActContext::new(PromptTemplate::research_prompt(subject), Phase::Research),
                progress,
            )
            .await?
            .map_err(RunPipelineError::Research)?;
        self.log_step(&run_id, "research", &self.researcher, &research);

        // Step 2: analysis over the full research report
        let analysis = self
            .step(
                self.analyst.as_ref(),
                ActContext::new(
                    PromptTemplate::analysis_prompt(subject, &research.content),
                    Phase::Analysis,
                ),
                progress,
            )
            .await?
            .map_err(RunPipelineError::Analysis)?;
        self.log_step(&run_id, "analysis", &self.analyst, &analysis);

        let citations = merge_citations(&citations_of(&research), &citations_of(&analysis));
        let report = DecisionReport {
            subject: subject.to_string(),
            research: research.content.trim().to_string(),
            decision: parse_decision(&analysis.content),
            risk: parse_risk_label(&analysis.content),
            decision_text: analysis.content.trim().to_string(),
            citations,
        };

        info!(
            session = %run_id,
            decision = %report.decision,
            risk = %report.risk,
            citations = report.citations.len(),
            "Pipeline complete"
        );
        self.conversation_logger.log(session_event(
            "pipeline_concluded",
            run_id.as_str(),
            json!({
                "decision": report.decision,
                "risk": report.risk,
                "citations": report.citations,
            }),
        ));
        Ok(report)
    }

    /// Run one role; the outer `Result` carries cancellation only.
    async fn step(
        &self,
        actor: &dyn Actor,
        ctx: ActContext,
        progress: &dyn ProgressNotifier,
    ) -> Result<Result<ActOutput, ActError>, RunPipelineError> {
        if is_cancelled(&self.cancellation) {
            return Err(RunPipelineError::Cancelled);
        }
        progress.on_phase_start(&ctx.phase, 1);

        let result = tokio::select! {
            result = actor.act(&ctx) => result,
            _ = cancelled(self.cancellation.clone()) => return Err(RunPipelineError::Cancelled),
        };
        let result = result.and_then(|output| {
            if output.content.trim().is_empty() {
                Err(ActError::EmptyResponse)
            } else {
                Ok(output)
            }
        });

        if let Err(e) = &result {
            warn!(actor = actor.name(), phase = %ctx.phase, "Step failed: {}", e);
        }
        progress.on_task_complete(&ctx.phase, actor.name(), result.is_ok());
        progress.on_phase_complete(&ctx.phase);
        Ok(result)
    }

    fn log_step(&self, run_id: &SessionId, role: &str, actor: &Arc<dyn Actor>, output: &ActOutput) {
        self.conversation_logger.log(session_event(
            "pipeline_step",
            run_id.as_str(),
            json!({
                "role": role,
                "actor": actor.name(),
                "content": output.content,
                "invocations": output.invocations,
                "citations": output.citations,
            }),
        ));
    }
}

/// Citations reported by the role plus any URL in its text.
fn citations_of(output: &ActOutput) -> Vec<Citation> {
    merge_citations(&output.citations, &extract_citations(&output.content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::conversation_logger::ConversationEvent;
    use async_trait::async_trait;
    use roundtable_domain::{Decision, RiskLabel};
    use std::sync::Mutex;

    /// Actor returning a fixed output and recording the prompts it saw
    struct Canned {
        name: &'static str,
        output: Result<ActOutput, fn() -> ActError>,
        prompts: Mutex<Vec<String>>,
    }

    impl Canned {
        fn ok(name: &'static str, output: ActOutput) -> Arc<Self> {
            Arc::new(Self {
                name,
                output: Ok(output),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn failing(name: &'static str, err: fn() -> ActError) -> Arc<Self> {
            Arc::new(Self {
                name,
                output: Err(err),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Actor for Canned {
        fn name(&self) -> &str {
            self.name
        }

        async fn act(&self, ctx: &ActContext) -> Result<ActOutput, ActError> {
            self.prompts.lock().unwrap().push(ctx.prompt.clone());
            match &self.output {
                Ok(o) => Ok(o.clone()),
                Err(make) => Err(make()),
            }
        }
    }

    #[derive(Default)]
    struct RecordingLogger {
        events: Mutex<Vec<String>>,
    }

    impl ConversationLogger for RecordingLogger {
        fn log(&self, event: ConversationEvent) {
            self.events.lock().unwrap().push(event.event_type.to_string());
        }
    }

    const RESEARCH: &str = "Bitcoin ETF inflows keep rising (https://news.example/etf). \
        See also https://data.example/btc.";
    const ANALYSIS: &str = "Momentum is strong, per https://news.example/etf/ and \
        [chart](https://charts.example/btc).\n\nDecision: hold\nRisk level: medium";

    fn researcher() -> Arc<Canned> {
        Canned::ok(
            "researcher",
            ActOutput {
                content: RESEARCH.to_string(),
                invocations: Vec::new(),
                citations: vec![Citation::new("https://search.example/q=btc")],
            },
        )
    }

    fn analyst() -> Arc<Canned> {
        Canned::ok("analyst", ActOutput::text(ANALYSIS))
    }

    #[tokio::test]
    async fn test_pipeline_report() {
        let researcher = researcher();
        let analyst = analyst();
        let use_case = RunPipelineUseCase::new(researcher.clone(), analyst.clone());

        let report = use_case
            .run_pipeline("Is it a good time to sell bitcoin?")
            .await
            .unwrap();

        assert_eq!(report.decision, Decision::Hold);
        assert_eq!(report.risk, RiskLabel::Medium);
        assert_eq!(report.research, RESEARCH);

        // The analyst saw the researcher's full output
        let analyst_prompt = analyst.prompts.lock().unwrap()[0].clone();
        assert!(analyst_prompt.contains(RESEARCH));
        assert!(analyst_prompt.contains("Is it a good time to sell bitcoin?"));
    }

    #[tokio::test]
    async fn test_citations_are_union_without_duplicates() {
        let use_case = RunPipelineUseCase::new(researcher(), analyst());
        let report = use_case.run_pipeline("bitcoin").await.unwrap();

        let urls: Vec<&str> = report.citations.iter().map(|c| c.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://search.example/q=btc",
                "https://news.example/etf",
                "https://data.example/btc",
                "https://charts.example/btc",
            ]
        );
    }

    #[tokio::test]
    async fn test_research_failure_aborts_before_analysis() {
        let analyst = analyst();
        let use_case = RunPipelineUseCase::new(
            Canned::failing("researcher", || ActError::Failed("search down".into())),
            analyst.clone(),
        );

        let err = use_case.run_pipeline("bitcoin").await.unwrap_err();
        assert!(matches!(err, RunPipelineError::Research(ActError::Failed(_))));
        assert_eq!(analyst.calls(), 0);
    }

    #[tokio::test]
    async fn test_analysis_failure_is_not_retried() {
        let analyst = Canned::failing("analyst", || ActError::EmptyResponse);
        let use_case = RunPipelineUseCase::new(researcher(), analyst.clone());

        let err = use_case.run_pipeline("bitcoin").await.unwrap_err();
        assert!(matches!(err, RunPipelineError::Analysis(ActError::EmptyResponse)));
        assert_eq!(analyst.calls(), 1);
    }

    #[tokio::test]
    async fn test_blank_output_is_a_failure() {
        let use_case =
            RunPipelineUseCase::new(Canned::ok("researcher", ActOutput::text("   ")), analyst());
        let err = use_case.run_pipeline("bitcoin").await.unwrap_err();
        assert!(matches!(err, RunPipelineError::Research(ActError::EmptyResponse)));
    }

    #[tokio::test]
    async fn test_empty_subject_is_configuration_error() {
        let researcher = researcher();
        let use_case = RunPipelineUseCase::new(researcher.clone(), analyst());
        let err = use_case.run_pipeline("  ").await.unwrap_err();
        assert!(matches!(err, RunPipelineError::Configuration(_)));
        assert_eq!(researcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_pipeline() {
        let token = CancellationToken::new();
        token.cancel();
        let researcher = researcher();
        let use_case =
            RunPipelineUseCase::new(researcher.clone(), analyst()).with_cancellation(token);

        let err = use_case.run_pipeline("bitcoin").await.unwrap_err();
        assert!(matches!(err, RunPipelineError::Cancelled));
        assert_eq!(researcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_pipeline_events() {
        let logger = Arc::new(RecordingLogger::default());
        RunPipelineUseCase::new(researcher(), analyst())
            .with_conversation_logger(logger.clone())
            .run_pipeline("bitcoin")
            .await
            .unwrap();

        let events = logger.events.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                "pipeline_started",
                "pipeline_step",
                "pipeline_step",
                "pipeline_concluded"
            ]
        );
    }
}
