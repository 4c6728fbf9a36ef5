//! Pipeline runner — executes the three agent stages for one review.
//!
//! Flow: (resume stage ‖ job stage) → scoring stage.
//! No retries and no partial results: the first failing stage aborts the review.

use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::llm_client::{strip_json_fences, AgentRequest, AgentRuntime};
use crate::models::analysis::{CVAnalysis, JobAnalysis, ResumeAnalysis};
use crate::pipeline::prompts::{JOB_INPUT_TEMPLATE, RESUME_INPUT_TEMPLATE, SCORING_INPUT_TEMPLATE};
use crate::pipeline::stages::{StageSpec, JOB_STAGE, RESUME_STAGE, SCORING_STAGE};

/// Inputs for one review.
#[derive(Debug, Clone, Copy)]
pub struct ReviewInput<'a> {
    /// Staged knowledge-source copy of the resume.
    pub resume_path: &'a Path,
    /// Display name of the resume, used in the prompt.
    pub resume_name: &'a str,
    pub job_description: &'a str,
}

/// Runs resume and job stages concurrently, then scores them.
pub async fn run_review(
    runtime: &dyn AgentRuntime,
    input: ReviewInput<'_>,
) -> Result<CVAnalysis, AppError> {
    let started = Instant::now();

    let (resume, job) = tokio::try_join!(
        analyze_resume(runtime, input.resume_path, input.resume_name),
        analyze_job(runtime, input.job_description),
    )?;

    let overlap = keyword_overlap(&resume, &job);
    info!(
        "Keyword overlap: {}/{} job keywords found in resume keywords",
        overlap.matched, overlap.total
    );

    let report = score(runtime, &resume, &job).await?;
    if report.ats_score > 100 {
        warn!("ATS score {} is outside 0-100; returning as produced", report.ats_score);
    }

    info!(
        "Review complete: ats_score={} in {}ms",
        report.ats_score,
        started.elapsed().as_millis()
    );
    Ok(report)
}

pub async fn analyze_resume(
    runtime: &dyn AgentRuntime,
    resume_path: &Path,
    resume_name: &str,
) -> Result<ResumeAnalysis, AppError> {
    let input = RESUME_INPUT_TEMPLATE.replace("{resume_name}", resume_name);
    let resume: ResumeAnalysis =
        run_stage(runtime, &RESUME_STAGE, &input, Some(resume_path)).await?;
    info!("Resume stage produced {} keywords", resume.keywords.len());
    Ok(resume)
}

pub async fn analyze_job(
    runtime: &dyn AgentRuntime,
    job_description: &str,
) -> Result<JobAnalysis, AppError> {
    let input = JOB_INPUT_TEMPLATE.replace("{job_description}", job_description);
    let job: JobAnalysis = run_stage(runtime, &JOB_STAGE, &input, None).await?;
    info!(
        "Job stage produced {} keywords, {} responsibilities, {} requirements",
        job.keywords.len(),
        job.responsibilities.len(),
        job.requirements.len()
    );
    Ok(job)
}

pub async fn score(
    runtime: &dyn AgentRuntime,
    resume: &ResumeAnalysis,
    job: &JobAnalysis,
) -> Result<CVAnalysis, AppError> {
    let resume_json = serde_json::to_string_pretty(resume).map_err(anyhow::Error::from)?;
    let job_json = serde_json::to_string_pretty(job).map_err(anyhow::Error::from)?;
    let input = SCORING_INPUT_TEMPLATE
        .replace("{resume_json}", &resume_json)
        .replace("{job_json}", &job_json);

    run_stage(runtime, &SCORING_STAGE, &input, None).await
}

/// Executes one stage and parses its output into the stage's record type.
async fn run_stage<T: DeserializeOwned>(
    runtime: &dyn AgentRuntime,
    stage: &StageSpec,
    input: &str,
    document: Option<&Path>,
) -> Result<T, AppError> {
    let system = stage.system_prompt();
    let request = AgentRequest {
        stage: stage.kind,
        system: &system,
        prompt: stage.render(input),
        document,
    };

    debug!("Running {} stage", stage.kind);
    let started = Instant::now();

    let raw = runtime
        .complete(&request)
        .await
        .map_err(|e| AppError::Llm(format!("{} stage failed: {e}", stage.kind)))?;

    let parsed = serde_json::from_str(strip_json_fences(&raw)).map_err(|e| {
        AppError::Llm(format!("{} stage returned invalid JSON: {e}", stage.kind))
    })?;

    debug!(
        "{} stage finished in {}ms",
        stage.kind,
        started.elapsed().as_millis()
    );
    Ok(parsed)
}

/// Case-insensitive count of job keywords that also appear among resume keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordOverlap {
    pub matched: usize,
    pub total: usize,
}

pub fn keyword_overlap(resume: &ResumeAnalysis, job: &JobAnalysis) -> KeywordOverlap {
    let resume_keywords: HashSet<String> = resume
        .keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .collect();
    let job_keywords: HashSet<String> = job
        .keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect();

    KeywordOverlap {
        matched: job_keywords
            .iter()
            .filter(|k| resume_keywords.contains(*k))
            .count(),
        total: job_keywords.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use crate::pipeline::stages::StageKind;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Returns canned output per stage and records every request it sees.
    struct ScriptedRuntime {
        resume: Result<&'static str, ()>,
        job: Result<&'static str, ()>,
        scoring: Result<&'static str, ()>,
        seen: Mutex<Vec<(StageKind, String, bool)>>,
    }

    impl ScriptedRuntime {
        fn ok() -> Self {
            Self {
                resume: Ok(r#"{"summary": "S", "keywords": ["a"]}"#),
                job: Ok(r#"{"keywords": ["A", "b"], "responsibilities": [], "requirements": []}"#),
                scoring: Ok(
                    "```json\n{\"ats_score\": 100, \"analysis\": {\"strengths\": [], \"weaknesses\": [], \"summary\": \"\"}}\n```",
                ),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn stages_seen(&self) -> Vec<StageKind> {
            self.seen.lock().unwrap().iter().map(|(k, _, _)| *k).collect()
        }
    }

    #[async_trait]
    impl AgentRuntime for ScriptedRuntime {
        async fn complete(&self, request: &AgentRequest<'_>) -> Result<String, LlmError> {
            self.seen.lock().unwrap().push((
                request.stage,
                request.prompt.clone(),
                request.document.is_some(),
            ));
            let reply = match request.stage {
                StageKind::Resume => self.resume,
                StageKind::Job => self.job,
                StageKind::Scoring => self.scoring,
            };
            reply.map(String::from).map_err(|_| LlmError::EmptyContent)
        }
    }

    fn input() -> ReviewInput<'static> {
        ReviewInput {
            resume_path: Path::new("/tmp/knowledge/jane_abc.pdf"),
            resume_name: "jane.pdf",
            job_description: "Rust engineer, 3+ years",
        }
    }

    #[tokio::test]
    async fn test_review_runs_all_three_stages() {
        let runtime = ScriptedRuntime::ok();
        let report = run_review(&runtime, input()).await.unwrap();

        assert_eq!(report.ats_score, 100);
        let stages = runtime.stages_seen();
        assert_eq!(stages.len(), 3);
        assert_eq!(stages.last(), Some(&StageKind::Scoring));
    }

    #[tokio::test]
    async fn test_only_resume_stage_receives_document() {
        let runtime = ScriptedRuntime::ok();
        run_review(&runtime, input()).await.unwrap();

        for (kind, _, has_document) in runtime.seen.lock().unwrap().iter() {
            assert_eq!(*has_document, *kind == StageKind::Resume, "{kind}");
        }
    }

    #[tokio::test]
    async fn test_scoring_prompt_carries_both_analyses() {
        let runtime = ScriptedRuntime::ok();
        run_review(&runtime, input()).await.unwrap();

        let seen = runtime.seen.lock().unwrap();
        let (_, scoring_prompt, _) = seen
            .iter()
            .find(|(k, _, _)| *k == StageKind::Scoring)
            .unwrap();
        assert!(scoring_prompt.contains("\"summary\": \"S\""));
        assert!(scoring_prompt.contains("\"responsibilities\": []"));
    }

    #[tokio::test]
    async fn test_job_prompt_contains_description() {
        let runtime = ScriptedRuntime::ok();
        run_review(&runtime, input()).await.unwrap();

        let seen = runtime.seen.lock().unwrap();
        let (_, job_prompt, _) = seen.iter().find(|(k, _, _)| *k == StageKind::Job).unwrap();
        assert!(job_prompt.contains("Rust engineer, 3+ years"));
    }

    #[tokio::test]
    async fn test_failed_stage_aborts_before_scoring() {
        let runtime = ScriptedRuntime {
            job: Err(()),
            ..ScriptedRuntime::ok()
        };
        let err = run_review(&runtime, input()).await.unwrap_err();

        assert!(matches!(err, AppError::Llm(_)));
        assert!(!runtime.stages_seen().contains(&StageKind::Scoring));
    }

    #[tokio::test]
    async fn test_invalid_json_is_stage_failure() {
        let runtime = ScriptedRuntime {
            resume: Ok("Resume Summary: not json"),
            ..ScriptedRuntime::ok()
        };
        let err = run_review(&runtime, input()).await.unwrap_err();
        match err {
            AppError::Llm(msg) => {
                assert!(msg.contains("resume stage returned invalid JSON"), "{msg}");
                assert!(msg.contains("expected value"), "{msg}");
                assert!(!msg.contains("JSON parse error"), "{msg}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_keyword_overlap_is_case_insensitive() {
        let resume = ResumeAnalysis {
            summary: String::new(),
            keywords: vec!["Rust".into(), "SQL".into()],
        };
        let job = JobAnalysis {
            keywords: vec!["rust".into(), "Kafka".into(), " sql ".into()],
            responsibilities: vec![],
            requirements: vec![],
        };
        assert_eq!(
            keyword_overlap(&resume, &job),
            KeywordOverlap {
                matched: 2,
                total: 3
            }
        );
    }
}
