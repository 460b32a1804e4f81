use anyhow::{Context, Result, bail};

use pathwise_core::{PlanRequest, PlanService};

use crate::config::PathwiseConfig;

/// Execute `pathwise generate`: create one plan and print it as JSON.
pub async fn run_generate(config: &PathwiseConfig, request: PlanRequest, with_videos: bool) -> Result<()> {
    let Some(service) = config.plan_service(with_videos)? else {
        bail!(
            "Gemini API key not configured; set GEMINI_API_KEY or run `pathwise init --gemini-key <KEY>`"
        );
    };
    if with_videos && !service.has_video_lookup() {
        tracing::warn!("YOUTUBE_API_KEY not set; generating plan without videos");
    }

    let json = generate_json(&service, request).await?;
    println!("{json}");
    Ok(())
}

async fn generate_json(service: &PlanService, request: PlanRequest) -> Result<String> {
    let plan = service
        .create_plan(request)
        .await
        .context("failed to generate learning plan")?;
    serde_json::to_string_pretty(&plan).context("failed to serialize plan")
}
