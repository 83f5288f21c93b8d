//! `review`: copy-edit text with the generative provider.

use tracing::debug;

use taskye_core::{AnalysisResult, AssistError, TextReviewer};

use crate::cli::ReviewArgs;
use crate::error::CliError;
use crate::output::{self, Painter};

use super::Context;
use super::util;

fn detail(r: &AnalysisResult, painter: Painter) -> String {
    let mut lines = vec![
        painter.heading("Corrected text"),
        r.corrected_text.clone(),
        String::new(),
        painter.heading("Improvements"),
    ];
    if r.improvements.is_empty() {
        lines.push("  (none)".into());
    }
    lines.extend(r.improvements.iter().map(|i| format!("  • {i}")));
    lines.push(String::new());
    lines.push(painter.heading("Tone"));
    lines.push(r.tone_analysis.clone());
    lines.join("\n")
}

/// `--model` when given, else the best ranked candidate.
async fn pick_model(reviewer: &TextReviewer, pinned: Option<&str>) -> Result<String, AssistError> {
    if let Some(model) = pinned {
        return Ok(model.to_owned());
    }
    let models = reviewer.available_models().await?;
    models
        .first()
        .map(|m| m.id().to_owned())
        .ok_or(AssistError::NoUsableModel)
}

async fn run(
    reviewer: &TextReviewer,
    args: &ReviewArgs,
    pinned: Option<&str>,
) -> Result<AnalysisResult, AssistError> {
    let model = pick_model(reviewer, pinned).await?;
    debug!(%model, tone = %args.tone, "review model selected");
    reviewer.analyze(&model, &args.text, &args.tone).await
}

pub async fn handle(args: ReviewArgs, ctx: &Context<'_>) -> Result<(), CliError> {
    let reviewer = TextReviewer::new(ctx.assistant_config());
    let spinner = util::spinner("Reviewing text…", ctx.global.quiet);
    let outcome = run(&reviewer, &args, ctx.global.model.as_deref()).await;
    spinner.finish_and_clear();

    let result = outcome?;
    let painter = ctx.painter();
    let out = output::render_single(
        ctx.global.output,
        &result,
        |r| detail(r, painter),
        |r| r.corrected_text.clone(),
    )?;
    ctx.print(&out);
    Ok(())
}
