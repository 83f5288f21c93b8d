//! `assist`: draft a ticket from free text with the AI assistant, preview
//! it, and persist it once confirmed.

use std::io::IsTerminal;

use tracing::warn;

use taskye_core::{
    AssistError, Attachment, DraftRequest, DraftSource, Extraction, TicketAssistant, User,
};

use crate::cli::{AssistArgs, OutputFormat};
use crate::error::CliError;
use crate::output::{self, Painter};

use super::Context;
use super::util;

fn preview(e: &Extraction, painter: Painter) -> String {
    let source = match e.source {
        DraftSource::Model => {
            format!("generated by {}", e.model.as_deref().unwrap_or("model"))
        }
        DraftSource::Fallback => "fallback draft (model output unusable)".to_owned(),
    };
    [
        painter.heading(&format!("Ticket draft ({source})")),
        format!("Title:       {}", e.draft.title),
        format!("Priority:    {}", painter.priority(e.draft.priority)),
        format!("Category:    {}", e.draft.category),
        String::new(),
        e.draft.description.clone(),
    ]
    .join("\n")
}

/// Decide whether a failed call may continue with the deterministic draft.
fn accept_fallback(err: &AssistError, ctx: &Context<'_>) -> Result<bool, CliError> {
    if !err.allows_fallback() || err.is_auth() {
        return Ok(false);
    }
    warn!(error = %err, "assistant failed, fallback draft available");
    if ctx.global.yes {
        ctx.note(&format!("! {err}; using a draft built from your message"));
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Ok(false);
    }
    util::confirm(
        &format!("{err}. Build a draft from your message instead?"),
        false,
        "assist fallback",
    )
}

pub async fn handle(args: AssistArgs, ctx: &Context<'_>, user: &User) -> Result<(), CliError> {
    let attachment = args
        .attach
        .as_deref()
        .map(Attachment::from_path)
        .transpose()?;

    let mut request = DraftRequest::new(args.message);
    if let Some(ref attachment) = attachment {
        request = request.with_attachment(attachment.clone());
    }

    let assistant = TicketAssistant::new(ctx.assistant_config());
    let spinner = util::spinner("Analysing request…", ctx.global.quiet);
    let outcome = assistant.draft(&request).await;
    spinner.finish_and_clear();

    let extraction = match outcome {
        Ok(extraction) => extraction,
        Err(err) => {
            if !accept_fallback(&err, ctx)? {
                return Err(err.into());
            }
            assistant.fallback(&request)
        }
    };

    let painter = ctx.painter();
    let structured = !matches!(ctx.global.output, OutputFormat::Table);
    if args.dry_run || !structured {
        let out = output::render_single(
            ctx.global.output,
            &extraction,
            |e| preview(e, painter),
            |e| e.draft.title.clone(),
        )?;
        ctx.print(&out);
    }
    if args.dry_run {
        return Ok(());
    }

    if !util::confirm("Create this ticket?", ctx.global.yes, "assist")? {
        ctx.note("Draft discarded");
        return Ok(());
    }

    let mut store = ctx.tickets();
    let mut new = extraction.draft.into_new_ticket(user.name.clone());
    new.requester_email = Some(user.email.clone());
    let ticket = store.insert(new)?;
    if let Some(attachment) = attachment {
        store.attach(&ticket.id, attachment.to_ref(store.stamp_now()))?;
    }
    let ticket = store.require(&ticket.id)?;

    ctx.note(&format!("✓ Ticket #{} created", ticket.id));
    if structured {
        let out = output::render_single(
            ctx.global.output,
            ticket,
            |_| String::new(),
            |t| t.id.clone(),
        )?;
        ctx.print(&out);
    }
    Ok(())
}
