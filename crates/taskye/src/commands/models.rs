//! `models list`: generative models usable with the configured key.

use tabled::Tabled;

use taskye_core::{ModelOption, TicketAssistant};

use crate::cli::{ModelsArgs, ModelsCommand};
use crate::error::CliError;
use crate::output;

use super::Context;
use super::util;

#[derive(Tabled)]
struct ModelRow {
    #[tabled(rename = "Model")]
    id: String,
    #[tabled(rename = "Name")]
    display_name: String,
    #[tabled(rename = "Tier")]
    tier: String,
    #[tabled(rename = "Safe")]
    safe: String,
}

impl From<&ModelOption> for ModelRow {
    fn from(m: &ModelOption) -> Self {
        Self {
            id: m.id().to_owned(),
            display_name: m.display_name.clone(),
            tier: m.tier.to_string(),
            safe: if m.is_safe { "yes" } else { "no" }.into(),
        }
    }
}

pub async fn handle(args: ModelsArgs, ctx: &Context<'_>) -> Result<(), CliError> {
    match args.command {
        ModelsCommand::List => {
            let assistant = TicketAssistant::new(ctx.assistant_config());
            let spinner = util::spinner("Listing models…", ctx.global.quiet);
            let outcome = assistant.available_models().await;
            spinner.finish_and_clear();

            let models = outcome?;
            let out = output::render_list(
                ctx.global.output,
                &models,
                |m| ModelRow::from(m),
                |m| m.id().to_owned(),
            )?;
            ctx.print(&out);
            Ok(())
        }
    }
}
