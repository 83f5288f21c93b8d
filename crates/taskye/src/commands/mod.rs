//! Command dispatch: bridges CLI args -> core stores -> output formatting.

pub mod assist;
pub mod auth;
pub mod board;
pub mod config_cmd;
pub mod dashboard;
pub mod inventory;
pub mod models;
pub mod review;
pub mod tickets;
pub mod util;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use taskye_core::{
    AssistantConfig, FileSnapshots, InventoryStore, SessionStore, SnapshotPort, TicketStore, User,
};

use crate::cli::{Command, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output::Painter;

/// Everything a command handler needs: flags, loaded config, and the
/// snapshot port the stores persist through.
pub struct Context<'a> {
    pub global: &'a GlobalOpts,
    pub config: Config,
    data_dir: PathBuf,
    port: Arc<dyn SnapshotPort>,
}

impl<'a> Context<'a> {
    pub fn open(global: &'a GlobalOpts) -> Result<Self, CliError> {
        let config = config::load(global)?;
        let data_dir = config::data_dir(global, &config);
        let port: Arc<dyn SnapshotPort> = Arc::new(FileSnapshots::new(data_dir.clone()));
        Ok(Self {
            global,
            config,
            data_dir,
            port,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn session(&self) -> Result<SessionStore, CliError> {
        Ok(SessionStore::open(Arc::clone(&self.port))?)
    }

    /// The signed-in user, or `NotLoggedIn`.
    pub fn require_user(&self) -> Result<User, CliError> {
        self.session()?
            .current()
            .cloned()
            .ok_or(CliError::NotLoggedIn)
    }

    pub fn tickets(&self) -> TicketStore {
        TicketStore::open(Arc::clone(&self.port))
    }

    pub fn inventory(&self) -> InventoryStore {
        InventoryStore::open(Arc::clone(&self.port))
    }

    pub fn assistant_config(&self) -> AssistantConfig {
        config::assistant_config(self.global, &self.config)
    }

    pub fn painter(&self) -> Painter {
        Painter::new(self.global.color)
    }

    pub fn print(&self, rendered: &str) {
        crate::output::print_output(rendered, self.global.quiet);
    }

    /// Status line on stderr, suppressed by `--quiet`.
    pub fn note(&self, message: &str) {
        if !self.global.quiet {
            eprintln!("{message}");
        }
    }
}

/// Dispatch a data-bound command to the appropriate handler. Ticket, board,
/// dashboard, inventory and assistant commands require a session.
pub async fn dispatch(cmd: Command, ctx: &Context<'_>) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => auth::login(args, ctx),
        Command::Logout => auth::logout(ctx),
        Command::Whoami => auth::whoami(ctx),

        Command::Models(args) => models::handle(args, ctx).await,
        Command::Review(args) => review::handle(args, ctx).await,

        Command::Tickets(args) => tickets::handle(args, ctx, &ctx.require_user()?),
        Command::Board(args) => board::handle(args, ctx, &ctx.require_user()?),
        Command::Dashboard(args) => {
            ctx.require_user()?;
            dashboard::handle(&args, ctx)
        }
        Command::Inventory(args) => {
            ctx.require_user()?;
            inventory::handle(args, ctx)
        }
        Command::Assist(args) => assist::handle(args, ctx, &ctx.require_user()?).await,

        // Config and Completions are handled before a context is opened
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
