//! Config subcommand handlers.

use dialoguer::{Input, Select};
use secrecy::{ExposeSecret, SecretString};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, clear_api_key, save_config_to, store_api_key};
use crate::error::CliError;
use crate::output;

use super::util::{self, or_dash, prompt_err};

// ── Helpers ─────────────────────────────────────────────────────────

fn detail(c: &Config) -> String {
    let p = &c.provider;
    [
        format!("Output:            {}", c.defaults.output),
        format!("Color:             {}", c.defaults.color),
        format!("Provider URL:      {}", p.base_url),
        format!("API key:           {}", or_dash(p.api_key.as_deref())),
        format!("API key env:       {}", or_dash(p.api_key_env.as_deref())),
        format!("Model:             {}", or_dash(p.model.as_deref())),
        format!(
            "Timeout:           {}",
            p.timeout.map_or_else(|| "-".to_owned(), |t| format!("{t}s"))
        ),
        format!("Preferred models:  {}", p.preferred_models.join(", ")),
        format!(
            "Data dir:          {}",
            c.storage
                .data_dir
                .as_ref()
                .map_or_else(|| "-".to_owned(), |d| d.display().to_string())
        ),
    ]
    .join("\n")
}

fn read_key(prompt: &str) -> Result<SecretString, CliError> {
    let key = rpassword::prompt_password(prompt).map_err(prompt_err)?;
    let key = key.trim();
    if key.is_empty() {
        return Err(CliError::Validation {
            field: "api_key".into(),
            reason: "API key cannot be empty".into(),
        });
    }
    Ok(SecretString::from(key.to_owned()))
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let path = config::config_file(global);
            if path.exists()
                && !util::confirm(
                    &format!("Overwrite {}?", path.display()),
                    global.yes,
                    "config init",
                )?
            {
                return Ok(());
            }
            eprintln!("Taskye: configuration wizard");
            eprintln!("   Config path: {}\n", path.display());

            let mut cfg = Config::default();

            cfg.provider.base_url = Input::new()
                .with_prompt("Provider URL")
                .default(cfg.provider.base_url.clone())
                .interact_text()
                .map_err(prompt_err)?;

            let model: String = Input::new()
                .with_prompt("Pinned model (empty selects automatically)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;
            cfg.provider.model = Some(model.trim().to_owned()).filter(|m| !m.is_empty());

            let key_choices = &[
                "Store in system keyring (recommended)",
                "Save to config file (plaintext)",
                "Skip for now",
            ];
            let selection = Select::new()
                .with_prompt("Provider API key")
                .items(key_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?;
            match selection {
                0 => {
                    store_api_key(&read_key("API key: ")?)?;
                    eprintln!("   ✓ API key stored in system keyring");
                }
                1 => {
                    let key = read_key("API key: ")?;
                    cfg.provider.api_key = Some(key.expose_secret().to_owned());
                }
                _ => {}
            }

            save_config_to(&cfg, &path)?;
            eprintln!("\n✓ Configuration written to {}", path.display());
            eprintln!("\n  Try it: taskye login");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load(global)?.redacted();
            let out = output::render_single(global.output, &cfg, detail, |_| {
                config::config_file(global).display().to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(
                &config::config_file(global).display().to_string(),
                global.quiet,
            );
            Ok(())
        }

        ConfigCommand::SetKey => {
            store_api_key(&read_key("API key: ")?)?;
            if !global.quiet {
                eprintln!("✓ API key stored in system keyring");
            }
            Ok(())
        }

        ConfigCommand::ClearKey => {
            clear_api_key()?;
            if !global.quiet {
                eprintln!("✓ API key removed from system keyring");
            }
            Ok(())
        }
    }
}
