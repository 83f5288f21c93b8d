//! Session command handlers: login, logout, whoami.

use dialoguer::Input;

use taskye_core::User;

use crate::cli::LoginArgs;
use crate::error::CliError;
use crate::output;

use super::Context;
use super::util::prompt_err;

fn detail(user: &User) -> String {
    [
        format!("ID:    {}", user.id),
        format!("Name:  {}", user.name),
        format!("Email: {}", user.email),
        format!("Role:  {}", user.role),
    ]
    .join("\n")
}

pub fn login(args: LoginArgs, ctx: &Context<'_>) -> Result<(), CliError> {
    let email = match args.email {
        Some(email) => email,
        None => Input::new()
            .with_prompt("Email")
            .interact_text()
            .map_err(prompt_err)?,
    };
    let password = match args.password {
        Some(password) => password,
        None => rpassword::prompt_password("Password: ").map_err(prompt_err)?,
    };

    let mut session = ctx.session()?;
    let user = session.login(email.trim(), &password)?;

    ctx.note(&format!("✓ Signed in as {} ({})", user.name, user.role));
    Ok(())
}

pub fn logout(ctx: &Context<'_>) -> Result<(), CliError> {
    let mut session = ctx.session()?;
    if !session.is_authenticated() {
        ctx.note("Not signed in");
        return Ok(());
    }
    session.logout()?;
    ctx.note("✓ Signed out");
    Ok(())
}

pub fn whoami(ctx: &Context<'_>) -> Result<(), CliError> {
    let user = ctx.require_user()?;
    let out = output::render_single(ctx.global.output, &user, detail, |u| u.email.clone())?;
    ctx.print(&out);
    Ok(())
}
