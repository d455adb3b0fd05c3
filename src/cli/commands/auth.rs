//! cli::commands::auth
//!
//! Store, inspect, or remove wiki credentials.
//!
//! # Design
//!
//! Credentials are kept per site (`host:port` of the endpoint) in the
//! configured secret store. The password is:
//! - checked against the wiki with `dokuwiki.login` before it is stored
//! - NEVER printed to stdout/stderr
//!
//! # Example
//!
//! ```bash
//! # Interactive (prompts for user and password)
//! dwiki auth
//!
//! # Non-interactive
//! printf '%s\n' "$PASS" | dwiki --user alice auth --password-stdin
//!
//! # Check status
//! dwiki auth --status
//!
//! # Remove stored credentials
//! dwiki auth --logout
//! ```

use std::io::{self, BufRead};
use std::sync::Arc;

use crate::auth::{Credentials, NoCredentials, Site};
use crate::cli::Context;
use crate::remote::{HttpTransport, WikiClient};
use crate::secrets::{self, SecretStore, SiteSecret};
use crate::ui::{output, prompts};
use anyhow::{anyhow, bail, Context as _, Result};

/// Run the auth command.
///
/// # Security
///
/// This function NEVER prints the password. It only confirms success or
/// failure.
pub fn auth(ctx: &Context, password_stdin: bool, status: bool, logout: bool) -> Result<()> {
    let endpoint = ctx.config.endpoint()?;
    let site = Site::from_url(&endpoint)
        .ok_or_else(|| anyhow!("Endpoint '{}' has no host", endpoint))?;

    let store = secrets::create_store(&ctx.config.secrets_provider())
        .context("Failed to initialize secret store")?;

    if status {
        return show_status(store.as_ref(), &site, ctx.quiet);
    }
    if logout {
        return do_logout(store.as_ref(), &site, ctx);
    }

    let user = match ctx.config.user() {
        Some(user) => user,
        None => prompts::input("Wiki user", None, ctx.interactive)
            .context("User required. Use --user <USER> or set wiki.user.")?,
    };
    if user.trim().is_empty() {
        bail!("User cannot be empty.");
    }

    let password = if password_stdin {
        read_password_line(io::stdin().lock())?
    } else {
        prompts::password(&format!("Password for {}@{}", user, site), ctx.interactive)
            .context("Password required. Use --password-stdin or run interactively.")?
    };
    if password.is_empty() {
        bail!("Password cannot be empty.");
    }

    let transport = HttpTransport::new(endpoint, Some(ctx.config.timeout()))?;
    let client = WikiClient::new(Arc::new(transport), Arc::new(NoCredentials));
    let rt = ctx.runtime()?;
    let accepted = rt
        .block_on(client.login(Credentials::plain(user.clone(), password.clone())))
        .context("Failed to reach the wiki")?;
    if !accepted {
        bail!("The wiki rejected the login for '{}'. Nothing was stored.", user);
    }

    store
        .store_login(&site, &user, &password)
        .context("Failed to store credentials")?;

    output::status(
        format!("Credentials for {} stored for {}.", user, site),
        ctx.verbosity(),
    );
    Ok(())
}

/// First line of `reader` without its line ending.
fn read_password_line<R: BufRead>(mut reader: R) -> Result<String> {
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn show_status(store: &dyn SecretStore, site: &Site, quiet: bool) -> Result<()> {
    let has_password = store.has_password(site)?;
    let user = store.site_secret(site, SiteSecret::User)?;

    if quiet {
        // Machine-readable output
        output::data(if has_password {
            "authenticated"
        } else {
            "not_authenticated"
        });
    } else if has_password {
        match user {
            Some(user) => output::data(format!("Credentials stored for {} as {}.", site, user)),
            None => output::data(format!("Password stored for {}.", site)),
        }
    } else {
        output::data(format!("No credentials stored for {}.", site));
        output::data("Run 'dwiki auth' to store them.");
    }
    Ok(())
}

fn do_logout(store: &dyn SecretStore, site: &Site, ctx: &Context) -> Result<()> {
    if ctx.interactive
        && !prompts::confirm(
            &format!("Remove stored credentials for {}?", site),
            true,
            ctx.interactive,
        )?
    {
        output::status("Nothing removed.", ctx.verbosity());
        return Ok(());
    }

    store
        .forget_site(site)
        .context("Failed to remove stored credentials")?;

    output::status(format!("Removed credentials for {}.", site), ctx.verbosity());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn password_line_strips_line_ending() {
        let read = read_password_line(Cursor::new("s3cret\r\nignored\n")).unwrap();
        assert_eq!(read, "s3cret");
    }

    #[test]
    fn password_line_keeps_inner_spaces() {
        let read = read_password_line(Cursor::new(" two words \n")).unwrap();
        assert_eq!(read, " two words ");
    }

    #[test]
    fn empty_stdin_reads_empty_password() {
        let read = read_password_line(Cursor::new("")).unwrap();
        assert!(read.is_empty());
    }
}
