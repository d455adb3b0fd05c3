//! title and status commands - Wiki identity and local setup

use crate::auth::Site;
use crate::cli::Context;
use crate::secrets;
use crate::ui::output;
use anyhow::{Context as _, Result};

/// Print the wiki's title.
pub fn title(ctx: &Context) -> Result<()> {
    let session = ctx.session()?;
    let rt = ctx.runtime()?;
    let title = rt.block_on(session.title())?;
    output::data(title);
    Ok(())
}

/// Show configuration sources, stored credentials and the server version.
///
/// A version lookup failure is reported but does not fail the command.
pub fn status(ctx: &Context) -> Result<()> {
    let endpoint = ctx.config.endpoint()?;

    output::data(format!("Endpoint:  {}", endpoint));
    output::data(format!("Namespace: {}", display_namespace(&ctx.config.namespace())));
    output::data(format!(
        "Global:    {}",
        ctx.config
            .global_config_loaded_from()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none)".to_string())
    ));
    output::data(format!(
        "Project:   {}",
        ctx.config
            .project_config_loaded_from()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none)".to_string())
    ));

    let stored = match Site::from_url(&endpoint) {
        Some(site) => {
            let store = secrets::create_store(&ctx.config.secrets_provider())
                .context("Failed to initialize secret store")?;
            store.has_password(&site)?
        }
        None => false,
    };
    output::data(format!(
        "Login:     {}",
        if stored { "stored" } else { "not stored" }
    ));

    let session = ctx.session()?;
    let rt = ctx.runtime()?;
    match rt.block_on(session.client().version()) {
        Ok(version) => output::data(format!("Version:   {}", version)),
        Err(err) => output::warn(format!("could not query version: {}", err), ctx.verbosity()),
    }

    Ok(())
}

fn display_namespace(namespace: &str) -> &str {
    if namespace.is_empty() {
        "(root)"
    } else {
        namespace
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_namespace_is_labelled() {
        assert_eq!(display_namespace(""), "(root)");
        assert_eq!(display_namespace("proj"), "proj");
    }
}
