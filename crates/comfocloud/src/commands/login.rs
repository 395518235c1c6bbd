//! Interactive OAuth2 login: print the authorization URL, collect the
//! redirect, exchange the code, and store the refresh token.

use dialoguer::Input;

use comfocloud_config::{Profile, oauth, store_refresh_token};

use crate::cli::{GlobalOpts, LoginArgs};
use crate::config::oauth_settings;
use crate::error::CliError;
use crate::output;

pub async fn handle(
    args: &LoginArgs,
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let settings = oauth_settings(profile);
    let request = oauth::authorization_request(&settings)?;

    output::print_output(
        &format!(
            "Open this URL in your browser and sign in:\n\n  {}\n",
            request.url
        ),
        global.quiet,
    );

    if args.url_only {
        return Ok(());
    }

    let pasted: String = Input::new()
        .with_prompt("Paste the full redirect URL (or just the code)")
        .interact_text()
        .map_err(|e| CliError::OAuth {
            message: format!("input aborted: {e}"),
        })?;

    let code = oauth::extract_code(&pasted).ok_or_else(|| CliError::OAuth {
        message: "no authorization code found in input".into(),
    })?;

    let tokens = oauth::exchange_code(&settings, code, request.verifier).await?;

    match tokens.refresh_token {
        Some(ref refresh) => store_refresh_token(profile_name, refresh)?,
        None => {
            return Err(CliError::OAuth {
                message: "the token response carried no refresh token \
                          (offline_access scope missing?)"
                    .into(),
            });
        }
    }

    let expiry = tokens
        .expires_in
        .map_or_else(String::new, |d| format!(" (access token valid {}s)", d.as_secs()));
    output::print_output(
        &format!("Logged in -- refresh token stored for profile '{profile_name}'{expiry}"),
        global.quiet,
    );
    Ok(())
}
