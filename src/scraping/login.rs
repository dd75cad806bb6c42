//! Google account sign-in for YouTube
//!
//! Runs only when a handler lands on a sign-in page and both email and
//! password are available. Error messages never include credential values.

use crate::credentials::Credentials;
use crate::crawler::BrowserPage;
use crate::scraping::Pacing;
use anyhow::{bail, Context};
use std::time::Duration;
use url::Url;

const EMAIL_INPUT_SELECTOR: &str = r#"input[type="email"]"#;
const EMAIL_NEXT_SELECTOR: &str = "#identifierNext";
const PASSWORD_INPUT_SELECTOR: &str = r#"input[type="password"]"#;
const PASSWORD_NEXT_SELECTOR: &str = "#passwordNext";

/// How long each sign-in form step may take to render
const FORM_STEP_TIMEOUT: Duration = Duration::from_secs(15);

/// Whether `url` is a Google/YouTube sign-in page
pub fn is_login_page(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let host = parsed.host_str().unwrap_or_default();
    let path = parsed.path();

    host == "accounts.google.com"
        || path.contains("ServiceLogin")
        || path.starts_with("/signin")
        || path.starts_with("/v3/signin")
}

/// Fills in the sign-in form with `credentials`
///
/// Fails if credentials are incomplete, a form step does not appear, or the
/// browser is still on a sign-in page afterwards.
pub async fn sign_in(
    page: &dyn BrowserPage,
    credentials: &Credentials,
    pacing: &Pacing,
) -> anyhow::Result<()> {
    let (Some(email), Some(password)) = (&credentials.email, &credentials.password) else {
        bail!("sign-in requires both an email and a password");
    };

    tracing::info!("Sign-in page detected, logging in");

    if !page
        .wait_for_selector(EMAIL_INPUT_SELECTOR, FORM_STEP_TIMEOUT)
        .await?
    {
        bail!("email field did not appear on the sign-in page");
    }
    page.type_text(EMAIL_INPUT_SELECTOR, email)
        .await
        .context("failed to enter the account email")?;
    if !page.click(EMAIL_NEXT_SELECTOR).await? {
        bail!("could not find the button after the email step");
    }
    tokio::time::sleep(pacing.after_login_step).await;

    if !page
        .wait_for_selector(PASSWORD_INPUT_SELECTOR, FORM_STEP_TIMEOUT)
        .await?
    {
        bail!("password field did not appear on the sign-in page");
    }
    page.type_text(PASSWORD_INPUT_SELECTOR, password.expose())
        .await
        .context("failed to enter the account password")?;
    if !page.click(PASSWORD_NEXT_SELECTOR).await? {
        bail!("could not find the button after the password step");
    }
    tokio::time::sleep(pacing.after_login_step).await;

    let landed_on = page.current_url().await?.unwrap_or_default();
    if is_login_page(&landed_on) {
        bail!("sign-in did not complete, still on a sign-in page");
    }

    tracing::info!("Signed in successfully");
    Ok(())
}
