//! Session controller
//!
//! Drives the vendor's login flow:
//! `Unknown → CheckingExisting → {AlreadyAuthenticated | AwaitingUsername}
//! → AwaitingPassword → [AwaitingOneTimeCode] → Authenticated`.
//!
//! The vendor may ask for the password again in the middle of a crawl;
//! [`SessionController::resume_login`] re-enters the flow at the password
//! stage without disturbing the traversal.

use crate::ports::browser::ENTER;
use crate::ports::progress::{ArchiveProgress, NoProgress};
use crate::ports::secrets::Credentials;
use crate::use_cases::context::CrawlContext;
use crate::use_cases::error::CrawlError;
use harvest_domain::{LoginStage, SessionState};
use tracing::{debug, info, warn};

pub struct SessionController<'c> {
    ctx: &'c CrawlContext,
    credentials: Credentials,
    state: SessionState,
    progress: &'c dyn ArchiveProgress,
}

impl<'c> SessionController<'c> {
    pub fn new(ctx: &'c CrawlContext, credentials: Credentials) -> Self {
        Self {
            ctx,
            credentials,
            state: SessionState::default(),
            progress: &NoProgress,
        }
    }

    pub fn with_progress(mut self, progress: &'c dyn ArchiveProgress) -> Self {
        self.progress = progress;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }

    fn enter(&self, stage: LoginStage) {
        debug!("Login stage: {}", stage);
        self.progress.on_login_stage(stage);
    }

    /// Open the vendor home page and make sure the session is signed in.
    ///
    /// Calling this again on an authenticated session only re-navigates home.
    pub async fn login(&mut self) -> Result<(), CrawlError> {
        let ctx = self.ctx;
        let profile = ctx.profile();

        info!("Initiating log in");
        self.enter(LoginStage::Unknown);
        ctx.open(&profile.home_url()).await?;
        if self.is_authenticated() {
            return Ok(());
        }

        self.enter(LoginStage::CheckingExisting);
        if !ctx.find(&profile.sign_out_link(), false).await?.is_empty() {
            info!("Already logged in");
            self.enter(LoginStage::AlreadyAuthenticated);
            self.state = SessionState::Authenticated;
            return Ok(());
        }

        self.enter(LoginStage::AwaitingUsername);
        debug!("Looking for sign-in link");
        let sign_in = ctx
            .wait_for_one(&profile.sign_in_link(), true)
            .await
            .map_err(|e| CrawlError::login_wait("Sign-in link", e))?;
        ctx.browser().click(&sign_in).await?;

        debug!("Looking for username field");
        let username = ctx
            .wait_for_one(&profile.username_field(), true)
            .await
            .map_err(|e| CrawlError::login_wait("Username field", e))?;
        let browser = ctx.browser();
        browser.type_text(&username, &self.credentials.username).await?;
        browser.type_text(&username, &ENTER.to_string()).await?;

        self.finish_login().await
    }

    /// Re-enter the login flow at the password stage.
    ///
    /// Used when the vendor interrupts a crawl with a password prompt.
    pub async fn resume_login(&mut self) -> Result<(), CrawlError> {
        warn!("Vendor asked for the password again, re-authenticating");
        self.state = SessionState::NotAuthenticated;
        self.finish_login().await
    }

    async fn finish_login(&mut self) -> Result<(), CrawlError> {
        let ctx = self.ctx;
        let profile = ctx.profile();
        let browser = ctx.browser();

        self.enter(LoginStage::AwaitingPassword);
        debug!("Looking for password field");
        let password_field = ctx
            .wait_for_one(&profile.password_field(), true)
            .await
            .map_err(|e| CrawlError::login_wait("Password field", e))?;
        let password = self.credentials.password().await?;
        browser.type_text(&password_field, &password).await?;

        // Not every password form offers the checkbox
        if let Some(remember_me) = ctx
            .find(&profile.remember_me_field(), true)
            .await?
            .into_iter()
            .next()
        {
            if !browser.is_selected(&remember_me).await? {
                browser.click(&remember_me).await?;
            }
        }

        ctx.type_and_wait(&password_field, &ENTER.to_string()).await?;

        let next = LoginStage::after_password(profile.one_time_code);
        if next == LoginStage::AwaitingOneTimeCode {
            self.enter(next);
            debug!("Looking for one-time code field");
            let code_field = ctx
                .wait_for_one(&profile.one_time_code_field(), true)
                .await
                .map_err(|e| CrawlError::login_wait("One-time code field", e))?;
            // Codes expire, so fetch right before typing
            let code = self.credentials.one_time_code().await?;
            browser.type_text(&code_field, &code).await?;
            ctx.type_and_wait(&code_field, &ENTER.to_string()).await?;
        }

        self.state = SessionState::Authenticated;
        self.enter(LoginStage::Authenticated);
        info!("Logged in as {}", self.credentials.username);
        Ok(())
    }
}
