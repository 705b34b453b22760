//! Browser journeys against a running Fortymm server
//!
//! This file is a test binary without the libtest harness. It drives a real
//! browser, so it only runs when a server is reachable: pass `--base-url`,
//! set `FORTYMM_E2E_BASE_URL`, point `--config` at a YAML file, or ask for
//! `--spawn-server`. Otherwise it reports a skip and exits successfully.
//!
//! Run with: cargo test --package fortymm-e2e --test journey -- --base-url http://localhost:4000

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fortymm_e2e::components::AlertMessage;
use fortymm_e2e::config::ENV_BASE_URL;
use fortymm_e2e::journey::{expect_eq, write_results};
use fortymm_e2e::pages::{AccountSettingsPage, LandingPage};
use fortymm_e2e::server::{ServerConfig, ServerHandle};
use fortymm_e2e::{
    build_password, build_user, E2eError, E2eResult, HarnessConfig, Journey, JourneyResult, Page,
    PlaywrightDriver,
};

/// The app renders emailed links for this port
const APP_PORT: u16 = 4000;

#[derive(Parser, Debug)]
#[command(name = "fortymm-e2e")]
#[command(about = "Browser journeys for Fortymm")]
struct Args {
    /// YAML harness configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of an already running server
    #[arg(long)]
    base_url: Option<String>,

    /// Start the Phoenix server before the run
    #[arg(long)]
    spawn_server: bool,

    /// Phoenix project directory (with --spawn-server)
    #[arg(long)]
    server_dir: Option<PathBuf>,

    /// Browser to use (chromium, firefox, webkit)
    #[arg(long)]
    browser: Option<String>,

    /// Show the browser window
    #[arg(long)]
    headed: bool,

    /// Run only the journey with this name
    #[arg(short, long)]
    journey: Option<String>,

    /// Output directory for results
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Args {
    fn targets_a_server(&self) -> bool {
        self.base_url.is_some()
            || self.config.is_some()
            || self.spawn_server
            || std::env::var_os(ENV_BASE_URL).is_some()
    }

    fn harness_config(&self) -> E2eResult<HarnessConfig> {
        let mut config = match &self.config {
            Some(path) => HarnessConfig::from_file(path)?,
            None => HarnessConfig::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;

        if let Some(url) = &self.base_url {
            config.playwright.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(browser) = &self.browser {
            config.playwright.browser = browser.parse()?;
        }
        if self.headed {
            config.playwright.headless = false;
        }
        if let Some(output) = &self.output {
            config.output_dir = output.clone();
        }
        if self.spawn_server {
            let server = config.server.get_or_insert_with(ServerConfig::default);
            server.port.get_or_insert(APP_PORT);
            if let Some(dir) = &self.server_dir {
                server.working_dir = Some(dir.clone());
            }
        }

        Ok(config)
    }

    fn selects(&self, journey: &str) -> bool {
        self.journey.as_deref().map_or(true, |name| name == journey)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    let args = Args::parse();

    if !args.targets_a_server() {
        eprintln!("Skipping browser journeys: no server configured (set {ENV_BASE_URL} or pass --base-url)");
        std::process::exit(0);
    }

    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    let result = rt.block_on(async_main(args));

    match result {
        Ok(true) => std::process::exit(0),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}

async fn async_main(args: Args) -> E2eResult<bool> {
    let mut config = args.harness_config()?;

    let _server = match config.server.clone() {
        Some(server_config) => {
            let handle = ServerHandle::spawn(server_config).await?;
            config.playwright.base_url = handle.base_url().to_string();
            Some(handle)
        }
        None => None,
    };

    let driver = Arc::new(PlaywrightDriver::launch(config.playwright.clone()).await?);
    let page = Page::new(driver.clone(), config.timeouts);

    let mut results = Vec::new();
    if args.selects("landing page") {
        let mut journey = Journey::new("landing page");
        let outcome = landing_page(&mut journey, &page).await;
        results.push(journey.finish(outcome));
    }
    if args.selects("registration and login") {
        let mut journey = Journey::new("registration and login");
        let outcome = registration_and_login(&mut journey, &page).await;
        results.push(journey.finish(outcome));
    }

    for result in &results {
        write_results(&config.output_dir, result)?;
    }

    drop(page);
    if let Ok(driver) = Arc::try_unwrap(driver) {
        driver.close().await?;
    }

    let passed = results.iter().filter(|r| r.success).count();
    info!("{}/{} journey(s) passed", passed, results.len());

    Ok(results.iter().all(|r: &JourneyResult| r.success))
}

async fn landing_page(journey: &mut Journey, page: &Page) -> E2eResult<()> {
    let landing = journey
        .step("open the landing page", LandingPage::go_to(page.clone()))
        .await?;
    journey
        .step("show the heading", page.wait_visible(&landing.heading))
        .await
}

fn not_found(what: &str, email: &str) -> E2eError {
    E2eError::AssertionFailed(format!("{} email for {} not found", what, email))
}

async fn registration_and_login(journey: &mut Journey, page: &Page) -> E2eResult<()> {
    let user = build_user();
    let password = build_password();
    let new_email = format!("new-{}", user.email);
    let new_username = format!("new_{}", user.username);

    let login = journey
        .step("register a new user", async {
            let landing = LandingPage::go_to(page.clone()).await?;
            let registration = landing.navigate_to_registration().await?;
            registration.register_as(&user).await
        })
        .await?;

    let dashboard = journey
        .step("confirm the account", async {
            let mailbox = login.navigate_to_mailbox().await?;
            let email = mailbox
                .select_confirmation_email_for(&user)
                .await?
                .ok_or_else(|| not_found("Confirmation", &user.email))?;
            let confirmation = email.confirm_email().await?;
            confirmation.confirm_and_stay_logged_in().await
        })
        .await?;

    journey
        .step("greet the confirmed user", async {
            expect_eq(
                "confirmation alert",
                dashboard.confirmation_alert.get_message().await?,
                AlertMessage::UserConfirmed.text().to_string(),
            )?;
            expect_eq(
                "username in user menu",
                dashboard.user_menu.get_username().await?,
                user.username.clone(),
            )
        })
        .await?;

    let settings = journey
        .step("navigate to account settings", async {
            dashboard.confirmation_alert.close().await?;
            let menu = dashboard.user_menu.open().await?;
            menu.navigate_to_account_settings().await
        })
        .await?;

    journey
        .step("set a password", async {
            settings
                .change_password_form
                .change_password(&password, &password)
                .await?;
            expect_eq(
                "password alert",
                settings.password_update_alert.get_message().await?,
                AlertMessage::PasswordUpdated.text().to_string(),
            )?;
            settings.password_update_alert.close().await
        })
        .await?;

    let landing = journey
        .step("log out", async {
            let menu = settings.user_menu.open().await?;
            let landing = menu.sign_out().await?;
            expect_eq(
                "logout alert",
                landing.logout_alert.get_message().await?,
                AlertMessage::LoggedOut.text().to_string(),
            )?;
            landing.logout_alert.close().await?;
            Ok(landing)
        })
        .await?;

    let dashboard = journey
        .step("log in with password", async {
            let login = landing.navigate_to_login().await?;
            let dashboard = login
                .email_password_login_form
                .login(&user.email, &password, true)
                .await?;
            expect_eq(
                "login alert",
                dashboard.login_success_alert.get_message().await?,
                AlertMessage::LoginSuccess.text().to_string(),
            )?;
            dashboard.login_success_alert.close().await?;
            Ok(dashboard)
        })
        .await?;

    let settings = journey
        .step("navigate to account settings", async {
            let menu = dashboard.user_menu.open().await?;
            menu.navigate_to_account_settings().await
        })
        .await?;

    journey
        .step("change email", async {
            settings.change_email_form.change_email(&new_email).await?;
            expect_eq(
                "email input",
                settings.change_email_form.get_email().await?,
                new_email.clone(),
            )?;
            expect_eq(
                "email change alert",
                settings.email_change_alert.get_message().await?,
                AlertMessage::EmailChangeSent.text().to_string(),
            )?;
            settings.email_change_alert.close().await
        })
        .await?;

    journey
        .step("change username", async {
            settings
                .change_username_form
                .change_username(&new_username)
                .await?;
            expect_eq(
                "username alert",
                settings.username_update_alert.get_message().await?,
                AlertMessage::UsernameUpdated.text().to_string(),
            )?;
            settings.username_update_alert.close().await
        })
        .await?;

    let landing = journey
        .step("log out", async {
            let menu = settings.user_menu.open().await?;
            let landing = menu.sign_out().await?;
            landing.logout_alert.close().await?;
            Ok(landing)
        })
        .await?;

    // The change confirmation is addressed to the new email
    let updated_user = user.clone().with_email(&new_email).with_username(&new_username);

    let login = journey
        .step("confirm the email change", async {
            let login = landing.navigate_to_login().await?;
            let mailbox = login.navigate_to_mailbox().await?;
            let email = mailbox
                .select_email_change_confirmation_email_for(&updated_user)
                .await?
                .ok_or_else(|| not_found("Update email", &updated_user.email))?;
            let login = email.confirm_change().await?;
            expect_eq(
                "must log in alert",
                login.must_login_alert.get_message().await?,
                AlertMessage::MustLogIn.text().to_string(),
            )?;
            login.must_login_alert.close().await?;
            Ok(login)
        })
        .await?;

    let settings = journey
        .step("log in with magic link", async {
            login
                .passwordless_login_form
                .login(&updated_user.email)
                .await?;
            expect_eq(
                "magic link alert",
                login.magic_link_sent_alert.get_message().await?,
                AlertMessage::MagicLinkSent.text().to_string(),
            )?;
            login.magic_link_sent_alert.close().await?;

            let mailbox = login.navigate_to_mailbox().await?;
            let email = mailbox
                .select_magic_link_email_for(&updated_user)
                .await?
                .ok_or_else(|| not_found("Log in", &updated_user.email))?;
            let confirmation = email.log_in_with_magic_link().await?;
            confirmation.confirm_and_stay_logged_in().await?;

            // Login resumes the redirect to the page that required it
            let settings = AccountSettingsPage::new(page.clone());
            settings.assert_is_displayed().await?;
            Ok(settings)
        })
        .await?;

    journey
        .step("show the updated account", async {
            expect_eq(
                "email input",
                settings.change_email_form.get_email().await?,
                new_email.clone(),
            )?;
            expect_eq(
                "username input",
                settings.change_username_form.get_username().await?,
                new_username.clone(),
            )?;
            expect_eq(
                "email changed alert",
                settings.email_change_success_alert.get_message().await?,
                AlertMessage::EmailChanged.text().to_string(),
            )?;
            settings.email_change_success_alert.close().await?;
            expect_eq(
                "username in user menu",
                settings.user_menu.get_username().await?,
                new_username.clone(),
            )
        })
        .await
}
