use crate::components::{Alert, AlertMessage};
use crate::driver::Page;
use crate::error::E2eResult;
use crate::locator::{AriaRole, Locator};
use crate::pages::{LoginPage, RegistrationPage};

pub const HEADLINE: &str = "Peace of mind from prototype to production.";

/// Public home page at `/`
pub struct LandingPage {
    page: Page,
    pub heading: Locator,
    pub logout_alert: Alert,
    register_link: Locator,
    log_in_link: Locator,
}

impl LandingPage {
    pub fn new(page: Page) -> Self {
        Self {
            logout_alert: Alert::new(page.clone(), AlertMessage::LoggedOut),
            heading: Locator::text(HEADLINE),
            register_link: Locator::role_named(AriaRole::Link, "Register"),
            log_in_link: Locator::role_named(AriaRole::Link, "Log in"),
            page,
        }
    }

    pub async fn go_to(page: Page) -> E2eResult<Self> {
        page.goto("/").await?;
        let landing = Self::new(page);
        landing.assert_is_displayed().await?;
        Ok(landing)
    }

    pub async fn assert_is_displayed(&self) -> E2eResult<()> {
        self.page.wait_visible(&self.heading).await
    }

    pub async fn navigate_to_registration(&self) -> E2eResult<RegistrationPage> {
        self.page.click(&self.register_link).await?;
        let registration = RegistrationPage::new(self.page.clone());
        registration.assert_is_displayed().await?;
        Ok(registration)
    }

    pub async fn navigate_to_login(&self) -> E2eResult<LoginPage> {
        self.page.click(&self.log_in_link).await?;
        let login = LoginPage::new(self.page.clone());
        login.assert_is_displayed().await?;
        Ok(login)
    }
}
