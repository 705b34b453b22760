//! Screens reached by following an emailed link

use crate::driver::Page;
use crate::error::E2eResult;
use crate::liveview::wait_for_liveview_connected;
use crate::locator::{AriaRole, Locator};
use crate::pages::DashboardPage;

/// Landing page of the account confirmation link
pub struct AccountConfirmationPage {
    page: Page,
    confirm_and_stay_logged_in_button: Locator,
    confirm_and_log_in_only_this_time_button: Locator,
}

impl AccountConfirmationPage {
    pub fn new(page: Page) -> Self {
        Self {
            page,
            confirm_and_stay_logged_in_button: Locator::role_named(
                AriaRole::Button,
                "Confirm and stay logged in",
            ),
            confirm_and_log_in_only_this_time_button: Locator::role_named(
                AriaRole::Button,
                "Confirm and log in only this time",
            ),
        }
    }

    pub async fn assert_is_displayed(&self) -> E2eResult<()> {
        self.page
            .wait_visible(&self.confirm_and_stay_logged_in_button)
            .await?;
        wait_for_liveview_connected(&self.page).await
    }

    pub async fn confirm_and_stay_logged_in(&self) -> E2eResult<DashboardPage> {
        self.confirm_with(&self.confirm_and_stay_logged_in_button).await
    }

    pub async fn confirm_and_log_in_only_this_time(&self) -> E2eResult<DashboardPage> {
        self.confirm_with(&self.confirm_and_log_in_only_this_time_button)
            .await
    }

    async fn confirm_with(&self, button: &Locator) -> E2eResult<DashboardPage> {
        self.page.click(button).await?;
        let dashboard = DashboardPage::new(self.page.clone());
        dashboard.assert_is_displayed().await?;
        Ok(dashboard)
    }
}

/// Landing page of the magic login link
pub struct EmailLoginConfirmationPage {
    page: Page,
    heading: Locator,
    keep_me_logged_in_button: Locator,
    log_me_in_only_this_time_button: Locator,
}

impl EmailLoginConfirmationPage {
    pub fn new(page: Page) -> Self {
        Self {
            page,
            heading: Locator::heading_level(1),
            keep_me_logged_in_button: Locator::role_named(
                AriaRole::Button,
                "Keep me logged in on this device",
            ),
            log_me_in_only_this_time_button: Locator::role_named(
                AriaRole::Button,
                "Log me in only this time",
            ),
        }
    }

    pub async fn assert_is_displayed(&self) -> E2eResult<()> {
        self.page.wait_visible(&self.keep_me_logged_in_button).await?;
        wait_for_liveview_connected(&self.page).await
    }

    pub async fn welcome_message(&self) -> E2eResult<String> {
        Ok(self.page.text_content(&self.heading).await?.unwrap_or_default())
    }

    /// Where this lands depends on the pending redirect, so no page is returned
    pub async fn confirm_and_stay_logged_in(&self) -> E2eResult<()> {
        self.page.click(&self.keep_me_logged_in_button).await
    }

    pub async fn confirm_only_this_time(&self) -> E2eResult<DashboardPage> {
        self.page
            .click(&self.log_me_in_only_this_time_button)
            .await?;
        let dashboard = DashboardPage::new(self.page.clone());
        dashboard.assert_is_displayed().await?;
        Ok(dashboard)
    }
}
