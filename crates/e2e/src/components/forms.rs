//! Account and login forms
//!
//! Every text entry clears the input and types key by key; LiveView forms
//! validate on each keystroke and a bulk fill can race the server.

use crate::driver::Page;
use crate::error::E2eResult;
use crate::liveview::wait_for_liveview_connected;
use crate::locator::{AriaRole, Locator};
use crate::pages::DashboardPage;

pub struct ChangeEmailForm {
    page: Page,
    email_input: Locator,
    change_email_button: Locator,
}

impl ChangeEmailForm {
    pub fn new(page: Page) -> Self {
        Self {
            page,
            email_input: Locator::role_named(AriaRole::Textbox, "Email"),
            change_email_button: Locator::role_named(AriaRole::Button, "Change Email"),
        }
    }

    pub async fn get_email(&self) -> E2eResult<String> {
        self.page.input_value(&self.email_input).await
    }

    pub async fn change_email(&self, new_email: &str) -> E2eResult<()> {
        self.page.fill_sequentially(&self.email_input, new_email).await?;
        self.page.click(&self.change_email_button).await
    }

    pub async fn assert_is_displayed(&self) -> E2eResult<()> {
        self.page.wait_visible(&self.email_input).await
    }
}

pub struct ChangeUsernameForm {
    page: Page,
    username_input: Locator,
    change_username_button: Locator,
}

impl ChangeUsernameForm {
    pub fn new(page: Page) -> Self {
        Self {
            page,
            username_input: Locator::role_named(AriaRole::Textbox, "Username"),
            change_username_button: Locator::role_named(AriaRole::Button, "Change Username"),
        }
    }

    pub async fn get_username(&self) -> E2eResult<String> {
        self.page.input_value(&self.username_input).await
    }

    pub async fn change_username(&self, new_username: &str) -> E2eResult<()> {
        self.page
            .fill_sequentially(&self.username_input, new_username)
            .await?;
        self.page.click(&self.change_username_button).await
    }

    pub async fn assert_is_displayed(&self) -> E2eResult<()> {
        self.page.wait_visible(&self.username_input).await
    }
}

pub struct ChangePasswordForm {
    page: Page,
    new_password_input: Locator,
    confirm_password_input: Locator,
    save_password_button: Locator,
}

impl ChangePasswordForm {
    pub fn new(page: Page) -> Self {
        Self {
            page,
            new_password_input: Locator::css("#user_password"),
            confirm_password_input: Locator::css("#user_password_confirmation"),
            save_password_button: Locator::role_named(AriaRole::Button, "Save Password"),
        }
    }

    pub async fn change_password(&self, new_password: &str, confirm_password: &str) -> E2eResult<()> {
        self.page
            .fill_sequentially(&self.new_password_input, new_password)
            .await?;
        self.page
            .fill_sequentially(&self.confirm_password_input, confirm_password)
            .await?;
        self.page.click(&self.save_password_button).await
    }

    pub async fn assert_is_displayed(&self) -> E2eResult<()> {
        self.page.wait_visible(&self.new_password_input).await
    }
}

/// Magic-link login form
pub struct PasswordlessLoginForm {
    page: Page,
    email_input: Locator,
    login_button: Locator,
}

impl PasswordlessLoginForm {
    pub fn new(page: Page) -> Self {
        let form = Locator::css("#login_form_magic");
        Self {
            page,
            email_input: form.within(Locator::role_named(AriaRole::Textbox, "Email")),
            login_button: form.within(Locator::role_named(AriaRole::Button, "Log in with email")),
        }
    }

    /// Request a magic link for `email`
    pub async fn login(&self, email: &str) -> E2eResult<()> {
        self.page.fill_sequentially(&self.email_input, email).await?;
        self.page.click(&self.login_button).await
    }

    pub async fn assert_is_displayed(&self) -> E2eResult<()> {
        self.page.wait_visible(&self.login_button).await
    }
}

pub struct EmailPasswordLoginForm {
    page: Page,
    email_input: Locator,
    password_input: Locator,
    login_and_stay_logged_in_button: Locator,
    login_only_this_time_button: Locator,
}

impl EmailPasswordLoginForm {
    pub fn new(page: Page) -> Self {
        let form = Locator::css("#login_form_password");
        Self {
            page,
            email_input: form.within(Locator::role_named(AriaRole::Textbox, "Email")),
            password_input: form.within(Locator::role_named(AriaRole::Textbox, "Password")),
            login_and_stay_logged_in_button: form
                .within(Locator::role_named(AriaRole::Button, "Log in and stay logged in")),
            login_only_this_time_button: form
                .within(Locator::role_named(AriaRole::Button, "Log in only this time")),
        }
    }

    pub async fn login(&self, email: &str, password: &str, stay_logged_in: bool) -> E2eResult<DashboardPage> {
        self.page.fill_sequentially(&self.email_input, email).await?;
        self.page
            .fill_sequentially(&self.password_input, password)
            .await?;

        if stay_logged_in {
            self.page.click(&self.login_and_stay_logged_in_button).await?;
        } else {
            self.page.click(&self.login_only_this_time_button).await?;
        }

        let dashboard = DashboardPage::new(self.page.clone());
        dashboard.assert_is_displayed().await?;
        Ok(dashboard)
    }

    pub async fn assert_is_displayed(&self) -> E2eResult<()> {
        self.page
            .wait_visible(&self.login_and_stay_logged_in_button)
            .await?;
        wait_for_liveview_connected(&self.page).await
    }
}
