//! Flash alerts

use crate::driver::Page;
use crate::error::{E2eError, E2eResult};
use crate::locator::{AriaRole, Locator};

/// Flash messages the journeys assert on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertMessage {
    UserConfirmed,
    LoginSuccess,
    LoggedOut,
    MustLogIn,
    MagicLinkSent,
    PasswordUpdated,
    EmailChangeSent,
    EmailChanged,
    UsernameUpdated,
}

impl AlertMessage {
    pub fn text(&self) -> &'static str {
        match self {
            AlertMessage::UserConfirmed => "User confirmed successfully.",
            AlertMessage::LoginSuccess => "Welcome back!",
            AlertMessage::LoggedOut => "Logged out successfully.",
            AlertMessage::MustLogIn => "You must log in to access this page.",
            AlertMessage::MagicLinkSent => {
                "If your email is in our system, you will receive instructions for logging in shortly."
            }
            AlertMessage::PasswordUpdated => "Password updated successfully!",
            AlertMessage::EmailChangeSent => {
                "A link to confirm your email change has been sent to the new address."
            }
            AlertMessage::EmailChanged => "Email changed successfully.",
            AlertMessage::UsernameUpdated => "Username updated successfully.",
        }
    }
}

/// A flash alert expected to carry one particular message
pub struct Alert {
    page: Page,
    expected: AlertMessage,
    alert: Locator,
    message: Locator,
    close_button: Locator,
}

impl Alert {
    pub fn new(page: Page, expected: AlertMessage) -> Self {
        let alert = Locator::role(AriaRole::Alert);
        let message = alert.within(Locator::text(expected.text()));
        let close_button = alert.within(Locator::role_named(AriaRole::Button, "close"));

        Self {
            page,
            expected,
            alert,
            message,
            close_button,
        }
    }

    pub fn expected(&self) -> AlertMessage {
        self.expected
    }

    pub async fn assert_is_displayed(&self) -> E2eResult<()> {
        self.page.wait_visible(&self.alert).await
    }

    pub async fn get_message(&self) -> E2eResult<String> {
        self.page
            .text_content(&self.message)
            .await?
            .ok_or_else(|| {
                E2eError::ElementMissing(format!("alert message '{}'", self.expected.text()))
            })
    }

    /// Dismiss the alert and wait for it to go away
    pub async fn close(&self) -> E2eResult<()> {
        self.page.click(&self.close_button).await?;
        self.page.wait_hidden(&self.alert).await
    }

    pub async fn assert_is_hidden(&self) -> E2eResult<()> {
        self.page.wait_hidden(&self.alert).await
    }
}
