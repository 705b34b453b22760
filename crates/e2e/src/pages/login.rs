use crate::components::{Alert, AlertMessage, EmailPasswordLoginForm, PasswordlessLoginForm};
use crate::driver::Page;
use crate::error::E2eResult;
use crate::liveview::wait_for_liveview_connected;
use crate::locator::{AriaRole, Locator};
use crate::pages::MailboxPage;

pub struct LoginPage {
    page: Page,
    pub passwordless_login_form: PasswordlessLoginForm,
    pub email_password_login_form: EmailPasswordLoginForm,
    pub must_login_alert: Alert,
    pub magic_link_sent_alert: Alert,
    log_in_with_email_button: Locator,
    mailbox_link: Locator,
}

impl LoginPage {
    pub fn new(page: Page) -> Self {
        Self {
            passwordless_login_form: PasswordlessLoginForm::new(page.clone()),
            email_password_login_form: EmailPasswordLoginForm::new(page.clone()),
            must_login_alert: Alert::new(page.clone(), AlertMessage::MustLogIn),
            magic_link_sent_alert: Alert::new(page.clone(), AlertMessage::MagicLinkSent),
            log_in_with_email_button: Locator::role_named(AriaRole::Button, "Log in with email"),
            mailbox_link: Locator::role_named(AriaRole::Link, "the mailbox page"),
            page,
        }
    }

    pub async fn assert_is_displayed(&self) -> E2eResult<()> {
        self.page.wait_visible(&self.log_in_with_email_button).await?;
        wait_for_liveview_connected(&self.page).await
    }

    /// Follow the dev-mode hint to the local mailbox
    pub async fn navigate_to_mailbox(&self) -> E2eResult<MailboxPage> {
        self.page.click(&self.mailbox_link).await?;
        let mailbox = MailboxPage::new(self.page.clone());
        mailbox.assert_is_displayed().await?;
        Ok(mailbox)
    }
}
