use crate::components::{
    Alert, AlertMessage, ChangeEmailForm, ChangePasswordForm, ChangeUsernameForm,
    NavigationComponent, UserMenuComponent,
};
use crate::driver::Page;
use crate::error::E2eResult;
use crate::liveview::wait_for_liveview_connected;

/// `/users/settings`
pub struct AccountSettingsPage {
    page: Page,
    pub navigation: NavigationComponent,
    pub user_menu: UserMenuComponent,
    pub change_email_form: ChangeEmailForm,
    pub change_username_form: ChangeUsernameForm,
    pub change_password_form: ChangePasswordForm,
    pub password_update_alert: Alert,
    pub email_change_alert: Alert,
    pub email_change_success_alert: Alert,
    pub username_update_alert: Alert,
}

impl AccountSettingsPage {
    pub fn new(page: Page) -> Self {
        Self {
            navigation: NavigationComponent::new(page.clone()),
            user_menu: UserMenuComponent::new(page.clone()),
            change_email_form: ChangeEmailForm::new(page.clone()),
            change_username_form: ChangeUsernameForm::new(page.clone()),
            change_password_form: ChangePasswordForm::new(page.clone()),
            password_update_alert: Alert::new(page.clone(), AlertMessage::PasswordUpdated),
            email_change_alert: Alert::new(page.clone(), AlertMessage::EmailChangeSent),
            email_change_success_alert: Alert::new(page.clone(), AlertMessage::EmailChanged),
            username_update_alert: Alert::new(page.clone(), AlertMessage::UsernameUpdated),
            page,
        }
    }

    pub async fn go_to(page: Page) -> E2eResult<Self> {
        page.goto("/users/settings").await?;
        let settings = Self::new(page);
        settings.assert_is_displayed().await?;
        Ok(settings)
    }

    pub async fn assert_is_displayed(&self) -> E2eResult<()> {
        self.change_email_form.assert_is_displayed().await?;
        wait_for_liveview_connected(&self.page).await
    }
}
