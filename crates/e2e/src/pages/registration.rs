use crate::driver::Page;
use crate::error::E2eResult;
use crate::factories::User;
use crate::locator::{AriaRole, Locator};
use crate::pages::LoginPage;

pub struct RegistrationPage {
    page: Page,
    pub heading: Locator,
    email_input: Locator,
    username_input: Locator,
    register_button: Locator,
}

impl RegistrationPage {
    pub fn new(page: Page) -> Self {
        Self {
            page,
            heading: Locator::role_named(AriaRole::Heading, "Register for an account"),
            email_input: Locator::label("Email"),
            username_input: Locator::label("Username"),
            register_button: Locator::role_named(AriaRole::Button, "Create an account"),
        }
    }

    pub async fn assert_is_displayed(&self) -> E2eResult<()> {
        self.page.wait_visible(&self.heading).await
    }

    /// Submit the form; registration lands on the login page
    pub async fn register_as(&self, user: &User) -> E2eResult<LoginPage> {
        self.page.type_sequentially(&self.email_input, &user.email).await?;
        self.page
            .type_sequentially(&self.username_input, &user.username)
            .await?;
        self.page.click(&self.register_button).await?;

        let login = LoginPage::new(self.page.clone());
        login.assert_is_displayed().await?;
        Ok(login)
    }
}
