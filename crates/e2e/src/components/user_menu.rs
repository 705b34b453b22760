use crate::driver::Page;
use crate::error::{E2eError, E2eResult};
use crate::locator::{AriaRole, Locator};
use crate::pages::{AccountSettingsPage, LandingPage};

/// Avatar button in the header
pub struct UserMenuComponent {
    page: Page,
    user_menu_button: Locator,
}

impl UserMenuComponent {
    pub fn new(page: Page) -> Self {
        Self {
            page,
            user_menu_button: Locator::role_named(AriaRole::Button, "User menu"),
        }
    }

    /// Username shown as the avatar's alt text
    pub async fn get_username(&self) -> E2eResult<String> {
        let avatar = self.user_menu_button.within(Locator::role(AriaRole::Img));
        match self.page.get_attribute(&avatar, "alt").await? {
            Some(username) if !username.is_empty() => Ok(username),
            _ => Err(E2eError::ElementMissing(
                "username in user menu avatar".to_string(),
            )),
        }
    }

    pub async fn assert_is_displayed(&self) -> E2eResult<()> {
        self.page.wait_visible(&self.user_menu_button).await
    }

    pub async fn open(&self) -> E2eResult<OpenUserMenu> {
        self.page.click(&self.user_menu_button).await?;
        let menu = OpenUserMenu::new(self.page.clone());
        menu.assert_is_displayed().await?;
        Ok(menu)
    }
}

/// The dropdown shown after clicking the avatar
pub struct OpenUserMenu {
    page: Page,
    account_settings_link: Locator,
    appearance_link: Locator,
    sign_out_link: Locator,
}

impl OpenUserMenu {
    fn new(page: Page) -> Self {
        let dropdown = Locator::css("#user-menu");
        Self {
            page,
            account_settings_link: dropdown.within(Locator::role_named(AriaRole::Link, "Account Settings")),
            appearance_link: dropdown.within(Locator::role_named(AriaRole::Link, "Appearance")),
            sign_out_link: dropdown.within(Locator::role_named(AriaRole::Link, "Sign Out")),
        }
    }

    pub async fn assert_is_displayed(&self) -> E2eResult<()> {
        self.page.wait_visible(&self.account_settings_link).await
    }

    pub async fn navigate_to_account_settings(&self) -> E2eResult<AccountSettingsPage> {
        self.page.click(&self.account_settings_link).await?;
        let settings = AccountSettingsPage::new(self.page.clone());
        settings.assert_is_displayed().await?;
        Ok(settings)
    }

    pub async fn navigate_to_appearance(&self) -> E2eResult<()> {
        self.page.click(&self.appearance_link).await
    }

    pub async fn sign_out(&self) -> E2eResult<LandingPage> {
        self.page.click(&self.sign_out_link).await?;
        let landing = LandingPage::new(self.page.clone());
        landing.assert_is_displayed().await?;
        Ok(landing)
    }
}
