use crate::driver::Page;
use crate::error::E2eResult;
use crate::locator::{AriaRole, Locator};

/// Top navigation bar
pub struct NavigationComponent {
    page: Page,
    dashboard_link: Locator,
    matches_link: Locator,
}

impl NavigationComponent {
    pub fn new(page: Page) -> Self {
        Self {
            page,
            dashboard_link: Locator::role_named(AriaRole::Link, "Dashboard"),
            matches_link: Locator::role_named(AriaRole::Link, "Matches"),
        }
    }

    pub async fn navigate_to_dashboard(&self) -> E2eResult<()> {
        self.page.click(&self.dashboard_link).await?;
        self.page.wait_for_url("/dashboard").await
    }

    pub async fn navigate_to_matches(&self) -> E2eResult<()> {
        self.page.click(&self.matches_link).await?;
        self.page.wait_for_url("/matches").await
    }
}

/// Call-to-action well on the dashboard
pub struct ChallengeWellComponent {
    page: Page,
    challenge_button: Locator,
}

impl ChallengeWellComponent {
    pub fn new(page: Page) -> Self {
        Self {
            page,
            challenge_button: Locator::role_named(AriaRole::Button, "Challenge a Friend"),
        }
    }

    pub async fn assert_is_displayed(&self) -> E2eResult<()> {
        self.page.wait_visible(&self.challenge_button).await
    }

    pub async fn create_challenge(&self) -> E2eResult<()> {
        self.page.click(&self.challenge_button).await
    }
}
