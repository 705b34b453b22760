use crate::components::{Alert, AlertMessage, ChallengeWellComponent, NavigationComponent, UserMenuComponent};
use crate::driver::Page;
use crate::error::E2eResult;

pub struct DashboardPage {
    pub navigation: NavigationComponent,
    pub user_menu: UserMenuComponent,
    pub challenge_well: ChallengeWellComponent,
    pub confirmation_alert: Alert,
    pub login_success_alert: Alert,
}

impl DashboardPage {
    pub fn new(page: Page) -> Self {
        Self {
            navigation: NavigationComponent::new(page.clone()),
            user_menu: UserMenuComponent::new(page.clone()),
            challenge_well: ChallengeWellComponent::new(page.clone()),
            confirmation_alert: Alert::new(page.clone(), AlertMessage::UserConfirmed),
            login_success_alert: Alert::new(page, AlertMessage::LoginSuccess),
        }
    }

    pub async fn go_to(page: Page) -> E2eResult<Self> {
        page.goto("/dashboard").await?;
        let dashboard = Self::new(page);
        dashboard.assert_is_displayed().await?;
        Ok(dashboard)
    }

    pub async fn assert_is_displayed(&self) -> E2eResult<()> {
        self.challenge_well.assert_is_displayed().await
    }
}
