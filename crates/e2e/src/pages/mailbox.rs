//! Development mailbox
//!
//! The mailbox shows a list of sent emails and a detail pane for the one
//! currently selected. There is no way to read an email without selecting
//! it, so finding "the confirmation email for alice" means clicking through
//! the confirmation links until the detail pane shows alice as recipient.
//!
//! Clicking a link does not update the detail pane synchronously. After each
//! click the resolver polls until the pane shows a different email than
//! before the click, and only then trusts what it reads.

use std::fmt;

use tracing::{debug, info};

use crate::driver::Page;
use crate::error::{E2eError, E2eResult};
use crate::factories::User;
use crate::locator::{AriaRole, Locator};
use crate::pages::{AccountConfirmationPage, EmailLoginConfirmationPage, LoginPage};
use crate::wait::{wait_until, RetryPolicy};

pub const SUBJECT_SELECTOR: &str = "#email-details__subject";
pub const RECIPIENT_SELECTOR: &str = "#email-details__to";

const LOG_IN_URL: &str = "http://localhost:4000/users/log-in/";
const CONFIRM_EMAIL_URL: &str = "http://localhost:4000/users/settings/confirm-email/";

/// The three kinds of email the application sends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmailKind {
    Confirmation,
    LogIn,
    UpdateEmail,
}

impl EmailKind {
    pub const ALL: [EmailKind; 3] = [
        EmailKind::Confirmation,
        EmailKind::LogIn,
        EmailKind::UpdateEmail,
    ];

    /// Detail pane subject, whitespace-normalized
    pub fn subject(&self) -> &'static str {
        match self {
            EmailKind::Confirmation => "Subject Confirmation instructions",
            EmailKind::LogIn => "Subject Log in instructions",
            EmailKind::UpdateEmail => "Subject Update email instructions",
        }
    }

    /// Accessible name of this kind's entries in the mailbox list
    pub fn list_link_name(&self) -> &'static str {
        match self {
            EmailKind::Confirmation => "Fortymm Confirmation",
            EmailKind::LogIn => "Fortymm Log in instructions",
            EmailKind::UpdateEmail => "Fortymm Update email instructions",
        }
    }

    /// Accessible name of the link inside the email body
    pub fn action_link_name(&self) -> &'static str {
        match self {
            EmailKind::Confirmation | EmailKind::LogIn => LOG_IN_URL,
            EmailKind::UpdateEmail => CONFIRM_EMAIL_URL,
        }
    }

    /// Classify a raw subject as read from the detail pane.
    ///
    /// Whitespace runs collapse to one space before matching. A subject that
    /// matches no kind is an error, never a silent miss.
    pub fn classify(raw_subject: &str) -> E2eResult<Self> {
        let normalized = raw_subject.split_whitespace().collect::<Vec<_>>().join(" ");

        EmailKind::ALL
            .into_iter()
            .find(|kind| kind.subject() == normalized)
            .ok_or(E2eError::UnknownEmailSubject(normalized))
    }
}

impl fmt::Display for EmailKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EmailKind::Confirmation => "confirmation",
            EmailKind::LogIn => "log in",
            EmailKind::UpdateEmail => "update email",
        };
        f.write_str(name)
    }
}

/// Snapshot of the detail pane
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedEmail {
    pub kind: EmailKind,
    pub recipient: String,
}

impl SelectedEmail {
    /// The bare address, without a display name
    pub fn recipient_address(&self) -> &str {
        match (self.recipient.rfind('<'), self.recipient.rfind('>')) {
            (Some(open), Some(close)) if open < close => self.recipient[open + 1..close].trim(),
            _ => self.recipient.trim(),
        }
    }

    pub fn was_sent_to(&self, user: &User) -> bool {
        self.recipient_address().eq_ignore_ascii_case(user.email.trim())
    }

    pub fn matches(&self, kind: EmailKind, user: &User) -> bool {
        self.kind == kind && self.was_sent_to(user)
    }

    /// Whether the pane now shows a different email than `previous`
    pub fn differs_from(&self, previous: &SelectedEmail) -> bool {
        self.kind != previous.kind || self.recipient != previous.recipient
    }
}

/// A typed view of a selected email of one kind
pub trait EmailHandle: Sized {
    const KIND: EmailKind;

    fn from_selected(page: Page, email: SelectedEmail) -> Self;

    fn email(&self) -> &SelectedEmail;

    fn kind(&self) -> EmailKind {
        self.email().kind
    }

    fn recipient(&self) -> &str {
        &self.email().recipient
    }
}

/// Account confirmation email
pub struct ConfirmationEmail {
    page: Page,
    email: SelectedEmail,
}

impl EmailHandle for ConfirmationEmail {
    const KIND: EmailKind = EmailKind::Confirmation;

    fn from_selected(page: Page, email: SelectedEmail) -> Self {
        Self { page, email }
    }

    fn email(&self) -> &SelectedEmail {
        &self.email
    }
}

impl ConfirmationEmail {
    pub async fn confirm_email(&self) -> E2eResult<AccountConfirmationPage> {
        follow_action_link(&self.page, Self::KIND).await?;
        let confirmation = AccountConfirmationPage::new(self.page.clone());
        confirmation.assert_is_displayed().await?;
        Ok(confirmation)
    }
}

/// Magic-link login email
pub struct LogInEmail {
    page: Page,
    email: SelectedEmail,
}

impl EmailHandle for LogInEmail {
    const KIND: EmailKind = EmailKind::LogIn;

    fn from_selected(page: Page, email: SelectedEmail) -> Self {
        Self { page, email }
    }

    fn email(&self) -> &SelectedEmail {
        &self.email
    }
}

impl LogInEmail {
    pub async fn log_in_with_magic_link(&self) -> E2eResult<EmailLoginConfirmationPage> {
        follow_action_link(&self.page, Self::KIND).await?;
        let confirmation = EmailLoginConfirmationPage::new(self.page.clone());
        confirmation.assert_is_displayed().await?;
        Ok(confirmation)
    }
}

/// Email-change confirmation email
pub struct UpdateEmailInstructions {
    page: Page,
    email: SelectedEmail,
}

impl EmailHandle for UpdateEmailInstructions {
    const KIND: EmailKind = EmailKind::UpdateEmail;

    fn from_selected(page: Page, email: SelectedEmail) -> Self {
        Self { page, email }
    }

    fn email(&self) -> &SelectedEmail {
        &self.email
    }
}

impl UpdateEmailInstructions {
    /// Confirming logs nobody in, so this lands on the login page
    pub async fn confirm_change(&self) -> E2eResult<LoginPage> {
        follow_action_link(&self.page, Self::KIND).await?;
        let login = LoginPage::new(self.page.clone());
        login.assert_is_displayed().await?;
        Ok(login)
    }
}

async fn follow_action_link(page: &Page, kind: EmailKind) -> E2eResult<()> {
    page.click(&Locator::role_named(AriaRole::Link, kind.action_link_name()))
        .await
}

pub struct MailboxPage {
    page: Page,
    heading: Locator,
    subject: Locator,
    sent_to: Locator,
}

impl MailboxPage {
    pub fn new(page: Page) -> Self {
        Self {
            page,
            heading: Locator::role_named(AriaRole::Heading, "Mailbox"),
            subject: Locator::css(SUBJECT_SELECTOR),
            sent_to: Locator::css(RECIPIENT_SELECTOR),
        }
    }

    pub async fn assert_is_displayed(&self) -> E2eResult<()> {
        self.page.wait_visible(&self.heading).await
    }

    /// Read and classify the email shown in the detail pane
    pub async fn currently_selected_email(&self) -> E2eResult<SelectedEmail> {
        let subject = self
            .page
            .text_content(&self.subject)
            .await?
            .filter(|s| !s.trim().is_empty())
            .ok_or(E2eError::NoEmailSelected)?;
        let kind = EmailKind::classify(&subject)?;

        let recipient = self
            .page
            .text_content(&self.sent_to)
            .await?
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(E2eError::MissingRecipient)?;

        Ok(SelectedEmail { kind, recipient })
    }

    pub async fn select_confirmation_email_for(&self, user: &User) -> E2eResult<Option<ConfirmationEmail>> {
        self.select_email_for(user).await
    }

    pub async fn select_magic_link_email_for(&self, user: &User) -> E2eResult<Option<LogInEmail>> {
        self.select_email_for(user).await
    }

    pub async fn select_email_change_confirmation_email_for(
        &self,
        user: &User,
    ) -> E2eResult<Option<UpdateEmailInstructions>> {
        self.select_email_for(user).await
    }

    /// Select the first email of kind `E::KIND` addressed to `user`.
    ///
    /// Returns without clicking when the pane already shows a match.
    /// Otherwise tries the kind's list entries in document order; `None`
    /// once they are exhausted.
    pub async fn select_email_for<E: EmailHandle>(&self, user: &User) -> E2eResult<Option<E>> {
        let kind = E::KIND;
        let found = self.find_email_for(kind, user).await?;

        match &found {
            Some(email) => info!("Found {} email for {}", kind, email.recipient),
            None => info!("No {} email for {}", kind, user.email),
        }

        Ok(found.map(|email| E::from_selected(self.page.clone(), email)))
    }

    async fn find_email_for(&self, kind: EmailKind, user: &User) -> E2eResult<Option<SelectedEmail>> {
        let mut previous = self.currently_selected_email().await?;
        if previous.matches(kind, user) {
            debug!("Already showing the {} email for {}", kind, user.email);
            return Ok(Some(previous));
        }

        let list_links = Locator::role_named(AriaRole::Link, kind.list_link_name());
        let links = self.page.all(&list_links).await?;
        debug!("Checking {} {} email(s)", links.len(), kind);

        // The baseline is one of these entries when it has the same kind.
        // Clicking it cannot change the pane, so one settle timeout is
        // allowed before the pane has moved; a second one is fatal.
        let mut baseline_unvisited = previous.kind == kind;

        for link in &links {
            let selected = match self.select_email_link(link, &previous).await {
                Ok(selected) => selected,
                Err(E2eError::Timeout(what)) if baseline_unvisited => {
                    debug!("{} kept showing {} ({}), taking it as the baseline", link, previous.recipient, what);
                    baseline_unvisited = false;
                    continue;
                }
                Err(e) => return Err(e),
            };
            baseline_unvisited = false;

            if selected.matches(kind, user) {
                return Ok(Some(selected));
            }
            previous = selected;
        }

        Ok(None)
    }

    /// Click `link` and return the email it selects, once the pane has moved
    /// off `previous`
    async fn select_email_link(&self, link: &Locator, previous: &SelectedEmail) -> E2eResult<SelectedEmail> {
        self.page.click(link).await?;

        let timeouts = self.page.timeouts();
        let policy = RetryPolicy::new(timeouts.settle(), timeouts.poll_interval());
        wait_until("selected email to change", policy, || async {
            Ok(self.currently_selected_email().await?.differs_from(previous))
        })
        .await?;

        self.currently_selected_email().await
    }
}
