//! Page objects, one per screen
//!
//! Every transition asserts that the destination is displayed before handing
//! it back, so a journey fails at the step that went wrong.

pub mod account_settings;
pub mod confirmation;
pub mod dashboard;
pub mod landing;
pub mod login;
pub mod mailbox;
pub mod registration;

pub use account_settings::AccountSettingsPage;
pub use confirmation::{AccountConfirmationPage, EmailLoginConfirmationPage};
pub use dashboard::DashboardPage;
pub use landing::LandingPage;
pub use login::LoginPage;
pub use mailbox::{
    ConfirmationEmail, EmailHandle, EmailKind, LogInEmail, MailboxPage, SelectedEmail,
    UpdateEmailInstructions,
};
pub use registration::RegistrationPage;
