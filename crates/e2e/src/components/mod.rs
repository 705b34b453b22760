//! Reusable page fragments

pub mod alert;
pub mod forms;
pub mod navigation;
pub mod user_menu;

pub use alert::{Alert, AlertMessage};
pub use forms::{
    ChangeEmailForm, ChangePasswordForm, ChangeUsernameForm, EmailPasswordLoginForm,
    PasswordlessLoginForm,
};
pub use navigation::{ChallengeWellComponent, NavigationComponent};
pub use user_menu::{OpenUserMenu, UserMenuComponent};
