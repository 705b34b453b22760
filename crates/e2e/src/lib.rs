//! Fortymm E2E Test Framework
//!
//! This crate drives the Fortymm web application through a real browser:
//! - Spawns (or attaches to) the Phoenix server and health-checks it
//! - Controls Playwright through a long-lived Node bridge speaking JSON lines
//! - Models every screen as a page object that asserts it is displayed
//! - Resolves emails in the development mailbox by recipient and kind
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Journey (tests/journey.rs)                  │
//! │    step("register a new user", ...)                         │
//! │    step("confirm the account", ...)  ...                    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Page objects                                               │
//! │    LandingPage -> RegistrationPage -> LoginPage             │
//! │    LoginPage -> MailboxPage -> ConfirmationEmail            │
//! │      -> AccountConfirmationPage -> DashboardPage ...        │
//! │  Components: Alert, forms, UserMenu, Navigation             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Page { Arc<dyn Driver>, Timeouts }                         │
//! │    wait::poll_until / wait_until   liveview readiness       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  PlaywrightDriver ── stdin/stdout JSON ── node bridge.js    │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod components;
pub mod config;
pub mod driver;
pub mod error;
pub mod factories;
pub mod journey;
pub mod liveview;
pub mod locator;
pub mod pages;
pub mod playwright;
pub mod server;
pub mod wait;

pub use config::{HarnessConfig, Timeouts};
pub use driver::{Driver, Page};
pub use error::{E2eError, E2eResult};
pub use factories::{build_password, build_user, User};
pub use journey::{Journey, JourneyResult};
pub use locator::{AriaRole, Locator};
pub use playwright::PlaywrightDriver;
