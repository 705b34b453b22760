//! In-memory browser for exercising page objects without a server
//!
//! `FakeBrowser` records every action and answers reads from canned values.
//! It can also simulate the development mailbox: list links per email kind,
//! a detail pane for the selected email, and a refresh lag so the pane only
//! shows a newly clicked email after a few reads.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use fortymm_e2e::config::Timeouts;
use fortymm_e2e::driver::{Driver, LoadState, Page, WaitState};
use fortymm_e2e::pages::mailbox::{RECIPIENT_SELECTOR, SUBJECT_SELECTOR};
use fortymm_e2e::pages::EmailKind;
use fortymm_e2e::{AriaRole, E2eResult, Locator, User};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Goto(String),
    Click(Locator),
    Type(Locator, String),
    Clear(Locator),
    WaitFor(Locator, WaitState),
    WaitForUrl(String),
    WaitForFunction(String),
    WaitForLoadState(LoadState),
}

#[derive(Debug, Clone)]
pub struct FakeEmail {
    pub kind: EmailKind,
    pub recipient: String,
    pub subject: String,
}

impl FakeEmail {
    pub fn new(kind: EmailKind, recipient: &str) -> Self {
        // the detail pane renders the label and value on separate lines
        Self {
            kind,
            recipient: recipient.to_string(),
            subject: kind.subject().replacen(' ', "\n        ", 1),
        }
    }

    pub fn with_subject(mut self, subject: &str) -> Self {
        self.subject = subject.to_string();
        self
    }
}

#[derive(Debug, Default)]
struct Mailbox {
    emails: Vec<FakeEmail>,
    selected: Option<usize>,
    pending: Option<(usize, u32)>,
    lag: u32,
    frozen: bool,
}

impl Mailbox {
    /// Index in `emails` of the `nth` email of `kind`
    fn email_index(&self, kind: EmailKind, nth: usize) -> Option<usize> {
        self.emails
            .iter()
            .enumerate()
            .filter(|(_, e)| e.kind == kind)
            .nth(nth)
            .map(|(i, _)| i)
    }

    fn count(&self, kind: EmailKind) -> usize {
        self.emails.iter().filter(|e| e.kind == kind).count()
    }

    fn select(&mut self, index: usize) {
        if self.frozen {
            return;
        }
        if self.lag == 0 {
            self.selected = Some(index);
        } else {
            self.pending = Some((index, self.lag));
        }
    }

    /// One refresh tick, driven by reads of the subject
    fn tick(&mut self) {
        if let Some((index, remaining)) = self.pending {
            if remaining <= 1 {
                self.selected = Some(index);
                self.pending = None;
            } else {
                self.pending = Some((index, remaining - 1));
            }
        }
    }

    fn selected(&self) -> Option<&FakeEmail> {
        self.selected.and_then(|i| self.emails.get(i))
    }
}

#[derive(Debug, Default)]
struct State {
    actions: Vec<Action>,
    texts: HashMap<Locator, String>,
    attributes: HashMap<(Locator, String), String>,
    input_values: HashMap<Locator, String>,
    mailbox: Mailbox,
}

#[derive(Debug, Default)]
pub struct FakeBrowser {
    state: Mutex<State>,
}

pub fn list_link(kind: EmailKind) -> Locator {
    Locator::role_named(AriaRole::Link, kind.list_link_name())
}

fn list_kind(locator: &Locator) -> Option<EmailKind> {
    EmailKind::ALL
        .into_iter()
        .find(|kind| list_link(*kind).chain() == locator.chain())
}

impl FakeBrowser {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A mailbox listing `emails` in order with `selected` shown in the pane
    pub fn with_mailbox(emails: Vec<FakeEmail>, selected: Option<usize>) -> Arc<Self> {
        let browser = Self::default();
        {
            let mut state = browser.state.lock().unwrap();
            state.mailbox.emails = emails;
            state.mailbox.selected = selected;
        }
        Arc::new(browser)
    }

    /// Show a clicked email only after `reads` reads of the subject
    pub fn set_refresh_lag(&self, reads: u32) {
        self.state.lock().unwrap().mailbox.lag = reads;
    }

    /// Ignore clicks on mailbox links entirely
    pub fn freeze_mailbox(&self) {
        self.state.lock().unwrap().mailbox.frozen = true;
    }

    pub fn set_text(&self, locator: Locator, text: &str) {
        self.state.lock().unwrap().texts.insert(locator, text.to_string());
    }

    pub fn set_attribute(&self, locator: Locator, name: &str, value: &str) {
        self.state
            .lock()
            .unwrap()
            .attributes
            .insert((locator, name.to_string()), value.to_string());
    }

    pub fn set_input_value(&self, locator: Locator, value: &str) {
        self.state
            .lock()
            .unwrap()
            .input_values
            .insert(locator, value.to_string());
    }

    pub fn actions(&self) -> Vec<Action> {
        self.state.lock().unwrap().actions.clone()
    }

    pub fn clicks(&self) -> Vec<Locator> {
        self.actions()
            .into_iter()
            .filter_map(|a| match a {
                Action::Click(locator) => Some(locator),
                _ => None,
            })
            .collect()
    }

    pub fn clear_actions(&self) {
        self.state.lock().unwrap().actions.clear();
    }

    fn record(&self, action: Action) {
        self.state.lock().unwrap().actions.push(action);
    }
}

/// Timeouts short enough for tests
pub fn fast_timeouts() -> Timeouts {
    Timeouts {
        action_ms: 200,
        readiness_ms: 200,
        settle_ms: 250,
        poll_interval_ms: 5,
        navigation_ms: 200,
        typing_delay_ms: 0,
    }
}

pub fn page_for(browser: &Arc<FakeBrowser>) -> Page {
    Page::new(browser.clone(), fast_timeouts())
}

pub fn user(email: &str, username: &str) -> User {
    User {
        email: email.to_string(),
        username: username.to_string(),
    }
}

#[async_trait]
impl Driver for FakeBrowser {
    async fn goto(&self, path: &str, _timeout: Duration) -> E2eResult<()> {
        self.record(Action::Goto(path.to_string()));
        Ok(())
    }

    async fn click(&self, locator: &Locator, _timeout: Duration) -> E2eResult<()> {
        let mut state = self.state.lock().unwrap();
        state.actions.push(Action::Click(locator.clone()));

        if let (Some(kind), Some(nth)) = (list_kind(locator), locator.index()) {
            if let Some(index) = state.mailbox.email_index(kind, nth) {
                state.mailbox.select(index);
            }
        }
        Ok(())
    }

    async fn press_sequentially(
        &self,
        locator: &Locator,
        text: &str,
        _delay: Duration,
        _timeout: Duration,
    ) -> E2eResult<()> {
        let mut state = self.state.lock().unwrap();
        state
            .actions
            .push(Action::Type(locator.clone(), text.to_string()));
        state
            .input_values
            .entry(locator.clone())
            .or_default()
            .push_str(text);
        Ok(())
    }

    async fn clear(&self, locator: &Locator, _timeout: Duration) -> E2eResult<()> {
        let mut state = self.state.lock().unwrap();
        state.actions.push(Action::Clear(locator.clone()));
        state.input_values.remove(locator);
        Ok(())
    }

    async fn wait_for(&self, locator: &Locator, state: WaitState, _timeout: Duration) -> E2eResult<()> {
        self.record(Action::WaitFor(locator.clone(), state));
        Ok(())
    }

    async fn wait_for_url(&self, path: &str, _timeout: Duration) -> E2eResult<()> {
        self.record(Action::WaitForUrl(path.to_string()));
        Ok(())
    }

    async fn wait_for_function(&self, expression: &str, _timeout: Duration) -> E2eResult<()> {
        self.record(Action::WaitForFunction(expression.to_string()));
        Ok(())
    }

    async fn wait_for_load_state(&self, state: LoadState, _timeout: Duration) -> E2eResult<()> {
        self.record(Action::WaitForLoadState(state));
        Ok(())
    }

    async fn text_content(&self, locator: &Locator, _timeout: Duration) -> E2eResult<Option<String>> {
        let mut state = self.state.lock().unwrap();

        if *locator == Locator::css(SUBJECT_SELECTOR) {
            state.mailbox.tick();
            return Ok(state.mailbox.selected().map(|e| e.subject.clone()));
        }
        if *locator == Locator::css(RECIPIENT_SELECTOR) {
            return Ok(state.mailbox.selected().map(|e| e.recipient.clone()));
        }

        Ok(state.texts.get(locator).cloned())
    }

    async fn get_attribute(
        &self,
        locator: &Locator,
        name: &str,
        _timeout: Duration,
    ) -> E2eResult<Option<String>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .attributes
            .get(&(locator.clone(), name.to_string()))
            .cloned())
    }

    async fn input_value(&self, locator: &Locator, _timeout: Duration) -> E2eResult<String> {
        let state = self.state.lock().unwrap();
        Ok(state.input_values.get(locator).cloned().unwrap_or_default())
    }

    async fn count(&self, locator: &Locator) -> E2eResult<usize> {
        let state = self.state.lock().unwrap();
        Ok(match list_kind(locator) {
            Some(kind) => state.mailbox.count(kind),
            None => usize::from(state.texts.contains_key(locator)),
        })
    }
}
