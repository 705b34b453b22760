//! Phoenix LiveView readiness
//!
//! LiveView adds `.phx-connected` to the main container once its socket is
//! up. Interacting before that loses events, so page objects wait on it in
//! `assert_is_displayed`.

use std::time::Duration;

use crate::driver::{LoadState, Page, WaitState};
use crate::error::E2eResult;
use crate::locator::Locator;

pub const CONNECTED_SELECTOR: &str = "[data-phx-main].phx-connected";
pub const LIVE_SOCKET_CONNECTED: &str = "window.liveSocket && window.liveSocket.isConnected()";

/// Wait for the main LiveView container to report a connected socket
pub async fn wait_for_liveview_connected(page: &Page) -> E2eResult<()> {
    wait_for_liveview_connected_within(page, page.timeouts().readiness()).await
}

pub async fn wait_for_liveview_connected_within(page: &Page, timeout: Duration) -> E2eResult<()> {
    page.driver()
        .wait_for(&Locator::css(CONNECTED_SELECTOR), WaitState::Attached, timeout)
        .await
}

/// Same readiness signal, read through the `window.liveSocket` API
pub async fn wait_for_live_socket_connected(page: &Page) -> E2eResult<()> {
    page.driver()
        .wait_for_function(LIVE_SOCKET_CONNECTED, page.timeouts().readiness())
        .await
}

/// Connected and no requests in flight
pub async fn wait_for_liveview_to_settle(page: &Page) -> E2eResult<()> {
    let timeout = page.timeouts().readiness();
    wait_for_liveview_connected_within(page, timeout).await?;
    page.driver()
        .wait_for_load_state(LoadState::NetworkIdle, timeout)
        .await
}
