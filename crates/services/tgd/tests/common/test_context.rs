use std::{net::SocketAddr, sync::Arc};

use chrono::TimeDelta;
use tg_auth::{
    clock::FixedClock,
    identity::Identity,
    signing_key::{HmacAlgorithm, SigningKey},
};
use tg_models::{account::memory::MemoryAccountStore, auth::role::Role};
use tgd::{api::setup_api, state::TgState};
use tokio::task::JoinHandle;

use super::api_client::ApiClient;

pub const T0: i64 = 1_700_000_000;
pub const ADMIN: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin-password";

pub struct TestContext {
    pub api: ApiClient,
    pub clock: Arc<FixedClock>,
    pub state: TgState,
    pub address: SocketAddr,
    handle: JoinHandle<tgd::prelude::Result<()>>,
}

impl TestContext {
    /// Starts a server on an ephemeral port with one seeded admin account.
    pub async fn start() -> Self {
        let clock = Arc::new(FixedClock::at_timestamp(T0));
        let state = TgState::new(
            Arc::new(SigningKey::generate(HmacAlgorithm::HS256)),
            TimeDelta::hours(1),
            Arc::new(MemoryAccountStore::new()),
            clock.clone(),
        );
        state
            .auth
            .register(
                Identity::new(ADMIN).unwrap(),
                ADMIN_PASSWORD,
                [Role::admin(), Role::user()].into_iter().collect(),
            )
            .await
            .expect("Failed to seed admin");

        let (address, handle) = setup_api(state.clone(), SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .expect("Failed to start server");

        Self {
            api: ApiClient::new(address),
            clock,
            state,
            address,
            handle,
        }
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
