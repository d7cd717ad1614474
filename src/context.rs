use std::sync::Arc;

use tracing::{debug, info};

use crate::api::PortalClient;
use crate::config::Config;
use crate::error::AppError;
use crate::models::Supplier;
use crate::notify::Notifier;
use crate::session::{CredentialStore, Session};
use crate::utils::cache::TimedCache;
use crate::utils::clock::{Clock, SystemClock};

/// Everything a command needs, built once per process and passed explicitly.
pub struct AppContext {
    pub config: Config,
    pub session: Arc<Session>,
    pub client: PortalClient,
    pub suppliers: TimedCache<Vec<Supplier>>,
    pub notifier: Arc<dyn Notifier>,
}

impl AppContext {
    /// Load stored credentials and wire the client and caches together.
    pub fn init(config: Config, notifier: Arc<dyn Notifier>) -> Result<Self, AppError> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let store = CredentialStore::from_config(&config)?;
        debug!("Credentials file at {}", store.path().display());
        let session = Arc::new(Session::load(store, Arc::clone(&clock)));
        let client = PortalClient::new(&config, Arc::clone(&session))?;
        let suppliers = TimedCache::new("suppliers", config.supplier_cache_ttl, clock);

        info!(
            "Portal client ready (base URL {}, signed in: {})",
            client.base_url(),
            session.is_authenticated()
        );

        Ok(Self {
            config,
            session,
            client,
            suppliers,
            notifier,
        })
    }

    pub fn require_sign_in(&self) -> Result<(), AppError> {
        if self.session.is_authenticated() {
            Ok(())
        } else {
            Err(AppError::NotSignedIn)
        }
    }

    /// Drop in-memory state at the end of a run; stored credentials are kept.
    pub fn teardown(&self) {
        self.suppliers.invalidate();
        debug!("Application context torn down");
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::notify::{NoticeKind, RecordingNotifier};
    use crate::session::tests::{credentials, jwt_with_exp, temp_credentials_path};

    /// Context pointed at an unroutable backend with its own credential file.
    pub(crate) fn test_context(label: &str) -> (AppContext, Arc<RecordingNotifier>) {
        let config = Config {
            base_url: "http://127.0.0.1:9".to_string(),
            credentials_path: temp_credentials_path(label),
            ..Config::default()
        };
        let notifier = Arc::new(RecordingNotifier::default());
        let ctx = AppContext::init(config, notifier.clone()).unwrap();
        (ctx, notifier)
    }

    pub(crate) fn sign_in(ctx: &AppContext) {
        let exp = chrono::Utc::now().timestamp() + 3600;
        ctx.session.sign_in(credentials(jwt_with_exp(exp))).unwrap();
    }

    #[test]
    fn test_require_sign_in() {
        let (ctx, _) = test_context("ctx-sign-in");
        assert!(matches!(ctx.require_sign_in(), Err(AppError::NotSignedIn)));

        sign_in(&ctx);
        assert!(ctx.require_sign_in().is_ok());
    }

    #[test]
    fn test_notifier_is_shared() {
        let (ctx, notifier) = test_context("ctx-notifier");
        ctx.notifier.info("hello");
        assert_eq!(notifier.messages(NoticeKind::Info), vec!["hello".to_string()]);
    }
}
