//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{AuthService, RedirectService, UrlService};
use crate::domain::qr_code::QrCodeHost;
use crate::domain::repositories::UrlRepository;
use crate::domain::visit_worker::VisitDispatcher;

/// URL service over type-erased store and QR host.
pub type SharedUrlService = UrlService<dyn UrlRepository, dyn QrCodeHost>;

/// Redirect resolver over a type-erased store.
pub type SharedRedirectService = RedirectService<dyn UrlRepository>;

/// Services and handles shared by all requests.
///
/// Cheap to clone; every field is reference counted or a channel handle.
#[derive(Clone)]
pub struct AppState {
    pub url_service: Arc<SharedUrlService>,
    pub redirect_service: Arc<SharedRedirectService>,
    pub auth_service: Arc<AuthService>,
    pub visits: VisitDispatcher,
    /// When true, the client IP is taken from forwarding headers.
    pub behind_proxy: bool,
}

impl AppState {
    pub fn new(
        url_service: Arc<SharedUrlService>,
        redirect_service: Arc<SharedRedirectService>,
        auth_service: Arc<AuthService>,
        visits: VisitDispatcher,
        behind_proxy: bool,
    ) -> Self {
        Self {
            url_service,
            redirect_service,
            auth_service,
            visits,
            behind_proxy,
        }
    }
}
