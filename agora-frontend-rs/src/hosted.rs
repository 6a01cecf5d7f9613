//! Wiring for the hosted backend this client ships against.

use ledger::rest::{RestConfig, RestStore};

use crate::Session;

pub fn hosted_config() -> RestConfig {
    RestConfig {
        base_url: "https://db.agora.town/v1".to_string(),
        api_key: "agora-town-public-client".to_string(),
    }
}

/// A session against the hosted store. After sign-in, forward the identity
/// provider's access token with `session.store().set_access_token(..)` so the
/// backend can enforce its per-user rules.
pub fn hosted_session() -> Session<RestStore> {
    Session::new(RestStore::new(hosted_config()))
}
