//! Application state container.
//!
//! Every store is constructed here against one shared `ApiClient` and owned
//! explicitly instead of living in process-wide singletons, so tests (and
//! multiple windows, should the host ever want them) get isolated instances.

use crate::client::ApiClient;
use crate::counts::CountsStore;
use crate::drawer::DrawerHost;
use crate::error::AuthRequired;
use crate::presale::PresaleClient;
use crate::referrals::ReferralStore;
use crate::store::{AmmoKind, DocumentKind, FirearmKind, GearKind, ItemStore, NfaKind};
use crate::toast::ToastNotifier;
use crate::wallet::WalletStore;

pub struct AppState {
    pub firearms: ItemStore<FirearmKind>,
    pub ammo: ItemStore<AmmoKind>,
    pub gear: ItemStore<GearKind>,
    pub documents: ItemStore<DocumentKind>,
    pub nfa: ItemStore<NfaKind>,
    pub counts: CountsStore,
    pub wallet: WalletStore,
    pub referrals: ReferralStore,
    pub presale: PresaleClient,
    pub drawer: DrawerHost,
    pub toasts: ToastNotifier,
}

impl AppState {
    pub fn new(client: ApiClient) -> Self {
        Self {
            firearms: ItemStore::new(client.clone()),
            ammo: ItemStore::new(client.clone()),
            gear: ItemStore::new(client.clone()),
            documents: ItemStore::new(client.clone()),
            nfa: ItemStore::new(client.clone()),
            counts: CountsStore::new(client.clone()),
            wallet: WalletStore::new(client.clone()),
            referrals: ReferralStore::new(client.clone()),
            presale: PresaleClient::new(client),
            drawer: DrawerHost::new(),
            toasts: ToastNotifier::new(),
        }
    }

    /// Refresh the counts snapshot and all five collections concurrently.
    /// Requests race across stores by design; each store settles on the last
    /// response it receives.
    pub async fn refresh_all(
        &self,
        token: Option<&str>,
        params: &[(&str, &str)],
    ) -> Result<(), AuthRequired> {
        let (counts, firearms, ammo, gear, documents, nfa) = futures::join!(
            self.counts.fetch(token),
            self.firearms.fetch_all(token, params),
            self.ammo.fetch_all(token, params),
            self.gear.fetch_all(token, params),
            self.documents.fetch_all(token, params),
            self.nfa.fetch_all(token, params),
        );
        counts?;
        firearms?;
        ammo?;
        gear?;
        documents?;
        nfa?;
        Ok(())
    }
}
