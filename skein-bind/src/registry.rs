use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use skein_store::traits::StatePort;
use skein_types::action::Action;
use skein_types::primitives::{ContractName, Identity};
use tracing::{info, warn};

use crate::binding::ContractBinding;
use crate::config::BindingConfig;
use crate::error::BindError;
use crate::remote::ContractConnector;

#[derive(Default)]
struct Contracts {
    by_name: HashMap<ContractName, Arc<ContractBinding>>,
    /// Names in insertion order.
    order: Vec<ContractName>,
    /// Addresses whose binding is in flight.
    loading: HashSet<String>,
}

/// The set of live contract bindings.
///
/// Adding a contract binds it against its schema and announces it through
/// the store; deleting it drops the binding and its cache slice.
pub struct ContractRegistry {
    connector: Arc<dyn ContractConnector>,
    store: Arc<dyn StatePort>,
    identity: Identity,
    config: BindingConfig,
    contracts: RwLock<Contracts>,
}

impl ContractRegistry {
    pub fn new(
        connector: Arc<dyn ContractConnector>,
        store: Arc<dyn StatePort>,
        identity: Identity,
        config: BindingConfig,
    ) -> Self {
        Self {
            connector,
            store,
            identity,
            config,
            contracts: RwLock::new(Contracts::default()),
        }
    }

    /// Bind the contract at `address` and register it under that name.
    ///
    /// Fails with [`BindError::DuplicateContract`] if the address is already
    /// bound or still being bound.
    pub async fn add_contract(&self, address: &str) -> Result<Arc<ContractBinding>, BindError> {
        {
            let mut contracts = self.write();
            if contracts.by_name.contains_key(address) || contracts.loading.contains(address) {
                return Err(BindError::DuplicateContract {
                    address: address.to_string(),
                });
            }
            contracts.loading.insert(address.to_string());
        }

        let result = self.bind(address).await;
        if let Err(e) = &result {
            warn!(address, error = %e, "failed to add contract");
            self.write().loading.remove(address);
        }
        result
    }

    async fn bind(&self, address: &str) -> Result<Arc<ContractBinding>, BindError> {
        let remote = self.connector.connect(address);
        let binding = ContractBinding::init(
            remote,
            self.identity,
            address,
            Arc::clone(&self.store),
            &self.config,
        )
        .await?;
        let binding = Arc::new(binding);

        let name = binding.name().to_string();
        self.store.dispatch(Action::ConsensusListening {
            contract: name.clone(),
        })?;
        self.store.dispatch(Action::ContractInitializing {
            contract: name.clone(),
        })?;

        {
            let mut contracts = self.write();
            contracts.by_name.insert(name.clone(), Arc::clone(&binding));
            contracts.order.push(name.clone());
        }

        if let Err(e) = self.store.dispatch(Action::ContractInitialized {
            contract: name.clone(),
        }) {
            // Nothing stays registered for a contract the store never saw initialized.
            let mut contracts = self.write();
            contracts.by_name.remove(&name);
            contracts.order.retain(|n| n != &name);
            return Err(e.into());
        }
        binding.mark_active();
        self.write().loading.remove(address);

        info!(contract = %name, "contract added");
        Ok(binding)
    }

    /// Drop the binding named `name` and tell the store to forget it.
    pub fn delete_contract(&self, name: &str) -> Result<(), BindError> {
        {
            let mut contracts = self.write();
            if contracts.by_name.remove(name).is_none() {
                return Err(BindError::NotFound {
                    name: name.to_string(),
                });
            }
            contracts.order.retain(|n| n != name);
            contracts.loading.remove(name);
        }

        self.store.dispatch(Action::DeleteContract {
            contract: name.to_string(),
        })?;
        info!(contract = name, "contract deleted");
        Ok(())
    }

    /// First binding whose address matches `address`, ignoring ASCII case.
    pub fn find_contract_by_address(&self, address: &str) -> Option<Arc<ContractBinding>> {
        let contracts = self.read();
        contracts
            .order
            .iter()
            .filter_map(|name| contracts.by_name.get(name))
            .find(|binding| binding.address().eq_ignore_ascii_case(address))
            .cloned()
    }

    pub fn contract(&self, name: &str) -> Option<Arc<ContractBinding>> {
        self.read().by_name.get(name).cloned()
    }

    /// All bindings in the order they were added.
    pub fn contracts(&self) -> Vec<Arc<ContractBinding>> {
        let contracts = self.read();
        contracts
            .order
            .iter()
            .filter_map(|name| contracts.by_name.get(name).cloned())
            .collect()
    }

    /// Whether `address` is currently being bound.
    pub fn is_loading(&self, address: &str) -> bool {
        self.read().loading.contains(address)
    }

    pub fn len(&self) -> usize {
        self.read().by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().by_name.is_empty()
    }

    /// The store this registry dispatches through.
    pub fn store(&self) -> Arc<dyn StatePort> {
        Arc::clone(&self.store)
    }

    fn read(&self) -> RwLockReadGuard<'_, Contracts> {
        self.contracts.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Contracts> {
        self.contracts.write().unwrap_or_else(|e| e.into_inner())
    }
}
