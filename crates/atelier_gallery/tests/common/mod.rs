#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use atelier_chain::{
    AccountAddress, AccountData, LedgerClient, MoveModuleAbi, MoveModuleBytecode, MoveResource,
    StaticWallet, ViewRequest,
};
use atelier_core::{AtelierConfig, AtelierError, Result};
use atelier_gallery::Resolver;
use serde_json::{Value, json};
use tokio::sync::Notify;

pub const OWNER: &str = "0xABC";

pub fn config() -> AtelierConfig {
    AtelierConfig {
        module_address: "0xa".into(),
        lib_module_address: "0xb".into(),
        max_concurrent_requests: 4,
        ..Default::default()
    }
}

pub fn coin_holder(tokens: &[&str]) -> MoveResource {
    holder(&config().coin_holder_type(), tokens)
}

pub fn design_holder(tokens: &[&str]) -> MoveResource {
    holder(&config().design_holder_type(), tokens)
}

pub fn holder(type_tag: &str, tokens: &[&str]) -> MoveResource {
    let tokens: Vec<Value> = tokens.iter().map(|t| json!({ "inner": t })).collect();
    MoveResource {
        resource_type: type_tag.into(),
        data: json!({ "tokens": tokens }),
    }
}

pub fn coins_module() -> MoveModuleBytecode {
    MoveModuleBytecode {
        bytecode: "0xa11ceb0b".into(),
        abi: Some(MoveModuleAbi {
            address: "0xa".into(),
            name: "coins".into(),
        }),
    }
}

/// In-memory ledger answering view calls from a table keyed by
/// `(function name, first argument)`.
pub struct FakeLedger {
    modules: Vec<MoveModuleBytecode>,
    resources: Vec<MoveResource>,
    views: HashMap<(String, String), std::result::Result<Vec<Value>, String>>,
    account_missing: AtomicBool,
    /// Taken by the first `get_account` call, which then waits on it.
    gate: Mutex<Option<Arc<Notify>>>,
    calls: Mutex<Vec<ViewRequest>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeLedger {
    pub fn new() -> Self {
        Self {
            modules: vec![coins_module()],
            resources: Vec::new(),
            views: HashMap::new(),
            account_missing: AtomicBool::new(false),
            gate: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_modules(mut self, modules: Vec<MoveModuleBytecode>) -> Self {
        self.modules = modules;
        self
    }

    pub fn with_resource(mut self, resource: MoveResource) -> Self {
        self.resources.push(resource);
        self
    }

    pub fn with_view(mut self, function: &str, arg: &str, result: Value) -> Self {
        self.views
            .insert((function.into(), arg.into()), Ok(vec![result]));
        self
    }

    pub fn with_failing_view(mut self, function: &str, arg: &str, reason: &str) -> Self {
        self.views
            .insert((function.into(), arg.into()), Err(reason.into()));
        self
    }

    pub fn with_missing_account(self) -> Self {
        self.set_account_missing(true);
        self
    }

    pub fn set_account_missing(&self, missing: bool) {
        self.account_missing.store(missing, Ordering::SeqCst);
    }

    pub fn with_gate(self, gate: Arc<Notify>) -> Self {
        *self.gate.lock().unwrap() = Some(gate);
        self
    }

    /// `(function name, argument)` of every view call, in call order.
    pub fn view_calls(&self) -> Vec<(String, String)> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|r| {
                let name = r.function.rsplit("::").next().unwrap_or_default().to_string();
                (name, r.arguments.first().cloned().unwrap_or_default())
            })
            .collect()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerClient for FakeLedger {
    async fn get_account(&self, address: &AccountAddress) -> Result<AccountData> {
        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.account_missing.load(Ordering::SeqCst) {
            return Err(AtelierError::Http {
                status: 404,
                body: format!("account {address} not found"),
            });
        }
        Ok(AccountData {
            sequence_number: "0".into(),
            authentication_key: address.to_string(),
        })
    }

    async fn get_account_modules(
        &self,
        _address: &AccountAddress,
    ) -> Result<Vec<MoveModuleBytecode>> {
        Ok(self.modules.clone())
    }

    async fn get_account_resources(&self, _address: &AccountAddress) -> Result<Vec<MoveResource>> {
        Ok(self.resources.clone())
    }

    async fn view(&self, request: &ViewRequest) -> Result<Vec<Value>> {
        self.calls.lock().unwrap().push(request.clone());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let name = request.function.rsplit("::").next().unwrap_or_default().to_string();
        let arg = request.arguments.first().cloned().unwrap_or_default();
        match self.views.get(&(name.clone(), arg.clone())) {
            Some(Ok(values)) => Ok(values.clone()),
            Some(Err(reason)) => Err(AtelierError::Http {
                status: 500,
                body: reason.clone(),
            }),
            None => Err(AtelierError::Http {
                status: 400,
                body: format!("no view {name}({arg})"),
            }),
        }
    }
}

pub fn resolver(ledger: Arc<FakeLedger>) -> Resolver {
    resolver_with(ledger, config())
}

pub fn resolver_with(ledger: Arc<FakeLedger>, config: AtelierConfig) -> Resolver {
    let wallet = Arc::new(StaticWallet::new(Some(OWNER.into())));
    Resolver::new(ledger, wallet, config)
}
