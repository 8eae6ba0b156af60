//! Forwards a prospective transaction to a hosted simulation service and
//! returns a shareable link to the result.

use {
    crate::{
        chain::ChainId,
        config::{SimulationConfig, SIMULATION_ACCESS_KEY_ENV},
        context::StakingContext,
        error::{ClientError, Result},
        primitives::{to_hex, Address},
        types::PendingTransaction,
    },
    log::*,
    serde::Serialize,
    serde_json::Value,
    std::time::Duration,
};

const ACCESS_KEY_HEADER: &str = "X-Access-Key";

/// Everything the service needs to replay a call at a given block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationRequest {
    pub from: Address,
    pub to: Address,
    pub input: Vec<u8>,
    pub chain_id: ChainId,
    pub block_number: u64,
    pub gas_price: u128,
}

#[derive(Serialize)]
struct SimulationBody<'a> {
    from: String,
    to: String,
    input: String,
    network_id: String,
    block_number: u64,
    gas_price: String,
    save: bool,
    save_if_fails: bool,
    simulation_type: &'static str,
    source: &'a str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOutcome {
    pub id: Option<String>,
    /// Public dashboard link; only present when the service returned an id.
    pub url: Option<String>,
    pub response: Value,
}

pub struct SimulationForwarder {
    client: reqwest::Client,
    config: SimulationConfig,
}

impl SimulationForwarder {
    pub fn new(config: SimulationConfig, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, config })
    }

    fn project_url(&self) -> String {
        format!(
            "{}/account/{}/project/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.account_slug,
            self.config.project_slug
        )
    }

    pub fn dashboard_url(&self, id: &str) -> String {
        format!(
            "{}/public/{}/{}/simulator/{id}",
            self.config.dashboard_base.trim_end_matches('/'),
            self.config.account_slug,
            self.config.project_slug
        )
    }

    /// Run the simulation, then make it publicly viewable.
    pub async fn simulate(&self, request: &SimulationRequest) -> Result<SimulationOutcome> {
        self.config.validate()?;
        let access_key = self.config.access_key().ok_or_else(|| {
            ClientError::Config(format!(
                "simulation access key not set; configure it or export {SIMULATION_ACCESS_KEY_ENV}"
            ))
        })?;

        let body = SimulationBody {
            from: request.from.to_string(),
            to: request.to.to_string(),
            input: to_hex(&request.input),
            network_id: request.chain_id.to_string(),
            block_number: request.block_number,
            gas_price: request.gas_price.to_string(),
            save: true,
            save_if_fails: true,
            simulation_type: "full",
            source: &self.config.source,
        };
        let response = self
            .client
            .post(format!("{}/simulate", self.project_url()))
            .header(ACCESS_KEY_HEADER, &access_key)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!("simulation rejected with {status}: {text}");
            return Err(ClientError::SimulationFailed(status.to_string()));
        }
        let response: Value = response.json().await?;

        let id = response["simulation"]["id"]
            .as_str()
            .filter(|id| !id.is_empty())
            .map(str::to_string);
        let url = match &id {
            Some(id) => {
                self.share(id, &access_key).await;
                Some(self.dashboard_url(id))
            }
            None => {
                warn!("simulation response carried no id");
                None
            }
        };
        Ok(SimulationOutcome { id, url, response })
    }

    /// Failures are logged; the simulation itself already succeeded.
    async fn share(&self, id: &str, access_key: &str) {
        let result = self
            .client
            .post(format!("{}/simulations/{id}/share", self.project_url()))
            .header(ACCESS_KEY_HEADER, access_key)
            .send()
            .await
            .and_then(|response| response.error_for_status());
        if let Err(err) = result {
            warn!("failed to share simulation {id}: {err}");
        }
    }
}

impl StakingContext {
    /// Fill in sender, block and gas price for `tx`. Block number and gas
    /// price are read concurrently.
    pub async fn prepare_simulation(&self, tx: &PendingTransaction) -> Result<SimulationRequest> {
        let from = tx
            .account
            .or_else(|| self.wallet().address())
            .ok_or(ClientError::NotConnected)?;
        let rpc = self.rpc(tx.chain_id)?;
        let (block_number, gas_price) = futures::try_join!(rpc.block_number(), rpc.gas_price())?;
        Ok(SimulationRequest {
            from,
            to: tx.address,
            input: tx.call_data(),
            chain_id: tx.chain_id,
            block_number,
            gas_price,
        })
    }

    pub async fn simulate_transaction(&self, tx: &PendingTransaction) -> Result<SimulationOutcome> {
        let request = self.prepare_simulation(tx).await?;
        debug!(
            "simulating {} on chain {} at block {}",
            tx.function, tx.chain_id, request.block_number
        );
        self.simulation().simulate(&request).await
    }
}
